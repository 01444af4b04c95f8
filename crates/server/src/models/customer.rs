//! Customer model, draft and field validation.

use chrono::NaiveDate;
use secrecy::SecretString;
use serde::Serialize;

use nighthawk_core::{CustomerId, Email, EmailError, OrderHistory};

use super::CustomerProduct;

/// Date format accepted by the JSON API (`MM-dd-yyyy`).
pub const API_DATE_FORMAT: &str = "%m-%d-%Y";

/// Date format submitted by the HTML forms (`yyyy-MM-dd`).
pub const FORM_DATE_FORMAT: &str = "%Y-%m-%d";

const NAME_MIN_CHARS: usize = 2;
const NAME_MAX_CHARS: usize = 30;

/// A customer as loaded from the database.
///
/// The password hash is kept for authentication but never serialized.
#[derive(Debug, Clone, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct Customer {
    pub id: CustomerId,
    pub email: Email,
    #[serde(skip)]
    pub password: String,
    pub name: String,
    pub last_visited: Option<NaiveDate>,
    pub products: Vec<CustomerProduct>,
    pub order_history: OrderHistory,
}

impl Customer {
    /// Names of the attached products, in display order.
    pub fn product_names(&self) -> impl Iterator<Item = &str> {
        self.products.iter().map(|p| p.name.as_str())
    }

    /// Last visit formatted for the HTML date input, or an empty string.
    #[must_use]
    pub fn last_visited_form_value(&self) -> String {
        self.last_visited
            .map(|d| d.format(FORM_DATE_FORMAT).to_string())
            .unwrap_or_default()
    }
}

/// Field-level validation failures for customer input.
#[derive(Debug, Clone, PartialEq, Eq, thiserror::Error)]
pub enum ValidationError {
    #[error("{0}")]
    Email(#[from] EmailError),

    #[error("Password is required")]
    EmptyPassword,

    #[error("Name (2 to 30 chars)")]
    NameLength,
}

/// Validate and trim a customer name.
///
/// # Errors
///
/// Returns [`ValidationError::NameLength`] unless the trimmed name has 2 to 30 characters.
pub fn validate_name(raw: &str) -> Result<String, ValidationError> {
    let name = raw.trim();
    let len = name.chars().count();
    if (NAME_MIN_CHARS..=NAME_MAX_CHARS).contains(&len) {
        Ok(name.to_owned())
    } else {
        Err(ValidationError::NameLength)
    }
}

/// A date string that did not match the expected format.
#[derive(Debug, Clone, PartialEq, Eq, thiserror::Error)]
#[error("{input} error; try {expected}")]
pub struct DateFormatError {
    pub input: String,
    pub expected: &'static str,
}

/// Parse a `MM-dd-yyyy` date as used by the JSON API.
///
/// # Errors
///
/// Returns [`DateFormatError`] whose message names the expected format.
pub fn parse_api_date(raw: &str) -> Result<NaiveDate, DateFormatError> {
    NaiveDate::parse_from_str(raw.trim(), API_DATE_FORMAT).map_err(|_| DateFormatError {
        input: raw.to_owned(),
        expected: "MM-dd-yyyy",
    })
}

/// Parse a `yyyy-MM-dd` date from an HTML form. Blank input means no date.
///
/// # Errors
///
/// Returns [`DateFormatError`] for non-blank input in any other format.
pub fn parse_form_date(raw: &str) -> Result<Option<NaiveDate>, DateFormatError> {
    let raw = raw.trim();
    if raw.is_empty() {
        return Ok(None);
    }
    NaiveDate::parse_from_str(raw, FORM_DATE_FORMAT)
        .map(Some)
        .map_err(|_| DateFormatError {
            input: raw.to_owned(),
            expected: "yyyy-MM-dd",
        })
}

/// Validated input for creating or updating a customer.
///
/// `password` holds plaintext; it is hashed by the customer service before
/// it reaches the database. On update an empty password keeps the stored hash.
#[derive(Debug, Clone)]
pub struct CustomerDraft {
    pub id: Option<CustomerId>,
    pub email: Email,
    pub password: SecretString,
    pub name: String,
    pub last_visited: Option<NaiveDate>,
}

impl CustomerDraft {
    /// Build a draft for a new customer.
    ///
    /// # Errors
    ///
    /// Returns the first [`ValidationError`] among email, password and name.
    pub fn new(
        email: &str,
        password: &str,
        name: &str,
        last_visited: Option<NaiveDate>,
    ) -> Result<Self, ValidationError> {
        let email = Email::parse(email)?;
        if password.is_empty() {
            return Err(ValidationError::EmptyPassword);
        }
        let name = validate_name(name)?;

        Ok(Self {
            id: None,
            email,
            password: SecretString::from(password),
            name,
            last_visited,
        })
    }

    /// Build a draft that updates an existing customer.
    ///
    /// # Errors
    ///
    /// Returns the first [`ValidationError`] among email and name.
    pub fn update(
        id: CustomerId,
        email: &str,
        password: &str,
        name: &str,
        last_visited: Option<NaiveDate>,
    ) -> Result<Self, ValidationError> {
        Ok(Self {
            id: Some(id),
            email: Email::parse(email)?,
            password: SecretString::from(password),
            name: validate_name(name)?,
            last_visited,
        })
    }
}
