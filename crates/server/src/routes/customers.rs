//! Customer view routes (server-rendered HTML).

use askama::Template;
use askama_web::WebTemplate;
use axum::{
    Form,
    extract::{Path, Query, State},
    response::{IntoResponse, Redirect, Response},
};
use serde::Deserialize;

use nighthawk_core::CustomerId;

use crate::error::{AppError, Result};
use crate::filters;
use crate::middleware::OptionalAuth;
use crate::models::{
    Customer, CurrentCustomer, CustomerDraft, ValidationError, parse_form_date, validate_name,
};
use crate::services::ServiceError;
use crate::state::AppState;

const READ_PATH: &str = "/mvc/customer/read";

// =============================================================================
// Form Types
// =============================================================================

/// Customer create/update form.
#[derive(Debug, Default, Deserialize)]
pub struct CustomerForm {
    #[serde(default)]
    pub email: String,
    #[serde(default)]
    pub password: String,
    #[serde(default)]
    pub name: String,
    /// `yyyy-MM-dd`, may be blank.
    #[serde(default)]
    pub last_visited: String,
}

impl CustomerForm {
    /// Prefill from an existing customer. The password is never echoed back.
    fn from_customer(customer: &Customer) -> Self {
        Self {
            email: customer.email.to_string(),
            password: String::new(),
            name: customer.name.clone(),
            last_visited: customer.last_visited_form_value(),
        }
    }

    /// Validate every field, collecting one message per failing field.
    ///
    /// `id` selects update semantics, where a blank password is allowed.
    fn validate(&self, id: Option<CustomerId>) -> std::result::Result<CustomerDraft, FieldErrors> {
        let mut errors = FieldErrors::default();

        if let Err(e) = nighthawk_core::Email::parse(&self.email) {
            errors.email = Some(e.to_string());
        }
        if id.is_none() && self.password.is_empty() {
            errors.password = Some(ValidationError::EmptyPassword.to_string());
        }
        if let Err(e) = validate_name(&self.name) {
            errors.name = Some(e.to_string());
        }
        let last_visited = match parse_form_date(&self.last_visited) {
            Ok(date) => date,
            Err(e) => {
                errors.last_visited = Some(e.to_string());
                None
            }
        };

        if errors.any() {
            return Err(errors);
        }

        let draft = match id {
            None => CustomerDraft::new(&self.email, &self.password, &self.name, last_visited),
            Some(id) => {
                CustomerDraft::update(id, &self.email, &self.password, &self.name, last_visited)
            }
        };
        draft.map_err(|e| FieldErrors {
            form: Some(e.to_string()),
            ..FieldErrors::default()
        })
    }
}

/// Per-field validation messages shown next to the inputs.
#[derive(Debug, Default, PartialEq, Eq)]
pub struct FieldErrors {
    pub email: Option<String>,
    pub password: Option<String>,
    pub name: Option<String>,
    pub last_visited: Option<String>,
    pub form: Option<String>,
}

impl FieldErrors {
    fn any(&self) -> bool {
        self.email.is_some()
            || self.password.is_some()
            || self.name.is_some()
            || self.last_visited.is_some()
            || self.form.is_some()
    }
}

/// Query parameters of the search page.
#[derive(Debug, Deserialize)]
pub struct SearchQuery {
    pub term: Option<String>,
}

// =============================================================================
// Templates
// =============================================================================

/// Customer table (read and search pages).
#[derive(Template, WebTemplate)]
#[template(path = "customer/read.html")]
pub struct CustomerListTemplate {
    pub current: Option<CurrentCustomer>,
    pub customers: Vec<Customer>,
    pub term: Option<String>,
}

/// Create/update form page.
#[derive(Template, WebTemplate)]
#[template(path = "customer/form.html")]
pub struct CustomerFormTemplate {
    pub current: Option<CurrentCustomer>,
    /// `Some` when editing an existing customer.
    pub id: Option<CustomerId>,
    pub form: CustomerForm,
    pub errors: FieldErrors,
}

impl CustomerFormTemplate {
    fn action(&self) -> String {
        self.id.map_or_else(
            || "/mvc/customer/create".to_string(),
            |id| format!("/mvc/customer/update/{id}"),
        )
    }
}

// =============================================================================
// Handlers
// =============================================================================

/// Show every customer.
pub async fn read(
    State(state): State<AppState>,
    OptionalAuth(current): OptionalAuth,
) -> Result<impl IntoResponse> {
    Ok(CustomerListTemplate {
        current,
        customers: state.customers().list_all().await?,
        term: None,
    })
}

/// Show customers matching `term` (all customers when blank).
pub async fn search(
    State(state): State<AppState>,
    OptionalAuth(current): OptionalAuth,
    Query(query): Query<SearchQuery>,
) -> Result<impl IntoResponse> {
    let term = query.term.unwrap_or_default().trim().to_string();
    Ok(CustomerListTemplate {
        current,
        customers: state.customers().search(&term).await?,
        term: Some(term),
    })
}

/// Empty create form.
pub async fn create_form(OptionalAuth(current): OptionalAuth) -> impl IntoResponse {
    CustomerFormTemplate {
        current,
        id: None,
        form: CustomerForm::default(),
        errors: FieldErrors::default(),
    }
}

/// Handle the create form.
pub async fn create(
    State(state): State<AppState>,
    OptionalAuth(current): OptionalAuth,
    Form(form): Form<CustomerForm>,
) -> Result<Response> {
    submit(&state, current, None, form).await
}

/// Prefilled update form.
pub async fn update_form(
    State(state): State<AppState>,
    OptionalAuth(current): OptionalAuth,
    Path(id): Path<CustomerId>,
) -> Result<impl IntoResponse> {
    let customer = state
        .customers()
        .get(id)
        .await?
        .ok_or_else(|| AppError::NotFound(format!("customer {id}")))?;

    Ok(CustomerFormTemplate {
        current,
        id: Some(id),
        form: CustomerForm::from_customer(&customer),
        errors: FieldErrors::default(),
    })
}

/// Handle the update form.
pub async fn update(
    State(state): State<AppState>,
    OptionalAuth(current): OptionalAuth,
    Path(id): Path<CustomerId>,
    Form(form): Form<CustomerForm>,
) -> Result<Response> {
    submit(&state, current, Some(id), form).await
}

/// Delete a customer and return to the list.
pub async fn delete(State(state): State<AppState>, Path(id): Path<CustomerId>) -> Result<Redirect> {
    state
        .customers()
        .delete(id)
        .await?
        .ok_or_else(|| AppError::NotFound(format!("customer {id}")))?;

    Ok(Redirect::to(READ_PATH))
}

/// Validate and save a submitted form, re-rendering it with errors on failure.
async fn submit(
    state: &AppState,
    current: Option<CurrentCustomer>,
    id: Option<CustomerId>,
    form: CustomerForm,
) -> Result<Response> {
    let rerender = |form: CustomerForm, errors: FieldErrors| {
        CustomerFormTemplate {
            current: current.clone(),
            id,
            form,
            errors,
        }
        .into_response()
    };

    let draft = match form.validate(id) {
        Ok(draft) => draft,
        Err(errors) => return Ok(rerender(form, errors)),
    };

    match state.customers().save(&draft).await {
        Ok(_) => Ok(Redirect::to(READ_PATH).into_response()),
        Err(err @ ServiceError::DuplicateEmail(_)) => {
            let errors = FieldErrors {
                email: Some(err.to_string()),
                ..FieldErrors::default()
            };
            Ok(rerender(form, errors))
        }
        Err(ServiceError::CustomerNotFound(id)) => {
            Err(AppError::NotFound(format!("customer {id}")))
        }
        Err(e) => Err(e.into()),
    }
}

#[cfg(test)]
#[allow(clippy::unwrap_used)]
mod tests {
    use secrecy::ExposeSecret;

    use super::*;

    fn form(email: &str, password: &str, name: &str, last_visited: &str) -> CustomerForm {
        CustomerForm {
            email: email.to_string(),
            password: password.to_string(),
            name: name.to_string(),
            last_visited: last_visited.to_string(),
        }
    }

    #[test]
    fn test_valid_create_form() {
        let draft = form("niko@gmail.com", "123Niko!", "Nikola Tesla", "1850-01-01")
            .validate(None)
            .unwrap();

        assert_eq!(draft.email.as_str(), "niko@gmail.com");
        assert_eq!(draft.password.expose_secret(), "123Niko!");
        assert_eq!(draft.last_visited.unwrap().to_string(), "1850-01-01");
    }

    #[test]
    fn test_collects_every_field_error() {
        let errors = form("x", "", "N", "01-01-1850").validate(None).unwrap_err();

        assert!(errors.email.is_some());
        assert_eq!(errors.password.as_deref(), Some("Password is required"));
        assert_eq!(errors.name.as_deref(), Some("Name (2 to 30 chars)"));
        assert_eq!(
            errors.last_visited.as_deref(),
            Some("01-01-1850 error; try yyyy-MM-dd")
        );
    }

    #[test]
    fn test_update_form_allows_blank_password_and_date() {
        let draft = form("madam@gmail.com", "", "Madam Currie", "")
            .validate(Some(CustomerId::new(4)))
            .unwrap();

        assert_eq!(draft.id, Some(CustomerId::new(4)));
        assert!(draft.last_visited.is_none());
    }

    #[test]
    fn test_form_action_depends_on_mode() {
        let mut template = CustomerFormTemplate {
            current: None,
            id: None,
            form: CustomerForm::default(),
            errors: FieldErrors::default(),
        };
        assert_eq!(template.action(), "/mvc/customer/create");

        template.id = Some(CustomerId::new(7));
        assert_eq!(template.action(), "/mvc/customer/update/7");
    }
}
