//! Domain models for the customer application.

pub mod customer;
pub mod joke;
pub mod membership;
pub mod product;
pub mod session;

pub use customer::{
    API_DATE_FORMAT, Customer, CustomerDraft, DateFormatError, FORM_DATE_FORMAT, ValidationError,
    parse_api_date, parse_form_date, validate_name,
};
pub use joke::Joke;
pub use membership::Membership;
pub use product::CustomerProduct;
pub use session::{CurrentCustomer, keys as session_keys};
