//! Login and logout routes.
//!
//! Customers sign in with their email and password. The resulting identity
//! (email plus product authorities) lives in the session.

use askama::Template;
use askama_web::WebTemplate;
use axum::{
    Form,
    extract::{Query, State},
    response::{IntoResponse, Redirect, Response},
};
use serde::Deserialize;
use tower_sessions::Session;

use crate::error::{AppError, Result, clear_sentry_user, set_sentry_user};
use crate::filters;
use crate::middleware::{OptionalAuth, clear_current_customer, set_current_customer};
use crate::models::CurrentCustomer;
use crate::services::{AuthError, AuthService};
use crate::state::AppState;

/// Where a successful login lands.
const AFTER_LOGIN: &str = "/mvc/customer/read";

/// Login form data.
#[derive(Debug, Deserialize)]
pub struct LoginForm {
    pub email: String,
    pub password: String,
}

/// Query parameters of the login page.
#[derive(Debug, Deserialize)]
pub struct LoginQuery {
    pub logged_out: Option<bool>,
}

/// Login page template.
#[derive(Template, WebTemplate)]
#[template(path = "login.html")]
pub struct LoginTemplate {
    pub current: Option<CurrentCustomer>,
    pub email: String,
    pub error: Option<String>,
    pub notice: Option<String>,
}

/// Display the login page.
pub async fn login_page(
    OptionalAuth(current): OptionalAuth,
    Query(query): Query<LoginQuery>,
) -> impl IntoResponse {
    LoginTemplate {
        current,
        email: String::new(),
        error: None,
        notice: query
            .logged_out
            .filter(|v| *v)
            .map(|_| "You have been signed out.".to_string()),
    }
}

/// Handle login form submission.
pub async fn login(
    State(state): State<AppState>,
    session: Session,
    Form(form): Form<LoginForm>,
) -> Result<Response> {
    let auth = AuthService::new(state.customers());

    let identity = match auth.authenticate(&form.email, &form.password).await {
        Ok(identity) => identity,
        Err(
            e @ (AuthError::InvalidEmail(_)
            | AuthError::InvalidCredentials
            | AuthError::UserNotFound(_)),
        ) => {
            tracing::warn!(error = %e, "Login failed");
            return Ok(LoginTemplate {
                current: None,
                email: form.email,
                error: Some("Invalid email or password".to_string()),
                notice: None,
            }
            .into_response());
        }
        Err(e) => return Err(e.into()),
    };

    let customer = CurrentCustomer::from(identity);
    set_current_customer(&session, &customer)
        .await
        .map_err(|e| AppError::Internal(format!("session error: {e}")))?;
    set_sentry_user(customer.email.as_str());
    tracing::info!(email = %customer.email, "Customer signed in");

    Ok(Redirect::to(AFTER_LOGIN).into_response())
}

/// Handle logout.
pub async fn logout(session: Session) -> Result<Redirect> {
    clear_current_customer(&session)
        .await
        .map_err(|e| AppError::Internal(format!("session error: {e}")))?;
    clear_sentry_user();

    Ok(Redirect::to("/login?logged_out=true"))
}
