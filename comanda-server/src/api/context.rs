//! Request identity context
//!
//! Authentication and role checks happen upstream (API gateway); by the
//! time a request reaches this server it carries trusted headers:
//!
//! - `X-Establishment-Id` — the tenant scope, required
//! - `X-User-Id` — the acting user, absent for machine calls
//!
//! Tenant scope is threaded explicitly through every service call — never
//! ambient or thread-local.

use axum::extract::FromRequestParts;
use axum::http::request::Parts;

use crate::utils::AppError;

const ESTABLISHMENT_HEADER: &str = "x-establishment-id";
const USER_HEADER: &str = "x-user-id";

#[derive(Debug, Clone)]
pub struct RequestContext {
    pub establishment_id: String,
    pub user_id: Option<String>,
}

impl<S> FromRequestParts<S> for RequestContext
where
    S: Send + Sync,
{
    type Rejection = AppError;

    async fn from_request_parts(parts: &mut Parts, _state: &S) -> Result<Self, Self::Rejection> {
        let establishment_id = parts
            .headers
            .get(ESTABLISHMENT_HEADER)
            .and_then(|v| v.to_str().ok())
            .filter(|v| !v.is_empty())
            .map(str::to_string)
            .ok_or_else(|| {
                AppError::Unauthorized(format!("{} header required", ESTABLISHMENT_HEADER))
            })?;

        let user_id = parts
            .headers
            .get(USER_HEADER)
            .and_then(|v| v.to_str().ok())
            .filter(|v| !v.is_empty())
            .map(str::to_string);

        Ok(Self {
            establishment_id,
            user_id,
        })
    }
}
