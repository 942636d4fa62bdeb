use axum::async_trait;
use axum::extract::FromRequestParts;
use axum::http::request::Parts;
use error_stack::{Report, ResultExt};
use jsonwebtoken::{Algorithm, DecodingKey, Validation};
use kernel::KernelError;
use serde::{Deserialize, Serialize};

use crate::config::AuthConfig;
use crate::error::ErrorStatus;
use crate::handler::AppModule;

pub const AUTH_HEADER: &str = "x-auth-token";

#[derive(Debug, Serialize, Deserialize)]
pub struct Claims {
    #[serde(alias = "_id")]
    pub sub: String,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub exp: Option<u64>,
}

impl AuthConfig {
    pub fn verify(&self, token: &str) -> error_stack::Result<Claims, KernelError> {
        let mut validation = Validation::new(Algorithm::HS256);
        validation.required_spec_claims.clear();
        let data = jsonwebtoken::decode::<Claims>(
            token,
            &DecodingKey::from_secret(self.secret()),
            &validation,
        )
        .change_context_lazy(|| KernelError::Unauthenticated)
        .attach_printable("Invalid token.")?;
        Ok(data.claims)
    }
}

/// Caller holding a valid token. Rejects the request with 401 otherwise.
pub struct Authenticated(pub Claims);

#[async_trait]
impl FromRequestParts<AppModule> for Authenticated {
    type Rejection = ErrorStatus;

    async fn from_request_parts(
        parts: &mut Parts,
        state: &AppModule,
    ) -> Result<Self, Self::Rejection> {
        let token = parts
            .headers
            .get(AUTH_HEADER)
            .ok_or_else(|| {
                Report::new(KernelError::Unauthenticated)
                    .attach_printable("Access denied. No token provided.")
            })?
            .to_str()
            .change_context_lazy(|| KernelError::Unauthenticated)
            .attach_printable("Invalid token.")?;
        let claims = state.auth().verify(token)?;
        tracing::debug!(subject = %claims.sub, "Authenticated request");
        Ok(Self(claims))
    }
}
