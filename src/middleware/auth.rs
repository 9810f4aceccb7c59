//! Caller identity.
//!
//! Gated routes resolve the identity once in the gate middleware and leave it
//! in the request extensions; [`CurrentUser`] picks it up from there.

use axum::{
    extract::FromRequestParts,
    http::{HeaderMap, header, request::Parts},
};
use axum_extra::headers::{Authorization, HeaderMapExt, authorization::Bearer};

use coursehub_auth::{Claims, verify_token};
use coursehub_config::JwtConfig;
use coursehub_core::{AccountType, AppError};
use coursehub_models::UserId;

use crate::state::AppState;

/// Who is calling, as asserted by a verified access token.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Identity {
    pub user_id: UserId,
    pub email: String,
    pub account_type: AccountType,
    pub is_demo: bool,
}

impl Identity {
    pub fn from_claims(claims: Claims) -> Option<Self> {
        Some(Self {
            user_id: claims.user_id()?.into(),
            email: claims.email,
            account_type: claims.account_type,
            is_demo: claims.is_demo,
        })
    }

    pub fn is(&self, account_type: AccountType) -> bool {
        self.account_type == account_type
    }
}

/// Outcome of reading the `Authorization` header.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Credential {
    Missing,
    Invalid,
    Valid(Identity),
}

impl Credential {
    pub fn identity(&self) -> Option<&Identity> {
        match self {
            Credential::Valid(identity) => Some(identity),
            _ => None,
        }
    }
}

pub fn resolve_credential(headers: &HeaderMap, jwt_config: &JwtConfig) -> Credential {
    if !headers.contains_key(header::AUTHORIZATION) {
        return Credential::Missing;
    }

    let Some(Authorization(bearer)) = headers.typed_get::<Authorization<Bearer>>() else {
        return Credential::Invalid;
    };

    verify_token(bearer.token(), jwt_config)
        .ok()
        .and_then(Identity::from_claims)
        .map_or(Credential::Invalid, Credential::Valid)
}

/// Extractor for handlers that need the caller.
///
/// Behind a gate it reuses the identity the gate resolved. On an ungated
/// route it verifies the bearer token itself.
#[derive(Debug, Clone)]
pub struct CurrentUser(pub Identity);

impl FromRequestParts<AppState> for CurrentUser {
    type Rejection = AppError;

    async fn from_request_parts(
        parts: &mut Parts,
        state: &AppState,
    ) -> Result<Self, Self::Rejection> {
        if let Some(identity) = parts.extensions.get::<Identity>() {
            return Ok(CurrentUser(identity.clone()));
        }

        match resolve_credential(&parts.headers, &state.jwt_config) {
            Credential::Valid(identity) => Ok(CurrentUser(identity)),
            Credential::Missing => Err(AppError::unauthorized("Authentication required")),
            Credential::Invalid => Err(AppError::unauthorized("Invalid or expired token")),
        }
    }
}
