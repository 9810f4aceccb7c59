//! Route gates.
//!
//! Every endpoint declares an ordered list of [`Gate`]s. The gates run in
//! that order and the first one that fails decides the response; the
//! handler only runs when all of them pass.
//!
//! | Gate | Fails with |
//! |------|------------|
//! | [`Gate::Authenticated`] | 401 |
//! | [`Gate::Role`] | 403 (401 without a caller) |
//! | [`Gate::NotDemo`] | 403 (401 without a caller) |

use std::fmt;
use std::sync::Arc;

use axum::{
    extract::{MatchedPath, Request, State},
    middleware::Next,
    response::{IntoResponse, Response},
};
use tracing::warn;

use coursehub_config::JwtConfig;
use coursehub_core::{AccountType, AppError};
use coursehub_observability::track_gate_rejection;

use crate::middleware::auth::{Credential, Identity, resolve_credential};

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Gate {
    /// A verified caller must be present.
    Authenticated,
    /// The caller's account type must be one of these.
    Role(&'static [AccountType]),
    /// Demo accounts are turned away.
    NotDemo,
}

impl Gate {
    fn check(&self, identity: Option<&Identity>) -> Result<(), GateRejection> {
        let identity = identity.ok_or(GateRejection::Unauthenticated)?;

        match self {
            Gate::Authenticated => Ok(()),
            Gate::Role(allowed) if allowed.contains(&identity.account_type) => Ok(()),
            Gate::Role(allowed) => Err(GateRejection::WrongRole { allowed: *allowed }),
            Gate::NotDemo if identity.is_demo => Err(GateRejection::DemoAccount),
            Gate::NotDemo => Ok(()),
        }
    }
}

impl fmt::Display for Gate {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Gate::Authenticated => f.write_str("auth"),
            Gate::Role(allowed) => {
                let names: Vec<String> = allowed
                    .iter()
                    .map(|a| a.as_str().to_ascii_lowercase())
                    .collect();
                f.write_str(&names.join("|"))
            }
            Gate::NotDemo => f.write_str("demo-restricted"),
        }
    }
}

pub const PUBLIC: &[Gate] = &[];
pub const AUTHENTICATED: &[Gate] = &[Gate::Authenticated];
pub const AUTHENTICATED_NOT_DEMO: &[Gate] = &[Gate::Authenticated, Gate::NotDemo];
pub const ADMIN: &[Gate] = &[Gate::Authenticated, Gate::Role(&[AccountType::Admin])];
pub const ADMIN_NOT_DEMO: &[Gate] = &[
    Gate::Authenticated,
    Gate::Role(&[AccountType::Admin]),
    Gate::NotDemo,
];
pub const INSTRUCTOR: &[Gate] = &[Gate::Authenticated, Gate::Role(&[AccountType::Instructor])];
pub const INSTRUCTOR_NOT_DEMO: &[Gate] = &[
    Gate::Authenticated,
    Gate::Role(&[AccountType::Instructor]),
    Gate::NotDemo,
];
pub const STUDENT: &[Gate] = &[Gate::Authenticated, Gate::Role(&[AccountType::Student])];
pub const STUDENT_NOT_DEMO: &[Gate] = &[
    Gate::Authenticated,
    Gate::Role(&[AccountType::Student]),
    Gate::NotDemo,
];

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum GateRejection {
    Unauthenticated,
    WrongRole { allowed: &'static [AccountType] },
    DemoAccount,
}

impl GateRejection {
    /// Short label for logs and metrics.
    pub fn reason(&self) -> &'static str {
        match self {
            GateRejection::Unauthenticated => "unauthenticated",
            GateRejection::WrongRole { .. } => "role",
            GateRejection::DemoAccount => "demo",
        }
    }

    pub fn into_app_error(self, credential: &Credential) -> AppError {
        match self {
            GateRejection::Unauthenticated => match credential {
                Credential::Invalid => AppError::unauthorized("Invalid or expired token"),
                _ => AppError::unauthorized("Authentication required"),
            },
            GateRejection::WrongRole { allowed } => {
                let names: Vec<String> = allowed
                    .iter()
                    .map(|a| a.as_str().to_ascii_lowercase())
                    .collect();
                AppError::forbidden(format!(
                    "This is a protected route for {} accounts only",
                    names.join(" or ")
                ))
            }
            GateRejection::DemoAccount => {
                AppError::forbidden("This action is not available for demo accounts")
            }
        }
    }
}

/// Runs `gates` in order against the caller and stops at the first failure.
pub fn evaluate(gates: &[Gate], identity: Option<&Identity>) -> Result<(), GateRejection> {
    gates.iter().try_for_each(|gate| gate.check(identity))
}

/// Per-route state for [`enforce_gates`].
#[derive(Clone)]
pub struct GateState {
    pub jwt_config: Arc<JwtConfig>,
    pub gates: &'static [Gate],
}

/// Resolves the caller, evaluates the route's gates and, on success, stores
/// the [`Identity`] in the request extensions for the handler.
pub async fn enforce_gates(
    State(gate): State<GateState>,
    mut req: Request,
    next: Next,
) -> Response {
    let credential = resolve_credential(req.headers(), &gate.jwt_config);

    if let Err(rejection) = evaluate(gate.gates, credential.identity()) {
        let path = req
            .extensions()
            .get::<MatchedPath>()
            .map(|p| p.as_str().to_owned())
            .unwrap_or_else(|| req.uri().path().to_owned());
        let user_id = credential.identity().map(|i| i.user_id.to_string());

        warn!(
            path = %path,
            reason = rejection.reason(),
            user_id = ?user_id,
            "Request rejected by route gate"
        );
        track_gate_rejection(&path, rejection.reason());

        return rejection.into_app_error(&credential).into_response();
    }

    if let Credential::Valid(identity) = credential {
        req.extensions_mut().insert(identity);
    }

    next.run(req).await
}

#[cfg(test)]
mod tests {
    use super::*;
    use axum::http::StatusCode;
    use coursehub_models::UserId;

    fn identity(account_type: AccountType, is_demo: bool) -> Identity {
        Identity {
            user_id: UserId::new(),
            email: "caller@example.com".to_string(),
            account_type,
            is_demo,
        }
    }

    #[test]
    fn test_public_lets_anyone_through() {
        assert!(evaluate(PUBLIC, None).is_ok());
    }

    #[test]
    fn test_missing_identity_is_unauthenticated_for_every_gate() {
        for gates in [AUTHENTICATED, INSTRUCTOR, ADMIN_NOT_DEMO, STUDENT_NOT_DEMO] {
            assert_eq!(evaluate(gates, None), Err(GateRejection::Unauthenticated));
        }
        // Even a chain that starts with a role check reports the missing caller.
        assert_eq!(
            evaluate(&[Gate::Role(&[AccountType::Admin]), Gate::NotDemo], None),
            Err(GateRejection::Unauthenticated)
        );
    }

    #[test]
    fn test_role_mismatch_is_forbidden() {
        let student = identity(AccountType::Student, false);
        assert!(matches!(
            evaluate(INSTRUCTOR, Some(&student)),
            Err(GateRejection::WrongRole { .. })
        ));
    }

    #[test]
    fn test_demo_admin_cannot_pass_demo_gate() {
        let admin = identity(AccountType::Admin, true);
        assert_eq!(
            evaluate(ADMIN_NOT_DEMO, Some(&admin)),
            Err(GateRejection::DemoAccount)
        );
        assert!(evaluate(ADMIN, Some(&admin)).is_ok());
    }

    #[test]
    fn test_first_failure_wins() {
        // Wrong role and demo: the role gate comes first.
        let demo_student = identity(AccountType::Student, true);
        assert!(matches!(
            evaluate(INSTRUCTOR_NOT_DEMO, Some(&demo_student)),
            Err(GateRejection::WrongRole { .. })
        ));

        // Same gates declared the other way round report the demo flag.
        let reversed = [
            Gate::Authenticated,
            Gate::NotDemo,
            Gate::Role(&[AccountType::Instructor]),
        ];
        assert_eq!(
            evaluate(&reversed, Some(&demo_student)),
            Err(GateRejection::DemoAccount)
        );
    }

    #[test]
    fn test_rejection_statuses() {
        let missing = GateRejection::Unauthenticated.into_app_error(&Credential::Missing);
        assert_eq!(missing.status, StatusCode::UNAUTHORIZED);
        assert_eq!(missing.error.to_string(), "Authentication required");

        let invalid = GateRejection::Unauthenticated.into_app_error(&Credential::Invalid);
        assert_eq!(invalid.error.to_string(), "Invalid or expired token");

        let role = GateRejection::WrongRole {
            allowed: &[AccountType::Instructor],
        }
        .into_app_error(&Credential::Missing);
        assert_eq!(role.status, StatusCode::FORBIDDEN);
        assert_eq!(
            role.error.to_string(),
            "This is a protected route for instructor accounts only"
        );

        let demo = GateRejection::DemoAccount.into_app_error(&Credential::Missing);
        assert_eq!(demo.status, StatusCode::FORBIDDEN);
    }

    #[test]
    fn test_gate_display() {
        assert_eq!(Gate::Authenticated.to_string(), "auth");
        assert_eq!(Gate::Role(&[AccountType::Admin]).to_string(), "admin");
        assert_eq!(Gate::NotDemo.to_string(), "demo-restricted");
    }
}
