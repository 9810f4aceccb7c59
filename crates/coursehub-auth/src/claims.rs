//! JWT claim structure for access tokens.

use coursehub_core::AccountType;
use serde::{Deserialize, Serialize};
use utoipa::ToSchema;
use uuid::Uuid;

/// Claims embedded in an access token.
///
/// - `sub`: user id
/// - `account_type`: the caller's role for route gates
/// - `is_demo`: demo accounts may read but not mutate
#[derive(Debug, Clone, Serialize, Deserialize, ToSchema)]
pub struct Claims {
    /// User ID (subject claim)
    pub sub: String,
    pub email: String,
    pub account_type: AccountType,
    #[serde(default)]
    pub is_demo: bool,
    /// Token expiration timestamp (Unix timestamp)
    pub exp: usize,
    /// Token issued-at timestamp (Unix timestamp)
    pub iat: usize,
}

impl Claims {
    /// Parses the subject back into a user id.
    pub fn user_id(&self) -> Option<Uuid> {
        Uuid::parse_str(&self.sub).ok()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_claims_serialize() {
        let claims = Claims {
            sub: "user-id-123".to_string(),
            email: "test@example.com".to_string(),
            account_type: AccountType::Instructor,
            is_demo: true,
            exp: 1234567890,
            iat: 1234567800,
        };
        let serialized = serde_json::to_string(&claims).unwrap();
        assert!(serialized.contains(r#""sub":"user-id-123""#));
        assert!(serialized.contains(r#""account_type":"Instructor""#));
        assert!(serialized.contains(r#""is_demo":true"#));
    }

    #[test]
    fn test_claims_deserialize_without_demo_flag() {
        let json = r#"{"sub":"user-id-456","email":"user@test.com","account_type":"Student","exp":9999999999,"iat":9999999900}"#;
        let claims: Claims = serde_json::from_str(json).unwrap();
        assert_eq!(claims.account_type, AccountType::Student);
        assert!(!claims.is_demo);
        assert_eq!(claims.exp, 9999999999);
    }

    #[test]
    fn test_user_id_parses_subject() {
        let id = Uuid::new_v4();
        let claims = Claims {
            sub: id.to_string(),
            email: "a@b.com".to_string(),
            account_type: AccountType::Admin,
            is_demo: false,
            exp: 0,
            iat: 0,
        };
        assert_eq!(claims.user_id(), Some(id));

        let bad = Claims {
            sub: "not-a-uuid".to_string(),
            ..claims
        };
        assert_eq!(bad.user_id(), None);
    }
}
