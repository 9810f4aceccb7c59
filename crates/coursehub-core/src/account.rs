//! Account types.
//!
//! Every user has exactly one account type. It is stored as the Postgres
//! enum `account_type` and serialized on the wire as `"Admin"`,
//! `"Instructor"` or `"Student"`.

use std::fmt;
use std::str::FromStr;

use serde::{Deserialize, Serialize};
use utoipa::ToSchema;

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize, sqlx::Type, ToSchema)]
#[sqlx(type_name = "account_type", rename_all = "lowercase")]
pub enum AccountType {
    Admin,
    Instructor,
    Student,
}

impl AccountType {
    pub const fn as_str(&self) -> &'static str {
        match self {
            AccountType::Admin => "Admin",
            AccountType::Instructor => "Instructor",
            AccountType::Student => "Student",
        }
    }

    /// Account types a visitor may pick at signup. Admins are CLI-only.
    pub const fn is_self_service(&self) -> bool {
        matches!(self, AccountType::Instructor | AccountType::Student)
    }
}

impl fmt::Display for AccountType {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

impl FromStr for AccountType {
    type Err = String;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.to_ascii_lowercase().as_str() {
            "admin" => Ok(AccountType::Admin),
            "instructor" => Ok(AccountType::Instructor),
            "student" => Ok(AccountType::Student),
            other => Err(format!("Unknown account type: {}", other)),
        }
    }
}
