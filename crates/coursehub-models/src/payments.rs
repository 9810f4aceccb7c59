//! Payment orders and verification payloads.

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use sqlx::FromRow;
use utoipa::ToSchema;
use uuid::Uuid;
use validator::Validate;

use crate::ids::{CourseId, UserId};

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize, sqlx::Type, ToSchema)]
#[sqlx(type_name = "payment_status", rename_all = "lowercase")]
pub enum PaymentStatus {
    Created,
    Verified,
}

/// A gateway order as stored locally.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize, FromRow, ToSchema)]
pub struct Payment {
    pub id: Uuid,
    pub user_id: UserId,
    pub order_id: String,
    pub payment_id: Option<String>,
    /// Amount in minor currency units
    pub amount: i64,
    pub currency: String,
    pub course_ids: Vec<CourseId>,
    pub status: PaymentStatus,
    pub created_at: DateTime<Utc>,
    pub updated_at: DateTime<Utc>,
}

/// Order returned by the payment gateway.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize, ToSchema)]
pub struct GatewayOrder {
    pub id: String,
    /// Amount in minor currency units
    pub amount: i64,
    pub currency: String,
    #[serde(default)]
    pub receipt: Option<String>,
    #[serde(default)]
    pub status: Option<String>,
}

#[derive(Debug, Clone, Deserialize, Validate, ToSchema)]
pub struct CapturePaymentDto {
    #[validate(length(min = 1, message = "Please provide at least one course"))]
    pub courses: Vec<CourseId>,
}

#[derive(Debug, Clone, Serialize, Deserialize, ToSchema)]
pub struct CapturePaymentResponse {
    pub order: GatewayOrder,
    /// Public key id the checkout widget needs
    pub key_id: String,
}

#[derive(Debug, Clone, Deserialize, Validate, ToSchema)]
pub struct VerifyPaymentDto {
    #[serde(alias = "razorpay_order_id")]
    #[validate(length(min = 1))]
    pub order_id: String,
    #[serde(alias = "razorpay_payment_id")]
    #[validate(length(min = 1))]
    pub payment_id: String,
    #[serde(alias = "razorpay_signature")]
    #[validate(length(min = 1))]
    pub signature: String,
    #[validate(length(min = 1, message = "Please provide at least one course"))]
    pub courses: Vec<CourseId>,
}

#[derive(Debug, Clone, Serialize, Deserialize, ToSchema)]
pub struct VerifyPaymentResponse {
    pub message: String,
    pub enrolled_courses: Vec<CourseId>,
}

#[derive(Debug, Clone, Deserialize, Validate, ToSchema)]
pub struct PaymentSuccessEmailDto {
    #[validate(length(min = 1))]
    pub order_id: String,
    #[validate(length(min = 1))]
    pub payment_id: String,
    /// Amount in minor currency units
    #[validate(range(min = 0))]
    pub amount: i64,
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_verify_payment_accepts_gateway_field_names() {
        let json = r#"{
            "razorpay_order_id": "order_1",
            "razorpay_payment_id": "pay_1",
            "razorpay_signature": "abc",
            "courses": ["5f1e0f5e-8f3c-4f38-9e58-3b1c3a3e9d11"]
        }"#;
        let dto: VerifyPaymentDto = serde_json::from_str(json).unwrap();
        assert_eq!(dto.order_id, "order_1");
        assert_eq!(dto.payment_id, "pay_1");
        assert!(dto.validate().is_ok());
    }

    #[test]
    fn test_capture_requires_courses() {
        let dto = CapturePaymentDto { courses: vec![] };
        assert!(dto.validate().is_err());
    }

    #[test]
    fn test_gateway_order_tolerates_missing_fields() {
        let order: GatewayOrder =
            serde_json::from_str(r#"{"id":"order_9","amount":49900,"currency":"INR"}"#).unwrap();
        assert_eq!(order.amount, 49900);
        assert!(order.receipt.is_none());
    }
}
