use crate::env::string_or;

/// Credentials for the hosted payment gateway.
///
/// The key secret doubles as the HMAC key for payment signatures.
#[derive(Clone, Debug)]
pub struct PaymentConfig {
    pub key_id: String,
    pub key_secret: String,
    pub currency: String,
    pub api_base: String,
}

impl PaymentConfig {
    pub fn from_env() -> Self {
        Self {
            key_id: string_or("PAYMENT_KEY_ID", "rzp_test_key"),
            key_secret: string_or("PAYMENT_KEY_SECRET", "rzp_test_secret"),
            currency: string_or("PAYMENT_CURRENCY", "INR"),
            api_base: string_or("PAYMENT_API_BASE", "https://api.razorpay.com"),
        }
    }
}
