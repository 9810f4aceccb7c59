use crate::middleware::gate::{AUTHENTICATED, STUDENT};
use crate::middleware::routes::RouteTable;

use super::controller::{capture_payment, send_payment_success_email, verify_payment};

pub fn payment_routes(routes: RouteTable) -> RouteTable {
    routes
        .post("/capturePayment", STUDENT, capture_payment)
        .post("/verifyPayment", AUTHENTICATED, verify_payment)
        .post("/sendPaymentSuccessEmail", AUTHENTICATED, send_payment_success_email)
}
