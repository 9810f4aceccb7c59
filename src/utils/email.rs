//! Transactional email.
//!
//! Messages go out over SMTP with a plain-text part and an HTML part. When
//! email is disabled in configuration the message is logged and dropped.

use lettre::message::{MultiPart, SinglePart, header};
use lettre::transport::smtp::authentication::Credentials;
use lettre::{Message, SmtpTransport, Transport};
use tracing::{info, instrument};

use coursehub_config::EmailConfig;
use coursehub_core::AppError;

#[derive(Clone, Debug)]
pub struct EmailService {
    config: EmailConfig,
}

/// Escapes text for interpolation into HTML bodies.
fn escape_html(input: &str) -> String {
    let mut out = String::with_capacity(input.len());
    for c in input.chars() {
        match c {
            '&' => out.push_str("&amp;"),
            '<' => out.push_str("&lt;"),
            '>' => out.push_str("&gt;"),
            '"' => out.push_str("&quot;"),
            '\'' => out.push_str("&#39;"),
            _ => out.push(c),
        }
    }
    out
}

/// Formats an amount in minor units as `12.34`.
fn format_minor_units(amount: i64) -> String {
    let sign = if amount < 0 { "-" } else { "" };
    let abs = amount.unsigned_abs();
    format!("{}{}.{:02}", sign, abs / 100, abs % 100)
}

impl EmailService {
    pub fn new(config: EmailConfig) -> Self {
        Self { config }
    }

    #[instrument(skip(self))]
    pub async fn send_course_enrollment_email(
        &self,
        to_email: &str,
        to_name: &str,
        course_name: &str,
    ) -> Result<(), AppError> {
        let dashboard = format!("{}/dashboard/enrolled-courses", self.config.frontend_url);
        let text_body = format!(
            "Hi {},\n\n\
             You are now enrolled in \"{}\".\n\n\
             Start learning from your dashboard: {}\n\n\
             Happy learning,\n\
             CourseHub Team",
            to_name, course_name, dashboard
        );
        let html_body = self.layout(
            "Course Registration Confirmation",
            &format!(
                r#"<p>Hi <strong>{}</strong>,</p>
<p>You are now enrolled in <strong>{}</strong>.</p>
<p><a href="{}" style="display: inline-block; padding: 12px 32px; background-color: #FFD60A; color: #000814; text-decoration: none; border-radius: 6px; font-weight: bold;">Go to Dashboard</a></p>"#,
                escape_html(to_name),
                escape_html(course_name),
                dashboard
            ),
        );

        self.send_email(
            to_email,
            &format!("Successfully enrolled in {}", course_name),
            &text_body,
            &html_body,
        )
        .await
    }

    #[instrument(skip(self))]
    pub async fn send_payment_success_email(
        &self,
        to_email: &str,
        to_name: &str,
        amount_minor: i64,
        currency: &str,
        order_id: &str,
        payment_id: &str,
    ) -> Result<(), AppError> {
        let amount = format!("{} {}", currency, format_minor_units(amount_minor));
        let text_body = format!(
            "Hi {},\n\n\
             We have received your payment of {}.\n\n\
             Order ID: {}\n\
             Payment ID: {}\n\n\
             Thank you,\n\
             CourseHub Team",
            to_name, amount, order_id, payment_id
        );
        let html_body = self.layout(
            "Payment Received",
            &format!(
                r#"<p>Hi <strong>{}</strong>,</p>
<p>We have received your payment of <strong>{}</strong>.</p>
<p>Order ID: <code>{}</code><br>Payment ID: <code>{}</code></p>"#,
                escape_html(to_name),
                escape_html(&amount),
                escape_html(order_id),
                escape_html(payment_id)
            ),
        );

        self.send_email(to_email, "Payment Received", &text_body, &html_body)
            .await
    }

    #[instrument(skip(self, message))]
    pub async fn send_contact_confirmation(
        &self,
        to_email: &str,
        to_name: &str,
        message: &str,
    ) -> Result<(), AppError> {
        let text_body = format!(
            "Hi {},\n\n\
             Thanks for reaching out. We received your message and will get back to you soon.\n\n\
             Your message:\n{}\n\n\
             CourseHub Team",
            to_name, message
        );
        let html_body = self.layout(
            "We received your message",
            &format!(
                r#"<p>Hi <strong>{}</strong>,</p>
<p>Thanks for reaching out. We received your message and will get back to you soon.</p>
<blockquote style="margin: 0; padding: 12px 16px; background-color: #f4f4f4; border-left: 4px solid #FFD60A;">{}</blockquote>"#,
                escape_html(to_name),
                escape_html(message)
            ),
        );

        self.send_email(to_email, "Your message has been received", &text_body, &html_body)
            .await
    }

    #[instrument(skip(self, html_body, text_body))]
    async fn send_email(
        &self,
        to_email: &str,
        subject: &str,
        text_body: &str,
        html_body: &str,
    ) -> Result<(), AppError> {
        if !self.config.enabled {
            info!(to = %to_email, subject = %subject, "Email delivery disabled, skipping send");
            return Ok(());
        }

        let from = format!("{} <{}>", self.config.from_name, self.config.from_email);

        let email = Message::builder()
            .from(
                from.parse()
                    .map_err(|e| AppError::internal_error(format!("Invalid from email: {}", e)))?,
            )
            .to(to_email
                .parse()
                .map_err(|e| AppError::internal_error(format!("Invalid to email: {}", e)))?)
            .subject(subject)
            .multipart(
                MultiPart::alternative()
                    .singlepart(
                        SinglePart::builder()
                            .header(header::ContentType::TEXT_PLAIN)
                            .body(text_body.to_string()),
                    )
                    .singlepart(
                        SinglePart::builder()
                            .header(header::ContentType::TEXT_HTML)
                            .body(html_body.to_string()),
                    ),
            )
            .map_err(|e| AppError::internal_error(format!("Failed to build email: {}", e)))?;

        let mailer = if self.config.smtp_username.is_empty() {
            SmtpTransport::builder_dangerous(&self.config.smtp_host)
                .port(self.config.smtp_port)
                .build()
        } else {
            let creds = Credentials::new(
                self.config.smtp_username.clone(),
                self.config.smtp_password.clone(),
            );

            SmtpTransport::relay(&self.config.smtp_host)
                .map_err(|e| {
                    AppError::internal_error(format!("Failed to create SMTP relay: {}", e))
                })?
                .port(self.config.smtp_port)
                .credentials(creds)
                .build()
        };

        tokio::task::spawn_blocking(move || mailer.send(&email))
            .await
            .map_err(|e| AppError::internal_error(format!("Task join error: {}", e)))?
            .map_err(|e| AppError::internal_error(format!("Failed to send email: {}", e)))?;

        info!(to = %to_email, subject = %subject, "Email sent");
        Ok(())
    }

    fn layout(&self, title: &str, content: &str) -> String {
        format!(
            r#"<!DOCTYPE html>
<html lang="en">
<head>
    <meta charset="UTF-8">
    <meta name="viewport" content="width=device-width, initial-scale=1.0">
    <title>{title}</title>
</head>
<body style="margin: 0; padding: 0; font-family: Arial, sans-serif; background-color: #f4f4f4;">
    <table width="100%" cellpadding="0" cellspacing="0" style="background-color: #f4f4f4; padding: 20px;">
        <tr>
            <td align="center">
                <table width="600" cellpadding="0" cellspacing="0" style="background-color: #ffffff; border-radius: 8px; overflow: hidden;">
                    <tr>
                        <td style="background-color: #000814; padding: 24px; text-align: center;">
                            <h1 style="margin: 0; color: #FFD60A; font-size: 26px;">CourseHub</h1>
                        </td>
                    </tr>
                    <tr>
                        <td style="padding: 32px 30px; color: #333333; font-size: 16px; line-height: 1.5;">
                            <h2 style="margin: 0 0 16px 0; font-size: 22px;">{title}</h2>
                            {content}
                        </td>
                    </tr>
                    <tr>
                        <td style="background-color: #f8f9fa; padding: 16px 30px; text-align: center; color: #999999; font-size: 12px;">
                            Questions? Write to <a href="mailto:{support}">{support}</a>
                        </td>
                    </tr>
                </table>
            </td>
        </tr>
    </table>
</body>
</html>"#,
            title = title,
            content = content,
            support = self.config.from_email,
        )
    }
}
