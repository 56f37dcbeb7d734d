//! External collaborators: payment provider, email dispatch and document
//! rendering. Each sits behind a trait with a production implementation and a
//! development/test implementation.

pub mod notifier;
pub mod paypal;
pub mod reports;

pub use notifier::{
    send_best_effort, ConsoleNotifier, EmailAttachment, EmailMessage, Notifier, SmtpNotifier,
};
pub use paypal::{CaptureOutcome, MockPaymentProcessor, PayPalGateway, PaymentProcessor};
pub use reports::{expense_report_csv, revenue_report_csv, ReceiptRenderer, TextReceiptRenderer};
