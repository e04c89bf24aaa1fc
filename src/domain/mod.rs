//! Domain layer: strong types with validation and invariants (no I/O).

mod request;
mod response;
mod validation;
mod value;

pub use request::{SendRequest, ValidatedSend};
pub use response::{DeliveryReceipt, FAILED_MESSAGE, SENT_MESSAGE, SendResult};
pub use validation::ValidationError;
pub use value::{DEFAULT_REGION, Destination, Email, MessageText, Password, PhoneNumber};
