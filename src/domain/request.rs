use crate::domain::validation::ValidationError;
use crate::domain::value::{Destination, Email, MessageText, Password};

/// One send, exactly as the caller supplied it.
///
/// Fields are kept verbatim so the result can echo them back; validation happens in
/// [`SendRequest::validate`].
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct SendRequest {
    pub destination: String,
    pub body: String,
    pub account_id: String,
    pub account_secret: String,
}

/// A [`SendRequest`] whose fields passed domain validation.
#[derive(Debug, Clone)]
pub struct ValidatedSend {
    pub destination: Destination,
    pub body: MessageText,
    pub email: Email,
    pub password: Password,
}

impl SendRequest {
    pub fn new(
        destination: impl Into<String>,
        body: impl Into<String>,
        account_id: impl Into<String>,
        account_secret: impl Into<String>,
    ) -> Self {
        Self {
            destination: destination.into(),
            body: body.into(),
            account_id: account_id.into(),
            account_secret: account_secret.into(),
        }
    }

    /// Validate every field, reporting the first one that fails.
    pub fn validate(&self) -> Result<ValidatedSend, ValidationError> {
        Ok(ValidatedSend {
            destination: Destination::new(self.destination.as_str())?,
            body: MessageText::new(self.body.as_str())?,
            email: Email::new(self.account_id.as_str())?,
            password: Password::new(self.account_secret.as_str())?,
        })
    }
}
