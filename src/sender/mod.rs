//! Sender: one login, one send, one [`SendResult`].

use std::future::Future;
use std::io::{self, Write};
use std::pin::Pin;

use tracing::{info, warn};

use crate::client::GoogleVoiceError;
use crate::domain::{
    DeliveryReceipt, Destination, Email, MessageText, Password, SendRequest, SendResult,
};

pub type BoxFuture<'a, T> = Pin<Box<dyn Future<Output = T> + Send + 'a>>;

/// Authenticated context for a single send.
///
/// Holds the account's `_rnr_se` form token; any cookies stay inside the provider's
/// HTTP client.
#[derive(Clone, PartialEq, Eq)]
pub struct Session {
    token: String,
}

impl Session {
    pub fn new(token: impl Into<String>) -> Self {
        Self {
            token: token.into(),
        }
    }

    pub fn token(&self) -> &str {
        &self.token
    }
}

impl std::fmt::Debug for Session {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("Session").finish_non_exhaustive()
    }
}

/// What a messaging provider has to offer for a send: log in, then deliver.
pub trait Provider: Send + Sync {
    fn authenticate<'a>(
        &'a self,
        email: &'a Email,
        password: &'a Password,
    ) -> BoxFuture<'a, Result<Session, GoogleVoiceError>>;

    fn dispatch<'a>(
        &'a self,
        session: &'a Session,
        destination: &'a Destination,
        body: &'a MessageText,
    ) -> BoxFuture<'a, Result<DeliveryReceipt, GoogleVoiceError>>;
}

impl<P: Provider + ?Sized> Provider for &P {
    fn authenticate<'a>(
        &'a self,
        email: &'a Email,
        password: &'a Password,
    ) -> BoxFuture<'a, Result<Session, GoogleVoiceError>> {
        (**self).authenticate(email, password)
    }

    fn dispatch<'a>(
        &'a self,
        session: &'a Session,
        destination: &'a Destination,
        body: &'a MessageText,
    ) -> BoxFuture<'a, Result<DeliveryReceipt, GoogleVoiceError>> {
        (**self).dispatch(session, destination, body)
    }
}

#[derive(Debug, Clone)]
pub struct Sender<P> {
    provider: P,
}

impl<P: Provider> Sender<P> {
    pub fn new(provider: P) -> Self {
        Self { provider }
    }

    pub async fn authenticate(
        &self,
        email: &Email,
        password: &Password,
    ) -> Result<Session, GoogleVoiceError> {
        self.provider.authenticate(email, password).await
    }

    pub async fn dispatch(
        &self,
        session: &Session,
        destination: &Destination,
        body: &MessageText,
    ) -> Result<DeliveryReceipt, GoogleVoiceError> {
        self.provider.dispatch(session, destination, body).await
    }

    /// Validate, log in and send, writing the progress trail to `out`.
    ///
    /// Every failure of the send itself ends up in [`SendResult::Failed`]; the `io::Error`
    /// side only reports that `out` could not be written.
    pub async fn send<W: Write>(
        &self,
        request: &SendRequest,
        out: &mut W,
    ) -> io::Result<SendResult> {
        writeln!(out, "Sending SMS to: {}", request.destination)?;
        writeln!(out, "Message: {}", request.body)?;
        writeln!(out, "From: {}", request.account_id)?;

        let result = match self.try_send(request, out).await? {
            Ok(receipt) => {
                info!(code = ?receipt.code, "message accepted");
                writeln!(out, "SMS sent successfully!")?;
                SendResult::Sent {
                    delivered_to: request.destination.clone(),
                    sent_from: request.account_id.clone(),
                    provider_timestamp: receipt.timestamp,
                }
            }
            Err(err) => {
                warn!(error = %err, "send failed");
                writeln!(out, "Error: {err}")?;
                failed(&err)
            }
        };
        Ok(result)
    }

    async fn try_send<W: Write>(
        &self,
        request: &SendRequest,
        out: &mut W,
    ) -> io::Result<Result<DeliveryReceipt, GoogleVoiceError>> {
        let validated = match request.validate() {
            Ok(validated) => validated,
            Err(err) => return Ok(Err(err.into())),
        };

        writeln!(out, "Logging into Google Voice...")?;
        let session = match self
            .authenticate(&validated.email, &validated.password)
            .await
        {
            Ok(session) => session,
            Err(err) => return Ok(Err(err)),
        };

        writeln!(out, "Sending SMS...")?;
        Ok(self
            .dispatch(&session, &validated.destination, &validated.body)
            .await)
    }
}

/// Map any error to a failed result with a non-empty detail.
pub fn failed(err: &dyn std::error::Error) -> SendResult {
    let detail = err.to_string();
    SendResult::Failed {
        error_detail: if detail.trim().is_empty() {
            format!("{err:?}")
        } else {
            detail
        },
    }
}
