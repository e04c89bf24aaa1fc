//! Send a single SMS through a Google Voice account.
//!
//! The crate is layered the usual way: a domain layer of strong types, a transport layer
//! for wire-format quirks, a client layer talking HTTP, and a [`Sender`] that turns one
//! login plus one send into exactly one [`SendResult`]. The `send_sms` binary wraps all of
//! it in a four-argument CLI that prints the result as JSON.
//!
//! ```rust,no_run
//! use gvoice_sms::{GoogleVoiceClient, SendRequest, Sender};
//!
//! #[tokio::main(flavor = "current_thread")]
//! async fn main() -> Result<(), Box<dyn std::error::Error>> {
//!     let sender = Sender::new(GoogleVoiceClient::new()?);
//!     let request = SendRequest::new("6125551234", "hello", "user@example.com", "app-password");
//!     let result = sender.send(&request, &mut std::io::stdout()).await?;
//!     println!("{}", serde_json::to_string_pretty(&result)?);
//!     Ok(())
//! }
//! ```
#![forbid(unsafe_code)]

pub mod cli;
pub mod client;
pub mod domain;
pub mod sender;
mod transport;

pub use client::{GoogleVoiceClient, GoogleVoiceClientBuilder, GoogleVoiceError};
pub use domain::{
    DeliveryReceipt, Destination, Email, MessageText, Password, PhoneNumber, SendRequest,
    SendResult, ValidationError,
};
pub use sender::{Provider, Sender, Session};
