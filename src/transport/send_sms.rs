use serde::Deserialize;

use super::login::RNR_SE_FIELD;
use crate::domain::{DeliveryReceipt, Destination, MessageText};

#[derive(Debug, thiserror::Error)]
pub enum TransportError {
    #[error("invalid JSON response: {0}")]
    Json(#[from] serde_json::Error),
}

/// Decoded `sms/send` reply.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum SendOutcome {
    Accepted(DeliveryReceipt),
    Rejected { code: Option<i64> },
}

#[derive(Debug, Clone, Deserialize)]
struct SendSmsJsonResponse {
    #[serde(default)]
    ok: bool,
    #[serde(default)]
    data: Option<SendSmsJsonData>,
    #[serde(default)]
    timestamp: Option<TransportTimestamp>,
}

#[derive(Debug, Clone, Deserialize)]
struct SendSmsJsonData {
    #[serde(default)]
    code: Option<i64>,
}

#[derive(Debug, Clone, Deserialize)]
#[serde(untagged)]
enum TransportTimestamp {
    String(String),
    Number(serde_json::Number),
}

impl TransportTimestamp {
    fn into_string(self) -> String {
        match self {
            Self::String(value) => value,
            Self::Number(value) => value.to_string(),
        }
    }
}

pub fn encode_send_sms_form(
    rnr_se: &str,
    destination: &Destination,
    text: &MessageText,
) -> Vec<(String, String)> {
    vec![
        ("id".to_owned(), String::new()),
        (Destination::FIELD.to_owned(), destination.normalized()),
        (MessageText::FIELD.to_owned(), text.as_str().to_owned()),
        (RNR_SE_FIELD.to_owned(), rnr_se.to_owned()),
    ]
}

pub fn decode_send_sms_json_response(json: &str) -> Result<SendOutcome, TransportError> {
    // An empty reply carries no rejection, so it counts as an empty receipt.
    if json.trim().is_empty() {
        return Ok(SendOutcome::Accepted(DeliveryReceipt::default()));
    }

    let parsed: SendSmsJsonResponse = serde_json::from_str(json)?;
    let code = parsed.data.and_then(|data| data.code);
    if !parsed.ok {
        return Ok(SendOutcome::Rejected { code });
    }

    Ok(SendOutcome::Accepted(DeliveryReceipt {
        timestamp: parsed.timestamp.map(TransportTimestamp::into_string),
        code,
    }))
}
