use serde::{Serialize, Serializer};

/// Text reported alongside a successful send.
pub const SENT_MESSAGE: &str = "SMS sent successfully";
/// Text reported alongside a failed send.
pub const FAILED_MESSAGE: &str = "Failed to send SMS";

/// Metadata returned by the provider for an accepted message. Either field may be absent.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct DeliveryReceipt {
    pub timestamp: Option<String>,
    pub code: Option<i64>,
}

/// Outcome of one send. Always well-formed, whatever went wrong underneath.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum SendResult {
    Sent {
        delivered_to: String,
        sent_from: String,
        provider_timestamp: Option<String>,
    },
    Failed {
        error_detail: String,
    },
}

impl SendResult {
    pub fn is_success(&self) -> bool {
        matches!(self, Self::Sent { .. })
    }

    pub fn delivered_to(&self) -> Option<&str> {
        match self {
            Self::Sent { delivered_to, .. } => Some(delivered_to),
            Self::Failed { .. } => None,
        }
    }

    pub fn sent_from(&self) -> Option<&str> {
        match self {
            Self::Sent { sent_from, .. } => Some(sent_from),
            Self::Failed { .. } => None,
        }
    }

    pub fn provider_timestamp(&self) -> Option<&str> {
        match self {
            Self::Sent {
                provider_timestamp, ..
            } => provider_timestamp.as_deref(),
            Self::Failed { .. } => None,
        }
    }

    pub fn error_detail(&self) -> Option<&str> {
        match self {
            Self::Sent { .. } => None,
            Self::Failed { error_detail } => Some(error_detail),
        }
    }
}

#[derive(Serialize)]
#[serde(untagged)]
enum SendResultJson<'a> {
    Sent {
        success: bool,
        message: &'static str,
        to: &'a str,
        from: &'a str,
        timestamp: &'a str,
    },
    Failed {
        success: bool,
        error: &'a str,
        message: &'static str,
    },
}

impl Serialize for SendResult {
    fn serialize<S: Serializer>(&self, serializer: S) -> Result<S::Ok, S::Error> {
        let json = match self {
            Self::Sent {
                delivered_to,
                sent_from,
                provider_timestamp,
            } => SendResultJson::Sent {
                success: true,
                message: SENT_MESSAGE,
                to: delivered_to,
                from: sent_from,
                timestamp: provider_timestamp.as_deref().unwrap_or_default(),
            },
            Self::Failed { error_detail } => SendResultJson::Failed {
                success: false,
                error: error_detail,
                message: FAILED_MESSAGE,
            },
        };
        json.serialize(serializer)
    }
}
