//! Success response envelope.
//!
//! Every 2xx body has the shape `{"success": true, "message"?, "data"?}`;
//! failures are rendered by the error adapter with `success: false`.

use serde::Serialize;
use utoipa::ToSchema;

/// JSON envelope wrapping successful responses.
#[derive(Debug, Clone, Serialize, ToSchema)]
pub struct Envelope<T: Serialize> {
    /// Always true for this type.
    pub success: bool,
    /// Optional human-readable outcome description.
    #[serde(skip_serializing_if = "Option::is_none")]
    pub message: Option<String>,
    /// Payload of the operation, when it produces one.
    #[serde(skip_serializing_if = "Option::is_none")]
    pub data: Option<T>,
}

impl<T: Serialize> Envelope<T> {
    /// Envelope carrying only a payload.
    pub fn data(data: T) -> Self {
        Self {
            success: true,
            message: None,
            data: Some(data),
        }
    }

    /// Envelope carrying a message and a payload.
    pub fn with_message(message: impl Into<String>, data: T) -> Self {
        Self {
            success: true,
            message: Some(message.into()),
            data: Some(data),
        }
    }
}

impl Envelope<()> {
    /// Envelope carrying only a message.
    pub fn message(message: impl Into<String>) -> Self {
        Self {
            success: true,
            message: Some(message.into()),
            data: None,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn data_only_envelope_omits_message() {
        let body = serde_json::to_value(Envelope::data(vec![1, 2])).expect("serialize");
        assert_eq!(body, serde_json::json!({ "success": true, "data": [1, 2] }));
    }

    #[test]
    fn message_only_envelope_omits_data() {
        let body = serde_json::to_value(Envelope::message("Trip deleted")).expect("serialize");
        assert_eq!(
            body,
            serde_json::json!({ "success": true, "message": "Trip deleted" })
        );
    }
}
