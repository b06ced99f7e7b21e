//! Inbound callback values as they arrive on the wire.

use serde::{Deserialize, Serialize};

/// An encrypted message callback, as POSTed by the platform.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct CallbackEnvelope {
    /// Signature over token, timestamp, nonce and content.
    #[serde(rename = "sig")]
    pub signature: String,
    #[serde(rename = "timeStamp")]
    pub timestamp: String,
    pub nonce: String,
    /// Base64 ciphertext.
    pub content: String,
}

/// Query parameters of an identity-carrying redirect.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct UrlValidationParams {
    /// Signature over token, timestamp, nonce and code.
    #[serde(rename = "codeSig")]
    pub code_signature: String,
    pub timestamp: String,
    pub nonce: String,
    /// Short-lived identity code.
    pub code: String,
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_envelope_uses_platform_field_names() {
        let json = r#"{"sig":"abc","timeStamp":"1609459200","nonce":"n1","content":"Y2lwaGVy"}"#;
        let envelope: CallbackEnvelope = serde_json::from_str(json).unwrap();
        assert_eq!(envelope.signature, "abc");
        assert_eq!(envelope.timestamp, "1609459200");
        assert_eq!(envelope.nonce, "n1");
        assert_eq!(envelope.content, "Y2lwaGVy");
    }

    #[test]
    fn test_envelope_missing_field_is_rejected() {
        let json = r#"{"sig":"abc","nonce":"n1","content":"Y2lwaGVy"}"#;
        assert!(serde_json::from_str::<CallbackEnvelope>(json).is_err());
    }

    #[test]
    fn test_url_params_use_platform_field_names() {
        let json = r#"{"codeSig":"abc","timestamp":"1609459200","nonce":"n1","code":"C0DE"}"#;
        let params: UrlValidationParams = serde_json::from_str(json).unwrap();
        assert_eq!(params.code_signature, "abc");
        assert_eq!(params.code, "C0DE");
    }
}
