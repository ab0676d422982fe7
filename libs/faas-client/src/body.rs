use std::fmt;

use bytes::Bytes;
use serde::Serialize;

use crate::error::ClientError;

/// Payload of an invoke request, or the input handed to the next step of a
/// composition.
///
/// `Empty` is "no data". An empty string is `Bytes` of length zero; both go
/// out as a zero-length body.
#[derive(Clone, Default, PartialEq, Eq)]
pub enum Body {
    #[default]
    Empty,
    Bytes(Bytes),
}

// Payloads may carry user data; only the size is logged.
impl fmt::Debug for Body {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Body::Empty => f.write_str("Body(none)"),
            Body::Bytes(bytes) => write!(f, "Body({} bytes)", bytes.len()),
        }
    }
}

impl Body {
    /// Serialize `value` as compact JSON.
    ///
    /// # Errors
    /// Returns `ClientError::Serialization` if `value` cannot be encoded.
    pub fn from_json<T: Serialize>(value: &T) -> Result<Self, ClientError> {
        Ok(serde_json::to_vec(value)?.into())
    }

    /// True only for "no data"; a zero-length payload is not empty.
    #[must_use]
    pub fn is_empty(&self) -> bool {
        matches!(self, Body::Empty)
    }

    #[must_use]
    pub fn as_bytes(&self) -> &[u8] {
        match self {
            Body::Empty => &[],
            Body::Bytes(bytes) => bytes,
        }
    }
}

impl From<()> for Body {
    fn from((): ()) -> Self {
        Body::Empty
    }
}

impl From<Bytes> for Body {
    fn from(bytes: Bytes) -> Self {
        Body::Bytes(bytes)
    }
}

impl From<Vec<u8>> for Body {
    fn from(bytes: Vec<u8>) -> Self {
        Bytes::from(bytes).into()
    }
}

impl From<String> for Body {
    fn from(text: String) -> Self {
        text.into_bytes().into()
    }
}

impl From<&str> for Body {
    fn from(text: &str) -> Self {
        text.to_owned().into()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;

    #[test]
    fn empty_string_is_a_payload() {
        let body = Body::from("");
        assert!(!body.is_empty());
        assert_eq!(body.as_bytes(), b"");
    }

    #[test]
    fn unit_is_no_data() {
        assert!(Body::from(()).is_empty());
        assert_eq!(Body::default(), Body::Empty);
    }

    #[test]
    fn json_body_is_compact() {
        let body = Body::from_json(&json!({"data": "thing"})).unwrap();
        assert_eq!(body.as_bytes(), br#"{"data":"thing"}"#);
    }

    #[test]
    fn debug_shows_only_the_size() {
        assert_eq!(format!("{:?}", Body::from("secret payload")), "Body(14 bytes)");
        assert_eq!(format!("{:?}", Body::Empty), "Body(none)");
    }
}
