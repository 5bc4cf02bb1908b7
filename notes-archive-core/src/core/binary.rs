//! Base64 serde adapters for binary metadata fields.

use base64::engine::general_purpose::STANDARD;
use base64::Engine;
use serde::de::{Deserializer, Error as DeError};
use serde::ser::Serializer;
use serde::Deserialize;

pub fn serialize<S>(bytes: &[u8], serializer: S) -> Result<S::Ok, S::Error>
where
    S: Serializer,
{
    serializer.serialize_str(&STANDARD.encode(bytes))
}

pub fn deserialize<'de, D>(deserializer: D) -> Result<Vec<u8>, D::Error>
where
    D: Deserializer<'de>,
{
    let text = String::deserialize(deserializer)?;
    STANDARD
        .decode(text.as_bytes())
        .map_err(|e| D::Error::custom(format!("invalid base64 data: {e}")))
}

/// The same encoding for `Option<Vec<u8>>`; pair with `skip_serializing_if`.
pub mod optional {
    use super::*;

    pub fn serialize<S>(bytes: &Option<Vec<u8>>, serializer: S) -> Result<S::Ok, S::Error>
    where
        S: Serializer,
    {
        match bytes {
            Some(bytes) => super::serialize(bytes, serializer),
            None => serializer.serialize_none(),
        }
    }

    pub fn deserialize<'de, D>(deserializer: D) -> Result<Option<Vec<u8>>, D::Error>
    where
        D: Deserializer<'de>,
    {
        let text = Option::<String>::deserialize(deserializer)?;
        text.map(|text| {
            STANDARD
                .decode(text.as_bytes())
                .map_err(|e| D::Error::custom(format!("invalid base64 data: {e}")))
        })
        .transpose()
    }
}

#[cfg(test)]
mod tests {
    use serde::{Deserialize, Serialize};

    #[derive(Debug, PartialEq, Serialize, Deserialize)]
    struct Envelope {
        #[serde(with = "super")]
        salt: Vec<u8>,
        #[serde(default, with = "super::optional", skip_serializing_if = "Option::is_none")]
        data: Option<Vec<u8>>,
    }

    #[test]
    fn test_bytes_are_base64_strings() {
        let envelope = Envelope {
            salt: b"salt".to_vec(),
            data: None,
        };
        let json = serde_json::to_string(&envelope).unwrap();
        assert_eq!(json, r#"{"salt":"c2FsdA=="}"#);
        assert_eq!(serde_json::from_str::<Envelope>(&json).unwrap(), envelope);
    }

    #[test]
    fn test_optional_bytes_round_trip() {
        let json = r#"{"salt":"","data":"AAEC"}"#;
        let envelope: Envelope = serde_json::from_str(json).unwrap();
        assert_eq!(envelope.data, Some(vec![0, 1, 2]));
        assert!(envelope.salt.is_empty());
    }

    #[test]
    fn test_invalid_base64_is_rejected() {
        assert!(serde_json::from_str::<Envelope>(r#"{"salt":"not base64!"}"#).is_err());
    }
}
