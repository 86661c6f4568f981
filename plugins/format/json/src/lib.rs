use rowgate_api::{DecodedRecord, Decoder, PluginError, Value};

/// Имя кодировки в конфигурации ресурса.
pub const ENCODING: &str = "JSON";

/// Self-describing object format: одна запись = один JSON объект.
pub struct JsonDecoder;

impl Decoder for JsonDecoder {
    fn encoding(&self) -> &str {
        ENCODING
    }

    fn decode(&self, data: &[u8]) -> Result<DecodedRecord, PluginError> {
        let s = std::str::from_utf8(data)?;
        match serde_json::from_str::<serde_json::Value>(s)? {
            serde_json::Value::Object(map) => Ok(map
                .into_iter()
                .map(|(name, value)| (name, Value::from_json(value)))
                .collect()),
            other => Err(PluginError::decode(format!(
                "JSON record must be an object, got {}",
                kind_of(&other)
            ))),
        }
    }
}

fn kind_of(value: &serde_json::Value) -> &'static str {
    match value {
        serde_json::Value::Null => "null",
        serde_json::Value::Bool(_) => "boolean",
        serde_json::Value::Number(_) => "number",
        serde_json::Value::String(_) => "string",
        serde_json::Value::Array(_) => "array",
        serde_json::Value::Object(_) => "object",
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use rowgate_api::ErrorKind;

    #[test]
    fn decodes_object_fields() {
        let record = JsonDecoder
            .decode(br#"{"id": 7, "name": "ada", "active": true, "score": 2.5, "note": null}"#)
            .unwrap();
        assert_eq!(record.len(), 5);
        assert_eq!(record.get("id"), Some(&Value::Int(7)));
        assert_eq!(record.get("name"), Some(&Value::Text("ada".into())));
        assert_eq!(record.get("active"), Some(&Value::Bool(true)));
        assert_eq!(record.get("score"), Some(&Value::Float(2.5)));
        assert_eq!(record.get("note"), Some(&Value::Null));
    }

    #[test]
    fn rejects_malformed_bytes() {
        let err = JsonDecoder.decode(b"{\"id\": ").unwrap_err();
        assert_eq!(err.kind(), ErrorKind::Decode);

        let err = JsonDecoder.decode(&[0xff, 0xfe]).unwrap_err();
        assert_eq!(err.kind(), ErrorKind::Decode);
    }

    #[test]
    fn rejects_non_object_documents() {
        let err = JsonDecoder.decode(b"[1, 2, 3]").unwrap_err();
        assert_eq!(err.kind(), ErrorKind::Decode);
        assert!(err.message().contains("array"), "{err}");
    }
}
