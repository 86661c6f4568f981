use rowgate_api::{DecodedRecord, Value};

/// Разложить декодированную запись по списку полей.
///
/// Порядок и длина результата совпадают с `fields`; отсутствующее поле
/// становится `Value::Null`, чтобы запись без опциональной колонки
/// всё равно вставлялась.
pub fn project(fields: &[String], record: &DecodedRecord) -> Vec<Value> {
    fields.iter().map(|f| record.get_or_null(f)).collect()
}

#[cfg(test)]
mod tests {
    use super::*;
    use codec_json::JsonDecoder;
    use rowgate_api::Decoder;

    fn fields(names: &[&str]) -> Vec<String> {
        names.iter().map(|s| s.to_string()).collect()
    }

    #[test]
    fn follows_field_order_and_fills_nulls() {
        let record = JsonDecoder.decode(br#"{"b": "x", "a": 1, "extra": true}"#).unwrap();
        let values = project(&fields(&["a", "missing", "b"]), &record);
        assert_eq!(values, vec![Value::Int(1), Value::Null, Value::Text("x".into())]);
    }

    #[test]
    fn length_always_matches_fields() {
        for input in [&br#"{}"#[..], br#"{"a": null}"#, br#"{"z": 1, "y": 2}"#] {
            let record = JsonDecoder.decode(input).unwrap();
            let names = fields(&["a", "b", "c"]);
            assert_eq!(project(&names, &record).len(), names.len());
        }
    }
}
