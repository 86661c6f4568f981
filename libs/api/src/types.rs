use std::collections::HashMap;

// ════════════════════════════════════════════════════════════════
//  Value
// ════════════════════════════════════════════════════════════════

/// Скалярное значение поля декодированной записи.
///
/// Закрытый набор вариантов: строка, число, boolean, null. Числа
/// хранятся в том виде, в который помещается исходный литерал, чтобы
/// большие целые не теряли точность при передаче в storage.
#[derive(Debug, Clone, PartialEq)]
pub enum Value {
    Null,
    Bool(bool),
    Int(i64),
    UInt(u64),
    Float(f64),
    Text(String),
}

impl Value {
    pub fn is_null(&self) -> bool {
        matches!(self, Value::Null)
    }

    /// Построить Value из произвольного JSON значения.
    ///
    /// Массивы и объекты не являются скалярами: они передаются как
    /// компактная JSON-строка (подходит для JSON/TEXT колонок).
    pub fn from_json(value: serde_json::Value) -> Self {
        match value {
            serde_json::Value::Null => Value::Null,
            serde_json::Value::Bool(b) => Value::Bool(b),
            serde_json::Value::Number(n) => {
                if let Some(i) = n.as_i64() {
                    Value::Int(i)
                } else if let Some(u) = n.as_u64() {
                    Value::UInt(u)
                } else {
                    // serde_json без arbitrary_precision всегда отдаёт f64
                    Value::Float(n.as_f64().unwrap_or(f64::NAN))
                }
            }
            serde_json::Value::String(s) => Value::Text(s),
            nested @ (serde_json::Value::Array(_) | serde_json::Value::Object(_)) => {
                Value::Text(nested.to_string())
            }
        }
    }
}

impl std::fmt::Display for Value {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            Value::Null => f.write_str("NULL"),
            Value::Bool(b) => write!(f, "{b}"),
            Value::Int(i) => write!(f, "{i}"),
            Value::UInt(u) => write!(f, "{u}"),
            Value::Float(x) => write!(f, "{x}"),
            Value::Text(s) => write!(f, "{s:?}"),
        }
    }
}

impl From<&str> for Value {
    fn from(s: &str) -> Self {
        Value::Text(s.to_string())
    }
}

impl From<String> for Value {
    fn from(s: String) -> Self {
        Value::Text(s)
    }
}

impl From<i64> for Value {
    fn from(i: i64) -> Self {
        Value::Int(i)
    }
}

impl From<bool> for Value {
    fn from(b: bool) -> Self {
        Value::Bool(b)
    }
}

// ════════════════════════════════════════════════════════════════
//  DecodedRecord
// ════════════════════════════════════════════════════════════════

/// Результат декодирования одной записи: имя поля → значение.
///
/// Создаётся заново для каждой входной записи и отбрасывается после
/// проекции/запроса.
#[derive(Debug, Clone, Default, PartialEq)]
pub struct DecodedRecord {
    fields: HashMap<String, Value>,
}

impl DecodedRecord {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn insert(&mut self, name: impl Into<String>, value: Value) {
        self.fields.insert(name.into(), value);
    }

    pub fn get(&self, name: &str) -> Option<&Value> {
        self.fields.get(name)
    }

    /// Значение поля или `Value::Null`, если поля нет.
    pub fn get_or_null(&self, name: &str) -> Value {
        self.fields.get(name).cloned().unwrap_or(Value::Null)
    }

    pub fn len(&self) -> usize {
        self.fields.len()
    }

    pub fn is_empty(&self) -> bool {
        self.fields.is_empty()
    }
}

impl FromIterator<(String, Value)> for DecodedRecord {
    fn from_iter<I: IntoIterator<Item = (String, Value)>>(iter: I) -> Self {
        Self { fields: iter.into_iter().collect() }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;

    #[test]
    fn numbers_keep_their_shape() {
        assert_eq!(Value::from_json(json!(42)), Value::Int(42));
        assert_eq!(Value::from_json(json!(-7)), Value::Int(-7));
        assert_eq!(Value::from_json(json!(u64::MAX)), Value::UInt(u64::MAX));
        assert_eq!(Value::from_json(json!(1.5)), Value::Float(1.5));
    }

    #[test]
    fn nested_values_become_json_text() {
        assert_eq!(
            Value::from_json(json!({"a": [1, 2]})),
            Value::Text(r#"{"a":[1,2]}"#.to_string())
        );
    }

    #[test]
    fn missing_field_reads_as_null() {
        let record: DecodedRecord = [("id".to_string(), Value::Int(1))].into_iter().collect();
        assert_eq!(record.get_or_null("id"), Value::Int(1));
        assert_eq!(record.get_or_null("name"), Value::Null);
    }
}
