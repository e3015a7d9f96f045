use serde_json::{Map, Number, Value};

pub const MISSING_VALUE: &str = "-";
pub const UNKNOWN_PLAYER: &str = "Unknown Player";

/// One player's stat line as delivered by the API. Field order follows the
/// response body.
#[derive(Debug, Clone, Default, PartialEq)]
pub struct PlayerRecord {
    fields: Map<String, Value>,
}

impl PlayerRecord {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn from_map(fields: Map<String, Value>) -> Self {
        Self { fields }
    }

    pub fn with(mut self, key: &str, value: impl Into<Value>) -> Self {
        self.fields.insert(key.to_string(), value.into());
        self
    }

    pub fn insert(&mut self, key: &str, value: impl Into<Value>) {
        self.fields.insert(key.to_string(), value.into());
    }

    pub fn get(&self, key: &str) -> Option<&Value> {
        self.fields.get(key)
    }

    /// Display text for a field, `None` when absent, null or empty.
    pub fn display(&self, key: &str) -> Option<String> {
        match self.fields.get(key)? {
            Value::Null => None,
            Value::String(s) if s.is_empty() => None,
            Value::String(s) => Some(s.clone()),
            Value::Number(n) => Some(number_text(n)),
            Value::Bool(b) => Some(b.to_string()),
            other => Some(other.to_string()),
        }
    }

    pub fn display_or_dash(&self, key: &str) -> String {
        self.display(key).unwrap_or_else(|| MISSING_VALUE.to_string())
    }
}

const MAX_SAFE_INTEGER: f64 = 9_007_199_254_740_992.0;

/// Whole-valued floats print without `.0`, so `3.00` reads `3`.
fn number_text(n: &Number) -> String {
    if n.is_f64() {
        if let Some(f) = n.as_f64() {
            if f.fract() == 0.0 && f.abs() <= MAX_SAFE_INTEGER {
                return format!("{}", f as i64);
            }
        }
    }
    n.to_string()
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;

    #[test]
    fn display_handles_scalars_and_gaps() {
        let rec = PlayerRecord::new()
            .with("name", "Byron Buxton")
            .with("avg", ".290")
            .with("hr", 28)
            .with("ops", json!(null))
            .with("era", "");

        assert_eq!(rec.display("name").as_deref(), Some("Byron Buxton"));
        assert_eq!(rec.display("hr").as_deref(), Some("28"));
        assert_eq!(rec.display("ops"), None);
        assert_eq!(rec.display("era"), None);
        assert_eq!(rec.display_or_dash("whip"), "-");
    }

    #[test]
    fn whole_floats_drop_the_fraction() {
        let rec = PlayerRecord::new()
            .with("era", 3.0)
            .with("k9", 10.0)
            .with("avg", 0.29)
            .with("whip", -0.0);
        assert_eq!(rec.display_or_dash("era"), "3");
        assert_eq!(rec.display_or_dash("k9"), "10");
        assert_eq!(rec.display_or_dash("avg"), "0.29");
        assert_eq!(rec.display_or_dash("whip"), "0");
    }

    #[test]
    fn zero_is_shown_not_dashed() {
        let rec = PlayerRecord::new().with("hr", 0);
        assert_eq!(rec.display_or_dash("hr"), "0");
    }
}
