/*
 * Responsibility
 * - gate が書き込み、handler が読む「claim の入れ物」の型
 * - gate は ClaimSink だけを知っていればよい (axum の型に依存しない)
 */

use serde::ser::{Serialize, SerializeMap, Serializer};
use serde_json::Value;

/// Per-request destination for projected claims.
pub trait ClaimSink {
    fn set(&mut self, name: &str, value: Value);
}

/// Claims the gate projected for the current request, in selector order.
///
/// A selected claim missing from the token payload is stored as `Value::Null`,
/// so `get` distinguishes "selected but absent" (`Some(Null)`) from
/// "not selected" (`None`).
#[derive(Debug, Clone, Default, PartialEq)]
pub struct RequestClaims {
    entries: Vec<(String, Value)>,
}

impl RequestClaims {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn get(&self, name: &str) -> Option<&Value> {
        self.entries
            .iter()
            .find(|(key, _)| key == name)
            .map(|(_, value)| value)
    }

    /// String claims only; `None` for absent, null or non-string values.
    pub fn get_str(&self, name: &str) -> Option<&str> {
        self.get(name).and_then(Value::as_str)
    }

    pub fn iter(&self) -> impl Iterator<Item = (&str, &Value)> {
        self.entries.iter().map(|(key, value)| (key.as_str(), value))
    }

    pub fn len(&self) -> usize {
        self.entries.len()
    }

    pub fn is_empty(&self) -> bool {
        self.entries.is_empty()
    }
}

impl ClaimSink for RequestClaims {
    fn set(&mut self, name: &str, value: Value) {
        match self.entries.iter_mut().find(|(key, _)| key == name) {
            Some((_, slot)) => *slot = value,
            None => self.entries.push((name.to_string(), value)),
        }
    }
}

impl Serialize for RequestClaims {
    fn serialize<S: Serializer>(&self, serializer: S) -> Result<S::Ok, S::Error> {
        let mut map = serializer.serialize_map(Some(self.entries.len()))?;
        for (key, value) in &self.entries {
            map.serialize_entry(key, value)?;
        }
        map.end()
    }
}

#[cfg(test)]
mod tests {
    use serde_json::json;

    use super::*;

    #[test]
    fn set_overwrites_existing_entry_in_place() {
        let mut claims = RequestClaims::new();
        claims.set("sub", json!("u1"));
        claims.set("role", json!("admin"));
        claims.set("sub", json!("u2"));

        let keys: Vec<&str> = claims.iter().map(|(k, _)| k).collect();
        assert_eq!(keys, vec!["sub", "role"]);
        assert_eq!(claims.get_str("sub"), Some("u2"));
        assert_eq!(claims.len(), 2);
    }

    #[test]
    fn null_marker_is_distinct_from_unselected() {
        let mut claims = RequestClaims::new();
        claims.set("tenant", Value::Null);

        assert_eq!(claims.get("tenant"), Some(&Value::Null));
        assert_eq!(claims.get_str("tenant"), None);
        assert_eq!(claims.get("other"), None);
    }

    #[test]
    fn serializes_as_json_object_in_order() {
        let mut claims = RequestClaims::new();
        claims.set("sub", json!("u1"));
        claims.set("roles", json!(["a", "b"]));

        assert_eq!(
            serde_json::to_string(&claims).unwrap(),
            r#"{"sub":"u1","roles":["a","b"]}"#
        );
    }
}
