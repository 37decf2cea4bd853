//! Tagged union for claim and variable map values.

use std::collections::BTreeMap;
use std::fmt;

use serde::{Deserialize, Serialize};

/// A structured value stored in an open-ended event map.
///
/// Request claims and captured trace variables carry values of mixed
/// types. Rather than holding raw JSON, events store this closed variant
/// type so that every entry has one well-defined textual rendering.
///
/// Rendering rules:
///
/// | Variant | Rendered as |
/// |---------|-------------|
/// | `Null` | empty string |
/// | `Bool`, `Int`, `Float` | their `Display` form |
/// | `String` | the string itself |
/// | `List` | `[a,b,...]` in stored order |
/// | `Map` | `{k=v,...}` with pairs sorted by the full `k=v` text |
#[derive(Debug, Clone, PartialEq, Default, Serialize, Deserialize)]
#[serde(untagged)]
pub enum LogValue {
    /// JSON `null` or an unset value.
    #[default]
    Null,
    /// A boolean flag.
    Bool(bool),
    /// A signed integer.
    Int(i64),
    /// A floating point number, including integers beyond `i64` range.
    Float(f64),
    /// A string.
    String(String),
    /// An ordered list of values.
    List(Vec<LogValue>),
    /// A nested map.
    Map(BTreeMap<String, LogValue>),
}

impl LogValue {
    /// Returns the string payload if this is a `String` value.
    pub fn as_str(&self) -> Option<&str> {
        match self {
            Self::String(s) => Some(s),
            _ => None,
        }
    }

    /// Returns `true` for `Null`.
    pub fn is_null(&self) -> bool {
        matches!(self, Self::Null)
    }
}

/// Renders `pairs` as `k=v` strings, sorts them, and joins with commas.
///
/// Sorting is by the whole pair text, so `a.b=2` sorts before `a=1`. The
/// pairs are collected into a fresh vector; the caller's collection is
/// never reordered.
pub fn join_sorted_pairs<'a, K, V, I>(pairs: I) -> String
where
    I: IntoIterator<Item = (&'a K, &'a V)>,
    K: fmt::Display + ?Sized + 'a,
    V: fmt::Display + ?Sized + 'a,
{
    let mut rendered: Vec<String> = pairs
        .into_iter()
        .map(|(k, v)| format!("{k}={v}"))
        .collect();
    rendered.sort_unstable();
    rendered.join(",")
}

impl fmt::Display for LogValue {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::Null => Ok(()),
            Self::Bool(b) => write!(f, "{b}"),
            Self::Int(n) => write!(f, "{n}"),
            Self::Float(n) => write!(f, "{n}"),
            Self::String(s) => f.write_str(s),
            Self::List(items) => {
                f.write_str("[")?;
                for (i, item) in items.iter().enumerate() {
                    if i > 0 {
                        f.write_str(",")?;
                    }
                    write!(f, "{item}")?;
                }
                f.write_str("]")
            }
            Self::Map(map) => write!(f, "{{{}}}", join_sorted_pairs(map)),
        }
    }
}

impl From<&str> for LogValue {
    fn from(s: &str) -> Self {
        Self::String(s.to_string())
    }
}

impl From<String> for LogValue {
    fn from(s: String) -> Self {
        Self::String(s)
    }
}

impl From<bool> for LogValue {
    fn from(b: bool) -> Self {
        Self::Bool(b)
    }
}

impl From<i64> for LogValue {
    fn from(n: i64) -> Self {
        Self::Int(n)
    }
}

impl From<f64> for LogValue {
    fn from(n: f64) -> Self {
        Self::Float(n)
    }
}

impl From<Vec<LogValue>> for LogValue {
    fn from(items: Vec<LogValue>) -> Self {
        Self::List(items)
    }
}

impl From<BTreeMap<String, LogValue>> for LogValue {
    fn from(map: BTreeMap<String, LogValue>) -> Self {
        Self::Map(map)
    }
}

impl From<serde_json::Value> for LogValue {
    fn from(value: serde_json::Value) -> Self {
        use serde_json::Value;

        match value {
            Value::Null => Self::Null,
            Value::Bool(b) => Self::Bool(b),
            Value::Number(n) => match n.as_i64() {
                Some(i) => Self::Int(i),
                None => Self::Float(n.as_f64().unwrap_or(f64::NAN)),
            },
            Value::String(s) => Self::String(s),
            Value::Array(items) => Self::List(items.into_iter().map(Self::from).collect()),
            Value::Object(map) => {
                Self::Map(map.into_iter().map(|(k, v)| (k, Self::from(v))).collect())
            }
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn scalars_render_plainly() {
        assert_eq!(LogValue::Null.to_string(), "");
        assert_eq!(LogValue::from(true).to_string(), "true");
        assert_eq!(LogValue::from(-42_i64).to_string(), "-42");
        assert_eq!(LogValue::from(0.5_f64).to_string(), "0.5");
        assert_eq!(LogValue::from("alice").to_string(), "alice");
    }

    #[test]
    fn list_keeps_order() {
        let value = LogValue::List(vec!["b".into(), "a".into(), 3_i64.into()]);
        assert_eq!(value.to_string(), "[b,a,3]");
    }

    #[test]
    fn nested_map_sorts_pairs() {
        let mut inner = BTreeMap::new();
        inner.insert("z".to_string(), LogValue::from(1_i64));
        inner.insert("a".to_string(), LogValue::from("x"));
        let mut outer = BTreeMap::new();
        outer.insert("inner".to_string(), LogValue::Map(inner));
        outer.insert("flag".to_string(), LogValue::from(false));

        assert_eq!(LogValue::Map(outer).to_string(), "{flag=false,inner={a=x,z=1}}");
    }

    #[test]
    fn pairs_sort_by_full_text() {
        let mut map = BTreeMap::new();
        map.insert("a".to_string(), "1".to_string());
        map.insert("a.b".to_string(), "2".to_string());
        // '.' sorts before '=', so the longer key comes first.
        assert_eq!(join_sorted_pairs(&map), "a.b=2,a=1");
    }

    #[test]
    fn deserializes_json_shapes() {
        let value: LogValue =
            serde_json::from_str(r#"{"groups":["admins","ops"],"exp":1700000000,"ratio":0.25,"sub":null}"#)
                .expect("should deserialize");
        let LogValue::Map(map) = &value else {
            panic!("expected map, got {value:?}");
        };
        assert_eq!(
            map["groups"],
            LogValue::List(vec!["admins".into(), "ops".into()])
        );
        assert_eq!(map["exp"], LogValue::Int(1_700_000_000));
        assert_eq!(map["ratio"], LogValue::Float(0.25));
        assert!(map["sub"].is_null());
    }

    #[test]
    fn from_json_value_matches_deserialize() {
        let raw = r#"{"a":[1,true,"x"],"b":{"c":2.5}}"#;
        let via_value = LogValue::from(serde_json::from_str::<serde_json::Value>(raw).unwrap());
        let direct: LogValue = serde_json::from_str(raw).unwrap();
        assert_eq!(via_value, direct);
    }

    #[test]
    fn serializes_untagged() {
        let value = LogValue::List(vec![LogValue::Null, 7_i64.into(), "s".into()]);
        assert_eq!(serde_json::to_string(&value).unwrap(), r#"[null,7,"s"]"#);
    }
}
