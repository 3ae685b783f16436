//! Typed records for the Hub'Eau resources.
//!
//! Optional fields are `Option<_>`; non-optional fields are required and a
//! record missing one fails to decode. Fields the API sends but the model does
//! not declare are kept in each record's `extra` map so schema drift stays
//! visible.

macro_rules! impl_record {
    ($($ty:ty),* $(,)?) => {
        $(
            impl $crate::models::Record for $ty {
                fn extra_fields(&self) -> &serde_json::Map<String, serde_json::Value> {
                    &self.extra
                }
            }
        )*
    };
}
pub(crate) use impl_record;

pub mod geojson;
pub mod hydrometrie;
pub mod qualite_rivieres;

pub use geojson::{Crs, CrsProperties, Feature, FeatureCollection, Geometry, Position};
pub use hydrometrie::{ObsElab, ObservationTr, Site, Station};
pub use qualite_rivieres::{AnalysePc, ConditionEnvironnementalePc, OperationPc, StationPc};

use serde::de::DeserializeOwned;
use serde::{Deserialize, Serialize};
use serde_json::{Map, Value};
use std::collections::BTreeSet;
use std::fmt;

/// Common behaviour of every decoded resource record.
pub trait Record: Serialize + DeserializeOwned + Default + Send + 'static {
    /// Fields received from the API that the model does not declare.
    fn extra_fields(&self) -> &Map<String, Value>;
}

/// Names of the fields declared by `T`.
pub fn declared_fields<T: Record>() -> BTreeSet<String> {
    match serde_json::to_value(T::default()) {
        Ok(Value::Object(map)) => map.into_iter().map(|(k, _)| k).collect(),
        _ => BTreeSet::new(),
    }
}

/// An analysis result, sent by the API either as a number or as text.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(untagged)]
pub enum ResultValue {
    Number(f64),
    Text(String),
}

impl ResultValue {
    /// `false` for numeric zero, `"0"` and the empty string.
    pub fn is_informative(&self) -> bool {
        match self {
            ResultValue::Number(n) => *n != 0.0,
            ResultValue::Text(s) => !(s.is_empty() || s == "0"),
        }
    }
}

impl fmt::Display for ResultValue {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            ResultValue::Number(n) => write!(f, "{n}"),
            ResultValue::Text(s) => write!(f, "{s}"),
        }
    }
}

/// A code the API types inconsistently, as an integer or as text.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(untagged)]
pub enum Code {
    Int(i64),
    Text(String),
}

impl fmt::Display for Code {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Code::Int(n) => write!(f, "{n}"),
            Code::Text(s) => write!(f, "{s}"),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;

    #[test]
    fn test_result_value_informative() {
        assert!(!ResultValue::Number(0.0).is_informative());
        assert!(!ResultValue::Text("0".into()).is_informative());
        assert!(!ResultValue::Text(String::new()).is_informative());
        assert!(ResultValue::Number(7.1).is_informative());
        assert!(ResultValue::Number(-0.5).is_informative());
        assert!(ResultValue::Text("<0.5".into()).is_informative());
    }

    #[test]
    fn test_result_value_decodes_mixed_types() {
        let n: ResultValue = serde_json::from_value(json!(7)).unwrap();
        let s: ResultValue = serde_json::from_value(json!("7.3")).unwrap();

        assert_eq!(n, ResultValue::Number(7.0));
        assert_eq!(s, ResultValue::Text("7.3".into()));
    }

    #[test]
    fn test_code_decodes_mixed_types() {
        let a: Code = serde_json::from_value(json!(26)).unwrap();
        let b: Code = serde_json::from_value(json!("10")).unwrap();

        assert_eq!(a.to_string(), "26");
        assert_eq!(b, Code::Text("10".into()));
    }

    #[test]
    fn test_declared_fields_excludes_extras() {
        let fields = declared_fields::<StationPc>();

        assert!(fields.contains("code_station"));
        assert!(fields.contains("geometry"));
        assert!(!fields.contains("extra"));
    }

    #[test]
    fn test_unknown_fields_are_preserved() {
        let station: StationPc = serde_json::from_value(json!({
            "code_station": "A1",
            "nouveau_champ": "valeur"
        }))
        .unwrap();

        assert_eq!(
            station.extra_fields().get("nouveau_champ"),
            Some(&json!("valeur"))
        );
        assert!(!station.extra_fields().contains_key("code_station"));
    }
}
