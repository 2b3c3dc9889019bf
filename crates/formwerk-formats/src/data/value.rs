// SPDX-License-Identifier: PMPL-1.0-or-later
// Copyright (c) 2026 Jonathan D.A. Jewell (hyperpolymath) <jonathan.jewell@open.ac.uk>
//
// Generic value tree used as the intermediate representation for data
// format conversions (CSV, JSON, XML, YAML).

use serde::de::{self, MapAccess, SeqAccess, Visitor};
use serde::ser::{SerializeMap, SerializeSeq};
use serde::{Deserialize, Deserializer, Serialize, Serializer};

/// A parsed data document: scalar, list, or string-keyed mapping.
///
/// Mappings preserve insertion order so converted output keeps the field
/// order of the source document (CSV headers, JSON object keys). The tree is
/// ephemeral, built and discarded within a single conversion.
#[derive(Debug, Clone, PartialEq)]
pub enum DataValue {
    Null,
    Bool(bool),
    Number(serde_json::Number),
    Text(String),
    List(Vec<DataValue>),
    Map(Vec<(String, DataValue)>),
}

impl DataValue {
    /// Insert into a mapping entry list. A repeated key overwrites the
    /// earlier value but keeps the original position, which is what the XML
    /// decomposition's last-sibling-wins rule relies on.
    pub fn map_insert(entries: &mut Vec<(String, DataValue)>, key: String, value: DataValue) {
        if let Some(slot) = entries.iter_mut().find(|(existing, _)| *existing == key) {
            slot.1 = value;
        } else {
            entries.push((key, value));
        }
    }

    /// Look up a key in a mapping. Returns `None` for non-mapping values.
    pub fn get(&self, key: &str) -> Option<&DataValue> {
        match self {
            Self::Map(entries) => entries
                .iter()
                .find(|(existing, _)| existing == key)
                .map(|(_, value)| value),
            _ => None,
        }
    }

    /// String form of a scalar value, `None` for lists and mappings.
    ///
    /// Null renders as the empty string; numbers and booleans use their
    /// canonical display form.
    pub fn scalar_text(&self) -> Option<String> {
        match self {
            Self::Null => Some(String::new()),
            Self::Bool(b) => Some(b.to_string()),
            Self::Number(n) => Some(n.to_string()),
            Self::Text(s) => Some(s.clone()),
            Self::List(_) | Self::Map(_) => None,
        }
    }

    /// Parse a raw text field the way tabular importers do: integer first,
    /// then float, otherwise text; an empty field becomes null.
    pub fn infer_scalar(field: &str) -> DataValue {
        if field.is_empty() {
            return Self::Null;
        }
        if let Ok(int) = field.parse::<i64>() {
            return Self::Number(int.into());
        }
        if let Ok(float) = field.parse::<f64>() {
            if let Some(number) = serde_json::Number::from_f64(float) {
                return Self::Number(number);
            }
        }
        Self::Text(field.to_string())
    }
}

impl Serialize for DataValue {
    fn serialize<S: Serializer>(&self, serializer: S) -> Result<S::Ok, S::Error> {
        match self {
            Self::Null => serializer.serialize_unit(),
            Self::Bool(b) => serializer.serialize_bool(*b),
            Self::Number(n) => n.serialize(serializer),
            Self::Text(s) => serializer.serialize_str(s),
            Self::List(items) => {
                let mut seq = serializer.serialize_seq(Some(items.len()))?;
                for item in items {
                    seq.serialize_element(item)?;
                }
                seq.end()
            }
            Self::Map(entries) => {
                let mut map = serializer.serialize_map(Some(entries.len()))?;
                for (key, value) in entries {
                    map.serialize_entry(key, value)?;
                }
                map.end()
            }
        }
    }
}

impl<'de> Deserialize<'de> for DataValue {
    fn deserialize<D: Deserializer<'de>>(deserializer: D) -> Result<Self, D::Error> {
        struct ValueVisitor;

        impl<'de> Visitor<'de> for ValueVisitor {
            type Value = DataValue;

            fn expecting(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
                f.write_str("a scalar, sequence, or mapping")
            }

            fn visit_bool<E>(self, v: bool) -> Result<DataValue, E> {
                Ok(DataValue::Bool(v))
            }

            fn visit_i64<E>(self, v: i64) -> Result<DataValue, E> {
                Ok(DataValue::Number(v.into()))
            }

            fn visit_u64<E>(self, v: u64) -> Result<DataValue, E> {
                Ok(DataValue::Number(v.into()))
            }

            fn visit_f64<E>(self, v: f64) -> Result<DataValue, E> {
                // Non-finite floats have no JSON representation.
                Ok(serde_json::Number::from_f64(v)
                    .map(DataValue::Number)
                    .unwrap_or(DataValue::Null))
            }

            fn visit_str<E>(self, v: &str) -> Result<DataValue, E> {
                Ok(DataValue::Text(v.to_string()))
            }

            fn visit_string<E>(self, v: String) -> Result<DataValue, E> {
                Ok(DataValue::Text(v))
            }

            fn visit_unit<E>(self) -> Result<DataValue, E> {
                Ok(DataValue::Null)
            }

            fn visit_none<E>(self) -> Result<DataValue, E> {
                Ok(DataValue::Null)
            }

            fn visit_some<D2: Deserializer<'de>>(self, d: D2) -> Result<DataValue, D2::Error> {
                Deserialize::deserialize(d)
            }

            fn visit_seq<A: SeqAccess<'de>>(self, mut seq: A) -> Result<DataValue, A::Error> {
                let mut items = Vec::new();
                while let Some(item) = seq.next_element()? {
                    items.push(item);
                }
                Ok(DataValue::List(items))
            }

            fn visit_map<A: MapAccess<'de>>(self, mut map: A) -> Result<DataValue, A::Error> {
                let mut entries: Vec<(String, DataValue)> = Vec::new();
                while let Some(key) = map.next_key::<DataValue>()? {
                    // YAML allows non-string keys; stringify scalars, reject
                    // structured keys.
                    let key = key
                        .scalar_text()
                        .ok_or_else(|| de::Error::custom("mapping key must be a scalar"))?;
                    let value = map.next_value::<DataValue>()?;
                    DataValue::map_insert(&mut entries, key, value);
                }
                Ok(DataValue::Map(entries))
            }
        }

        deserializer.deserialize_any(ValueVisitor)
    }
}
