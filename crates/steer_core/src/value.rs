//! Typed named results ([`Value`]) and grouped result sets ([`ValueSet`]),
//! spec §3/§4.1. The text form is canonical for transport; typed views are
//! materialised on demand via [`Value::native`].

use crate::data_type::{get_native_value, DataType, NativeValue};
use crate::error::{CoreError, CoreResult};

/// A single named, typed result. `value` is always kept as its canonical
/// text form; call [`Value::native`] to obtain a typed view.
#[derive(Clone, Debug, PartialEq, serde::Serialize, serde::Deserialize)]
pub struct Value {
    pub name: String,
    #[serde(rename = "dataType")]
    pub data_type: DataType,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub precision: Option<u32>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub units: Option<String>,
    pub value: String,
}

impl Value {
    /// Construct a new `Value`, validating that `text` parses under `data_type`
    /// and that `precision` is only set for floating-point kinds.
    pub fn new(
        name: impl Into<String>,
        data_type: DataType,
        precision: Option<u32>,
        units: Option<String>,
        text: impl Into<String>,
    ) -> CoreResult<Self> {
        let name = name.into();
        if name.is_empty() {
            return Err(CoreError::EmptyString("Value.name".into()));
        }
        let text = text.into();
        if precision.is_some() && !data_type.is_floating() {
            return Err(CoreError::InvalidArgument(
                "precision is only meaningful for floating-point data types".into(),
            ));
        }
        get_native_value(data_type, &text)?;
        Ok(Self {
            name,
            data_type,
            precision,
            units,
            value: text,
        })
    }

    /// Materialise the typed scalar behind the canonical text.
    pub fn native(&self) -> CoreResult<NativeValue> {
        get_native_value(self.data_type, &self.value)
    }
}

/// One labelled member of a [`ValueSet`]; shares the set's declared `dataType`.
#[derive(Clone, Debug, PartialEq, serde::Serialize, serde::Deserialize)]
pub struct ValueSetItem {
    pub label: String,
    pub value: String,
}

/// A grouped, uniformly-typed collection of labelled results (e.g. a
/// confusion-matrix block).
#[derive(Clone, Debug, PartialEq, serde::Serialize, serde::Deserialize)]
pub struct ValueSet {
    pub name: String,
    #[serde(rename = "dataType")]
    pub data_type: DataType,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub precision: Option<u32>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub units: Option<String>,
    pub items: Vec<ValueSetItem>,
}

impl ValueSet {
    pub fn new(
        name: impl Into<String>,
        data_type: DataType,
        precision: Option<u32>,
        units: Option<String>,
    ) -> CoreResult<Self> {
        let name = name.into();
        if name.is_empty() {
            return Err(CoreError::EmptyString("ValueSet.name".into()));
        }
        if precision.is_some() && !data_type.is_floating() {
            return Err(CoreError::InvalidArgument(
                "precision is only meaningful for floating-point data types".into(),
            ));
        }
        Ok(Self {
            name,
            data_type,
            precision,
            units,
            items: Vec::new(),
        })
    }

    /// Append a labelled item, validating it parses under the set's `dataType`.
    pub fn add_value(&mut self, label: impl Into<String>, text: impl Into<String>) -> CoreResult<()> {
        let label = label.into();
        if label.is_empty() {
            return Err(CoreError::EmptyString("ValueSetItem.label".into()));
        }
        let text = text.into();
        get_native_value(self.data_type, &text)?;
        self.items.push(ValueSetItem { label, value: text });
        Ok(())
    }

    /// Look up an item's canonical text by label.
    pub fn get(&self, label: &str) -> Option<&str> {
        self.items.iter().find(|it| it.label == label).map(|it| it.value.as_str())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn value_rejects_mismatched_text() {
        assert!(Value::new("n", DataType::U8, None, None, "not-a-number").is_err());
    }

    #[test]
    fn value_rejects_precision_on_non_float() {
        assert!(Value::new("n", DataType::U8, Some(2), None, "5").is_err());
    }

    #[test]
    fn value_set_preserves_insertion_order() {
        let mut vs = ValueSet::new("confusion", DataType::F64, Some(6), None).unwrap();
        vs.add_value("TPR", "0.5").unwrap();
        vs.add_value("TNR", "0.25").unwrap();
        assert_eq!(vs.items[0].label, "TPR");
        assert_eq!(vs.get("TNR"), Some("0.25"));
    }

    #[test]
    fn nan_and_inf_text_round_trips() {
        let v = Value::new("x", DataType::F64, None, None, "NaN").unwrap();
        assert!(v.native().unwrap().as_f64().unwrap().is_nan());
        let v = Value::new("y", DataType::F64, None, None, "inf").unwrap();
        assert!(v.native().unwrap().as_f64().unwrap().is_infinite());
    }
}
