//! The closed set of primitive types a [`crate::Value`] may hold, and the
//! typed-view conversion out of the canonical text form (spec §4.1).

use crate::error::CoreError;
use core::fmt;

/// Closed set of primitive kinds a [`crate::Value`]/[`crate::ValueSet`] may declare.
#[derive(Clone, Copy, Debug, Eq, PartialEq, Hash, serde::Serialize, serde::Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum DataType {
    Bool,
    F32,
    F64,
    /// Modelled as `f64`: Rust has no native 80-bit extended type. The
    /// canonical text form is preserved exactly as supplied; only the
    /// materialised native view is widened/narrowed through `f64`.
    F80,
    I8,
    I16,
    I32,
    I64,
    U8,
    U16,
    U32,
    U64,
    Utf8,
}

impl DataType {
    /// Whether this kind admits a `precision` (fractional-digit count).
    pub fn is_floating(self) -> bool {
        matches!(self, DataType::F32 | DataType::F64 | DataType::F80)
    }

    fn label(self) -> &'static str {
        match self {
            DataType::Bool => "bool",
            DataType::F32 => "f32",
            DataType::F64 => "f64",
            DataType::F80 => "f80",
            DataType::I8 => "i8",
            DataType::I16 => "i16",
            DataType::I32 => "i32",
            DataType::I64 => "i64",
            DataType::U8 => "u8",
            DataType::U16 => "u16",
            DataType::U32 => "u32",
            DataType::U64 => "u64",
            DataType::Utf8 => "utf8",
        }
    }
}

impl fmt::Display for DataType {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.label())
    }
}

/// The materialised typed scalar produced by [`get_native_value`].
#[derive(Clone, Debug, PartialEq)]
pub enum NativeValue {
    Bool(bool),
    F32(f32),
    F64(f64),
    F80(f64),
    I8(i8),
    I16(i16),
    I32(i32),
    I64(i64),
    U8(u8),
    U16(u16),
    U32(u32),
    U64(u64),
    Utf8(String),
}

impl NativeValue {
    pub fn data_type(&self) -> DataType {
        match self {
            NativeValue::Bool(_) => DataType::Bool,
            NativeValue::F32(_) => DataType::F32,
            NativeValue::F64(_) => DataType::F64,
            NativeValue::F80(_) => DataType::F80,
            NativeValue::I8(_) => DataType::I8,
            NativeValue::I16(_) => DataType::I16,
            NativeValue::I32(_) => DataType::I32,
            NativeValue::I64(_) => DataType::I64,
            NativeValue::U8(_) => DataType::U8,
            NativeValue::U16(_) => DataType::U16,
            NativeValue::U32(_) => DataType::U32,
            NativeValue::U64(_) => DataType::U64,
            NativeValue::Utf8(_) => DataType::Utf8,
        }
    }

    /// Best-effort widening view as `f64`, for callers that just want a number
    /// regardless of the declared integer width (e.g. rendering).
    pub fn as_f64(&self) -> Option<f64> {
        match self {
            NativeValue::F32(v) => Some(*v as f64),
            NativeValue::F64(v) => Some(*v),
            NativeValue::F80(v) => Some(*v),
            NativeValue::I8(v) => Some(*v as f64),
            NativeValue::I16(v) => Some(*v as f64),
            NativeValue::I32(v) => Some(*v as f64),
            NativeValue::I64(v) => Some(*v as f64),
            NativeValue::U8(v) => Some(*v as f64),
            NativeValue::U16(v) => Some(*v as f64),
            NativeValue::U32(v) => Some(*v as f64),
            NativeValue::U64(v) => Some(*v as f64),
            NativeValue::Bool(_) | NativeValue::Utf8(_) => None,
        }
    }
}

/// Parses `text` into an `i128` under a declared `[min, max]` range, telling
/// apart a malformed literal from one that is well-formed but out of range
/// (either because it fails the range check directly or because it overflows
/// even the `i128` staging type).
fn classify_signed(text: &str, min: i128, max: i128) -> Result<i128, bool> {
    use std::num::IntErrorKind::{NegOverflow, PosOverflow};
    match text.parse::<i128>() {
        Ok(v) if v < min || v > max => Err(true),
        Ok(v) => Ok(v),
        Err(e) => match e.kind() {
            PosOverflow | NegOverflow => Err(true),
            _ => Err(false),
        },
    }
}

/// Unsigned counterpart of [`classify_signed`]; a leading `-` parses as a
/// malformed literal rather than an out-of-range one, matching `u*::from_str`.
fn classify_unsigned(text: &str, max: u128) -> Result<u128, bool> {
    use std::num::IntErrorKind::PosOverflow;
    match text.parse::<u128>() {
        Ok(v) if v > max => Err(true),
        Ok(v) => Ok(v),
        Err(e) => match e.kind() {
            PosOverflow => Err(true),
            _ => Err(false),
        },
    }
}

/// Parse `text` under the declared `dataType`, failing with `InvalidArgument`
/// when the text does not conform to the type (including sign conformance:
/// unsigned integer kinds reject a leading `-`) or `OutOfRange` when the
/// value exceeds the type's representable limits.
pub fn get_native_value(data_type: DataType, text: &str) -> Result<NativeValue, CoreError> {
    let invalid = || CoreError::InvalidArgument(format!("{text:?} is not a valid {data_type}"));
    let out_of_range = || CoreError::OutOfRange(format!("{text:?} exceeds the range of {data_type}"));

    match data_type {
        DataType::Bool => match text {
            "true" => Ok(NativeValue::Bool(true)),
            "false" => Ok(NativeValue::Bool(false)),
            _ => Err(invalid()),
        },
        DataType::I8 => match classify_signed(text, i8::MIN as i128, i8::MAX as i128) {
            Ok(v) => Ok(NativeValue::I8(v as i8)),
            Err(true) => Err(out_of_range()),
            Err(false) => Err(invalid()),
        },
        DataType::I16 => match classify_signed(text, i16::MIN as i128, i16::MAX as i128) {
            Ok(v) => Ok(NativeValue::I16(v as i16)),
            Err(true) => Err(out_of_range()),
            Err(false) => Err(invalid()),
        },
        DataType::I32 => match classify_signed(text, i32::MIN as i128, i32::MAX as i128) {
            Ok(v) => Ok(NativeValue::I32(v as i32)),
            Err(true) => Err(out_of_range()),
            Err(false) => Err(invalid()),
        },
        DataType::I64 => match classify_signed(text, i64::MIN as i128, i64::MAX as i128) {
            Ok(v) => Ok(NativeValue::I64(v as i64)),
            Err(true) => Err(out_of_range()),
            Err(false) => Err(invalid()),
        },
        DataType::U8 => match classify_unsigned(text, u8::MAX as u128) {
            Ok(v) => Ok(NativeValue::U8(v as u8)),
            Err(true) => Err(out_of_range()),
            Err(false) => Err(invalid()),
        },
        DataType::U16 => match classify_unsigned(text, u16::MAX as u128) {
            Ok(v) => Ok(NativeValue::U16(v as u16)),
            Err(true) => Err(out_of_range()),
            Err(false) => Err(invalid()),
        },
        DataType::U32 => match classify_unsigned(text, u32::MAX as u128) {
            Ok(v) => Ok(NativeValue::U32(v as u32)),
            Err(true) => Err(out_of_range()),
            Err(false) => Err(invalid()),
        },
        DataType::U64 => match classify_unsigned(text, u64::MAX as u128) {
            Ok(v) => Ok(NativeValue::U64(v as u64)),
            Err(true) => Err(out_of_range()),
            Err(false) => Err(invalid()),
        },
        DataType::F32 => {
            let v: f32 = text.parse().map_err(|_| invalid())?;
            if v.is_infinite() && !looks_like_infinity(text) {
                return Err(out_of_range());
            }
            Ok(NativeValue::F32(v))
        }
        DataType::F64 | DataType::F80 => {
            let v: f64 = text.parse().map_err(|_| invalid())?;
            if v.is_infinite() && !looks_like_infinity(text) {
                return Err(out_of_range());
            }
            Ok(if data_type == DataType::F64 {
                NativeValue::F64(v)
            } else {
                NativeValue::F80(v)
            })
        }
        DataType::Utf8 => Ok(NativeValue::Utf8(text.to_string())),
    }
}

fn looks_like_infinity(text: &str) -> bool {
    let t = text.trim().trim_start_matches(['+', '-']);
    t.eq_ignore_ascii_case("inf") || t.eq_ignore_ascii_case("infinity")
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn unsigned_rejects_leading_minus() {
        assert!(matches!(
            get_native_value(DataType::U32, "-1"),
            Err(CoreError::InvalidArgument(_))
        ));
    }

    #[test]
    fn integer_overflow_is_out_of_range() {
        assert!(matches!(
            get_native_value(DataType::U8, "256"),
            Err(CoreError::OutOfRange(_))
        ));
        assert!(matches!(
            get_native_value(DataType::I8, "-129"),
            Err(CoreError::OutOfRange(_))
        ));
    }

    #[test]
    fn float_overflow_is_out_of_range() {
        let huge = "1".to_string() + &"0".repeat(400);
        assert!(matches!(
            get_native_value(DataType::F64, &huge),
            Err(CoreError::OutOfRange(_))
        ));
    }

    #[test]
    fn bool_roundtrip() {
        assert_eq!(get_native_value(DataType::Bool, "true").unwrap(), NativeValue::Bool(true));
        assert!(get_native_value(DataType::Bool, "True").is_err());
    }
}
