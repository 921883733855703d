//! Cross-test and test-specific parameters (spec §3).

use crate::error::{ReportError, ReportResult};
use steer_core::{NativeValue, Value};

/// `(testName, parameterSetName, parameters)`. Cross-test parameters are
/// recognised by name/type; anything else is a test-specific [`Value`].
#[derive(Clone, Debug, serde::Serialize, serde::Deserialize)]
pub struct ParameterSet {
    pub test_name: String,
    pub parameter_set_name: String,
    pub parameters: Vec<Value>,
}

impl ParameterSet {
    pub fn new(test_name: impl Into<String>, parameter_set_name: impl Into<String>) -> Self {
        Self {
            test_name: test_name.into(),
            parameter_set_name: parameter_set_name.into(),
            parameters: Vec::new(),
        }
    }

    pub fn with_parameter(mut self, value: Value) -> Self {
        self.parameters.push(value);
        self
    }

    fn find(&self, name: &str) -> Option<&Value> {
        self.parameters.iter().find(|p| p.name == name)
    }

    fn require_u64(&self, name: &str) -> ReportResult<u64> {
        let v = self
            .find(name)
            .ok_or_else(|| ReportError::NullPointer(format!("missing parameter {name}")))?;
        match v.native()? {
            NativeValue::U64(n) => Ok(n),
            NativeValue::U32(n) => Ok(n as u64),
            other => Err(ReportError::InvalidArgument(format!(
                "parameter {name} has unexpected type {:?}",
                other.data_type()
            ))),
        }
    }

    /// Number of bitstreams to read; must be `>= 1` (spec §5).
    pub fn bitstream_count(&self) -> ReportResult<u64> {
        let n = self.require_u64("bitstream_count")?;
        if n < 1 {
            return Err(ReportError::InvalidArgument("bitstream_count must be >= 1".into()));
        }
        Ok(n)
    }

    /// Bit length of each bitstream; must be a positive multiple of 8 (spec §5).
    pub fn bitstream_length(&self) -> ReportResult<u64> {
        let n = self.require_u64("bitstream_length")?;
        if n == 0 || n % 8 != 0 {
            return Err(ReportError::InvalidArgument(
                "bitstream_length must be a positive multiple of 8".into(),
            ));
        }
        Ok(n)
    }

    /// Significance level α; strictly within (0, 1) (spec §5).
    pub fn significance_level(&self) -> ReportResult<f64> {
        let v = self
            .find("significance_level")
            .ok_or_else(|| ReportError::NullPointer("missing parameter significance_level".into()))?;
        let alpha = match v.native()? {
            NativeValue::F64(f) => f,
            NativeValue::F32(f) => f as f64,
            other => {
                return Err(ReportError::InvalidArgument(format!(
                    "significance_level has unexpected type {:?}",
                    other.data_type()
                )))
            }
        };
        if !(alpha > 0.0 && alpha < 1.0) {
            return Err(ReportError::InvalidArgument("significance_level must satisfy 0 < alpha < 1".into()));
        }
        Ok(alpha)
    }

    /// Number of fractional decimal digits α is expressed with (spec §4.5).
    pub fn significance_level_precision(&self) -> ReportResult<u32> {
        let v = self.find("significance_level_precision");
        match v {
            None => Ok(significance_level_decimal_digits(self.significance_level()?)),
            Some(v) => match v.native()? {
                NativeValue::U32(n) => Ok(n),
                NativeValue::U64(n) => Ok(n as u32),
                other => Err(ReportError::InvalidArgument(format!(
                    "significance_level_precision has unexpected type {:?}",
                    other.data_type()
                ))),
            },
        }
    }

    /// Thread-pool width; must be within `[1, 128]` (spec §5). Defaults to 1.
    pub fn thread_count(&self) -> ReportResult<usize> {
        match self.find("thread_count") {
            None => Ok(1),
            Some(v) => {
                let n = match v.native()? {
                    NativeValue::U32(n) => n as u64,
                    NativeValue::U64(n) => n,
                    NativeValue::U8(n) => n as u64,
                    NativeValue::U16(n) => n as u64,
                    other => {
                        return Err(ReportError::InvalidArgument(format!(
                            "thread_count has unexpected type {:?}",
                            other.data_type()
                        )))
                    }
                };
                if !(1..=128).contains(&n) {
                    return Err(ReportError::InvalidArgument("thread_count must satisfy 1 <= N <= 128".into()));
                }
                Ok(n as usize)
            }
        }
    }

    /// Look up a test-specific parameter's text by name.
    pub fn get(&self, name: &str) -> Option<&str> {
        self.find(name).map(|v| v.value.as_str())
    }

    /// Look up a test-specific integer-ish parameter by name.
    pub fn get_u64(&self, name: &str) -> ReportResult<Option<u64>> {
        match self.find(name) {
            None => Ok(None),
            Some(_) => Ok(Some(self.require_u64(name)?)),
        }
    }
}

/// The number of fractional decimal digits in a literal like `0.01` → `2`.
/// Used only as a fallback when `significance_level_precision` is not given
/// explicitly; callers that need exact control should supply it.
fn significance_level_decimal_digits(alpha: f64) -> u32 {
    for k in 1..=12u32 {
        let scaled = alpha * 10f64.powi(k as i32);
        if (scaled - scaled.round()).abs() < 1e-9 {
            return k;
        }
    }
    12
}

#[cfg(test)]
mod tests {
    use super::*;
    use steer_core::DataType;

    fn ps(bc: u64, bl: u64, alpha: &str) -> ParameterSet {
        ParameterSet::new("block_frequency", "default")
            .with_parameter(Value::new("bitstream_count", DataType::U64, None, None, bc.to_string()).unwrap())
            .with_parameter(Value::new("bitstream_length", DataType::U64, None, None, bl.to_string()).unwrap())
            .with_parameter(Value::new("significance_level", DataType::F64, None, None, alpha).unwrap())
    }

    #[test]
    fn rejects_non_multiple_of_eight() {
        let p = ps(1, 13, "0.01");
        assert!(p.bitstream_length().is_err());
    }

    #[test]
    fn rejects_alpha_out_of_bounds() {
        assert!(ps(1, 8, "0").significance_level().is_err());
        assert!(ps(1, 8, "1").significance_level().is_err());
    }

    #[test]
    fn infers_precision_from_literal() {
        let p = ps(100, 8000, "0.01");
        assert_eq!(p.significance_level_precision().unwrap(), 2);
    }
}
