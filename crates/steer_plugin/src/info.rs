//! The descriptor and parameter-schema shapes every plug-in publishes
//! (spec §6 "Plug-in ABI").

use steer_core::DataType;

/// Static descriptor returned by `get_test_info`.
#[derive(Clone, Debug)]
pub struct TestInfo {
    pub test_name: &'static str,
    pub suite: &'static str,
    pub description: &'static str,
    pub complexity: &'static str,
    pub references: Vec<&'static str>,
    pub program_name: &'static str,
    pub program_version: &'static str,
    pub input_format: InputFormat,
    pub uri: &'static str,
    pub authors: Vec<&'static str>,
    pub contributors: Vec<&'static str>,
    pub maintainers: Vec<&'static str>,
    pub contact: &'static str,
}

#[derive(Clone, Copy, Debug, Eq, PartialEq)]
pub enum InputFormat {
    RawBinary,
    AsciiBits,
}

/// One entry of the parameter schema returned by `get_parameters_info`.
#[derive(Clone, Debug)]
pub struct ParameterInfo {
    pub name: &'static str,
    pub data_type: DataType,
    pub precision: Option<u32>,
    pub units: Option<&'static str>,
    pub default: &'static str,
    pub min: Option<&'static str>,
    pub max: Option<&'static str>,
}
