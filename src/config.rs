use std::fs;
use std::path::{Path, PathBuf};

use log::debug;
use serde::Deserialize;

use crate::error::{Error, Result};
use crate::model::DataType;

/// Parameters of the generated MatMul fixture.
///
/// `A` is declared `[m, n]`, `B` is `[n, m]` and `C` is `[m, m]`.
#[derive(Debug, Clone, PartialEq, Deserialize)]
#[serde(default, deny_unknown_fields)]
pub struct MatMulConfig {
    pub m: i64,
    pub n: i64,
    pub elem_type: DataType,
    pub opset_version: i64,
    pub ir_version: i64,
    pub graph_name: String,
    pub producer_name: String,
    pub output_path: PathBuf,
}

impl Default for MatMulConfig {
    fn default() -> Self {
        Self {
            m: 4000,
            n: 4000,
            elem_type: DataType::Float,
            opset_version: 9,
            ir_version: 4,
            graph_name: "mat_mul".to_string(),
            producer_name: env!("CARGO_PKG_NAME").to_string(),
            output_path: PathBuf::from("mat_mul.onnx"),
        }
    }
}

impl MatMulConfig {
    /// Load a config from a JSON file; absent fields keep their defaults
    pub fn from_json_file(path: &Path) -> Result<Self> {
        let text = fs::read_to_string(path).map_err(|e| {
            Error::ConfigError(format!("cannot read {}: {}", path.display(), e))
        })?;
        let config: Self = serde_json::from_str(&text)?;
        debug!("Loaded config from {}: {:?}", path.display(), config);
        config.validate()?;
        Ok(config)
    }

    pub fn validate(&self) -> Result<()> {
        if self.m <= 0 || self.n <= 0 {
            return Err(Error::ConfigError(format!(
                "matrix dimensions must be positive, got m={} n={}",
                self.m, self.n
            )));
        }
        if self.opset_version < 1 {
            return Err(Error::ConfigError(format!(
                "opset version must be at least 1, got {}",
                self.opset_version
            )));
        }
        if self.elem_type == DataType::Undefined {
            return Err(Error::ConfigError("element type must be defined".to_string()));
        }
        if self.graph_name.is_empty() {
            return Err(Error::ConfigError("graph name must not be empty".to_string()));
        }
        Ok(())
    }

    pub fn a_shape(&self) -> [i64; 2] {
        [self.m, self.n]
    }

    pub fn b_shape(&self) -> [i64; 2] {
        [self.n, self.m]
    }

    pub fn c_shape(&self) -> [i64; 2] {
        [self.m, self.m]
    }
}
