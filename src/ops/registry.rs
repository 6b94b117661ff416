use std::collections::HashMap;
use std::fmt::Debug;

use crate::error::{Error, Result};
use crate::model::{canonical_domain, DataType, Dimension, Node, TensorInfo};

/// Element type and shape of a value, as far as they are known
#[derive(Debug, Clone, PartialEq)]
pub struct ValueType {
    pub data_type: DataType,
    pub shape: Option<Vec<Dimension>>,
}

impl ValueType {
    pub fn unknown() -> Self {
        Self {
            data_type: DataType::Undefined,
            shape: None,
        }
    }
}

impl From<&TensorInfo> for ValueType {
    fn from(info: &TensorInfo) -> Self {
        Self {
            data_type: info.data_type,
            shape: info.shape.clone(),
        }
    }
}

/// Operator schema for validation
#[derive(Debug, Clone)]
pub struct OpSchema {
    pub name: String,
    pub domain: String,
    pub since_version: i64,
    pub inputs: Vec<FormalParameter>,
    pub outputs: Vec<FormalParameter>,
}

/// Formal parameter for operator schema
#[derive(Debug, Clone)]
pub struct FormalParameter {
    pub name: String,
    pub description: String,
    pub type_constraints: Option<Vec<DataType>>,
    pub optional: bool,
    pub variadic: bool,
}

/// Static checks and type inference for one ONNX operator
pub trait Operator: Send + Sync + Debug {
    /// Every versioned schema of the operator, in any order
    fn schemas(&self) -> Vec<OpSchema>;

    /// Infer output element types and shapes from the input types
    fn output_types(&self, node: &Node, inputs: &[ValueType]) -> Result<Vec<ValueType>>;

    /// Operator-specific structural checks beyond the schema arity
    fn validate(&self, _node: &Node) -> Result<()> {
        Ok(())
    }
}

/// Registry for ONNX operators
#[derive(Debug, Default)]
pub struct OperatorRegistry {
    operators: HashMap<(String, String), Box<dyn Operator>>,
}

impl OperatorRegistry {
    /// Create a new operator registry
    pub fn new() -> Self {
        Self {
            operators: HashMap::new(),
        }
    }

    /// Register an operator under the name and domain of its schemas
    pub fn register_operator(&mut self, op: Box<dyn Operator>) -> Result<()> {
        let schemas = op.schemas();
        let first = schemas.first().ok_or_else(|| {
            Error::InvalidOperator(format!("Operator {:?} declares no schema", op))
        })?;
        let key = (first.domain.clone(), first.name.clone());

        if schemas
            .iter()
            .any(|s| s.domain != key.0 || s.name != key.1)
        {
            return Err(Error::InvalidOperator(format!(
                "Operator {:?} mixes schemas of different operators",
                op
            )));
        }

        if self.operators.contains_key(&key) {
            return Err(Error::InvalidOperator(format!(
                "Operator {}.{} is already registered",
                key.0, key.1
            )));
        }

        self.operators.insert(key, op);
        Ok(())
    }

    /// Get an operator by name and domain; `ai.onnx` resolves to the default
    /// domain
    pub fn get_operator(&self, name: &str, domain: &str) -> Option<&dyn Operator> {
        self.operators
            .get(&(canonical_domain(domain).to_string(), name.to_string()))
            .map(|op| op.as_ref())
    }

    /// Schema in effect at `version`: the newest one not newer than it
    pub fn get_schema(&self, name: &str, domain: &str, version: i64) -> Option<OpSchema> {
        self.get_operator(name, domain)?
            .schemas()
            .into_iter()
            .filter(|schema| schema.since_version <= version)
            .max_by_key(|schema| schema.since_version)
    }

    /// Initialize the registry with standard operators
    pub fn initialize_standard_operators() -> Result<Self> {
        use crate::ops::math::matmul::MatMul;

        let mut registry = Self::new();
        registry.register_operator(Box::new(MatMul::default()))?;
        Ok(registry)
    }
}
