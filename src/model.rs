use std::collections::HashMap;
use std::fmt;

use serde::{Deserialize, Serialize};
use strum_macros::{Display, EnumIter, EnumString};

/// Unique identifier for a node in the graph
pub type NodeId = usize;

/// The default operator-set domain (`ai.onnx`)
pub const DEFAULT_DOMAIN: &str = "";

/// Map the `ai.onnx` alias onto the default domain; other domains are
/// returned unchanged.
pub fn canonical_domain(domain: &str) -> &str {
    if domain == "ai.onnx" {
        DEFAULT_DOMAIN
    } else {
        domain
    }
}

/// Metadata about the ONNX model
#[derive(Debug, Clone, PartialEq)]
pub struct ModelMetadata {
    pub producer_name: String,
    pub producer_version: String,
    pub domain: String,
    pub model_version: i64,
    pub doc_string: String,
    pub ir_version: i64,
    pub metadata_props: Vec<(String, String)>,
}

impl Default for ModelMetadata {
    fn default() -> Self {
        Self {
            producer_name: env!("CARGO_PKG_NAME").to_string(),
            producer_version: env!("CARGO_PKG_VERSION").to_string(),
            domain: String::new(),
            model_version: 0,
            doc_string: String::new(),
            ir_version: 4,
            metadata_props: Vec::new(),
        }
    }
}

/// ONNX tensor element types, `TensorProto.DataType` in the wire format.
///
/// Parses from and prints as the lowercase ONNX name (`float`, `int64`, ...).
#[derive(
    Debug, Clone, Copy, PartialEq, Eq, Hash, Display, EnumString, EnumIter, Serialize, Deserialize,
)]
#[strum(serialize_all = "lowercase", ascii_case_insensitive)]
#[serde(rename_all = "lowercase")]
pub enum DataType {
    Undefined,
    Float,
    Double,
    Int8,
    Int16,
    Int32,
    Int64,
    Uint8,
    Uint16,
    Uint32,
    Uint64,
    String,
    Bool,
    Float16,
    Complex64,
    Complex128,
    BFloat16,
    // 8-bit float types added in ONNX 1.13
    Float8E4M3FN,
    Float8E4M3FNUZ,
    Float8E5M2,
    Float8E5M2FNUZ,
}

impl DataType {
    pub fn from_proto(proto_type: i32) -> Self {
        match proto_type {
            1 => DataType::Float,
            2 => DataType::Uint8,
            3 => DataType::Int8,
            4 => DataType::Uint16,
            5 => DataType::Int16,
            6 => DataType::Int32,
            7 => DataType::Int64,
            8 => DataType::String,
            9 => DataType::Bool,
            10 => DataType::Float16,
            11 => DataType::Double,
            12 => DataType::Uint32,
            13 => DataType::Uint64,
            14 => DataType::Complex64,
            15 => DataType::Complex128,
            16 => DataType::BFloat16,
            17 => DataType::Float8E4M3FN,
            18 => DataType::Float8E4M3FNUZ,
            19 => DataType::Float8E5M2,
            20 => DataType::Float8E5M2FNUZ,
            _ => DataType::Undefined,
        }
    }

    pub fn to_proto(self) -> i32 {
        match self {
            DataType::Undefined => 0,
            DataType::Float => 1,
            DataType::Uint8 => 2,
            DataType::Int8 => 3,
            DataType::Uint16 => 4,
            DataType::Int16 => 5,
            DataType::Int32 => 6,
            DataType::Int64 => 7,
            DataType::String => 8,
            DataType::Bool => 9,
            DataType::Float16 => 10,
            DataType::Double => 11,
            DataType::Uint32 => 12,
            DataType::Uint64 => 13,
            DataType::Complex64 => 14,
            DataType::Complex128 => 15,
            DataType::BFloat16 => 16,
            DataType::Float8E4M3FN => 17,
            DataType::Float8E4M3FNUZ => 18,
            DataType::Float8E5M2 => 19,
            DataType::Float8E5M2FNUZ => 20,
        }
    }
}

/// A single dimension of a tensor shape
#[derive(Debug, Clone, PartialEq, Eq, Hash)]
pub enum Dimension {
    Value(i64),
    Param(String),
    /// Declared but neither sized nor named
    Unknown,
}

impl Dimension {
    pub fn value(&self) -> Option<i64> {
        match self {
            Dimension::Value(v) => Some(*v),
            _ => None,
        }
    }
}

impl From<i64> for Dimension {
    fn from(value: i64) -> Self {
        Dimension::Value(value)
    }
}

impl From<Option<i64>> for Dimension {
    fn from(value: Option<i64>) -> Self {
        value.map(Dimension::Value).unwrap_or(Dimension::Unknown)
    }
}

impl From<&str> for Dimension {
    fn from(param: &str) -> Self {
        Dimension::Param(param.to_string())
    }
}

impl fmt::Display for Dimension {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Dimension::Value(v) => write!(f, "{}", v),
            Dimension::Param(p) => write!(f, "{}", p),
            Dimension::Unknown => write!(f, "?"),
        }
    }
}

/// Render a shape as `[4000, N, ?]`
pub fn format_shape(shape: &[Dimension]) -> String {
    let dims: Vec<String> = shape.iter().map(ToString::to_string).collect();
    format!("[{}]", dims.join(", "))
}

/// Name, element type and shape of a graph value. Carries no data.
#[derive(Debug, Clone, PartialEq)]
pub struct TensorInfo {
    pub name: String,
    pub data_type: DataType,
    /// `None` when the shape itself (not just some dimension) is unknown
    pub shape: Option<Vec<Dimension>>,
    pub doc_string: String,
}

impl TensorInfo {
    /// Concrete dimensions, or `None` if any dimension is symbolic or unknown
    pub fn concrete_shape(&self) -> Option<Vec<i64>> {
        self.shape
            .as_ref()?
            .iter()
            .map(Dimension::value)
            .collect()
    }

    pub fn rank(&self) -> Option<usize> {
        self.shape.as_ref().map(Vec::len)
    }
}

/// Node in the computation graph
#[derive(Debug, Clone, PartialEq)]
pub struct Node {
    pub id: NodeId,
    pub name: String,
    pub op_type: String,
    pub domain: String,
    pub inputs: Vec<String>,
    pub outputs: Vec<String>,
    pub doc_string: String,
}

impl Node {
    /// Name used in diagnostics: the node name, or op type and position
    pub fn display_name(&self) -> String {
        if self.name.is_empty() {
            format!("{}#{}", self.op_type, self.id)
        } else {
            self.name.clone()
        }
    }
}

/// Graph structure containing nodes and their boundary values
#[derive(Debug, Clone, PartialEq)]
pub struct Graph {
    pub name: String,
    pub nodes: Vec<Node>,
    pub inputs: Vec<TensorInfo>,
    pub outputs: Vec<TensorInfo>,
    /// Intermediate values
    pub value_info: Vec<TensorInfo>,
    /// Constant tensors stored in the graph. Only their descriptors are
    /// kept; the payload is not loaded.
    pub initializers: Vec<TensorInfo>,
    pub doc_string: String,
}

/// An operator set the model was written against
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct OpsetImport {
    pub domain: String,
    pub version: i64,
}

impl OpsetImport {
    pub fn new(domain: impl Into<String>, version: i64) -> Self {
        Self {
            domain: domain.into(),
            version,
        }
    }
}

/// The complete ONNX model
#[derive(Debug, Clone, PartialEq)]
pub struct OnnxModel {
    pub metadata: ModelMetadata,
    pub graph: Graph,
    /// Kept in declaration order, as written to the file
    pub opset_imports: Vec<OpsetImport>,
}

impl OnnxModel {
    /// Domain to version lookup of the imported operator sets, keyed by
    /// canonical domain
    pub fn opset_map(&self) -> HashMap<&str, i64> {
        self.opset_imports
            .iter()
            .map(|import| (canonical_domain(&import.domain), import.version))
            .collect()
    }

    pub fn summary(&self) -> ModelSummary {
        ModelSummary {
            graph_name: self.graph.name.clone(),
            ir_version: self.metadata.ir_version,
            producer: format!(
                "{} {}",
                self.metadata.producer_name, self.metadata.producer_version
            )
            .trim()
            .to_string(),
            opset_imports: self
                .opset_imports
                .iter()
                .map(|import| OpsetSummary {
                    domain: import.domain.clone(),
                    version: import.version,
                })
                .collect(),
            inputs: self.graph.inputs.iter().map(ValueSummary::from).collect(),
            outputs: self.graph.outputs.iter().map(ValueSummary::from).collect(),
            nodes: self
                .graph
                .nodes
                .iter()
                .map(|node| NodeSummary {
                    op_type: node.op_type.clone(),
                    inputs: node.inputs.clone(),
                    outputs: node.outputs.clone(),
                })
                .collect(),
        }
    }
}

/// Serializable overview of a model, printed by the CLI
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct ModelSummary {
    pub graph_name: String,
    pub ir_version: i64,
    pub producer: String,
    pub opset_imports: Vec<OpsetSummary>,
    pub inputs: Vec<ValueSummary>,
    pub outputs: Vec<ValueSummary>,
    pub nodes: Vec<NodeSummary>,
}

#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct OpsetSummary {
    pub domain: String,
    pub version: i64,
}

#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct ValueSummary {
    pub name: String,
    pub elem_type: DataType,
    /// Dimensions rendered as text, `?` for unknown
    pub shape: Option<Vec<String>>,
}

impl From<&TensorInfo> for ValueSummary {
    fn from(info: &TensorInfo) -> Self {
        Self {
            name: info.name.clone(),
            elem_type: info.data_type,
            shape: info
                .shape
                .as_ref()
                .map(|dims| dims.iter().map(ToString::to_string).collect()),
        }
    }
}

#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct NodeSummary {
    pub op_type: String,
    pub inputs: Vec<String>,
    pub outputs: Vec<String>,
}
