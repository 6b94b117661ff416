pub mod config;
pub mod error;
pub mod model;
pub mod ops;
pub mod parser;
pub mod pipeline;
pub mod proto;

// Re-export commonly used types
pub use config::MatMulConfig;
pub use error::{Error, Result};
pub use model::{
    DataType, Dimension, Graph, ModelMetadata, ModelSummary, Node, NodeId, OnnxModel,
    OpsetImport, TensorInfo,
};
pub use ops::registry::{Operator, OperatorRegistry};
pub use parser::{GraphBuilder, MatMulShapes, ModelWriter, OnnxModelLoader, SchemaValidator};
pub use pipeline::{check_model_file, generate_model};
