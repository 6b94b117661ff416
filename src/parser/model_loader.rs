use std::fs::File;
use std::io::Read;
use std::path::Path;

use log::{debug, info};
use prost::Message;

use crate::error::{Error, Result};
use crate::model::{DataType, Dimension, Graph, ModelMetadata, Node, OnnxModel, OpsetImport, TensorInfo};
use crate::proto::{
    tensor_shape_proto::dimension, type_proto, GraphProto, ModelProto, NodeProto,
    OperatorSetIdProto, TensorProto, ValueInfoProto,
};

/// ONNX model loader responsible for parsing and loading ONNX models
pub struct OnnxModelLoader;

impl OnnxModelLoader {
    /// Load an ONNX model from a file path
    pub fn load_model(path: &Path) -> Result<OnnxModel> {
        let mut file = File::open(path).map_err(|e| {
            Error::ModelLoadError(path.to_path_buf(), format!("Failed to open file: {}", e))
        })?;

        let mut buffer = Vec::new();
        file.read_to_end(&mut buffer).map_err(|e| {
            Error::ModelLoadError(path.to_path_buf(), format!("Failed to read file: {}", e))
        })?;

        info!("Read {} bytes from {}", buffer.len(), path.display());
        Self::load_model_from_bytes(&buffer)
    }

    /// Load an ONNX model from bytes
    pub fn load_model_from_bytes(data: &[u8]) -> Result<OnnxModel> {
        let model_proto = Self::deserialize_model_proto(data)?;
        Self::convert_proto_to_internal(model_proto)
    }

    /// Deserialize protobuf bytes into a ModelProto
    pub fn deserialize_model_proto(bytes: &[u8]) -> Result<ModelProto> {
        ModelProto::decode(bytes).map_err(Error::ProtobufError)
    }

    /// Convert protobuf model to internal representation
    pub fn convert_proto_to_internal(mut proto: ModelProto) -> Result<OnnxModel> {
        let graph_proto = proto
            .graph
            .take()
            .ok_or_else(|| Error::MissingField("Model is missing graph".to_string()))?;

        let opset_imports = Self::handle_opset_imports(&proto.opset_import)?;
        let metadata = Self::extract_model_metadata(&proto);
        let graph = Self::convert_graph_proto(graph_proto)?;

        debug!(
            "Decoded model {}: {} nodes, {} inputs, {} outputs",
            graph.name,
            graph.nodes.len(),
            graph.inputs.len(),
            graph.outputs.len()
        );

        Ok(OnnxModel {
            metadata,
            graph,
            opset_imports,
        })
    }

    /// Extract model metadata from protobuf
    pub fn extract_model_metadata(proto: &ModelProto) -> ModelMetadata {
        ModelMetadata {
            producer_name: proto.producer_name.clone().unwrap_or_default(),
            producer_version: proto.producer_version.clone().unwrap_or_default(),
            domain: proto.domain.clone().unwrap_or_default(),
            model_version: proto.model_version.unwrap_or_default(),
            doc_string: proto.doc_string.clone().unwrap_or_default(),
            ir_version: proto.ir_version.unwrap_or_default(),
            metadata_props: proto
                .metadata_props
                .iter()
                .map(|entry| {
                    (
                        entry.key.clone().unwrap_or_default(),
                        entry.value.clone().unwrap_or_default(),
                    )
                })
                .collect(),
        }
    }

    /// Process opset imports, keeping their declaration order
    pub fn handle_opset_imports(imports: &[OperatorSetIdProto]) -> Result<Vec<OpsetImport>> {
        imports
            .iter()
            .map(|import| -> Result<OpsetImport> {
                let domain = import.domain.clone().unwrap_or_default();
                let version = import.version.ok_or_else(|| {
                    Error::MissingField(format!("Operator set '{}' has no version", domain))
                })?;
                Ok(OpsetImport::new(domain, version))
            })
            .collect()
    }

    /// Extract input tensor information from model
    pub fn get_input_info(model: &OnnxModel) -> Vec<TensorInfo> {
        model.graph.inputs.clone()
    }

    /// Extract output tensor information from model
    pub fn get_output_info(model: &OnnxModel) -> Vec<TensorInfo> {
        model.graph.outputs.clone()
    }

    /// Convert a GraphProto to internal Graph representation
    fn convert_graph_proto(graph_proto: GraphProto) -> Result<Graph> {
        let inputs = graph_proto
            .input
            .iter()
            .map(Self::convert_value_info_proto)
            .collect::<Result<Vec<_>>>()?;

        let outputs = graph_proto
            .output
            .iter()
            .map(Self::convert_value_info_proto)
            .collect::<Result<Vec<_>>>()?;

        let value_info = graph_proto
            .value_info
            .iter()
            .map(Self::convert_value_info_proto)
            .collect::<Result<Vec<_>>>()?;

        let initializers = graph_proto
            .initializer
            .iter()
            .map(Self::convert_tensor_proto)
            .collect();

        let nodes = graph_proto
            .node
            .iter()
            .enumerate()
            .map(|(id, node)| Self::convert_node_proto(node, id))
            .collect();

        Ok(Graph {
            name: graph_proto.name.unwrap_or_default(),
            nodes,
            inputs,
            outputs,
            value_info,
            initializers,
            doc_string: graph_proto.doc_string.unwrap_or_default(),
        })
    }

    /// Convert a NodeProto to internal Node representation
    fn convert_node_proto(node_proto: &NodeProto, id: usize) -> Node {
        Node {
            id,
            name: node_proto.name.clone().unwrap_or_default(),
            op_type: node_proto.op_type.clone().unwrap_or_default(),
            domain: node_proto.domain.clone().unwrap_or_default(),
            inputs: node_proto.input.clone(),
            outputs: node_proto.output.clone(),
            doc_string: node_proto.doc_string.clone().unwrap_or_default(),
        }
    }

    /// Describe an initializer by its header; the payload is dropped
    fn convert_tensor_proto(tensor: &TensorProto) -> TensorInfo {
        TensorInfo {
            name: tensor.name.clone().unwrap_or_default(),
            data_type: tensor
                .data_type
                .map(DataType::from_proto)
                .unwrap_or(DataType::Undefined),
            shape: Some(tensor.dims.iter().copied().map(Dimension::Value).collect()),
            doc_string: tensor.doc_string.clone().unwrap_or_default(),
        }
    }

    /// Convert a ValueInfoProto to internal TensorInfo representation
    fn convert_value_info_proto(value_info: &ValueInfoProto) -> Result<TensorInfo> {
        let name = value_info.name.clone().unwrap_or_default();
        let doc_string = value_info.doc_string.clone().unwrap_or_default();

        let type_proto = value_info
            .r#type
            .as_ref()
            .ok_or_else(|| Error::MissingField(format!("Missing type for value info: {}", name)))?;

        let tensor = match &type_proto.value {
            Some(type_proto::Value::TensorType(tensor)) => tensor,
            None => {
                return Err(Error::UnsupportedFeature(format!(
                    "Value info {} is not tensor-typed",
                    name
                )))
            }
        };

        let shape = tensor.shape.as_ref().map(|shape| {
            shape
                .dim
                .iter()
                .map(|dim| match &dim.value {
                    Some(dimension::Value::DimValue(v)) => Dimension::Value(*v),
                    Some(dimension::Value::DimParam(p)) => Dimension::Param(p.clone()),
                    None => Dimension::Unknown,
                })
                .collect()
        });

        Ok(TensorInfo {
            name,
            data_type: tensor
                .elem_type
                .map(DataType::from_proto)
                .unwrap_or(DataType::Undefined),
            shape,
            doc_string,
        })
    }
}
