use std::fs;
use std::path::Path;

use bytes::{Bytes, BytesMut};
use log::info;
use prost::Message;

use crate::error::{Error, Result};
use crate::model::{Dimension, Graph, Node, OnnxModel, TensorInfo};
use crate::proto::{
    tensor_shape_proto, type_proto, GraphProto, ModelProto, NodeProto, OperatorSetIdProto,
    StringStringEntryProto, TensorShapeProto, TypeProto, ValueInfoProto,
};

/// Writes models in the binary protobuf ONNX format
pub struct ModelWriter;

impl ModelWriter {
    /// Save a model to `path`, replacing any existing file.
    ///
    /// The file is written in one shot; a failed write may leave a partial
    /// file behind.
    pub fn save_model(model: &OnnxModel, path: &Path) -> Result<()> {
        let bytes = Self::to_bytes(model)?;

        fs::write(path, &bytes)
            .map_err(|e| Error::ModelSaveError(path.to_path_buf(), e.to_string()))?;

        info!("Wrote {} bytes to {}", bytes.len(), path.display());
        Ok(())
    }

    /// Encode a model into protobuf bytes
    pub fn to_bytes(model: &OnnxModel) -> Result<Bytes> {
        let proto = Self::to_proto(model)?;

        let mut buffer = BytesMut::with_capacity(proto.encoded_len());
        proto.encode(&mut buffer)?;
        Ok(buffer.freeze())
    }

    /// Convert internal representation to the protobuf model.
    ///
    /// Graphs with initializers are rejected: only their descriptors are held
    /// in memory, so the tensor data cannot be written back.
    pub fn to_proto(model: &OnnxModel) -> Result<ModelProto> {
        let metadata = &model.metadata;

        if let Some(init) = model.graph.initializers.first() {
            return Err(Error::UnsupportedFeature(format!(
                "Cannot write initializer '{}' without its tensor data",
                init.name
            )));
        }

        Ok(ModelProto {
            ir_version: Some(metadata.ir_version),
            opset_import: model
                .opset_imports
                .iter()
                .map(|import| OperatorSetIdProto {
                    domain: Some(import.domain.clone()),
                    version: Some(import.version),
                })
                .collect(),
            producer_name: non_empty(&metadata.producer_name),
            producer_version: non_empty(&metadata.producer_version),
            domain: non_empty(&metadata.domain),
            model_version: (metadata.model_version != 0).then_some(metadata.model_version),
            doc_string: non_empty(&metadata.doc_string),
            graph: Some(Self::convert_graph(&model.graph)),
            metadata_props: metadata
                .metadata_props
                .iter()
                .map(|(key, value)| StringStringEntryProto {
                    key: Some(key.clone()),
                    value: Some(value.clone()),
                })
                .collect(),
        })
    }

    fn convert_graph(graph: &Graph) -> GraphProto {
        GraphProto {
            node: graph.nodes.iter().map(Self::convert_node).collect(),
            name: Some(graph.name.clone()),
            initializer: Vec::new(),
            doc_string: non_empty(&graph.doc_string),
            input: graph.inputs.iter().map(Self::convert_value_info).collect(),
            output: graph.outputs.iter().map(Self::convert_value_info).collect(),
            value_info: graph.value_info.iter().map(Self::convert_value_info).collect(),
        }
    }

    fn convert_node(node: &Node) -> NodeProto {
        NodeProto {
            input: node.inputs.clone(),
            output: node.outputs.clone(),
            name: non_empty(&node.name),
            op_type: Some(node.op_type.clone()),
            domain: non_empty(&node.domain),
            doc_string: non_empty(&node.doc_string),
        }
    }

    fn convert_value_info(info: &TensorInfo) -> ValueInfoProto {
        let shape = info.shape.as_ref().map(|dims| TensorShapeProto {
            dim: dims
                .iter()
                .map(|dim| tensor_shape_proto::Dimension {
                    value: match dim {
                        Dimension::Value(v) => {
                            Some(tensor_shape_proto::dimension::Value::DimValue(*v))
                        }
                        Dimension::Param(p) => {
                            Some(tensor_shape_proto::dimension::Value::DimParam(p.clone()))
                        }
                        Dimension::Unknown => None,
                    },
                    denotation: None,
                })
                .collect(),
        });

        ValueInfoProto {
            name: Some(info.name.clone()),
            r#type: Some(TypeProto {
                value: Some(type_proto::Value::TensorType(type_proto::Tensor {
                    elem_type: Some(info.data_type.to_proto()),
                    shape,
                })),
                denotation: None,
            }),
            doc_string: non_empty(&info.doc_string),
        }
    }
}

fn non_empty(value: &str) -> Option<String> {
    (!value.is_empty()).then(|| value.to_string())
}
