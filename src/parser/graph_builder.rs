use std::collections::HashMap;

use log::{debug, info};
use petgraph::graph::{DiGraph, NodeIndex};

use crate::config::MatMulConfig;
use crate::error::{Error, Result};
use crate::model::{
    format_shape, DataType, Dimension, Graph, ModelMetadata, Node, NodeId, OnnxModel, OpsetImport, TensorInfo,
    DEFAULT_DOMAIN,
};

/// Declared shapes of the three MatMul operands
#[derive(Debug, Clone, PartialEq)]
pub struct MatMulShapes {
    pub a: Vec<Dimension>,
    pub b: Vec<Dimension>,
    pub c: Vec<Dimension>,
}

impl MatMulShapes {
    pub fn from_config(config: &MatMulConfig) -> Self {
        Self {
            a: config.a_shape().iter().copied().map(Dimension::Value).collect(),
            b: config.b_shape().iter().copied().map(Dimension::Value).collect(),
            c: config.c_shape().iter().copied().map(Dimension::Value).collect(),
        }
    }
}

/// Graph builder responsible for constructing models from plain arguments
pub struct GraphBuilder;

impl GraphBuilder {
    /// Describe a tensor-typed graph value
    pub fn make_tensor_value_info<D>(name: &str, data_type: DataType, dims: Vec<D>) -> Result<TensorInfo>
    where
        D: Into<Dimension>,
    {
        if name.is_empty() {
            return Err(Error::InvalidGraph("Tensor name must not be empty".to_string()));
        }

        let shape: Vec<Dimension> = dims.into_iter().map(Into::into).collect();
        if let Some(negative) = shape.iter().filter_map(Dimension::value).find(|&v| v < 0) {
            return Err(Error::InvalidGraph(format!(
                "Tensor {} has negative dimension {}",
                name, negative
            )));
        }

        Ok(TensorInfo {
            name: name.to_string(),
            data_type,
            shape: Some(shape),
            doc_string: String::new(),
        })
    }

    /// Create an operator node of the default domain
    pub fn make_node(op_type: &str, inputs: &[&str], outputs: &[&str]) -> Result<Node> {
        if op_type.is_empty() {
            return Err(Error::InvalidGraph("Node operator type must not be empty".to_string()));
        }
        if outputs.is_empty() {
            return Err(Error::InvalidGraph(format!(
                "{} node must produce at least one output",
                op_type
            )));
        }

        Ok(Node {
            id: 0,
            name: String::new(),
            op_type: op_type.to_string(),
            domain: DEFAULT_DOMAIN.to_string(),
            inputs: inputs.iter().map(|s| s.to_string()).collect(),
            outputs: outputs.iter().map(|s| s.to_string()).collect(),
            doc_string: String::new(),
        })
    }

    /// Assemble a graph; node ids are assigned in list order
    pub fn make_graph(
        nodes: Vec<Node>,
        name: &str,
        inputs: Vec<TensorInfo>,
        outputs: Vec<TensorInfo>,
    ) -> Result<Graph> {
        if name.is_empty() {
            return Err(Error::InvalidGraph("Graph name must not be empty".to_string()));
        }

        let nodes = nodes
            .into_iter()
            .enumerate()
            .map(|(id, node)| Node { id, ..node })
            .collect();

        Ok(Graph {
            name: name.to_string(),
            nodes,
            inputs,
            outputs,
            value_info: Vec::new(),
            initializers: Vec::new(),
            doc_string: String::new(),
        })
    }

    /// Wrap a graph into a model container
    pub fn make_model(graph: Graph, opset_imports: Vec<OpsetImport>) -> Result<OnnxModel> {
        if opset_imports.is_empty() {
            return Err(Error::InvalidModel(
                "Model must import at least one operator set".to_string(),
            ));
        }

        Ok(OnnxModel {
            metadata: ModelMetadata::default(),
            graph,
            opset_imports,
        })
    }

    /// Build the MatMul fixture described by `config`
    pub fn build_mat_mul_model(config: &MatMulConfig) -> Result<OnnxModel> {
        config.validate()?;
        Self::build_mat_mul_model_with_shapes(config, &MatMulShapes::from_config(config))
    }

    /// Build the MatMul fixture with explicitly declared operand shapes.
    ///
    /// The shapes are not checked against each other here; that is the
    /// validator's job.
    pub fn build_mat_mul_model_with_shapes(
        config: &MatMulConfig,
        shapes: &MatMulShapes,
    ) -> Result<OnnxModel> {
        let opset = OpsetImport::new(DEFAULT_DOMAIN, config.opset_version);

        let a = Self::make_tensor_value_info("A", config.elem_type, shapes.a.clone())?;
        let b = Self::make_tensor_value_info("B", config.elem_type, shapes.b.clone())?;
        let c = Self::make_tensor_value_info("C", config.elem_type, shapes.c.clone())?;

        let node = Self::make_node("MatMul", &["A", "B"], &["C"])?;
        let graph = Self::make_graph(vec![node], &config.graph_name, vec![a, b], vec![c])?;

        let mut model = Self::make_model(graph, vec![opset])?;
        model.metadata.ir_version = config.ir_version;
        model.metadata.producer_name = config.producer_name.clone();

        info!(
            "Built model {} (opset {}): A{} x B{} -> C{}",
            config.graph_name,
            config.opset_version,
            format_shape(&shapes.a),
            format_shape(&shapes.b),
            format_shape(&shapes.c)
        );
        Ok(model)
    }

    /// Build the node dependency graph: an edge runs from the producer of a
    /// tensor to each of its consumers, weighted by the tensor name.
    pub fn dependency_graph(graph: &Graph) -> DiGraph<NodeId, String> {
        let mut deps = DiGraph::new();
        let indices: Vec<NodeIndex> = graph.nodes.iter().map(|n| deps.add_node(n.id)).collect();

        let mut tensor_producers: HashMap<&str, NodeIndex> = HashMap::new();
        for (node, &index) in graph.nodes.iter().zip(&indices) {
            for output in node.outputs.iter().filter(|o| !o.is_empty()) {
                tensor_producers.insert(output.as_str(), index);
            }
        }

        for (node, &index) in graph.nodes.iter().zip(&indices) {
            for input in node.inputs.iter().filter(|i| !i.is_empty()) {
                // If the tensor doesn't have a producer, it's an external input
                if let Some(&producer) = tensor_producers.get(input.as_str()) {
                    deps.add_edge(producer, index, input.clone());
                }
            }
        }

        debug!(
            "Dependency graph of {}: {} nodes, {} edges",
            graph.name,
            deps.node_count(),
            deps.edge_count()
        );
        deps
    }
}
