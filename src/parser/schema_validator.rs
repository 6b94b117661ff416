use std::collections::{HashMap, HashSet};

use log::{debug, info, warn};
use petgraph::algo::toposort;

use crate::error::{Error, Result};
use crate::model::{
    canonical_domain, format_shape, DataType, Dimension, Graph, Node, OnnxModel, TensorInfo,
    DEFAULT_DOMAIN,
};
use crate::ops::registry::{OpSchema, OperatorRegistry, ValueType};
use crate::parser::graph_builder::GraphBuilder;

/// ONNX schema validator responsible for validating model against operator schemas
pub struct SchemaValidator {
    registry: OperatorRegistry,

    // Minimum supported IR version
    min_ir_version: i64,

    // Maximum supported IR version
    max_ir_version: i64,

    // Newest default-domain operator set this validator knows about
    max_opset_version: i64,
}

impl SchemaValidator {
    /// Create a new schema validator with the standard operators registered
    pub fn new() -> Result<Self> {
        Ok(Self::with_registry(
            OperatorRegistry::initialize_standard_operators()?,
        ))
    }

    pub fn with_registry(registry: OperatorRegistry) -> Self {
        Self {
            registry,
            min_ir_version: 3,
            max_ir_version: 10,
            max_opset_version: 22,
        }
    }

    /// Validate the ONNX model: structure, operator schemas, then types and
    /// shapes
    pub fn validate_model(&self, model: &OnnxModel) -> Result<()> {
        self.check_version_compatibility(model)?;
        self.check_opset_imports(model)?;
        self.validate_graph(&model.graph, &model.opset_map())?;
        self.infer_shapes(model)?;

        info!("Model {} passed validation", model.graph.name);
        Ok(())
    }

    /// Check if the model IR version is compatible
    pub fn check_version_compatibility(&self, model: &OnnxModel) -> Result<()> {
        let ir_version = model.metadata.ir_version;

        if ir_version < self.min_ir_version || ir_version > self.max_ir_version {
            return Err(Error::VersionIncompatible(format!(
                "IR version {} is not supported (min: {}, max: {})",
                ir_version, self.min_ir_version, self.max_ir_version
            )));
        }

        Ok(())
    }

    /// Every imported domain must be unique and carry a usable version.
    /// `ai.onnx` and the empty domain name the same operator set.
    pub fn check_opset_imports(&self, model: &OnnxModel) -> Result<()> {
        if model.opset_imports.is_empty() {
            return Err(Error::InvalidModel(
                "Model does not import any operator set".to_string(),
            ));
        }

        let mut domains = HashSet::new();
        for import in &model.opset_imports {
            let domain = canonical_domain(&import.domain);
            if !domains.insert(domain) {
                return Err(Error::InvalidModel(format!(
                    "Operator set domain '{}' is imported more than once",
                    import.domain
                )));
            }
            if import.version < 1 {
                return Err(Error::InvalidModel(format!(
                    "Operator set domain '{}' has invalid version {}",
                    import.domain, import.version
                )));
            }
            if domain == DEFAULT_DOMAIN && import.version > self.max_opset_version {
                return Err(Error::VersionIncompatible(format!(
                    "Operator set version {} is newer than the latest supported ({})",
                    import.version, self.max_opset_version
                )));
            }
        }

        Ok(())
    }

    /// Validate the graph structure
    pub fn validate_graph(&self, graph: &Graph, opset_imports: &HashMap<&str, i64>) -> Result<()> {
        if graph.name.is_empty() {
            return Err(Error::InvalidGraph("Graph has no name".to_string()));
        }

        // Check for duplicate node names if names are provided
        let mut node_names = HashSet::new();
        for node in &graph.nodes {
            if !node.name.is_empty() && !node_names.insert(&node.name) {
                return Err(Error::InvalidGraph(format!("Duplicate node name: {}", node.name)));
            }
        }

        let mut defined: HashSet<&str> = HashSet::new();
        for input in &graph.inputs {
            if !defined.insert(input.name.as_str()) {
                return Err(Error::InvalidGraph(format!(
                    "Duplicate graph input name: {}",
                    input.name
                )));
            }
        }

        // Initializers may also be listed as graph inputs
        let mut initializer_names = HashSet::new();
        for init in &graph.initializers {
            if !initializer_names.insert(init.name.as_str()) {
                return Err(Error::InvalidGraph(format!(
                    "Duplicate initializer name: {}",
                    init.name
                )));
            }
            defined.insert(init.name.as_str());
        }

        let deps = GraphBuilder::dependency_graph(graph);
        if let Err(cycle) = toposort(&deps, None) {
            let node = &graph.nodes[deps[cycle.node_id()]];
            return Err(Error::InvalidGraph(format!(
                "Graph contains a cycle through node {}",
                node.display_name()
            )));
        }

        let produced_later: HashSet<&str> = graph
            .nodes
            .iter()
            .flat_map(|n| n.outputs.iter().map(String::as_str))
            .collect();

        // Nodes must be listed in topological order and every value is
        // defined exactly once
        for node in &graph.nodes {
            for input in node.inputs.iter().filter(|i| !i.is_empty()) {
                if !defined.contains(input.as_str()) {
                    let reason = if produced_later.contains(input.as_str()) {
                        "is produced by a later node; nodes are not topologically sorted"
                    } else {
                        "is not defined by any graph input, initializer or node"
                    };
                    return Err(Error::InvalidGraph(format!(
                        "Input '{}' of node {} {}",
                        input,
                        node.display_name(),
                        reason
                    )));
                }
            }
            for output in node.outputs.iter().filter(|o| !o.is_empty()) {
                if !defined.insert(output.as_str()) {
                    return Err(Error::InvalidGraph(format!(
                        "Value '{}' is defined more than once (output of node {})",
                        output,
                        node.display_name()
                    )));
                }
            }
        }

        let mut output_names = HashSet::new();
        for output in &graph.outputs {
            if !output_names.insert(output.name.as_str()) {
                return Err(Error::InvalidGraph(format!(
                    "Duplicate graph output name: {}",
                    output.name
                )));
            }
            if !defined.contains(output.name.as_str()) {
                return Err(Error::InvalidGraph(format!(
                    "Graph output '{}' is not produced by any node or graph input",
                    output.name
                )));
            }
        }

        // Validate each node
        for node in &graph.nodes {
            let opset_version = match opset_imports.get(canonical_domain(&node.domain)) {
                Some(version) => *version,
                None => {
                    return Err(Error::InvalidOperator(format!(
                        "Unknown operator domain: '{}' (node {})",
                        node.domain,
                        node.display_name()
                    )))
                }
            };

            self.validate_node(node, opset_version)?;
        }

        Ok(())
    }

    /// Validate a single node
    pub fn validate_node(&self, node: &Node, opset_version: i64) -> Result<()> {
        let schema = self.schema_for(node, opset_version)?;
        debug!(
            "Node {} resolved to {}-{} at opset {}",
            node.display_name(),
            schema.name,
            schema.since_version,
            opset_version
        );

        self.check_input_types(node, &schema)?;
        self.check_output_types(node, &schema)?;

        if let Some(op) = self.registry.get_operator(&node.op_type, &node.domain) {
            op.validate(node)?;
        }

        Ok(())
    }

    fn schema_for(&self, node: &Node, opset_version: i64) -> Result<OpSchema> {
        self.registry
            .get_schema(&node.op_type, &node.domain, opset_version)
            .ok_or_else(|| {
                Error::InvalidOperator(format!(
                    "Unknown operator: '{}:{}' (version {})",
                    node.domain, node.op_type, opset_version
                ))
            })
    }

    /// Check if node inputs match schema
    pub fn check_input_types(&self, node: &Node, schema: &OpSchema) -> Result<()> {
        let required_inputs = schema
            .inputs
            .iter()
            .filter(|p| !p.optional && !p.variadic)
            .count();

        // Check if we have too many inputs
        let has_variadic = schema.inputs.iter().any(|p| p.variadic);
        if node.inputs.len() > schema.inputs.len() && !has_variadic {
            return Err(Error::ValidationError(format!(
                "Node {} has too many inputs. Expected at most {}, found {}",
                node.display_name(),
                schema.inputs.len(),
                node.inputs.len()
            )));
        }

        // Check if we have all required inputs
        if node.inputs.len() < required_inputs {
            return Err(Error::ValidationError(format!(
                "Node {} doesn't have enough inputs. Required: {}, Found: {}",
                node.display_name(),
                required_inputs,
                node.inputs.len()
            )));
        }

        Ok(())
    }

    /// Check if node outputs match schema
    pub fn check_output_types(&self, node: &Node, schema: &OpSchema) -> Result<()> {
        let required_outputs = schema
            .outputs
            .iter()
            .filter(|p| !p.optional && !p.variadic)
            .count();

        let has_variadic = schema.outputs.iter().any(|p| p.variadic);
        if node.outputs.len() > schema.outputs.len() && !has_variadic {
            return Err(Error::ValidationError(format!(
                "Node {} has too many outputs. Expected at most {}, found {}",
                node.display_name(),
                schema.outputs.len(),
                node.outputs.len()
            )));
        }

        if node.outputs.len() < required_outputs {
            return Err(Error::ValidationError(format!(
                "Node {} doesn't have enough outputs. Required: {}, Found: {}",
                node.display_name(),
                required_outputs,
                node.outputs.len()
            )));
        }

        Ok(())
    }

    /// Reject element types the operator schema does not accept
    pub fn check_type_constraints(
        &self,
        node: &Node,
        schema: &OpSchema,
        inputs: &[ValueType],
    ) -> Result<()> {
        for (param, value) in schema.inputs.iter().zip(inputs) {
            let allowed = match &param.type_constraints {
                Some(allowed) => allowed,
                None => continue,
            };
            if value.data_type != DataType::Undefined && !allowed.contains(&value.data_type) {
                return Err(Error::TypeMismatch(format!(
                    "{}-{} does not accept element type {} for input {} of node {}",
                    schema.name,
                    schema.since_version,
                    value.data_type,
                    param.name,
                    node.display_name()
                )));
            }
        }
        Ok(())
    }

    /// Propagate element types and shapes through the graph in node order.
    ///
    /// Returns a copy of the model whose graph outputs carry the merged
    /// declared and inferred information, with inferred intermediate values
    /// recorded in `value_info`. Conflicts between declared and inferred
    /// types or concrete dimensions are errors.
    pub fn infer_shapes(&self, model: &OnnxModel) -> Result<OnnxModel> {
        let graph = &model.graph;
        let opsets = model.opset_map();

        let declared: HashMap<&str, &TensorInfo> = graph
            .outputs
            .iter()
            .chain(&graph.value_info)
            .map(|info| (info.name.as_str(), info))
            .collect();

        // A declared graph input takes precedence over the initializer it overrides
        let mut known: HashMap<String, ValueType> = graph
            .initializers
            .iter()
            .chain(&graph.inputs)
            .map(|info| (info.name.clone(), ValueType::from(info)))
            .collect();
        let mut intermediates = Vec::new();

        for node in &graph.nodes {
            let opset_version = opsets
                .get(canonical_domain(&node.domain))
                .copied()
                .ok_or_else(|| {
                    Error::InvalidOperator(format!("Unknown operator domain: '{}'", node.domain))
                })?;
            let schema = self.schema_for(node, opset_version)?;
            let op = self
                .registry
                .get_operator(&node.op_type, &node.domain)
                .ok_or_else(|| {
                    Error::InvalidOperator(format!("Operator {} is not registered", node.op_type))
                })?;

            let inputs: Vec<ValueType> = node
                .inputs
                .iter()
                .map(|name| known.get(name).cloned().unwrap_or_else(ValueType::unknown))
                .collect();
            self.check_type_constraints(node, &schema, &inputs)?;

            let inferred = op.output_types(node, &inputs)?;
            for (name, value) in node.outputs.iter().zip(inferred) {
                if name.is_empty() {
                    continue;
                }
                let merged = match declared.get(name.as_str()) {
                    Some(info) => merge_value_info(info, &value)?,
                    None => {
                        let info = TensorInfo {
                            name: name.clone(),
                            data_type: value.data_type,
                            shape: value.shape.clone(),
                            doc_string: String::new(),
                        };
                        intermediates.push(info.clone());
                        info
                    }
                };
                known.insert(name.clone(), ValueType::from(&merged));
            }
        }

        let mut outputs = Vec::with_capacity(graph.outputs.len());
        for output in &graph.outputs {
            let merged = match known.get(&output.name) {
                Some(value) => merge_value_info(output, value)?,
                None => output.clone(),
            };
            if merged.data_type == DataType::Undefined {
                warn!("Element type of graph output {} could not be inferred", merged.name);
            }
            outputs.push(merged);
        }

        let output_names: HashSet<&str> = graph.outputs.iter().map(|o| o.name.as_str()).collect();
        let mut value_info = graph.value_info.clone();
        value_info.extend(
            intermediates
                .into_iter()
                .filter(|info| !output_names.contains(info.name.as_str())),
        );

        let mut inferred = model.clone();
        inferred.graph.outputs = outputs;
        inferred.graph.value_info = value_info;
        Ok(inferred)
    }
}

/// Combine a declared value description with an inferred one
fn merge_value_info(declared: &TensorInfo, inferred: &ValueType) -> Result<TensorInfo> {
    let data_type = match (declared.data_type, inferred.data_type) {
        (DataType::Undefined, other) | (other, DataType::Undefined) => other,
        (x, y) if x == y => x,
        (x, y) => {
            return Err(Error::TypeMismatch(format!(
                "'{}' is declared as {} but inferred as {}",
                declared.name, x, y
            )))
        }
    };

    let shape = match (&declared.shape, &inferred.shape) {
        (None, other) | (other, None) => other.clone(),
        (Some(decl), Some(inf)) => {
            if decl.len() != inf.len() {
                return Err(Error::ShapeMismatch(format!(
                    "'{}' is declared with shape {} but inferred rank {} ({})",
                    declared.name,
                    format_shape(decl),
                    inf.len(),
                    format_shape(inf)
                )));
            }
            let mut merged = Vec::with_capacity(decl.len());
            for (axis, (d, i)) in decl.iter().zip(inf).enumerate() {
                let dim = match (d, i) {
                    (Dimension::Value(x), Dimension::Value(y)) if x != y => {
                        return Err(Error::ShapeMismatch(format!(
                            "'{}' is declared with shape {} but inferred {} (axis {}: {} vs {})",
                            declared.name,
                            format_shape(decl),
                            format_shape(inf),
                            axis,
                            x,
                            y
                        )))
                    }
                    (Dimension::Value(x), _) | (_, Dimension::Value(x)) => Dimension::Value(*x),
                    (Dimension::Param(p), _) | (_, Dimension::Param(p)) => {
                        Dimension::Param(p.clone())
                    }
                    _ => Dimension::Unknown,
                };
                merged.push(dim);
            }
            Some(merged)
        }
    };

    Ok(TensorInfo {
        name: declared.name.clone(),
        data_type,
        shape,
        doc_string: declared.doc_string.clone(),
    })
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::config::MatMulConfig;
    use crate::model::OpsetImport;
    use crate::parser::graph_builder::MatMulShapes;

    fn fixture() -> OnnxModel {
        GraphBuilder::build_mat_mul_model(&MatMulConfig::default()).unwrap()
    }

    fn validator() -> SchemaValidator {
        SchemaValidator::new().unwrap()
    }

    #[test]
    fn fixture_is_valid() {
        assert!(validator().validate_model(&fixture()).is_ok());
    }

    #[test]
    fn ir_version_out_of_range() {
        let mut model = fixture();
        model.metadata.ir_version = 2;
        assert!(matches!(
            validator().validate_model(&model),
            Err(Error::VersionIncompatible(_))
        ));
    }

    #[test]
    fn opset_version_must_be_positive() {
        let mut model = fixture();
        model.opset_imports = vec![OpsetImport::new("", 0)];
        assert!(matches!(
            validator().validate_model(&model),
            Err(Error::InvalidModel(_))
        ));
    }

    #[test]
    fn duplicate_opset_domain() {
        let mut model = fixture();
        model.opset_imports.push(OpsetImport::new("", 13));
        assert!(matches!(
            validator().validate_model(&model),
            Err(Error::InvalidModel(_))
        ));
    }

    #[test]
    fn unimported_domain() {
        let mut model = fixture();
        model.graph.nodes[0].domain = "com.example".to_string();
        assert!(matches!(
            validator().validate_model(&model),
            Err(Error::InvalidOperator(_))
        ));
    }

    #[test]
    fn unknown_operator() {
        let mut model = fixture();
        model.graph.nodes[0].op_type = "MatMulInteger2".to_string();
        assert!(matches!(
            validator().validate_model(&model),
            Err(Error::InvalidOperator(_))
        ));
    }

    #[test]
    fn dangling_input() {
        let mut model = fixture();
        model.graph.nodes[0].inputs[1] = "D".to_string();
        let err = validator().validate_model(&model).unwrap_err();
        assert!(matches!(err, Error::InvalidGraph(_)));
        assert!(err.to_string().contains("'D'"));
    }

    #[test]
    fn undefined_graph_output() {
        let mut model = fixture();
        model.graph.outputs[0].name = "Z".to_string();
        assert!(matches!(
            validator().validate_model(&model),
            Err(Error::InvalidGraph(_))
        ));
    }

    #[test]
    fn node_output_shadows_graph_input() {
        let mut model = fixture();
        model.graph.nodes[0].outputs[0] = "A".to_string();
        assert!(matches!(
            validator().validate_model(&model),
            Err(Error::InvalidGraph(_))
        ));
    }

    #[test]
    fn duplicate_graph_input() {
        let mut model = fixture();
        model.graph.inputs[1].name = "A".to_string();
        assert!(matches!(
            validator().validate_model(&model),
            Err(Error::InvalidGraph(_))
        ));
    }

    #[test]
    fn wrong_input_count() {
        let mut model = fixture();
        model.graph.nodes[0].inputs.push("A".to_string());
        assert!(matches!(
            validator().validate_model(&model),
            Err(Error::ValidationError(_))
        ));
    }

    #[test]
    fn cycle_is_detected() {
        let nodes = vec![
            GraphBuilder::make_node("MatMul", &["X", "Q"], &["P"]).unwrap(),
            GraphBuilder::make_node("MatMul", &["P", "X"], &["Q"]).unwrap(),
        ];
        let x = GraphBuilder::make_tensor_value_info("X", DataType::Float, vec![2i64, 2]).unwrap();
        let graph = GraphBuilder::make_graph(nodes, "loop", vec![x], vec![]).unwrap();
        let model = GraphBuilder::make_model(graph, vec![OpsetImport::new("", 9)]).unwrap();

        let err = validator().validate_model(&model).unwrap_err();
        assert!(err.to_string().contains("cycle"), "{}", err);
    }

    #[test]
    fn unsorted_nodes() {
        let nodes = vec![
            GraphBuilder::make_node("MatMul", &["XW", "W"], &["Y"]).unwrap(),
            GraphBuilder::make_node("MatMul", &["X", "W"], &["XW"]).unwrap(),
        ];
        let x = GraphBuilder::make_tensor_value_info("X", DataType::Float, vec![2i64, 2]).unwrap();
        let w = GraphBuilder::make_tensor_value_info("W", DataType::Float, vec![2i64, 2]).unwrap();
        let graph = GraphBuilder::make_graph(nodes, "unsorted", vec![x, w], vec![]).unwrap();
        let model = GraphBuilder::make_model(graph, vec![OpsetImport::new("", 9)]).unwrap();

        let err = validator().validate_model(&model).unwrap_err();
        assert!(err.to_string().contains("topologically"), "{}", err);
    }

    #[test]
    fn integer_matmul_needs_opset_9() {
        let config = MatMulConfig {
            m: 2,
            n: 3,
            elem_type: DataType::Int64,
            opset_version: 8,
            ..Default::default()
        };
        let model = GraphBuilder::build_mat_mul_model(&config).unwrap();
        assert!(matches!(
            validator().validate_model(&model),
            Err(Error::TypeMismatch(_))
        ));

        let model = GraphBuilder::build_mat_mul_model(&MatMulConfig {
            opset_version: 9,
            ..config
        })
        .unwrap();
        assert!(validator().validate_model(&model).is_ok());
    }

    #[test]
    fn inner_dimension_mismatch() {
        let config = MatMulConfig::default();
        let shapes = MatMulShapes {
            a: vec![Dimension::Value(4000), Dimension::Value(4000)],
            b: vec![Dimension::Value(3000), Dimension::Value(4000)],
            c: vec![Dimension::Value(4000), Dimension::Value(4000)],
        };
        let model = GraphBuilder::build_mat_mul_model_with_shapes(&config, &shapes).unwrap();
        assert!(matches!(
            validator().validate_model(&model),
            Err(Error::ShapeMismatch(_))
        ));
    }

    #[test]
    fn declared_output_conflicts_with_inference() {
        let config = MatMulConfig::default();
        let shapes = MatMulShapes {
            a: vec![Dimension::Value(4000), Dimension::Value(4000)],
            b: vec![Dimension::Value(4000), Dimension::Value(4000)],
            c: vec![Dimension::Value(4000), Dimension::Value(10)],
        };
        let model = GraphBuilder::build_mat_mul_model_with_shapes(&config, &shapes).unwrap();
        assert!(matches!(
            validator().validate_model(&model),
            Err(Error::ShapeMismatch(_))
        ));

        let mut model = fixture();
        model.graph.outputs[0].data_type = DataType::Double;
        assert!(matches!(
            validator().validate_model(&model),
            Err(Error::TypeMismatch(_))
        ));
    }

    #[test]
    fn inference_fills_undeclared_output_type_and_dimensions() {
        let mut model = fixture();
        model.graph.outputs[0].data_type = DataType::Undefined;
        model.graph.outputs[0].shape = Some(vec![Dimension::from("M"), Dimension::Unknown]);

        let inferred = validator().infer_shapes(&model).unwrap();
        let output = &inferred.graph.outputs[0];
        assert_eq!(output.data_type, DataType::Float);
        assert_eq!(
            output.shape,
            Some(vec![Dimension::Value(4000), Dimension::Value(4000)])
        );
        assert!(inferred.graph.value_info.is_empty());
    }

    #[test]
    fn intermediate_values_are_recorded() {
        let nodes = vec![
            GraphBuilder::make_node("MatMul", &["X", "W"], &["XW"]).unwrap(),
            GraphBuilder::make_node("MatMul", &["XW", "V"], &["Y"]).unwrap(),
        ];
        let x = GraphBuilder::make_tensor_value_info("X", DataType::Float, vec![2i64, 3]).unwrap();
        let w = GraphBuilder::make_tensor_value_info("W", DataType::Float, vec![3i64, 4]).unwrap();
        let v = GraphBuilder::make_tensor_value_info("V", DataType::Float, vec![4i64, 5]).unwrap();
        let y = TensorInfo {
            name: "Y".to_string(),
            data_type: DataType::Undefined,
            shape: None,
            doc_string: String::new(),
        };
        let graph = GraphBuilder::make_graph(nodes, "chain", vec![x, w, v], vec![y]).unwrap();
        let model = GraphBuilder::make_model(graph, vec![OpsetImport::new("", 9)]).unwrap();

        let inferred = validator().infer_shapes(&model).unwrap();
        assert_eq!(inferred.graph.value_info.len(), 1);
        assert_eq!(inferred.graph.value_info[0].name, "XW");
        assert_eq!(inferred.graph.value_info[0].concrete_shape(), Some(vec![2, 4]));
        assert_eq!(inferred.graph.outputs[0].concrete_shape(), Some(vec![2, 5]));
        assert_eq!(inferred.graph.outputs[0].data_type, DataType::Float);
    }

    fn fixture_with_initialized_b() -> OnnxModel {
        let mut model = fixture();
        let b = model.graph.inputs.remove(1);
        model.graph.initializers.push(b);
        model
    }

    #[test]
    fn initializer_defines_node_input() {
        let model = fixture_with_initialized_b();
        assert!(validator().validate_model(&model).is_ok());

        let inferred = validator().infer_shapes(&model).unwrap();
        assert_eq!(inferred.graph.outputs[0].concrete_shape(), Some(vec![4000, 4000]));
    }

    #[test]
    fn initializer_shapes_feed_inference() {
        let mut model = fixture_with_initialized_b();
        model.graph.initializers[0].shape = Some(vec![Dimension::Value(3000), Dimension::Value(4000)]);
        assert!(matches!(
            validator().validate_model(&model),
            Err(Error::ShapeMismatch(_))
        ));
    }

    #[test]
    fn initializer_listed_as_input_is_allowed() {
        let mut model = fixture();
        let b = model.graph.inputs[1].clone();
        model.graph.initializers.push(b);
        assert!(validator().validate_model(&model).is_ok());
    }

    #[test]
    fn duplicate_initializer() {
        let mut model = fixture_with_initialized_b();
        let b = model.graph.initializers[0].clone();
        model.graph.initializers.push(b);
        assert!(matches!(
            validator().validate_model(&model),
            Err(Error::InvalidGraph(_))
        ));
    }

    #[test]
    fn node_output_shadows_initializer() {
        let mut model = fixture_with_initialized_b();
        model.graph.nodes[0].outputs[0] = "B".to_string();
        assert!(matches!(
            validator().validate_model(&model),
            Err(Error::InvalidGraph(_))
        ));
    }

    #[test]
    fn ai_onnx_domain_is_the_default_domain() {
        let mut model = fixture();
        model.opset_imports[0].domain = "ai.onnx".to_string();
        assert!(validator().validate_model(&model).is_ok());

        model.graph.nodes[0].domain = "ai.onnx".to_string();
        assert!(validator().validate_model(&model).is_ok());

        model.opset_imports.push(OpsetImport::new("", 13));
        assert!(matches!(
            validator().validate_model(&model),
            Err(Error::InvalidModel(_))
        ));
    }

    #[test]
    fn opset_newer_than_supported() {
        let mut model = fixture();
        model.opset_imports[0].version = 500;
        assert!(matches!(
            validator().validate_model(&model),
            Err(Error::VersionIncompatible(_))
        ));

        model.opset_imports[0].version = 22;
        assert!(validator().validate_model(&model).is_ok());
    }
}
