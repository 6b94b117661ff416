use mat_mul_onnx::{
    error::Error,
    model::{DataType, Dimension, OnnxModel},
    GraphBuilder, MatMulConfig, MatMulShapes, ModelWriter, OnnxModelLoader, SchemaValidator,
};
use mat_mul_onnx::proto::TensorProto;
use prost::Message;
use std::collections::HashSet;

// Helper to build the default 4000x4000 fixture
fn create_test_model() -> OnnxModel {
    GraphBuilder::build_mat_mul_model(&MatMulConfig::default()).unwrap()
}

fn dims(values: &[i64]) -> Vec<Dimension> {
    values.iter().copied().map(Dimension::Value).collect()
}

#[test]
fn test_single_matmul_node() {
    let model = create_test_model();

    assert_eq!(model.graph.nodes.len(), 1);
    let node = &model.graph.nodes[0];
    assert_eq!(node.op_type, "MatMul");
    assert_eq!(node.inputs, vec!["A".to_string(), "B".to_string()]);
    assert_eq!(node.outputs, vec!["C".to_string()]);
}

#[test]
fn test_get_input_output_info() {
    let model = create_test_model();

    let inputs = OnnxModelLoader::get_input_info(&model);
    let outputs = OnnxModelLoader::get_output_info(&model);

    assert_eq!(inputs.len(), 2);
    assert_eq!(outputs.len(), 1);

    for (input, name) in inputs.iter().zip(["A", "B"]) {
        assert_eq!(input.name, name);
        assert_eq!(input.data_type, DataType::Float);
        assert_eq!(input.shape, Some(dims(&[4000, 4000])));
    }

    assert_eq!(outputs[0].name, "C");
    assert_eq!(outputs[0].shape, Some(dims(&[4000, 4000])));
}

#[test]
fn test_model_metadata() {
    let model = create_test_model();

    assert_eq!(model.graph.name, "mat_mul");
    assert_eq!(model.metadata.ir_version, 4);
    assert_eq!(model.metadata.producer_name, "mat-mul-onnx");
    assert_eq!(model.opset_imports.len(), 1);
    assert_eq!(model.opset_imports[0].domain, "");
    assert_eq!(model.opset_imports[0].version, 9);
}

#[test]
fn test_schema_validation() {
    let model = create_test_model();
    let validator = SchemaValidator::new().unwrap();

    let result = validator.validate_model(&model);
    assert!(result.is_ok(), "{:?}", result);
}

#[test]
fn test_save_and_reload() -> anyhow::Result<()> {
    let model = create_test_model();
    let dir = tempfile::tempdir()?;
    let path = dir.path().join("mat_mul.onnx");

    ModelWriter::save_model(&model, &path)?;
    let reloaded = OnnxModelLoader::load_model(&path)?;

    assert_eq!(reloaded.graph.nodes.len(), model.graph.nodes.len());
    assert_eq!(reloaded.graph.name, model.graph.name);
    assert_eq!(reloaded.graph.inputs, model.graph.inputs);
    assert_eq!(reloaded.graph.outputs, model.graph.outputs);
    assert_eq!(reloaded.graph.nodes, model.graph.nodes);
    assert_eq!(reloaded.opset_imports, model.opset_imports);
    assert_eq!(reloaded, model);

    SchemaValidator::new()?.validate_model(&reloaded)?;
    Ok(())
}

#[test]
fn test_inner_dimension_mismatch_fails_validation() {
    let config = MatMulConfig::default();
    let validator = SchemaValidator::new().unwrap();

    for (a, b) in [([4000, 4000], [3000, 4000]), ([4000, 3999], [4000, 4000])] {
        let shapes = MatMulShapes {
            a: dims(&a),
            b: dims(&b),
            c: dims(&[4000, 4000]),
        };
        let model = GraphBuilder::build_mat_mul_model_with_shapes(&config, &shapes).unwrap();

        match validator.validate_model(&model) {
            Err(Error::ShapeMismatch(msg)) => assert!(msg.contains("MatMul"), "{}", msg),
            other => panic!("expected a shape mismatch for {:?} x {:?}, got {:?}", a, b, other),
        }
    }
}

#[test]
fn test_rectangular_fixture_is_consistent() {
    let config = MatMulConfig {
        m: 128,
        n: 64,
        ..Default::default()
    };
    let model = GraphBuilder::build_mat_mul_model(&config).unwrap();

    SchemaValidator::new().unwrap().validate_model(&model).unwrap();

    let shapes: Vec<_> = model
        .graph
        .inputs
        .iter()
        .chain(&model.graph.outputs)
        .map(|info| info.concrete_shape().unwrap())
        .collect();
    assert_eq!(shapes, vec![vec![128, 64], vec![64, 128], vec![128, 128]]);
}

#[test]
fn test_symbolic_fixture_round_trips() -> anyhow::Result<()> {
    let shapes = MatMulShapes {
        a: vec![Dimension::from("M"), Dimension::Value(16)],
        b: vec![Dimension::Value(16), Dimension::from("M")],
        c: vec![Dimension::from("M"), Dimension::Unknown],
    };
    let model = GraphBuilder::build_mat_mul_model_with_shapes(&MatMulConfig::default(), &shapes)?;

    let bytes = ModelWriter::to_bytes(&model)?;
    let reloaded = OnnxModelLoader::load_model_from_bytes(&bytes)?;
    assert_eq!(reloaded.graph.outputs[0].shape, Some(shapes.c.clone()));

    let inferred = SchemaValidator::new()?.infer_shapes(&reloaded)?;
    assert_eq!(
        inferred.graph.outputs[0].shape,
        Some(vec![Dimension::from("M"), Dimension::from("M")])
    );
    Ok(())
}

#[test]
fn test_summary_lists_every_value() {
    let summary = create_test_model().summary();

    let names: HashSet<_> = summary
        .inputs
        .iter()
        .chain(&summary.outputs)
        .map(|v| v.name.as_str())
        .collect();
    assert_eq!(names, HashSet::from(["A", "B", "C"]));
    assert_eq!(summary.nodes.len(), 1);

    let json = serde_json::to_value(&summary).unwrap();
    assert_eq!(json["graph_name"], "mat_mul");
    assert_eq!(json["inputs"][0]["elem_type"], "float");
    assert_eq!(json["outputs"][0]["shape"][1], "4000");
}

#[test]
fn test_check_accepts_weight_stored_as_initializer() -> anyhow::Result<()> {
    let config = MatMulConfig {
        m: 2,
        n: 2,
        ..Default::default()
    };
    let mut proto = ModelWriter::to_proto(&GraphBuilder::build_mat_mul_model(&config)?)?;
    let graph = proto.graph.as_mut().unwrap();
    graph.input.retain(|input| input.name.as_deref() != Some("B"));
    graph.initializer.push(TensorProto {
        dims: vec![2, 2],
        data_type: Some(DataType::Float.to_proto()),
        name: Some("B".to_string()),
        doc_string: None,
    });

    let dir = tempfile::tempdir()?;
    let path = dir.path().join("weights.onnx");
    std::fs::write(&path, proto.encode_to_vec())?;

    let model = mat_mul_onnx::check_model_file(&path)?;
    assert_eq!(model.graph.inputs.len(), 1);
    assert_eq!(model.graph.initializers[0].name, "B");
    assert_eq!(model.graph.initializers[0].concrete_shape(), Some(vec![2, 2]));
    Ok(())
}

#[test]
fn test_check_accepts_ai_onnx_domain() -> anyhow::Result<()> {
    let mut proto = ModelWriter::to_proto(&create_test_model())?;
    proto.opset_import[0].domain = Some("ai.onnx".to_string());
    let model = OnnxModelLoader::load_model_from_bytes(&proto.encode_to_vec())?;

    assert_eq!(model.opset_imports[0].domain, "ai.onnx");
    SchemaValidator::new()?.validate_model(&model)?;
    Ok(())
}
