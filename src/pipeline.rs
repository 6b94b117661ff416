//! The fixture pipeline: build, validate, write.

use std::path::Path;

use log::info;

use crate::config::MatMulConfig;
use crate::error::Result;
use crate::model::OnnxModel;
use crate::parser::{GraphBuilder, ModelWriter, OnnxModelLoader, SchemaValidator};

/// Build the MatMul model for `config`, validate it and write it to
/// `config.output_path`. Nothing is written if validation fails.
pub fn generate_model(config: &MatMulConfig) -> Result<OnnxModel> {
    let model = GraphBuilder::build_mat_mul_model(config)?;

    SchemaValidator::new()?.validate_model(&model)?;
    ModelWriter::save_model(&model, &config.output_path)?;

    info!(
        "Generated {} at {}",
        model.graph.name,
        config.output_path.display()
    );
    Ok(model)
}

/// Load an existing model file and run the validator over it
pub fn check_model_file(path: &Path) -> Result<OnnxModel> {
    let model = OnnxModelLoader::load_model(path)?;
    SchemaValidator::new()?.validate_model(&model)?;
    Ok(model)
}
