use clap::Parser;
use log::info;
use thiserror::Error;

use mat_mul_onnx::{check_model_file, generate_model, MatMulConfig, OnnxModel};

mod cli;
use cli::Args;

#[derive(Debug, Error)]
enum AppError {
    #[error("Could not load configuration -> {0}")]
    Config(mat_mul_onnx::Error),
    #[error("{0}")]
    Model(#[from] mat_mul_onnx::Error),
    #[error("Could not print summary -> {0}")]
    Summary(#[from] serde_json::Error),
}

fn main() {
    if let Err(e) = exec_program() {
        eprintln!("{e}");
        std::process::exit(1);
    }
}

fn exec_program() -> Result<(), AppError> {
    env_logger::init();

    let args = Args::parse();

    let model = match &args.check {
        Some(path) => {
            info!("Checking model file: {}", path.display());
            let model = check_model_file(path)?;
            println!("{} is a valid ONNX model", path.display());
            model
        }
        None => {
            let config = build_config(&args)?;
            info!("Config: {:?}", config);
            generate_model(&config)?
        }
    };

    if args.summary {
        print_summary(&model)?;
    }

    Ok(())
}

fn build_config(args: &Args) -> Result<MatMulConfig, AppError> {
    let mut config = match &args.config {
        Some(path) => MatMulConfig::from_json_file(path).map_err(AppError::Config)?,
        None => MatMulConfig::default(),
    };

    if let Some(output) = &args.output {
        config.output_path = output.clone();
    }
    if let Some(m) = args.m {
        config.m = m;
    }
    if let Some(n) = args.n {
        config.n = n;
    }
    if let Some(elem_type) = args.elem_type {
        config.elem_type = elem_type;
    }
    if let Some(opset) = args.opset {
        config.opset_version = opset;
    }

    config.validate().map_err(AppError::Config)?;
    Ok(config)
}

fn print_summary(model: &OnnxModel) -> Result<(), AppError> {
    println!("{}", serde_json::to_string_pretty(&model.summary())?);
    Ok(())
}
