use std::path::PathBuf;

use clap::Parser;

use mat_mul_onnx::DataType;

/// Build, validate and write a single-MatMul ONNX model.
/// Without arguments writes mat_mul.onnx with two 4000x4000 float inputs.
#[derive(Parser, Debug)]
#[command(author, version, about, long_about = None)]
pub struct Args {
    /// JSON config file. Flags given on the command line override its values.
    #[arg(long)]
    pub config: Option<PathBuf>,

    /// Output model path.
    /// Default: mat_mul.onnx
    #[arg(short, long)]
    pub output: Option<PathBuf>,

    /// Rows of A (and of the result). Must be greater than 0.
    #[arg(short, value_parser = clap::value_parser!(i64).range(1..))]
    pub m: Option<i64>,

    /// Columns of A and rows of B. Must be greater than 0.
    #[arg(short, value_parser = clap::value_parser!(i64).range(1..))]
    pub n: Option<i64>,

    /// Element type of the operands, as an ONNX type name.
    /// Example: --elem-type double
    #[arg(long)]
    pub elem_type: Option<DataType>,

    /// Default-domain operator set version.
    #[arg(long, value_parser = clap::value_parser!(i64).range(1..))]
    pub opset: Option<i64>,

    /// Print a JSON summary of the model on stdout.
    #[arg(long)]
    pub summary: bool,

    /// Validate an existing model file instead of generating one.
    #[arg(long, value_name = "PATH", conflicts_with_all = ["config", "output", "m", "n", "elem_type", "opset"])]
    pub check: Option<PathBuf>,
}
