pub mod registry;

pub use registry::{FormalParameter, OpSchema, Operator, OperatorRegistry, ValueType};

// Module files for math subdirectory
pub mod math {
    pub mod matmul;
}
