use std::cmp::max;

use log::debug;

use crate::error::{Error, Result};
use crate::model::{format_shape, DataType, Dimension, Node, DEFAULT_DOMAIN};
use crate::ops::registry::{FormalParameter, OpSchema, Operator, ValueType};

/// Matrix product with numpy `matmul` semantics. Only the schema and type
/// inference are implemented; nothing is ever computed.
#[derive(Debug, Clone, Default)]
pub struct MatMul;

impl MatMul {
    fn schema(since_version: i64, types: Vec<DataType>) -> OpSchema {
        let param = |name: &str, description: &str| FormalParameter {
            name: name.to_string(),
            description: description.to_string(),
            type_constraints: Some(types.clone()),
            optional: false,
            variadic: false,
        };

        OpSchema {
            name: "MatMul".to_string(),
            domain: DEFAULT_DOMAIN.to_string(),
            since_version,
            inputs: vec![
                param("A", "N-dimensional matrix A"),
                param("B", "N-dimensional matrix B"),
            ],
            outputs: vec![param("Y", "Matrix multiply results from A * B")],
        }
    }
}

impl Operator for MatMul {
    fn schemas(&self) -> Vec<OpSchema> {
        let v1 = vec![DataType::Float16, DataType::Float, DataType::Double];
        let mut v9 = v1.clone();
        v9.extend([
            DataType::Uint32,
            DataType::Uint64,
            DataType::Int32,
            DataType::Int64,
        ]);
        let mut v13 = v9.clone();
        v13.push(DataType::BFloat16);

        vec![
            Self::schema(1, v1),
            Self::schema(9, v9),
            Self::schema(13, v13),
        ]
    }

    fn output_types(&self, node: &Node, inputs: &[ValueType]) -> Result<Vec<ValueType>> {
        let (a, b) = match inputs {
            [a, b] => (a, b),
            _ => {
                return Err(Error::ValidationError(format!(
                    "MatMul requires 2 inputs, got {}",
                    inputs.len()
                )))
            }
        };

        let data_type = match (a.data_type, b.data_type) {
            (DataType::Undefined, other) | (other, DataType::Undefined) => other,
            (x, y) if x == y => x,
            (x, y) => {
                return Err(Error::TypeMismatch(format!(
                    "MatMul node {} has inputs of different element types: {} and {}",
                    node.display_name(),
                    x,
                    y
                )))
            }
        };

        let shape = match (&a.shape, &b.shape) {
            (Some(a_shape), Some(b_shape)) => {
                let shape = infer_matmul_shape(a_shape, b_shape).map_err(|e| match e {
                    Error::ShapeMismatch(msg) => {
                        Error::ShapeMismatch(format!("node {}: {}", node.display_name(), msg))
                    }
                    other => other,
                })?;
                debug!(
                    "MatMul {} output shape inferred as {}",
                    node.display_name(),
                    format_shape(&shape)
                );
                Some(shape)
            }
            // If either shape is unknown, we can't infer the output shape
            _ => None,
        };

        Ok(vec![ValueType { data_type, shape }])
    }

    fn validate(&self, node: &Node) -> Result<()> {
        if node.inputs.iter().any(String::is_empty) {
            return Err(Error::ValidationError(format!(
                "MatMul node {} has an omitted input, none are optional",
                node.display_name()
            )));
        }
        Ok(())
    }
}

/// Validate shapes for matrix multiplication and return the output shape
pub fn infer_matmul_shape(a_shape: &[Dimension], b_shape: &[Dimension]) -> Result<Vec<Dimension>> {
    if a_shape.is_empty() || b_shape.is_empty() {
        return Err(Error::ValidationError(
            "MatMul inputs cannot be scalars".to_string(),
        ));
    }

    // A vector operand is promoted to a matrix, and the added axis is dropped
    // from the result again
    let a_is_vector = a_shape.len() == 1;
    let b_is_vector = b_shape.len() == 1;

    let a_matrix: Vec<Dimension> = if a_is_vector {
        vec![Dimension::Value(1), a_shape[0].clone()]
    } else {
        a_shape.to_vec()
    };
    let b_matrix: Vec<Dimension> = if b_is_vector {
        vec![b_shape[0].clone(), Dimension::Value(1)]
    } else {
        b_shape.to_vec()
    };

    let a_rank = a_matrix.len();
    let b_rank = b_matrix.len();

    // Check that the contracting dimensions match
    let contracted_a = &a_matrix[a_rank - 1];
    let contracted_b = &b_matrix[b_rank - 2];
    if let (Dimension::Value(k_a), Dimension::Value(k_b)) = (contracted_a, contracted_b) {
        if k_a != k_b {
            return Err(Error::ShapeMismatch(format!(
                "incompatible dimensions for MatMul: {} x {} (inner dimensions {} and {} differ)",
                format_shape(a_shape),
                format_shape(b_shape),
                k_a,
                k_b
            )));
        }
    }

    let mut output_shape = broadcast_batch_dims(&a_matrix[..a_rank - 2], &b_matrix[..b_rank - 2])?;
    if !a_is_vector {
        output_shape.push(a_matrix[a_rank - 2].clone());
    }
    if !b_is_vector {
        output_shape.push(b_matrix[b_rank - 1].clone());
    }

    Ok(output_shape)
}

/// Helper function to broadcast batch dimensions
fn broadcast_batch_dims(a_batch: &[Dimension], b_batch: &[Dimension]) -> Result<Vec<Dimension>> {
    // Pad shorter batch with ones
    let max_batch_dims = max(a_batch.len(), b_batch.len());
    let pad = |batch: &[Dimension]| -> Vec<Dimension> {
        let mut padded = vec![Dimension::Value(1); max_batch_dims - batch.len()];
        padded.extend_from_slice(batch);
        padded
    };
    let padded_a = pad(a_batch);
    let padded_b = pad(b_batch);

    let mut result = Vec::with_capacity(max_batch_dims);
    for (dim_a, dim_b) in padded_a.into_iter().zip(padded_b) {
        let dim = match (dim_a, dim_b) {
            (Dimension::Value(1), other) | (other, Dimension::Value(1)) => other,
            (Dimension::Value(x), Dimension::Value(y)) if x != y => {
                return Err(Error::ShapeMismatch(format!(
                    "cannot broadcast batch dimensions {} and {}",
                    x, y
                )))
            }
            (Dimension::Value(x), _) | (_, Dimension::Value(x)) => Dimension::Value(x),
            (Dimension::Param(p), Dimension::Param(q)) if p == q => Dimension::Param(p),
            _ => Dimension::Unknown,
        };
        result.push(dim);
    }

    Ok(result)
}
