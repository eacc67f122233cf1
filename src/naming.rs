//! Type and axis naming for generated vector/matrix types.

use crate::error::{CodegenError, Result};

/// Axis labels in storage order.
pub const AXIS_LABELS: [&str; 4] = ["X", "Y", "Z", "W"];

/// Name of the generated type for a `rows` x `cols` shape.
///
/// A single row or a single column is a vector (`Vec3`), a square shape is
/// `MatN`, anything else is `MatRxC`.
pub fn type_name(rows: i64, cols: i64) -> Result<String> {
    if rows < 1 || cols < 1 {
        return Err(CodegenError::InvalidDimension { rows, cols });
    }
    let name = if rows == 1 {
        format!("Vec{cols}")
    } else if cols == 1 {
        format!("Vec{rows}")
    } else if rows == cols {
        format!("Mat{rows}")
    } else {
        format!("Mat{rows}x{cols}")
    };
    Ok(name)
}

/// Label of the `index`-th axis. Anything past W is a template bug.
pub fn axis_label(index: i64) -> Result<&'static str> {
    usize::try_from(index)
        .ok()
        .and_then(|i| AXIS_LABELS.get(i).copied())
        .ok_or(CodegenError::AxisOutOfRange(index))
}
