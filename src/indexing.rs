//! Integer ranges and matrix cell enumeration used to drive template loops.

use std::fmt;

use serde::Serialize;

use crate::error::{CodegenError, Result};

/// One coordinate of a generated matrix.
///
/// `index` is the position in column-major storage: `col * rows + row`.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize)]
pub struct MatrixCell {
    pub row: usize,
    pub col: usize,
    pub index: usize,
}

impl fmt::Display for MatrixCell {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.index)
    }
}

/// `start..end` as a list. Empty when `end <= start`.
pub fn range(start: i64, end: i64) -> Vec<i64> {
    (start..end).collect()
}

/// Every cell of a `rows` x `cols` matrix, column by column.
///
/// The order matches the storage layout of the generated types and must not
/// change: accessor code indexes the backing array with `index`.
pub fn matrix_cells(rows: usize, cols: usize) -> Result<Vec<MatrixCell>> {
    let len = rows
        .checked_mul(cols)
        .ok_or(CodegenError::Overflow { helper: "matiter" })?;
    let mut cells = Vec::with_capacity(len);
    for col in 0..cols {
        for row in 0..rows {
            cells.push(MatrixCell {
                row,
                col,
                index: col * rows + row,
            });
        }
    }
    Ok(cells)
}
