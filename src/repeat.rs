//! Text repetition and small integer arithmetic for templates.

use crate::error::{CodegenError, Result};

/// Placeholder replaced by the repetition number in [`repeat_text`].
pub const REPEAT_PLACEHOLDER: &str = "%d";

/// Repeats `template` `count` times joined by `sep`, replacing every `%d`
/// with the repetition number.
///
/// `repeat_text(3, "col%d", ", ")` gives `"col0, col1, col2"`.
pub fn repeat_text(count: usize, template: &str, sep: &str) -> String {
    (0..count)
        .map(|i| template.replace(REPEAT_PLACEHOLDER, &i.to_string()))
        .collect::<Vec<_>>()
        .join(sep)
}

pub fn sum(values: &[i64]) -> Result<i64> {
    values
        .iter()
        .try_fold(0i64, |acc, &v| acc.checked_add(v))
        .ok_or(CodegenError::Overflow { helper: "add" })
}

pub fn product(values: &[i64]) -> Result<i64> {
    values
        .iter()
        .try_fold(1i64, |acc, &v| acc.checked_mul(v))
        .ok_or(CodegenError::Overflow { helper: "mul" })
}

/// Its arguments as a list, for iterating an explicit literal list.
pub fn enumerate(values: &[i64]) -> Vec<i64> {
    values.to_vec()
}

/// `token` on every iteration but the first, so joined lists have no leading separator.
pub fn separator(token: &str, iteration: i64) -> &str {
    if iteration > 0 {
        token
    } else {
        ""
    }
}
