//! Handlebars helpers exposing naming, indexing and repetition to templates.
//!
//! Every helper returns a JSON value, so each one works both inline
//! (`{{typename 2 3}}`) and as a subexpression (`{{#each (iter 0 n)}}`).
//! Bad parameters and contract violations fail the whole render.

use handlebars::{
    Context, Handlebars, Helper, HelperDef, RenderContext, RenderError, RenderErrorReason,
    ScopedJson,
};
use serde_json::Value;

use crate::error::CodegenError;
use crate::{indexing, naming, repeat};

type Eval = fn(&Args<'_>) -> Result<Value, RenderError>;

#[derive(Clone, Copy)]
struct ValueHelper {
    name: &'static str,
    eval: Eval,
}

const HELPERS: &[ValueHelper] = &[
    ValueHelper { name: "typename", eval: typename },
    ValueHelper { name: "elementname", eval: elementname },
    ValueHelper { name: "iter", eval: iter },
    ValueHelper { name: "matiter", eval: matiter },
    ValueHelper { name: "enum", eval: enumerate },
    ValueHelper { name: "sep", eval: sep },
    ValueHelper { name: "repeat", eval: repeat_text },
    ValueHelper { name: "add", eval: add },
    ValueHelper { name: "mul", eval: mul },
    ValueHelper { name: "lowercase", eval: lowercase },
    ValueHelper { name: "uppercase", eval: uppercase },
];

/// Names of all registered helpers.
pub fn helper_names() -> impl Iterator<Item = &'static str> {
    HELPERS.iter().map(|h| h.name)
}

pub(crate) fn register(registry: &mut Handlebars<'_>) {
    for helper in HELPERS {
        registry.register_helper(helper.name, Box::new(*helper));
    }
}

impl HelperDef for ValueHelper {
    fn call_inner<'reg: 'rc, 'rc>(
        &self,
        h: &Helper<'rc>,
        _: &'reg Handlebars<'reg>,
        _: &'rc Context,
        _: &mut RenderContext<'reg, 'rc>,
    ) -> Result<ScopedJson<'rc>, RenderError> {
        let args = Args {
            helper: self.name,
            values: h.params().iter().map(|p| p.value()).collect(),
        };
        (self.eval)(&args).map(ScopedJson::Derived)
    }
}

fn fail(message: String) -> RenderError {
    RenderErrorReason::Other(message).into()
}

fn contract(err: CodegenError) -> RenderError {
    fail(err.to_string())
}

/// Positional helper parameters.
struct Args<'a> {
    helper: &'static str,
    values: Vec<&'a Value>,
}

impl Args<'_> {
    fn arity(&self, expected: usize) -> Result<(), RenderError> {
        if self.values.len() != expected {
            return Err(fail(format!(
                "{}: expected {} parameter(s), got {}",
                self.helper,
                expected,
                self.values.len()
            )));
        }
        Ok(())
    }

    fn int(&self, idx: usize) -> Result<i64, RenderError> {
        let value = self.values.get(idx).ok_or_else(|| {
            fail(format!("{}: missing parameter {}", self.helper, idx))
        })?;
        value.as_i64().ok_or_else(|| {
            fail(format!(
                "{}: parameter {} must be an integer, got {}",
                self.helper, idx, value
            ))
        })
    }

    fn count(&self, idx: usize) -> Result<usize, RenderError> {
        let count = self.int(idx)?;
        usize::try_from(count).map_err(|_| {
            contract(CodegenError::NegativeCount {
                helper: self.helper,
                count,
            })
        })
    }

    fn str(&self, idx: usize) -> Result<&str, RenderError> {
        let value = self.values.get(idx).ok_or_else(|| {
            fail(format!("{}: missing parameter {}", self.helper, idx))
        })?;
        value.as_str().ok_or_else(|| {
            fail(format!(
                "{}: parameter {} must be a string, got {}",
                self.helper, idx, value
            ))
        })
    }

    fn ints(&self) -> Result<Vec<i64>, RenderError> {
        (0..self.values.len()).map(|i| self.int(i)).collect()
    }
}

fn typename(args: &Args<'_>) -> Result<Value, RenderError> {
    args.arity(2)?;
    naming::type_name(args.int(0)?, args.int(1)?)
        .map(Value::from)
        .map_err(contract)
}

fn elementname(args: &Args<'_>) -> Result<Value, RenderError> {
    args.arity(1)?;
    naming::axis_label(args.int(0)?)
        .map(Value::from)
        .map_err(contract)
}

fn iter(args: &Args<'_>) -> Result<Value, RenderError> {
    args.arity(2)?;
    Ok(Value::from(indexing::range(args.int(0)?, args.int(1)?)))
}

fn matiter(args: &Args<'_>) -> Result<Value, RenderError> {
    args.arity(2)?;
    let cells = indexing::matrix_cells(args.count(0)?, args.count(1)?).map_err(contract)?;
    serde_json::to_value(cells).map_err(|e| fail(format!("matiter: {e}")))
}

fn enumerate(args: &Args<'_>) -> Result<Value, RenderError> {
    Ok(Value::from(repeat::enumerate(&args.ints()?)))
}

fn sep(args: &Args<'_>) -> Result<Value, RenderError> {
    args.arity(2)?;
    Ok(Value::from(repeat::separator(args.str(0)?, args.int(1)?)))
}

fn repeat_text(args: &Args<'_>) -> Result<Value, RenderError> {
    args.arity(3)?;
    Ok(Value::from(repeat::repeat_text(
        args.count(0)?,
        args.str(1)?,
        args.str(2)?,
    )))
}

fn add(args: &Args<'_>) -> Result<Value, RenderError> {
    repeat::sum(&args.ints()?).map(Value::from).map_err(contract)
}

fn mul(args: &Args<'_>) -> Result<Value, RenderError> {
    repeat::product(&args.ints()?).map(Value::from).map_err(contract)
}

fn lowercase(args: &Args<'_>) -> Result<Value, RenderError> {
    args.arity(1)?;
    Ok(Value::from(args.str(0)?.to_lowercase()))
}

fn uppercase(args: &Args<'_>) -> Result<Value, RenderError> {
    args.arity(1)?;
    Ok(Value::from(args.str(0)?.to_uppercase()))
}
