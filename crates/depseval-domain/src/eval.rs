//! Expression evaluator.
//!
//! Supported nodes: string literals, tuple/list/dict displays, names, calls into the function
//! table with positional arguments, `+`, `%`, two-operand `or`/`and`, and `not`. Every other
//! node kind is an error; nothing is coerced or skipped.

use crate::env::{EnvMode, Environment};
use crate::error::EvalError;
use crate::functions::FunctionTable;
use crate::ops;
use depseval_syntax::ast::{BinOp, BoolOp, Expr, ExprKind, Tree, UnaryOp};
use depseval_syntax::parse_expression;
use depseval_types::{Dict, Value};

/// Evaluate one expression node in a fresh environment.
///
/// With `expose_vars`, every dict literal in the expression lets later entries read earlier
/// entries by key.
pub fn evaluate_expr(
    expr: &Expr,
    functions: &FunctionTable,
    filename: &str,
    expose_vars: bool,
) -> Result<Value, EvalError> {
    let mode = if expose_vars {
        EnvMode::SelfReferential
    } else {
        EnvMode::Opaque
    };
    Evaluator {
        functions,
        filename,
    }
    .eval(expr, &Environment::new(mode))
}

/// Evaluate an already parsed tree; only the expression form is accepted.
pub fn evaluate_tree(
    tree: &Tree,
    functions: &FunctionTable,
    filename: &str,
    expose_vars: bool,
) -> Result<Value, EvalError> {
    match tree {
        Tree::Expression(expr) => evaluate_expr(expr, functions, filename, expose_vars),
        Tree::Module(_) => Err(EvalError::new(
            filename,
            tree.line(),
            format!("unexpected node: {}", tree.name()),
        )),
    }
}

/// Parse `source` as a single expression and evaluate it.
pub fn evaluate_str(
    source: &str,
    functions: &FunctionTable,
    filename: &str,
    expose_vars: bool,
) -> Result<Value, EvalError> {
    let expr = parse_expression(source, filename)?;
    evaluate_expr(&expr, functions, filename, expose_vars)
}

struct Evaluator<'a> {
    functions: &'a FunctionTable,
    filename: &'a str,
}

impl Evaluator<'_> {
    fn error(&self, expr: &Expr, message: impl Into<String>) -> EvalError {
        EvalError::new(self.filename, expr.line, message)
    }

    fn unsupported(&self, expr: &Expr, detail: Option<&str>) -> EvalError {
        let message = match detail {
            Some(detail) => format!("unexpected node: {} {detail}", expr.kind.name()),
            None => format!("unexpected node: {}", expr.kind.name()),
        };
        self.error(expr, message)
    }

    fn eval_all(&self, items: &[Expr], env: &Environment) -> Result<Vec<Value>, EvalError> {
        items.iter().map(|item| self.eval(item, env)).collect()
    }

    fn eval(&self, expr: &Expr, env: &Environment) -> Result<Value, EvalError> {
        match &expr.kind {
            ExprKind::Str(s) => Ok(Value::String(s.clone())),
            ExprKind::Tuple(items) => Ok(Value::Tuple(self.eval_all(items, env)?)),
            ExprKind::List(items) => Ok(Value::List(self.eval_all(items, env)?)),
            ExprKind::Dict(items) => {
                let mut local = env.clone();
                let mut dict = Dict::new();
                for item in items {
                    let Some(key) = &item.key else {
                        return Err(self.error(expr, "unexpected node: dict unpacking '**'"));
                    };
                    let k = self.eval(key, &local)?;
                    if let Some(kind) = unhashable(&k) {
                        return Err(self.error(key, format!("unhashable type: '{kind}'")));
                    }
                    let v = self.eval(&item.value, &local)?;
                    if local.mode() == EnvMode::SelfReferential
                        && let Value::String(name) = &k
                    {
                        local.bind(name.clone(), v.clone());
                    }
                    dict.insert(k, v);
                }
                Ok(Value::Dict(dict))
            }
            ExprKind::Name(name) => env.lookup(name).cloned().ok_or_else(|| {
                let available: Vec<&str> = env.names().collect();
                self.error(
                    expr,
                    format!("invalid name {name:?}; available names: {available:?}"),
                )
            }),
            ExprKind::Call {
                func,
                args,
                keywords,
                starargs,
                kwargs,
            } => {
                let ExprKind::Name(name) = &func.kind else {
                    return Err(self.error(expr, "invalid call: func should be a name"));
                };
                if !keywords.is_empty()
                    || starargs.is_some()
                    || kwargs.is_some()
                    || args.iter().any(|a| matches!(a.kind, ExprKind::Starred(_)))
                {
                    return Err(self.error(expr, "invalid call: use only regular args"));
                }
                let Some(callable) = self.functions.get(name) else {
                    return Err(self.error(
                        expr,
                        format!("invalid call: {name:?} is not an allowed function"),
                    ));
                };
                let values = self.eval_all(args, env)?;
                tracing::trace!(function = %name, args = values.len(), line = expr.line, "call");
                callable(&values).map_err(|message| self.error(expr, message))
            }
            ExprKind::BinOp { op, left, right } => {
                let apply: fn(Value, Value) -> Result<Value, String> = match op {
                    BinOp::Add => ops::add,
                    BinOp::Mod => ops::modulo,
                    other => {
                        return Err(self.unsupported(expr, Some(&format!("'{}'", other.symbol()))));
                    }
                };
                let l = self.eval(left, env)?;
                let r = self.eval(right, env)?;
                apply(l, r).map_err(|message| self.error(expr, message))
            }
            ExprKind::BoolOp { op, values } => {
                let [left, right] = values.as_slice() else {
                    return Err(self.error(
                        expr,
                        format!("invalid {:?}: exactly 2 operands required", op.keyword()),
                    ));
                };
                let l = self.eval(left, env)?;
                let short_circuits = match op {
                    BoolOp::Or => l.is_truthy(),
                    BoolOp::And => !l.is_truthy(),
                };
                if short_circuits {
                    Ok(l)
                } else {
                    self.eval(right, env)
                }
            }
            ExprKind::UnaryOp {
                op: UnaryOp::Not,
                operand,
            } => Ok(ops::not(&self.eval(operand, env)?)),
            ExprKind::UnaryOp { op, .. } => {
                Err(self.unsupported(expr, Some(&format!("'{}'", op.symbol()))))
            }
            ExprKind::Bytes(_)
            | ExprKind::FormattedStr(_)
            | ExprKind::Num(_)
            | ExprKind::Ellipsis
            | ExprKind::Set(_)
            | ExprKind::Starred(_)
            | ExprKind::Attribute { .. }
            | ExprKind::Subscript { .. }
            | ExprKind::Slice { .. }
            | ExprKind::Lambda { .. }
            | ExprKind::Comprehension { .. }
            | ExprKind::IfExp { .. }
            | ExprKind::Compare { .. }
            | ExprKind::NamedExpr { .. } => Err(self.unsupported(expr, None)),
        }
    }
}

/// Type name of the first list or dict reachable from a dict key, tuples included.
fn unhashable(key: &Value) -> Option<&'static str> {
    match key {
        Value::List(_) | Value::Dict(_) => Some(key.type_name()),
        Value::Tuple(items) => items.iter().find_map(unhashable),
        _ => None,
    }
}
