use crate::error::ExecError;
use crate::eval::evaluate_expr;
use crate::functions::FunctionTable;
use depseval_syntax::ast::{ExprKind, Module, StmtKind, Tree};
use depseval_syntax::parse_module;
use depseval_types::Scope;

/// The only target whose dict literal may refer to its own earlier entries.
pub const VARS: &str = "vars";

/// Execute a flat sequence of `name = expression` statements into a scope.
pub fn execute(
    module: &Module,
    functions: &FunctionTable,
    filename: &str,
) -> Result<Scope, ExecError> {
    let mut scope = Scope::new();

    for stmt in &module.body {
        let unsupported = |message: String| ExecError::Unsupported {
            filename: filename.to_string(),
            line: stmt.line,
            message,
        };

        let StmtKind::Assign { targets, value } = &stmt.kind else {
            return Err(unsupported(format!(
                "unexpected statement: {}",
                stmt.kind.name()
            )));
        };
        let [target] = targets.as_slice() else {
            return Err(unsupported(
                "invalid assignment: use exactly one target".to_string(),
            ));
        };
        let ExprKind::Name(name) = &target.kind else {
            return Err(unsupported(
                "invalid assignment: target should be a name".to_string(),
            ));
        };

        let value = evaluate_expr(value, functions, filename, name == VARS)?;

        if scope.bind(name, value, Some(stmt.line)).is_err() {
            return Err(ExecError::DuplicateAssignment {
                filename: filename.to_string(),
                line: stmt.line,
                name: name.clone(),
            });
        }
        tracing::debug!(file = filename, line = stmt.line, name = %name, "assigned");
    }

    Ok(scope)
}

/// Execute an already parsed tree; only the module form is accepted.
pub fn execute_tree(
    tree: &Tree,
    functions: &FunctionTable,
    filename: &str,
) -> Result<Scope, ExecError> {
    match tree {
        Tree::Module(module) => execute(module, functions, filename),
        Tree::Expression(_) => Err(ExecError::Unsupported {
            filename: filename.to_string(),
            line: tree.line(),
            message: format!("unexpected node: {} (not a module)", tree.name()),
        }),
    }
}

/// Parse `source` as a manifest and execute it.
pub fn execute_str(
    source: &str,
    functions: &FunctionTable,
    filename: &str,
) -> Result<Scope, ExecError> {
    let module = parse_module(source, filename)?;
    execute(&module, functions, filename)
}
