use depseval_types::Value;
use std::collections::BTreeMap;

/// Whether dict literals publish their entries to later entries of the same literal.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum EnvMode {
    Opaque,
    /// Each evaluated `key: value` pair of a dict literal is visible, by key, to the pairs after
    /// it in that literal.
    SelfReferential,
}

const CONSTANTS: [&str; 3] = ["False", "None", "True"];

fn constant(name: &str) -> Option<&'static Value> {
    static NULL: Value = Value::Null;
    static TRUE: Value = Value::Bool(true);
    static FALSE: Value = Value::Bool(false);
    match name {
        "None" => Some(&NULL),
        "True" => Some(&TRUE),
        "False" => Some(&FALSE),
        _ => None,
    }
}

/// Names readable by the expression being evaluated.
///
/// `None`, `True` and `False` are always in scope and always resolve to their fixed values.
/// Evaluation hands child nodes a reference and only a dict literal in self-referential mode
/// takes its own copy to extend, so sibling branches never observe each other's bindings.
#[derive(Clone, Debug, PartialEq)]
pub struct Environment {
    bindings: BTreeMap<String, Value>,
    mode: EnvMode,
}

impl Environment {
    pub fn new(mode: EnvMode) -> Self {
        Self {
            bindings: BTreeMap::new(),
            mode,
        }
    }

    pub fn mode(&self) -> EnvMode {
        self.mode
    }

    pub fn lookup(&self, name: &str) -> Option<&Value> {
        constant(name).or_else(|| self.bindings.get(name))
    }

    /// Constants first, then bindings in name order.
    pub fn names(&self) -> impl Iterator<Item = &str> {
        CONSTANTS
            .into_iter()
            .chain(self.bindings.keys().map(String::as_str))
    }

    /// Add or shadow a binding. Binding one of the constant names is a no-op.
    pub fn bind(&mut self, name: impl Into<String>, value: Value) {
        let name = name.into();
        if constant(&name).is_none() {
            self.bindings.insert(name, value);
        }
    }
}
