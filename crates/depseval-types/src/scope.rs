use crate::value::{Dict, Value};
use serde::{Serialize, Serializer};
use std::collections::BTreeMap;

/// Top-level bindings produced by executing one manifest.
///
/// Each name is bound at most once. The line of the binding assignment is kept next to the
/// value so later passes can point findings at it; scopes built by hand have no lines.
#[derive(Clone, Debug, Default)]
pub struct Scope {
    bindings: BTreeMap<String, Value>,
    lines: BTreeMap<String, u32>,
}

impl Scope {
    pub fn new() -> Self {
        Self::default()
    }

    /// Bind `name`, returning the existing value untouched if it is already bound.
    pub fn bind(&mut self, name: &str, value: Value, line: Option<u32>) -> Result<(), &Value> {
        if self.bindings.contains_key(name) {
            return Err(&self.bindings[name]);
        }
        if let Some(line) = line {
            self.lines.insert(name.to_string(), line);
        }
        self.bindings.insert(name.to_string(), value);
        Ok(())
    }

    pub fn get(&self, name: &str) -> Option<&Value> {
        self.bindings.get(name)
    }

    pub fn contains(&self, name: &str) -> bool {
        self.bindings.contains_key(name)
    }

    pub fn line_of(&self, name: &str) -> Option<u32> {
        self.lines.get(name).copied()
    }

    pub fn len(&self) -> usize {
        self.bindings.len()
    }

    pub fn is_empty(&self) -> bool {
        self.bindings.is_empty()
    }

    pub fn names(&self) -> impl Iterator<Item = &str> {
        self.bindings.keys().map(String::as_str)
    }

    pub fn iter(&self) -> impl Iterator<Item = (&str, &Value)> {
        self.bindings.iter().map(|(k, v)| (k.as_str(), v))
    }

    /// The scope as a dict value keyed by binding name.
    pub fn to_value(&self) -> Value {
        Value::Dict(
            self.bindings
                .iter()
                .map(|(k, v)| (Value::String(k.clone()), v.clone()))
                .collect::<Dict>(),
        )
    }

    /// Build a scope from a dict value; every key must be a string.
    pub fn from_value(value: &Value) -> Option<Scope> {
        let dict = value.as_dict()?;
        let mut scope = Scope::new();
        for (k, v) in dict.iter() {
            scope.bind(k.as_str()?, v.clone(), None).ok()?;
        }
        Some(scope)
    }
}

impl PartialEq for Scope {
    fn eq(&self, other: &Self) -> bool {
        self.bindings == other.bindings
    }
}

impl FromIterator<(String, Value)> for Scope {
    /// Later duplicates are dropped, mirroring the bind-once rule.
    fn from_iter<I: IntoIterator<Item = (String, Value)>>(iter: I) -> Self {
        let mut scope = Scope::new();
        for (k, v) in iter {
            let _ = scope.bind(&k, v, None);
        }
        scope
    }
}

impl Serialize for Scope {
    fn serialize<S: Serializer>(&self, serializer: S) -> Result<S::Ok, S::Error> {
        self.bindings.serialize(serializer)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn bind_rejects_second_assignment() {
        let mut scope = Scope::new();
        scope.bind("x", Value::from("1"), Some(1)).expect("first bind");
        let existing = scope.bind("x", Value::from("2"), Some(2)).unwrap_err();
        assert_eq!(existing, &Value::from("1"));
        assert_eq!(scope.get("x"), Some(&Value::from("1")));
        assert_eq!(scope.line_of("x"), Some(1));
    }

    #[test]
    fn value_round_trip_keeps_bindings() {
        let scope: Scope = vec![
            ("deps".to_string(), Value::Dict(Dict::new())),
            ("use_relative_paths".to_string(), Value::Bool(true)),
        ]
        .into_iter()
        .collect();
        let back = Scope::from_value(&scope.to_value()).expect("string keys");
        assert_eq!(back, scope);
        assert!(Scope::from_value(&Value::from("not a dict")).is_none());
    }
}
