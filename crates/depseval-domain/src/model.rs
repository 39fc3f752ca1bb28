use depseval_types::{Location, ManifestPath, Scope, Value};

/// Evaluated manifests handed to the policy checks.
#[derive(Clone, Debug, Default)]
pub struct ManifestSet {
    pub manifests: Vec<ManifestModel>,
}

#[derive(Clone, Debug, Default)]
pub struct ManifestModel {
    pub path: ManifestPath,
    pub scope: Scope,
}

/// One `deps` or `deps_os` entry.
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct DepEntry<'a> {
    pub name: &'a str,
    /// `None` for a `deps_os` entry explicitly set to `None`.
    pub url: Option<&'a str>,
    pub os: Option<&'a str>,
    /// Top-level key holding the entry (`deps` or `deps_os`).
    pub root_key: &'static str,
    /// Path of the entry inside the scope, e.g. `deps_os["mac"]["src/x"]`.
    pub value_path: String,
}

impl ManifestModel {
    pub fn new(path: impl Into<ManifestPath>, scope: Scope) -> Self {
        Self {
            path: path.into(),
            scope,
        }
    }

    /// Location of the assignment that bound `key`.
    pub fn location_of(&self, key: &str) -> Location {
        Location::at_line(self.path.clone(), self.scope.line_of(key))
    }

    /// `deps` entries followed by `deps_os` entries. Malformed shapes are skipped; the schema
    /// check reports them.
    pub fn dependencies(&self) -> Vec<DepEntry<'_>> {
        let mut out = Vec::new();

        if let Some(deps) = self.scope.get("deps").and_then(Value::as_dict) {
            for (name, spec) in deps.iter() {
                let Some(name) = name.as_str() else { continue };
                out.push(DepEntry {
                    name,
                    url: dep_url(spec),
                    os: None,
                    root_key: "deps",
                    value_path: format!("deps[{name:?}]"),
                });
            }
        }

        if let Some(deps_os) = self.scope.get("deps_os").and_then(Value::as_dict) {
            for (os, deps) in deps_os.iter() {
                let (Some(os), Some(deps)) = (os.as_str(), deps.as_dict()) else {
                    continue;
                };
                for (name, spec) in deps.iter() {
                    let Some(name) = name.as_str() else { continue };
                    out.push(DepEntry {
                        name,
                        url: dep_url(spec),
                        os: Some(os),
                        root_key: "deps_os",
                        value_path: format!("deps_os[{os:?}][{name:?}]"),
                    });
                }
            }
        }

        out
    }
}

fn dep_url(spec: &Value) -> Option<&str> {
    match spec {
        Value::String(url) => Some(url),
        Value::Dict(d) => d.get_str("url").and_then(Value::as_str),
        _ => None,
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use depseval_types::Dict;

    fn dict(pairs: Vec<(&str, Value)>) -> Value {
        Value::Dict(pairs.into_iter().map(|(k, v)| (Value::from(k), v)).collect::<Dict>())
    }

    #[test]
    fn dependencies_cover_deps_and_deps_os() {
        let mut scope = Scope::new();
        scope
            .bind(
                "deps",
                dict(vec![
                    ("src/a", Value::from("https://a.example/a.git")),
                    ("src/b", dict(vec![("url", Value::from("https://b.example/b.git"))])),
                ]),
                Some(3),
            )
            .unwrap();
        scope
            .bind(
                "deps_os",
                dict(vec![("mac", dict(vec![("src/c", Value::Null)]))]),
                Some(9),
            )
            .unwrap();
        let manifest = ManifestModel::new("DEPS", scope);

        let deps = manifest.dependencies();
        assert_eq!(deps.len(), 3);
        assert_eq!(deps[0].url, Some("https://a.example/a.git"));
        assert_eq!(deps[1].url, Some("https://b.example/b.git"));
        assert_eq!(deps[2].os, Some("mac"));
        assert_eq!(deps[2].url, None);
        assert_eq!(deps[2].value_path, "deps_os[\"mac\"][\"src/c\"]");
        assert_eq!(manifest.location_of("deps_os").line, Some(9));
        assert_eq!(manifest.location_of("hooks").line, None);
    }
}
