use crate::fingerprint::fingerprint_for_value;
use crate::model::ManifestSet;
use crate::policy::EffectiveConfig;
use depseval_types::{Finding, Value, ids};
use serde_json::json;
use std::collections::BTreeSet;

pub fn run(set: &ManifestSet, cfg: &EffectiveConfig, out: &mut Vec<Finding>) {
    let Some(severity) = cfg.severity_for(ids::CHECK_RECURSEDEPS_UNKNOWN_DEP) else {
        return;
    };

    for manifest in &set.manifests {
        let Some(entries) = manifest
            .scope
            .get("recursedeps")
            .and_then(Value::as_sequence)
        else {
            continue;
        };
        let known: BTreeSet<&str> = manifest.dependencies().iter().map(|d| d.name).collect();

        for (index, entry) in entries.iter().enumerate() {
            // A bare name, or a (name, deps file) pair.
            let name = match entry {
                Value::String(name) => name.as_str(),
                Value::List(pair) | Value::Tuple(pair) => {
                    match pair.first().and_then(Value::as_str) {
                        Some(name) => name,
                        None => continue,
                    }
                }
                _ => continue,
            };
            if known.contains(name) {
                continue;
            }
            let value_path = format!("recursedeps[{index}]");
            out.push(Finding {
                severity,
                check_id: ids::CHECK_RECURSEDEPS_UNKNOWN_DEP.to_string(),
                code: ids::CODE_UNKNOWN_DEPENDENCY.to_string(),
                message: format!("recursedeps names '{name}', which is not a dependency"),
                location: Some(manifest.location_of("recursedeps")),
                help: Some("Declare the dependency in deps or deps_os, or drop it from recursedeps.".to_string()),
                fingerprint: Some(fingerprint_for_value(
                    ids::CHECK_RECURSEDEPS_UNKNOWN_DEP,
                    ids::CODE_UNKNOWN_DEPENDENCY,
                    manifest.path.as_str(),
                    &value_path,
                )),
                data: json!({
                    "dependency": name,
                    "path": value_path,
                }),
            });
        }
    }
}
