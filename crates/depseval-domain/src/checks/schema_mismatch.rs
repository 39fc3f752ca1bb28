use crate::fingerprint::fingerprint_for_value;
use crate::model::ManifestSet;
use crate::policy::EffectiveConfig;
use crate::schema::{MismatchKind, mismatches};
use depseval_types::{Finding, ids};
use serde_json::json;

pub fn run(set: &ManifestSet, cfg: &EffectiveConfig, out: &mut Vec<Finding>) {
    let Some(severity) = cfg.severity_for(ids::CHECK_SCHEMA_MISMATCH) else {
        return;
    };

    for manifest in &set.manifests {
        for mismatch in mismatches(&manifest.scope) {
            let code = mismatch.kind.code();
            let help = match mismatch.kind {
                MismatchKind::UnknownKey => "Remove the key or rename it to one DEPS files support.",
                MismatchKind::MissingKey => "Add the required key.",
                MismatchKind::TypeMismatch | MismatchKind::LengthMismatch => {
                    "Change the value to the expected shape."
                }
            };
            out.push(Finding {
                severity,
                check_id: ids::CHECK_SCHEMA_MISMATCH.to_string(),
                code: code.to_string(),
                message: mismatch.to_string(),
                location: Some(manifest.location_of(mismatch.root_key())),
                help: Some(help.to_string()),
                fingerprint: Some(fingerprint_for_value(
                    ids::CHECK_SCHEMA_MISMATCH,
                    code,
                    manifest.path.as_str(),
                    &mismatch.path,
                )),
                data: json!({
                    "path": mismatch.path,
                    "expected": mismatch.expected,
                    "actual": mismatch.actual,
                }),
            });
        }
    }
}
