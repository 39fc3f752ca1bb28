use crate::fingerprint::fingerprint_for_value;
use crate::model::ManifestSet;
use crate::policy::EffectiveConfig;
use depseval_types::{Finding, Value, ids};
use serde_json::json;

pub fn run(set: &ManifestSet, cfg: &EffectiveConfig, out: &mut Vec<Finding>) {
    let Some(severity) = cfg.severity_for(ids::CHECK_DEPS_ALLOWED_HOSTS) else {
        return;
    };

    for manifest in &set.manifests {
        // Without `allowed_hosts` every host is allowed.
        let Some(allowed) = manifest
            .scope
            .get("allowed_hosts")
            .and_then(Value::as_sequence)
        else {
            continue;
        };
        let allowed: Vec<&str> = allowed.iter().filter_map(Value::as_str).collect();

        for dep in manifest.dependencies() {
            let Some(url) = dep.url else { continue };
            let Some(host) = url_host(url) else { continue };
            if allowed.contains(&host) {
                continue;
            }
            out.push(Finding {
                severity,
                check_id: ids::CHECK_DEPS_ALLOWED_HOSTS.to_string(),
                code: ids::CODE_DISALLOWED_HOST.to_string(),
                message: format!(
                    "dependency '{}' is fetched from '{}', which is not in allowed_hosts",
                    dep.name, host
                ),
                location: Some(manifest.location_of(dep.root_key)),
                help: Some(format!(
                    "Add '{host}' to allowed_hosts or fetch the dependency from an allowed host."
                )),
                fingerprint: Some(fingerprint_for_value(
                    ids::CHECK_DEPS_ALLOWED_HOSTS,
                    ids::CODE_DISALLOWED_HOST,
                    manifest.path.as_str(),
                    &dep.value_path,
                )),
                data: json!({
                    "path": dep.value_path,
                    "dependency": dep.name,
                    "os": dep.os,
                    "url": url,
                    "host": host,
                    "allowed_hosts": allowed,
                }),
            });
        }
    }
}

/// Host part of `scheme://[user@]host[:port]/...`; `None` when there is no scheme.
pub fn url_host(url: &str) -> Option<&str> {
    let (_, rest) = url.split_once("://")?;
    let authority = rest.split(['/', '?', '#']).next().unwrap_or(rest);
    let host_port = authority.rsplit_once('@').map_or(authority, |(_, h)| h);
    let host = host_port.split(':').next().unwrap_or(host_port);
    (!host.is_empty()).then_some(host)
}
