use anyhow::Context;
use depseval_settings::{DepsevalConfigV1, Overrides, ResolvedConfig};

/// Parse config text (empty means defaults) and apply CLI overrides.
pub fn resolve(config_text: &str, overrides: Overrides) -> anyhow::Result<ResolvedConfig> {
    let cfg = if config_text.trim().is_empty() {
        DepsevalConfigV1::default()
    } else {
        depseval_settings::parse_config_toml(config_text).context("parse config")?
    };

    depseval_settings::resolve_config(cfg, overrides).context("resolve config")
}
