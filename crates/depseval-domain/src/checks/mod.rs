use crate::model::ManifestSet;
use crate::policy::EffectiveConfig;
use depseval_types::Finding;

mod allowed_hosts;
mod recursedeps;
mod schema_mismatch;


pub fn run_all(set: &ManifestSet, cfg: &EffectiveConfig, out: &mut Vec<Finding>) {
    schema_mismatch::run(set, cfg, out);
    allowed_hosts::run(set, cfg, out);
    recursedeps::run(set, cfg, out);
}
