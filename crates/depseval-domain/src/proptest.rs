//! Property-based tests for the domain crate.
//!
//! These tests use proptest to verify invariants around:
//! - Execution determinism
//! - String concatenation
//! - Schema acceptance of well-formed manifests
//! - Consistency check reflexivity
//! - Findings ordering determinism

use crate::consistency::check;
use crate::engine::{evaluate, finding_order};
use crate::eval::evaluate_str;
use crate::exec::execute_str;
use crate::functions::FunctionTable;
use crate::model::{ManifestModel, ManifestSet};
use crate::schema::validate;
use crate::test_support::{config_with_all_checks, functions_with_vars};
use depseval_types::{Severity, Value};
use proptest::prelude::*;

// ============================================================================
// Strategies
// ============================================================================

/// Printable text without quotes or backslashes, safe inside a single-quoted literal.
fn arb_text() -> impl Strategy<Value = String> {
    prop::string::string_regex("[a-zA-Z0-9_./:@+ -]{0,16}").unwrap()
}

fn arb_dep_path() -> impl Strategy<Value = String> {
    prop::string::string_regex("src/[a-z][a-z0-9_/]{0,12}").unwrap()
}

fn arb_url() -> impl Strategy<Value = String> {
    (
        prop_oneof![Just("https"), Just("git"), Just("sso")],
        prop::string::string_regex("[a-z]{1,8}\\.(com|org)").unwrap(),
        prop::string::string_regex("[a-z]{1,8}").unwrap(),
    )
        .prop_map(|(scheme, host, repo)| format!("{scheme}://{host}/{repo}.git"))
}

/// Source text of a well-formed DEPS manifest.
fn arb_manifest() -> impl Strategy<Value = String> {
    (
        prop::collection::btree_map(arb_dep_path(), arb_url(), 0..6),
        prop::collection::vec(arb_text(), 0..4),
        prop::option::of(any::<bool>()),
    )
        .prop_map(|(deps, target_os, relative)| {
            let mut source = String::from("vars = {'root': 'https://example.org', 'on': True}\n");
            source.push_str("deps = {\n");
            for (path, url) in &deps {
                source.push_str(&format!("  '{path}': '{url}',\n"));
            }
            source.push_str("}\n");
            let names: Vec<String> = target_os.iter().map(|t| format!("'{t}'")).collect();
            source.push_str(&format!("target_os = [{}]\n", names.join(", ")));
            if let Some(relative) = relative {
                let literal = if relative { "True" } else { "False" };
                source.push_str(&format!("use_relative_paths = {literal}\n"));
            }
            let recursed: Vec<String> = deps.keys().take(2).map(|p| format!("'{p}'")).collect();
            source.push_str(&format!("recursedeps = [{}]\n", recursed.join(", ")));
            source
        })
}

fn no_functions() -> FunctionTable {
    FunctionTable::new()
}

// ============================================================================
// Properties
// ============================================================================

proptest! {
    #[test]
    fn execution_is_deterministic(source in arb_manifest()) {
        let table = functions_with_vars(vec![]);
        let first = execute_str(&source, &table, "DEPS");
        let second = execute_str(&source, &table, "DEPS");
        prop_assert_eq!(first, second);
    }

    #[test]
    fn string_add_is_associative(a in arb_text(), b in arb_text(), c in arb_text()) {
        let table = no_functions();
        let left = evaluate_str(&format!("('{a}' + '{b}') + '{c}'"), &table, "<p>", false);
        let right = evaluate_str(&format!("'{a}' + ('{b}' + '{c}')"), &table, "<p>", false);
        prop_assert_eq!(&left, &right);
        prop_assert_eq!(left, Ok(Value::String(format!("{a}{b}{c}"))));
    }

    #[test]
    fn generated_manifests_satisfy_schema(source in arb_manifest()) {
        let scope = execute_str(&source, &no_functions(), "DEPS").expect("manifest executes");
        prop_assert_eq!(validate(&scope), Ok(()));
    }

    #[test]
    fn check_is_reflexive(source in arb_manifest()) {
        let table = no_functions();
        let scope = execute_str(&source, &table, "DEPS").expect("manifest executes");
        let checked = check(&source, "DEPS", &table, &scope);
        prop_assert_eq!(checked, Ok(scope));
    }

    #[test]
    fn findings_are_sorted_and_stable(sources in prop::collection::vec(arb_manifest(), 1..4)) {
        let manifests: Vec<ManifestModel> = sources
            .iter()
            .enumerate()
            .map(|(i, source)| {
                let mut source = source.clone();
                // Make some manifests fail the host check.
                if i % 2 == 0 {
                    source.push_str("allowed_hosts = ['example.org']\n");
                }
                let path = format!("m{i}/DEPS");
                let scope = execute_str(&source, &no_functions(), &path).expect("manifest executes");
                ManifestModel::new(path.as_str(), scope)
            })
            .collect();
        let set = ManifestSet { manifests };
        let cfg = config_with_all_checks(Severity::Warning);

        let first = evaluate(&set, &cfg);
        let second = evaluate(&set, &cfg);
        prop_assert_eq!(&first.findings, &second.findings);
        for pair in first.findings.windows(2) {
            prop_assert!(finding_order(&pair[0], &pair[1]).is_le());
        }
    }
}
