//! Config Validation Tests
//!
//! Typo detection for unknown TOML keys and range validation of the solver
//! settings, exercised independently from the HTTP layer.

use zonebrew::config::validation::{
    known_config_keys, suggest_correction, suspicious_values, validate_unknown_keys,
};
use zonebrew::config::{ConfigError, ServiceConfig};
use zonebrew::SearchParams;

// ============================================================================
// Typo Detection
// ============================================================================

#[test]
fn typo_in_solver_section_warns_with_suggestion() {
    let toml_str = r#"
[solver]
max_state_vists = 5000
"#;
    let warnings = validate_unknown_keys(toml_str);
    assert_eq!(warnings.len(), 1, "Expected exactly 1 warning");
    assert!(warnings[0].field.contains("max_state_vists"));
    assert_eq!(
        warnings[0].suggestion.as_deref(),
        Some("solver.max_state_visits")
    );
}

#[test]
fn typo_in_section_name_warns() {
    let toml_str = r#"
[catalgo]
path = "catalog.json"
"#;
    let warnings = validate_unknown_keys(toml_str);
    // both the table and its key are unknown
    assert_eq!(warnings.len(), 2);
    assert_eq!(warnings[0].suggestion.as_deref(), Some("catalog"));
}

#[test]
fn valid_config_produces_zero_warnings() {
    let toml_str = r#"
[server]
addr = "127.0.0.1:9000"

[solver]
default_total_cap = 12
default_per_cap = 6
default_top_k = 5
max_top_k = 50
max_state_visits = 200000
time_budget_ms = 1500
parallel = false
optional_trim = true
domain_min = 0.0
domain_max = 11.0

[catalog]
path = "catalog.json"
"#;
    let warnings = validate_unknown_keys(toml_str);
    assert!(warnings.is_empty(), "unexpected warnings: {warnings:?}");
}

#[test]
fn garbage_key_gets_no_suggestion() {
    let known = known_config_keys();
    assert_eq!(suggest_correction("zzzzzzzzzzzzzz", &known), None);
}

// ============================================================================
// Range Validation
// ============================================================================

#[test]
fn parsed_config_feeds_search_defaults() {
    let cfg = ServiceConfig::from_toml_str(
        r#"
[solver]
default_total_cap = 12
default_per_cap = 6
max_state_visits = 0
time_budget_ms = 250
parallel = false
"#,
    )
    .unwrap();
    let params = SearchParams::from_config(&cfg.solver);
    assert_eq!(params.total_cap, 12);
    assert_eq!(params.per_cap, 6);
    assert_eq!(params.max_state_visits, 0);
    assert_eq!(params.time_budget, Some(std::time::Duration::from_millis(250)));
    assert!(!params.parallel);
}

#[test]
fn zero_top_k_and_inverted_domain_fail_validation() {
    let mut cfg = ServiceConfig::default();
    cfg.solver.default_top_k = 0;
    cfg.solver.domain_min = 5.0;
    cfg.solver.domain_max = 1.0;

    match cfg.validate() {
        Err(ConfigError::Validation(errors)) => {
            assert_eq!(errors.len(), 2, "{errors:?}");
            assert!(errors.iter().any(|e| e.contains("default_top_k")));
            assert!(errors.iter().any(|e| e.contains("domain_min")));
        }
        other => panic!("expected validation error, got {other:?}"),
    }
}

#[test]
fn per_cap_above_total_cap_is_suspicious() {
    let mut cfg = ServiceConfig::default();
    cfg.solver.default_per_cap = 40;
    let warnings = suspicious_values(&cfg);
    assert_eq!(warnings.len(), 1);
    assert_eq!(warnings[0].field, "solver.default_per_cap");
}

#[test]
fn saved_config_reloads_identically() {
    let dir = tempfile::tempdir().unwrap();
    let path = dir.path().join("zonebrew.toml");

    let mut cfg = ServiceConfig::default();
    cfg.solver.default_top_k = 7;
    cfg.catalog.path = Some("beers.json".into());
    cfg.save_to_file(&path).unwrap();

    let loaded = ServiceConfig::load_from_file(&path).unwrap();
    assert_eq!(loaded.solver.default_top_k, 7);
    assert_eq!(loaded.catalog.path.as_deref(), Some(std::path::Path::new("beers.json")));
}
