use super::*;
use tempfile::TempDir;

#[test]
fn test_defaults() {
    let config = ResolverConfig::default();
    assert_eq!(config.max_path_depth, 5);
    assert_eq!(config.max_multi_depth, 10);
    assert_eq!(config.max_suggestions, 3);
}

#[test]
fn test_partial_config_fills_defaults() {
    let config = ResolverConfig::from_yaml("max_path_depth: 3\n").unwrap();
    assert_eq!(config.max_path_depth, 3);
    assert_eq!(config.max_multi_depth, 10);
}

#[test]
fn test_empty_config_is_default() {
    assert_eq!(
        ResolverConfig::from_yaml("  \n").unwrap(),
        ResolverConfig::default()
    );
}

#[test]
fn test_unknown_field_rejected() {
    let err = ResolverConfig::from_yaml("max_depth: 3\n").unwrap_err();
    assert!(matches!(err, CoreError::ConfigParseError { .. }));
}

#[test]
fn test_zero_depth_rejected() {
    let err = ResolverConfig::from_yaml("max_multi_depth: 0\n").unwrap_err();
    assert!(matches!(err, CoreError::ConfigInvalid { .. }));
    assert!(err.to_string().starts_with("[E003]"));
}

#[test]
fn test_load_missing_file() {
    let err = ResolverConfig::load(Path::new("/nonexistent/contextgraph.yml")).unwrap_err();
    assert!(matches!(err, CoreError::ConfigNotFound { .. }));
}

#[test]
fn test_load_from_dir_prefers_yml() {
    let dir = TempDir::new().unwrap();
    std::fs::write(dir.path().join("contextgraph.yml"), "max_suggestions: 7\n").unwrap();
    std::fs::write(dir.path().join("contextgraph.yaml"), "max_suggestions: 9\n").unwrap();
    let config = ResolverConfig::load_from_dir(dir.path()).unwrap();
    assert_eq!(config.max_suggestions, 7);
}

#[test]
fn test_load_from_dir_yaml_extension() {
    let dir = TempDir::new().unwrap();
    std::fs::write(dir.path().join("contextgraph.yaml"), "max_path_depth: 2\n").unwrap();
    let config = ResolverConfig::load_from_dir(dir.path()).unwrap();
    assert_eq!(config.max_path_depth, 2);
}

#[test]
fn test_load_from_dir_without_file_uses_defaults() {
    let dir = TempDir::new().unwrap();
    let config = ResolverConfig::load_from_dir(dir.path()).unwrap();
    assert_eq!(config, ResolverConfig::default());
}
