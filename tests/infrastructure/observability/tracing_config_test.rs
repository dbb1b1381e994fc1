use audube::infrastructure::observability::TracingConfig;

fn config(verbose: bool) -> TracingConfig {
    TracingConfig {
        environment: "test".to_string(),
        json_format: false,
        verbose,
    }
}

#[test]
fn given_default_config_when_created_then_environment_is_set_and_quiet() {
    let config = TracingConfig::default();
    assert!(!config.environment.is_empty());
    assert!(!config.verbose);
}

#[test]
fn given_verbose_flag_when_building_filter_then_uses_debug_level() {
    let config = config(false).with_verbose(true);
    assert!(config.default_filter().starts_with("debug"));
}

#[test]
fn given_quiet_config_when_building_filter_then_uses_info_level() {
    assert_eq!(config(false).default_filter(), "info,audube=info,tower_http=info");
}
