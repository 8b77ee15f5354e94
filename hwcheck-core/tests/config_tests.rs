use hwcheck_core::config::*;
use hwcheck_core::CoreError;
use std::collections::HashMap;

fn lookup(vars: &[(&str, &str)]) -> impl Fn(&str) -> Option<String> {
    let map: HashMap<String, String> = vars
        .iter()
        .map(|(k, v)| (k.to_string(), v.to_string()))
        .collect();
    move |key| map.get(key).cloned()
}

#[test]
fn test_default_config() {
    let config = CoreConfig::default();
    assert_eq!(config.reference_width, 1920);
    assert_eq!(config.reference_height, 1080);
    assert_eq!(config.parent_exit_code, 1);
    assert_eq!(config.watch_strategy, WatchStrategy::EventQueue);
    assert_eq!(config.watcher_thread_name, DEFAULT_WATCHER_THREAD_NAME);
    assert!(config.validate().is_ok());
}

#[test]
fn test_builder_overrides() {
    let config = CoreConfigBuilder::new()
        .reference_resolution(3840, 2160)
        .parent_exit_code(7)
        .watch_strategy(WatchStrategy::KernelSignal)
        .watcher_thread_name("watch")
        .build();

    assert_eq!((config.reference_width, config.reference_height), (3840, 2160));
    assert_eq!(config.parent_exit_code, 7);
    assert_eq!(config.watch_strategy, WatchStrategy::KernelSignal);
    assert_eq!(config.watcher_thread_name, "watch");
}

#[test]
fn test_env_var_overrides() {
    let mut config = CoreConfig::default();
    config
        .apply_env_overrides_with(lookup(&[
            (ENV_REFERENCE_WIDTH, "1280"),
            (ENV_REFERENCE_HEIGHT, " 720 "),
            (ENV_PARENT_EXIT_CODE, "2"),
            (ENV_WATCH_STRATEGY, "kernel-signal"),
        ]))
        .unwrap();

    assert_eq!((config.reference_width, config.reference_height), (1280, 720));
    assert_eq!(config.parent_exit_code, 2);
    assert_eq!(config.watch_strategy, WatchStrategy::KernelSignal);
}

#[test]
fn test_missing_env_vars_keep_defaults() {
    let mut config = CoreConfig::default();
    config.apply_env_overrides_with(lookup(&[])).unwrap();
    assert_eq!(config, CoreConfig::default());
}

#[test]
fn test_software_encoder_toggle_is_not_honoured() {
    // Encoder queries are always hardware-only; there is no switch for it.
    let mut config = CoreConfig::default();
    config
        .apply_env_overrides_with(lookup(&[("HWCHECK_REQUIRE_HARDWARE", "0")]))
        .unwrap();
    assert_eq!(config, CoreConfig::default());
}

#[test]
fn test_invalid_env_values_are_rejected() {
    let mut config = CoreConfig::default();
    let err = config
        .apply_env_overrides_with(lookup(&[(ENV_REFERENCE_WIDTH, "wide")]))
        .unwrap_err();
    assert!(matches!(err, CoreError::Config(_)));

    let err = config
        .apply_env_overrides_with(lookup(&[(ENV_PARENT_EXIT_CODE, "many")]))
        .unwrap_err();
    assert!(matches!(err, CoreError::Config(_)));

    let err = config
        .apply_env_overrides_with(lookup(&[(ENV_WATCH_STRATEGY, "polling")]))
        .unwrap_err();
    assert!(err.to_string().contains("unknown watch strategy"));
}

#[test]
fn test_validate_rejects_bad_values() {
    let zero_exit = CoreConfigBuilder::new().parent_exit_code(0).build();
    assert!(matches!(zero_exit.validate(), Err(CoreError::Config(_))));

    let huge_exit = CoreConfigBuilder::new().parent_exit_code(256).build();
    assert!(huge_exit.validate().is_err());

    let no_width = CoreConfigBuilder::new().reference_resolution(0, 1080).build();
    assert!(no_width.validate().is_err());

    let unnamed = CoreConfigBuilder::new().watcher_thread_name("").build();
    assert!(unnamed.validate().is_err());
}

#[test]
fn test_watch_strategy_round_trips_through_display() {
    for strategy in [WatchStrategy::EventQueue, WatchStrategy::KernelSignal] {
        assert_eq!(strategy.to_string().parse::<WatchStrategy>().unwrap(), strategy);
    }
}
