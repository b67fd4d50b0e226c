use chatview_core::config::constants::files::{CONFIG_DIR_NAME, CONFIG_FILE_NAME};
use chatview_core::ui::theme::Theme;
use chatview_core::{ChatViewConfig, ConfigManager};
use std::fs;
use tempfile::TempDir;

#[test]
fn workspace_config_is_loaded() {
    let dir = TempDir::new().unwrap();
    let path = dir.path().join(CONFIG_FILE_NAME);
    fs::write(
        &path,
        r#"
[ui]
theme = "solarized-light"

[selection]
click_tolerance = 4

[syntax_highlighting]
enabled_languages = ["rust"]
"#,
    )
    .unwrap();

    let manager = ConfigManager::load_from_workspace(dir.path()).unwrap();
    let config = manager.config();
    assert_eq!(manager.config_path(), Some(path.as_path()));
    assert_eq!(config.ui.theme, "solarized-light");
    assert_eq!(config.selection.click_tolerance, 4);
    assert_eq!(config.selection.flash_tick_ms, 100);
    assert!(config.syntax_highlighting.is_language_enabled("rust"));
    assert!(!config.syntax_highlighting.is_language_enabled("python"));
    assert_eq!(Theme::from_id(&config.ui.theme).unwrap().id(), "solarized-light");
}

#[test]
fn nested_config_dir_is_found() {
    let dir = TempDir::new().unwrap();
    let nested = dir.path().join(CONFIG_DIR_NAME);
    fs::create_dir_all(&nested).unwrap();
    fs::write(nested.join(CONFIG_FILE_NAME), "[markdown]\nmin_column_width = 5\n").unwrap();

    let manager = ConfigManager::load_from_workspace(dir.path()).unwrap();
    assert_eq!(manager.config().markdown.min_column_width, 5);
    assert!(manager.config_path().is_some());
}

#[test]
fn missing_config_uses_defaults() {
    let dir = TempDir::new().unwrap();
    let manager = ConfigManager::load_from_workspace(dir.path()).unwrap();
    assert!(manager.config_path().is_none());
    assert_eq!(manager.config().ui.theme, "ciapre-dark");
    assert_eq!(manager.config().markdown.render_cache_capacity, 64);
}

#[test]
fn malformed_config_reports_path() {
    let dir = TempDir::new().unwrap();
    let path = dir.path().join(CONFIG_FILE_NAME);
    fs::write(&path, "[ui\ntheme = ").unwrap();
    let error = ConfigManager::load_from_workspace(dir.path()).unwrap_err();
    assert!(format!("{error:#}").contains(CONFIG_FILE_NAME));
}

#[test]
fn sample_config_round_trips() {
    let dir = TempDir::new().unwrap();
    let path = dir.path().join("sample.toml");
    ChatViewConfig::create_sample_config(&path).unwrap();
    let loaded = ChatViewConfig::load_from_file(&path).unwrap();
    let defaults = ChatViewConfig::default();
    assert_eq!(loaded.ui.theme, defaults.ui.theme);
    assert_eq!(loaded.selection.click_tolerance, defaults.selection.click_tolerance);
    assert_eq!(
        loaded.syntax_highlighting.enabled_languages,
        defaults.syntax_highlighting.enabled_languages
    );
}
