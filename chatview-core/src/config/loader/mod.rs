use crate::config::constants::{files, syntax};
use crate::config::{MarkdownConfig, SelectionConfig, UiConfig};
use anyhow::{Context, Result};
use serde::{Deserialize, Serialize};
use std::fs;
use std::path::{Path, PathBuf};
use tracing::debug;

/// Syntax highlighting configuration
#[derive(Debug, Clone, Deserialize, Serialize)]
pub struct SyntaxHighlightingConfig {
    /// Enable syntax highlighting for fenced code blocks
    #[serde(default = "default_true")]
    pub enabled: bool,

    /// Syntect theme overriding the one chosen by the UI theme
    #[serde(default)]
    pub theme: Option<String>,

    /// Maximum code block size for syntax highlighting (in MB)
    #[serde(default = "default_max_file_size")]
    pub max_file_size_mb: usize,

    /// Languages to enable syntax highlighting for
    #[serde(default = "default_enabled_languages")]
    pub enabled_languages: Vec<String>,
}

fn default_true() -> bool {
    true
}
fn default_max_file_size() -> usize {
    syntax::DEFAULT_MAX_FILE_SIZE_MB
}
fn default_enabled_languages() -> Vec<String> {
    syntax::DEFAULT_ENABLED_LANGUAGES
        .iter()
        .map(|lang| lang.to_string())
        .collect()
}

impl Default for SyntaxHighlightingConfig {
    fn default() -> Self {
        Self {
            enabled: default_true(),
            theme: None,
            max_file_size_mb: default_max_file_size(),
            enabled_languages: default_enabled_languages(),
        }
    }
}

impl SyntaxHighlightingConfig {
    /// Whether `language` is on the allow list (case-insensitive).
    pub fn is_language_enabled(&self, language: &str) -> bool {
        self.enabled_languages
            .iter()
            .any(|entry| entry.eq_ignore_ascii_case(language))
    }

    /// Size limit in bytes, `None` when unlimited.
    pub fn max_bytes(&self) -> Option<usize> {
        let bytes = self.max_file_size_mb.saturating_mul(1024 * 1024);
        (bytes > 0).then_some(bytes)
    }
}

/// Main configuration structure for chatview
#[derive(Debug, Clone, Default, Deserialize, Serialize)]
pub struct ChatViewConfig {
    /// UI settings
    #[serde(default)]
    pub ui: UiConfig,

    /// Markdown layout settings
    #[serde(default)]
    pub markdown: MarkdownConfig,

    /// Mouse selection settings
    #[serde(default)]
    pub selection: SelectionConfig,

    /// Syntax highlighting configuration
    #[serde(default)]
    pub syntax_highlighting: SyntaxHighlightingConfig,
}

impl ChatViewConfig {
    /// Load configuration from a specific file
    pub fn load_from_file(path: impl AsRef<Path>) -> Result<Self> {
        let path = path.as_ref();
        let content = fs::read_to_string(path)
            .with_context(|| format!("Failed to read config file: {}", path.display()))?;

        toml::from_str(&content)
            .with_context(|| format!("Failed to parse config file: {}", path.display()))
    }

    /// Create sample configuration file
    pub fn create_sample_config<P: AsRef<Path>>(output: P) -> Result<()> {
        let output = output.as_ref();
        let default_config = ChatViewConfig::default();
        let config_content = toml::to_string_pretty(&default_config)
            .context("Failed to serialize default configuration")?;

        fs::write(output, config_content)
            .with_context(|| format!("Failed to write config file: {}", output.display()))?;

        Ok(())
    }
}

/// Configuration manager for locating and loading `chatview.toml`
#[derive(Clone, Debug)]
pub struct ConfigManager {
    config: ChatViewConfig,
    config_path: Option<PathBuf>,
}

impl ConfigManager {
    /// Load configuration from the current directory
    pub fn load() -> Result<Self> {
        let cwd = std::env::current_dir().context("Failed to resolve current directory")?;
        Self::load_from_workspace(cwd)
    }

    /// Load configuration from a specific workspace
    ///
    /// Looks for `chatview.toml`, then `.chatview/chatview.toml`, and falls
    /// back to defaults when neither exists.
    pub fn load_from_workspace(workspace: impl AsRef<Path>) -> Result<Self> {
        let workspace = workspace.as_ref();
        let candidates = [
            workspace.join(files::CONFIG_FILE_NAME),
            workspace
                .join(files::CONFIG_DIR_NAME)
                .join(files::CONFIG_FILE_NAME),
        ];

        for candidate in candidates {
            if candidate.exists() {
                return Self::load_from_file(candidate);
            }
        }

        debug!(workspace = %workspace.display(), "no chatview.toml found, using defaults");
        Ok(Self {
            config: ChatViewConfig::default(),
            config_path: None,
        })
    }

    /// Load configuration from a specific file
    pub fn load_from_file(path: impl AsRef<Path>) -> Result<Self> {
        let path = path.as_ref();
        let config = ChatViewConfig::load_from_file(path)?;
        Ok(Self {
            config,
            config_path: Some(path.to_path_buf()),
        })
    }

    /// Get the loaded configuration
    pub fn config(&self) -> &ChatViewConfig {
        &self.config
    }

    /// Get the configuration file path (if loaded from file)
    pub fn config_path(&self) -> Option<&Path> {
        self.config_path.as_deref()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_partial_file_keeps_defaults() {
        let config: ChatViewConfig = toml::from_str(
            r#"
            [selection]
            click_tolerance = 5
            "#,
        )
        .unwrap();
        assert_eq!(config.selection.click_tolerance, 5);
        assert_eq!(config.selection.multi_click_window_ms, 500);
        assert_eq!(config.ui.theme, "ciapre-dark");
        assert!(config.syntax_highlighting.enabled);
        assert!(config.syntax_highlighting.theme.is_none());
    }

    #[test]
    fn test_language_allow_list_ignores_case() {
        let config = SyntaxHighlightingConfig::default();
        assert!(config.is_language_enabled("Rust"));
        assert!(!config.is_language_enabled("cobol"));
    }

    #[test]
    fn test_zero_size_limit_means_unlimited() {
        let config = SyntaxHighlightingConfig {
            max_file_size_mb: 0,
            ..SyntaxHighlightingConfig::default()
        };
        assert_eq!(config.max_bytes(), None);
        assert_eq!(
            SyntaxHighlightingConfig::default().max_bytes(),
            Some(10 * 1024 * 1024)
        );
    }
}
