//! Configuration for quote-align.
//!
//! Configuration sources (highest priority first):
//! 1. Environment variable QUOTE_ALIGN_CONFIG (path to a YAML file)
//! 2. Config file (.quote-align/config.yaml) in the current directory or a parent
//! 3. User config file (<config dir>/quote-align/config.yaml)
//! 4. Defaults
//!
//! The token table layout is configurable because dutchcoref and BookNLP
//! exports have shifted their column order between releases.

use std::path::{Path, PathBuf};
use std::sync::OnceLock;

use anyhow::{Context, Result};
use serde::Deserialize;

/// Global cached configuration (stores Result to handle init errors)
static CONFIG: OnceLock<Result<ResolvedConfig, String>> = OnceLock::new();

/// Raw config file schema (matches YAML structure)
#[derive(Debug, Clone, Default, Deserialize)]
pub struct ConfigFile {
    #[serde(default)]
    pub columns: Option<ColumnsConfig>,
    pub comment_prefix: Option<String>,
    pub updated_suffix: Option<String>,
    pub verbose: Option<bool>,
}

#[derive(Debug, Clone, Default, Deserialize)]
pub struct ColumnsConfig {
    pub sentence_id: Option<usize>,
    pub token: Option<usize>,
    pub speaker: Option<usize>,
    pub quote: Option<usize>,
}

/// Zero-based column indices into the token table
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct ColumnLayout {
    pub sentence_id: usize,
    pub token: usize,
    pub speaker: usize,
    pub quote: usize,
}

impl Default for ColumnLayout {
    fn default() -> Self {
        Self {
            sentence_id: 1,
            token: 3,
            speaker: 9,
            quote: 11,
        }
    }
}

impl ColumnLayout {
    /// Minimum number of columns a token line must have
    pub fn width(&self) -> usize {
        [self.sentence_id, self.token, self.speaker, self.quote]
            .into_iter()
            .max()
            .unwrap_or(0)
            + 1
    }
}

/// Resolved configuration
#[derive(Debug, Clone)]
pub struct ResolvedConfig {
    pub columns: ColumnLayout,
    /// Lines of the token table starting with this are skipped
    pub comment_prefix: String,
    /// Appended to the file stem of an updated document
    pub updated_suffix: String,
    /// Log per-quote text differences during evaluation
    pub verbose: bool,
    /// Path to config file (if found)
    pub config_file: Option<PathBuf>,
}

impl Default for ResolvedConfig {
    fn default() -> Self {
        Self {
            columns: ColumnLayout::default(),
            comment_prefix: "#".to_string(),
            updated_suffix: "_updated".to_string(),
            verbose: false,
            config_file: None,
        }
    }
}

impl ResolvedConfig {
    /// Path an updated document is written to: `<stem><suffix>.xml` beside the input
    pub fn updated_path(&self, input: &Path) -> PathBuf {
        let stem = input
            .file_stem()
            .map(|s| s.to_string_lossy().to_string())
            .unwrap_or_default();
        input.with_file_name(format!("{}{}.xml", stem, self.updated_suffix))
    }

    fn apply(mut self, file: ConfigFile) -> Self {
        if let Some(columns) = file.columns {
            self.columns = ColumnLayout {
                sentence_id: columns.sentence_id.unwrap_or(self.columns.sentence_id),
                token: columns.token.unwrap_or(self.columns.token),
                speaker: columns.speaker.unwrap_or(self.columns.speaker),
                quote: columns.quote.unwrap_or(self.columns.quote),
            };
        }
        if let Some(prefix) = file.comment_prefix {
            self.comment_prefix = prefix;
        }
        if let Some(suffix) = file.updated_suffix {
            self.updated_suffix = suffix;
        }
        if let Some(verbose) = file.verbose {
            self.verbose = verbose;
        }
        self
    }
}

/// Find config file by searching current directory and parents
fn find_config_file() -> Option<PathBuf> {
    let mut current = std::env::current_dir().ok()?;

    loop {
        let config_path = current.join(".quote-align").join("config.yaml");
        if config_path.exists() {
            return Some(config_path);
        }

        if !current.pop() {
            break;
        }
    }

    let user_config = dirs::config_dir()?.join("quote-align").join("config.yaml");
    user_config.exists().then_some(user_config)
}

/// Load and parse config file
fn load_config_file(path: &Path) -> Result<ConfigFile> {
    let content = std::fs::read_to_string(path)
        .with_context(|| format!("Failed to read config file: {}", path.display()))?;

    serde_yaml::from_str(&content)
        .with_context(|| format!("Failed to parse config file: {}", path.display()))
}

/// Load configuration from all sources
fn load_config() -> Result<ResolvedConfig> {
    let config_file = match std::env::var("QUOTE_ALIGN_CONFIG") {
        Ok(path) => Some(PathBuf::from(path)),
        Err(_) => find_config_file(),
    };

    let mut resolved = match config_file {
        Some(ref path) => ResolvedConfig::default().apply(load_config_file(path)?),
        None => ResolvedConfig::default(),
    };
    resolved.config_file = config_file;

    Ok(resolved)
}

/// Get the global configuration (loads once, then cached)
pub fn config() -> Result<&'static ResolvedConfig> {
    let result = CONFIG.get_or_init(|| load_config().map_err(|e| e.to_string()));

    match result {
        Ok(config) => Ok(config),
        Err(e) => anyhow::bail!("{}", e),
    }
}

/// Force reload configuration (useful for testing)
pub fn reload_config() -> Result<ResolvedConfig> {
    load_config()
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::io::Write;
    use tempfile::TempDir;

    #[test]
    fn test_defaults() {
        let config = ResolvedConfig::default();
        assert_eq!(config.columns, ColumnLayout::default());
        assert_eq!(config.columns.width(), 12);
        assert_eq!(config.comment_prefix, "#");
        assert_eq!(config.updated_suffix, "_updated");
        assert!(!config.verbose);
    }

    #[test]
    fn test_config_file_parsing() {
        let temp = TempDir::new().unwrap();
        let dir = temp.path().join(".quote-align");
        std::fs::create_dir_all(&dir).unwrap();

        let config_path = dir.join("config.yaml");
        let mut file = std::fs::File::create(&config_path).unwrap();
        writeln!(
            file,
            r#"
columns:
  token: 2
  quote: 7
updated_suffix: _fixed
verbose: true
"#
        )
        .unwrap();

        let parsed = load_config_file(&config_path).unwrap();
        let config = ResolvedConfig::default().apply(parsed);
        assert_eq!(config.columns.sentence_id, 1);
        assert_eq!(config.columns.token, 2);
        assert_eq!(config.columns.speaker, 9);
        assert_eq!(config.columns.quote, 7);
        assert_eq!(config.columns.width(), 10);
        assert_eq!(config.comment_prefix, "#");
        assert_eq!(config.updated_suffix, "_fixed");
        assert!(config.verbose);
    }

    #[test]
    fn test_updated_path() {
        let config = ResolvedConfig::default();
        assert_eq!(
            config.updated_path(Path::new("/data/Abdolah_Koning_annotated.xml")),
            PathBuf::from("/data/Abdolah_Koning_annotated_updated.xml")
        );
        assert_eq!(
            config.updated_path(Path::new("novel")),
            PathBuf::from("novel_updated.xml")
        );
    }
}
