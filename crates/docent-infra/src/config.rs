//! Configuration loader for Docent.
//!
//! Reads `docent.toml` from the data directory (`~/.docent/` by default,
//! overridable via `DOCENT_DATA_DIR`) and deserializes it into
//! [`DocentConfig`]. Falls back to defaults when the file is missing or
//! malformed.

use std::path::{Path, PathBuf};

use docent_types::config::DocentConfig;

/// Resolve the data directory.
///
/// Priority: `DOCENT_DATA_DIR` environment variable, then `~/.docent`,
/// then `./.docent` when no home directory is available.
pub fn resolve_data_dir() -> PathBuf {
    if let Ok(dir) = std::env::var("DOCENT_DATA_DIR") {
        return PathBuf::from(dir);
    }
    dirs::home_dir()
        .unwrap_or_else(|| PathBuf::from("."))
        .join(".docent")
}

/// Load configuration from `{data_dir}/docent.toml`.
///
/// - If the file does not exist, returns [`DocentConfig::default()`].
/// - If the file exists but fails to parse, logs a warning and returns
///   the default.
/// - If the file parses but fails validation, logs a warning and returns
///   the default (a half-broken retrieval setup is worse than defaults).
pub async fn load_config(data_dir: &Path) -> DocentConfig {
    let config_path = data_dir.join("docent.toml");

    let content = match tokio::fs::read_to_string(&config_path).await {
        Ok(content) => content,
        Err(err) if err.kind() == std::io::ErrorKind::NotFound => {
            tracing::debug!(
                "No docent.toml found at {}, using defaults",
                config_path.display()
            );
            return DocentConfig::default();
        }
        Err(err) => {
            tracing::warn!(
                "Failed to read {}: {err}, using defaults",
                config_path.display()
            );
            return DocentConfig::default();
        }
    };

    let config = match toml::from_str::<DocentConfig>(&content) {
        Ok(config) => config,
        Err(err) => {
            tracing::warn!(
                "Failed to parse {}: {err}, using defaults",
                config_path.display()
            );
            return DocentConfig::default();
        }
    };

    if let Err(err) = config.validate() {
        tracing::warn!(
            "Invalid configuration in {}: {err}, using defaults",
            config_path.display()
        );
        return DocentConfig::default();
    }

    config
}

/// Resolve the corpus directory from config, defaulting to
/// `{data_dir}/corpus`.
pub fn resolve_corpus_dir(config: &DocentConfig, data_dir: &Path) -> PathBuf {
    match &config.corpus.dir {
        Some(dir) => PathBuf::from(dir),
        None => data_dir.join("corpus"),
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use tempfile::TempDir;

    #[tokio::test]
    async fn load_config_missing_file_returns_default() {
        let tmp = TempDir::new().unwrap();
        let config = load_config(tmp.path()).await;
        assert_eq!(config.retrieval.top_k, 8);
        assert_eq!(config.chunking.chunk_size, 500);
    }

    #[tokio::test]
    async fn load_config_valid_toml_returns_parsed() {
        let tmp = TempDir::new().unwrap();
        tokio::fs::write(
            tmp.path().join("docent.toml"),
            r#"
[retrieval]
top_k = 4
fetch_k = 12

[provider]
model = "gemini-2.0-flash"
"#,
        )
        .await
        .unwrap();

        let config = load_config(tmp.path()).await;
        assert_eq!(config.retrieval.top_k, 4);
        assert_eq!(config.retrieval.fetch_k, 12);
        assert_eq!(config.provider.model, "gemini-2.0-flash");
    }

    #[tokio::test]
    async fn load_config_invalid_toml_returns_default() {
        let tmp = TempDir::new().unwrap();
        tokio::fs::write(tmp.path().join("docent.toml"), "this is not { valid toml !!!")
            .await
            .unwrap();

        let config = load_config(tmp.path()).await;
        assert_eq!(config.retrieval.top_k, 8);
    }

    #[tokio::test]
    async fn load_config_failing_validation_returns_default() {
        let tmp = TempDir::new().unwrap();
        tokio::fs::write(
            tmp.path().join("docent.toml"),
            r#"
[chunking]
chunk_size = 100
chunk_overlap = 200
"#,
        )
        .await
        .unwrap();

        let config = load_config(tmp.path()).await;
        assert_eq!(config.chunking.chunk_size, 500);
        assert_eq!(config.chunking.chunk_overlap, 60);
    }

    #[test]
    fn resolve_corpus_dir_prefers_config() {
        let mut config = DocentConfig::default();
        config.corpus.dir = Some("/srv/handbook".to_string());
        let dir = resolve_corpus_dir(&config, Path::new("/home/u/.docent"));
        assert_eq!(dir, PathBuf::from("/srv/handbook"));
    }

    #[test]
    fn resolve_corpus_dir_defaults_under_data_dir() {
        let config = DocentConfig::default();
        let dir = resolve_corpus_dir(&config, Path::new("/home/u/.docent"));
        assert_eq!(dir, PathBuf::from("/home/u/.docent/corpus"));
    }
}
