use std::path::{Path, PathBuf};

use anyhow::Context;
use serde::Deserialize;

pub const CONFIG_FILENAME: &str = "xglish.toml";
pub const CONFIG_ENV: &str = "XGLISH_CONFIG";

#[derive(Clone, Debug, Deserialize, Default)]
pub struct AppConfig {
    #[serde(default)]
    pub pipeline: PipelineSection,
    #[serde(default)]
    pub backends: BackendsSection,
    #[serde(default)]
    pub data: DataSection,
}

#[derive(Clone, Debug, Deserialize, Default)]
pub struct PipelineSection {
    /// Translation backend: "libretranslate" or "indictrans2".
    #[serde(default)]
    pub translation_backend: Option<String>,

    /// Restoration strategy: "mask" (slot tokens through the translator) or
    /// "align" (index mapping into the romanized tokens).
    #[serde(default)]
    pub restore_strategy: Option<String>,

    /// Familiarity threshold used when a request does not supply one.
    #[serde(default)]
    pub default_threshold: Option<f32>,

    /// Romanizer: "builtin" or "service".
    #[serde(default)]
    pub romanizer: Option<String>,
}

#[derive(Clone, Debug, Deserialize, Default)]
pub struct BackendsSection {
    #[serde(default)]
    pub libretranslate: Option<HttpBackend>,
    #[serde(default)]
    pub indictrans2: Option<HttpBackend>,
    #[serde(default)]
    pub romanizer_service: Option<HttpBackend>,
}

#[derive(Clone, Debug, Deserialize)]
pub struct HttpBackend {
    pub endpoint: String,
    #[serde(default)]
    pub api_key: Option<String>,
}

#[derive(Clone, Debug, Deserialize, Default)]
pub struct DataSection {
    /// Directory with the lexicon data files (x-glish-db layout). Relative
    /// paths resolve against the config file's directory.
    #[serde(default)]
    pub dir: Option<PathBuf>,
}

fn find_file_upwards(start: &Path, filename: &str, max_depth: usize) -> Option<PathBuf> {
    let mut dir = Some(start.to_path_buf());
    for _ in 0..max_depth {
        let d = dir?;
        let cand = d.join(filename);
        if cand.is_file() {
            return Some(cand);
        }
        dir = d.parent().map(|p| p.to_path_buf());
    }
    None
}

pub fn find_default_config() -> Option<PathBuf> {
    if let Ok(p) = std::env::var(CONFIG_ENV) {
        let p = PathBuf::from(p);
        if p.is_file() {
            return Some(p);
        }
    }
    if let Ok(cwd) = std::env::current_dir() {
        if let Some(p) = find_file_upwards(&cwd, CONFIG_FILENAME, 8) {
            return Some(p);
        }
    }
    if let Ok(exe) = std::env::current_exe() {
        if let Some(dir) = exe.parent() {
            if let Some(p) = find_file_upwards(dir, CONFIG_FILENAME, 8) {
                return Some(p);
            }
        }
    }
    None
}

pub fn load_config(path: &Path) -> anyhow::Result<AppConfig> {
    let text = std::fs::read_to_string(path)
        .with_context(|| format!("read config: {}", path.display()))?;
    let cfg: AppConfig = toml::from_str(&text).context("parse config toml")?;
    Ok(cfg)
}

pub const DEFAULT_CONFIG_TOML: &str = r#"# xglish configuration

[pipeline]
# Translation backend: "libretranslate" or "indictrans2"
translation_backend = "libretranslate"
# Restoration strategy: "mask" or "align"
restore_strategy = "mask"
# Familiarity threshold when a request does not supply one
default_threshold = 7.0
# Romanizer: "builtin" or "service"
romanizer = "builtin"

[backends.libretranslate]
endpoint = "http://localhost:5050/translate"

[backends.indictrans2]
endpoint = "http://localhost:8000/translate"

# [backends.romanizer_service]
# endpoint = "http://localhost:8001/transliterate"

# [data]
# dir = "/path/to/x-glish-db"
"#;

/// Writes the default config file, refusing to clobber unless forced.
pub fn init_default_config(dir: &Path, force: bool) -> anyhow::Result<PathBuf> {
    std::fs::create_dir_all(dir).with_context(|| format!("create dir: {}", dir.display()))?;
    let path = dir.join(CONFIG_FILENAME);
    if path.exists() && !force {
        anyhow::bail!("config exists (use --force to overwrite): {}", path.display());
    }
    std::fs::write(&path, DEFAULT_CONFIG_TOML)
        .with_context(|| format!("write config: {}", path.display()))?;
    Ok(path)
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn default_config_parses() {
        let cfg: AppConfig = toml::from_str(DEFAULT_CONFIG_TOML).expect("parse default");
        assert_eq!(
            cfg.pipeline.translation_backend.as_deref(),
            Some("libretranslate")
        );
        assert_eq!(cfg.pipeline.default_threshold, Some(7.0));
        assert!(cfg.backends.libretranslate.is_some());
        assert!(cfg.data.dir.is_none());
    }

    #[test]
    fn init_then_load_round_trips() {
        let dir = tempfile::tempdir().expect("tempdir");
        let path = init_default_config(dir.path(), false).expect("init");
        let cfg = load_config(&path).expect("load");
        assert_eq!(cfg.pipeline.restore_strategy.as_deref(), Some("mask"));
        // Second init without force refuses.
        assert!(init_default_config(dir.path(), false).is_err());
        assert!(init_default_config(dir.path(), true).is_ok());
    }

    #[test]
    fn empty_config_uses_defaults() {
        let cfg: AppConfig = toml::from_str("").expect("parse empty");
        assert!(cfg.pipeline.translation_backend.is_none());
    }
}
