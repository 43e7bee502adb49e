use std::path::PathBuf;
use std::sync::Arc;

use anyhow::{bail, Context};

use crate::config::{find_default_config, load_config, AppConfig};
use crate::lexicon::Lexicon;
use crate::pipeline::{Mixer, RestoreStrategy, DEFAULT_THRESHOLD};
use crate::progress::ConsoleProgress;
use crate::romanize::{BuiltinRomanizer, HttpRomanizer, Romanizer};
use crate::translate::{IndicServiceClient, LibreTranslateClient, Translator};

const DEFAULT_LIBRE_ENDPOINT: &str = "http://localhost:5050/translate";
const DEFAULT_INDIC_ENDPOINT: &str = "http://localhost:8000/translate";

#[derive(Clone, Debug)]
pub enum TranslatorChoice {
    LibreTranslate { endpoint: String, api_key: Option<String> },
    IndicService { endpoint: String },
}

#[derive(Clone, Debug)]
pub enum RomanizerChoice {
    Builtin,
    Service { endpoint: String },
}

/// Resolved pipeline configuration: file config plus CLI overrides, with the
/// backend variants fixed before anything runs.
#[derive(Clone, Debug)]
pub struct PipelineConfig {
    pub config_path: Option<PathBuf>,
    pub translator: TranslatorChoice,
    pub romanizer: RomanizerChoice,
    pub default_threshold: f32,
    pub strategy: RestoreStrategy,
    pub data_dir: Option<PathBuf>,
}

impl PipelineConfig {
    pub fn resolve(
        config_path: Option<PathBuf>,
        backend_override: Option<String>,
        strategy_override: Option<String>,
        threshold_override: Option<f32>,
        data_dir_override: Option<PathBuf>,
    ) -> anyhow::Result<PipelineConfig> {
        let config_path = config_path.or_else(find_default_config);
        let cfg: AppConfig = match config_path.as_deref() {
            Some(p) => load_config(p)?,
            None => AppConfig::default(),
        };
        let config_dir = config_path
            .as_deref()
            .and_then(|p| p.parent())
            .map(|p| p.to_path_buf());

        let backend_name = backend_override
            .or(cfg.pipeline.translation_backend.clone())
            .unwrap_or_else(|| "libretranslate".to_string());
        let translator = match backend_name.trim().to_ascii_lowercase().as_str() {
            "libretranslate" => {
                let b = cfg.backends.libretranslate.as_ref();
                TranslatorChoice::LibreTranslate {
                    endpoint: b
                        .map(|b| b.endpoint.clone())
                        .unwrap_or_else(|| DEFAULT_LIBRE_ENDPOINT.to_string()),
                    api_key: b.and_then(|b| b.api_key.clone()),
                }
            }
            "indictrans2" => TranslatorChoice::IndicService {
                endpoint: cfg
                    .backends
                    .indictrans2
                    .as_ref()
                    .map(|b| b.endpoint.clone())
                    .unwrap_or_else(|| DEFAULT_INDIC_ENDPOINT.to_string()),
            },
            other => bail!("unknown translation backend: {other}"),
        };

        let romanizer_name = cfg
            .pipeline
            .romanizer
            .clone()
            .unwrap_or_else(|| "builtin".to_string());
        let romanizer = match romanizer_name.trim().to_ascii_lowercase().as_str() {
            "builtin" => RomanizerChoice::Builtin,
            "service" => {
                let b = cfg
                    .backends
                    .romanizer_service
                    .as_ref()
                    .context("romanizer = \"service\" requires [backends.romanizer_service]")?;
                RomanizerChoice::Service {
                    endpoint: b.endpoint.clone(),
                }
            }
            other => bail!("unknown romanizer: {other}"),
        };

        let strategy = match strategy_override.or(cfg.pipeline.restore_strategy.clone()) {
            Some(name) => RestoreStrategy::parse(&name)
                .with_context(|| format!("unknown restore strategy: {name}"))?,
            None => RestoreStrategy::default(),
        };

        let default_threshold = threshold_override
            .or(cfg.pipeline.default_threshold)
            .unwrap_or(DEFAULT_THRESHOLD);
        if !default_threshold.is_finite() || default_threshold < 0.0 {
            bail!("default threshold must be >= 0, got {default_threshold}");
        }

        let data_dir = data_dir_override.or_else(|| {
            cfg.data.dir.as_ref().map(|d| {
                if d.is_relative() {
                    config_dir
                        .as_ref()
                        .map(|c| c.join(d))
                        .unwrap_or_else(|| d.clone())
                } else {
                    d.clone()
                }
            })
        });

        Ok(PipelineConfig {
            config_path,
            translator,
            romanizer,
            default_threshold,
            strategy,
            data_dir,
        })
    }

    pub fn build_mixer(&self, progress: &ConsoleProgress) -> anyhow::Result<Mixer> {
        let lexicon = match self.data_dir.as_deref() {
            Some(dir) => {
                let lex = Lexicon::load_dir(dir)
                    .with_context(|| format!("load lexicon: {}", dir.display()))?;
                progress.info(format!(
                    "Lexicon: {} words from {}",
                    lex.len(),
                    dir.display()
                ));
                lex
            }
            None => {
                let lex = Lexicon::builtin();
                progress.info(format!("Lexicon: builtin starter set ({} words)", lex.len()));
                lex
            }
        };

        let translator: Arc<dyn Translator> = match &self.translator {
            TranslatorChoice::LibreTranslate { endpoint, api_key } => {
                progress.info(format!("Translator: libretranslate at {endpoint}"));
                Arc::new(LibreTranslateClient::new(endpoint.clone(), api_key.clone()))
            }
            TranslatorChoice::IndicService { endpoint } => {
                progress.info(format!("Translator: indictrans2 at {endpoint}"));
                Arc::new(IndicServiceClient::new(endpoint.clone()))
            }
        };

        let romanizer: Arc<dyn Romanizer> = match &self.romanizer {
            RomanizerChoice::Builtin => Arc::new(BuiltinRomanizer::new()),
            RomanizerChoice::Service { endpoint } => {
                progress.info(format!("Romanizer: service at {endpoint}"));
                Arc::new(HttpRomanizer::new(endpoint.clone()))
            }
        };

        Ok(Mixer::new(translator, romanizer, Arc::new(lexicon))
            .with_default_threshold(self.default_threshold)
            .with_strategy(self.strategy))
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::fs;

    #[test]
    fn resolves_from_config_file() {
        let dir = tempfile::tempdir().expect("tempdir");
        let path = dir.path().join("xglish.toml");
        fs::write(
            &path,
            r#"
[pipeline]
translation_backend = "indictrans2"
restore_strategy = "align"
default_threshold = 4.5

[backends.indictrans2]
endpoint = "http://example:9000/translate"
"#,
        )
        .expect("write config");

        let cfg = PipelineConfig::resolve(Some(path), None, None, None, None).expect("resolve");
        assert!(matches!(
            &cfg.translator,
            TranslatorChoice::IndicService { endpoint } if endpoint == "http://example:9000/translate"
        ));
        assert_eq!(cfg.strategy, RestoreStrategy::Align);
        assert_eq!(cfg.default_threshold, 4.5);
    }

    #[test]
    fn cli_overrides_win() {
        let dir = tempfile::tempdir().expect("tempdir");
        let path = dir.path().join("xglish.toml");
        fs::write(&path, "[pipeline]\ntranslation_backend = \"indictrans2\"\n")
            .expect("write config");

        let cfg = PipelineConfig::resolve(
            Some(path),
            Some("libretranslate".to_string()),
            Some("mask".to_string()),
            Some(2.0),
            None,
        )
        .expect("resolve");
        assert!(matches!(cfg.translator, TranslatorChoice::LibreTranslate { .. }));
        assert_eq!(cfg.default_threshold, 2.0);
    }

    #[test]
    fn unknown_backend_is_rejected() {
        let dir = tempfile::tempdir().expect("tempdir");
        let path = dir.path().join("xglish.toml");
        fs::write(&path, "[pipeline]\ntranslation_backend = \"argos\"\n").expect("write config");
        assert!(PipelineConfig::resolve(Some(path), None, None, None, None).is_err());
    }
}
