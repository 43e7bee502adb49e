//! Translation collaborators. Full-sentence translation is the load-bearing
//! design choice: the target language's word order (SOV for most of the
//! registry) comes from the translator, never from per-word substitution.
//! Backend selection happens once at startup; the pipeline only sees the
//! trait.

use serde::Deserialize;

use crate::error::{MixError, MixResult, Stage};
use crate::langtab::LangSpec;
use crate::mask::SlotStyle;

pub trait Translator: Send + Sync {
    /// Translates each text independently, preserving input order. One output
    /// per input; anything else is a `Translation` error.
    fn translate_batch(
        &self,
        texts: &[String],
        source: &str,
        target: &LangSpec,
    ) -> MixResult<Vec<String>>;

    /// Slot-token surface this backend passes through reliably.
    fn slot_style(&self) -> SlotStyle;

    fn name(&self) -> &str;
}

fn map_http_err(e: ureq::Error) -> MixError {
    match e {
        ureq::Error::Transport(t) => MixError::UpstreamUnavailable {
            stage: Stage::Translate,
            detail: t.to_string(),
        },
        ureq::Error::Status(code, _) => {
            MixError::Translation(format!("service returned HTTP {code}"))
        }
    }
}

/// LibreTranslate-style JSON API (`POST /translate` with `q`/`source`/
/// `target`). The API is per-text; batch calls loop.
pub struct LibreTranslateClient {
    endpoint: String,
    api_key: Option<String>,
    agent: ureq::Agent,
}

#[derive(Deserialize)]
struct LibreResponse {
    #[serde(rename = "translatedText")]
    translated_text: String,
}

impl LibreTranslateClient {
    pub fn new(endpoint: impl Into<String>, api_key: Option<String>) -> Self {
        Self {
            endpoint: endpoint.into(),
            api_key,
            agent: ureq::Agent::new(),
        }
    }
}

impl Translator for LibreTranslateClient {
    fn translate_batch(
        &self,
        texts: &[String],
        source: &str,
        target: &LangSpec,
    ) -> MixResult<Vec<String>> {
        let mut out = Vec::with_capacity(texts.len());
        for text in texts {
            let mut body = serde_json::json!({
                "q": text,
                "source": source,
                "target": target.code,
                "format": "text",
            });
            if let Some(key) = self.api_key.as_deref() {
                body["api_key"] = serde_json::Value::String(key.to_string());
            }
            let resp = self
                .agent
                .post(&self.endpoint)
                .send_json(body)
                .map_err(map_http_err)?;
            let parsed: LibreResponse = resp
                .into_json()
                .map_err(|e| MixError::Translation(format!("bad service response: {e}")))?;
            out.push(parsed.translated_text);
        }
        Ok(out)
    }

    fn slot_style(&self) -> SlotStyle {
        SlotStyle::Var
    }

    fn name(&self) -> &str {
        "libretranslate"
    }
}

/// IndicTrans2-style inference service speaking FLORES-200 codes and real
/// batches.
pub struct IndicServiceClient {
    endpoint: String,
    agent: ureq::Agent,
}

#[derive(Deserialize)]
struct IndicResponse {
    translations: Vec<String>,
}

impl IndicServiceClient {
    pub fn new(endpoint: impl Into<String>) -> Self {
        Self {
            endpoint: endpoint.into(),
            agent: ureq::Agent::new(),
        }
    }
}

impl Translator for IndicServiceClient {
    fn translate_batch(
        &self,
        texts: &[String],
        source: &str,
        target: &LangSpec,
    ) -> MixResult<Vec<String>> {
        let src_flores = match source {
            "en" => "eng_Latn",
            other => {
                return Err(MixError::Translation(format!(
                    "unsupported language pair: {other} -> {}",
                    target.code
                )))
            }
        };
        let resp = self
            .agent
            .post(&self.endpoint)
            .send_json(serde_json::json!({
                "inputs": texts,
                "src_lang": src_flores,
                "tgt_lang": target.flores,
            }))
            .map_err(map_http_err)?;
        let parsed: IndicResponse = resp
            .into_json()
            .map_err(|e| MixError::Translation(format!("bad service response: {e}")))?;
        if parsed.translations.len() != texts.len() {
            return Err(MixError::Translation(format!(
                "expected {} translations, got {}",
                texts.len(),
                parsed.translations.len()
            )));
        }
        Ok(parsed.translations)
    }

    fn slot_style(&self) -> SlotStyle {
        SlotStyle::Braced
    }

    fn name(&self) -> &str {
        "indictrans2"
    }
}
