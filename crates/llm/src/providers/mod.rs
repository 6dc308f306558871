pub mod gemini;
pub mod groq;

use gist_core::config::LlmConfig;

use crate::provider::{LlmError, LlmProvider};

/// Resolve the effective provider name, honouring "auto" (first provider
/// with an API key wins: groq, then gemini).
pub fn resolve_provider(config: &LlmConfig) -> Result<&'static str, LlmError> {
    match config.provider.as_str() {
        "groq" => Ok("groq"),
        "gemini" => Ok("gemini"),
        "auto" => {
            if config.groq_api_key.is_some() {
                Ok("groq")
            } else if config.gemini_api_key.is_some() {
                Ok("gemini")
            } else {
                Err(LlmError::NotConfigured(
                    "no API key found — set GROQ_API_KEY or GOOGLE_API_KEY".into(),
                ))
            }
        }
        other => Err(LlmError::NotConfigured(format!(
            "unknown LLM provider: '{}'",
            other
        ))),
    }
}

/// Default model per provider and processing mode.
pub fn default_model(provider: &str, mode: &str) -> &'static str {
    match (provider, mode) {
        ("groq", "fast") => "llama-3.1-8b-instant",
        ("groq", _) => "llama-3.1-70b-versatile",
        ("gemini", "accurate") => "gemini-1.5-pro",
        ("gemini", _) => "gemini-1.5-flash",
        _ => "llama-3.1-70b-versatile",
    }
}

/// Resolve the effective model: explicit override beats the mode table.
pub fn resolve_model(config: &LlmConfig, provider: &str) -> String {
    let explicit = match provider {
        "groq" => config.groq_model.as_deref(),
        "gemini" => config.gemini_model.as_deref(),
        _ => None,
    };
    explicit
        .map(str::to_string)
        .unwrap_or_else(|| default_model(provider, &config.mode).to_string())
}

/// Create the appropriate LLM provider based on config.
pub fn create_provider(config: &LlmConfig) -> Result<Box<dyn LlmProvider>, LlmError> {
    let provider = resolve_provider(config)?;
    let model = resolve_model(config, provider);
    match provider {
        "groq" => {
            let api_key = config
                .groq_api_key
                .as_ref()
                .ok_or_else(|| LlmError::NotConfigured("GROQ_API_KEY not set".into()))?;
            Ok(Box::new(groq::GroqProvider::new(api_key.clone(), model)))
        }
        "gemini" => {
            let api_key = config
                .gemini_api_key
                .as_ref()
                .ok_or_else(|| LlmError::NotConfigured("GOOGLE_API_KEY not set".into()))?;
            Ok(Box::new(gemini::GeminiProvider::new(api_key.clone(), model)))
        }
        _ => unreachable!("resolve_provider returned an unknown name"),
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn config(groq: Option<&str>, gemini: Option<&str>) -> LlmConfig {
        LlmConfig {
            provider: "auto".into(),
            mode: "balanced".into(),
            groq_api_key: groq.map(Into::into),
            groq_model: None,
            gemini_api_key: gemini.map(Into::into),
            gemini_model: None,
            temperature: 0.3,
            max_tokens: 4000,
        }
    }

    #[test]
    fn auto_prefers_groq() {
        let cfg = config(Some("gk"), Some("gm"));
        assert_eq!(resolve_provider(&cfg).unwrap(), "groq");
    }

    #[test]
    fn auto_falls_back_to_gemini() {
        let cfg = config(None, Some("gm"));
        assert_eq!(resolve_provider(&cfg).unwrap(), "gemini");
    }

    #[test]
    fn auto_without_keys_is_a_configuration_error() {
        let cfg = config(None, None);
        assert!(matches!(
            resolve_provider(&cfg),
            Err(LlmError::NotConfigured(_))
        ));
    }

    #[test]
    fn unknown_provider_is_rejected() {
        let mut cfg = config(Some("gk"), None);
        cfg.provider = "claude".into();
        assert!(matches!(
            resolve_provider(&cfg),
            Err(LlmError::NotConfigured(_))
        ));
    }

    #[test]
    fn mode_maps_to_model() {
        assert_eq!(default_model("groq", "fast"), "llama-3.1-8b-instant");
        assert_eq!(default_model("groq", "balanced"), "llama-3.1-70b-versatile");
        assert_eq!(default_model("gemini", "accurate"), "gemini-1.5-pro");
        assert_eq!(default_model("gemini", "fast"), "gemini-1.5-flash");
    }

    #[test]
    fn explicit_model_overrides_mode_table() {
        let mut cfg = config(Some("gk"), None);
        cfg.groq_model = Some("custom-model".into());
        assert_eq!(resolve_model(&cfg, "groq"), "custom-model");
    }
}
