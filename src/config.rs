// file: src/config.rs
// description: application configuration management with toml support
// reference: https://docs.rs/config

use crate::error::{PipelineError, Result};
use crate::speech::VoiceConfig;
use dotenvy::dotenv;
use serde::{Deserialize, Serialize};
use std::path::{Path, PathBuf};

#[derive(Debug, Clone, Deserialize, Serialize)]
pub struct Config {
    pub llm: LlmConfig,
    pub generation: GenerationConfig,
    pub output: OutputConfig,
    pub speech: SpeechConfig,
}

#[derive(Debug, Clone, Deserialize, Serialize)]
pub struct LlmConfig {
    pub base_url: String,
    #[serde(default)]
    pub api_key: Option<String>,
    /// Tried in order; the next model is used when a call fails.
    pub models: Vec<String>,
    pub temperature: f32,
    pub max_tokens: u32,
    pub timeout_secs: u64,
}

#[derive(Debug, Clone, Deserialize, Serialize)]
pub struct GenerationConfig {
    pub long_questions: usize,
    pub short_questions: usize,
    pub max_attempts: u32,
    pub max_chunk_chars: usize,
    #[serde(default)]
    pub max_topics: Option<usize>,
    pub write_json: bool,
}

#[derive(Debug, Clone, Deserialize, Serialize)]
pub struct OutputConfig {
    pub text_dir: PathBuf,
    pub audio_dir: PathBuf,
    pub archive_dir: PathBuf,
    pub text_archive: String,
    pub audio_archive: String,
    pub combined_archive: String,
    pub clean_before_run: bool,
}

#[derive(Debug, Clone, Deserialize, Serialize)]
pub struct SpeechConfig {
    pub enabled: bool,
    pub endpoint: String,
    pub lang: String,
    pub slow: bool,
    pub timeout_secs: u64,
}

impl SpeechConfig {
    pub fn voice(&self) -> VoiceConfig {
        VoiceConfig {
            lang: self.lang.clone(),
            slow: self.slow,
        }
    }
}

impl OutputConfig {
    pub fn text_archive_path(&self) -> PathBuf {
        self.archive_dir.join(&self.text_archive)
    }

    pub fn audio_archive_path(&self) -> PathBuf {
        self.archive_dir.join(&self.audio_archive)
    }

    pub fn combined_archive_path(&self) -> PathBuf {
        self.archive_dir.join(&self.combined_archive)
    }
}

pub const DEFAULT_CONFIG_PATH: &str = "config/default.toml";

impl Config {
    /// Layers built-in defaults, then the TOML file, then `RESUME_QNA__*`
    /// environment variables. An explicit path must exist; the default path
    /// may be missing.
    pub fn load(path: Option<&Path>) -> Result<Self> {
        match path {
            Some(path) => Self::load_from(path, true),
            None => Self::load_from(Path::new(DEFAULT_CONFIG_PATH), false),
        }
    }

    fn load_from(path: &Path, required: bool) -> Result<Self> {
        dotenv().ok();

        let defaults = config::Config::try_from(&Self::default_config())
            .map_err(|e| PipelineError::Config(e.to_string()))?;

        let builder = config::Config::builder()
            .add_source(defaults)
            .add_source(config::File::from(path).required(required))
            .add_source(
                config::Environment::with_prefix("RESUME_QNA")
                    .separator("__")
                    .try_parsing(true),
            );

        let settings = builder
            .build()
            .map_err(|e| PipelineError::Config(e.to_string()))?;

        let mut config: Config = settings
            .try_deserialize()
            .map_err(|e| PipelineError::Config(e.to_string()))?;

        config.apply_env_fallbacks();
        config.validate()?;
        Ok(config)
    }

    pub fn default_config() -> Self {
        let mut config = Self {
            llm: LlmConfig {
                base_url: "https://api.groq.com/openai/v1".to_string(),
                api_key: None,
                models: vec![
                    "meta-llama/llama-4-scout-17b-16e-instruct".to_string(),
                    "llama-3.3-70b-versatile".to_string(),
                ],
                temperature: 0.2,
                max_tokens: 8192,
                timeout_secs: 120,
            },
            generation: GenerationConfig {
                long_questions: 10,
                short_questions: 10,
                max_attempts: 5,
                max_chunk_chars: 12_000,
                max_topics: None,
                write_json: true,
            },
            output: OutputConfig {
                text_dir: PathBuf::from("output/text"),
                audio_dir: PathBuf::from("output/audio"),
                archive_dir: PathBuf::from("output/archives"),
                text_archive: "interview_qna_texts.zip".to_string(),
                audio_archive: "interview_qna_audio.zip".to_string(),
                combined_archive: "interview_qna_texts_and_audio.zip".to_string(),
                clean_before_run: true,
            },
            speech: SpeechConfig {
                enabled: true,
                endpoint: "https://translate.google.com/translate_tts".to_string(),
                lang: "en".to_string(),
                slow: false,
                timeout_secs: 30,
            },
        };
        config.apply_env_fallbacks();
        config
    }

    fn apply_env_fallbacks(&mut self) {
        if self.llm.api_key.as_deref().is_none_or(str::is_empty) {
            self.llm.api_key = std::env::var("GROQ_API_KEY").ok().filter(|k| !k.is_empty());
        }
    }

    pub fn validate(&self) -> Result<()> {
        if self.llm.models.iter().all(|m| m.trim().is_empty()) {
            return Err(PipelineError::Config(
                "llm.models must name at least one model".to_string(),
            ));
        }

        if self.generation.max_attempts == 0 {
            return Err(PipelineError::Config(
                "max_attempts must be greater than 0".to_string(),
            ));
        }

        if self.generation.max_chunk_chars == 0 {
            return Err(PipelineError::Config(
                "max_chunk_chars must be greater than 0".to_string(),
            ));
        }

        if self.generation.long_questions + self.generation.short_questions == 0 {
            return Err(PipelineError::Config(
                "at least one long or short question must be requested".to_string(),
            ));
        }

        if self.output.text_dir == self.output.audio_dir {
            return Err(PipelineError::Config(
                "text_dir and audio_dir must differ".to_string(),
            ));
        }

        if self.output.archive_dir.starts_with(&self.output.text_dir)
            || self.output.archive_dir.starts_with(&self.output.audio_dir)
        {
            return Err(PipelineError::Config(
                "archive_dir must not live inside text_dir or audio_dir".to_string(),
            ));
        }

        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::fs;
    use tempfile::TempDir;

    #[test]
    fn test_default_config_is_valid() {
        let config = Config::default_config();
        assert!(config.validate().is_ok());
        assert_eq!(config.generation.max_attempts, 5);
        assert_eq!(config.generation.max_chunk_chars, 12_000);
    }

    #[test]
    fn test_rejects_empty_model_list() {
        let mut config = Config::default_config();
        config.llm.models = vec![];
        assert!(config.validate().is_err());
    }

    #[test]
    fn test_rejects_archive_inside_text_dir() {
        let mut config = Config::default_config();
        config.output.archive_dir = config.output.text_dir.join("zips");
        assert!(config.validate().is_err());
    }

    #[test]
    fn test_load_from_toml_file() {
        let temp = TempDir::new().unwrap();
        let path = temp.path().join("settings.toml");
        fs::write(
            &path,
            r#"
[llm]
base_url = "http://localhost:9999/v1"
api_key = "from-file"
models = ["small-model"]
temperature = 0.0
max_tokens = 512
timeout_secs = 5

[generation]
long_questions = 2
short_questions = 3
max_attempts = 4
max_chunk_chars = 100
write_json = false

[output]
text_dir = "out/text"
audio_dir = "out/audio"
archive_dir = "out/zips"
text_archive = "t.zip"
audio_archive = "a.zip"
combined_archive = "b.zip"
clean_before_run = false

[speech]
enabled = false
endpoint = "http://localhost:9999/tts"
lang = "en"
slow = false
timeout_secs = 5
"#,
        )
        .unwrap();

        let config = Config::load(Some(&path)).unwrap();
        assert_eq!(config.llm.models, vec!["small-model".to_string()]);
        assert_eq!(config.llm.api_key.as_deref(), Some("from-file"));
        assert_eq!(config.generation.max_topics, None);
        assert_eq!(config.generation.short_questions, 3);
        assert_eq!(
            config.output.text_archive_path(),
            PathBuf::from("out/zips/t.zip")
        );
    }

    #[test]
    fn test_missing_default_file_still_layers_env() {
        let temp = TempDir::new().unwrap();
        let missing = temp.path().join("absent.toml");
        unsafe { std::env::set_var("RESUME_QNA__GENERATION__MAX_ATTEMPTS", "2") };

        let layered = Config::load_from(&missing, false);
        let required = Config::load(Some(&missing));
        unsafe { std::env::remove_var("RESUME_QNA__GENERATION__MAX_ATTEMPTS") };

        let config = layered.unwrap();
        assert_eq!(config.generation.max_attempts, 2);
        assert_eq!(config.output.text_dir, PathBuf::from("output/text"));
        assert!(required.is_err());
    }

    #[test]
    fn test_api_key_falls_back_to_groq_env() {
        let temp = TempDir::new().unwrap();
        let path = temp.path().join("partial.toml");
        fs::write(&path, "[generation]\nlong_questions = 6\n").unwrap();
        unsafe { std::env::set_var("GROQ_API_KEY", "key-from-env") };

        let loaded = Config::load(Some(&path));
        unsafe { std::env::remove_var("GROQ_API_KEY") };

        let config = loaded.unwrap();
        assert_eq!(config.llm.api_key.as_deref(), Some("key-from-env"));
        assert_eq!(config.generation.long_questions, 6);
        assert_eq!(config.generation.short_questions, 10);
    }
}
