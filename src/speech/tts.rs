// file: src/speech/tts.rs
// description: text-to-speech over the translate_tts endpoint and mirrored audio trees
// reference: gtts request shape (ie, q, tl, client, ttsspeed)

use crate::error::{PipelineError, Result};
use crate::pipeline::progress::{ProgressSink, percent};
use crate::utils::Validator;
use async_trait::async_trait;
use reqwest::Client;
use std::fs;
use std::path::{Path, PathBuf};
use std::time::Duration;
use tracing::{debug, info, warn};
use walkdir::WalkDir;

/// Longest text the endpoint accepts per request.
pub const MAX_PIECE_CHARS: usize = 100;

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct VoiceConfig {
    pub lang: String,
    pub slow: bool,
}

impl Default for VoiceConfig {
    fn default() -> Self {
        Self {
            lang: "en".to_string(),
            slow: false,
        }
    }
}

#[async_trait]
pub trait SpeechSynthesizer: Send + Sync {
    async fn synthesize(&self, text: &str, voice: &VoiceConfig) -> Result<Vec<u8>>;
}

pub struct GoogleTranslateTts {
    client: Client,
    endpoint: String,
}

impl GoogleTranslateTts {
    pub fn new(endpoint: impl Into<String>, timeout: Duration) -> Result<Self> {
        let client = Client::builder()
            .timeout(timeout)
            .user_agent("Mozilla/5.0 (resume_qna)")
            .build()?;

        Ok(Self {
            client,
            endpoint: endpoint.into(),
        })
    }

    async fn fetch_piece(&self, piece: &str, voice: &VoiceConfig) -> Result<Vec<u8>> {
        let speed = if voice.slow { "0.3" } else { "1" };
        let response = self
            .client
            .get(&self.endpoint)
            .query(&[
                ("ie", "UTF-8"),
                ("q", piece),
                ("tl", voice.lang.as_str()),
                ("client", "tw-ob"),
                ("ttsspeed", speed),
            ])
            .send()
            .await?;

        if !response.status().is_success() {
            return Err(PipelineError::Speech(format!(
                "TTS request failed with status {}",
                response.status()
            )));
        }

        Ok(response.bytes().await?.to_vec())
    }
}

#[async_trait]
impl SpeechSynthesizer for GoogleTranslateTts {
    async fn synthesize(&self, text: &str, voice: &VoiceConfig) -> Result<Vec<u8>> {
        let pieces = split_for_speech(text, MAX_PIECE_CHARS);
        if pieces.is_empty() {
            return Err(PipelineError::Speech("nothing to speak".to_string()));
        }

        debug!("Synthesizing {} piece(s)", pieces.len());

        let mut audio = Vec::new();
        for piece in &pieces {
            audio.extend(self.fetch_piece(piece, voice).await?);
        }
        Ok(audio)
    }
}

/// Packs whitespace-separated words into pieces of at most `max_chars`
/// characters; words longer than the bound are split.
pub fn split_for_speech(text: &str, max_chars: usize) -> Vec<String> {
    let max_chars = max_chars.max(1);
    let mut pieces = Vec::new();
    let mut current = String::new();
    let mut current_len = 0;

    for word in text.split_whitespace() {
        let word_chars: Vec<char> = word.chars().collect();

        for part in word_chars.chunks(max_chars) {
            let part_len = part.len();
            let needed = if current_len == 0 { part_len } else { current_len + 1 + part_len };

            if needed > max_chars && current_len > 0 {
                pieces.push(std::mem::take(&mut current));
                current_len = 0;
            }
            if current_len > 0 {
                current.push(' ');
                current_len += 1;
            }
            current.extend(part);
            current_len += part_len;
        }
    }

    if !current.is_empty() {
        pieces.push(current);
    }
    pieces
}

/// Converts every `.txt` under `text_root` into a mirrored `.mp3` under
/// `audio_root`. Files that fail synthesis are skipped; I/O errors abort.
/// The stop predicate is checked before each file. Returns the written
/// audio paths.
pub async fn synthesize_tree(
    text_root: &Path,
    audio_root: &Path,
    synthesizer: &dyn SpeechSynthesizer,
    voice: &VoiceConfig,
    progress: Option<&dyn ProgressSink>,
    stop: Option<&dyn Fn() -> bool>,
) -> Result<Vec<PathBuf>> {
    Validator::validate_directory(text_root)?;

    let mut text_files: Vec<PathBuf> = WalkDir::new(text_root)
        .follow_links(false)
        .into_iter()
        .filter_map(|e| e.ok())
        .filter(|e| e.file_type().is_file())
        .map(|e| e.into_path())
        .filter(|p| p.extension().is_some_and(|x| x == "txt"))
        .collect();
    text_files.sort();

    let total = text_files.len();
    let mut written = Vec::new();
    info!("Converting {} text file(s) to audio", total);

    for (index, text_path) in text_files.iter().enumerate() {
        if stop.is_some_and(|should_stop| should_stop()) {
            warn!(
                "Stop requested; audio ends after {}/{} file(s)",
                index, total
            );
            break;
        }

        let relative = text_path.strip_prefix(text_root).unwrap_or(text_path);
        let audio_path = audio_root.join(relative).with_extension("mp3");

        let content = fs::read_to_string(text_path)
            .map_err(|e| PipelineError::file_operation(text_path, e))?;

        if content.trim().is_empty() {
            warn!("Skipping empty text file {}", relative.display());
        } else {
            match synthesizer.synthesize(&content, voice).await {
                Ok(audio) => {
                    if let Some(parent) = audio_path.parent() {
                        fs::create_dir_all(parent)
                            .map_err(|e| PipelineError::file_operation(parent, e))?;
                    }
                    fs::write(&audio_path, &audio)
                        .map_err(|e| PipelineError::file_operation(&audio_path, e))?;
                    debug!("Wrote {} ({} bytes)", audio_path.display(), audio.len());
                    written.push(audio_path);
                }
                Err(e) => warn!("Skipping audio for {}: {}", relative.display(), e),
            }
        }

        if let Some(sink) = progress {
            sink.report(percent(index + 1, total));
        }
    }

    if total == 0
        && let Some(sink) = progress
    {
        sink.report(100);
    }

    Ok(written)
}
