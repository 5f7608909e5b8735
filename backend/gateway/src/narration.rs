//! Section narration: one TTS call per section, run concurrently.
//!
//! Every section gets its own task in a [`JoinSet`]. A [`Semaphore`] caps how
//! many synthesize at once and each call is bounded by a timeout. Tasks return
//! their section index so results land in document order however they finish.
//! A failed, timed-out or panicked task only marks its own section.

use std::sync::Arc;
use std::time::Duration;

use media::MediaStore;
use soilcast_core::{NarratedSection, Result, Section, SoilcastError};
use soilcast_tts::{TtsProvider, TtsRequest};
use tokio::sync::Semaphore;
use tokio::task::JoinSet;
use tracing::{debug, error, info, warn};

/// Reason recorded for sections that have nothing to say.
pub const NO_SPEAKABLE_TEXT: &str = "no speakable text";

#[derive(Debug, Clone, Copy)]
pub struct NarrationOptions {
    /// Sections synthesized at the same time.
    pub max_concurrency: usize,
    /// Upper bound for a single section's synthesis.
    pub timeout: Duration,
}

impl Default for NarrationOptions {
    fn default() -> Self {
        Self {
            max_concurrency: 4,
            timeout: Duration::from_secs(30),
        }
    }
}

/// One request's narration job.
pub struct Narration {
    pub tts: Arc<dyn TtsProvider>,
    pub store: MediaStore,
    pub options: NarrationOptions,
    /// Two-letter language code handed to the TTS provider.
    pub language_code: String,
    /// Audio files are named `<file_prefix>_part_<i>.<ext>`.
    pub file_prefix: String,
}

impl Narration {
    /// Narrates every section and returns them in their original order.
    pub async fn run(self, sections: Vec<Section>) -> Vec<NarratedSection> {
        let semaphore = Arc::new(Semaphore::new(self.options.max_concurrency.max(1)));
        let extension = self.tts.output_format().extension();
        let mut slots: Vec<Option<Result<String, String>>> = vec![None; sections.len()];
        let mut tasks = JoinSet::new();

        for (index, section) in sections.iter().enumerate() {
            if section.content.trim().is_empty() {
                slots[index] = Some(Err(NO_SPEAKABLE_TEXT.to_string()));
                continue;
            }

            let tts = Arc::clone(&self.tts);
            let store = self.store.clone();
            let semaphore = Arc::clone(&semaphore);
            let request = TtsRequest::new(section.content.clone(), self.language_code.clone());
            let filename = format!("{}_part_{index}.{extension}", self.file_prefix);
            let timeout = self.options.timeout;

            tasks.spawn(async move {
                let outcome = narrate_one(
                    tts.as_ref(),
                    &store,
                    &semaphore,
                    request,
                    &filename,
                    timeout,
                )
                .await;
                (index, outcome)
            });
        }

        while let Some(joined) = tasks.join_next().await {
            match joined {
                Ok((index, Ok(url))) => {
                    debug!(index, url = %url, "Section narrated");
                    slots[index] = Some(Ok(url));
                }
                Ok((index, Err(e))) => {
                    let reason = logging::redact_sensitive_data(&e.to_string());
                    warn!(index, error = %reason, "Section narration failed");
                    slots[index] = Some(Err(reason));
                }
                // The slot stays empty and is reported as failed below.
                Err(e) => error!(error = %e, "Narration task aborted"),
            }
        }

        let narrated: Vec<NarratedSection> = sections
            .into_iter()
            .zip(slots)
            .map(|(section, slot)| match slot {
                Some(Ok(url)) => NarratedSection::with_audio(section, url),
                Some(Err(reason)) => NarratedSection::without_audio(section, reason),
                None => NarratedSection::without_audio(section, "narration task aborted"),
            })
            .collect();

        let failed = narrated.iter().filter(|s| s.audio_failed).count();
        info!(sections = narrated.len(), failed, "Narration finished");
        narrated
    }
}

async fn narrate_one(
    tts: &dyn TtsProvider,
    store: &MediaStore,
    semaphore: &Semaphore,
    request: TtsRequest,
    filename: &str,
    timeout: Duration,
) -> Result<String> {
    let _permit = semaphore
        .acquire()
        .await
        .map_err(|e| SoilcastError::AudioGeneration(e.to_string()))?;

    let bytes = tokio::time::timeout(timeout, tts.synthesize(request))
        .await
        .map_err(|_| {
            SoilcastError::AudioGeneration(format!("timed out after {}s", timeout.as_secs_f32()))
        })?
        .map_err(|e| SoilcastError::AudioGeneration(format!("{e:#}")))?;

    if bytes.is_empty() {
        return Err(SoilcastError::AudioGeneration("provider returned no audio".into()));
    }
    store.save_audio(filename, &bytes).await
}
