//! Google Translate TTS provider.
//!
//! Uses the public `translate_tts` endpoint, which speaks Hindi and Punjabi
//! as well as English. The endpoint only accepts short inputs, so text is
//! split into chunks and the MP3 pieces are concatenated in order.

use anyhow::{bail, Context, Result};
use async_trait::async_trait;
use bytes::{Bytes, BytesMut};
use reqwest::Client;
use tracing::{debug, info};

use crate::engine::{AudioFormat, TtsProvider, TtsRequest};

/// Longest text the endpoint accepts per request, in characters.
pub const MAX_CHUNK_CHARS: usize = 200;

const USER_AGENT: &str = "Mozilla/5.0 (X11; Linux x86_64) AppleWebKit/537.36 (KHTML, like Gecko)";

pub struct GoogleTranslateTts {
    base_url: String,
    client: Client,
}

impl Default for GoogleTranslateTts {
    fn default() -> Self {
        Self::new()
    }
}

impl GoogleTranslateTts {
    pub fn new() -> Self {
        Self {
            base_url: "https://translate.google.com/translate_tts".to_string(),
            client: Client::new(),
        }
    }

    pub fn with_client(mut self, client: Client) -> Self {
        self.client = client;
        self
    }

    async fn fetch_chunk(&self, chunk: &str, lang: &str, idx: usize, total: usize) -> Result<Bytes> {
        let textlen = chunk.chars().count().to_string();
        let idx = idx.to_string();
        let total = total.to_string();
        let resp = self
            .client
            .get(&self.base_url)
            .header(reqwest::header::USER_AGENT, USER_AGENT)
            .query(&[
                ("ie", "UTF-8"),
                ("client", "tw-ob"),
                ("tl", lang),
                ("q", chunk),
                ("idx", idx.as_str()),
                ("total", total.as_str()),
                ("textlen", textlen.as_str()),
            ])
            .send()
            .await
            .context("Google TTS request failed")?;

        if !resp.status().is_success() {
            let status = resp.status();
            bail!("Google TTS error {status} for chunk {idx}/{total}");
        }
        Ok(resp.bytes().await?)
    }
}

#[async_trait]
impl TtsProvider for GoogleTranslateTts {
    async fn synthesize(&self, req: TtsRequest) -> Result<Bytes> {
        let chunks = chunk_text(&req.text, MAX_CHUNK_CHARS);
        if chunks.is_empty() {
            bail!("nothing to synthesize");
        }
        info!(lang = %req.language, chunks = chunks.len(), "[TTS/Google] Synthesizing");

        let mut audio = BytesMut::new();
        for (idx, chunk) in chunks.iter().enumerate() {
            let bytes = self.fetch_chunk(chunk, &req.language, idx, chunks.len()).await?;
            debug!(idx, bytes = bytes.len(), "[TTS/Google] Chunk received");
            audio.extend_from_slice(&bytes);
        }
        Ok(audio.freeze())
    }

    fn output_format(&self) -> AudioFormat {
        AudioFormat::Mp3
    }
}

/// Splits text into pieces of at most `max_chars` characters.
///
/// Words are packed greedily. A chunk is closed early at a sentence end once
/// it is at least half full, so pauses fall on natural boundaries. Words
/// longer than `max_chars` are cut.
pub fn chunk_text(text: &str, max_chars: usize) -> Vec<String> {
    let max_chars = max_chars.max(1);
    let mut chunks = Vec::new();
    let mut current = String::new();
    let mut current_len = 0;

    for word in text.split_whitespace() {
        for piece in split_long_word(word, max_chars) {
            let piece_len = piece.chars().count();
            if current_len > 0 && current_len + 1 + piece_len > max_chars {
                chunks.push(std::mem::take(&mut current));
                current_len = 0;
            }
            if current_len > 0 {
                current.push(' ');
                current_len += 1;
            }
            current.push_str(piece);
            current_len += piece_len;

            if ends_sentence(piece) && current_len * 2 >= max_chars {
                chunks.push(std::mem::take(&mut current));
                current_len = 0;
            }
        }
    }
    if current_len > 0 {
        chunks.push(current);
    }
    chunks
}

fn split_long_word(word: &str, max_chars: usize) -> Vec<&str> {
    let mut pieces = Vec::new();
    let mut start = 0;
    let mut count = 0;
    for (offset, _) in word.char_indices() {
        if count == max_chars {
            pieces.push(&word[start..offset]);
            start = offset;
            count = 0;
        }
        count += 1;
    }
    pieces.push(&word[start..]);
    pieces
}

fn ends_sentence(piece: &str) -> bool {
    // '।' is the Devanagari/Gurmukhi full stop.
    piece.ends_with(['.', '!', '?', '।', ';', ':'])
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn short_text_is_one_chunk() {
        assert_eq!(chunk_text("Sow wheat in November.", 200), vec!["Sow wheat in November."]);
    }

    #[test]
    fn blank_text_has_no_chunks() {
        assert!(chunk_text("  \n\t ", 200).is_empty());
    }

    #[test]
    fn chunks_respect_the_limit_and_keep_every_word() {
        let text = "Apply farmyard manure before sowing. Irrigate lightly after germination \
                    and again at crown root initiation. Watch for yellow rust in cool weather.";
        let chunks = chunk_text(text, 40);
        assert!(chunks.len() > 1);
        for chunk in &chunks {
            assert!(chunk.chars().count() <= 40, "{chunk:?} too long");
        }
        let rejoined = chunks.join(" ");
        let normalized: Vec<_> = text.split_whitespace().collect();
        assert_eq!(rejoined, normalized.join(" "));
    }

    #[test]
    fn breaks_at_sentence_end_when_half_full() {
        let chunks = chunk_text("First sentence here. Second one follows", 30);
        assert_eq!(chunks, vec!["First sentence here.", "Second one follows"]);
    }

    #[test]
    fn long_words_are_cut() {
        let chunks = chunk_text("abcdefghij", 4);
        assert_eq!(chunks, vec!["abcd", "efgh", "ij"]);
    }

    #[test]
    fn counts_characters_not_bytes() {
        // Each Gurmukhi word below is several bytes per character.
        let text = "ਕਣਕ ਦੀ ਬਿਜਾਈ ਨਵੰਬਰ ਵਿੱਚ ਕਰੋ।";
        let chunks = chunk_text(text, 200);
        assert_eq!(chunks.len(), 1);
        assert_eq!(chunks[0], text);
    }
}
