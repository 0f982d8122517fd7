use super::{Summarizer, SummarizerError};

/// Deterministic stand-in for the generative collaborator. Echoes the
/// leading sentence of the prompt, which carries the extracted keywords.
#[derive(Debug, Clone, Copy, Default)]
pub struct OfflineSummarizer;

impl OfflineSummarizer {
    pub fn new() -> Self {
        Self
    }
}

impl Summarizer for OfflineSummarizer {
    fn summarize(&self, prompt: &str) -> Result<String, SummarizerError> {
        let text = match prompt.find('.') {
            Some(index) => &prompt[..=index],
            None => prompt,
        };
        Ok(text.trim().to_string())
    }
}
