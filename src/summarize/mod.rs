mod gemini;
mod offline;

pub use gemini::GeminiClient;
pub use offline::OfflineSummarizer;

/// External text-generation collaborator. The engine treats it as a pure
/// `prompt -> text` function and owns no retry or fallback behavior beyond
/// the structural "no keywords" case handled upstream.
pub trait Summarizer {
    fn summarize(&self, prompt: &str) -> Result<String, SummarizerError>;
}

impl<T: Summarizer + ?Sized> Summarizer for &T {
    fn summarize(&self, prompt: &str) -> Result<String, SummarizerError> {
        (**self).summarize(prompt)
    }
}

impl<T: Summarizer + ?Sized> Summarizer for std::sync::Arc<T> {
    fn summarize(&self, prompt: &str) -> Result<String, SummarizerError> {
        (**self).summarize(prompt)
    }
}

#[derive(Debug, thiserror::Error)]
pub enum SummarizerError {
    #[error("summarization request failed: {0}")]
    Transport(#[from] reqwest::Error),
    #[error("summarization service returned status {status}: {message}")]
    Api { status: u16, message: String },
    #[error("summarization service returned no text")]
    EmptyResponse,
}
