use crate::summarize::{Summarizer, SummarizerError};
use serde::Serialize;

/// Direction of extracted content: favorable ("pros") or unfavorable
/// ("cons"). Drives prompt wording and the fixed fallback sentence.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Polarity {
    Favorable,
    Unfavorable,
}

impl Polarity {
    pub const fn fallback_sentence(self) -> &'static str {
        match self {
            Self::Favorable => "No positive aspects were highlighted.",
            Self::Unfavorable => "No negative aspects were highlighted.",
        }
    }

    fn summary_prompt(self, keywords: &str) -> String {
        match self {
            Self::Favorable => format!(
                "Employees often mention {keywords} as positive aspects of their workplace. \
                 In about 60-70 words, write a detailed paragraph explaining the overall impact \
                 of these strengths on employee wellbeing and workplace culture."
            ),
            Self::Unfavorable => format!(
                "Employees often mention {keywords} as negative aspects of their workplace. \
                 In about 60-70 words, write a detailed paragraph explaining why these concerns \
                 matter and how addressing them would improve employee wellbeing."
            ),
        }
    }

    fn theme_prompt(self, title: &str) -> String {
        match self {
            Self::Favorable => format!(
                "In one sentence (about 25 words), explain why '{title}' benefits employees \
                 and their wellbeing, and how it ties back to the workplace."
            ),
            Self::Unfavorable => format!(
                "In one sentence (about 25 words), explain why '{title}' is a concern for \
                 employees and their wellbeing, and how it ties back to the workplace."
            ),
        }
    }
}

/// One extracted keyword with its generated explanatory sentence.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct Theme {
    pub title: String,
    pub description: String,
}

/// Narrative output for one polarity: the summary paragraph plus up to five
/// keyword themes, in extractor order.
#[derive(Debug, Clone, Serialize)]
pub struct Narrative {
    pub summary: String,
    pub themes: Vec<Theme>,
}

/// Build the narrative for one polarity. An empty keyword list short-circuits
/// to the fixed fallback with zero collaborator calls; collaborator failures
/// propagate unmodified.
pub fn assemble<S: Summarizer>(
    polarity: Polarity,
    keywords: &[String],
    summarizer: &S,
) -> Result<Narrative, SummarizerError> {
    if keywords.is_empty() {
        return Ok(Narrative {
            summary: polarity.fallback_sentence().to_string(),
            themes: Vec::new(),
        });
    }

    let titles: Vec<String> = keywords.iter().map(|word| capitalize(word)).collect();

    let summary = summarizer
        .summarize(&polarity.summary_prompt(&join_with_and(&titles)))?
        .trim()
        .to_string();

    let mut themes = Vec::with_capacity(titles.len());
    for title in titles {
        let description = summarizer.summarize(&polarity.theme_prompt(&title))?;
        themes.push(Theme {
            description: ensure_period(description.trim().to_string()),
            title,
        });
    }

    Ok(Narrative { summary, themes })
}

/// "a", "a and b", or "a, b, and c".
fn join_with_and(items: &[String]) -> String {
    match items {
        [] => String::new(),
        [only] => only.clone(),
        [first, second] => format!("{first} and {second}"),
        [head @ .., last] => format!("{}, and {last}", head.join(", ")),
    }
}

fn capitalize(word: &str) -> String {
    let mut chars = word.chars();
    match chars.next() {
        Some(first) => first.to_uppercase().collect::<String>() + chars.as_str(),
        None => String::new(),
    }
}

fn ensure_period(text: String) -> String {
    if text.is_empty() || text.ends_with('.') {
        text
    } else {
        format!("{text}.")
    }
}
