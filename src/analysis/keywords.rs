use super::classify::{ClassifiedRow, Sentiment};
use super::markup::strip_markup;
use std::collections::HashMap;

/// Stopwords for report-title extraction: generic filler plus the workplace
/// vocabulary ("great", "good", "issues", …) that would otherwise dominate
/// every review. Used with a two-character length floor.
const REPORT_TITLE_STOPWORDS: &[&str] = &[
    "and", "the", "for", "with", "are", "not", "but", "all", "was", "were", "very", "just",
    "really", "have", "has", "had", "you", "your", "our", "their", "this", "that", "those",
    "these", "none", "n/a", "na", "yes", "out", "too", "they", "i", "we", "on", "in", "of", "to",
    "at", "from", "great", "good", "excellent", "amazing", "awesome", "nice", "supportive",
    "friendly", "helpful", "long", "lack", "job", "work", "company", "many", "some", "one",
    "well", "lot", "lots", "make", "makes", "there", "its", "etc", "employees", "employee",
    "minor", "issue", "issues", "problem", "problems", "sometimes", "often", "better", "major",
    "could", "working", "lacking", "high", "low", "inadequate", "more", "less", "bad", "poor",
    "unfortunately",
];

/// Stopwords for key-theme extraction: conjunctions, transitions, pronouns
/// and other common words, without the workplace vocabulary. Used with no
/// length floor over a ranked candidate pool.
const KEY_THEME_STOPWORDS: &[&str] = &[
    "and", "the", "for", "with", "are", "not", "but", "all", "was", "were", "have", "has", "had",
    "this", "that", "those", "these", "from", "too", "out", "they", "you", "your", "our", "their",
    "about", "into", "over", "under", "few", "many", "most", "other", "some", "any", "each",
    "much", "more", "well", "lot", "lots", "make", "makes", "very", "just", "really", "every",
    "also", "can", "could", "would", "should", "use", "used", "work", "working",
];

const PUNCTUATION: &[char] = &[
    '!', '"', '#', '$', '%', '&', '\'', '(', ')', '*', '+', ',', '-', '.', '/', ':', ';', '<',
    '=', '>', '?', '@', '[', '\\', ']', '^', '_', '`', '{', '|', '}', '~',
];

/// A named token-filter policy. The two policies below differ in stopword
/// set, length floor, and whether ranking happens before or after filtering;
/// unifying them changes which themes a report shows.
#[derive(Debug, Clone, Copy)]
pub struct KeywordFilter {
    stopwords: &'static [&'static str],
    min_token_chars: usize,
    /// When set, rank the full token stream first, keep this many candidates,
    /// then filter. When absent, filter first and rank the survivors.
    candidate_pool: Option<usize>,
}

pub const REPORT_TITLE_FILTER: KeywordFilter = KeywordFilter {
    stopwords: REPORT_TITLE_STOPWORDS,
    min_token_chars: 3,
    candidate_pool: None,
};

pub const KEY_THEME_FILTER: KeywordFilter = KeywordFilter {
    stopwords: KEY_THEME_STOPWORDS,
    min_token_chars: 1,
    candidate_pool: Some(200),
};

impl KeywordFilter {
    fn passes(&self, token: &str) -> bool {
        !token.is_empty()
            && token.chars().all(char::is_alphabetic)
            && token.chars().count() >= self.min_token_chars
            && !self.stopwords.contains(&token)
    }
}

/// Top `limit` distinct keywords of `text` under `filter`, ranked by
/// frequency with ties broken by first occurrence.
pub fn top_keywords(text: &str, filter: &KeywordFilter, limit: usize) -> Vec<String> {
    let tokens = tokenize(text);

    match filter.candidate_pool {
        None => {
            let survivors: Vec<&str> = tokens
                .iter()
                .map(String::as_str)
                .filter(|token| filter.passes(token))
                .collect();
            rank_by_frequency(&survivors)
                .into_iter()
                .take(limit)
                .collect()
        }
        Some(pool) => {
            let all: Vec<&str> = tokens.iter().map(String::as_str).collect();
            rank_by_frequency(&all)
                .into_iter()
                .take(pool)
                .filter(|token| filter.passes(token))
                .take(limit)
                .collect()
        }
    }
}

/// All pros text, plus comment text of rows classified Positive.
pub fn favorable_blob(rows: &[ClassifiedRow]) -> String {
    let mut parts: Vec<&str> = rows
        .iter()
        .map(|row| row.pros.as_str())
        .filter(|text| !text.is_empty())
        .collect();
    parts.extend(
        rows.iter()
            .filter(|row| row.sentiment == Sentiment::Positive)
            .map(|row| row.comment.as_str())
            .filter(|text| !text.is_empty()),
    );
    parts.join(" ")
}

/// All cons text, plus comment text of rows classified Negative.
pub fn unfavorable_blob(rows: &[ClassifiedRow]) -> String {
    let mut parts: Vec<&str> = rows
        .iter()
        .map(|row| row.cons.as_str())
        .filter(|text| !text.is_empty())
        .collect();
    parts.extend(
        rows.iter()
            .filter(|row| row.sentiment == Sentiment::Negative)
            .map(|row| row.comment.as_str())
            .filter(|text| !text.is_empty()),
    );
    parts.join(" ")
}

fn tokenize(text: &str) -> Vec<String> {
    strip_markup(text)
        .to_lowercase()
        .replace(PUNCTUATION, "")
        .split_whitespace()
        .map(str::to_string)
        .collect()
}

fn rank_by_frequency(tokens: &[&str]) -> Vec<String> {
    let mut first_seen: Vec<&str> = Vec::new();
    let mut stats: HashMap<&str, (usize, usize)> = HashMap::new();

    for &token in tokens {
        let entry = stats.entry(token).or_insert_with(|| {
            first_seen.push(token);
            (0, first_seen.len() - 1)
        });
        entry.0 += 1;
    }

    let mut ranked: Vec<(&str, usize, usize)> = stats
        .into_iter()
        .map(|(token, (count, first))| (token, count, first))
        .collect();
    ranked.sort_by(|a, b| b.1.cmp(&a.1).then(a.2.cmp(&b.2)));
    ranked.into_iter().map(|(token, _, _)| token.to_string()).collect()
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn report_title_filter_drops_workplace_filler() {
        let keywords = top_keywords("great team great team", &REPORT_TITLE_FILTER, 5);
        assert_eq!(keywords, ["team"]);
    }

    #[test]
    fn key_theme_filter_keeps_short_and_generic_workplace_words() {
        // "great" is only a stopword in the report-title set, and the
        // key-theme path has no length floor.
        let keywords = top_keywords("great hr great hr pay", &KEY_THEME_FILTER, 5);
        assert_eq!(keywords, ["great", "hr", "pay"]);

        let keywords = top_keywords("great hr great hr pay", &REPORT_TITLE_FILTER, 5);
        assert_eq!(keywords, ["pay"]);
    }

    #[test]
    fn frequency_ranking_breaks_ties_by_first_occurrence() {
        let keywords = top_keywords(
            "salary culture salary culture benefits",
            &REPORT_TITLE_FILTER,
            5,
        );
        assert_eq!(keywords, ["salary", "culture", "benefits"]);
    }

    #[test]
    fn extraction_is_idempotent() {
        let text = "flexible hours flexible pay management communication pay";
        let first = top_keywords(text, &REPORT_TITLE_FILTER, 5);
        let second = top_keywords(text, &REPORT_TITLE_FILTER, 5);
        assert_eq!(first, second);
    }

    #[test]
    fn punctuation_and_markup_are_removed_before_tokenizing() {
        let keywords = top_keywords("<b>salary!</b> salary, (salary)", &REPORT_TITLE_FILTER, 5);
        assert_eq!(keywords, ["salary"]);
    }

    #[test]
    fn numeric_tokens_are_never_keywords() {
        let keywords = top_keywords("2020 2020 2020 salary salary", &REPORT_TITLE_FILTER, 5);
        assert_eq!(keywords, ["salary"]);
    }

    #[test]
    fn limit_caps_output_at_five() {
        let text = "alpha beta gamma delta epsilon zeta alpha beta gamma delta epsilon zeta";
        let keywords = top_keywords(text, &REPORT_TITLE_FILTER, 5);
        assert_eq!(keywords.len(), 5);
        assert_eq!(keywords, ["alpha", "beta", "gamma", "delta", "epsilon"]);
    }
}
