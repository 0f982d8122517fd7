use super::classify::{ClassifiedRow, Sentiment};
use serde::Serialize;

/// Counts per sentiment label, zero-filled so all three labels are always
/// present, plus percentages of this summary's own total.
#[derive(Debug, Clone, Default, PartialEq, Serialize)]
pub struct SentimentSummary {
    pub counts: SentimentCounts,
    pub percentages: SentimentShares,
    pub total: usize,
}

#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize)]
pub struct SentimentCounts {
    pub positive: usize,
    pub neutral: usize,
    pub negative: usize,
}

#[derive(Debug, Clone, Copy, Default, PartialEq, Serialize)]
pub struct SentimentShares {
    pub positive: f64,
    pub neutral: f64,
    pub negative: f64,
}

impl SentimentSummary {
    pub fn from_rows(rows: &[ClassifiedRow]) -> Self {
        Self::from_sentiments(rows.iter().map(|row| row.sentiment))
    }

    pub fn from_sentiments(sentiments: impl IntoIterator<Item = Sentiment>) -> Self {
        let mut counts = SentimentCounts::default();
        let mut total = 0usize;
        for sentiment in sentiments {
            total += 1;
            match sentiment {
                Sentiment::Positive => counts.positive += 1,
                Sentiment::Neutral => counts.neutral += 1,
                Sentiment::Negative => counts.negative += 1,
            }
        }

        let share = |count: usize| {
            if total == 0 {
                0.0
            } else {
                count as f64 / total as f64 * 100.0
            }
        };

        Self {
            percentages: SentimentShares {
                positive: share(counts.positive),
                neutral: share(counts.neutral),
                negative: share(counts.negative),
            },
            counts,
            total,
        }
    }

    pub fn count(&self, sentiment: Sentiment) -> usize {
        match sentiment {
            Sentiment::Positive => self.counts.positive,
            Sentiment::Neutral => self.counts.neutral,
            Sentiment::Negative => self.counts.negative,
        }
    }

    pub fn percentage(&self, sentiment: Sentiment) -> f64 {
        match sentiment {
            Sentiment::Positive => self.percentages.positive,
            Sentiment::Neutral => self.percentages.neutral,
            Sentiment::Negative => self.percentages.negative,
        }
    }
}

/// Sentiment distribution of one observed group (a department or a tenure
/// bucket). Groups only exist for values that occur in the data, so a group
/// total is never zero.
#[derive(Debug, Clone, Serialize)]
pub struct GroupBreakdown {
    pub key: String,
    pub summary: SentimentSummary,
}

/// Partition rows by department, in first-occurrence order.
pub fn by_department(rows: &[ClassifiedRow]) -> Vec<GroupBreakdown> {
    group_by(rows, |row| row.department.as_str())
}

/// Partition rows by employment bucket, in first-occurrence order.
pub fn by_status(rows: &[ClassifiedRow]) -> Vec<GroupBreakdown> {
    group_by(rows, |row| row.employment.label())
}

fn group_by<'a>(
    rows: &'a [ClassifiedRow],
    key_of: impl Fn(&'a ClassifiedRow) -> &'a str,
) -> Vec<GroupBreakdown> {
    let mut keys: Vec<&str> = Vec::new();
    let mut members: Vec<Vec<Sentiment>> = Vec::new();

    for row in rows {
        let key = key_of(row);
        match keys.iter().position(|known| *known == key) {
            Some(index) => members[index].push(row.sentiment),
            None => {
                keys.push(key);
                members.push(vec![row.sentiment]);
            }
        }
    }

    keys.into_iter()
        .zip(members)
        .map(|(key, sentiments)| GroupBreakdown {
            key: key.to_string(),
            summary: SentimentSummary::from_sentiments(sentiments),
        })
        .collect()
}

/// Lexically sorted copy for presentation layers that want stable display
/// order instead of first-occurrence order.
pub fn sorted_for_display(groups: &[GroupBreakdown]) -> Vec<GroupBreakdown> {
    let mut sorted = groups.to_vec();
    sorted.sort_by(|a, b| a.key.cmp(&b.key));
    sorted
}
