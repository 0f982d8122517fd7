//! The review analysis engine: schema resolution over an arbitrary review
//! spreadsheet, per-row sentiment classification, aggregation by department
//! and tenure, keyword extraction, and narrative assembly through an injected
//! summarization collaborator. Stateless; each call returns a fresh result.

mod aggregate;
mod classify;
mod keywords;
mod markup;
mod narrative;
mod schema;
mod table;

pub use aggregate::{
    sorted_for_display, GroupBreakdown, SentimentCounts, SentimentShares, SentimentSummary,
};
pub use classify::{ClassifiedRow, EmploymentBucket, Sentiment};
pub use keywords::{top_keywords, KeywordFilter, KEY_THEME_FILTER, REPORT_TITLE_FILTER};
pub use markup::strip_markup;
pub use narrative::{Narrative, Polarity, Theme};
pub use schema::{ColumnRole, ColumnRoleMap};
pub use table::ReviewTable;

use crate::summarize::{Summarizer, SummarizerError};
use serde::Serialize;
use std::io::Read;
use std::path::Path;

const THEME_LIMIT: usize = 5;

/// Input table shortcomings that make an invocation impossible. Fatal: no
/// partial result is produced.
#[derive(Debug, thiserror::Error)]
pub enum SchemaError {
    #[error("no rating column")]
    NoRatingColumn,
    #[error("missing text fields")]
    MissingTextColumns,
}

#[derive(Debug, thiserror::Error)]
pub enum AnalysisError {
    #[error("review table cannot be analyzed: {0}")]
    Schema(#[from] SchemaError),
    #[error("failed to read review data: {0}")]
    Io(#[from] std::io::Error),
    #[error("invalid review CSV data: {0}")]
    Csv(#[from] csv::Error),
    #[error("narrative generation failed: {0}")]
    Summarizer(#[from] SummarizerError),
}

/// The engine's sole output, consumed read-only by presentation layers.
#[derive(Debug, Clone, Serialize)]
pub struct AnalysisResult {
    pub overall: SentimentSummary,
    pub departments: Vec<GroupBreakdown>,
    pub statuses: Vec<GroupBreakdown>,
    pub pros_summary: String,
    pub cons_summary: String,
    pub key_pros: Vec<Theme>,
    pub key_cons: Vec<Theme>,
}

/// Runs the full pipeline against one table (or one table slice). Holds only
/// the injected summarization collaborator; re-runs share nothing.
pub struct ReviewAnalyzer<S> {
    summarizer: S,
}

impl<S: Summarizer> ReviewAnalyzer<S> {
    pub fn new(summarizer: S) -> Self {
        Self { summarizer }
    }

    pub fn analyze_path<P: AsRef<Path>>(&self, path: P) -> Result<AnalysisResult, AnalysisError> {
        let file = std::fs::File::open(path)?;
        self.analyze_reader(file)
    }

    pub fn analyze_reader<R: Read>(&self, reader: R) -> Result<AnalysisResult, AnalysisError> {
        let table = ReviewTable::from_reader(reader)?;
        self.analyze_table(&table)
    }

    pub fn analyze_table(&self, table: &ReviewTable) -> Result<AnalysisResult, AnalysisError> {
        let roles = ColumnRoleMap::resolve(table.columns())?;
        let rows = classify::classify_rows(table, &roles);

        let overall = SentimentSummary::from_rows(&rows);
        let departments = aggregate::by_department(&rows);
        let statuses = aggregate::by_status(&rows);

        let top_pros = keywords::top_keywords(
            &keywords::favorable_blob(&rows),
            &REPORT_TITLE_FILTER,
            THEME_LIMIT,
        );
        let top_cons = keywords::top_keywords(
            &keywords::unfavorable_blob(&rows),
            &REPORT_TITLE_FILTER,
            THEME_LIMIT,
        );

        let pros = narrative::assemble(Polarity::Favorable, &top_pros, &self.summarizer)?;
        let cons = narrative::assemble(Polarity::Unfavorable, &top_cons, &self.summarizer)?;

        Ok(AnalysisResult {
            overall,
            departments,
            statuses,
            pros_summary: pros.summary,
            cons_summary: cons.summary,
            key_pros: pros.themes,
            key_cons: cons.themes,
        })
    }

}
