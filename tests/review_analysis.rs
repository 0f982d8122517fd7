use std::io::Cursor;
use std::sync::Mutex;
use thrive_sentiment::analysis::{AnalysisError, ReviewAnalyzer, ReviewTable, SchemaError};
use thrive_sentiment::summarize::{Summarizer, SummarizerError};

/// Deterministic collaborator stub that records every prompt it receives.
struct RecordingSummarizer {
    prompts: Mutex<Vec<String>>,
}

impl RecordingSummarizer {
    fn new() -> Self {
        Self {
            prompts: Mutex::new(Vec::new()),
        }
    }

    fn prompts(&self) -> Vec<String> {
        self.prompts.lock().expect("prompt mutex poisoned").clone()
    }
}

impl Summarizer for RecordingSummarizer {
    fn summarize(&self, prompt: &str) -> Result<String, SummarizerError> {
        self.prompts
            .lock()
            .expect("prompt mutex poisoned")
            .push(prompt.to_string());
        Ok(format!("Generated from: {prompt}"))
    }
}

/// Collaborator stub that always fails, for error-propagation checks.
struct FailingSummarizer;

impl Summarizer for FailingSummarizer {
    fn summarize(&self, _prompt: &str) -> Result<String, SummarizerError> {
        Err(SummarizerError::EmptyResponse)
    }
}

#[test]
fn end_to_end_four_row_scenario() {
    let csv = "Rating,Pros,Cons\n\
               5,great team great team,long hours\n\
               3,great team great team,long hours\n\
               2,great team great team,long hours\n\
               4,great team great team,long hours\n";
    let summarizer = RecordingSummarizer::new();
    let analyzer = ReviewAnalyzer::new(&summarizer);
    let result = analyzer
        .analyze_reader(Cursor::new(csv))
        .expect("table analyzes");

    assert_eq!(result.overall.total, 4);
    assert_eq!(result.overall.counts.positive, 2);
    assert_eq!(result.overall.counts.neutral, 1);
    assert_eq!(result.overall.counts.negative, 1);
    assert!((result.overall.percentages.positive - 50.0).abs() < f64::EPSILON);
    assert!((result.overall.percentages.neutral - 25.0).abs() < f64::EPSILON);
    assert!((result.overall.percentages.negative - 25.0).abs() < f64::EPSILON);

    // No department, title, or status columns: one bucket each.
    assert_eq!(result.departments.len(), 1);
    assert_eq!(result.departments[0].key, "Other");
    assert_eq!(result.departments[0].summary.total, 4);
    assert_eq!(result.statuses.len(), 1);
    assert_eq!(result.statuses[0].key, "Unknown");

    // "great" and "long" are stopwords; "team" and "hours" survive.
    let pros_titles: Vec<&str> = result
        .key_pros
        .iter()
        .map(|theme| theme.title.as_str())
        .collect();
    assert_eq!(pros_titles, ["Team"]);
    let cons_titles: Vec<&str> = result
        .key_cons
        .iter()
        .map(|theme| theme.title.as_str())
        .collect();
    assert_eq!(cons_titles, ["Hours"]);

    // Two summary prompts plus one per theme, in list order.
    let prompts = summarizer.prompts();
    assert_eq!(prompts.len(), 4);
    assert!(prompts[0].contains("Team"));
    assert!(prompts[0].contains("positive aspects"));
    assert!(prompts[1].contains("'Team'"));
    assert!(prompts[2].contains("Hours"));
    assert!(prompts[2].contains("negative aspects"));
    assert!(prompts[3].contains("'Hours'"));

    // Theme descriptions are normalized with a trailing period.
    assert!(result.key_pros[0].description.ends_with('.'));
}

#[test]
fn counts_cover_only_parseable_ratings() {
    let csv = "Rating,Review Comments\n5,fine\nbad-value,dropped\n4,fine\n,dropped\n1,poor\n";
    let analyzer = ReviewAnalyzer::new(RecordingSummarizer::new());
    let result = analyzer
        .analyze_reader(Cursor::new(csv))
        .expect("table analyzes");

    let counts = result.overall.counts;
    assert_eq!(counts.positive + counts.neutral + counts.negative, 3);
    assert_eq!(result.overall.total, 3);
}

#[test]
fn group_percentages_sum_to_100_for_each_group() {
    let csv = "Rating,Pros,Cons,Department\n\
               5,team,hours,Sales\n\
               3,team,hours,Sales\n\
               1,team,hours,Sales\n\
               4,team,hours,IT\n";
    let analyzer = ReviewAnalyzer::new(RecordingSummarizer::new());
    let result = analyzer
        .analyze_reader(Cursor::new(csv))
        .expect("table analyzes");

    assert_eq!(result.departments.len(), 2);
    for group in &result.departments {
        let counts = group.summary.counts;
        assert_eq!(
            counts.positive + counts.neutral + counts.negative,
            group.summary.total
        );
        let shares = group.summary.percentages;
        assert!((shares.positive + shares.neutral + shares.negative - 100.0).abs() < 1e-9);
    }
}

#[test]
fn empty_favorable_content_skips_the_collaborator() {
    // Comment-only table where no row is Positive: the favorable blob is
    // empty, so the pros side must emit the fixed fallback with zero calls.
    let csv = "Rating,Review Comments\n2,slow career growth\n1,slow career growth\n";
    let summarizer = RecordingSummarizer::new();
    let analyzer = ReviewAnalyzer::new(&summarizer);
    let result = analyzer
        .analyze_reader(Cursor::new(csv))
        .expect("table analyzes");

    assert_eq!(result.pros_summary, "No positive aspects were highlighted.");
    assert!(result.key_pros.is_empty());

    let prompts = summarizer.prompts();
    assert!(prompts.iter().all(|prompt| !prompt.contains("positive aspects")));
    // The unfavorable side still ran: one summary plus its themes.
    assert!(!result.key_cons.is_empty());
    assert_eq!(prompts.len(), 1 + result.key_cons.len());
}

#[test]
fn missing_rating_column_fails_before_classification() {
    let csv = "Comments,Department\nonly text,Sales\n";
    let summarizer = RecordingSummarizer::new();
    let analyzer = ReviewAnalyzer::new(&summarizer);
    let error = analyzer
        .analyze_reader(Cursor::new(csv))
        .expect_err("schema rejected");

    assert!(matches!(
        error,
        AnalysisError::Schema(SchemaError::NoRatingColumn)
    ));
    assert!(summarizer.prompts().is_empty());
}

#[test]
fn rating_without_any_text_field_is_rejected() {
    let csv = "Rating,Department\n5,Sales\n";
    let analyzer = ReviewAnalyzer::new(RecordingSummarizer::new());
    let error = analyzer
        .analyze_reader(Cursor::new(csv))
        .expect_err("schema rejected");

    assert!(matches!(
        error,
        AnalysisError::Schema(SchemaError::MissingTextColumns)
    ));
}

#[test]
fn department_buckets_derive_from_title_when_no_department_column() {
    let csv = "Overall Rating,Pros,Cons,Job Title\n\
               5,mentoring,commute,Software Engineer\n\
               4,mentoring,commute,HR Generalist\n\
               2,mentoring,commute,Welder\n";
    let analyzer = ReviewAnalyzer::new(RecordingSummarizer::new());
    let result = analyzer
        .analyze_reader(Cursor::new(csv))
        .expect("table analyzes");

    let keys: Vec<&str> = result
        .departments
        .iter()
        .map(|group| group.key.as_str())
        .collect();
    assert_eq!(keys, ["IT", "HR", "Other"]);
}

#[test]
fn status_column_buckets_current_and_former() {
    let csv = "Rating,Review Comments,Employment Status\n\
               5,steady,Current Employee\n\
               2,rough,Former Employee\n\
               3,meh,contractor\n";
    let analyzer = ReviewAnalyzer::new(RecordingSummarizer::new());
    let result = analyzer
        .analyze_reader(Cursor::new(csv))
        .expect("table analyzes");

    let keys: Vec<&str> = result
        .statuses
        .iter()
        .map(|group| group.key.as_str())
        .collect();
    assert_eq!(keys, ["Current", "Former", "Unknown"]);
}

#[test]
fn markup_is_stripped_before_keyword_extraction() {
    let csv = "Rating,Pros,Cons\n\
               5,<b>flexible&nbsp;schedule</b> flexible schedule,<i>noisy</i> open floor noisy\n";
    let analyzer = ReviewAnalyzer::new(RecordingSummarizer::new());
    let result = analyzer
        .analyze_reader(Cursor::new(csv))
        .expect("table analyzes");

    let pros_titles: Vec<&str> = result
        .key_pros
        .iter()
        .map(|theme| theme.title.as_str())
        .collect();
    assert_eq!(pros_titles, ["Flexible", "Schedule"]);
    assert!(result
        .key_cons
        .iter()
        .any(|theme| theme.title == "Noisy"));
}

#[test]
fn collaborator_failures_propagate_unmodified() {
    let csv = "Rating,Pros,Cons\n5,team,hours\n";
    let analyzer = ReviewAnalyzer::new(FailingSummarizer);
    let error = analyzer
        .analyze_reader(Cursor::new(csv))
        .expect_err("collaborator error surfaces");

    assert!(matches!(
        error,
        AnalysisError::Summarizer(SummarizerError::EmptyResponse)
    ));
}

#[test]
fn per_slice_reruns_match_whole_table_groups() {
    let csv = "Rating,Pros,Cons,Department\n\
               5,team,hours,Sales\n\
               1,team,hours,Sales\n\
               4,team,hours,IT\n";
    let table = ReviewTable::from_reader(Cursor::new(csv)).expect("csv parses");
    let analyzer = ReviewAnalyzer::new(RecordingSummarizer::new());

    let whole = analyzer.analyze_table(&table).expect("whole table analyzes");
    let sales_group = whole
        .departments
        .iter()
        .find(|group| group.key == "Sales")
        .expect("sales group present");

    // Department column index is 3 in this fixture.
    let sales_slice = table.slice_by(3, "Sales");
    let sliced = analyzer
        .analyze_table(&sales_slice)
        .expect("slice analyzes");

    assert_eq!(sliced.overall, sales_group.summary);
}
