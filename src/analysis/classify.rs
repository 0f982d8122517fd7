use super::markup::strip_markup;
use super::schema::ColumnRoleMap;
use super::table::ReviewTable;
use regex::Regex;
use serde::Serialize;
use std::sync::LazyLock;

static CURRENT_RE: LazyLock<Regex> =
    LazyLock::new(|| Regex::new(r"\b(current|present|active)\b").expect("valid status regex"));

static FORMER_RE: LazyLock<Regex> =
    LazyLock::new(|| Regex::new(r"\b(former|past|previous|ex)\b").expect("valid status regex"));

/// Sentiment label derived from the numeric rating. The rule applies to the
/// raw parsed value with no rounding: 4.0 and above is Positive, exactly 3 is
/// Neutral, everything else (including 3.5 or 3.9) is Negative.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize)]
#[serde(rename_all = "snake_case")]
pub enum Sentiment {
    Positive,
    Neutral,
    Negative,
}

impl Sentiment {
    pub const fn ordered() -> [Self; 3] {
        [Self::Positive, Self::Neutral, Self::Negative]
    }

    pub const fn label(self) -> &'static str {
        match self {
            Self::Positive => "Positive",
            Self::Neutral => "Neutral",
            Self::Negative => "Negative",
        }
    }

    pub fn from_rating(rating: f64) -> Self {
        if rating >= 4.0 {
            Self::Positive
        } else if rating == 3.0 {
            Self::Neutral
        } else {
            Self::Negative
        }
    }
}

/// Coarse employment tenure bucket read out of the status column text.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize)]
#[serde(rename_all = "snake_case")]
pub enum EmploymentBucket {
    Current,
    Former,
    Unknown,
}

impl EmploymentBucket {
    pub const fn ordered() -> [Self; 3] {
        [Self::Current, Self::Former, Self::Unknown]
    }

    pub const fn label(self) -> &'static str {
        match self {
            Self::Current => "Current",
            Self::Former => "Former",
            Self::Unknown => "Unknown",
        }
    }

    /// Current wins over Former when a status mentions both.
    pub fn from_status_text(status: &str) -> Self {
        let lowered = status.to_lowercase();
        if CURRENT_RE.is_match(&lowered) {
            Self::Current
        } else if FORMER_RE.is_match(&lowered) {
            Self::Former
        } else {
            Self::Unknown
        }
    }
}

/// Fixed keyword-to-department lookup for rows that only carry a job title.
/// The sales check runs before the finance check, so "accounting" titles
/// bucket as Sales via the "account" keyword.
pub fn department_from_title(title: &str) -> &'static str {
    let lowered = title.to_lowercase();
    let contains_any = |keywords: &[&str]| keywords.iter().any(|keyword| lowered.contains(keyword));

    if contains_any(&["hr", "human resources"]) {
        "HR"
    } else if contains_any(&["it", "engineer", "software", "developer", "tech"]) {
        "IT"
    } else if contains_any(&["admin", "assistant", "office"]) {
        "Admin"
    } else if contains_any(&["sales", "account"]) {
        "Sales"
    } else if contains_any(&["marketing"]) {
        "Marketing"
    } else if contains_any(&["finance", "accounting"]) {
        "Finance"
    } else {
        "Other"
    }
}

/// One review row after classification, with the markup-stripped text the
/// extractor needs downstream.
#[derive(Debug, Clone)]
pub struct ClassifiedRow {
    pub sentiment: Sentiment,
    pub employment: EmploymentBucket,
    pub department: String,
    pub pros: String,
    pub cons: String,
    pub comment: String,
}

/// Classify every table row. Rows whose rating cell does not parse as a
/// number are excluded from the output, never defaulted.
pub fn classify_rows(table: &ReviewTable, roles: &ColumnRoleMap) -> Vec<ClassifiedRow> {
    let mut classified = Vec::with_capacity(table.row_count());

    for row in 0..table.row_count() {
        let rating_cell = table.cell(row, roles.rating).trim();
        let rating = match rating_cell.parse::<f64>() {
            Ok(value) if value.is_finite() => value,
            _ => continue,
        };

        let text_cell = |column: Option<usize>| {
            column
                .map(|index| strip_markup(table.cell(row, index)))
                .unwrap_or_default()
        };

        let employment = match roles.status {
            Some(index) => EmploymentBucket::from_status_text(table.cell(row, index)),
            None => EmploymentBucket::Unknown,
        };

        let department = match roles.department {
            Some(index) => {
                let value = table.cell(row, index).trim();
                if value.is_empty() {
                    "Other".to_string()
                } else {
                    value.to_string()
                }
            }
            None => match roles.title {
                Some(index) => department_from_title(table.cell(row, index)).to_string(),
                None => "Other".to_string(),
            },
        };

        classified.push(ClassifiedRow {
            sentiment: Sentiment::from_rating(rating),
            employment,
            department,
            pros: text_cell(roles.pros),
            cons: text_cell(roles.cons),
            comment: text_cell(roles.comment),
        });
    }

    classified
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn sentiment_boundaries_are_exact() {
        assert_eq!(Sentiment::from_rating(5.0), Sentiment::Positive);
        assert_eq!(Sentiment::from_rating(4.0), Sentiment::Positive);
        assert_eq!(Sentiment::from_rating(3.9), Sentiment::Negative);
        assert_eq!(Sentiment::from_rating(3.5), Sentiment::Negative);
        assert_eq!(Sentiment::from_rating(3.0), Sentiment::Neutral);
        assert_eq!(Sentiment::from_rating(2.9), Sentiment::Negative);
        assert_eq!(Sentiment::from_rating(1.0), Sentiment::Negative);
    }

    #[test]
    fn status_buckets_use_word_boundaries() {
        assert_eq!(
            EmploymentBucket::from_status_text("Current Employee"),
            EmploymentBucket::Current
        );
        assert_eq!(
            EmploymentBucket::from_status_text("former staff, left 2024"),
            EmploymentBucket::Former
        );
        assert_eq!(
            EmploymentBucket::from_status_text("Ex employee"),
            EmploymentBucket::Former
        );
        // "expert" must not match the bare "ex" keyword.
        assert_eq!(
            EmploymentBucket::from_status_text("expert consultant"),
            EmploymentBucket::Unknown
        );
        assert_eq!(
            EmploymentBucket::from_status_text(""),
            EmploymentBucket::Unknown
        );
    }

    #[test]
    fn current_wins_over_former() {
        assert_eq!(
            EmploymentBucket::from_status_text("former intern, current employee"),
            EmploymentBucket::Current
        );
    }

    #[test]
    fn title_lookup_follows_fixed_order() {
        assert_eq!(department_from_title("HR Business Partner"), "HR");
        assert_eq!(department_from_title("Software Developer"), "IT");
        assert_eq!(department_from_title("Office Assistant"), "Admin");
        assert_eq!(department_from_title("Sales Executive"), "Sales");
        assert_eq!(department_from_title("Marketing Lead"), "Marketing");
        assert_eq!(department_from_title("Financial Planner, Finance"), "Finance");
        assert_eq!(department_from_title("Groundskeeper"), "Other");
        // "account" is checked under sales before the finance keywords.
        assert_eq!(department_from_title("Accounting Manager"), "Sales");
    }
}
