use super::SchemaError;

/// Semantic purpose a spreadsheet column can serve.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum ColumnRole {
    Rating,
    Pros,
    Cons,
    Comment,
    Title,
    Status,
    Department,
}

/// Substring keywords per role, matched case-insensitively against column
/// names. Order of roles here is documentation only; per role, the first
/// matching column in table-declaration order wins.
const ROLE_KEYWORDS: &[(ColumnRole, &[&str])] = &[
    (ColumnRole::Rating, &["rating"]),
    (ColumnRole::Pros, &["pros"]),
    (ColumnRole::Cons, &["cons"]),
    (ColumnRole::Comment, &["comment", "review"]),
    (ColumnRole::Title, &["job", "role", "position"]),
    (ColumnRole::Status, &["status", "employment"]),
    (ColumnRole::Department, &["department"]),
];

/// Resolved column index per role. `rating` is required by construction;
/// resolution fails without it or without any usable text field.
#[derive(Debug, Clone)]
pub struct ColumnRoleMap {
    pub rating: usize,
    pub pros: Option<usize>,
    pub cons: Option<usize>,
    pub comment: Option<usize>,
    pub title: Option<usize>,
    pub status: Option<usize>,
    pub department: Option<usize>,
}

impl ColumnRoleMap {
    pub fn resolve(columns: &[String]) -> Result<Self, SchemaError> {
        let lowered: Vec<String> = columns
            .iter()
            .map(|name| name.to_lowercase())
            .collect();

        let find = |role: ColumnRole| -> Option<usize> {
            let keywords = ROLE_KEYWORDS
                .iter()
                .find(|(candidate, _)| *candidate == role)
                .map(|(_, keywords)| *keywords)
                .unwrap_or_default();
            lowered
                .iter()
                .position(|name| keywords.iter().any(|keyword| name.contains(keyword)))
        };

        let rating = find(ColumnRole::Rating).ok_or(SchemaError::NoRatingColumn)?;
        let pros = find(ColumnRole::Pros);
        let cons = find(ColumnRole::Cons);
        let comment = find(ColumnRole::Comment);

        if !(pros.is_some() && cons.is_some()) && comment.is_none() {
            return Err(SchemaError::MissingTextColumns);
        }

        Ok(Self {
            rating,
            pros,
            cons,
            comment,
            title: find(ColumnRole::Title),
            status: find(ColumnRole::Status),
            department: find(ColumnRole::Department),
        })
    }
}
