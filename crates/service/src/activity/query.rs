use std::cmp::Ordering;

use models::{activity, errors::ValidationError};

use crate::pagination::Pagination;

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum SortField {
    Title,
    Description,
    Timestamp,
}

impl SortField {
    pub fn parse(s: &str) -> Result<Self, ValidationError> {
        match s.trim().to_ascii_lowercase().as_str() {
            "title" | "titulo" => Ok(SortField::Title),
            "description" | "descricao" => Ok(SortField::Description),
            "timestamp" | "data" => Ok(SortField::Timestamp),
            other => Err(ValidationError::field(
                "sort",
                format!("unsupported sort field {other:?}; expected title, description or timestamp"),
            )),
        }
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum SortDirection {
    Asc,
    Desc,
}

impl SortDirection {
    pub fn parse(s: &str) -> Result<Self, ValidationError> {
        match s.trim().to_ascii_lowercase().as_str() {
            "asc" => Ok(SortDirection::Asc),
            "desc" => Ok(SortDirection::Desc),
            other => Err(ValidationError::field(
                "order",
                format!("unsupported sort direction {other:?}; expected asc or desc"),
            )),
        }
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct Sort {
    pub field: SortField,
    pub direction: SortDirection,
}

impl Default for Sort {
    /// Newest first.
    fn default() -> Self {
        Self { field: SortField::Timestamp, direction: SortDirection::Desc }
    }
}

impl Sort {
    fn directed(&self, ord: Ordering) -> Ordering {
        match self.direction {
            SortDirection::Asc => ord,
            SortDirection::Desc => ord.reverse(),
        }
    }

    /// In-memory equivalent of the SQL ordering, id as tie-breaker.
    /// Missing descriptions sort last in both directions (`NULLS LAST`).
    pub fn compare(&self, a: &activity::Model, b: &activity::Model) -> Ordering {
        let ord = match self.field {
            SortField::Title => self.directed(a.title.cmp(&b.title)),
            SortField::Timestamp => self.directed(a.timestamp.cmp(&b.timestamp)),
            SortField::Description => match (&a.description, &b.description) {
                (Some(x), Some(y)) => self.directed(x.cmp(y)),
                (Some(_), None) => Ordering::Less,
                (None, Some(_)) => Ordering::Greater,
                (None, None) => Ordering::Equal,
            },
        };
        ord.then_with(|| a.id.cmp(&b.id))
    }
}

/// Raw list parameters as received from the caller.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct ListOptions {
    pub page: Option<u64>,
    pub limit: Option<u64>,
    pub title: Option<String>,
    pub sort: Option<String>,
    pub order: Option<String>,
}

/// Validated list query handed to repositories.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ActivityQuery {
    /// Case-insensitive substring to look for in titles; never blank.
    pub title: Option<String>,
    pub sort: Sort,
    pub pagination: Pagination,
}

impl Default for ActivityQuery {
    fn default() -> Self {
        Self { title: None, sort: Sort::default(), pagination: Pagination::default() }
    }
}

fn non_blank(v: Option<String>) -> Option<String> {
    v.filter(|s| !s.trim().is_empty())
}

impl TryFrom<ListOptions> for ActivityQuery {
    type Error = ValidationError;

    fn try_from(opts: ListOptions) -> Result<Self, Self::Error> {
        let field = non_blank(opts.sort).map(|s| SortField::parse(&s)).transpose()?;
        let direction = non_blank(opts.order).map(|s| SortDirection::parse(&s)).transpose()?;
        let sort = match (field, direction) {
            (None, None) => Sort::default(),
            (None, Some(direction)) => Sort { field: SortField::Timestamp, direction },
            (Some(field), direction) => Sort { field, direction: direction.unwrap_or(SortDirection::Asc) },
        };
        Ok(Self {
            title: non_blank(opts.title).map(|t| t.trim().to_string()),
            sort,
            pagination: Pagination::from_parts(opts.page, opts.limit),
        })
    }
}

impl ActivityQuery {
    pub fn matches(&self, m: &activity::Model) -> bool {
        title_matches(self.title.as_deref(), m)
    }
}

/// Same rule as the SQL filter: folded needle inside the stored folded title.
pub fn title_matches(needle: Option<&str>, m: &activity::Model) -> bool {
    match needle {
        Some(n) => m.title_search.contains(&activity::fold_title(n)),
        None => true,
    }
}
