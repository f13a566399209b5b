// Query filtering over tasks

use crate::models::{DATE_FORMAT, Task};
use chrono::NaiveDate;
use std::cmp::Ordering;

/// Filter for querying tasks
#[derive(Debug, Clone)]
pub struct Filter {
    /// Field to filter on
    pub field: Field,
    /// Comparison operator
    pub op: FilterOp,
    /// Value to compare against
    pub value: FilterValue,
}

/// Task fields that can be filtered on
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Field {
    Title,
    Category,
    Important,
    Done,
    DueDate,
}

/// Comparison operators for filtering
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum FilterOp {
    Eq,       // ==
    Ne,       // !=
    Gt,       // >
    Lt,       // <
    Gte,      // >=
    Lte,      // <=
    Contains, // case-insensitive substring
}

/// Values a filter compares against
#[derive(Debug, Clone, PartialEq)]
pub enum FilterValue {
    String(String),
    Bool(bool),
    Date(NaiveDate),
}

impl Filter {
    pub fn new(field: Field, op: FilterOp, value: FilterValue) -> Self {
        Self { field, op, value }
    }

    pub fn category(category: impl Into<String>) -> Self {
        Self::new(Field::Category, FilterOp::Eq, FilterValue::String(category.into()))
    }

    pub fn done(done: bool) -> Self {
        Self::new(Field::Done, FilterOp::Eq, FilterValue::Bool(done))
    }

    pub fn important(important: bool) -> Self {
        Self::new(Field::Important, FilterOp::Eq, FilterValue::Bool(important))
    }

    pub fn due_before(date: NaiveDate) -> Self {
        Self::new(Field::DueDate, FilterOp::Lt, FilterValue::Date(date))
    }

    pub fn title_contains(needle: impl Into<String>) -> Self {
        Self::new(Field::Title, FilterOp::Contains, FilterValue::String(needle.into()))
    }

    /// Whether `task` satisfies this filter. Mismatched value types never match.
    pub fn matches(&self, task: &Task) -> bool {
        match (self.field, &self.value) {
            (Field::Title, FilterValue::String(v)) => compare_str(&task.title, v, self.op),
            (Field::Category, FilterValue::String(v)) => compare_str(&task.category, v, self.op),
            (Field::Important, FilterValue::Bool(v)) => compare_ord(task.is_important.cmp(v), self.op),
            (Field::Done, FilterValue::Bool(v)) => compare_ord(task.is_done.cmp(v), self.op),
            (Field::DueDate, FilterValue::Date(v)) => compare_ord(task.due_date.cmp(v), self.op),
            _ => false,
        }
    }
}

fn compare_str(actual: &str, expected: &str, op: FilterOp) -> bool {
    match op {
        FilterOp::Contains => actual.to_lowercase().contains(&expected.to_lowercase()),
        _ => compare_ord(actual.cmp(expected), op),
    }
}

fn compare_ord(ordering: Ordering, op: FilterOp) -> bool {
    match op {
        FilterOp::Eq => ordering == Ordering::Equal,
        FilterOp::Ne => ordering != Ordering::Equal,
        FilterOp::Gt => ordering == Ordering::Greater,
        FilterOp::Lt => ordering == Ordering::Less,
        FilterOp::Gte => ordering != Ordering::Less,
        FilterOp::Lte => ordering != Ordering::Greater,
        FilterOp::Contains => false,
    }
}

impl std::fmt::Display for FilterOp {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            FilterOp::Eq => write!(f, "="),
            FilterOp::Ne => write!(f, "!="),
            FilterOp::Gt => write!(f, ">"),
            FilterOp::Lt => write!(f, "<"),
            FilterOp::Gte => write!(f, ">="),
            FilterOp::Lte => write!(f, "<="),
            FilterOp::Contains => write!(f, "~"),
        }
    }
}

impl std::fmt::Display for FilterValue {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            FilterValue::String(s) => write!(f, "{}", s),
            FilterValue::Bool(b) => write!(f, "{}", b),
            FilterValue::Date(d) => write!(f, "{}", d.format(DATE_FORMAT)),
        }
    }
}
