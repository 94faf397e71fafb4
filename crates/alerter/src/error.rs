use thiserror::Error;

#[derive(Error, Debug, Clone, PartialEq, Eq)]
pub enum AlerterError {
    #[error("Unknown comparator '{comparator}' in the rule for '{metric}' (expected lt, le, gt or ge)")]
    UnknownComparator { metric: String, comparator: String },
}

/// A comparator string that is neither a word (`lt`) nor a symbol (`<`).
#[derive(Error, Debug, Clone, PartialEq, Eq)]
#[error("'{0}' is not a comparator")]
pub struct ParseComparatorError(pub String);
