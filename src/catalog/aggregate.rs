//! Concatenation of partitioned content modules into one category sequence.
//!
//! Part files exist only to keep authored files small. Aggregation flattens
//! them one level in declared order and never merges or deduplicates by id;
//! duplicate ids are a validation concern.

use crate::catalog::model::Category;

/// Flatten `parts` in order: `[A, B, C]` becomes `A ++ B ++ C`.
pub fn aggregate<I>(parts: I) -> Vec<Category>
where
    I: IntoIterator<Item = Vec<Category>>,
{
    let mut categories = Vec::new();
    for part in parts {
        categories.extend(part);
    }
    categories
}
