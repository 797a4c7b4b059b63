use crate::id::Id;

/// Reference data: a family-friendly facility, e.g. a diaper table.
#[rustfmt::skip]
#[derive(Debug, Clone, Eq, PartialEq)]
pub struct Feature {
    pub id          : Id,
    pub code        : String,
    pub label       : String,
    /// Grouping like "restroom", "access" or "food".
    pub group       : Option<String>,
    pub description : Option<String>,
}
