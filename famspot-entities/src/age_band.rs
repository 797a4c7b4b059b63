use crate::id::Id;

/// Reference data: the age range of the children a review was written for.
#[rustfmt::skip]
#[derive(Debug, Clone, Eq, PartialEq)]
pub struct AgeBand {
    pub id    : Id,
    pub code  : String,
    pub label : String,
    pub sort  : i32,
}
