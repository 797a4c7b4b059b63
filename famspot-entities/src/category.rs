use crate::id::Id;

/// Reference data: the kind of a place, e.g. a park or an indoor playground.
#[rustfmt::skip]
#[derive(Debug, Clone, Eq, PartialEq)]
pub struct Category {
    pub id    : Id,
    pub code  : String,
    pub label : String,
    pub sort  : i32,
}

impl Category {
    pub const CODE_PARK: &'static str = "park";
    pub const CODE_INDOOR_KIDS: &'static str = "indoor_kids";
    pub const CODE_RESTAURANT: &'static str = "restaurant";
}
