use crate::id::Id;

#[rustfmt::skip]
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct User {
    pub id       : Id,
    pub email    : String,
    pub nickname : Option<String>,
}
