pub mod cursor;
pub mod validate;
