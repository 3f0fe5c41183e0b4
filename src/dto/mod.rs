pub mod categories;
pub mod orders;
