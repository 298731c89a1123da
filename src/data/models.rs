pub mod attachment;
pub mod categories;
pub mod draft;
pub mod product;
pub mod submission;
