pub mod implementors;
pub mod traits;
