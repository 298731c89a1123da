pub mod errors;
pub mod preview_service;
pub mod product_wizard;
pub mod upload_service;
pub mod validation;
pub mod wizard_steps;
