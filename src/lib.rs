pub mod config;
pub mod data;
pub mod services;
pub mod utils;
