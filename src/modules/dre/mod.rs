pub mod controllers;
pub mod models;
pub mod services;

pub use models::DreData;
pub use services::{DreCache, DreService};
