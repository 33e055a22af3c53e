pub mod dre_cache;
pub mod dre_service;
pub mod tax_recalculation;

pub use dre_cache::DreCache;
pub use dre_service::DreService;
pub use tax_recalculation::{recompute, DerivedTaxes, TaxInputs};
