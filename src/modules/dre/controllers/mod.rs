mod dre_controller;

pub use dre_controller::{configure, get_dre, DreDisplay};
