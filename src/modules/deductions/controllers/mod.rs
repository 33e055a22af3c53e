mod deduction_controller;

pub use deduction_controller::*;
