pub mod dre;

pub use dre::{Custos, Despesas, DreData, DreInputs, Impostos, Receitas};
