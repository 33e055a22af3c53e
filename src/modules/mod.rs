pub mod deductions;
pub mod dre;
pub mod health;
pub mod ledger;
pub mod users;
