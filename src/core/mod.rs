pub mod cache;
pub mod error;
pub mod money;
pub mod period;

pub use cache::ExpiringCache;
pub use error::{AppError, Result};
pub use money::{format_brl, round_cents, split_evenly};
pub use period::{Period, PeriodSignature, PeriodType};
