mod model;
mod repository;

pub use model::TransactionRow;
pub use repository::LedgerRepository;

pub(crate) use model::{format_timestamp, parse_timestamp};
