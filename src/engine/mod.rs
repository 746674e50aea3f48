mod amount;
mod query;
mod snapshot;
mod transaction;

pub use amount::{Amount, AmountError};
pub use query::TransactionQueryEngine;
pub use snapshot::TransactionSnapshot;
pub use transaction::Transaction;
