pub mod engine;
pub mod loader;

pub use engine::{Amount, Transaction, TransactionQueryEngine, TransactionSnapshot};
pub use loader::{JsonFileLoader, LoadError, TransactionLoader};
