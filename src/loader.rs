use std::fs::File;
use std::io::{BufReader, Read};
use std::path::{Path, PathBuf};
use thiserror::Error;

use crate::engine::Transaction;

#[derive(Error, Debug)]
pub enum LoadError {
    #[error("Cannot read transactions file {path:?}: {source}")]
    Io {
        path: PathBuf,
        source: std::io::Error,
    },

    #[error("Malformed transactions data: {0}")]
    Json(#[from] serde_json::Error),

    #[error("Transaction {transaction_number} has a negative amount")]
    NegativeAmount { transaction_number: u64 },
}

/// Source of the full transaction list.
pub trait TransactionLoader {
    fn all_transactions(&self) -> Result<Vec<Transaction>, LoadError>;
}

/// Reads transactions from a JSON file holding an array of records.
pub struct JsonFileLoader {
    path: PathBuf,
}

impl JsonFileLoader {
    pub fn new(path: impl Into<PathBuf>) -> Self {
        JsonFileLoader { path: path.into() }
    }

    pub fn path(&self) -> &Path {
        &self.path
    }
}

impl TransactionLoader for JsonFileLoader {
    fn all_transactions(&self) -> Result<Vec<Transaction>, LoadError> {
        log::info!("Loading transactions from {:?}", self.path);
        let file = File::open(&self.path).map_err(|source| LoadError::Io {
            path: self.path.clone(),
            source,
        })?;
        parse_transactions(BufReader::new(file))
    }
}

/// Parses a JSON array of transactions, rejecting records with a negative amount.
pub fn parse_transactions<R: Read>(reader: R) -> Result<Vec<Transaction>, LoadError> {
    let transactions: Vec<Transaction> = serde_json::from_reader(reader)?;
    log::debug!("Deserialised {} transaction records", transactions.len());

    if let Some(tx) = transactions.iter().find(|tx| tx.amount.is_negative()) {
        log::warn!(
            "Rejecting transaction {}: negative amount {}",
            tx.transaction_number,
            tx.amount
        );
        Err(LoadError::NegativeAmount {
            transaction_number: tx.transaction_number,
        })?
    }

    Ok(transactions)
}
