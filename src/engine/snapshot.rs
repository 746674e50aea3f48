use serde::{Deserialize, Serialize};

use crate::engine::Transaction;

/// A Snapshot of a Transaction to easily view the content
/// It is used for decoupling query output from Transaction and easy serialisation
#[derive(Serialize, Deserialize, Debug, Clone, PartialEq, Eq, PartialOrd, Ord)]
pub struct TransactionSnapshot {
    pub mtn: u64,
    pub amount: String,
    pub sender: String,
    pub sender_age: u32,
    pub beneficiary: String,
    pub beneficiary_age: u32,
    pub issue_id: Option<u32>,
    pub issue_solved: Option<bool>,
    pub issue_message: Option<String>,
}

impl From<&Transaction> for TransactionSnapshot {
    fn from(tx: &Transaction) -> Self {
        TransactionSnapshot {
            mtn: tx.transaction_number,
            amount: tx.amount.to_string(),
            sender: tx.sender_full_name.clone(),
            sender_age: tx.sender_age,
            beneficiary: tx.beneficiary_full_name.clone(),
            beneficiary_age: tx.beneficiary_age,
            issue_id: tx.issue_id,
            issue_solved: tx.issue_solved,
            issue_message: tx.issue_message.clone(),
        }
    }
}
