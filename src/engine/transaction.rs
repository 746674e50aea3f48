use serde::Deserialize;

use crate::engine::Amount;

/// One record of the transaction data source.
///
/// A single transfer shows up once per compliance issue raised against it, so several
/// records may share a `transaction_number` while differing in their issue fields.
#[derive(Deserialize, Debug, Clone, PartialEq, Eq)]
#[serde(rename_all = "camelCase")]
pub struct Transaction {
    #[serde(rename = "mtn")]
    pub transaction_number: u64,
    pub amount: Amount,
    pub sender_full_name: String,
    pub sender_age: u32,
    pub beneficiary_full_name: String,
    pub beneficiary_age: u32,
    #[serde(default)]
    pub issue_id: Option<u32>,
    #[serde(default)]
    pub issue_solved: Option<bool>,
    #[serde(default)]
    pub issue_message: Option<String>,
}

impl Transaction {
    /// Whether `client` took part in the transfer as sender or beneficiary.
    pub fn involves(&self, client: &str) -> bool {
        self.sender_full_name == client || self.beneficiary_full_name == client
    }

    /// An issue is open only when it is explicitly flagged as not solved.
    pub fn has_open_issue(&self) -> bool {
        self.issue_solved == Some(false)
    }

    pub fn has_solved_issue(&self) -> bool {
        self.issue_solved == Some(true)
    }
}
