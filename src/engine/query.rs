use std::collections::{BTreeMap, BTreeSet, HashMap, HashSet};

use crate::engine::{Amount, Transaction};

/// Read-only queries over a loaded set of transactions.
///
/// Monetary aggregates count every transfer once: when several records share a
/// transaction number, the first one in input order carries the amount and the
/// others (extra compliance issues) are skipped. Issue queries look at every record.
pub struct TransactionQueryEngine<'a> {
    transactions: &'a [Transaction],
}

impl<'a> TransactionQueryEngine<'a> {
    pub fn new(transactions: &'a [Transaction]) -> Self {
        TransactionQueryEngine { transactions }
    }

    /// First record of every transfer, in input order.
    fn distinct_transfers(&self) -> impl Iterator<Item = &'a Transaction> + use<'a> {
        let transactions = self.transactions;
        let mut seen = HashSet::new();
        transactions
            .iter()
            .filter(move |tx| seen.insert(tx.transaction_number))
    }

    /// Sum of the amounts of all transfers.
    pub fn total_amount(&self) -> Amount {
        self.distinct_transfers().map(|tx| tx.amount).sum()
    }

    /// Sum of the amounts of all transfers sent by `sender`.
    pub fn total_amount_sent_by(&self, sender: &str) -> Amount {
        let mut seen = HashSet::new();
        self.transactions
            .iter()
            .filter(|tx| tx.sender_full_name == sender)
            .filter(|tx| seen.insert(tx.transaction_number))
            .map(|tx| tx.amount)
            .sum()
    }

    pub fn max_amount(&self) -> Amount {
        self.transactions
            .iter()
            .map(|tx| tx.amount)
            .max()
            .unwrap_or(Amount::ZERO)
    }

    /// Number of distinct names that sent or received a transfer.
    pub fn count_unique_clients(&self) -> usize {
        self.transactions
            .iter()
            .flat_map(|tx| [tx.sender_full_name.as_str(), tx.beneficiary_full_name.as_str()])
            .collect::<HashSet<_>>()
            .len()
    }

    /// Whether `client`, as sender or beneficiary, has at least one issue not solved yet.
    pub fn has_open_compliance_issues(&self, client: &str) -> bool {
        self.transactions
            .iter()
            .any(|tx| tx.involves(client) && tx.has_open_issue())
    }

    /// Every record grouped by beneficiary, input order kept inside each group.
    pub fn transactions_by_beneficiary_name(&self) -> BTreeMap<&'a str, Vec<&'a Transaction>> {
        let mut groups: BTreeMap<&str, Vec<&Transaction>> = BTreeMap::new();
        for tx in self.transactions {
            groups
                .entry(tx.beneficiary_full_name.as_str())
                .or_default()
                .push(tx);
        }
        groups
    }

    pub fn unsolved_issue_ids(&self) -> BTreeSet<u32> {
        self.transactions
            .iter()
            .filter(|tx| tx.has_open_issue())
            .filter_map(|tx| tx.issue_id)
            .collect()
    }

    pub fn all_solved_issue_messages(&self) -> Vec<&'a str> {
        self.transactions
            .iter()
            .filter(|tx| tx.has_solved_issue())
            .filter_map(|tx| tx.issue_message.as_deref())
            .collect()
    }

    /// Up to `limit` transfers with the highest amount, highest first.
    /// Equal amounts keep their input order.
    pub fn top_transactions_by_amount(&self, limit: usize) -> Vec<&'a Transaction> {
        let mut transfers: Vec<&Transaction> = self.distinct_transfers().collect();
        transfers.sort_by(|a, b| b.amount.cmp(&a.amount));
        transfers.truncate(limit);
        log::debug!(
            "Selected {} of the top {} transfers by amount",
            transfers.len(),
            limit
        );
        transfers
    }

    pub fn top3_transactions_by_amount(&self) -> Vec<&'a Transaction> {
        self.top_transactions_by_amount(3)
    }

    /// Sender with the highest total sent amount.
    ///
    /// On equal totals the sender whose first transfer comes earliest in the input wins.
    pub fn top_sender(&self) -> Option<&'a str> {
        let mut totals: Vec<(&'a str, Amount)> = Vec::new();
        let mut positions: HashMap<&'a str, usize> = HashMap::new();

        for tx in self.distinct_transfers() {
            let sender = tx.sender_full_name.as_str();
            let index = *positions.entry(sender).or_insert_with(|| {
                totals.push((sender, Amount::ZERO));
                totals.len() - 1
            });
            totals[index].1 = totals[index].1.saturating_add(tx.amount);
        }
        log::debug!("Aggregated sent amounts for {} senders", totals.len());

        let mut best: Option<(&'a str, Amount)> = None;
        for (sender, total) in totals {
            match best {
                Some((_, best_total)) if best_total >= total => {}
                _ => best = Some((sender, total)),
            }
        }
        best.map(|(sender, _)| sender)
    }
}

#[cfg(test)]
mod tests {
    use std::str::FromStr;

    use super::*;

    fn amount(s: &str) -> Amount {
        Amount::from_str(s).unwrap()
    }

    fn make_tx(
        transaction_number: u64,
        value: &str,
        sender: &str,
        beneficiary: &str,
        issue: Option<(u32, bool)>,
    ) -> Transaction {
        Transaction {
            transaction_number,
            amount: amount(value),
            sender_full_name: sender.into(),
            sender_age: 22,
            beneficiary_full_name: beneficiary.into(),
            beneficiary_age: 33,
            issue_id: issue.map(|(id, _)| id),
            issue_solved: issue.map(|(_, solved)| solved),
            issue_message: issue.map(|(id, _)| format!("issue {id}")),
        }
    }

    fn sample() -> Vec<Transaction> {
        vec![
            make_tx(663458, "430.2", "Tom Shelby", "Alfie Solomons", Some((1, false))),
            make_tx(1284564, "150.2", "Tom Shelby", "Arthur Shelby", Some((2, true))),
            make_tx(1284564, "150.2", "Tom Shelby", "Arthur Shelby", Some((3, false))),
            make_tx(96132456, "67.0", "Aunt Polly", "Aberama Gold", None),
            make_tx(5465465, "985.0", "Arthur Shelby", "Ben Younger", Some((15, false))),
            make_tx(1651665, "97.66", "Tom Shelby", "Oswald Mosley", Some((65, true))),
            make_tx(6516461, "33.22", "Aunt Polly", "MacTavern", Some((3, false))),
        ]
    }

    #[test]
    fn empty_collection_yields_zero_values() {
        let engine = TransactionQueryEngine::new(&[]);
        assert_eq!(engine.total_amount(), Amount::ZERO);
        assert_eq!(engine.total_amount_sent_by("Tom Shelby"), Amount::ZERO);
        assert_eq!(engine.max_amount(), Amount::ZERO);
        assert_eq!(engine.count_unique_clients(), 0);
        assert!(!engine.has_open_compliance_issues("Tom Shelby"));
        assert!(engine.transactions_by_beneficiary_name().is_empty());
        assert!(engine.unsolved_issue_ids().is_empty());
        assert!(engine.all_solved_issue_messages().is_empty());
        assert!(engine.top3_transactions_by_amount().is_empty());
        assert_eq!(engine.top_sender(), None);
    }

    #[test]
    fn total_amount_counts_each_transfer_once() {
        let transactions = sample();
        let engine = TransactionQueryEngine::new(&transactions);
        assert_eq!(engine.total_amount(), amount("1763.28"));
    }

    #[test]
    fn duplicate_records_keep_the_first_amount() {
        let transactions = vec![
            make_tx(1, "10", "A", "B", Some((1, false))),
            make_tx(1, "99", "A", "B", Some((2, false))),
        ];
        let engine = TransactionQueryEngine::new(&transactions);
        assert_eq!(engine.total_amount(), amount("10"));
        assert_eq!(engine.total_amount_sent_by("A"), amount("10"));
        assert_eq!(engine.top3_transactions_by_amount(), vec![&transactions[0]]);
        // max looks at every record
        assert_eq!(engine.max_amount(), amount("99"));
    }

    #[test]
    fn total_amount_sent_by_filters_exact_sender() {
        let transactions = sample();
        let engine = TransactionQueryEngine::new(&transactions);
        assert_eq!(engine.total_amount_sent_by("Tom Shelby"), amount("678.06"));
        assert_eq!(engine.total_amount_sent_by("Aunt Polly"), amount("100.22"));
        assert_eq!(engine.total_amount_sent_by("tom shelby"), Amount::ZERO);
        assert_eq!(engine.total_amount_sent_by("Nobody"), Amount::ZERO);
    }

    #[test]
    fn sender_totals_add_up_to_total_amount() {
        let transactions = sample();
        let engine = TransactionQueryEngine::new(&transactions);
        let senders: BTreeSet<&str> = transactions
            .iter()
            .map(|tx| tx.sender_full_name.as_str())
            .collect();
        let sum: Amount = senders
            .into_iter()
            .map(|sender| engine.total_amount_sent_by(sender))
            .sum();
        assert_eq!(sum, engine.total_amount());
    }

    #[test]
    fn max_amount_is_highest_record_amount() {
        let transactions = sample();
        let engine = TransactionQueryEngine::new(&transactions);
        assert_eq!(engine.max_amount(), amount("985"));
    }

    #[test]
    fn unique_clients_joins_both_roles() {
        let transactions = sample();
        let engine = TransactionQueryEngine::new(&transactions);
        // Arthur Shelby is both a beneficiary and a sender.
        assert_eq!(engine.count_unique_clients(), 8);

        let single = vec![make_tx(1, "1", "A", "B", None)];
        assert_eq!(TransactionQueryEngine::new(&single).count_unique_clients(), 2);
    }

    #[test]
    fn open_issues_look_at_both_roles() {
        let transactions = sample();
        let engine = TransactionQueryEngine::new(&transactions);
        assert!(engine.has_open_compliance_issues("Tom Shelby"));
        assert!(engine.has_open_compliance_issues("Ben Younger"));
        assert!(engine.has_open_compliance_issues("Arthur Shelby"));
        assert!(!engine.has_open_compliance_issues("Aberama Gold"));
        assert!(!engine.has_open_compliance_issues("Oswald Mosley"));
        assert!(!engine.has_open_compliance_issues("Nobody"));
    }

    #[test]
    fn by_beneficiary_keeps_every_record_in_input_order() {
        let transactions = sample();
        let engine = TransactionQueryEngine::new(&transactions);
        let groups = engine.transactions_by_beneficiary_name();

        assert_eq!(groups.len(), 6);
        assert_eq!(groups.values().map(Vec::len).sum::<usize>(), transactions.len());

        let arthur = &groups["Arthur Shelby"];
        assert_eq!(arthur.len(), 2);
        assert_eq!(arthur[0].issue_id, Some(2));
        assert_eq!(arthur[1].issue_id, Some(3));
    }

    #[test]
    fn unsolved_issue_ids_are_distinct() {
        let mut transactions = sample();
        transactions.push(make_tx(7, "1", "A", "B", None));
        let mut unsolved_without_id = make_tx(8, "1", "A", "B", None);
        unsolved_without_id.issue_solved = Some(false);
        transactions.push(unsolved_without_id);

        let engine = TransactionQueryEngine::new(&transactions);
        assert_eq!(
            engine.unsolved_issue_ids(),
            BTreeSet::from([1, 3, 15])
        );
    }

    #[test]
    fn solved_messages_follow_input_order() {
        let mut transactions = sample();
        let mut solved_without_message = make_tx(9, "1", "A", "B", Some((99, true)));
        solved_without_message.issue_message = None;
        transactions.push(solved_without_message);

        let engine = TransactionQueryEngine::new(&transactions);
        assert_eq!(
            engine.all_solved_issue_messages(),
            vec!["issue 2", "issue 65"]
        );
    }

    #[test]
    fn top3_is_sorted_descending_and_deduplicated() {
        let transactions = sample();
        let engine = TransactionQueryEngine::new(&transactions);
        let top: Vec<u64> = engine
            .top3_transactions_by_amount()
            .iter()
            .map(|tx| tx.transaction_number)
            .collect();
        assert_eq!(top, vec![5465465, 663458, 1284564]);
    }

    #[test]
    fn top3_ties_keep_input_order() {
        let transactions = vec![
            make_tx(1, "5", "A", "B", None),
            make_tx(2, "7", "A", "B", None),
            make_tx(3, "5", "A", "B", None),
            make_tx(4, "5", "A", "B", None),
        ];
        let engine = TransactionQueryEngine::new(&transactions);
        let top: Vec<u64> = engine
            .top3_transactions_by_amount()
            .iter()
            .map(|tx| tx.transaction_number)
            .collect();
        assert_eq!(top, vec![2, 1, 3]);
    }

    #[test]
    fn top3_returns_fewer_when_fewer_transfers_exist() {
        let transactions = vec![
            make_tx(1, "5", "A", "B", Some((1, false))),
            make_tx(1, "5", "A", "B", Some((2, false))),
            make_tx(2, "6", "A", "B", None),
        ];
        let engine = TransactionQueryEngine::new(&transactions);
        assert_eq!(engine.top3_transactions_by_amount().len(), 2);
    }

    #[test]
    fn top_sender_sums_deduplicated_transfers() {
        let transactions = sample();
        let engine = TransactionQueryEngine::new(&transactions);
        assert_eq!(engine.top_sender(), Some("Arthur Shelby"));

        let transactions = vec![
            make_tx(1, "60", "A", "X", Some((1, false))),
            make_tx(1, "60", "A", "X", Some((2, false))),
            make_tx(2, "100", "B", "X", None),
        ];
        let engine = TransactionQueryEngine::new(&transactions);
        assert_eq!(engine.top_sender(), Some("B"));
    }

    #[test]
    fn top_sender_tie_goes_to_first_sender_in_input() {
        let transactions = vec![
            make_tx(1, "50", "B", "X", None),
            make_tx(2, "30", "A", "X", None),
            make_tx(3, "20", "A", "X", None),
        ];
        let engine = TransactionQueryEngine::new(&transactions);
        assert_eq!(engine.top_sender(), Some("B"));
    }
}
