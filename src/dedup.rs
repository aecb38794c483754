//! Collapse of duplicate extractions.
//!
//! Parsers can legitimately surface the same transaction more than once (a
//! value repeated across statement pages, overlapping SMS dumps). The pass is
//! lossy by design and never fails.

use crate::types::Transaction;
use std::collections::HashSet;

/// Keeps only the first occurrence (in input order) of each
/// `(date, amount, first 20 chars of raw text)` key.
pub fn dedupe(transactions: Vec<Transaction>) -> Vec<Transaction> {
    let mut seen = HashSet::new();
    let mut unique = Vec::with_capacity(transactions.len());

    for txn in transactions {
        if seen.insert(txn.dedup_key()) {
            unique.push(txn);
        }
    }

    unique
}
