use crate::types::{TxnDate, TxnKind};
use rust_decimal::Decimal;
use serde::{Deserialize, Serialize};

/// One row of an ad-hoc bank CSV export, after column mapping.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct CsvTransaction {
    pub date: TxnDate,
    pub description: String,
    pub amount: Decimal,
    pub kind: TxnKind,
    pub category: String,
    pub raw: String,
}
