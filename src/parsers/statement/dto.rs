use crate::types::{TxnDate, TxnKind};
use rust_decimal::Decimal;
use serde::{Deserialize, Serialize};

/// One transaction line recovered from PDF-extracted statement text.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct StatementTransaction {
    pub date: TxnDate,
    pub description: String,
    pub amount: Decimal,
    pub kind: TxnKind,
    pub category: String,
    pub merchant: Option<String>,
    /// Running balance, when the line carried one (table layouts).
    pub balance: Option<Decimal>,
    pub raw: String,
}

/// Statement-level context, extracted independently of the per-line pass.
/// Everything here is best-effort.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct StatementMetadata {
    pub bank_name: String,
    pub account_number: Option<String>,
    pub period: Option<StatementPeriod>,
}

/// Período coberto pelo extrato. Cada lado fica canônico (`YYYY-MM-DD`)
/// quando normaliza; caso contrário o token original é mantido como veio.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct StatementPeriod {
    pub from: String,
    pub to: String,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct StatementReport {
    pub transactions: Vec<StatementTransaction>,
    pub metadata: StatementMetadata,
}
