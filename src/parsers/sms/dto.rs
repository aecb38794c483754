use crate::types::{TxnDate, TxnKind};
use chrono::NaiveTime;
use rust_decimal::Decimal;
use serde::{Deserialize, Serialize};

/// A transaction extracted from a single bank SMS.
///
/// The SMS text carries no reliable timestamp, so `date`/`time` are the
/// wall-clock moment of parsing. Fields the message did not mention are
/// `None`, never errors.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct SmsTransaction {
    pub date: TxnDate,
    pub time: NaiveTime,
    pub amount: Decimal,
    pub kind: TxnKind,
    pub category: String,
    pub bank_name: String,
    pub balance: Option<Decimal>,
    pub merchant: Option<String>,
    pub upi_id: Option<String>,
    pub account_last4: Option<String>,
    pub reference: Option<String>,
    pub raw: String,
    pub confidence: f32,
}
