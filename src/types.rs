use crate::{builder::ParsedTransaction, classify, errors::ExtractError};
use chrono::{NaiveDate, NaiveTime};
use rust_decimal::Decimal;
use serde::{Deserialize, Serialize};
use std::fmt;

use crate::parsers::prelude::*;

/// Receita ou despesa. O valor em si nunca carrega sinal; quem carrega é o tipo.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum TxnKind {
    Income,
    Expense,
}

impl TxnKind {
    /// Categoria usada quando nenhuma regra de classificação casa com a descrição.
    pub fn fallback_category(&self) -> &'static str {
        match self {
            TxnKind::Income => "Other Income",
            TxnKind::Expense => "Other Expense",
        }
    }
}

/// Data canônica no formato `YYYY-MM-DD`.
///
/// O dia é validado apenas em `1..=31` para qualquer mês; a validade real do
/// calendário (fevereiro, anos bissextos) não é imposta, para que datas vindas
/// de OCR ruidoso ainda passem.
#[derive(Debug, Clone, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(transparent)]
pub struct TxnDate(String);

impl TxnDate {
    pub fn from_ymd(year: u32, month: u32, day: u32) -> Option<Self> {
        if !(1..=12).contains(&month) || !(1..=31).contains(&day) {
            return None;
        }
        Some(Self(format!("{year:04}-{month:02}-{day:02}")))
    }

    pub fn from_naive(date: NaiveDate) -> Self {
        Self(date.format("%Y-%m-%d").to_string())
    }

    /// Data local atual (usada pelo caminho SMS, que não traz data confiável).
    pub fn today() -> Self {
        Self::from_naive(chrono::Local::now().date_naive())
    }

    pub fn as_str(&self) -> &str {
        &self.0
    }

    /// Conversão estrita para `chrono`; datas lenientes como `2024-02-31`
    /// retornam `None` aqui.
    pub fn to_naive_date(&self) -> Option<NaiveDate> {
        NaiveDate::parse_from_str(&self.0, "%Y-%m-%d").ok()
    }
}

impl fmt::Display for TxnDate {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.0)
    }
}

/// A canonical transaction candidate, produced by one of the parsers and
/// either kept or dropped by the deduplication pass. Never mutated after
/// construction.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Transaction {
    pub date: TxnDate,
    pub time: Option<NaiveTime>,
    pub amount: Decimal,
    pub kind: TxnKind,
    pub category: String,
    pub merchant: Option<String>,
    pub source_name: String,
    pub balance_after: Option<Decimal>,
    pub raw_text: String,
    pub confidence: Option<f32>,
}

impl Transaction {
    /// Composite key used by the deduplication pass: date, amount and the
    /// first 20 characters of the raw text.
    pub fn dedup_key(&self) -> (String, String, String) {
        (
            self.date.as_str().to_string(),
            self.amount.to_string(),
            self.raw_text.chars().take(20).collect(),
        )
    }
}

impl TryFrom<ParsedTransaction> for Transaction {
    type Error = ExtractError;

    fn try_from(parsed: ParsedTransaction) -> Result<Self, Self::Error> {
        match parsed {
            ParsedTransaction::Sms(sms) => sms.try_into(),
            ParsedTransaction::Statement(stmt) => stmt.try_into(),
            ParsedTransaction::Csv(csv) => csv.try_into(),
        }
    }
}

impl TryFrom<SmsTransaction> for Transaction {
    type Error = ExtractError;

    fn try_from(sms: SmsTransaction) -> Result<Self, Self::Error> {
        Ok(Transaction {
            date: sms.date,
            time: Some(sms.time),
            amount: sms.amount,
            kind: sms.kind,
            category: sms.category,
            merchant: sms.merchant,
            source_name: sms.bank_name,
            balance_after: sms.balance,
            raw_text: sms.raw,
            confidence: Some(sms.confidence),
        })
    }
}

impl TryFrom<StatementTransaction> for Transaction {
    type Error = ExtractError;

    fn try_from(stmt: StatementTransaction) -> Result<Self, Self::Error> {
        let source_name = classify::identify_source(&stmt.raw).to_string();
        Ok(Transaction {
            date: stmt.date,
            time: None,
            amount: stmt.amount,
            kind: stmt.kind,
            category: stmt.category,
            merchant: stmt.merchant,
            source_name,
            balance_after: stmt.balance,
            raw_text: stmt.raw,
            confidence: None,
        })
    }
}

impl TryFrom<CsvTransaction> for Transaction {
    type Error = ExtractError;

    fn try_from(csv: CsvTransaction) -> Result<Self, Self::Error> {
        let source_name = classify::identify_source(&csv.raw).to_string();
        Ok(Transaction {
            date: csv.date,
            time: None,
            amount: csv.amount,
            kind: csv.kind,
            category: csv.category,
            merchant: None,
            source_name,
            balance_after: None,
            raw_text: csv.raw,
            confidence: None,
        })
    }
}
