use log::debug;
use regex::{Match, Regex};
use std::collections::HashSet;

use super::dto::{StatementMetadata, StatementPeriod, StatementReport, StatementTransaction};
use crate::classify;
use crate::errors::ExtractError;
use crate::normalize::{RawAmount, RawDate};
use crate::parsers::traits::Parser;
use crate::types::{TxnDate, TxnKind};

/// Numeric date token at the start of a line (`15/01/2024`, `5-1-24`).
const LEADING_DATE: &str = r"^(\d{1,2}[/-]\d{1,2}[/-]\d{2,4})";

/// A decimal-formatted money token (`450.00`, `12,340.50`).
const AMOUNT_TOKEN: &str = r"\d[\d,]*\.\d{2}";

pub struct StatementParser;

impl Parser for StatementParser {
    type Output = StatementTransaction;

    fn is_supported(_filename: Option<&str>, content: &str) -> bool {
        regex(r"(?m)^\s*\d{1,2}[/-]\d{1,2}[/-]\d{2,4}")
            .map(|re| re.is_match(content))
            .unwrap_or(false)
    }

    fn parse(content: &str) -> Result<Vec<Self::Output>, ExtractError> {
        Ok(parse_text(content))
    }
}

impl StatementParser {
    /// Extract transactions from PDF-extracted statement text.
    ///
    /// Three strategies run in strict order (table, multi-line column,
    /// delimited row) and the first one yielding anything wins outright;
    /// outputs are never mixed. Lines that fail date or amount extraction
    /// are skipped, not fatal.
    pub fn parse(text: &str) -> Vec<StatementTransaction> {
        parse_text(text)
    }

    /// Like [`StatementParser::parse`], plus best-effort statement-level
    /// metadata (bank, account number, period) read from the whole text.
    pub fn parse_report(text: &str) -> StatementReport {
        StatementReport {
            transactions: parse_text(text),
            metadata: extract_metadata(text),
        }
    }
}

fn parse_text(text: &str) -> Vec<StatementTransaction> {
    let lines: Vec<&str> = text.lines().collect();

    let mut txns = table_strategy(&lines);
    if txns.is_empty() {
        txns = column_strategy(&lines);
    }
    if txns.is_empty() {
        txns = delimited_strategy(&lines);
    }
    dedupe_lines(txns)
}

/// Strategy 1: one transaction per line, date first, amounts at the end.
/// With two or more money tokens the second-to-last is the amount and the
/// last is the running balance.
fn table_strategy(lines: &[&str]) -> Vec<StatementTransaction> {
    let (Some(date_re), Some(amount_re)) = (regex(LEADING_DATE), regex(AMOUNT_TOKEN)) else {
        return Vec::new();
    };

    let mut out = Vec::new();
    for line in lines {
        let line = line.trim();
        if line.is_empty() {
            continue;
        }
        // headers and boilerplate
        if line.to_lowercase().contains("statement")
            || (line.contains("Date") && line.contains("Description"))
        {
            continue;
        }

        let Some(date_token) = date_re.captures(line).and_then(|caps| caps.get(1)) else {
            continue;
        };
        let Some(date) = RawDate::from(date_token.as_str()).normalize() else {
            debug!("skipping line with unparseable date: {line}");
            continue;
        };

        let tokens: Vec<Match> = amount_re.find_iter(line).collect();
        if tokens.is_empty() {
            continue;
        }
        let (amount_token, balance_token) = if tokens.len() >= 2 {
            (tokens[tokens.len() - 2], Some(tokens[tokens.len() - 1]))
        } else {
            (tokens[0], None)
        };
        let Some(amount) = RawAmount::from(amount_token.as_str()).normalize() else {
            debug!("skipping line with unparseable amount: {line}");
            continue;
        };
        let balance = balance_token.and_then(|tok| RawAmount::from(tok.as_str()).normalize());

        let description = if amount_token.start() > date_token.end() {
            collapse_whitespace(&line[date_token.end()..amount_token.start()])
        } else {
            String::new()
        };
        let description = if description.is_empty() {
            "Transaction".to_string()
        } else {
            description
        };

        let (category, kind) = classify::categorize_description(&description);
        // the credit marker overrides whatever the description keywords said
        let is_credit = classify::has_credit_marker(line);
        let category = if is_credit && kind == TxnKind::Expense {
            "Other Income"
        } else {
            category
        };

        out.push(StatementTransaction {
            date,
            merchant: classify::extract_merchant(&description),
            description,
            amount,
            kind: if is_credit { TxnKind::Income } else { kind },
            category: category.to_string(),
            balance,
            raw: line.to_string(),
        });
    }
    out
}

enum ColumnState {
    AwaitingDate,
    Accumulating { date: TxnDate, description: String },
}

/// Strategy 2: a dated line opens an entry, following lines extend the
/// description until a line with a money token closes it.
fn column_strategy(lines: &[&str]) -> Vec<StatementTransaction> {
    let (Some(date_re), Some(amount_re)) = (regex(LEADING_DATE), regex(AMOUNT_TOKEN)) else {
        return Vec::new();
    };

    let mut out = Vec::new();
    let mut state = ColumnState::AwaitingDate;

    for line in lines {
        let line = line.trim();
        if line.is_empty() {
            continue;
        }

        // a dated line always (re)starts an entry
        if let Some(token) = date_re.captures(line).and_then(|caps| caps.get(1)) {
            state = match RawDate::from(token.as_str()).normalize() {
                Some(date) => ColumnState::Accumulating {
                    date,
                    description: line[token.end()..].trim().to_string(),
                },
                None => ColumnState::AwaitingDate,
            };
            continue;
        }

        state = match state {
            ColumnState::AwaitingDate => ColumnState::AwaitingDate,
            ColumnState::Accumulating { date, mut description } => match amount_re.find(line) {
                None => {
                    // the description wrapped onto another physical line
                    if !description.is_empty() {
                        description.push(' ');
                    }
                    description.push_str(line);
                    ColumnState::Accumulating { date, description }
                }
                Some(token) => {
                    if let Some(amount) = RawAmount::from(token.as_str()).normalize() {
                        let description = if description.trim().is_empty() {
                            "Transaction".to_string()
                        } else {
                            collapse_whitespace(&description)
                        };
                        let (category, kind) = classify::categorize_description(&description);
                        let is_credit = classify::has_credit_marker(line)
                            || classify::has_credit_marker(&description);
                        out.push(StatementTransaction {
                            date,
                            merchant: classify::extract_merchant(&description),
                            raw: format!("{description} {line}"),
                            description,
                            amount,
                            kind: if is_credit { TxnKind::Income } else { kind },
                            category: category.to_string(),
                            balance: None,
                        });
                    }
                    ColumnState::AwaitingDate
                }
            },
        };
    }
    out
}

/// Strategy 3: comma rows (tab fallback), date in the first field, amount in
/// the first money-looking field after it.
fn delimited_strategy(lines: &[&str]) -> Vec<StatementTransaction> {
    let Some(amount_re) = regex(AMOUNT_TOKEN) else {
        return Vec::new();
    };

    let mut out = Vec::new();
    for line in lines {
        let line = line.trim();
        if line.is_empty() {
            continue;
        }
        let mut fields: Vec<&str> = line.split(',').collect();
        if fields.len() < 3 {
            fields = line.split('\t').collect();
        }
        if fields.len() < 3 {
            continue;
        }

        let Some(date) = RawDate::from(fields[0].trim()).normalize() else {
            continue;
        };

        let mut description = String::new();
        let mut amount_field = None;
        for field in &fields[1..] {
            let field = field.trim();
            if amount_re.is_match(field) {
                amount_field = Some(field);
                break;
            }
            if !description.is_empty() {
                description.push(' ');
            }
            description.push_str(field);
        }
        let Some(amount) = amount_field.and_then(|f| RawAmount::from(f).normalize()) else {
            debug!("skipping delimited row without an amount: {line}");
            continue;
        };
        let description = if description.is_empty() {
            "Transaction".to_string()
        } else {
            description
        };

        let (category, kind) = classify::categorize_description(&description);
        let is_credit = classify::has_credit_marker(&description);

        out.push(StatementTransaction {
            date,
            merchant: classify::extract_merchant(&description),
            description,
            amount,
            kind: if is_credit { TxnKind::Income } else { kind },
            category: category.to_string(),
            balance: None,
            raw: line.to_string(),
        });
    }
    out
}

/// Statement pages repeat rows; keep the first occurrence of each
/// `(date, amount, description-prefix)` key.
fn dedupe_lines(txns: Vec<StatementTransaction>) -> Vec<StatementTransaction> {
    let mut seen = HashSet::new();
    let mut unique = Vec::with_capacity(txns.len());
    for txn in txns {
        let key = (
            txn.date.clone(),
            txn.amount,
            txn.description.chars().take(20).collect::<String>(),
        );
        if seen.insert(key) {
            unique.push(txn);
        }
    }
    unique
}

fn extract_metadata(text: &str) -> StatementMetadata {
    let account_number = regex(r"(?i)account\s*(?:no|number)?\.?\s*:?\s*(\d{4,})")
        .and_then(|re| re.captures(text))
        .and_then(|caps| caps.get(1))
        .map(|m| m.as_str().to_string());

    let period = regex(
        r"(?i)(\d{1,2}[/-]\d{1,2}[/-]\d{2,4})\s*(?:to|[-–])\s*(\d{1,2}[/-]\d{1,2}[/-]\d{2,4})",
    )
    .and_then(|re| re.captures(text))
    .map(|caps| StatementPeriod {
        from: canonical_or_raw(&caps[1]),
        to: canonical_or_raw(&caps[2]),
    });

    StatementMetadata {
        bank_name: classify::identify_source(text).to_string(),
        account_number,
        period,
    }
}

fn canonical_or_raw(token: &str) -> String {
    RawDate::from(token)
        .normalize()
        .map(|date| date.to_string())
        .unwrap_or_else(|| token.to_string())
}

fn collapse_whitespace(text: &str) -> String {
    text.split_whitespace().collect::<Vec<_>>().join(" ")
}

fn regex(pattern: &str) -> Option<Regex> {
    Regex::new(pattern).ok()
}
