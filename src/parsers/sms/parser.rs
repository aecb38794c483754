use chrono::{Local, NaiveTime, Timelike};
use log::debug;
use regex::Regex;
use rust_decimal::Decimal;

use super::dto::SmsTransaction;
use crate::classify;
use crate::errors::{ExtractError, ExtractResult};
use crate::normalize::RawAmount;
use crate::parsers::traits::Parser;
use crate::types::TxnDate;

/// Anything shorter than this cannot be a bank notification.
const MIN_MESSAGE_LEN: usize = 10;

const AMOUNT_PATTERNS: &[&str] = &[
    r"(?i)Rs\.?\s*([0-9,]+(?:\.[0-9]{2})?)",
    r"(?i)INR\.?\s*([0-9,]+(?:\.[0-9]{2})?)",
    r"₹\s*([0-9,]+(?:\.[0-9]{2})?)",
    r"(?i)Rupees?\s*([0-9,]+(?:\.[0-9]{2})?)",
];

const BALANCE_PATTERNS: &[&str] = &[
    r"(?i)(?:bal|balance)[:\s]*(?:Rs\.?|INR\.?|₹)?\s*([0-9,]+(?:\.[0-9]{2})?)",
    r"(?i)(?:avl|available)[:\s]*(?:Rs\.?|INR\.?|₹)?\s*([0-9,]+(?:\.[0-9]{2})?)",
];

const ACCOUNT_PATTERNS: &[&str] = &[
    r"(?i)(?:a/c|ac|acct|account)[:\s]*(?:no\.?\s*)?(?:XX|xx|\*+)?([0-9]{4})",
    r"(?i)(?:ending|linked)\s*(?:with\s*)?([0-9]{4})",
    r"XX([0-9]{4})",
];

const UPI_PATTERNS: &[&str] = &[
    r"([A-Za-z0-9._-]+@[A-Za-z0-9]+)",
    r"(?i)(?:UPI|VPA):\s*([A-Za-z0-9._@-]+)",
];

const REFERENCE_PATTERNS: &[&str] = &[
    r"(?i)(?:ref|txn|transaction)[:\s#]*([A-Za-z0-9]+)",
    r"(?i)UPI[:\s]*([0-9]+)",
];

pub struct SmsParser;

impl Parser for SmsParser {
    type Output = SmsTransaction;

    fn is_supported(_filename: Option<&str>, content: &str) -> bool {
        // a bank notification spells the currency out and says what happened
        let has_amount = matches!(extract_amount(content), Ok(Some(_)));
        has_amount && classify::has_kind_keyword(content)
    }

    fn parse(content: &str) -> Result<Vec<Self::Output>, ExtractError> {
        Ok(parse_multiple(content))
    }
}

impl SmsParser {
    /// Parse a single message body into a transaction.
    ///
    /// Fails on short input, a missing amount, or undeterminable type; every
    /// other field is best-effort optional.
    pub fn parse_single(text: &str) -> ExtractResult<SmsTransaction> {
        let message = text.trim();
        if message.len() < MIN_MESSAGE_LEN {
            return Err(ExtractError::MessageTooShort);
        }

        let amount = extract_amount(message)?.ok_or(ExtractError::AmountNotFound)?;
        let verdict = classify::classify_message_kind(message, amount)
            .ok_or(ExtractError::TypeUndetermined)?;

        let balance = match first_capture(message, BALANCE_PATTERNS)? {
            Some(raw) => RawAmount::from(raw.as_str()).normalize(),
            None => None,
        };

        let now = Local::now().naive_local();
        let time = NaiveTime::from_hms_opt(now.time().hour(), now.time().minute(), 0)
            .unwrap_or_else(|| now.time());

        Ok(SmsTransaction {
            date: TxnDate::from_naive(now.date()),
            time,
            amount,
            kind: verdict.kind,
            category: classify::categorize_message(message, verdict.kind).to_string(),
            bank_name: classify::identify_source(message).to_string(),
            balance,
            merchant: classify::extract_merchant(message),
            upi_id: first_capture(message, UPI_PATTERNS)?,
            account_last4: first_capture(message, ACCOUNT_PATTERNS)?,
            reference: first_capture(message, REFERENCE_PATTERNS)?,
            raw: message.to_string(),
            confidence: verdict.confidence,
        })
    }

    /// Parse a dump of messages separated by blank-line runs.
    ///
    /// Blocks that fail to parse are dropped silently; this never fails as a
    /// whole.
    pub fn parse_multiple(text: &str) -> Vec<SmsTransaction> {
        parse_multiple(text)
    }
}

fn parse_multiple(text: &str) -> Vec<SmsTransaction> {
    text.split("\n\n")
        .map(str::trim)
        .filter(|block| block.len() >= MIN_MESSAGE_LEN)
        .filter_map(|block| match SmsParser::parse_single(block) {
            Ok(txn) => Some(txn),
            Err(err) => {
                debug!("dropping message block: {err}");
                None
            }
        })
        .collect()
}

/// The parseable currency-marked hit closest to the start of the message
/// wins, across all patterns. A trailing "Bal: Rs X" clause therefore never
/// shadows the transaction amount.
fn extract_amount(text: &str) -> ExtractResult<Option<Decimal>> {
    let mut best: Option<(usize, Decimal)> = None;
    for pattern in AMOUNT_PATTERNS {
        let re = compile(pattern)?;
        for caps in re.captures_iter(text) {
            let Some(group) = caps.get(1) else { continue };
            let Some(value) = RawAmount::from(group.as_str()).normalize() else { continue };
            let start = caps.get(0).map(|m| m.start()).unwrap_or(group.start());
            if best.map_or(true, |(earliest, _)| start < earliest) {
                best = Some((start, value));
            }
            break; // this pattern's leftmost parseable hit is enough
        }
    }
    Ok(best.map(|(_, value)| value))
}

fn first_capture(text: &str, patterns: &[&str]) -> ExtractResult<Option<String>> {
    for pattern in patterns {
        let re = compile(pattern)?;
        if let Some(caps) = re.captures(text) {
            if let Some(found) = caps.get(1) {
                return Ok(Some(found.as_str().trim().to_string()));
            }
        }
    }
    Ok(None)
}

fn compile(pattern: &str) -> ExtractResult<Regex> {
    Regex::new(pattern).map_err(|err| ExtractError::ParseFailed(err.to_string()))
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::types::TxnKind;
    use rstest::rstest;
    use std::str::FromStr;

    #[test]
    fn test_parse_single_credit() {
        let txn = SmsParser::parse_single(
            "Rs 500 credited to A/c XX1234 by UPI. Bal: Rs 12,500",
        )
        .unwrap();

        assert_eq!(txn.amount, Decimal::from_str("500.00").unwrap());
        assert_eq!(txn.kind, TxnKind::Income);
        assert_eq!(txn.balance, Some(Decimal::from_str("12500.00").unwrap()));
        assert_eq!(txn.account_last4, Some("1234".to_string()));
        assert_eq!(txn.confidence, 0.9);
    }

    #[test]
    fn test_parse_single_debit_with_merchant() {
        let txn = SmsParser::parse_single(
            "INR 1,500 debited from A/c XX5678 for Swiggy. Avl Bal: Rs 8,000",
        )
        .unwrap();

        assert_eq!(txn.amount, Decimal::from_str("1500.00").unwrap());
        assert_eq!(txn.kind, TxnKind::Expense);
        assert_eq!(txn.category, "Food");
        assert_eq!(txn.merchant, Some("Swiggy".to_string()));
        assert_eq!(txn.balance, Some(Decimal::from_str("8000.00").unwrap()));
        assert_eq!(txn.account_last4, Some("5678".to_string()));
    }

    #[test]
    fn test_parse_single_stamps_wall_clock_date() {
        let txn = SmsParser::parse_single("Rs 500 credited to your account").unwrap();
        assert_eq!(txn.date, TxnDate::today());
    }

    #[test]
    fn test_parse_single_extracts_bank_and_reference() {
        let txn = SmsParser::parse_single(
            "HDFCBK: Rs 2,000 debited from A/c XX9012 Ref 4417889911",
        )
        .unwrap();

        assert_eq!(txn.bank_name, "HDFC");
        assert_eq!(txn.reference, Some("4417889911".to_string()));
        assert_eq!(txn.account_last4, Some("9012".to_string()));
    }

    #[test]
    fn test_parse_single_extracts_upi_handle() {
        let txn = SmsParser::parse_single(
            "Rs 250 sent to friend via UPI id friend.name@oksbi on 15-01",
        )
        .unwrap();

        assert_eq!(txn.upi_id, Some("friend.name@oksbi".to_string()));
        assert_eq!(txn.kind, TxnKind::Expense);
    }

    #[test]
    fn test_parse_single_magnitude_fallback() {
        // no type keyword at all: large amounts default to income at 0.6
        let txn = SmsParser::parse_single("Rs 9,000 transaction alert on XX1122").unwrap();
        assert_eq!(txn.kind, TxnKind::Income);
        assert_eq!(txn.confidence, 0.6);
    }

    #[rstest]
    #[case("Rs 500", ExtractError::MessageTooShort)]
    #[case("no money mentioned in this message", ExtractError::AmountNotFound)]
    #[case("Rs 900 transaction alert on XX1122", ExtractError::TypeUndetermined)]
    fn test_parse_single_failures(#[case] text: &str, #[case] expected: ExtractError) {
        let result = SmsParser::parse_single(text);
        assert!(matches!(
            (result.unwrap_err(), expected),
            (ExtractError::MessageTooShort, ExtractError::MessageTooShort)
                | (ExtractError::AmountNotFound, ExtractError::AmountNotFound)
                | (ExtractError::TypeUndetermined, ExtractError::TypeUndetermined)
        ));
    }

    #[test]
    fn test_parse_multiple_drops_malformed_blocks() {
        let dump = "Rs 500 credited to A/c XX1234 by UPI\n\n\
                    this block mentions no amount at all\n\n\
                    short";

        let txns = SmsParser::parse_multiple(dump);
        assert_eq!(txns.len(), 1);
        assert_eq!(txns[0].amount, Decimal::from_str("500.00").unwrap());
    }

    #[test]
    fn test_parse_multiple_never_fails() {
        assert!(SmsParser::parse_multiple("").is_empty());
        assert!(SmsParser::parse_multiple("\n\n\n\n").is_empty());
    }

    #[rstest]
    #[case("Rs 500 credited to A/c XX1234", true)]
    #[case("15/01/2024,UPI-SWIGGY,450.00", false)] // bare numbers, no currency word
    #[case("hello there, how are you doing today", false)]
    fn test_is_supported(#[case] content: &str, #[case] expected: bool) {
        assert_eq!(SmsParser::is_supported(None, content), expected);
    }
}
