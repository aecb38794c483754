use std::fs;

use crate::{
    dedup,
    errors::{ExtractError, ExtractResult},
    parsers::prelude::*,
    types::Transaction,
};
use serde::{Deserialize, Serialize};

#[derive(Debug, Clone, Serialize, Deserialize)]
pub enum ParsedTransaction {
    Sms(SmsTransaction),
    Statement(StatementTransaction),
    Csv(CsvTransaction),
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum InputFormat {
    #[serde(rename = "sms")]
    Sms,
    #[serde(rename = "statement")]
    Statement,
    #[serde(rename = "csv")]
    Csv,
}

impl InputFormat {
    fn parse_raw(&self, content: &str) -> Result<Vec<ParsedTransaction>, ExtractError> {
        match self {
            InputFormat::Sms => {
                let transactions = <SmsParser as Parser>::parse(content)?;
                Ok(transactions.into_iter().map(ParsedTransaction::Sms).collect())
            }
            InputFormat::Statement => {
                let transactions = StatementParser::parse(content);
                Ok(transactions
                    .into_iter()
                    .map(ParsedTransaction::Statement)
                    .collect())
            }
            InputFormat::Csv => {
                let transactions = <CsvParser as Parser>::parse(content)?;
                Ok(transactions.into_iter().map(ParsedTransaction::Csv).collect())
            }
        }
    }

    fn parse<T>(&self, content: &str) -> Result<Vec<T>, ExtractError>
    where
        T: TryFrom<ParsedTransaction, Error = ExtractError>,
    {
        self.parse_raw(content)?
            .into_iter()
            .map(T::try_from)
            .collect()
    }

    /// CSV claims structured headers first, SMS claims currency-worded
    /// prose, and statement text is the fallback for anything with dated
    /// lines.
    fn detect(filename: Option<&str>, content: Option<&str>) -> Result<Self, ExtractError> {
        if let Some(content) = content {
            if CsvParser::is_supported(filename, content) {
                return Ok(InputFormat::Csv);
            }
            if SmsParser::is_supported(filename, content) {
                return Ok(InputFormat::Sms);
            }
            if StatementParser::is_supported(filename, content) {
                return Ok(InputFormat::Statement);
            }
        }

        if let Some(filename) = filename {
            if filename.to_lowercase().ends_with(".csv") {
                return Ok(InputFormat::Csv);
            }
        }

        Err(ExtractError::UnrecognizedFormat)
    }
}

#[derive(Default)]
pub struct ExtractorBuilder {
    content: Option<String>,
    filepath: Option<String>,
    format: Option<InputFormat>,
}

impl ExtractorBuilder {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn content(mut self, content: &str) -> Self {
        self.content = Some(content.to_string());
        self
    }

    pub fn filename(mut self, filename: &str) -> Self {
        self.filepath = Some(filename.to_string());
        self
    }

    pub fn format(mut self, format: InputFormat) -> Self {
        self.format = Some(format);
        self
    }

    /// Parse into canonical transactions and run the deduplication pass.
    pub fn parse(self) -> ExtractResult<Vec<Transaction>> {
        Ok(dedup::dedupe(self.parse_into::<Transaction>()?))
    }

    pub fn parse_into<T>(self) -> ExtractResult<Vec<T>>
    where
        T: TryFrom<ParsedTransaction, Error = ExtractError>,
    {
        let content = match self.content {
            Some(content) => content,
            None => {
                let path = self
                    .filepath
                    .clone()
                    .ok_or(ExtractError::MissingContentAndFilepath)?;
                fs::read_to_string(path)?
            }
        };

        if content.trim().is_empty() {
            return Err(ExtractError::EmptyInput);
        }

        let format = match self.format {
            Some(format) => format,
            None => InputFormat::detect(self.filepath.as_deref(), Some(&content))?,
        };

        format.parse(&content)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::types::TxnKind;
    use rstest::rstest;
    use rust_decimal::Decimal;
    use std::str::FromStr;

    const SAMPLE_SMS_DUMP: &str = "\
Rs 500 credited to A/c XX1234 by UPI. Bal: Rs 12,500\n\n\
INR 1,500 debited from A/c XX5678 for Swiggy. Avl Bal: Rs 8,000\n";

    const SAMPLE_CSV: &str = "\
Date,Description,Amount\n\
15/01/2024,UPI payment to friend,-450.00\n";

    const SAMPLE_STATEMENT: &str = "\
15/01/2024  UPI-SWIGGY-ORDER-4417  450.00  12,340.50\n\
16/01/2024  NEFT CR-ACME CORP  85,000.00  97,340.50\n";

    #[rstest]
    #[case(SAMPLE_CSV, InputFormat::Csv)]
    #[case(SAMPLE_SMS_DUMP, InputFormat::Sms)]
    #[case(SAMPLE_STATEMENT, InputFormat::Statement)]
    fn test_detect_by_content(#[case] content: &str, #[case] expected: InputFormat) {
        assert_eq!(InputFormat::detect(None, Some(content)).unwrap(), expected);
    }

    #[test]
    fn test_detect_unrecognized() {
        let result = InputFormat::detect(None, Some("completely opaque text"));
        assert!(matches!(result, Err(ExtractError::UnrecognizedFormat)));
    }

    #[test]
    fn test_builder_new() {
        let builder = ExtractorBuilder::new();
        assert!(builder.content.is_none());
        assert!(builder.filepath.is_none());
        assert!(builder.format.is_none());
    }

    #[test]
    fn test_builder_chaining() {
        let builder = ExtractorBuilder::new()
            .content("content")
            .filename("export.csv")
            .format(InputFormat::Csv);

        assert!(builder.content.is_some());
        assert!(builder.filepath.is_some());
        assert_eq!(builder.format, Some(InputFormat::Csv));
    }

    #[test]
    fn test_parse_no_content_no_filepath() {
        let result = ExtractorBuilder::new().parse();
        assert!(matches!(
            result,
            Err(ExtractError::MissingContentAndFilepath)
        ));
    }

    #[test]
    fn test_parse_empty_input() {
        let result = ExtractorBuilder::new().content("   \n  ").parse();
        assert!(matches!(result, Err(ExtractError::EmptyInput)));
    }

    #[test]
    fn test_parse_sms_dump() {
        let transactions = ExtractorBuilder::new()
            .content(SAMPLE_SMS_DUMP)
            .parse()
            .unwrap();

        assert_eq!(transactions.len(), 2);
        assert_eq!(transactions[0].kind, TxnKind::Income);
        assert_eq!(transactions[1].kind, TxnKind::Expense);
        assert_eq!(transactions[1].merchant, Some("Swiggy".to_string()));
        assert!(transactions.iter().all(|t| t.confidence.is_some()));
    }

    #[test]
    fn test_parse_statement_with_explicit_format() {
        let transactions = ExtractorBuilder::new()
            .content(SAMPLE_STATEMENT)
            .format(InputFormat::Statement)
            .parse()
            .unwrap();

        assert_eq!(transactions.len(), 2);
        assert_eq!(
            transactions[0].amount,
            Decimal::from_str("450.00").unwrap()
        );
        assert!(transactions.iter().all(|t| t.confidence.is_none()));
    }

    #[test]
    fn test_parse_csv_content() {
        let transactions = ExtractorBuilder::new().content(SAMPLE_CSV).parse().unwrap();
        assert_eq!(transactions.len(), 1);
        assert_eq!(transactions[0].kind, TxnKind::Expense);
        assert_eq!(transactions[0].raw_text, "15/01/2024,UPI payment to friend,-450.00");
    }

    #[test]
    fn test_duplicate_messages_collapse_after_conversion() {
        // identical message repeated in one dump: one canonical record
        let dump = "Rs 500 credited to A/c XX1234 by UPI\n\n\
                    Rs 500 credited to A/c XX1234 by UPI\n";
        let transactions = ExtractorBuilder::new().content(dump).parse().unwrap();
        assert_eq!(transactions.len(), 1);
    }

    #[test]
    fn test_parse_into_with_explicit_format() {
        let parsed = ExtractorBuilder::new()
            .content(SAMPLE_CSV)
            .format(InputFormat::Csv)
            .parse_into::<Transaction>()
            .unwrap();
        assert_eq!(parsed.len(), 1);
    }

    #[test]
    fn test_format_serialization() {
        let json = serde_json::to_string(&InputFormat::Statement).unwrap();
        assert!(json.contains("statement"));

        let deserialized: InputFormat = serde_json::from_str(&json).unwrap();
        assert_eq!(deserialized, InputFormat::Statement);
    }
}
