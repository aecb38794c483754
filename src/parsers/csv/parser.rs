use csv::ReaderBuilder;
use log::warn;
use rust_decimal::Decimal;

use super::dto::CsvTransaction;
use crate::classify;
use crate::errors::ExtractError;
use crate::normalize::{parse_signed, RawDate};
use crate::parsers::traits::Parser;
use crate::types::TxnKind;

/// Índices das colunas semânticas descobertas no cabeçalho.
///
/// O mapeamento é difuso: cada célula do cabeçalho é minusculizada e
/// reduzida a letras antes de casar com o vocabulário conhecido. A última
/// coluna que casar com um papel fica com ele.
#[derive(Debug, Default, Clone)]
struct ColumnMap {
    date: Option<usize>,
    description: Option<usize>,
    amount: Option<usize>,
    credit: Option<usize>,
    debit: Option<usize>,
    kind: Option<usize>,
    category: Option<usize>,
}

impl ColumnMap {
    fn from_headers<'a>(headers: impl Iterator<Item = &'a str>) -> Self {
        let mut map = ColumnMap::default();
        for (index, column) in headers.enumerate() {
            let key: String = column
                .to_lowercase()
                .chars()
                .filter(|c| c.is_ascii_lowercase())
                .collect();

            if key.contains("date") {
                map.date = Some(index);
            }
            if key.contains("description") || key.contains("narration") || key.contains("particular")
            {
                map.description = Some(index);
            }
            if key == "amount" || key == "txnamount" {
                map.amount = Some(index);
            }
            if key == "credit" || key == "cr" || key == "deposit" {
                map.credit = Some(index);
            }
            if key == "debit" || key == "dr" || key == "withdrawal" {
                map.debit = Some(index);
            }
            if key == "type" || key == "transactiontype" {
                map.kind = Some(index);
            }
            if key == "category" || key == "tag" {
                map.category = Some(index);
            }
        }
        map
    }

    /// Uma data e (um valor único ou o par crédito/débito) são o mínimo.
    fn has_required(&self) -> bool {
        self.date.is_some()
            && (self.amount.is_some() || (self.credit.is_some() && self.debit.is_some()))
    }
}

pub struct CsvParser;

impl Parser for CsvParser {
    type Output = CsvTransaction;

    fn is_supported(filename: Option<&str>, content: &str) -> bool {
        let has_csv_extension = filename
            .map(|name| name.to_lowercase().ends_with(".csv"))
            .unwrap_or(false);

        let first_line = content.lines().next().unwrap_or("");
        let delimiter = detect_delimiter(first_line) as char;
        let map = ColumnMap::from_headers(first_line.split(delimiter).map(str::trim));
        let looks_like_csv = map.has_required();

        match filename {
            Some(_) => has_csv_extension && looks_like_csv,
            None => looks_like_csv,
        }
    }

    fn parse(content: &str) -> Result<Vec<Self::Output>, ExtractError> {
        let header_line = content
            .lines()
            .find(|line| !line.trim().is_empty())
            .ok_or(ExtractError::EmptyInput)?;
        let delimiter = detect_delimiter(header_line);

        let mut reader = ReaderBuilder::new()
            .delimiter(delimiter)
            .has_headers(true)
            .flexible(true)
            .from_reader(content.trim_start().as_bytes());

        let headers = reader
            .headers()
            .map_err(|err| ExtractError::ParseFailed(format!("CSV header error: {err}")))?
            .clone();
        let map = ColumnMap::from_headers(headers.iter().map(str::trim));

        if !map.has_required() {
            return Err(ExtractError::MissingRequiredColumns(
                "CSV must have Date and Amount (or Credit/Debit) columns. \
                 Supported headers: Date, Amount, Description, Type, Credit, Debit"
                    .to_string(),
            ));
        }

        let mut transactions = Vec::new();
        for (index, result) in reader.records().enumerate() {
            let row_number = index + 2; // 1-based, after the header
            let record = match result {
                Ok(record) => record,
                Err(err) => {
                    warn!("skipping row {row_number}: {err}");
                    continue;
                }
            };
            if record.len() < 2 {
                continue;
            }
            match parse_row(&record, &map, delimiter) {
                Some(txn) => transactions.push(txn),
                None => warn!("skipping row {row_number}: no date or usable amount"),
            }
        }

        Ok(transactions)
    }
}

/// Tab wins outright; semicolon wins over comma by count; comma otherwise.
fn detect_delimiter(header_line: &str) -> u8 {
    let commas = header_line.matches(',').count();
    let semicolons = header_line.matches(';').count();
    let tabs = header_line.matches('\t').count();

    if tabs > 0 {
        b'\t'
    } else if semicolons > commas {
        b';'
    } else {
        b','
    }
}

fn parse_row(record: &csv::StringRecord, map: &ColumnMap, delimiter: u8) -> Option<CsvTransaction> {
    let field = |index: Option<usize>| index.and_then(|i| record.get(i)).map(str::trim);

    let date = RawDate::from(field(map.date)?).normalize()?;
    let description = field(map.description)
        .filter(|cell| !cell.is_empty())
        .unwrap_or("Transaction")
        .to_string();

    let (amount, kind) = if let (Some(credit_idx), Some(debit_idx)) = (map.credit, map.debit) {
        // separate credit/debit columns; a row with neither is dropped
        let credit = cell_decimal(record.get(credit_idx));
        let debit = cell_decimal(record.get(debit_idx));
        if credit > Decimal::ZERO {
            (credit, TxnKind::Income)
        } else if debit > Decimal::ZERO {
            (debit, TxnKind::Expense)
        } else {
            return None;
        }
    } else {
        // single signed column; the sign is the fallback type signal
        let signed = parse_signed(field(map.amount)?)?;
        let kind = match field(map.kind) {
            Some(cell) => {
                let cell = cell.to_lowercase();
                if cell.contains("credit") || cell.contains("deposit") {
                    TxnKind::Income
                } else {
                    TxnKind::Expense
                }
            }
            None => {
                if signed > Decimal::ZERO {
                    TxnKind::Income
                } else {
                    TxnKind::Expense
                }
            }
        };
        (signed.abs(), kind)
    };

    let category = field(map.category)
        .filter(|cell| !cell.is_empty())
        .map(String::from)
        .unwrap_or_else(|| classify::categorize_for_kind(&description, kind).to_string());

    Some(CsvTransaction {
        date,
        description,
        amount: amount.round_dp(2),
        kind,
        category,
        raw: record
            .iter()
            .collect::<Vec<_>>()
            .join(&(delimiter as char).to_string()),
    })
}

/// Célula de crédito/débito: só dígitos e ponto contam; vazio vira zero.
fn cell_decimal(cell: Option<&str>) -> Decimal {
    let token: String = cell
        .unwrap_or("")
        .chars()
        .filter(|c| c.is_ascii_digit() || *c == '.')
        .collect();
    token.parse::<Decimal>().unwrap_or(Decimal::ZERO)
}
