//! One-line free-text entry parsing ("500 swiggy", "earned 1000 uber").
//!
//! Unlike the other parsers this produces a single presumptive record, so it
//! lives outside the builder's format auto-detection.

use regex::Regex;
use rust_decimal::Decimal;
use serde::{Deserialize, Serialize};

use crate::classify::MAGNITUDE_INCOME_THRESHOLD;
use crate::types::TxnKind;

const INCOME_KEYWORDS: &[&str] = &[
    "earned", "received", "got", "salary", "payment", "credit", "credited",
    "income", "bonus", "tip", "tips", "cashback", "refund", "mila", "aaya",
];

const EXPENSE_KEYWORDS: &[&str] = &[
    "spent", "paid", "bought", "expense", "debit", "debited", "purchase",
    "bill", "rent", "emi", "fuel", "petrol", "diesel", "kharch", "diya",
];

/// Category patterns scanned in full; the last matching group wins, so the
/// more specific groups sit at the bottom of the table.
const CATEGORY_RULES: &[(&str, &[&str])] = &[
    ("Food", &["swiggy", "zomato", "food", "lunch", "dinner", "breakfast", "chai", "coffee", "restaurant", "hotel"]),
    ("Transport", &["uber", "ola", "rapido", "petrol", "diesel", "fuel", "metro", "auto", "cab", "taxi"]),
    ("Shopping", &["amazon", "flipkart", "myntra", "shopping", "clothes", "shoes"]),
    ("Bills", &["electricity", "water", "gas", "wifi", "broadband", "phone", "mobile", "recharge"]),
    ("Rent", &["rent", "lease", "housing", "room"]),
    ("Health", &["medicine", "medical", "doctor", "hospital", "pharmacy"]),
    ("Entertainment", &["movie", "netflix", "spotify", "hotstar", "game"]),
    ("Salary", &["salary", "wage", "payment", "client"]),
    ("Delivery", &["swiggy delivery", "zomato delivery", "uber eats", "delivery earning"]),
    ("Ride", &["uber ride", "ola ride", "rapido ride", "ride earning"]),
];

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct QuickEntry {
    pub amount: Decimal,
    pub kind: TxnKind,
    pub category: String,
    pub description: String,
    pub confidence: f32,
}

/// Parse a quick one-line entry. Returns `None` when no positive amount can
/// be found; everything else is presumptive.
pub fn parse_quick_entry(input: &str) -> Option<QuickEntry> {
    let text = input.trim().to_lowercase();
    if text.is_empty() {
        return None;
    }

    let amount_re = Regex::new(r"\d+(?:,\d{3})*(?:\.\d{2})?").ok()?;
    let found = amount_re.find(&text)?;
    let amount = found.as_str().replace(',', "").parse::<Decimal>().ok()?;
    if amount.is_zero() {
        return None;
    }

    // keyword evidence; the expense list is scanned second and may override
    let mut kind = TxnKind::Expense;
    let mut confidence = 0.7;
    for keyword in INCOME_KEYWORDS {
        if text.contains(keyword) {
            kind = TxnKind::Income;
            confidence = 0.9;
            break;
        }
    }
    for keyword in EXPENSE_KEYWORDS {
        if text.contains(keyword) {
            kind = TxnKind::Expense;
            confidence = 0.9;
            break;
        }
    }

    // large amount with no clear keyword: likely income
    if amount > Decimal::from(MAGNITUDE_INCOME_THRESHOLD) && confidence < 0.9 {
        kind = TxnKind::Income;
        confidence = 0.6;
    }

    let mut category = match kind {
        TxnKind::Income => "Income",
        TxnKind::Expense => "Other",
    };
    for &(name, keywords) in CATEGORY_RULES {
        if keywords.iter().any(|k| text.contains(k)) {
            category = name;
        }
    }

    let description = build_description(&text, found.as_str(), kind, amount)?;

    Some(QuickEntry {
        amount: amount.round_dp(2),
        kind,
        category: category.to_string(),
        description,
        confidence,
    })
}

fn build_description(
    text: &str,
    amount_token: &str,
    kind: TxnKind,
    amount: Decimal,
) -> Option<String> {
    let without_amount = text.replacen(amount_token, "", 1);
    let currency_re = Regex::new(r"(?i)\b(?:aed|rs|inr|rupees?)\b|[₹$]").ok()?;
    let cleaned = currency_re.replace_all(&without_amount, "");

    let mut description: String = cleaned
        .split_whitespace()
        .collect::<Vec<_>>()
        .join(" ")
        .chars()
        .take(100)
        .collect();
    if description.is_empty() {
        description = match kind {
            TxnKind::Income => format!("Earned AED {amount}"),
            TxnKind::Expense => format!("Spent AED {amount}"),
        };
    }
    Some(description)
}
