//! Static classification tables shared by every parser.
//!
//! Each classifier is an ordered table walked by a first-match-wins routine,
//! so the tables stay independently testable and no global mutable state is
//! needed anywhere in the engine.

use crate::types::TxnKind;
use regex::Regex;
use rust_decimal::Decimal;

pub const UNKNOWN_SOURCE: &str = "UNKNOWN";

/// Amounts above this (in the source currency unit) default to income when no
/// keyword evidence exists.
pub const MAGNITUDE_INCOME_THRESHOLD: u32 = 5000;

/// Known bank / payment-provider name patterns, in priority order.
const BANKS: &[(&str, &[&str])] = &[
    ("HDFC", &["hdfc"]),
    ("ICICI", &["icici"]),
    ("SBI", &["sbi", "state bank"]),
    ("AXIS", &["axis"]),
    ("KOTAK", &["kotak"]),
    ("PNB", &["pnb", "punjab national"]),
    ("BOB", &["bob", "bank of baroda"]),
    ("CANARA", &["canara"]),
    ("UNION", &["union"]),
    ("IDBI", &["idbi"]),
    ("YES", &["yes bank", "yesb"]),
    ("INDUSIND", &["indusind"]),
    ("PAYTM", &["paytm"]),
    ("PHONEPE", &["phonepe"]),
    ("GPAY", &["gpay", "google pay"]),
];

/// First bank whose pattern occurs in the text wins; `UNKNOWN` otherwise.
pub fn identify_source(text: &str) -> &'static str {
    let lower = text.to_lowercase();
    BANKS
        .iter()
        .find(|(_, patterns)| patterns.iter().any(|p| lower.contains(p)))
        .map(|(name, _)| *name)
        .unwrap_or(UNKNOWN_SOURCE)
}

/// A keyword matched either as a plain substring or bounded on the right
/// (so `cr` hits "500cr" and "NEFT Cr" but not "credit").
#[derive(Debug, Clone, Copy)]
pub enum Keyword {
    Sub(&'static str),
    Bound(&'static str),
}

impl Keyword {
    fn matches(&self, lower: &str) -> bool {
        match self {
            Keyword::Sub(k) => lower.contains(k),
            Keyword::Bound(k) => has_bounded(lower, k),
        }
    }
}

/// `needle` present with no word character immediately after it.
fn has_bounded(lower: &str, needle: &str) -> bool {
    let bytes = lower.as_bytes();
    let mut start = 0;
    while let Some(pos) = lower[start..].find(needle) {
        let end = start + pos + needle.len();
        let boundary = match bytes.get(end) {
            Some(&b) => !(b.is_ascii_alphanumeric() || b == b'_'),
            None => true,
        };
        if boundary {
            return true;
        }
        start += pos + 1;
    }
    false
}

const INCOME_KEYWORDS: &[Keyword] = &[
    Keyword::Sub("credited"),
    Keyword::Sub("received"),
    Keyword::Sub("deposited"),
    Keyword::Sub("added"),
    Keyword::Bound("cr"),
    Keyword::Sub("refund"),
    Keyword::Sub("cashback"),
];

const EXPENSE_KEYWORDS: &[Keyword] = &[
    Keyword::Sub("debited"),
    Keyword::Sub("withdrawn"),
    Keyword::Sub("paid"),
    Keyword::Sub("spent"),
    Keyword::Bound("dr"),
    Keyword::Sub("purchase"),
    Keyword::Sub("transferred to"),
    Keyword::Sub("sent to"),
];

#[derive(Debug, Clone, Copy, PartialEq)]
pub struct KindVerdict {
    pub kind: TxnKind,
    pub confidence: f32,
}

/// Income/expense classification for message-style input (SMS).
///
/// The income list is tested first, then the expense list; a keyword hit is
/// worth 0.9. With no keyword evidence, large amounts fall back to income at
/// 0.6 and everything else is unclassifiable (`None`).
pub fn classify_message_kind(text: &str, amount: Decimal) -> Option<KindVerdict> {
    let lower = text.to_lowercase();
    if INCOME_KEYWORDS.iter().any(|k| k.matches(&lower)) {
        return Some(KindVerdict { kind: TxnKind::Income, confidence: 0.9 });
    }
    if EXPENSE_KEYWORDS.iter().any(|k| k.matches(&lower)) {
        return Some(KindVerdict { kind: TxnKind::Expense, confidence: 0.9 });
    }
    if amount > Decimal::from(MAGNITUDE_INCOME_THRESHOLD) {
        return Some(KindVerdict { kind: TxnKind::Income, confidence: 0.6 });
    }
    None
}

/// True when the text carries any income/expense keyword at all. Used by
/// format detection.
pub fn has_kind_keyword(text: &str) -> bool {
    let lower = text.to_lowercase();
    INCOME_KEYWORDS.iter().any(|k| k.matches(&lower))
        || EXPENSE_KEYWORDS.iter().any(|k| k.matches(&lower))
}

/// Markers that force a statement line to be treated as a credit, overriding
/// whatever the description keywords said.
const CREDIT_MARKERS: &[&str] = &["cr", "credit", "neft cr", "imps cr", "upi cr"];

pub fn has_credit_marker(text: &str) -> bool {
    let lower = text.to_lowercase();
    CREDIT_MARKERS.iter().any(|m| lower.contains(m))
}

/// Ordered description rules for statement/CSV text: first keyword found as a
/// substring wins, carrying both category and presumptive kind.
const DESCRIPTION_RULES: &[(&str, &str, TxnKind)] = &[
    ("salary", "Salary", TxnKind::Income),
    ("neft cr", "Bank Transfer", TxnKind::Income),
    ("imps cr", "Bank Transfer", TxnKind::Income),
    ("upi cr", "UPI Payment", TxnKind::Income),
    ("interest", "Interest", TxnKind::Income),
    ("dividend", "Investment", TxnKind::Income),
    ("refund", "Refund", TxnKind::Income),
    ("cashback", "Cashback", TxnKind::Income),
    ("atm", "ATM Withdrawal", TxnKind::Expense),
    ("pos", "Shopping", TxnKind::Expense),
    ("neft dr", "Bank Transfer", TxnKind::Expense),
    ("imps dr", "Bank Transfer", TxnKind::Expense),
    ("upi", "UPI Payment", TxnKind::Expense),
    ("emi", "EMI", TxnKind::Expense),
    ("loan", "Loan", TxnKind::Expense),
    ("insurance", "Insurance", TxnKind::Expense),
    ("electricity", "Utilities", TxnKind::Expense),
    ("mobile", "Mobile Recharge", TxnKind::Expense),
    ("recharge", "Recharge", TxnKind::Expense),
    ("swiggy", "Food & Dining", TxnKind::Expense),
    ("zomato", "Food & Dining", TxnKind::Expense),
    ("amazon", "Shopping", TxnKind::Expense),
    ("flipkart", "Shopping", TxnKind::Expense),
    ("uber", "Transportation", TxnKind::Expense),
    ("ola", "Transportation", TxnKind::Expense),
    ("rapido", "Transportation", TxnKind::Expense),
    ("netflix", "Entertainment", TxnKind::Expense),
    ("spotify", "Entertainment", TxnKind::Expense),
    ("hotstar", "Entertainment", TxnKind::Expense),
    ("rent", "Rent", TxnKind::Expense),
    ("grocery", "Groceries", TxnKind::Expense),
    ("bigbasket", "Groceries", TxnKind::Expense),
    ("blinkit", "Groceries", TxnKind::Expense),
    ("zepto", "Groceries", TxnKind::Expense),
    ("medical", "Healthcare", TxnKind::Expense),
    ("pharmacy", "Healthcare", TxnKind::Expense),
    ("hospital", "Healthcare", TxnKind::Expense),
    ("petrol", "Fuel", TxnKind::Expense),
    ("fuel", "Fuel", TxnKind::Expense),
    ("hp", "Fuel", TxnKind::Expense),
    ("iocl", "Fuel", TxnKind::Expense),
    ("bpcl", "Fuel", TxnKind::Expense),
];

/// Category + presumptive kind for a statement/CSV description. With no rule
/// hit, a credit marker in the description decides between the two fallbacks.
pub fn categorize_description(description: &str) -> (&'static str, TxnKind) {
    let lower = description.to_lowercase();
    for &(keyword, category, kind) in DESCRIPTION_RULES {
        if lower.contains(keyword) {
            return (category, kind);
        }
    }
    if lower.contains("cr") || lower.contains("credit") {
        ("Other Income", TxnKind::Income)
    } else {
        ("Other Expense", TxnKind::Expense)
    }
}

/// Ordered rules for message-style text (SMS): first keyword wins.
const MESSAGE_RULES: &[(&str, &str)] = &[
    ("swiggy", "Food"),
    ("zomato", "Food"),
    ("dominos", "Food"),
    ("pizza", "Food"),
    ("restaurant", "Food"),
    ("food", "Food"),
    ("cafe", "Food"),
    ("hotel", "Food"),
    ("uber", "Transport"),
    ("ola", "Transport"),
    ("rapido", "Transport"),
    ("metro", "Transport"),
    ("railway", "Transport"),
    ("irctc", "Transport"),
    ("petrol", "Transport"),
    ("fuel", "Transport"),
    ("diesel", "Transport"),
    ("amazon", "Shopping"),
    ("flipkart", "Shopping"),
    ("myntra", "Shopping"),
    ("ajio", "Shopping"),
    ("shopping", "Shopping"),
    ("mall", "Shopping"),
    ("store", "Shopping"),
    ("electricity", "Bills"),
    ("water", "Bills"),
    ("gas", "Bills"),
    ("broadband", "Bills"),
    ("wifi", "Bills"),
    ("phone", "Bills"),
    ("mobile", "Bills"),
    ("recharge", "Bills"),
    ("rent", "Rent"),
    ("lease", "Rent"),
    ("housing", "Rent"),
    ("hospital", "Health"),
    ("medical", "Health"),
    ("pharmacy", "Health"),
    ("medicine", "Health"),
    ("doctor", "Health"),
    ("clinic", "Health"),
    ("netflix", "Entertainment"),
    ("spotify", "Entertainment"),
    ("hotstar", "Entertainment"),
    ("prime", "Entertainment"),
    ("movie", "Entertainment"),
    ("theatre", "Entertainment"),
    ("atm", "Cash"),
    ("cash withdrawal", "Cash"),
];

const SALARY_HINTS: &[&str] = &["salary", "wage", "payment received"];

/// Category for message-style text, given an already-decided kind.
pub fn categorize_message(raw: &str, kind: TxnKind) -> &'static str {
    let lower = raw.to_lowercase();
    for &(keyword, category) in MESSAGE_RULES {
        if lower.contains(keyword) {
            return category;
        }
    }
    match kind {
        TxnKind::Income => {
            if SALARY_HINTS.iter().any(|h| lower.contains(h)) {
                "Salary"
            } else {
                "Income"
            }
        }
        TxnKind::Expense => "Other",
    }
}

/// Kind-scoped category rules used where the kind is already authoritative
/// (CSV credit/debit columns, explicit type column).
const INCOME_CATEGORY_RULES: &[(&str, &str)] = &[
    ("salary", "Salary"),
    ("interest", "Interest"),
];

const EXPENSE_CATEGORY_RULES: &[(&str, &str)] = &[
    ("atm", "ATM Withdrawal"),
    ("cash", "ATM Withdrawal"),
    ("upi", "UPI Payment"),
    ("gpay", "UPI Payment"),
    ("paytm", "UPI Payment"),
    ("swiggy", "Food & Dining"),
    ("zomato", "Food & Dining"),
    ("uber", "Transportation"),
    ("ola", "Transportation"),
    ("rapido", "Transportation"),
    ("amazon", "Shopping"),
    ("flipkart", "Shopping"),
    ("netflix", "Entertainment"),
    ("spotify", "Entertainment"),
    ("rent", "Rent"),
    ("electricity", "Utilities"),
    ("water", "Utilities"),
    ("gas", "Utilities"),
];

pub fn categorize_for_kind(description: &str, kind: TxnKind) -> &'static str {
    let lower = description.to_lowercase();
    let rules = match kind {
        TxnKind::Income => INCOME_CATEGORY_RULES,
        TxnKind::Expense => EXPENSE_CATEGORY_RULES,
    };
    rules
        .iter()
        .find(|(keyword, _)| lower.contains(keyword))
        .map(|(_, category)| *category)
        .unwrap_or_else(|| kind.fallback_category())
}

/// Known merchant name substrings, checked before the UPI-handle fallback.
const MERCHANTS: &[&str] = &[
    "swiggy", "zomato", "amazon", "flipkart", "uber", "ola", "rapido",
    "netflix", "spotify", "hotstar", "bigbasket", "blinkit", "zepto",
    "paytm", "phonepe", "gpay", "google pay", "myntra", "nykaa",
    "cred", "slice", "simpl", "lazypay",
];

/// Counterparty name: a known merchant (capitalized), else a UPI-style handle
/// (upper-cased), else `None`.
pub fn extract_merchant(description: &str) -> Option<String> {
    let lower = description.to_lowercase();
    for merchant in MERCHANTS {
        if lower.contains(merchant) {
            return Some(capitalize(merchant));
        }
    }
    upi_handle(description).map(|handle| handle.to_uppercase())
}

fn capitalize(name: &str) -> String {
    let mut chars = name.chars();
    match chars.next() {
        Some(first) => first.to_uppercase().collect::<String>() + chars.as_str(),
        None => String::new(),
    }
}

/// `local-part@provider`, or a token explicitly tagged `UPI:`/`VPA:`.
fn upi_handle(text: &str) -> Option<String> {
    let handle_re = Regex::new(r"[A-Za-z0-9._-]+@[A-Za-z0-9]+").ok()?;
    if let Some(found) = handle_re.find(text) {
        return Some(found.as_str().to_string());
    }
    let tagged_re = Regex::new(r"(?i)(?:UPI|VPA):\s*([A-Za-z0-9._@-]+)").ok()?;
    tagged_re
        .captures(text)
        .and_then(|caps| caps.get(1))
        .map(|m| m.as_str().to_string())
}

#[cfg(test)]
mod tests {
    use super::*;
    use rstest::rstest;
    use std::str::FromStr;

    #[rstest]
    #[case("HDFCBK: Rs 500 credited", "HDFC")]
    #[case("your icici bank account", "ICICI")]
    #[case("STATE BANK OF INDIA statement", "SBI")]
    #[case("Punjab National Bank", "PNB")]
    #[case("payment via PhonePe", "PHONEPE")]
    #[case("Google Pay transfer", "GPAY")]
    #[case("no bank here", "UNKNOWN")]
    fn test_identify_source(#[case] text: &str, #[case] expected: &str) {
        assert_eq!(identify_source(text), expected);
    }

    #[test]
    fn test_identify_source_table_order_breaks_ties() {
        // "hdfc" appears after "icici" in the text but earlier in the table
        assert_eq!(identify_source("icici and hdfc"), "HDFC");
    }

    #[rstest]
    #[case("Rs 500 credited to your account", "100", Some((TxnKind::Income, 0.9)))]
    #[case("Rs 500 debited from your account", "100", Some((TxnKind::Expense, 0.9)))]
    #[case("NEFT Cr of Rs 500", "100", Some((TxnKind::Income, 0.9)))]
    #[case("500dr adjustment", "100", Some((TxnKind::Expense, 0.9)))]
    // "credited" is checked before the expense list: income wins
    #[case("credited after your purchase", "100", Some((TxnKind::Income, 0.9)))]
    // no keyword, large amount: income at reduced confidence
    #[case("transaction alert of Rs 9,000", "9000", Some((TxnKind::Income, 0.6)))]
    // no keyword, small amount: unclassifiable
    #[case("transaction alert of Rs 900", "900", None)]
    fn test_classify_message_kind(
        #[case] text: &str,
        #[case] amount: &str,
        #[case] expected: Option<(TxnKind, f32)>,
    ) {
        let amount = Decimal::from_str(amount).unwrap();
        let verdict = classify_message_kind(text, amount);
        assert_eq!(verdict.map(|v| (v.kind, v.confidence)), expected);
    }

    #[test]
    fn test_bounded_keyword_does_not_match_inside_words() {
        // "dr" embedded in a longer word is not an expense marker
        assert_eq!(
            classify_message_kind("hydra subscription of Rs 100", Decimal::from(100)),
            None
        );
    }

    #[rstest]
    #[case("NEFT CR-SALARY PAYMENT", true)]
    #[case("UPI Cr received", true)]
    #[case("plain debit entry", false)]
    #[case("POS purchase 1234", false)]
    fn test_has_credit_marker(#[case] text: &str, #[case] expected: bool) {
        assert_eq!(has_credit_marker(text), expected);
    }

    #[rstest]
    #[case("SALARY CREDIT MARCH", "Salary", TxnKind::Income)]
    #[case("NEFT CR-ACME CORP", "Bank Transfer", TxnKind::Income)]
    #[case("UPI-SWIGGY-ORDER", "UPI Payment", TxnKind::Expense)] // "upi" wins: table order
    #[case("ATM WDL MG ROAD", "ATM Withdrawal", TxnKind::Expense)]
    #[case("ZOMATO ONLINE", "Food & Dining", TxnKind::Expense)]
    #[case("HOUSE RENT APRIL", "Rent", TxnKind::Expense)]
    #[case("TOTALLY OPAQUE", "Other Expense", TxnKind::Expense)]
    #[case("MISC CR ENTRY", "Other Income", TxnKind::Income)]
    fn test_categorize_description(
        #[case] description: &str,
        #[case] category: &str,
        #[case] kind: TxnKind,
    ) {
        assert_eq!(categorize_description(description), (category, kind));
    }

    #[rstest]
    #[case("paid to Swiggy via UPI", TxnKind::Expense, "Food")]
    #[case("Uber ride fare", TxnKind::Expense, "Transport")]
    #[case("ATM cash withdrawal", TxnKind::Expense, "Cash")]
    #[case("electricity bill paid", TxnKind::Expense, "Bills")]
    #[case("something opaque", TxnKind::Expense, "Other")]
    #[case("salary for March credited", TxnKind::Income, "Salary")]
    #[case("something opaque", TxnKind::Income, "Income")]
    fn test_categorize_message(
        #[case] raw: &str,
        #[case] kind: TxnKind,
        #[case] expected: &str,
    ) {
        assert_eq!(categorize_message(raw, kind), expected);
    }

    #[rstest]
    #[case("SALARY MARCH", TxnKind::Income, "Salary")]
    #[case("SAVINGS INTEREST", TxnKind::Income, "Interest")]
    #[case("MISC DEPOSIT", TxnKind::Income, "Other Income")]
    #[case("ATM WDL", TxnKind::Expense, "ATM Withdrawal")]
    #[case("UPI-GROCERIES", TxnKind::Expense, "UPI Payment")]
    #[case("MISC SPEND", TxnKind::Expense, "Other Expense")]
    fn test_categorize_for_kind(
        #[case] description: &str,
        #[case] kind: TxnKind,
        #[case] expected: &str,
    ) {
        assert_eq!(categorize_for_kind(description, kind), expected);
    }

    #[rstest]
    #[case("UPI-SWIGGY-ORDER-4417", Some("Swiggy"))]
    #[case("payment to ZOMATO online", Some("Zomato"))]
    #[case("GOOGLE PAY transfer", Some("Google pay"))]
    #[case("paid to merchant@okaxis ref 12", Some("MERCHANT@OKAXIS"))]
    #[case("VPA: shop.counter@ybl", Some("SHOP.COUNTER@YBL"))]
    #[case("cash deposit at branch", None)]
    fn test_extract_merchant(#[case] description: &str, #[case] expected: Option<&str>) {
        assert_eq!(extract_merchant(description), expected.map(String::from));
    }

    #[test]
    fn test_merchant_list_wins_over_upi_handle() {
        let merchant = extract_merchant("UPI swiggy-order@icici");
        assert_eq!(merchant, Some("Swiggy".to_string()));
    }
}
