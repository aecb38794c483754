use txn_extract_rs::StatementParser;

fn main() {
    // text as handed over by a PDF text-extraction step
    let text = "\
HDFC Bank Statement
Account Number: 50100123456789
Period 01/01/2024 to 31/01/2024
Date        Description                Amount      Balance
15/01/2024  UPI-SWIGGY-ORDER-4417     450.00      12,340.50
16/01/2024  NEFT CR-ACME CORP SALARY  85,000.00   97,340.50
18/01/2024  ATM WDL MG ROAD           2,000.00    95,340.50";

    let report = StatementParser::parse_report(text);

    println!("Bank: {}", report.metadata.bank_name);
    if let Some(account) = &report.metadata.account_number {
        println!("Account: {account}");
    }
    if let Some(period) = &report.metadata.period {
        println!("Period: {} to {}", period.from, period.to);
    }
    println!();

    for tx in &report.transactions {
        println!(
            "{}  {:?}  {:>12}  {}",
            tx.date, tx.kind, tx.amount, tx.description
        );
    }
}
