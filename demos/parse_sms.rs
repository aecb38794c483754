use txn_extract_rs::{ExtractorBuilder, InputFormat};

fn main() -> Result<(), Box<dyn std::error::Error>> {
    let dump = "\
Rs 500 credited to A/c XX1234 by UPI. Bal: Rs 12,500

INR 1,500 debited from A/c XX5678 for Swiggy. Avl Bal: Rs 8,000

HDFCBK: Rs 2,000 withdrawn at ATM from A/c XX1234 Ref 4417889911";

    let transactions = ExtractorBuilder::new()
        .content(dump)
        .format(InputFormat::Sms)
        .parse()?;

    println!("Found {} transactions\n", transactions.len());

    for (i, tx) in transactions.iter().enumerate() {
        println!("Transaction {}:", i + 1);
        println!("  Date: {}", tx.date);
        println!("  Amount: {}", tx.amount);
        println!("  Kind: {:?}", tx.kind);
        println!("  Category: {}", tx.category);
        println!("  Source: {}", tx.source_name);
        println!("  Merchant: {}", tx.merchant.as_deref().unwrap_or("N/A"));
        println!();
    }

    Ok(())
}
