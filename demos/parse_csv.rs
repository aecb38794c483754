use std::env;
use txn_extract_rs::ExtractorBuilder;

const SAMPLE: &str = "\
Date,Narration,Debit,Credit
15/01/2024,UPI-SWIGGY-ORDER,450.00,0
16/01/2024,SALARY JAN,0,85000.00
17/01/2024,ATM WDL MG ROAD,2000.00,0";

fn main() -> Result<(), Box<dyn std::error::Error>> {
    let args: Vec<String> = env::args().collect();

    let content = if args.len() > 1 {
        std::fs::read_to_string(&args[1])?
    } else {
        println!("Using built-in sample data\n");
        SAMPLE.to_string()
    };

    let transactions = ExtractorBuilder::new().content(&content).parse()?;

    println!("Found {} transactions\n", transactions.len());

    for (i, tx) in transactions.iter().take(10).enumerate() {
        println!("Transaction {}:", i + 1);
        println!("  Date: {}", tx.date);
        println!("  Amount: {}", tx.amount);
        println!("  Kind: {:?}", tx.kind);
        println!("  Category: {}", tx.category);
        println!();
    }

    if transactions.len() > 10 {
        println!("... and {} more transactions", transactions.len() - 10);
    }

    Ok(())
}
