//! Extract canonical, deduplicated transactions from unstructured bank text:
//! SMS notifications, PDF-statement text and ad-hoc CSV exports.
//!
//! ```rust,ignore
//! use txn_extract_rs::ExtractorBuilder;
//!
//! let transactions = ExtractorBuilder::new()
//!     .content(&sms_dump)
//!     .parse()?;
//! ```

mod builder;
mod types;

pub mod classify;
pub mod dedup;
pub mod errors;
pub mod normalize;
pub mod parsers;

pub use builder::{ExtractorBuilder, InputFormat, ParsedTransaction};
pub use parsers::prelude::*;
pub use types::{Transaction, TxnDate, TxnKind};
