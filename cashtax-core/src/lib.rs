//! cashtax-core: CashApp export rows to TokenTax import rows.
//!
//! Pure conversion logic; reading and writing CSV lives in `cashtax-ingest`.

pub mod amount;
pub mod classify;
pub mod convert;
pub mod date;
pub mod records;

pub use amount::{format_amount, parse_amount};
pub use classify::{classify, Classification, Rule, RULE_ORDER};
pub use convert::{Conversion, ConversionSummary, Converter};
pub use date::normalize_date;
pub use records::{Category, SourceRecord, TargetRecord, TargetSchema};
