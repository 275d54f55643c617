//! cashtax-ingest: CSV readers for CashApp exports and TokenTax reference
//! files, and the TokenTax CSV writer.

pub mod parsers;
pub mod tokentax;

pub use parsers::cashapp::{parse_cashapp_csv, read_cashapp};
pub use tokentax::{read_target_schema, TokenTaxWriter};
