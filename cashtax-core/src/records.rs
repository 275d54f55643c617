//! Record types on both sides of the conversion: loosely-typed CashApp rows
//! in, TokenTax rows keyed by the target header out.

use serde::{Deserialize, Serialize};
use std::collections::HashMap;

/// CashApp export column names the classifier reads.
pub mod field {
    pub const TRANSACTION_TYPE: &str = "Transaction Type";
    pub const STATUS: &str = "Status";
    pub const DATE: &str = "Date";
    pub const AMOUNT: &str = "Amount";
    pub const NET_AMOUNT: &str = "Net Amount";
    pub const FEE: &str = "Fee";
    pub const ASSET_AMOUNT: &str = "Asset Amount";
    pub const ASSET_TYPE: &str = "Asset Type";
    pub const NOTES: &str = "Notes";
}

/// TokenTax header names the classifier writes.
pub mod target {
    pub const TYPE: &str = "Type";
    pub const BUY_AMOUNT: &str = "BuyAmount";
    pub const BUY_CURRENCY: &str = "BuyCurrency";
    pub const SELL_AMOUNT: &str = "SellAmount";
    pub const SELL_CURRENCY: &str = "SellCurrency";
    pub const FEE_AMOUNT: &str = "FeeAmount";
    pub const FEE_CURRENCY: &str = "FeeCurrency";
    pub const EXCHANGE: &str = "Exchange";
    pub const GROUP: &str = "Group";
    pub const COMMENT: &str = "Comment";
    pub const DATE: &str = "Date";
}

/// One row of a CashApp export. Absent columns read as the empty string.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(transparent)]
pub struct SourceRecord {
    fields: HashMap<String, String>,
}

impl SourceRecord {
    pub fn new() -> Self {
        Self::default()
    }

    /// Builder-style setter, mostly useful in tests.
    pub fn with(mut self, name: impl Into<String>, value: impl Into<String>) -> Self {
        self.fields.insert(name.into(), value.into());
        self
    }

    pub fn get(&self, name: &str) -> &str {
        self.fields.get(name).map(String::as_str).unwrap_or("")
    }

    pub fn transaction_type(&self) -> &str {
        self.get(field::TRANSACTION_TYPE)
    }

    pub fn status(&self) -> &str {
        self.get(field::STATUS)
    }
}

impl<K: Into<String>, V: Into<String>> FromIterator<(K, V)> for SourceRecord {
    fn from_iter<I: IntoIterator<Item = (K, V)>>(iter: I) -> Self {
        Self {
            fields: iter
                .into_iter()
                .map(|(k, v)| (k.into(), v.into()))
                .collect(),
        }
    }
}

/// Ordered list of column names the TokenTax import expects.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct TargetSchema {
    fields: Vec<String>,
}

impl TargetSchema {
    pub fn new<I, S>(fields: I) -> Self
    where
        I: IntoIterator<Item = S>,
        S: Into<String>,
    {
        Self {
            fields: fields.into_iter().map(Into::into).collect(),
        }
    }

    /// TokenTax's documented manual-import header.
    pub fn tokentax() -> Self {
        Self::new([
            target::TYPE,
            target::BUY_AMOUNT,
            target::BUY_CURRENCY,
            target::SELL_AMOUNT,
            target::SELL_CURRENCY,
            target::FEE_AMOUNT,
            target::FEE_CURRENCY,
            target::EXCHANGE,
            target::GROUP,
            target::COMMENT,
            target::DATE,
        ])
    }

    pub fn fields(&self) -> &[String] {
        &self.fields
    }

    pub fn contains(&self, name: &str) -> bool {
        self.fields.iter().any(|f| f == name)
    }

    pub fn len(&self) -> usize {
        self.fields.len()
    }

    pub fn is_empty(&self) -> bool {
        self.fields.is_empty()
    }
}

/// A TokenTax row. Keys are exactly the schema's fields, in schema order.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct TargetRecord {
    cells: Vec<(String, String)>,
}

impl TargetRecord {
    /// Every schema field starts out as the empty string.
    pub fn blank(schema: &TargetSchema) -> Self {
        Self {
            cells: schema
                .fields()
                .iter()
                .map(|f| (f.clone(), String::new()))
                .collect(),
        }
    }

    /// Writes to a column outside the schema are dropped.
    pub fn set(&mut self, name: &str, value: impl Into<String>) {
        match self.cells.iter_mut().find(|(k, _)| k == name) {
            Some((_, v)) => *v = value.into(),
            None => log::trace!("dropping write to '{name}': not in target schema"),
        }
    }

    pub fn get(&self, name: &str) -> &str {
        self.cells
            .iter()
            .find(|(k, _)| k == name)
            .map(|(_, v)| v.as_str())
            .unwrap_or("")
    }

    pub fn kind(&self) -> &str {
        self.get(target::TYPE)
    }

    /// Cell values in schema order, ready for a CSV writer.
    pub fn values(&self) -> impl Iterator<Item = &str> {
        self.cells.iter().map(|(_, v)| v.as_str())
    }

    pub fn iter(&self) -> impl Iterator<Item = (&str, &str)> {
        self.cells.iter().map(|(k, v)| (k.as_str(), v.as_str()))
    }
}

/// TokenTax transaction types.
#[derive(Debug, Clone, Copy, Serialize, Deserialize, PartialEq, Eq, Hash, PartialOrd, Ord)]
pub enum Category {
    Trade,
    Deposit,
    Withdrawal,
    Income,
    Spend,
    Lost,
    Stolen,
    Mining,
    Gift,
}

impl Category {
    pub fn as_str(&self) -> &'static str {
        match self {
            Category::Trade => "Trade",
            Category::Deposit => "Deposit",
            Category::Withdrawal => "Withdrawal",
            Category::Income => "Income",
            Category::Spend => "Spend",
            Category::Lost => "Lost",
            Category::Stolen => "Stolen",
            Category::Mining => "Mining",
            Category::Gift => "Gift",
        }
    }
}

impl std::fmt::Display for Category {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.write_str(self.as_str())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_missing_source_field_reads_empty() {
        let rec = SourceRecord::new().with(field::STATUS, "COMPLETE");
        assert_eq!(rec.status(), "COMPLETE");
        assert_eq!(rec.get(field::ASSET_TYPE), "");
    }

    #[test]
    fn test_blank_target_follows_schema_order() {
        let schema = TargetSchema::new(["Date", "Type", "Comment"]);
        let mut row = TargetRecord::blank(&schema);
        row.set("Type", "Trade");
        assert_eq!(row.values().collect::<Vec<_>>(), vec!["", "Trade", ""]);
    }

    #[test]
    fn test_set_outside_schema_is_dropped() {
        let schema = TargetSchema::new(["Type"]);
        let mut row = TargetRecord::blank(&schema);
        row.set("Group", "margin");
        assert_eq!(row.iter().count(), 1);
        assert_eq!(row.get("Group"), "");
    }

    #[test]
    fn test_default_schema_has_all_written_fields() {
        let schema = TargetSchema::tokentax();
        assert_eq!(schema.len(), 11);
        for f in [target::TYPE, target::DATE, target::EXCHANGE, target::FEE_CURRENCY] {
            assert!(schema.contains(f), "missing {f}");
        }
    }

    #[test]
    fn test_category_serializes_as_tokentax_name() {
        let json = serde_json::to_string(&Category::Withdrawal).unwrap();
        assert_eq!(json, "\"Withdrawal\"");
        assert_eq!(Category::Gift.to_string(), "Gift");
    }
}
