//! Run the classifier over a whole export and tally what happened.

use anyhow::{ensure, Context, Result};
use serde::Serialize;
use std::collections::BTreeMap;

use crate::classify::{classify, Classification};
use crate::records::{target, SourceRecord, TargetRecord, TargetSchema};

/// Counts reported after a conversion pass.
#[derive(Debug, Clone, Default, PartialEq, Serialize)]
pub struct ConversionSummary {
    pub total: usize,
    pub converted: usize,
    pub skipped: usize,
    /// Converted rows per rule label, sorted by label.
    pub by_label: BTreeMap<String, usize>,
    /// Unknown transaction types and how often each was seen.
    pub unrecognized: BTreeMap<String, usize>,
}

impl ConversionSummary {
    pub fn record(&mut self, outcome: &Classification) {
        self.total += 1;
        match outcome {
            Classification::Emit { rule, .. } => {
                self.converted += 1;
                *self.by_label.entry(rule.label().to_string()).or_insert(0) += 1;
            }
            Classification::SkipIncomplete => self.skipped += 1,
            Classification::SkipUnrecognized(label) => {
                self.skipped += 1;
                *self.unrecognized.entry(label.clone()).or_insert(0) += 1;
            }
        }
    }
}

/// Converted rows plus their summary.
#[derive(Debug, Clone)]
pub struct Conversion {
    pub rows: Vec<TargetRecord>,
    pub summary: ConversionSummary,
}

/// Drives `classify` over a sequence of CashApp rows.
pub struct Converter;

impl Converter {
    /// Convert everything in memory.
    pub fn convert(records: &[SourceRecord], schema: &TargetSchema) -> Result<Conversion> {
        let mut rows = Vec::new();
        let summary = Self::convert_each(records, schema, |row| {
            rows.push(row);
            Ok(())
        })?;
        Ok(Conversion { rows, summary })
    }

    /// Convert row by row, handing each emitted record to `sink` in input
    /// order. Stops at the first malformed amount, naming its data row
    /// (1-based, header excluded).
    pub fn convert_each<'a, I, F>(
        records: I,
        schema: &TargetSchema,
        mut sink: F,
    ) -> Result<ConversionSummary>
    where
        I: IntoIterator<Item = &'a SourceRecord>,
        F: FnMut(TargetRecord) -> Result<()>,
    {
        ensure!(
            schema.contains(target::TYPE),
            "target schema has no '{}' column",
            target::TYPE
        );

        let mut summary = ConversionSummary::default();
        for (i, src) in records.into_iter().enumerate() {
            let outcome = classify(src, schema).with_context(|| format!("row {}", i + 1))?;
            summary.record(&outcome);
            if let Classification::Emit { record, .. } = outcome {
                sink(record)?;
            }
        }
        log::info!(
            "converted {} of {} rows ({} skipped)",
            summary.converted,
            summary.total,
            summary.skipped
        );
        Ok(summary)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::records::field;

    fn row(kind: &str, status: &str) -> SourceRecord {
        SourceRecord::new()
            .with(field::TRANSACTION_TYPE, kind)
            .with(field::STATUS, status)
    }

    #[test]
    fn test_tallies() {
        let records = vec![
            row("Bitcoin Buy", "COMPLETE")
                .with(field::AMOUNT, "-$10.00")
                .with(field::ASSET_AMOUNT, "0.0002"),
            row("Bitcoin Buy", "FAILED"),
            row("Deposits", "COMPLETE"),
            row("Refund", "COMPLETE"),
            row("Refund", "COMPLETE"),
            row("Withdrawal", "COMPLETE").with(field::NET_AMOUNT, "-$3"),
        ];
        let out = Converter::convert(&records, &TargetSchema::tokentax()).unwrap();
        assert_eq!(out.rows.len(), 2);
        assert_eq!(out.summary.total, 6);
        assert_eq!(out.summary.converted, 2);
        assert_eq!(out.summary.skipped, 4);
        assert_eq!(out.summary.by_label.get("Trade (Buy)"), Some(&1));
        assert_eq!(out.summary.by_label.get("Withdrawal (Fiat)"), Some(&1));
        assert_eq!(out.summary.unrecognized.get("Refund"), Some(&2));
    }

    #[test]
    fn test_keeps_input_order() {
        let records = vec![
            row("Withdrawal", "COMPLETE").with(field::NET_AMOUNT, "-$1"),
            row("Refund", "COMPLETE"),
            row("Withdrawal", "COMPLETE").with(field::NET_AMOUNT, "-$2"),
        ];
        let out = Converter::convert(&records, &TargetSchema::tokentax()).unwrap();
        let sells: Vec<_> = out.rows.iter().map(|r| r.get("SellAmount")).collect();
        assert_eq!(sells, vec!["1.0", "2.0"]);
    }

    #[test]
    fn test_bad_amount_reports_row() {
        let records = vec![
            row("Refund", "COMPLETE"),
            row("Withdrawal", "COMPLETE").with(field::NET_AMOUNT, "$1.2.3"),
        ];
        let err = Converter::convert(&records, &TargetSchema::tokentax()).unwrap_err();
        let msg = format!("{err:#}");
        assert!(msg.starts_with("row 2"), "{msg}");
        assert!(msg.contains("Net Amount"), "{msg}");
    }

    #[test]
    fn test_schema_without_type_is_rejected() {
        let schema = TargetSchema::new(["Date", "Comment"]);
        assert!(Converter::convert(&[], &schema).is_err());
    }

    #[test]
    fn test_summary_serializes() {
        let mut summary = ConversionSummary::default();
        summary.record(&Classification::SkipUnrecognized("Refund".into()));
        let json = serde_json::to_value(&summary).unwrap();
        assert_eq!(json["skipped"], 1);
        assert_eq!(json["unrecognized"]["Refund"], 1);
    }
}
