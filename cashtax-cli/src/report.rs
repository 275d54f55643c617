//! Console output for conversion summaries and the `types` listing.

use anyhow::Result;
use cashtax_core::{ConversionSummary, Rule, SourceRecord};
use serde::Serialize;
use std::collections::BTreeMap;
use std::path::Path;

pub fn print_summary(summary: &ConversionSummary, output: &Path) {
    println!("\nConversion complete");
    println!("Converted {} transactions", summary.converted);
    println!(
        "Skipped {} transactions (non-taxable or incomplete)",
        summary.skipped
    );

    println!("\nTransaction type summary:");
    for (label, count) in &summary.by_label {
        println!("   {label}: {count}");
    }

    if !summary.unrecognized.is_empty() {
        println!("\nUnrecognized transaction types:");
        for (label, count) in &summary.unrecognized {
            println!("   {label}: {count}");
        }
    }

    println!("\nOutput saved to: {}", output.display());
}

#[derive(Debug, Serialize)]
struct JsonSummary<'a> {
    output: &'a Path,
    #[serde(flatten)]
    summary: &'a ConversionSummary,
}

pub fn print_summary_json(summary: &ConversionSummary, output: &Path) -> Result<()> {
    let json = serde_json::to_string_pretty(&JsonSummary { output, summary })?;
    println!("{json}");
    Ok(())
}

/// One distinct CashApp transaction type and the rule it falls under.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct TypeUsage {
    pub label: String,
    pub count: usize,
    pub rule: Option<Rule>,
}

pub fn type_usage(records: &[SourceRecord]) -> Vec<TypeUsage> {
    let mut counts: BTreeMap<&str, usize> = BTreeMap::new();
    for r in records {
        *counts.entry(r.transaction_type()).or_insert(0) += 1;
    }
    counts
        .into_iter()
        .map(|(label, count)| TypeUsage {
            label: label.to_string(),
            count,
            rule: Rule::for_label(label),
        })
        .collect()
}

pub fn print_type_usage(usage: &[TypeUsage]) {
    let width = usage.iter().map(|u| u.label.len()).max().unwrap_or(0);
    for u in usage {
        let rule = u.rule.map(|r| r.label()).unwrap_or("unrecognized");
        println!("{:<width$}  {:>5}  {}", u.label, u.count, rule);
    }
}
