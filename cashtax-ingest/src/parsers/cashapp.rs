//! CashApp CSV exports ("Download activity" in the app).
//!
//! Header row, then one row per transaction:
//! Transaction ID,Date,Transaction Type,Currency,Amount,Fee,Net Amount,
//! Asset Type,Asset Price,Asset Amount,Status,Notes,Name of sender/receiver,Account

use anyhow::{Context, Result};
use cashtax_core::SourceRecord;
use std::io::Read;
use std::path::Path;

/// Parse a CashApp export file.
pub fn parse_cashapp_csv(path: impl AsRef<Path>) -> Result<Vec<SourceRecord>> {
    let path = path.as_ref();
    let file = std::fs::File::open(path)
        .with_context(|| format!("opening {}", path.display()))?;
    let records = read_cashapp(file).with_context(|| format!("reading {}", path.display()))?;
    log::info!("read {} rows from {}", records.len(), path.display());
    Ok(records)
}

/// Parse a CashApp export from any reader. Short rows are accepted; their
/// missing trailing columns read as empty. Rows of blank cells are kept so
/// they are counted (and skipped) like any other row without a status.
pub fn read_cashapp<R: Read>(rdr: R) -> Result<Vec<SourceRecord>> {
    let mut rdr = csv::ReaderBuilder::new()
        .flexible(true)
        .has_headers(true)
        .from_reader(rdr);

    let headers: Vec<String> = rdr
        .headers()
        .context("missing header row")?
        .iter()
        .map(|h| h.trim().to_string())
        .collect();

    let mut out = Vec::new();
    for (i, result) in rdr.records().enumerate() {
        let record = result.with_context(|| format!("row {}", i + 1))?;
        if record.len() > headers.len() {
            log::warn!(
                "row {}: {} cells for {} columns, extras ignored",
                i + 1,
                record.len(),
                headers.len()
            );
        }
        out.push(
            headers
                .iter()
                .zip(record.iter())
                .map(|(h, v)| (h.as_str(), v))
                .collect(),
        );
    }
    Ok(out)
}

#[cfg(test)]
mod tests {
    use super::*;
    use cashtax_core::records::field;
    use cashtax_core::{Converter, TargetSchema};

    const SAMPLE: &str = "\
Transaction ID,Date,Transaction Type,Currency,Amount,Fee,Net Amount,Asset Type,Asset Price,Asset Amount,Status,Notes
abc1,2025-10-09 16:29:46 EDT,Bitcoin Buy,USD,-$50.00,$0.50,-$50.50,BTC,\"$62,000.00\",0.00123,COMPLETE,weekly
abc2,2025-10-10 09:00:00 EDT,Deposits,USD,$100.00,$0,$100.00,,,,COMPLETE,
,,,,,,,,,,,
abc3,2025-10-11 10:00:00 EDT,P2P,USD,-$5.00
";

    #[test]
    fn test_reads_rows_by_header() {
        let rows = read_cashapp(SAMPLE.as_bytes()).unwrap();
        assert_eq!(rows.len(), 4);
        assert_eq!(rows[0].transaction_type(), "Bitcoin Buy");
        assert_eq!(rows[0].get(field::AMOUNT), "-$50.00");
        assert_eq!(rows[0].get("Asset Price"), "$62,000.00");
        assert_eq!(rows[0].get(field::NOTES), "weekly");
        assert_eq!(rows[1].get(field::ASSET_AMOUNT), "");
    }

    #[test]
    fn test_short_row_reads_empty() {
        let rows = read_cashapp(SAMPLE.as_bytes()).unwrap();
        assert_eq!(rows[3].get(field::AMOUNT), "-$5.00");
        assert_eq!(rows[3].status(), "");
    }

    #[test]
    fn test_blank_row_is_kept_and_skipped() {
        let rows = read_cashapp(SAMPLE.as_bytes()).unwrap();
        assert_eq!(rows[2].transaction_type(), "");
        assert_eq!(rows[2].status(), "");

        let out = Converter::convert(&rows, &TargetSchema::tokentax()).unwrap();
        assert_eq!(out.summary.total, 4);
        assert_eq!(out.summary.converted, 1);
        assert_eq!(out.summary.skipped, 3);
    }

    #[test]
    fn test_headers_are_trimmed() {
        let text = " Transaction Type , Status \nBitcoin Sale,COMPLETE\n";
        let rows = read_cashapp(text.as_bytes()).unwrap();
        assert_eq!(rows[0].transaction_type(), "Bitcoin Sale");
        assert_eq!(rows[0].status(), "COMPLETE");
    }

    #[test]
    fn test_missing_file() {
        let err = parse_cashapp_csv("/nonexistent/cashapp.csv").unwrap_err();
        assert!(err.to_string().contains("opening"));
    }
}
