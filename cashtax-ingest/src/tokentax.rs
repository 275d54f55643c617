//! TokenTax side: header discovery from a reference import file, and the
//! CSV writer for converted rows.

use anyhow::{bail, Context, Result};
use cashtax_core::{TargetRecord, TargetSchema};
use std::io::{Read, Write};
use std::path::Path;

/// Take the target schema from the first line of a TokenTax CSV.
pub fn read_target_schema(path: impl AsRef<Path>) -> Result<TargetSchema> {
    let path = path.as_ref();
    let file = std::fs::File::open(path)
        .with_context(|| format!("opening {}", path.display()))?;
    let schema = read_schema(file).with_context(|| format!("reading {}", path.display()))?;
    log::info!("target format: {}", schema.fields().join(","));
    Ok(schema)
}

pub fn read_schema<R: Read>(rdr: R) -> Result<TargetSchema> {
    let mut rdr = csv::ReaderBuilder::new()
        .has_headers(false)
        .flexible(true)
        .from_reader(rdr);
    let Some(first) = rdr.records().next() else {
        bail!("no header row");
    };
    let first = first?;
    let schema = TargetSchema::new(first.iter().map(|h| h.trim()));
    if schema.is_empty() {
        bail!("empty header row");
    }
    Ok(schema)
}

/// Writes converted rows in schema order, header first.
pub struct TokenTaxWriter<W: Write> {
    wtr: csv::Writer<W>,
    written: usize,
}

impl TokenTaxWriter<std::fs::File> {
    pub fn create(path: impl AsRef<Path>, schema: &TargetSchema) -> Result<Self> {
        let path = path.as_ref();
        let wtr = csv::Writer::from_path(path)
            .with_context(|| format!("creating {}", path.display()))?;
        Self::with_writer(wtr, schema)
    }
}

impl<W: Write> TokenTaxWriter<W> {
    pub fn new(inner: W, schema: &TargetSchema) -> Result<Self> {
        Self::with_writer(csv::Writer::from_writer(inner), schema)
    }

    fn with_writer(mut wtr: csv::Writer<W>, schema: &TargetSchema) -> Result<Self> {
        wtr.write_record(schema.fields())?;
        Ok(Self { wtr, written: 0 })
    }

    pub fn write(&mut self, row: &TargetRecord) -> Result<()> {
        self.wtr.write_record(row.values())?;
        self.written += 1;
        Ok(())
    }

    /// Rows written so far, header excluded.
    pub fn written(&self) -> usize {
        self.written
    }

    /// Flush and hand back the underlying writer.
    pub fn finish(self) -> Result<W> {
        self.wtr
            .into_inner()
            .map_err(|e| anyhow::anyhow!("flushing output: {}", e.error()))
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_schema_from_first_line() {
        let text = concat!(
            "Type,BuyAmount,BuyCurrency,SellAmount,SellCurrency,FeeAmount,",
            "FeeCurrency,Exchange,Group,Comment,Date\n",
            "Trade,1,BTC,,,,,,,,\n"
        );
        let schema = read_schema(text.as_bytes()).unwrap();
        assert_eq!(schema, TargetSchema::tokentax());
    }

    #[test]
    fn test_empty_reference_file() {
        assert!(read_schema("".as_bytes()).is_err());
    }

    #[test]
    fn test_writes_header_then_rows() {
        let schema = TargetSchema::new(["Type", "Comment", "Date"]);
        let mut row = TargetRecord::blank(&schema);
        row.set("Type", "Gift");
        row.set("Comment", "for Sam, with love");

        let mut w = TokenTaxWriter::new(Vec::new(), &schema).unwrap();
        w.write(&row).unwrap();
        assert_eq!(w.written(), 1);
        let out = String::from_utf8(w.finish().unwrap()).unwrap();
        assert_eq!(out, "Type,Comment,Date\nGift,\"for Sam, with love\",\n");
    }

    #[test]
    fn test_create_on_disk() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("out.csv");
        let schema = TargetSchema::tokentax();
        let w = TokenTaxWriter::create(&path, &schema).unwrap();
        w.finish().unwrap();
        let text = std::fs::read_to_string(&path).unwrap();
        assert!(text.starts_with("Type,BuyAmount,BuyCurrency"));
    }
}
