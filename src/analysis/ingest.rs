use crate::analysis::error::IngestError;
use crate::analysis::readings::{Reading, ReadingSet};
use crate::analysis::table::{ColumnLayout, RawTable};
/// Replaces every character that is not an ASCII digit or ':' with ':'.
/// One-to-one substitution, so the character count is preserved.
pub fn normalize_timestamp(raw: &str) -> String {
    raw.chars()
        .map(|c| if c.is_ascii_digit() || c == ':' { c } else { ':' })
        .collect()
}
/// Turns the extracted tables of one document into a validated reading set.
/// Only the first table is considered.
pub fn ingest(tables: Vec<RawTable>) -> Result<ReadingSet, IngestError> {
    let table = tables.into_iter().next().ok_or(IngestError::NoTablesFound)?;
    let (ts_idx, v_idx) = match table.layout() {
        ColumnLayout::ThreeColumn => (0, 1),
        ColumnLayout::FourColumn => (1, 2),
        ColumnLayout::Unsupported(columns) => {
            return Err(IngestError::UnexpectedStructure { columns })
        }
    };
    let total = table.rows.len();
    let readings: Vec<Reading> = table
        .rows
        .iter()
        .filter_map(|row| {
            let voltage = row.get(v_idx)?.as_f64()?;
            let timestamp = row.get(ts_idx).map(|c| c.to_text()).unwrap_or_default();
            Some(Reading::new(normalize_timestamp(&timestamp), voltage))
        })
        .collect();
    if readings.len() < total {
        log::debug!(
            "dropped {} of {total} row(s) without a numeric voltage",
            total - readings.len()
        );
    }
    ReadingSet::new(readings).ok_or(IngestError::NoValidData)
}
