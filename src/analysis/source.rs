use std::collections::VecDeque;
use std::path::Path;
use std::sync::Mutex;
use pdfplumber::{Pdf, Strategy, TableSettings};
use crate::analysis::error::ExtractError;
use crate::analysis::table::{Cell, RawTable};
/// Anything that can turn a document path into its tables, in document order.
pub trait TableExtractor {
    fn extract(&self, path: &Path) -> Result<Vec<RawTable>, ExtractError>;
}
/// In-memory extractor useful for tests and deterministic playback.
/// Each call hands out the next queued document regardless of the path.
pub struct ManualExtractor {
    queue: Mutex<VecDeque<Result<Vec<RawTable>, ExtractError>>>,
}
impl ManualExtractor {
    pub fn new(documents: impl IntoIterator<Item = Vec<RawTable>>) -> Self {
        Self {
            queue: Mutex::new(documents.into_iter().map(Ok).collect()),
        }
    }
    pub fn failing(err: ExtractError) -> Self {
        Self {
            queue: Mutex::new(VecDeque::from([Err(err)])),
        }
    }
}
impl TableExtractor for ManualExtractor {
    fn extract(&self, _path: &Path) -> Result<Vec<RawTable>, ExtractError> {
        let mut queue = self
            .queue
            .lock()
            .unwrap_or_else(|poisoned| poisoned.into_inner());
        queue.pop_front().unwrap_or_else(|| Ok(Vec::new()))
    }
}
/// Extracts tables with pdfplumber, page by page.
///
/// Ruled tables are found from their lines. A page without any ruled table is
/// searched again by word alignment, so borderless reports still yield rows.
/// The first row of every detected table is its header.
#[derive(Clone, Copy, Debug, Default)]
pub struct PdfTableExtractor;
impl TableExtractor for PdfTableExtractor {
    fn extract(&self, path: &Path) -> Result<Vec<RawTable>, ExtractError> {
        let pdf = Pdf::open_file(path, None).map_err(|e| ExtractError::Pdf(e.to_string()))?;
        let lattice = TableSettings::default();
        let stream = TableSettings {
            strategy: Strategy::Stream,
            ..TableSettings::default()
        };
        let mut tables = Vec::new();
        for page in pdf.pages_iter() {
            let page = page.map_err(|e| ExtractError::Pdf(e.to_string()))?;
            let mut found = page.find_tables(&lattice);
            if found.is_empty() {
                found = page.find_tables(&stream);
            }
            log::debug!(
                "page {} of {}: {} table(s)",
                page.page_number(),
                path.display(),
                found.len()
            );
            tables.extend(found.iter().map(|table| {
                to_raw_table(
                    table
                        .rows
                        .iter()
                        .map(|row| row.iter().map(|cell| cell.text.as_deref())),
                )
            }));
        }
        Ok(tables)
    }
}
/// Builds a `RawTable` from detected rows of optional cell text. The first row
/// becomes the header; empty cells stay as empty text so columns keep their place.
fn to_raw_table<'a, R, C>(rows: R) -> RawTable
where
    R: IntoIterator<Item = C>,
    C: IntoIterator<Item = Option<&'a str>>,
{
    let mut rows = rows.into_iter().map(|row| {
        row.into_iter()
            .map(|text| text.map(str::trim).unwrap_or_default())
            .collect::<Vec<_>>()
    });
    let headers = rows
        .next()
        .map(|row| row.into_iter().map(str::to_owned).collect())
        .unwrap_or_default();
    RawTable::new(
        headers,
        rows.map(|row| row.into_iter().map(Cell::from_token).collect())
            .collect(),
    )
}
