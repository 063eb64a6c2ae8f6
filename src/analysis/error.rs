use thiserror::Error;
/// Failure raised by a table extractor before ingestion sees any rows.
#[derive(Debug, Error)]
pub enum ExtractError {
    /// pdfplumber could not open or interpret the document.
    #[error("{0}")]
    Pdf(String),
    #[error("{0}")]
    Io(#[from] std::io::Error),
}
/// Classified ingestion failure. Every variant is recoverable by picking another file.
#[derive(Clone, Debug, Error, PartialEq, Eq)]
pub enum IngestError {
    #[error("No tables found in PDF")]
    NoTablesFound,
    #[error("Unexpected table structure")]
    UnexpectedStructure { columns: usize },
    #[error("No valid voltage data found")]
    NoValidData,
    #[error("{0}")]
    ExtractionFailure(String),
}
impl From<ExtractError> for IngestError {
    fn from(value: ExtractError) -> Self {
        IngestError::ExtractionFailure(value.to_string())
    }
}
#[derive(Debug, Error)]
pub enum AnalysisError {
    #[error("failed to render plot: {0}")]
    Plot(String),
    #[error("failed to write report: {0}")]
    Report(String),
    #[error("io error: {0}")]
    Io(#[from] std::io::Error),
}
impl<E: std::error::Error + Send + Sync + 'static> From<plotters::drawing::DrawingAreaErrorKind<E>>
    for AnalysisError
{
    fn from(value: plotters::drawing::DrawingAreaErrorKind<E>) -> Self {
        AnalysisError::Plot(format!("{value:?}"))
    }
}
impl From<image::ImageError> for AnalysisError {
    fn from(value: image::ImageError) -> Self {
        AnalysisError::Plot(value.to_string())
    }
}
impl From<lopdf::Error> for AnalysisError {
    fn from(value: lopdf::Error) -> Self {
        AnalysisError::Report(value.to_string())
    }
}
impl From<serde_json::Error> for AnalysisError {
    fn from(value: serde_json::Error) -> Self {
        AnalysisError::Report(value.to_string())
    }
}
