// src/analysis/mod.rs
pub mod error;
pub mod ingest;
pub mod pipeline;
pub mod plot;
pub mod readings;
pub mod report;
pub mod source;
pub mod stats;
pub mod table;
pub use pipeline::{Analysis, AnalysisPipeline, ReportFiles};
pub use plot::PlotStyle;
pub use readings::NOMINAL_VOLTAGE;
pub use source::{PdfTableExtractor, TableExtractor};
