use std::fs;
use std::path::{Path, PathBuf};
use crate::analysis::error::{AnalysisError, IngestError};
use crate::analysis::ingest::ingest;
use crate::analysis::plot::{render_histogram_png, PlotStyle};
use crate::analysis::readings::ReadingSet;
use crate::analysis::report::write_report;
use crate::analysis::source::TableExtractor;
use crate::analysis::stats::SummaryStatistics;
pub const HISTOGRAM_FILE: &str = "histogram.png";
pub const REPORT_FILE: &str = "reporte_voltaje.pdf";
pub const STATS_FILE: &str = "estadisticas.json";
/// Result of one pipeline run. Replaced wholesale when a new document is processed.
#[derive(Clone, Debug)]
pub struct Analysis {
    pub source: PathBuf,
    pub readings: ReadingSet,
    pub stats: SummaryStatistics,
}
impl Analysis {
    pub fn from_readings(source: impl Into<PathBuf>, readings: ReadingSet) -> Self {
        let stats = SummaryStatistics::compute(&readings);
        Self {
            source: source.into(),
            readings,
            stats,
        }
    }
    pub fn source_name(&self) -> String {
        self.source
            .file_name()
            .map(|n| n.to_string_lossy().into_owned())
            .unwrap_or_else(|| self.source.display().to_string())
    }
}
/// Files produced by a report export.
#[derive(Clone, Debug)]
pub struct ReportFiles {
    pub chart: PathBuf,
    pub report: PathBuf,
    pub stats: PathBuf,
}
/// Extraction, ingestion and statistics for one document, plus the rendering
/// and export steps the results screen needs.
pub struct AnalysisPipeline<E: TableExtractor> {
    extractor: E,
    style: PlotStyle,
}
impl<E: TableExtractor> AnalysisPipeline<E> {
    pub fn new(extractor: E, style: PlotStyle) -> Self {
        Self { extractor, style }
    }
    /// Every extractor failure is classified; nothing escapes as a panic.
    pub fn process(&self, path: &Path) -> Result<Analysis, IngestError> {
        let outcome = self
            .extractor
            .extract(path)
            .map_err(IngestError::from)
            .and_then(ingest);
        match outcome {
            Ok(readings) => {
                let analysis = Analysis::from_readings(path, readings);
                log::info!(
                    "{}: {} reading(s), mean {:.4} V",
                    path.display(),
                    analysis.stats.count,
                    analysis.stats.mean
                );
                Ok(analysis)
            }
            Err(err) => {
                log::warn!("{}: {err}", path.display());
                Err(err)
            }
        }
    }
    pub fn render_chart(&self, analysis: &Analysis) -> Result<Vec<u8>, AnalysisError> {
        render_histogram_png(&analysis.readings.voltages(), &self.style)
    }
    /// Writes the histogram, the PDF report and a JSON dump of the statistics into `out_dir`.
    pub fn export_report(
        &self,
        analysis: &Analysis,
        chart_png: &[u8],
        out_dir: &Path,
        max_rows: usize,
    ) -> Result<ReportFiles, AnalysisError> {
        fs::create_dir_all(out_dir)?;
        let files = ReportFiles {
            chart: out_dir.join(HISTOGRAM_FILE),
            report: out_dir.join(REPORT_FILE),
            stats: out_dir.join(STATS_FILE),
        };
        fs::write(&files.chart, chart_png)?;
        write_report(
            &analysis.source_name(),
            &analysis.stats,
            &analysis.readings,
            &files.chart,
            &files.report,
            max_rows,
        )?;
        let dump = serde_json::json!({
            "source": analysis.source.display().to_string(),
            "statistics": &analysis.stats,
            "readings": &analysis.readings,
        });
        fs::write(&files.stats, serde_json::to_vec_pretty(&dump)?)?;
        Ok(files)
    }
}
#[cfg(test)]
mod tests {
    use super::*;
    use crate::analysis::error::ExtractError;
    use crate::analysis::source::ManualExtractor;
    use crate::analysis::table::{Cell, RawTable};
    fn table(rows: &[(&str, &str)]) -> RawTable {
        RawTable::new(
            vec!["Hora".into(), "Voltaje".into(), "Ordenado".into()],
            rows.iter()
                .map(|(t, v)| vec![Cell::from(*t), Cell::from(*v), Cell::from("False")])
                .collect(),
        )
    }
    #[test]
    fn pipeline_ingests_and_computes() {
        let extractor = ManualExtractor::new(vec![vec![table(&[
            ("08:15", "127.1"),
            ("08:16", "abc"),
            ("08:17", "126.9"),
        ])]]);
        let pipeline = AnalysisPipeline::new(extractor, PlotStyle::default());
        let analysis = pipeline.process(Path::new("/tmp/lecturas.pdf")).unwrap();
        assert_eq!(analysis.readings.len(), 2);
        assert!((analysis.stats.mean - 127.0).abs() < 1e-9);
        assert!((analysis.stats.range - 0.2).abs() < 1e-9);
        assert_eq!(analysis.source_name(), "lecturas.pdf");
    }
    #[test]
    fn pipeline_classifies_failures() {
        let pipeline = AnalysisPipeline::new(ManualExtractor::new(vec![Vec::new()]), PlotStyle::default());
        assert_eq!(
            pipeline.process(Path::new("x.pdf")).unwrap_err(),
            IngestError::NoTablesFound
        );
        let io = std::io::Error::new(std::io::ErrorKind::InvalidData, "bad xref table");
        let pipeline = AnalysisPipeline::new(
            ManualExtractor::failing(ExtractError::Io(io)),
            PlotStyle::default(),
        );
        assert_eq!(
            pipeline.process(Path::new("x.pdf")).unwrap_err(),
            IngestError::ExtractionFailure("bad xref table".into())
        );
    }
    #[test]
    fn export_writes_all_files() {
        let dir = tempfile::tempdir().unwrap();
        let extractor = ManualExtractor::new(vec![vec![table(&[
            ("08:15", "125.0"),
            ("08:16", "130.0"),
            ("08:17", "127.0"),
        ])]]);
        let pipeline = AnalysisPipeline::new(extractor, PlotStyle::with_size(500, 250));
        let analysis = pipeline.process(Path::new("lecturas.pdf")).unwrap();
        let png = pipeline.render_chart(&analysis).unwrap();
        let out_dir = dir.path().join("salida");
        let files = pipeline.export_report(&analysis, &png, &out_dir, 50).unwrap();
        assert!(files.chart.exists());
        assert!(files.report.exists());
        let dump: serde_json::Value =
            serde_json::from_slice(&std::fs::read(&files.stats).unwrap()).unwrap();
        assert_eq!(dump["statistics"]["count"], 3);
        assert_eq!(dump["readings"][0]["absolute_error"], 2.0);
        assert_eq!(dump["readings"].as_array().unwrap().len(), 3);
    }
}
