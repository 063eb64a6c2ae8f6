use std::path::Path;
use lopdf::content::{Content, Operation};
use lopdf::{dictionary, Document, Object, Stream, StringFormat};
use crate::analysis::error::AnalysisError;
use crate::analysis::readings::{ReadingSet, NOMINAL_VOLTAGE};
use crate::analysis::stats::SummaryStatistics;
const PAGE_WIDTH: i64 = 595;
const PAGE_HEIGHT: i64 = 842;
const MARGIN: i64 = 40;
const ROW_HEIGHT: i64 = 12;
/// Space kept under the chart for the table header and a few rows.
const TABLE_RESERVE: i64 = 24 + 3 * ROW_HEIGHT;
/// Page content being laid out top to bottom.
struct PageBuilder {
    ops: Vec<Operation>,
}
impl PageBuilder {
    fn new() -> Self {
        Self { ops: Vec::new() }
    }
    fn text(&mut self, font: &str, size: i64, x: i64, y: i64, text: &str) {
        self.ops.push(Operation::new("BT", vec![]));
        self.ops.push(Operation::new(
            "Tf",
            vec![Object::Name(font.as_bytes().to_vec()), Object::Integer(size)],
        ));
        self.ops.push(Operation::new(
            "Td",
            vec![Object::Integer(x), Object::Integer(y)],
        ));
        self.ops.push(Operation::new(
            "Tj",
            vec![Object::String(win_ansi(text), StringFormat::Literal)],
        ));
        self.ops.push(Operation::new("ET", vec![]));
    }
    fn image(&mut self, name: &str, x: i64, y: i64, width: i64, height: i64) {
        self.ops.push(Operation::new("q", vec![]));
        self.ops.push(Operation::new(
            "cm",
            vec![
                Object::Integer(width),
                Object::Integer(0),
                Object::Integer(0),
                Object::Integer(height),
                Object::Integer(x),
                Object::Integer(y),
            ],
        ));
        self.ops.push(Operation::new(
            "Do",
            vec![Object::Name(name.as_bytes().to_vec())],
        ));
        self.ops.push(Operation::new("Q", vec![]));
    }
    fn into_content(self) -> Content {
        Content {
            operations: self.ops,
        }
    }
}
/// Standard Type1 fonts use WinAnsiEncoding; Latin-1 maps straight through.
fn win_ansi(text: &str) -> Vec<u8> {
    text.chars()
        .map(|c| match c as u32 {
            0x20..=0x7e | 0xa0..=0xff => c as u32 as u8,
            _ => b'?',
        })
        .collect()
}
/// Bottom y, width and height of the chart drawn below `top`. The chart spans
/// the text width unless that would push it into the table area, in which case
/// it is shrunk with its aspect ratio kept.
fn chart_placement(top: i64, chart_w: u32, chart_h: u32) -> (i64, i64, i64) {
    let (chart_w, chart_h) = (chart_w.max(1) as i64, chart_h.max(1) as i64);
    let room = (top - MARGIN - TABLE_RESERVE).max(1);
    let mut width = PAGE_WIDTH - 2 * MARGIN;
    let mut height = width * chart_h / chart_w;
    if height > room {
        height = room;
        width = (room * chart_w / chart_h).max(1);
    }
    (top - height, width, height.max(1))
}
/// Writes a one-page A4 report: summary, statistics, the histogram image and
/// as many reading rows as fit (at most `max_rows`).
pub fn write_report(
    source_name: &str,
    stats: &SummaryStatistics,
    readings: &ReadingSet,
    chart_path: &Path,
    output_path: &Path,
    max_rows: usize,
) -> Result<(), AnalysisError> {
    let chart = image::open(chart_path)
        .map_err(|e| AnalysisError::Report(format!("{}: {e}", chart_path.display())))?
        .to_rgb8();
    let (chart_w, chart_h) = chart.dimensions();
    if chart_w == 0 || chart_h == 0 {
        return Err(AnalysisError::Report("chart image is empty".into()));
    }
    let mut doc = Document::with_version("1.5");
    let pages_id = doc.new_object_id();
    let regular_id = doc.add_object(dictionary! {
        "Type" => "Font",
        "Subtype" => "Type1",
        "BaseFont" => "Helvetica",
        "Encoding" => "WinAnsiEncoding",
    });
    let bold_id = doc.add_object(dictionary! {
        "Type" => "Font",
        "Subtype" => "Type1",
        "BaseFont" => "Helvetica-Bold",
        "Encoding" => "WinAnsiEncoding",
    });
    let image_id = doc.add_object(Stream::new(
        dictionary! {
            "Type" => "XObject",
            "Subtype" => "Image",
            "Width" => Object::Integer(chart_w as i64),
            "Height" => Object::Integer(chart_h as i64),
            "ColorSpace" => "DeviceRGB",
            "BitsPerComponent" => Object::Integer(8),
        },
        chart.into_raw(),
    ));
    let resources_id = doc.add_object(dictionary! {
        "Font" => dictionary! {
            "F1" => regular_id,
            "F2" => bold_id,
        },
        "XObject" => dictionary! {
            "Im1" => image_id,
        },
    });
    let mut page = PageBuilder::new();
    let mut y = PAGE_HEIGHT - MARGIN - 2;
    page.text("F2", 18, MARGIN, y, "Reporte de Análisis de Voltaje");
    y -= 22;
    page.text("F1", 10, MARGIN, y, &format!("Archivo: {source_name}"));
    y -= 14;
    page.text(
        "F1",
        10,
        MARGIN,
        y,
        &format!(
            "Valor Nominal: {NOMINAL_VOLTAGE:.2} V    Lecturas: {}    Mín: {:.4} V    Máx: {:.4} V",
            stats.count, stats.min, stats.max
        ),
    );
    y -= 26;
    let column_width = (PAGE_WIDTH - 2 * MARGIN) / 3;
    let groups = stats.groups();
    let group_rows = groups.iter().map(|g| g.rows.len()).max().unwrap_or(0) as i64;
    for (idx, group) in groups.iter().enumerate() {
        let x = MARGIN + column_width * idx as i64;
        page.text("F2", 11, x, y, group.title);
        for (row_idx, (label, value)) in group.rows.iter().enumerate() {
            let row_y = y - 14 * (row_idx as i64 + 1);
            page.text("F1", 9, x, row_y, &format!("{label}: {value}"));
        }
    }
    y -= 14 * (group_rows + 1) + 6;
    let (chart_y, draw_w, draw_h) = chart_placement(y, chart_w, chart_h);
    y = chart_y;
    page.image("Im1", MARGIN, y, draw_w, draw_h);
    y -= 24;
    let columns = [MARGIN, MARGIN + 120, MARGIN + 240, MARGIN + 360];
    let headers = ["Hora", "Voltaje (V)", "Error Abs. (V)", "Error Rel. (%)"];
    for (x, header) in columns.iter().zip(headers) {
        page.text("F2", 10, *x, y, header);
    }
    let fit = ((y - MARGIN - ROW_HEIGHT) / ROW_HEIGHT).max(0) as usize;
    let shown = readings.len().min(max_rows).min(fit);
    for reading in readings.iter().take(shown) {
        y -= ROW_HEIGHT;
        let cells = [
            reading.timestamp.clone(),
            format!("{:.2}", reading.voltage),
            format!("{:.4}", reading.absolute_error),
            format!("{:.4}", reading.relative_error_pct),
        ];
        for (x, cell) in columns.iter().zip(cells.iter()) {
            page.text("F1", 9, *x, y, cell);
        }
    }
    if shown < readings.len() {
        y -= ROW_HEIGHT;
        page.text(
            "F1",
            9,
            MARGIN,
            y,
            &format!("... {} lecturas más no se muestran", readings.len() - shown),
        );
    }
    let content_id = doc.add_object(Stream::new(dictionary! {}, page.into_content().encode()?));
    let page_id = doc.add_object(dictionary! {
        "Type" => "Page",
        "Parent" => pages_id,
        "Contents" => content_id,
        "Resources" => resources_id,
    });
    let pages = dictionary! {
        "Type" => "Pages",
        "Kids" => vec![page_id.into()],
        "Count" => Object::Integer(1),
        "MediaBox" => vec![
            Object::Integer(0),
            Object::Integer(0),
            Object::Integer(PAGE_WIDTH),
            Object::Integer(PAGE_HEIGHT),
        ],
    };
    doc.objects.insert(pages_id, Object::Dictionary(pages));
    let catalog_id = doc.add_object(dictionary! {
        "Type" => "Catalog",
        "Pages" => pages_id,
    });
    doc.trailer.set("Root", catalog_id);
    doc.compress();
    doc.save(output_path)?;
    log::info!("report written to {}", output_path.display());
    Ok(())
}
#[cfg(test)]
mod tests {
    use super::*;
    use crate::analysis::plot::{render_histogram_png, PlotStyle};
    use crate::analysis::readings::Reading;
    fn sample() -> (SummaryStatistics, ReadingSet) {
        let readings = ReadingSet::new(
            (0..80)
                .map(|i| Reading::new(format!("08:{:02}", i % 60), 125.0 + (i % 7) as f64 * 0.6))
                .collect(),
        )
        .unwrap();
        (SummaryStatistics::compute(&readings), readings)
    }
    #[test]
    fn writes_single_page_pdf() {
        let dir = tempfile::tempdir().unwrap();
        let (stats, readings) = sample();
        let chart_path = dir.path().join("histogram.png");
        let png = render_histogram_png(&readings.voltages(), &PlotStyle::with_size(600, 300)).unwrap();
        std::fs::write(&chart_path, png).unwrap();
        let out = dir.path().join("reporte_voltaje.pdf");
        write_report("lecturas.pdf", &stats, &readings, &chart_path, &out, 25).unwrap();
        let bytes = std::fs::read(&out).unwrap();
        assert!(bytes.starts_with(b"%PDF-1.5"));
        let doc = Document::load(&out).unwrap();
        assert_eq!(doc.get_pages().len(), 1);
    }
    #[test]
    fn wide_chart_spans_the_text_width() {
        let (y, w, h) = chart_placement(600, 600, 300);
        assert_eq!((w, h), (PAGE_WIDTH - 2 * MARGIN, (PAGE_WIDTH - 2 * MARGIN) / 2));
        assert_eq!(y, 600 - h);
    }
    #[test]
    fn tall_chart_is_shrunk_above_the_table() {
        let (y, w, h) = chart_placement(500, 200, 5000);
        assert_eq!(h, 500 - MARGIN - TABLE_RESERVE);
        assert_eq!(w, h * 200 / 5000);
        assert_eq!(y, MARGIN + TABLE_RESERVE);
    }
    #[test]
    fn tall_chart_report_stays_on_the_page() {
        let dir = tempfile::tempdir().unwrap();
        let (stats, readings) = sample();
        let chart_path = dir.path().join("alto.png");
        image::RgbImage::from_pixel(200, 5000, image::Rgb([255, 255, 255]))
            .save(&chart_path)
            .unwrap();
        let out = dir.path().join("reporte_voltaje.pdf");
        write_report("lecturas.pdf", &stats, &readings, &chart_path, &out, 25).unwrap();
        let doc = Document::load(&out).unwrap();
        let (_, page_id) = doc.get_pages().into_iter().next().unwrap();
        let content = Content::decode(&doc.get_page_content(page_id).unwrap()).unwrap();
        let placement = content
            .operations
            .iter()
            .find(|op| op.operator == "cm")
            .unwrap();
        let y = placement.operands[5].as_i64().unwrap();
        assert!(y >= MARGIN, "chart bottom at {y}");
    }
    #[test]
    fn missing_chart_is_a_report_error() {
        let dir = tempfile::tempdir().unwrap();
        let (stats, readings) = sample();
        let err = write_report(
            "lecturas.pdf",
            &stats,
            &readings,
            &dir.path().join("nope.png"),
            &dir.path().join("out.pdf"),
            10,
        )
        .unwrap_err();
        assert!(matches!(err, AnalysisError::Report(_)));
        assert!(!dir.path().join("out.pdf").exists());
    }
    #[test]
    fn latin1_text_is_encoded_directly() {
        assert_eq!(win_ansi("Análisis V²"), b"An\xe1lisis V\xb2".to_vec());
        assert_eq!(win_ansi("→"), b"?".to_vec());
    }
}
