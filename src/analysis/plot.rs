use std::io::Cursor;
use image::{DynamicImage, ImageBuffer, ImageFormat, Rgb};
use once_cell::sync::Lazy;
use plotters::prelude::*;
use plotters::style::FontStyle;
use crate::analysis::error::AnalysisError;
use crate::analysis::readings::NOMINAL_VOLTAGE;
/// Number of equal-width bins in the voltage histogram.
pub const HISTOGRAM_BINS: usize = 12;
/// Largest chart side in pixels; bigger configured sizes are clamped.
pub const MAX_CHART_SIDE: u32 = 8000;
const FONT_FAMILY: &str = "sans-serif";
static FONT_BYTES: &[u8] = include_bytes!("../../assets/DejaVuSans.ttf");
static FONT_READY: Lazy<Result<(), String>> = Lazy::new(|| {
    plotters::style::register_font(FONT_FAMILY, FontStyle::Normal, FONT_BYTES)
        .map_err(|_| "embedded chart font could not be loaded".to_owned())
});
#[derive(Clone, Debug)]
pub struct PlotStyle {
    pub width: u32,
    pub height: u32,
    pub background: RGBColor,
    pub bar_fill: RGBColor,
    pub nominal_color: RGBColor,
}
impl Default for PlotStyle {
    fn default() -> Self {
        Self {
            width: 1200,
            height: 600,
            background: WHITE,
            bar_fill: RGBColor(0x1f, 0x77, 0xb4),
            nominal_color: RED,
        }
    }
}
impl PlotStyle {
    pub fn with_size(width: u32, height: u32) -> Self {
        Self {
            width: width.clamp(200, MAX_CHART_SIDE),
            height: height.clamp(150, MAX_CHART_SIDE),
            ..Self::default()
        }
    }
}
/// Equal-width bin counts. The last bin is closed on the right.
#[derive(Clone, Debug, PartialEq)]
pub struct Histogram {
    pub edges: Vec<f64>,
    pub counts: Vec<usize>,
}
impl Histogram {
    /// Returns `None` for an empty series or zero bins. A constant series gets
    /// a one-volt span centred on its value.
    pub fn from_values(values: &[f64], bins: usize) -> Option<Self> {
        if values.is_empty() || bins == 0 {
            return None;
        }
        let (mut lo, mut hi) = values
            .iter()
            .fold((f64::INFINITY, f64::NEG_INFINITY), |(lo, hi), v| {
                (lo.min(*v), hi.max(*v))
            });
        if lo == hi {
            lo -= 0.5;
            hi += 0.5;
        }
        let width = (hi - lo) / bins as f64;
        let edges = (0..bins)
            .map(|i| lo + width * i as f64)
            .chain(std::iter::once(hi))
            .collect();
        let mut counts = vec![0usize; bins];
        for v in values {
            let idx = (((v - lo) / width).floor() as usize).min(bins - 1);
            counts[idx] += 1;
        }
        Some(Self { edges, counts })
    }
    /// (left edge, right edge, count) per bin.
    pub fn bins(&self) -> impl Iterator<Item = (f64, f64, usize)> + '_ {
        self.edges
            .windows(2)
            .zip(&self.counts)
            .map(|(edge, count)| (edge[0], edge[1], *count))
    }
    pub fn max_count(&self) -> usize {
        self.counts.iter().copied().max().unwrap_or(0)
    }
}
/// Renders the voltage histogram with a dashed marker at the nominal voltage.
pub fn render_histogram_png(voltages: &[f64], style: &PlotStyle) -> Result<Vec<u8>, AnalysisError> {
    let histogram = Histogram::from_values(voltages, HISTOGRAM_BINS)
        .ok_or_else(|| AnalysisError::Plot("voltage series is empty".into()))?;
    (*FONT_READY).clone().map_err(AnalysisError::Plot)?;
    let first_edge = histogram.edges[0];
    let last_edge = histogram.edges[histogram.edges.len() - 1];
    let lo = first_edge.min(NOMINAL_VOLTAGE);
    let hi = last_edge.max(NOMINAL_VOLTAGE);
    let pad = (hi - lo) * 0.05;
    let y_max = histogram.max_count() as f64 * 1.1;
    let mut buffer = vec![0u8; style.width as usize * style.height as usize * 3];
    {
        let root = BitMapBackend::with_buffer(&mut buffer, (style.width, style.height))
            .into_drawing_area();
        root.fill(&style.background)?;
        let mut chart = ChartBuilder::on(&root)
            .margin(15)
            .caption(
                "Distribución de Lecturas de Voltaje",
                (FONT_FAMILY, 24).into_font().color(&BLACK),
            )
            .set_label_area_size(LabelAreaPosition::Left, 55)
            .set_label_area_size(LabelAreaPosition::Bottom, 50)
            .build_cartesian_2d((lo - pad)..(hi + pad), 0f64..y_max)?;
        chart
            .configure_mesh()
            .x_desc("Voltaje (V)")
            .y_desc("Frecuencia")
            .label_style((FONT_FAMILY, 14))
            .light_line_style(&BLACK.mix(0.05))
            .bold_line_style(&BLACK.mix(0.2))
            .draw()?;
        let fill = style.bar_fill.mix(0.7).filled();
        chart.draw_series(
            histogram
                .bins()
                .map(|(left, right, count)| Rectangle::new([(left, 0.0), (right, count as f64)], fill)),
        )?;
        chart.draw_series(histogram.bins().map(|(left, right, count)| {
            Rectangle::new([(left, 0.0), (right, count as f64)], BLACK.stroke_width(1))
        }))?;
        let nominal = style.nominal_color;
        let segments = 24;
        let step = y_max / segments as f64;
        chart
            .draw_series((0..segments).step_by(2).map(|i| {
                PathElement::new(
                    vec![
                        (NOMINAL_VOLTAGE, step * i as f64),
                        (NOMINAL_VOLTAGE, step * (i + 1) as f64),
                    ],
                    nominal.stroke_width(2),
                )
            }))?
            .label("Valor Nominal")
            .legend(move |(x, y)| PathElement::new(vec![(x, y), (x + 20, y)], nominal.stroke_width(2)));
        chart
            .configure_series_labels()
            .label_font((FONT_FAMILY, 14))
            .border_style(&BLACK.mix(0.3))
            .background_style(&style.background)
            .draw()?;
        root.present()?;
    }
    encode_png(&buffer, style.width, style.height)
}
fn encode_png(buffer: &[u8], width: u32, height: u32) -> Result<Vec<u8>, AnalysisError> {
    let image = ImageBuffer::<Rgb<u8>, _>::from_raw(width, height, buffer.to_vec())
        .ok_or_else(|| AnalysisError::Plot("failed to allocate image buffer".into()))?;
    let mut output = Vec::new();
    let dynamic = DynamicImage::ImageRgb8(image);
    dynamic.write_to(&mut Cursor::new(&mut output), ImageFormat::Png)?;
    Ok(output)
}
