use ndarray::Array1;
use serde::Serialize;
use crate::analysis::readings::ReadingSet;
/// Descriptive statistics over the voltages of one reading set.
///
/// Sample (n-1) variance and standard deviation. With a single reading both
/// are defined as 0, which makes the coefficient of variation 0 as well.
#[derive(Clone, Debug, PartialEq, Serialize)]
pub struct SummaryStatistics {
    pub count: usize,
    pub mean: f64,
    pub median: f64,
    /// Every value tied for the highest frequency, ascending.
    pub mode: Vec<f64>,
    pub std_dev: f64,
    pub variance: f64,
    pub min: f64,
    pub max: f64,
    pub range: f64,
    pub coefficient_variation: f64,
    pub semi_interquartile: f64,
    pub mean_absolute_deviation: f64,
}
/// Labelled block of formatted statistics, shared by the results screen and the report.
#[derive(Clone, Debug)]
pub struct StatGroup {
    pub title: &'static str,
    pub rows: Vec<(&'static str, String)>,
}
impl SummaryStatistics {
    pub fn compute(readings: &ReadingSet) -> Self {
        let values = Array1::from(readings.voltages());
        let n = values.len();
        let mut sorted = values.to_vec();
        sorted.sort_by(f64::total_cmp);
        let min = sorted[0];
        let max = sorted[n - 1];
        // constant series: exact mean, zero spread
        let constant = min == max;
        let mean = if constant { min } else { values.mean().unwrap_or(0.0) };
        let variance = if n > 1 && !constant { values.var(1.0) } else { 0.0 };
        let std_dev = variance.sqrt();
        let coefficient_variation = if mean == 0.0 { 0.0 } else { std_dev / mean };
        let q1 = quantile_sorted(&sorted, 0.25);
        let q3 = quantile_sorted(&sorted, 0.75);
        let mean_absolute_deviation = values.mapv(|v| (v - mean).abs()).mean().unwrap_or(0.0);
        Self {
            count: n,
            mean,
            median: quantile_sorted(&sorted, 0.5),
            mode: modes_sorted(&sorted),
            std_dev,
            variance,
            min,
            max,
            range: max - min,
            coefficient_variation,
            semi_interquartile: (q3 - q1) / 2.0,
            mean_absolute_deviation,
        }
    }
    pub fn mode_label(&self) -> String {
        let values: Vec<String> = self.mode.iter().map(|v| format!("{v:?}")).collect();
        format!("{} V", values.join(", "))
    }
    pub fn groups(&self) -> Vec<StatGroup> {
        vec![
            StatGroup {
                title: "Centralidad",
                rows: vec![
                    ("Media", format!("{:.4} V", self.mean)),
                    ("Mediana", format!("{:.4} V", self.median)),
                    ("Moda", self.mode_label()),
                ],
            },
            StatGroup {
                title: "Dispersión",
                rows: vec![
                    ("Rango", format!("{:.4} V", self.range)),
                    ("Desv. Estándar", format!("{:.4} V", self.std_dev)),
                    ("Varianza", format!("{:.4} V²", self.variance)),
                ],
            },
            StatGroup {
                title: "Otros",
                rows: vec![
                    ("Coef. Variación", format!("{:.4}", self.coefficient_variation)),
                    ("Semi-Intercuartil", format!("{:.4} V", self.semi_interquartile)),
                    ("Desv. Promedio", format!("{:.4} V", self.mean_absolute_deviation)),
                ],
            },
        ]
    }
}
/// Linear interpolation between order statistics at position `p * (n - 1)`.
/// `sorted` must be non-empty and ascending.
pub fn quantile_sorted(sorted: &[f64], p: f64) -> f64 {
    let pos = p.clamp(0.0, 1.0) * (sorted.len() - 1) as f64;
    let lo = pos.floor() as usize;
    let hi = pos.ceil() as usize;
    let frac = pos - lo as f64;
    sorted[lo] + (sorted[hi] - sorted[lo]) * frac
}
fn modes_sorted(sorted: &[f64]) -> Vec<f64> {
    let mut runs: Vec<(f64, usize)> = Vec::new();
    for &v in sorted {
        match runs.last_mut() {
            Some((value, count)) if *value == v => *count += 1,
            _ => runs.push((v, 1)),
        }
    }
    let best = runs.iter().map(|(_, c)| *c).max().unwrap_or(0);
    runs.into_iter()
        .filter(|(_, c)| *c == best)
        .map(|(v, _)| v)
        .collect()
}
#[cfg(test)]
mod tests {
    use super::*;
    use crate::analysis::readings::Reading;
    use rand::Rng;
    fn set(values: &[f64]) -> ReadingSet {
        ReadingSet::new(
            values
                .iter()
                .enumerate()
                .map(|(i, v)| Reading::new(format!("08:{i:02}"), *v))
                .collect(),
        )
        .unwrap()
    }
    fn close(a: f64, b: f64) -> bool {
        (a - b).abs() < 1e-9
    }
    #[test]
    fn basic_statistics() {
        let stats = SummaryStatistics::compute(&set(&[1.0, 2.0, 3.0, 4.0]));
        assert_eq!(stats.count, 4);
        assert!(close(stats.mean, 2.5));
        assert!(close(stats.median, 2.5));
        assert_eq!(stats.mode, vec![1.0, 2.0, 3.0, 4.0]);
        assert!(close(stats.variance, 5.0 / 3.0));
        assert!(close(stats.std_dev, (5.0f64 / 3.0).sqrt()));
        assert_eq!(stats.range, 3.0);
        // q1 = 1.75, q3 = 3.25
        assert!(close(stats.semi_interquartile, 0.75));
        assert!(close(stats.mean_absolute_deviation, 1.0));
        assert!(close(stats.coefficient_variation, stats.std_dev / 2.5));
    }
    #[test]
    fn odd_count_median_and_single_mode() {
        let stats = SummaryStatistics::compute(&set(&[126.0, 128.0, 127.0, 128.0, 125.0]));
        assert_eq!(stats.median, 127.0);
        assert_eq!(stats.mode, vec![128.0]);
    }
    #[test]
    fn tied_modes_are_all_reported() {
        let stats = SummaryStatistics::compute(&set(&[130.0, 125.0, 130.0, 125.0, 127.0]));
        assert_eq!(stats.mode, vec![125.0, 130.0]);
        assert_eq!(stats.mode_label(), "125.0, 130.0 V");
    }
    #[test]
    fn constant_series_has_no_spread() {
        let stats = SummaryStatistics::compute(&set(&[127.3; 6]));
        assert_eq!(stats.std_dev, 0.0);
        assert_eq!(stats.variance, 0.0);
        assert_eq!(stats.mean_absolute_deviation, 0.0);
        assert_eq!(stats.mode, vec![127.3]);
        assert_eq!(stats.range, 0.0);
        assert_eq!(stats.semi_interquartile, 0.0);
    }
    #[test]
    fn single_reading_is_defined() {
        let stats = SummaryStatistics::compute(&set(&[126.5]));
        assert_eq!(stats.variance, 0.0);
        assert_eq!(stats.std_dev, 0.0);
        assert_eq!(stats.coefficient_variation, 0.0);
        assert_eq!(stats.median, 126.5);
        assert_eq!(stats.mode, vec![126.5]);
        assert_eq!(stats.semi_interquartile, 0.0);
    }
    #[test]
    fn zero_mean_gives_zero_coefficient() {
        let stats = SummaryStatistics::compute(&set(&[-1.0, 1.0]));
        assert_eq!(stats.mean, 0.0);
        assert_eq!(stats.coefficient_variation, 0.0);
        assert!(stats.std_dev > 0.0);
    }
    #[test]
    fn dropped_row_example() {
        let stats = SummaryStatistics::compute(&set(&[127.1, 126.9]));
        assert!((stats.mean - 127.0).abs() < 1e-9);
        assert!((stats.range - 0.2).abs() < 1e-9);
    }
    #[test]
    fn random_series_keep_their_invariants() {
        let mut rng = rand::thread_rng();
        for _ in 0..50 {
            let n = rng.gen_range(1..200);
            let values: Vec<f64> = (0..n).map(|_| rng.gen_range(110.0..140.0)).collect();
            let readings = set(&values);
            let stats = SummaryStatistics::compute(&readings);
            let max = values.iter().cloned().fold(f64::MIN, f64::max);
            let min = values.iter().cloned().fold(f64::MAX, f64::min);
            assert_eq!(stats.range, max - min);
            let abs_sum: f64 = readings.iter().map(|r| r.absolute_error).sum();
            let rel_sum: f64 = readings.iter().map(|r| r.relative_error_pct).sum();
            assert!((rel_sum - abs_sum / 127.0 * 100.0).abs() < 1e-6);
            assert!(stats.semi_interquartile >= 0.0);
            assert!(stats.min <= stats.median && stats.median <= stats.max);
            assert!(stats.variance >= 0.0);
        }
    }
    #[test]
    fn groups_cover_every_statistic() {
        let stats = SummaryStatistics::compute(&set(&[125.0, 130.0]));
        let rows: usize = stats.groups().iter().map(|g| g.rows.len()).sum();
        assert_eq!(rows, 9);
        assert_eq!(stats.groups()[0].rows[0].1, "127.5000 V");
    }
}
