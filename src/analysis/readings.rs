use serde::Serialize;
/// Reference voltage every error is measured against.
pub const NOMINAL_VOLTAGE: f64 = 127.00;
/// One timestamped voltage observation with its deviation from nominal.
#[derive(Clone, Debug, PartialEq, Serialize)]
pub struct Reading {
    pub timestamp: String,
    pub voltage: f64,
    pub absolute_error: f64,
    pub relative_error_pct: f64,
}
impl Reading {
    pub fn new(timestamp: impl Into<String>, voltage: f64) -> Self {
        let absolute_error = (voltage - NOMINAL_VOLTAGE).abs();
        Self {
            timestamp: timestamp.into(),
            voltage,
            absolute_error,
            relative_error_pct: absolute_error / NOMINAL_VOLTAGE * 100.0,
        }
    }
}
/// Ordered, non-empty set of readings from one document.
#[derive(Clone, Debug, PartialEq, Serialize)]
#[serde(transparent)]
pub struct ReadingSet {
    readings: Vec<Reading>,
}
impl ReadingSet {
    /// Returns `None` for an empty vector; a `ReadingSet` always holds at least one reading.
    pub fn new(readings: Vec<Reading>) -> Option<Self> {
        if readings.is_empty() {
            None
        } else {
            Some(Self { readings })
        }
    }
    pub fn len(&self) -> usize {
        self.readings.len()
    }
    pub fn iter(&self) -> std::slice::Iter<'_, Reading> {
        self.readings.iter()
    }
    pub fn voltages(&self) -> Vec<f64> {
        self.readings.iter().map(|r| r.voltage).collect()
    }
}
impl<'a> IntoIterator for &'a ReadingSet {
    type Item = &'a Reading;
    type IntoIter = std::slice::Iter<'a, Reading>;
    fn into_iter(self) -> Self::IntoIter {
        self.readings.iter()
    }
}
