/// One cell as the extractor hands it over.
#[derive(Clone, Debug, PartialEq)]
pub enum Cell {
    Text(String),
    Number(f64),
}
impl Cell {
    /// Tokens that parse as finite numbers become `Number`, everything else stays text.
    pub fn from_token(token: &str) -> Self {
        match token.trim().parse::<f64>() {
            Ok(v) if v.is_finite() => Cell::Number(v),
            _ => Cell::Text(token.to_owned()),
        }
    }
    pub fn is_number(&self) -> bool {
        matches!(self, Cell::Number(_))
    }
    /// Display text of the cell. Integral numbers render without a fractional part.
    pub fn to_text(&self) -> String {
        match self {
            Cell::Text(s) => s.clone(),
            Cell::Number(v) if v.fract() == 0.0 && v.abs() < 1e15 => format!("{}", *v as i64),
            Cell::Number(v) => v.to_string(),
        }
    }
    /// Finite value of the cell. `inf`, `infinity` and `NaN` count as unparseable.
    pub fn as_f64(&self) -> Option<f64> {
        match self {
            Cell::Number(v) if v.is_finite() => Some(*v),
            Cell::Number(_) => None,
            Cell::Text(s) => s.trim().parse::<f64>().ok().filter(|v| v.is_finite()),
        }
    }
}
impl From<&str> for Cell {
    fn from(value: &str) -> Self {
        Cell::Text(value.to_owned())
    }
}
impl From<f64> for Cell {
    fn from(value: f64) -> Self {
        Cell::Number(value)
    }
}
/// A table as extracted from the source document. Column identity comes only
/// from the column count; header text is informational.
#[derive(Clone, Debug, Default, PartialEq)]
pub struct RawTable {
    pub headers: Vec<String>,
    pub rows: Vec<Vec<Cell>>,
}
impl RawTable {
    pub fn new(headers: Vec<String>, rows: Vec<Vec<Cell>>) -> Self {
        Self { headers, rows }
    }
    pub fn column_count(&self) -> usize {
        self.rows
            .iter()
            .map(|r| r.len())
            .max()
            .unwrap_or(self.headers.len())
    }
    pub fn layout(&self) -> ColumnLayout {
        ColumnLayout::from_column_count(self.column_count())
    }
}
/// Column layouts the ingestion step understands.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum ColumnLayout {
    /// (timestamp, voltage, sorted-flag)
    ThreeColumn,
    /// (index, timestamp, voltage, sorted-flag)
    FourColumn,
    Unsupported(usize),
}
impl ColumnLayout {
    pub fn from_column_count(columns: usize) -> Self {
        match columns {
            3 => ColumnLayout::ThreeColumn,
            4 => ColumnLayout::FourColumn,
            n => ColumnLayout::Unsupported(n),
        }
    }
}
#[cfg(test)]
mod tests {
    use super::*;
    #[test]
    fn layout_is_decided_by_count_only() {
        assert_eq!(ColumnLayout::from_column_count(3), ColumnLayout::ThreeColumn);
        assert_eq!(ColumnLayout::from_column_count(4), ColumnLayout::FourColumn);
        assert_eq!(ColumnLayout::from_column_count(2), ColumnLayout::Unsupported(2));
    }
    #[test]
    fn column_count_falls_back_to_headers() {
        let table = RawTable::new(vec!["Hora".into(), "Voltaje".into()], Vec::new());
        assert_eq!(table.column_count(), 2);
        let table = RawTable::new(
            vec!["Hora".into()],
            vec![vec!["08:15".into(), 127.1.into(), "False".into()]],
        );
        assert_eq!(table.layout(), ColumnLayout::ThreeColumn);
    }
    #[test]
    fn cells_render_and_parse() {
        assert_eq!(Cell::from_token("127.5"), Cell::Number(127.5));
        assert_eq!(Cell::from_token("08:15"), Cell::Text("08:15".into()));
        assert_eq!(Cell::Number(3.0).to_text(), "3");
        assert_eq!(Cell::Number(3.25).to_text(), "3.25");
        assert_eq!(Cell::from(" 126.9 ").as_f64(), Some(126.9));
        assert_eq!(Cell::from("NaN").as_f64(), None);
        assert_eq!(Cell::from("abc").as_f64(), None);
    }
    #[test]
    fn infinity_is_not_a_reading() {
        for text in ["inf", "-inf", "Infinity", " infinity "] {
            assert_eq!(Cell::from(text).as_f64(), None, "{text}");
            assert!(!Cell::from_token(text).is_number(), "{text}");
        }
        assert_eq!(Cell::Number(f64::NEG_INFINITY).as_f64(), None);
        assert_eq!(Cell::from("1e308").as_f64(), Some(1e308));
    }
}
