//! Output Formatters Implementation

use crate::error::XlsxLoaderError;
use crate::types::RowSet;
use std::io::Write;

/// 各行の先頭3セルを出力する際の区切り
const SEPARATOR: &str = " - ";

/// `A - B - C` 形式のフォーマッター
///
/// ヘッダーがある場合は最初に出力します。
pub struct PlainFormatter;

impl PlainFormatter {
    pub fn render<W: Write>(&self, rows: &RowSet, writer: &mut W) -> Result<(), XlsxLoaderError> {
        if let Some(header) = rows.header() {
            write_line(writer, header)?;
        }
        for row in rows.rows() {
            write_line(writer, row)?;
        }
        Ok(())
    }
}

fn write_line<W: Write>(writer: &mut W, cells: &[String]) -> Result<(), XlsxLoaderError> {
    let line = cells
        .iter()
        .take(3)
        .map(String::as_str)
        .collect::<Vec<_>>()
        .join(SEPARATOR);
    writeln!(writer, "{}", line)?;
    Ok(())
}

/// JSON形式のフォーマッター
pub struct JsonFormatter;

impl JsonFormatter {
    pub fn render<W: Write>(&self, rows: &RowSet, writer: &mut W) -> Result<(), XlsxLoaderError> {
        serde_json::to_writer_pretty(&mut *writer, rows)?;
        writeln!(writer)?;
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn sample() -> RowSet {
        let mut rows = RowSet::new(["Test 1", "Test 2", "Test 3"]);
        rows.set_header(vec!["FirstName".into(), "LastName".into(), "Age".into()]);
        rows.push_row(vec!["Vaan".into(), "No last name".into(), "15".into()]);
        rows.push_row(vec![
            "Basch".into(),
            "From Ronsenburg".into(),
            "30".into(),
            "extra".into(),
        ]);
        rows
    }

    #[test]
    fn test_plain_formatter() {
        let mut output = Vec::new();
        PlainFormatter.render(&sample(), &mut output).unwrap();

        let text = String::from_utf8(output).unwrap();
        let lines: Vec<&str> = text.lines().collect();
        assert_eq!(
            lines,
            [
                "FirstName - LastName - Age",
                "Vaan - No last name - 15",
                "Basch - From Ronsenburg - 30",
            ]
        );
    }

    #[test]
    fn test_plain_formatter_short_row() {
        let mut rows = RowSet::new(["A", "B"]);
        rows.push_row(vec!["x".into(), "y".into()]);

        let mut output = Vec::new();
        PlainFormatter.render(&rows, &mut output).unwrap();
        assert_eq!(String::from_utf8(output).unwrap(), "x - y\n");
    }

    #[test]
    fn test_json_formatter() {
        let mut output = Vec::new();
        JsonFormatter.render(&sample(), &mut output).unwrap();

        let value: serde_json::Value = serde_json::from_slice(&output).unwrap();
        assert_eq!(value["columns"][0], "Test 1");
        assert_eq!(value["header"][2], "Age");
        assert_eq!(value["rows"][1][0], "Basch");
        assert_eq!(value["rows"].as_array().unwrap().len(), 2);
    }

    #[test]
    fn test_json_formatter_without_header() {
        let rows = RowSet::new(["Test 1"]);
        let mut output = Vec::new();
        JsonFormatter.render(&rows, &mut output).unwrap();

        let value: serde_json::Value = serde_json::from_slice(&output).unwrap();
        assert!(value["header"].is_null());
    }
}
