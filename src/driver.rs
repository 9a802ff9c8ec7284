//! Driver Module
//!
//! シートを仮想テーブル`<sheet>$`として扱い、`select *`クエリで行を取得する
//! ドライバ経由の読み込みを提供します。ドライバにはcalamineを使用し、
//! xlsx / xlsm / xlsb / xls / ods を自動判別します。

use std::fmt;
use std::path::Path;

use calamine::{open_workbook_auto, Data, Reader};
use tracing::{debug, info};

use crate::error::XlsxLoaderError;
use crate::sheet_io::RowReader;
use crate::types::RowSet;

/// 仮想テーブルに対する`select *`クエリ
///
/// # 使用例
///
/// ```rust
/// use xlsxloader::TableQuery;
///
/// let query = TableQuery::select_all("sheet");
/// assert_eq!(query.table(), "sheet$");
/// assert_eq!(query.to_string(), "select * from [sheet$]");
/// ```
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct TableQuery {
    table: String,
}

impl TableQuery {
    /// シート名から仮想テーブル`<sheet>$`を対象とするクエリを生成
    pub fn select_all(sheet_name: &str) -> Self {
        Self {
            table: format!("{}$", sheet_name),
        }
    }

    /// 仮想テーブル名
    pub fn table(&self) -> &str {
        &self.table
    }

    /// テーブル名が指すシート名
    pub fn sheet_name(&self) -> &str {
        self.table.strip_suffix('$').unwrap_or(&self.table)
    }
}

impl fmt::Display for TableQuery {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "select * from [{}]", self.table)
    }
}

/// ドライバ経由のリーダー
///
/// 先頭行を列名とし、残りの行を結果セットとして返します。
/// 値はすべて文字列に変換されます。
#[derive(Debug, Clone, Copy, Default)]
pub struct DriverReader;

impl RowReader for DriverReader {
    fn read_rows(&self, path: &Path, sheet_name: &str) -> Result<RowSet, XlsxLoaderError> {
        self.query(path, &TableQuery::select_all(sheet_name))
    }
}

impl DriverReader {
    /// クエリを実行
    ///
    /// # 戻り値
    ///
    /// * `Ok(RowSet)` - 結果セット
    /// * `Err(XlsxLoaderError::SheetNotFound)` - テーブルに対応するシートがない場合
    /// * `Err(XlsxLoaderError::Parse)` - ドライバがファイルを開けない場合
    pub fn query(&self, path: &Path, query: &TableQuery) -> Result<RowSet, XlsxLoaderError> {
        debug!(path = %path.display(), %query, "executing driver query");

        let mut workbook = open_workbook_auto(path)?;
        let sheet_name = query.sheet_name();
        if !workbook.sheet_names().iter().any(|name| name == sheet_name) {
            return Err(XlsxLoaderError::SheetNotFound(sheet_name.to_string()));
        }

        let range = workbook.worksheet_range(sheet_name)?;
        let mut rows = range.rows();

        let columns: Vec<String> = rows
            .next()
            .map(|row| row.iter().map(data_to_text).collect())
            .unwrap_or_default();

        let mut row_set = RowSet::new(columns.clone());
        if !columns.is_empty() {
            row_set.set_header(columns);
        }
        for row in rows {
            row_set.push_row(row.iter().map(data_to_text).collect());
        }

        info!(path = %path.display(), table = query.table(), rows = row_set.len(), "driver query done");
        Ok(row_set)
    }
}

/// セル値を文字列へ変換
fn data_to_text(data: &Data) -> String {
    match data {
        Data::Int(i) => i.to_string(),
        Data::Float(f) => f.to_string(),
        Data::String(s) => s.clone(),
        Data::Bool(b) => b.to_string(),
        Data::DateTime(dt) => dt.as_f64().to_string(),
        Data::DateTimeIso(s) | Data::DurationIso(s) => s.clone(),
        Data::Error(e) => e.to_string(),
        Data::Empty => String::new(),
    }
}
