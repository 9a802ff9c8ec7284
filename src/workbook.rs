//! Workbook Writer Module
//!
//! `rust_xlsxwriter`のワークブックモデルを使用した書き込みを提供します。

use std::path::Path;

use rust_xlsxwriter::Workbook;
use tracing::info;

use crate::error::XlsxLoaderError;
use crate::record::Record;
use crate::sheet_io::RecordWriter;
use crate::types::CellValue;

/// スプレッドシートオブジェクトAPIによるライター
///
/// ヘッダーはレコード型の表示ラベル（例: `Name`, `Last Name`, `Age`）です。
/// 文字列は文字列セル、数値は数値セルとして型を保ったまま書き込みます。
#[derive(Debug, Clone, Copy, Default)]
pub struct WorkbookWriter;

impl RecordWriter for WorkbookWriter {
    fn write_records<T: Record>(
        &self,
        path: &Path,
        sheet_name: &str,
        records: &[T],
    ) -> Result<(), XlsxLoaderError> {
        let mut workbook = self.build(sheet_name, records)?;
        workbook.save(path)?;

        info!(
            path = %path.display(),
            sheet = sheet_name,
            rows = records.len(),
            "wrote workbook"
        );
        Ok(())
    }
}

impl WorkbookWriter {
    /// ワークブックをメモリ上のバイト列として生成
    pub fn save_to_buffer<T: Record>(
        &self,
        sheet_name: &str,
        records: &[T],
    ) -> Result<Vec<u8>, XlsxLoaderError> {
        let mut workbook = self.build(sheet_name, records)?;
        Ok(workbook.save_to_buffer()?)
    }

    fn build<T: Record>(&self, sheet_name: &str, records: &[T]) -> Result<Workbook, XlsxLoaderError> {
        let mut workbook = Workbook::new();
        let worksheet = workbook.add_worksheet();
        worksheet.set_name(sheet_name)?;

        for (col, label) in T::LABELS.iter().enumerate() {
            worksheet.write_string(0, col as u16, *label)?;
        }

        for (idx, record) in records.iter().enumerate() {
            let row = idx as u32 + 1;
            for (col, value) in record.values().iter().enumerate() {
                match value {
                    CellValue::Text(text) => worksheet.write_string(row, col as u16, text)?,
                    CellValue::Number(number) => worksheet.write_number(row, col as u16, *number)?,
                };
            }
        }

        Ok(workbook)
    }
}
