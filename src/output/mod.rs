//! Output Format Module
//!
//! 読み込んだ行の出力フォーマットを提供するモジュール。

mod formatters;

use crate::error::XlsxLoaderError;
use crate::types::RowSet;
use std::io::Write;

pub use formatters::*;

/// 行の出力フォーマッター
#[derive(Debug, Clone, Copy)]
pub enum RowPrinter {
    Plain,
    Json,
}

impl RowPrinter {
    /// 出力フォーマットからフォーマッターを生成
    pub fn from_format(format: crate::api::OutputFormat) -> Self {
        match format {
            crate::api::OutputFormat::Plain => RowPrinter::Plain,
            crate::api::OutputFormat::Json => RowPrinter::Json,
        }
    }

    /// 表を指定されたフォーマットで出力する
    pub fn render<W: Write>(&self, rows: &RowSet, writer: &mut W) -> Result<(), XlsxLoaderError> {
        match self {
            RowPrinter::Plain => PlainFormatter.render(rows, writer),
            RowPrinter::Json => JsonFormatter.render(rows, writer),
        }
    }
}
