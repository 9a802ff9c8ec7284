//! Sheet I/O Traits
//!
//! 「レコードをファイルへ書き込む」「ファイルから行を読み込む」の2つの機能を
//! トレイトとして定義します。それぞれに2つの実装があり、呼び出し側が選択します。
//!
//! | 機能 | 実装 |
//! | ---- | ---- |
//! | 書き込み | [`PackageWriter`](crate::PackageWriter), [`WorkbookWriter`](crate::WorkbookWriter) |
//! | 読み込み | [`PackageReader`](crate::PackageReader), [`DriverReader`](crate::DriverReader) |

use std::path::Path;

use crate::error::XlsxLoaderError;
use crate::record::Record;
use crate::types::RowSet;

/// レコード列をスプレッドシートファイルへ書き込む
pub trait RecordWriter {
    /// `path`に1枚のシート`sheet_name`を持つファイルを作成する
    ///
    /// 既存のファイルは置き換えられます。
    fn write_records<T: Record>(
        &self,
        path: &Path,
        sheet_name: &str,
        records: &[T],
    ) -> Result<(), XlsxLoaderError>;
}

/// スプレッドシートファイルから行を読み込む
pub trait RowReader {
    fn read_rows(&self, path: &Path, sheet_name: &str) -> Result<RowSet, XlsxLoaderError>;
}
