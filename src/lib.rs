//! xlsxloader - Write a record set to an XLSX file and read it back
//!
//! このクレートは、レコード列をExcelファイル（XLSX）へ書き込み、同じファイルから
//! 行を読み戻して出力します。書き込みと読み込みにはそれぞれ2つの実装があります。
//!
//! | 機能 | パッケージレベル | 代替実装 |
//! | ---- | ---------------- | -------- |
//! | 書き込み | [`PackageWriter`]（XMLパートを直接生成） | [`WorkbookWriter`]（rust_xlsxwriter） |
//! | 読み込み | [`PackageReader`]（最初のワークシートを解析） | [`DriverReader`]（`select * from [sheet$]`） |
//!
//! # Quick Start
//!
//! ```rust,no_run
//! use xlsxloader::{sample_people, LoaderBuilder};
//!
//! fn main() -> Result<(), Box<dyn std::error::Error>> {
//!     // Test.xlsx / sheet / パッケージレベルの書き込みと読み込み
//!     let loader = LoaderBuilder::new().build()?;
//!
//!     // 書き込み、読み込み、出力
//!     loader.run(&sample_people(), std::io::stdout())?;
//!
//!     Ok(())
//! }
//! ```
//!
//! # 個別の実装を直接使う
//!
//! ```rust,no_run
//! use std::path::Path;
//! use xlsxloader::{sample_people, DriverReader, RecordWriter, RowReader, WorkbookWriter};
//!
//! fn main() -> Result<(), Box<dyn std::error::Error>> {
//!     let path = Path::new("people.xlsx");
//!     WorkbookWriter.write_records(path, "sheet", &sample_people())?;
//!
//!     let rows = DriverReader.read_rows(path, "sheet")?;
//!     for row in rows.rows() {
//!         println!("{}", row.join(" - "));
//!     }
//!
//!     Ok(())
//! }
//! ```

mod api;
mod builder;
mod driver;
mod error;
mod output;
mod package;
mod record;
mod security;
mod sheet_io;
mod types;
mod workbook;

// 公開API
pub use api::{OutputFormat, ReaderKind, ShortRowPolicy, WriterKind};
pub use builder::{Loader, LoaderBuilder, DEFAULT_FILE_NAME, DEFAULT_SHEET_NAME};
pub use driver::{DriverReader, TableQuery};
pub use error::XlsxLoaderError;
pub use package::{PackageReader, PackageWriter};
pub use record::{sample_people, Person, Record};
pub use security::SecurityConfig;
pub use sheet_io::{RecordWriter, RowReader};
pub use types::{CellValue, RowSet};
pub use workbook::WorkbookWriter;
