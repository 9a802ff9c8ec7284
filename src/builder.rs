//! Builder Module
//!
//! Fluent Builder APIを提供し、`Loader`インスタンスを段階的に構築する。

use std::io::Write;
use std::path::{Path, PathBuf};

use tracing::info;

use crate::api::{OutputFormat, ReaderKind, ShortRowPolicy, WriterKind};
use crate::driver::DriverReader;
use crate::error::XlsxLoaderError;
use crate::output::RowPrinter;
use crate::package::{PackageReader, PackageWriter};
use crate::record::Record;
use crate::sheet_io::{RecordWriter, RowReader};
use crate::types::RowSet;
use crate::workbook::WorkbookWriter;

/// デフォルトのファイル名（カレントディレクトリ基準）
pub const DEFAULT_FILE_NAME: &str = "Test.xlsx";

/// デフォルトのシート名
pub const DEFAULT_SHEET_NAME: &str = "sheet";

/// シート名に使用できない文字
const INVALID_SHEET_CHARS: [char; 7] = ['[', ']', ':', '*', '?', '/', '\\'];

/// シート名の最大文字数
const MAX_SHEET_NAME_LEN: usize = 31;

/// 処理の設定を保持する内部構造体
#[derive(Debug, Clone)]
pub(crate) struct LoaderConfig {
    /// 書き込み・読み込み対象のファイル
    pub path: PathBuf,

    /// シート名
    pub sheet_name: String,

    /// 書き込み方式
    pub writer: WriterKind,

    /// 読み込み方式
    pub reader: ReaderKind,

    /// 列数が足りない行の扱い
    pub short_row_policy: ShortRowPolicy,

    /// 出力フォーマット
    pub output_format: OutputFormat,
}

impl Default for LoaderConfig {
    fn default() -> Self {
        Self {
            path: PathBuf::from(DEFAULT_FILE_NAME),
            sheet_name: DEFAULT_SHEET_NAME.to_string(),
            writer: WriterKind::Package,
            reader: ReaderKind::Package,
            short_row_policy: ShortRowPolicy::Fail,
            output_format: OutputFormat::Plain,
        }
    }
}

/// Fluent Builder APIを提供する構造体
///
/// すべての設定項目にデフォルト値が設定されており、必要な設定のみをオーバーライドできます。
///
/// # 使用例
///
/// ```rust,no_run
/// use xlsxloader::{LoaderBuilder, ReaderKind, WriterKind};
///
/// # fn main() -> Result<(), xlsxloader::XlsxLoaderError> {
/// let loader = LoaderBuilder::new()
///     .with_path("out/people.xlsx")
///     .with_writer(WriterKind::Workbook)
///     .with_reader(ReaderKind::Driver)
///     .build()?;
/// # Ok(())
/// # }
/// ```
#[derive(Debug, Default)]
pub struct LoaderBuilder {
    config: LoaderConfig,
}

impl LoaderBuilder {
    /// デフォルト設定でビルダーを作成
    ///
    /// - ファイル: `Test.xlsx`
    /// - シート名: `sheet`
    /// - 書き込み: `WriterKind::Package`
    /// - 読み込み: `ReaderKind::Package`
    /// - 短い行: `ShortRowPolicy::Fail`
    /// - 出力: `OutputFormat::Plain`
    pub fn new() -> Self {
        Self::default()
    }

    /// 書き込み・読み込み対象のファイルを設定
    pub fn with_path(mut self, path: impl Into<PathBuf>) -> Self {
        self.config.path = path.into();
        self
    }

    /// シート名を設定
    pub fn with_sheet_name(mut self, name: impl Into<String>) -> Self {
        self.config.sheet_name = name.into();
        self
    }

    /// 書き込み方式を設定
    pub fn with_writer(mut self, writer: WriterKind) -> Self {
        self.config.writer = writer;
        self
    }

    /// 読み込み方式を設定
    pub fn with_reader(mut self, reader: ReaderKind) -> Self {
        self.config.reader = reader;
        self
    }

    /// 列数が足りない行の扱いを設定
    pub fn with_short_row_policy(mut self, policy: ShortRowPolicy) -> Self {
        self.config.short_row_policy = policy;
        self
    }

    /// 出力フォーマットを設定
    pub fn with_output_format(mut self, format: OutputFormat) -> Self {
        self.config.output_format = format;
        self
    }

    /// 設定を検証して`Loader`を構築
    ///
    /// # エラー
    ///
    /// * `XlsxLoaderError::Config` - パスが空、またはシート名が不正な場合
    pub fn build(self) -> Result<Loader, XlsxLoaderError> {
        if self.config.path.as_os_str().is_empty() {
            return Err(XlsxLoaderError::Config("File path is empty".to_string()));
        }

        validate_sheet_name(&self.config.sheet_name)?;

        Ok(Loader {
            config: self.config,
        })
    }
}

/// シート名の検証
fn validate_sheet_name(name: &str) -> Result<(), XlsxLoaderError> {
    if name.is_empty() {
        return Err(XlsxLoaderError::Config("Sheet name is empty".to_string()));
    }

    let len = name.chars().count();
    if len > MAX_SHEET_NAME_LEN {
        return Err(XlsxLoaderError::Config(format!(
            "Sheet name '{}' is {} characters long (max: {})",
            name, len, MAX_SHEET_NAME_LEN
        )));
    }

    if let Some(ch) = name.chars().find(|ch| INVALID_SHEET_CHARS.contains(ch)) {
        return Err(XlsxLoaderError::Config(format!(
            "Sheet name '{}' contains invalid character '{}'",
            name, ch
        )));
    }

    if name.starts_with('\'') || name.ends_with('\'') {
        return Err(XlsxLoaderError::Config(format!(
            "Sheet name '{}' must not start or end with an apostrophe",
            name
        )));
    }

    Ok(())
}

/// 書き込み・読み込み・出力のファサード
///
/// # 使用例
///
/// ```rust,no_run
/// use xlsxloader::{sample_people, LoaderBuilder};
///
/// # fn main() -> Result<(), xlsxloader::XlsxLoaderError> {
/// let loader = LoaderBuilder::new().build()?;
/// let rows = loader.run(&sample_people(), std::io::stdout())?;
/// assert_eq!(rows.len(), 12);
/// # Ok(())
/// # }
/// ```
#[derive(Debug, Clone)]
pub struct Loader {
    config: LoaderConfig,
}

impl Loader {
    /// 対象ファイル
    pub fn path(&self) -> &Path {
        &self.config.path
    }

    /// シート名
    pub fn sheet_name(&self) -> &str {
        &self.config.sheet_name
    }

    /// 選択された方式でレコードを書き込む
    pub fn write_records<T: Record>(&self, records: &[T]) -> Result<(), XlsxLoaderError> {
        let path = self.path();
        let sheet_name = self.sheet_name();
        match self.config.writer {
            WriterKind::Package => PackageWriter.write_records(path, sheet_name, records),
            WriterKind::Workbook => WorkbookWriter.write_records(path, sheet_name, records),
        }
    }

    /// 選択された方式で行を読み込む
    pub fn read_rows(&self) -> Result<RowSet, XlsxLoaderError> {
        let path = self.path();
        let sheet_name = self.sheet_name();
        match self.config.reader {
            ReaderKind::Package => {
                PackageReader::new(self.config.short_row_policy).read_rows(path, sheet_name)
            }
            ReaderKind::Driver => DriverReader.read_rows(path, sheet_name),
        }
    }

    /// 行を出力する
    pub fn print_rows<W: Write>(&self, rows: &RowSet, mut output: W) -> Result<(), XlsxLoaderError> {
        RowPrinter::from_format(self.config.output_format).render(rows, &mut output)?;
        output.flush()?;
        Ok(())
    }

    /// 書き込み、読み込み、出力を順に実行
    ///
    /// # 処理フロー
    ///
    /// 1. `Writing Excel file` を出力し、レコードを書き込む（ファイルはここで閉じられる）
    /// 2. `Reading Excel data` を出力し、同じファイルから行を読み込む
    /// 3. 各行を出力する
    ///
    /// 進捗行はJSON出力時には出力されません。
    pub fn run<T: Record, W: Write>(
        &self,
        records: &[T],
        mut output: W,
    ) -> Result<RowSet, XlsxLoaderError> {
        let progress = self.config.output_format == OutputFormat::Plain;

        if progress {
            writeln!(output, "Writing Excel file")?;
        }
        self.write_records(records)?;

        if progress {
            writeln!(output, "Reading Excel data")?;
        }
        let rows = self.read_rows()?;

        self.print_rows(&rows, &mut output)?;

        info!(
            path = %self.path().display(),
            written = records.len(),
            read = rows.len(),
            "round trip complete"
        );
        Ok(rows)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_builder_default() {
        let builder = LoaderBuilder::new();
        assert_eq!(builder.config.path, PathBuf::from("Test.xlsx"));
        assert_eq!(builder.config.sheet_name, "sheet");
        assert_eq!(builder.config.writer, WriterKind::Package);
        assert_eq!(builder.config.reader, ReaderKind::Package);
        assert_eq!(builder.config.short_row_policy, ShortRowPolicy::Fail);
        assert_eq!(builder.config.output_format, OutputFormat::Plain);
    }

    #[test]
    fn test_builder_method_chaining() {
        let builder = LoaderBuilder::new()
            .with_path("data/out.xlsx")
            .with_sheet_name("people")
            .with_writer(WriterKind::Workbook)
            .with_reader(ReaderKind::Driver)
            .with_short_row_policy(ShortRowPolicy::Pad)
            .with_output_format(OutputFormat::Json);

        assert_eq!(builder.config.path, PathBuf::from("data/out.xlsx"));
        assert_eq!(builder.config.sheet_name, "people");
        assert_eq!(builder.config.writer, WriterKind::Workbook);
        assert_eq!(builder.config.reader, ReaderKind::Driver);
        assert_eq!(builder.config.short_row_policy, ShortRowPolicy::Pad);
        assert_eq!(builder.config.output_format, OutputFormat::Json);
    }

    #[test]
    fn test_build_success() {
        let loader = LoaderBuilder::new().build().unwrap();
        assert_eq!(loader.path(), Path::new("Test.xlsx"));
        assert_eq!(loader.sheet_name(), "sheet");
    }

    #[test]
    fn test_build_with_empty_path() {
        match LoaderBuilder::new().with_path("").build() {
            Err(XlsxLoaderError::Config(msg)) => assert!(msg.contains("path")),
            _ => panic!("Expected Config error"),
        }
    }

    #[test]
    fn test_build_with_empty_sheet_name() {
        match LoaderBuilder::new().with_sheet_name("").build() {
            Err(XlsxLoaderError::Config(msg)) => assert!(msg.contains("empty")),
            _ => panic!("Expected Config error"),
        }
    }

    #[test]
    fn test_build_with_long_sheet_name() {
        let name = "x".repeat(32);
        assert!(LoaderBuilder::new().with_sheet_name(name).build().is_err());

        let name = "x".repeat(31);
        assert!(LoaderBuilder::new().with_sheet_name(name).build().is_ok());
    }

    #[test]
    fn test_build_with_invalid_sheet_chars() {
        for name in ["a[b", "a]b", "a:b", "a*b", "a?b", "a/b", "a\\b"] {
            match LoaderBuilder::new().with_sheet_name(name).build() {
                Err(XlsxLoaderError::Config(msg)) => assert!(msg.contains("invalid character")),
                _ => panic!("Expected Config error for {}", name),
            }
        }
    }

    #[test]
    fn test_build_with_apostrophe_sheet_name() {
        assert!(LoaderBuilder::new().with_sheet_name("'quoted").build().is_err());
        assert!(LoaderBuilder::new().with_sheet_name("quoted'").build().is_err());
        assert!(LoaderBuilder::new().with_sheet_name("it's").build().is_ok());
    }
}
