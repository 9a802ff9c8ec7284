//! Error Types Module
//!
//! クレート全体で使用する構造化エラー型を定義するモジュール。
//! `thiserror`を使用して、エラーの自動変換とメッセージフォーマットを実現する。

use thiserror::Error;

/// xlsxloaderクレート全体で使用するエラー型
///
/// ファイルの書き込み、読み込み、行の組み立て中に発生する
/// すべてのエラーを統一的に扱うために使用されます。
///
/// # 使用例
///
/// ```rust,no_run
/// use xlsxloader::XlsxLoaderError;
/// use std::fs::File;
///
/// fn open_workbook(path: &str) -> Result<(), XlsxLoaderError> {
///     let _file = File::open(path)?;  // Ioエラーが自動的に変換される
///     Ok(())
/// }
/// ```
#[derive(Error, Debug)]
pub enum XlsxLoaderError {
    /// I/O操作中に発生したエラー
    ///
    /// `#[from]`属性により、`std::io::Error`から自動的に変換されます。
    #[error("IO error: {0}")]
    Io(#[from] std::io::Error),

    /// ドライバ経由の読み込み（calamine）で発生したエラー
    #[error("Failed to parse Excel file: {0}")]
    Parse(#[from] calamine::Error),

    /// オブジェクトAPI経由の書き込み（rust_xlsxwriter）で発生したエラー
    #[error("Failed to write workbook: {0}")]
    Writer(#[from] rust_xlsxwriter::XlsxError),

    /// UTF-8文字列の変換エラー
    #[error("UTF-8 conversion error: {0}")]
    Utf8(#[from] std::str::Utf8Error),

    /// 数値の解析エラー
    #[error("Number parse error: {0}")]
    ParseInt(#[from] std::num::ParseIntError),

    /// ZIPアーカイブの解析・生成エラー
    #[error("ZIP archive error: {0}")]
    Zip(String),

    /// XMLパートの解析・生成エラー
    #[error("XML error: {0}")]
    Xml(String),

    /// JSON出力のシリアライズエラー
    #[error("JSON error: {0}")]
    Json(#[from] serde_json::Error),

    /// 設定の検証に失敗したエラー
    ///
    /// `LoaderBuilder::build()`時に、空のパスや不正なシート名が
    /// 検出された場合に発生します。
    #[error("Configuration error: {0}")]
    Config(String),

    /// 指定されたシートが存在しない
    #[error("Sheet '{0}' not found")]
    SheetNotFound(String),

    /// パッケージに必須パートが含まれていない
    #[error("Missing package part: {0}")]
    MissingPart(String),

    /// 列数が足りない行
    ///
    /// `ShortRowPolicy::Fail`の場合に発生します。`row`は1始まりの行番号です。
    #[error("Row {row} has {found} cells, expected {expected}")]
    ShortRow {
        /// 行番号（1始まり）
        row: u32,
        /// 見つかったセル数
        found: usize,
        /// 必要なセル数
        expected: usize,
    },

    /// 値要素（`<v>`）を持たないセル
    #[error("Cell {column}{row} has no value")]
    MissingCellValue {
        /// 行番号（1始まり）
        row: u32,
        /// 列名（A, B, C, ...）
        column: String,
    },

    /// セキュリティ制限に違反したエラー
    ///
    /// ZIP bomb、パストラバーサル、ファイルサイズ制限などに
    /// 違反した場合に発生します。
    #[error("Security violation: {0}")]
    SecurityViolation(String),
}
