//! Package Module
//!
//! ZIPコンテナとSpreadsheetMLの各XMLパートを直接扱う、パッケージレベルの
//! 書き込み・読み込みを提供します。

mod escape;
mod reader;
mod writer;

pub use reader::PackageReader;
pub use writer::PackageWriter;

/// SpreadsheetMLの名前空間
pub(crate) const NS_SPREADSHEET: &str = "http://schemas.openxmlformats.org/spreadsheetml/2006/main";
/// オフィスドキュメントのリレーションシップ名前空間
pub(crate) const NS_RELATIONSHIPS: &str =
    "http://schemas.openxmlformats.org/officeDocument/2006/relationships";
/// パッケージのリレーションシップ名前空間
pub(crate) const NS_PACKAGE_RELATIONSHIPS: &str =
    "http://schemas.openxmlformats.org/package/2006/relationships";
/// Content Typesの名前空間
pub(crate) const NS_CONTENT_TYPES: &str =
    "http://schemas.openxmlformats.org/package/2006/content-types";

pub(crate) const REL_OFFICE_DOCUMENT: &str =
    "http://schemas.openxmlformats.org/officeDocument/2006/relationships/officeDocument";
pub(crate) const REL_WORKSHEET: &str =
    "http://schemas.openxmlformats.org/officeDocument/2006/relationships/worksheet";

pub(crate) const CT_RELATIONSHIPS: &str = "application/vnd.openxmlformats-package.relationships+xml";
pub(crate) const CT_WORKBOOK: &str =
    "application/vnd.openxmlformats-officedocument.spreadsheetml.sheet.main+xml";
pub(crate) const CT_WORKSHEET: &str =
    "application/vnd.openxmlformats-officedocument.spreadsheetml.worksheet+xml";

pub(crate) const PART_CONTENT_TYPES: &str = "[Content_Types].xml";
pub(crate) const PART_ROOT_RELS: &str = "_rels/.rels";
pub(crate) const PART_WORKBOOK: &str = "xl/workbook.xml";
pub(crate) const PART_WORKBOOK_RELS: &str = "xl/_rels/workbook.xml.rels";
pub(crate) const PART_SHARED_STRINGS: &str = "xl/sharedStrings.xml";
pub(crate) const PART_FIRST_WORKSHEET: &str = "xl/worksheets/sheet1.xml";
