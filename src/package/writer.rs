//! Package Writer
//!
//! ワークブックを構成するXMLパートを`quick-xml`で生成し、ZIPコンテナへ格納します。

use std::fs::File;
use std::io::{Seek, Write};
use std::path::Path;

use quick_xml::events::{BytesDecl, BytesEnd, BytesStart, BytesText, Event};
use quick_xml::Writer;
use tracing::{debug, info};
use zip::write::FileOptions;
use zip::{CompressionMethod, ZipWriter};

use super::escape::encode_cell_text;
use super::{
    CT_RELATIONSHIPS, CT_WORKBOOK, CT_WORKSHEET, NS_CONTENT_TYPES, NS_PACKAGE_RELATIONSHIPS,
    NS_RELATIONSHIPS, NS_SPREADSHEET, PART_CONTENT_TYPES, PART_FIRST_WORKSHEET, PART_ROOT_RELS,
    PART_WORKBOOK, PART_WORKBOOK_RELS, REL_OFFICE_DOCUMENT, REL_WORKSHEET,
};
use crate::error::XlsxLoaderError;
use crate::record::Record;
use crate::sheet_io::RecordWriter;
use crate::types::{CellCoord, CellValue};

/// パッケージレベルのライター
///
/// 1枚のシートを持つワークブックを生成します。先頭行はレコード型の
/// フィールド名、以降の行は各レコードの値を文字列に変換したものです。
/// すべてのセルは文字列型（`t="str"`）として出力されます。
///
/// # 使用例
///
/// ```rust,no_run
/// use std::path::Path;
/// use xlsxloader::{sample_people, PackageWriter, RecordWriter};
///
/// # fn main() -> Result<(), xlsxloader::XlsxLoaderError> {
/// PackageWriter.write_records(Path::new("Test.xlsx"), "sheet", &sample_people())?;
/// # Ok(())
/// # }
/// ```
#[derive(Debug, Clone, Copy, Default)]
pub struct PackageWriter;

impl RecordWriter for PackageWriter {
    fn write_records<T: Record>(
        &self,
        path: &Path,
        sheet_name: &str,
        records: &[T],
    ) -> Result<(), XlsxLoaderError> {
        // 既存ファイルは警告なしで置き換える
        let file = File::create(path)?;
        let file = self.write_to(file, sheet_name, records)?;
        file.sync_all()?;

        info!(
            path = %path.display(),
            sheet = sheet_name,
            rows = records.len(),
            "wrote package"
        );
        Ok(())
    }
}

impl PackageWriter {
    /// 任意のライターへパッケージを書き込み、ライターを返す
    pub fn write_to<W: Write + Seek, T: Record>(
        &self,
        writer: W,
        sheet_name: &str,
        records: &[T],
    ) -> Result<W, XlsxLoaderError> {
        let mut zip = ZipWriter::new(writer);
        let options = FileOptions::default().compression_method(CompressionMethod::Deflated);

        write_part(&mut zip, options, PART_CONTENT_TYPES, &content_types_xml()?)?;
        write_part(&mut zip, options, PART_ROOT_RELS, &root_rels_xml()?)?;
        write_part(&mut zip, options, PART_WORKBOOK, &workbook_xml(sheet_name)?)?;
        write_part(&mut zip, options, PART_WORKBOOK_RELS, &workbook_rels_xml()?)?;
        write_part(&mut zip, options, PART_FIRST_WORKSHEET, &worksheet_xml(records)?)?;

        let mut inner = zip
            .finish()
            .map_err(|e| XlsxLoaderError::Zip(format!("{}", e)))?;
        inner.flush()?;
        Ok(inner)
    }
}

fn write_part<W: Write + Seek>(
    zip: &mut ZipWriter<W>,
    options: FileOptions,
    name: &str,
    content: &[u8],
) -> Result<(), XlsxLoaderError> {
    zip.start_file(name, options)
        .map_err(|e| XlsxLoaderError::Zip(format!("{}", e)))?;
    zip.write_all(content)?;
    debug!(part = name, bytes = content.len(), "wrote part");
    Ok(())
}

/// XML宣言付きのドキュメントを生成
fn xml_document<F>(build: F) -> Result<Vec<u8>, XlsxLoaderError>
where
    F: FnOnce(&mut Writer<Vec<u8>>) -> quick_xml::Result<()>,
{
    let mut writer = Writer::new(Vec::new());
    writer
        .write_event(Event::Decl(BytesDecl::new("1.0", Some("UTF-8"), Some("yes"))))
        .and_then(|_| build(&mut writer))
        .map_err(|e| XlsxLoaderError::Xml(format!("{}", e)))?;
    Ok(writer.into_inner())
}

fn content_types_xml() -> Result<Vec<u8>, XlsxLoaderError> {
    xml_document(|w| {
        w.write_event(Event::Start(
            BytesStart::new("Types").with_attributes([("xmlns", NS_CONTENT_TYPES)]),
        ))?;
        w.write_event(Event::Empty(BytesStart::new("Default").with_attributes([
            ("Extension", "rels"),
            ("ContentType", CT_RELATIONSHIPS),
        ])))?;
        w.write_event(Event::Empty(BytesStart::new("Default").with_attributes([
            ("Extension", "xml"),
            ("ContentType", "application/xml"),
        ])))?;
        w.write_event(Event::Empty(BytesStart::new("Override").with_attributes([
            ("PartName", "/xl/workbook.xml"),
            ("ContentType", CT_WORKBOOK),
        ])))?;
        w.write_event(Event::Empty(BytesStart::new("Override").with_attributes([
            ("PartName", "/xl/worksheets/sheet1.xml"),
            ("ContentType", CT_WORKSHEET),
        ])))?;
        w.write_event(Event::End(BytesEnd::new("Types")))?;
        Ok(())
    })
}

fn root_rels_xml() -> Result<Vec<u8>, XlsxLoaderError> {
    relationships_xml(REL_OFFICE_DOCUMENT, PART_WORKBOOK)
}

fn workbook_rels_xml() -> Result<Vec<u8>, XlsxLoaderError> {
    relationships_xml(REL_WORKSHEET, "worksheets/sheet1.xml")
}

/// `rId1`のみを持つリレーションシップパート
fn relationships_xml(rel_type: &str, target: &str) -> Result<Vec<u8>, XlsxLoaderError> {
    xml_document(|w| {
        w.write_event(Event::Start(
            BytesStart::new("Relationships").with_attributes([("xmlns", NS_PACKAGE_RELATIONSHIPS)]),
        ))?;
        w.write_event(Event::Empty(BytesStart::new("Relationship").with_attributes([
            ("Id", "rId1"),
            ("Type", rel_type),
            ("Target", target),
        ])))?;
        w.write_event(Event::End(BytesEnd::new("Relationships")))?;
        Ok(())
    })
}

fn workbook_xml(sheet_name: &str) -> Result<Vec<u8>, XlsxLoaderError> {
    xml_document(|w| {
        w.write_event(Event::Start(BytesStart::new("workbook").with_attributes([
            ("xmlns", NS_SPREADSHEET),
            ("xmlns:r", NS_RELATIONSHIPS),
        ])))?;
        w.write_event(Event::Start(BytesStart::new("sheets")))?;
        w.write_event(Event::Empty(BytesStart::new("sheet").with_attributes([
            ("name", sheet_name),
            ("sheetId", "1"),
            ("r:id", "rId1"),
        ])))?;
        w.write_event(Event::End(BytesEnd::new("sheets")))?;
        w.write_event(Event::End(BytesEnd::new("workbook")))?;
        Ok(())
    })
}

fn worksheet_xml<T: Record>(records: &[T]) -> Result<Vec<u8>, XlsxLoaderError> {
    xml_document(|w| {
        w.write_event(Event::Start(
            BytesStart::new("worksheet").with_attributes([("xmlns", NS_SPREADSHEET)]),
        ))?;
        w.write_event(Event::Start(BytesStart::new("sheetData")))?;

        write_row(w, 0, T::FIELDS.iter().map(|field| field.to_string()))?;
        for (idx, record) in records.iter().enumerate() {
            let values = record.values();
            write_row(w, idx as u32 + 1, values.iter().map(CellValue::to_text))?;
        }

        w.write_event(Event::End(BytesEnd::new("sheetData")))?;
        w.write_event(Event::End(BytesEnd::new("worksheet")))?;
        Ok(())
    })
}

/// 1行分の`<row>`要素を出力（`row`は0始まり）
fn write_row<W, I>(w: &mut Writer<W>, row: u32, cells: I) -> quick_xml::Result<()>
where
    W: Write,
    I: IntoIterator<Item = String>,
{
    let row_ref = (row + 1).to_string();
    w.write_event(Event::Start(
        BytesStart::new("row").with_attributes([("r", row_ref.as_str())]),
    ))?;

    for (col, text) in cells.into_iter().enumerate() {
        let cell_ref = CellCoord::new(row, col as u32).to_a1_notation();
        w.write_event(Event::Start(
            BytesStart::new("c").with_attributes([("r", cell_ref.as_str()), ("t", "str")]),
        ))?;
        w.write_event(Event::Start(BytesStart::new("v")))?;
        w.write_event(Event::Text(BytesText::new(&encode_cell_text(&text))))?;
        w.write_event(Event::End(BytesEnd::new("v")))?;
        w.write_event(Event::End(BytesEnd::new("c")))?;
    }

    w.write_event(Event::End(BytesEnd::new("row")))?;
    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::record::Person;

    fn as_str(bytes: &[u8]) -> &str {
        std::str::from_utf8(bytes).unwrap()
    }

    #[test]
    fn test_worksheet_xml_header_and_rows() {
        let xml = worksheet_xml(&[Person::new("Vaan", "No last name", 15)]).unwrap();
        let xml = as_str(&xml);

        assert!(xml.starts_with("<?xml version=\"1.0\" encoding=\"UTF-8\" standalone=\"yes\"?>"));
        assert!(xml.contains(r#"<row r="1"><c r="A1" t="str"><v>FirstName</v></c>"#));
        assert!(xml.contains(r#"<c r="C1" t="str"><v>Age</v></c>"#));
        assert!(xml.contains(r#"<c r="B2" t="str"><v>No last name</v></c>"#));
        assert!(xml.contains(r#"<c r="C2" t="str"><v>15</v></c>"#));
        assert!(!xml.contains(r#"<row r="3">"#));
    }

    #[test]
    fn test_worksheet_xml_escapes_text() {
        let xml = worksheet_xml(&[Person::new("A & B", "<x>", 1)]).unwrap();
        let xml = as_str(&xml);

        assert!(xml.contains("<v>A &amp; B</v>"));
        assert!(xml.contains("<v>&lt;x&gt;</v>"));
    }

    #[test]
    fn test_worksheet_xml_escapes_control_chars() {
        let xml = worksheet_xml(&[Person::new("x\u{1}y", "_x0041_", 1)]).unwrap();
        let xml = as_str(&xml);

        assert!(xml.contains("<v>x_x0001_y</v>"));
        assert!(xml.contains("<v>_x005F_x0041_</v>"));
        assert!(!xml.contains('\u{1}'));
    }

    #[test]
    fn test_worksheet_xml_header_only() {
        let xml = worksheet_xml::<Person>(&[]).unwrap();
        let xml = as_str(&xml);

        assert!(xml.contains(r#"<row r="1">"#));
        assert!(!xml.contains(r#"<row r="2">"#));
    }

    #[test]
    fn test_workbook_xml_sheet_name() {
        let xml = workbook_xml("sheet").unwrap();
        let xml = as_str(&xml);

        assert!(xml.contains(r#"<sheet name="sheet" sheetId="1" r:id="rId1"/>"#));
    }

    #[test]
    fn test_workbook_rels_target() {
        let xml = workbook_rels_xml().unwrap();
        assert!(as_str(&xml).contains(r#"Target="worksheets/sheet1.xml""#));
    }

    #[test]
    fn test_write_to_produces_all_parts() {
        let cursor = PackageWriter
            .write_to(std::io::Cursor::new(Vec::new()), "sheet", &[Person::new("a", "b", 1)])
            .unwrap();

        let mut archive = zip::ZipArchive::new(cursor).unwrap();
        for part in [
            PART_CONTENT_TYPES,
            PART_ROOT_RELS,
            PART_WORKBOOK,
            PART_WORKBOOK_RELS,
            PART_FIRST_WORKSHEET,
        ] {
            assert!(archive.by_name(part).is_ok(), "missing part {}", part);
        }
    }
}
