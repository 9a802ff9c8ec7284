//! Package Reader
//!
//! ZIPコンテナから最初のワークシートパートを取り出し、`quick-xml`で行を解析します。

use std::fs::File;
use std::io::{BufReader, Read, Seek, SeekFrom};
use std::path::Path;

use quick_xml::events::{BytesStart, Event};
use quick_xml::Reader;
use tracing::{debug, info, warn};
use zip::result::ZipError;
use zip::ZipArchive;

use super::escape::decode_cell_text;
use super::{PART_SHARED_STRINGS, PART_WORKBOOK_RELS};
use crate::api::ShortRowPolicy;
use crate::error::XlsxLoaderError;
use crate::security::{validate_zip_path, SecurityConfig};
use crate::sheet_io::RowReader;
use crate::types::{col_index_to_letter, CellCoord, RowSet};

/// パッケージレベルのリーダー
///
/// ワークブックの最初のワークシートパートを開き、各行の先頭3セルを
/// `Test 1`〜`Test 3`の列として取り出します。シート名は選択に使用されません。
/// 先頭行はヘッダーとして[`RowSet::header`]に格納されます。
///
/// 3セル未満の行、または値要素のないセルの扱いは[`ShortRowPolicy`]で指定します。
#[derive(Debug, Clone, Default)]
pub struct PackageReader {
    policy: ShortRowPolicy,
    security: SecurityConfig,
}

impl RowReader for PackageReader {
    fn read_rows(&self, path: &Path, sheet_name: &str) -> Result<RowSet, XlsxLoaderError> {
        debug!(
            sheet = sheet_name,
            "sheet name is not used for selection; opening the first worksheet part"
        );

        let file = File::open(path)?;
        let rows = self.read_from(BufReader::new(file))?;

        info!(path = %path.display(), rows = rows.len(), "read package");
        Ok(rows)
    }
}

impl PackageReader {
    /// 読み込み結果の列ラベル
    pub const COLUMNS: [&'static str; 3] = ["Test 1", "Test 2", "Test 3"];

    pub fn new(policy: ShortRowPolicy) -> Self {
        Self {
            policy,
            security: SecurityConfig::default(),
        }
    }

    /// セキュリティ制限を差し替える
    pub fn with_security_config(mut self, security: SecurityConfig) -> Self {
        self.security = security;
        self
    }

    /// 任意のリーダーからパッケージを読み込む
    pub fn read_from<R: Read + Seek>(&self, mut reader: R) -> Result<RowSet, XlsxLoaderError> {
        let size = reader.seek(SeekFrom::End(0))?;
        self.security.check_input_size(size)?;
        reader.rewind()?;

        let mut archive =
            ZipArchive::new(reader).map_err(|e| XlsxLoaderError::Zip(format!("{}", e)))?;
        self.security.check_archive(&mut archive)?;

        let part = first_worksheet_part(&mut archive, &self.security)?;
        let shared_strings = parse_shared_strings(&mut archive, &self.security)?;
        let xml = read_part(&mut archive, &self.security, &part)?;
        let sheet_rows = parse_sheet_rows(&xml, &shared_strings, Self::COLUMNS.len())?;

        debug!(
            part = part.as_str(),
            rows = sheet_rows.len(),
            shared_strings = shared_strings.len(),
            "parsed worksheet part"
        );

        self.build_row_set(sheet_rows)
    }

    fn build_row_set(&self, sheet_rows: Vec<SheetRow>) -> Result<RowSet, XlsxLoaderError> {
        let width = Self::COLUMNS.len();
        let mut row_set = RowSet::new(Self::COLUMNS);

        let mut rows = sheet_rows.into_iter();
        if let Some(first) = rows.next() {
            row_set.set_header(self.fit_row(first, width)?);
        }
        for row in rows {
            row_set.push_row(self.fit_row(row, width)?);
        }

        Ok(row_set)
    }

    /// 行を`width`セルに揃える（余分なセルは切り捨て）
    fn fit_row(&self, row: SheetRow, width: usize) -> Result<Vec<String>, XlsxLoaderError> {
        let found = row.cells.len();
        let mut cells = row.cells.into_iter();
        let mut fitted = Vec::with_capacity(width);

        for col in 0..width {
            match cells.next() {
                Some(Some(value)) => fitted.push(value),
                Some(None) => {
                    if self.policy == ShortRowPolicy::Fail {
                        return Err(XlsxLoaderError::MissingCellValue {
                            row: row.number,
                            column: col_index_to_letter(col as u32),
                        });
                    }
                    warn!(row = row.number, col, "cell has no value, padding");
                    fitted.push(String::new());
                }
                None => {
                    if self.policy == ShortRowPolicy::Fail {
                        return Err(XlsxLoaderError::ShortRow {
                            row: row.number,
                            found,
                            expected: width,
                        });
                    }
                    warn!(row = row.number, found, expected = width, "short row, padding");
                    fitted.push(String::new());
                }
            }
        }

        Ok(fitted)
    }
}

/// ワークシートの1行（セルは列位置に配置、値のないセルは`None`）
#[derive(Debug, Clone, PartialEq, Eq)]
struct SheetRow {
    /// 行番号（1始まり）
    number: u32,
    cells: Vec<Option<String>>,
}

/// パートを読み込む（展開サイズは`SecurityConfig::max_file_size`で制限）
fn read_optional_part<R: Read + Seek>(
    archive: &mut ZipArchive<R>,
    security: &SecurityConfig,
    name: &str,
) -> Result<Option<Vec<u8>>, XlsxLoaderError> {
    let file = match archive.by_name(name) {
        Ok(file) => file,
        Err(ZipError::FileNotFound) => return Ok(None),
        Err(e) => return Err(XlsxLoaderError::Zip(format!("{}", e))),
    };

    security.read_entry(name, file).map(Some)
}

fn read_part<R: Read + Seek>(
    archive: &mut ZipArchive<R>,
    security: &SecurityConfig,
    name: &str,
) -> Result<Vec<u8>, XlsxLoaderError> {
    read_optional_part(archive, security, name)?
        .ok_or_else(|| XlsxLoaderError::MissingPart(name.to_string()))
}

/// 最初のワークシートパートのパスを決定
///
/// `xl/_rels/workbook.xml.rels`のリレーションシップ順で最初のワークシートを選びます。
/// リレーションシップがない場合はアーカイブ内の格納順で探します。
fn first_worksheet_part<R: Read + Seek>(
    archive: &mut ZipArchive<R>,
    security: &SecurityConfig,
) -> Result<String, XlsxLoaderError> {
    if let Some(xml) = read_optional_part(archive, security, PART_WORKBOOK_RELS)? {
        if let Some(target) = parse_first_worksheet_target(&xml)? {
            let part = resolve_target(&target);
            validate_zip_path(&part).map_err(|e| {
                XlsxLoaderError::SecurityViolation(format!("Invalid part path: {}", e))
            })?;
            return Ok(part);
        }
    }

    for i in 0..archive.len() {
        let name = archive
            .by_index(i)
            .map_err(|e| XlsxLoaderError::Zip(format!("{}", e)))?
            .name()
            .to_string();
        if name.starts_with("xl/worksheets/") && name.ends_with(".xml") {
            return Ok(name);
        }
    }

    Err(XlsxLoaderError::MissingPart("worksheet".to_string()))
}

/// ワークブック基準の相対ターゲットをパッケージ内パスへ変換
fn resolve_target(target: &str) -> String {
    match target.strip_prefix('/') {
        Some(absolute) => absolute.to_string(),
        None => format!("xl/{}", target),
    }
}

fn parse_first_worksheet_target(xml: &[u8]) -> Result<Option<String>, XlsxLoaderError> {
    let mut reader = Reader::from_reader(xml);
    reader.trim_text(true);

    let mut buf = Vec::new();
    loop {
        match reader.read_event_into(&mut buf) {
            Ok(Event::Start(e)) | Ok(Event::Empty(e)) => {
                if e.local_name().as_ref() == b"Relationship" {
                    let rel_type = attribute(&e, b"Type")?;
                    let target = attribute(&e, b"Target")?;
                    // strict形式の名前空間も末尾で判定する
                    if let (Some(rel_type), Some(target)) = (rel_type, target) {
                        if rel_type.ends_with("/worksheet") {
                            return Ok(Some(target));
                        }
                    }
                }
            }
            Ok(Event::Eof) => break,
            Err(e) => return Err(XlsxLoaderError::Xml(format!("XML parse error: {}", e))),
            _ => {}
        }
        buf.clear();
    }

    Ok(None)
}

fn attribute(e: &BytesStart<'_>, key: &[u8]) -> Result<Option<String>, XlsxLoaderError> {
    for attr in e.attributes() {
        let attr =
            attr.map_err(|e| XlsxLoaderError::Xml(format!("XML attribute error: {}", e)))?;
        if attr.key.as_ref() == key {
            return Ok(Some(std::str::from_utf8(&attr.value)?.to_string()));
        }
    }
    Ok(None)
}

/// xl/sharedStrings.xml の解析
///
/// リッチテキストは連結し、ふりがな（`<rPh>`）は除外します。
fn parse_shared_strings<R: Read + Seek>(
    archive: &mut ZipArchive<R>,
    security: &SecurityConfig,
) -> Result<Vec<String>, XlsxLoaderError> {
    let xml = match read_optional_part(archive, security, PART_SHARED_STRINGS)? {
        Some(xml) => xml,
        None => return Ok(Vec::new()),
    };

    let mut reader = Reader::from_reader(xml.as_slice());

    let mut buf = Vec::new();
    let mut strings = Vec::new();
    let mut current: Option<String> = None;
    let mut in_t = false;
    let mut in_phonetic = false;

    loop {
        match reader.read_event_into(&mut buf) {
            Ok(Event::Start(e)) => match e.local_name().as_ref() {
                b"si" => current = Some(String::new()),
                b"rPh" => in_phonetic = true,
                b"t" if current.is_some() && !in_phonetic => in_t = true,
                _ => {}
            },
            Ok(Event::Empty(e)) => {
                if e.local_name().as_ref() == b"si" {
                    strings.push(String::new());
                }
            }
            Ok(Event::Text(e)) => {
                if in_t {
                    let text = e
                        .unescape()
                        .map_err(|e| XlsxLoaderError::Xml(format!("XML text error: {}", e)))?;
                    if let Some(current) = current.as_mut() {
                        current.push_str(&text);
                    }
                }
            }
            Ok(Event::CData(e)) => {
                if in_t {
                    if let Some(current) = current.as_mut() {
                        current.push_str(std::str::from_utf8(&e)?);
                    }
                }
            }
            Ok(Event::End(e)) => match e.local_name().as_ref() {
                b"si" => {
                    if let Some(text) = current.take() {
                        strings.push(decode_cell_text(&text).into_owned());
                    }
                }
                b"rPh" => in_phonetic = false,
                b"t" => in_t = false,
                _ => {}
            },
            Ok(Event::Eof) => break,
            Err(e) => return Err(XlsxLoaderError::Xml(format!("XML parse error: {}", e))),
            _ => {}
        }
        buf.clear();
    }

    Ok(strings)
}

/// 解析中のセル
#[derive(Debug)]
struct PendingCell {
    col: usize,
    kind: Option<String>,
    value: Option<String>,
}

/// ワークシートXMLの行を組み立てる状態
struct SheetParser<'s> {
    shared_strings: &'s [String],
    /// 保持する列数（これ以降の列のセルは捨てる）
    width: usize,
    rows: Vec<SheetRow>,
    row: Option<SheetRow>,
    next_row: u32,
    next_col: usize,
    cell: Option<PendingCell>,
    in_value: bool,
    in_inline: bool,
    in_text: bool,
    in_phonetic: bool,
}

impl<'s> SheetParser<'s> {
    fn new(shared_strings: &'s [String], width: usize) -> Self {
        Self {
            shared_strings,
            width,
            rows: Vec::new(),
            row: None,
            next_row: 1,
            next_col: 0,
            cell: None,
            in_value: false,
            in_inline: false,
            in_text: false,
            in_phonetic: false,
        }
    }

    fn start_row(&mut self, e: &BytesStart<'_>) -> Result<(), XlsxLoaderError> {
        let number = match attribute(e, b"r")? {
            Some(r) => r.parse::<u32>()?,
            None => self.next_row,
        };
        self.next_row = number.checked_add(1).ok_or_else(|| {
            XlsxLoaderError::Xml(format!("Row number {} is out of range", number))
        })?;
        self.next_col = 0;
        self.row = Some(SheetRow {
            number,
            cells: Vec::new(),
        });
        Ok(())
    }

    fn finish_row(&mut self) {
        if let Some(row) = self.row.take() {
            self.rows.push(row);
        }
    }

    fn start_cell(&mut self, e: &BytesStart<'_>) -> Result<(), XlsxLoaderError> {
        // 参照のないセルは直前のセルの次の列に置く
        let col = attribute(e, b"r")?
            .and_then(|r| CellCoord::parse_a1(&r))
            .map(|coord| coord.col as usize)
            .unwrap_or(self.next_col);

        self.cell = Some(PendingCell {
            col,
            kind: attribute(e, b"t")?,
            value: None,
        });
        Ok(())
    }

    fn begin_value(&mut self) {
        if let Some(cell) = self.cell.as_mut() {
            cell.value.get_or_insert_with(String::new);
        }
    }

    fn push_text(&mut self, text: &str) {
        if !(self.in_value || self.in_text) {
            return;
        }
        if let Some(cell) = self.cell.as_mut() {
            cell.value.get_or_insert_with(String::new).push_str(text);
        }
    }

    fn finish_cell(&mut self) -> Result<(), XlsxLoaderError> {
        let cell = match self.cell.take() {
            Some(cell) => cell,
            None => return Ok(()),
        };

        let value = match (cell.kind.as_deref(), cell.value) {
            (Some("s"), Some(raw)) => {
                let index = raw.trim().parse::<usize>()?;
                let text = self.shared_strings.get(index).cloned().ok_or_else(|| {
                    XlsxLoaderError::Xml(format!("Shared string index {} out of range", index))
                })?;
                Some(text)
            }
            (_, value) => value.map(|raw| decode_cell_text(&raw).into_owned()),
        };

        if let Some(row) = self.row.as_mut() {
            if cell.col < self.width {
                if row.cells.len() <= cell.col {
                    row.cells.resize(cell.col + 1, None);
                }
                row.cells[cell.col] = value;
            }
        }
        self.next_col = cell.col.saturating_add(1);
        Ok(())
    }

    fn start(&mut self, e: &BytesStart<'_>, empty: bool) -> Result<(), XlsxLoaderError> {
        match e.local_name().as_ref() {
            b"row" => {
                self.start_row(e)?;
                if empty {
                    self.finish_row();
                }
            }
            b"c" if self.row.is_some() => {
                self.start_cell(e)?;
                if empty {
                    self.finish_cell()?;
                }
            }
            b"v" if self.cell.is_some() => {
                self.begin_value();
                self.in_value = !empty;
            }
            b"is" if self.cell.is_some() => self.in_inline = !empty,
            b"rPh" if self.in_inline => self.in_phonetic = !empty,
            b"t" if self.in_inline && !self.in_phonetic => {
                self.begin_value();
                self.in_text = !empty;
            }
            _ => {}
        }
        Ok(())
    }

    fn end(&mut self, local_name: &[u8]) -> Result<(), XlsxLoaderError> {
        match local_name {
            b"row" => self.finish_row(),
            b"c" => self.finish_cell()?,
            b"v" => self.in_value = false,
            b"is" => self.in_inline = false,
            b"rPh" => self.in_phonetic = false,
            b"t" => self.in_text = false,
            _ => {}
        }
        Ok(())
    }
}

/// ワークシートXMLを行のリストへ変換
///
/// セルの値は空白も含めてそのまま保持するため、テキストのトリムは行いません。
fn parse_sheet_rows(
    xml: &[u8],
    shared_strings: &[String],
    width: usize,
) -> Result<Vec<SheetRow>, XlsxLoaderError> {
    let mut reader = Reader::from_reader(xml);
    let mut parser = SheetParser::new(shared_strings, width);

    let mut buf = Vec::new();
    loop {
        match reader.read_event_into(&mut buf) {
            Ok(Event::Start(e)) => parser.start(&e, false)?,
            Ok(Event::Empty(e)) => parser.start(&e, true)?,
            Ok(Event::Text(e)) => {
                let text = e
                    .unescape()
                    .map_err(|e| XlsxLoaderError::Xml(format!("XML text error: {}", e)))?;
                parser.push_text(&text);
            }
            Ok(Event::CData(e)) => parser.push_text(std::str::from_utf8(&e)?),
            Ok(Event::End(e)) => parser.end(e.local_name().as_ref())?,
            Ok(Event::Eof) => break,
            Err(e) => return Err(XlsxLoaderError::Xml(format!("XML parse error: {}", e))),
            _ => {}
        }
        buf.clear();
    }

    Ok(parser.rows)
}
