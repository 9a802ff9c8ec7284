//! Types Module
//!
//! クレート全体で使用する共通データ型を定義するモジュール。

use serde::Serialize;

/// 書き込み時のセル値
#[derive(Debug, Clone, PartialEq)]
pub enum CellValue {
    /// 文字列
    Text(String),

    /// 数値（f64）
    Number(f64),
}

impl CellValue {
    /// 値を文字列として取得
    ///
    /// 整数値の数値は小数点なしで出力されます（例: `30.0` -> `"30"`）。
    pub fn to_text(&self) -> String {
        match self {
            CellValue::Text(s) => s.clone(),
            CellValue::Number(n) => n.to_string(),
        }
    }
}

impl From<&str> for CellValue {
    fn from(value: &str) -> Self {
        CellValue::Text(value.to_string())
    }
}

impl From<u32> for CellValue {
    fn from(value: u32) -> Self {
        CellValue::Number(f64::from(value))
    }
}

/// セル座標（0始まり）
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub(crate) struct CellCoord {
    pub row: u32,
    pub col: u32,
}

impl CellCoord {
    /// 新しい座標を生成
    pub fn new(row: u32, col: u32) -> Self {
        Self { row, col }
    }

    /// A1形式の文字列に変換（例: (0, 0) -> "A1"）
    #[allow(clippy::wrong_self_convention)]
    pub fn to_a1_notation(&self) -> String {
        format!("{}{}", col_index_to_letter(self.col), self.row + 1)
    }

    /// A1形式の文字列を解析（例: "B3" -> (2, 1)）
    ///
    /// 列部分のみの参照や不正な形式の場合は`None`を返します。
    pub fn parse_a1(reference: &str) -> Option<Self> {
        let split = reference
            .find(|c: char| c.is_ascii_digit())
            .filter(|&idx| idx > 0)?;
        let (letters, digits) = reference.split_at(split);

        let mut col: u32 = 0;
        for ch in letters.chars() {
            if !ch.is_ascii_alphabetic() {
                return None;
            }
            let value = (ch.to_ascii_uppercase() as u8 - b'A') as u32 + 1;
            col = col.checked_mul(26)?.checked_add(value)?;
        }

        let row = digits.parse::<u32>().ok()?.checked_sub(1)?;
        Some(Self::new(row, col - 1))
    }
}

/// 列インデックスを文字列に変換（0 -> "A", 25 -> "Z", 26 -> "AA"）
pub(crate) fn col_index_to_letter(mut col: u32) -> String {
    let mut result = String::new();
    loop {
        let remainder = col % 26;
        result.insert(0, (b'A' + remainder as u8) as char);
        if col < 26 {
            break;
        }
        col = col / 26 - 1;
    }
    result
}

/// 読み込み結果の表
///
/// 列ラベル、ファイルに保存されていた先頭行（ヘッダー）、データ行を保持します。
/// セル値はすべて文字列です。
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct RowSet {
    columns: Vec<String>,
    header: Option<Vec<String>>,
    rows: Vec<Vec<String>>,
}

impl RowSet {
    /// 列ラベルを指定して空の表を生成
    pub fn new<I, S>(columns: I) -> Self
    where
        I: IntoIterator<Item = S>,
        S: Into<String>,
    {
        Self {
            columns: columns.into_iter().map(Into::into).collect(),
            header: None,
            rows: Vec::new(),
        }
    }

    /// 列ラベル
    pub fn columns(&self) -> &[String] {
        &self.columns
    }

    /// ファイルの先頭行（存在する場合）
    pub fn header(&self) -> Option<&[String]> {
        self.header.as_deref()
    }

    /// データ行
    pub fn rows(&self) -> &[Vec<String>] {
        &self.rows
    }

    /// データ行数
    pub fn len(&self) -> usize {
        self.rows.len()
    }

    /// データ行が空かどうか
    pub fn is_empty(&self) -> bool {
        self.rows.is_empty()
    }

    pub(crate) fn set_header(&mut self, header: Vec<String>) {
        self.header = Some(header);
    }

    pub(crate) fn push_row(&mut self, row: Vec<String>) {
        self.rows.push(row);
    }
}
