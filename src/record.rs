//! Record Module
//!
//! 書き込み対象のレコード型と、そのスキーマ（列名・表示ラベル）を定義するモジュール。
//! 列の構成は実行時の型検査ではなく、各レコード型が静的に宣言します。

use crate::types::CellValue;

/// スプレッドシートへ書き出せるレコード
///
/// `FIELDS`、`LABELS`、`values()`の要素数は一致している必要があります。
pub trait Record {
    /// フィールド名（パッケージレベル書き込みのヘッダー）
    const FIELDS: &'static [&'static str];

    /// 表示ラベル（オブジェクトAPI書き込みのヘッダー）
    const LABELS: &'static [&'static str];

    /// フィールド値を`FIELDS`の順で返す
    fn values(&self) -> Vec<CellValue>;
}

/// 人物レコード
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Person {
    pub first_name: String,
    pub last_name: String,
    pub age: u32,
}

impl Person {
    pub fn new(first_name: impl Into<String>, last_name: impl Into<String>, age: u32) -> Self {
        Self {
            first_name: first_name.into(),
            last_name: last_name.into(),
            age,
        }
    }
}

impl Record for Person {
    const FIELDS: &'static [&'static str] = &["FirstName", "LastName", "Age"];
    const LABELS: &'static [&'static str] = &["Name", "Last Name", "Age"];

    fn values(&self) -> Vec<CellValue> {
        vec![
            CellValue::from(self.first_name.as_str()),
            CellValue::from(self.last_name.as_str()),
            CellValue::from(self.age),
        ]
    }
}

/// サンプルデータ（12件）を生成
///
/// 名前付きの2件に続き、年齢20から連番の10件を生成します。
pub fn sample_people() -> Vec<Person> {
    let mut people = vec![
        Person::new("Vaan", "No last name", 15),
        Person::new("Basch", "From Ronsenburg", 30),
    ];

    people.extend((0..10).map(|i| Person::new(format!("More {}", i), "Last name", 20 + i)));

    people
}
