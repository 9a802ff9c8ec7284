//! Public API Types
//!
//! 公開APIで使用する列挙型を定義するモジュール。

/// 書き込み方式
///
/// レコード列をXLSXファイルへ書き出す実装を選択します。
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
#[non_exhaustive]
pub enum WriterKind {
    /// パッケージレベルの書き込み（デフォルト）
    ///
    /// ZIPコンテナとSpreadsheetMLの各XMLパートを直接生成します。
    /// ヘッダーはレコード型のフィールド名（例: `FirstName`）、
    /// すべてのセルは文字列型（`t="str"`）として出力されます。
    #[default]
    Package,

    /// スプレッドシートオブジェクトAPIによる書き込み
    ///
    /// `rust_xlsxwriter`のワークブックモデルを使用します。
    /// ヘッダーは表示ラベル（例: `Last Name`）、年齢は数値セルのまま保存されます。
    Workbook,
}

/// 読み込み方式
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
#[non_exhaustive]
pub enum ReaderKind {
    /// パッケージレベルの読み込み（デフォルト）
    ///
    /// 最初のワークシートパートを開き、先頭3セルを位置で取り出します。
    /// シート名は選択に使用されません。
    #[default]
    Package,

    /// ドライバ経由の読み込み
    ///
    /// `select * from [<sheet>$]` をドライバ（calamine）へ発行し、
    /// シート名で仮想テーブルを解決します。先頭行が列名になります。
    Driver,
}

/// 列数が足りない行の扱い
///
/// パッケージレベルの読み込みで、3セル未満の行や値要素のないセルを
/// 検出した場合の動作を指定します。
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
#[non_exhaustive]
pub enum ShortRowPolicy {
    /// エラーを返す（デフォルト）
    #[default]
    Fail,

    /// 空文字列で埋める
    Pad,
}

/// 行の出力フォーマット
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
#[non_exhaustive]
pub enum OutputFormat {
    /// `A - B - C` 形式（デフォルト）
    ///
    /// # 出力例
    ///
    /// ```text
    /// FirstName - LastName - Age
    /// Vaan - No last name - 15
    /// ```
    #[default]
    Plain,

    /// JSON形式
    ///
    /// # 出力例
    ///
    /// ```json
    /// {
    ///   "columns": ["Test 1", "Test 2", "Test 3"],
    ///   "header": ["FirstName", "LastName", "Age"],
    ///   "rows": [["Vaan", "No last name", "15"]]
    /// }
    /// ```
    Json,
}
