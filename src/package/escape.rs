//! Cell Text Escapes
//!
//! XML 1.0で表現できない制御文字を、SpreadsheetMLの`_xHHHH_`形式で符号化・復号します。
//! 元のテキストに`_xHHHH_`と同じ並びがある場合は、先頭の`_`を`_x005F_`として保護します。

use std::borrow::Cow;

/// `_xHHHH_`の長さ
const ESCAPE_LEN: usize = 7;

/// XML 1.0の文字として書けない文字か
fn needs_escape(ch: char) -> bool {
    matches!(ch, '\u{0}'..='\u{8}' | '\u{B}' | '\u{C}' | '\u{E}'..='\u{1F}' | '\u{FFFE}' | '\u{FFFF}')
}

/// `text`の先頭が`_xHHHH_`ならそのコードポイントを返す
fn escape_at(text: &str) -> Option<u32> {
    let bytes = text.as_bytes();
    if bytes.len() < ESCAPE_LEN
        || bytes[0] != b'_'
        || !matches!(bytes[1], b'x' | b'X')
        || bytes[ESCAPE_LEN - 1] != b'_'
    {
        return None;
    }
    let hex = &bytes[2..ESCAPE_LEN - 1];
    if !hex.iter().all(u8::is_ascii_hexdigit) {
        return None;
    }
    u32::from_str_radix(std::str::from_utf8(hex).ok()?, 16).ok()
}

/// セルテキストを書き込み用に符号化
pub(crate) fn encode_cell_text(text: &str) -> Cow<'_, str> {
    let needs_work = text
        .char_indices()
        .any(|(idx, ch)| needs_escape(ch) || (ch == '_' && escape_at(&text[idx..]).is_some()));
    if !needs_work {
        return Cow::Borrowed(text);
    }

    let mut encoded = String::with_capacity(text.len() + ESCAPE_LEN);
    for (idx, ch) in text.char_indices() {
        if needs_escape(ch) || (ch == '_' && escape_at(&text[idx..]).is_some()) {
            encoded.push_str(&format!("_x{:04X}_", ch as u32));
        } else {
            encoded.push(ch);
        }
    }
    Cow::Owned(encoded)
}

/// 読み込んだセルテキストの`_xHHHH_`を復号
///
/// 有効な文字にならない並びはそのまま残します。
pub(crate) fn decode_cell_text(text: &str) -> Cow<'_, str> {
    if !text.contains('_') {
        return Cow::Borrowed(text);
    }

    let mut decoded = String::with_capacity(text.len());
    let mut rest = text;
    while let Some(pos) = rest.find('_') {
        decoded.push_str(&rest[..pos]);
        rest = &rest[pos..];

        match escape_at(rest).and_then(char::from_u32) {
            Some(ch) => {
                decoded.push(ch);
                rest = &rest[ESCAPE_LEN..];
            }
            None => {
                decoded.push('_');
                rest = &rest[1..];
            }
        }
    }
    decoded.push_str(rest);
    Cow::Owned(decoded)
}
