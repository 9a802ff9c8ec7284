//! Security Module
//!
//! パッケージ読み込み時の安全対策を実装するモジュール。
//! ZIP bomb、パストラバーサル、過大な入力ファイルへの対策を提供します。

use std::io::{Read, Seek};
use zip::ZipArchive;

use crate::error::XlsxLoaderError;

/// セキュリティ設定
///
/// パッケージ処理時の制限値を定義します。
#[derive(Debug, Clone)]
pub struct SecurityConfig {
    /// 展開後の最大サイズ（バイト）
    /// デフォルト: 1GB (1_073_741_824 bytes)
    pub max_decompressed_size: u64,
    /// ZIPアーカイブ内の最大ファイル数
    /// デフォルト: 10000
    pub max_file_count: usize,
    /// 単一ファイルの最大サイズ（バイト）
    /// デフォルト: 100MB (104_857_600 bytes)
    pub max_file_size: u64,
    /// 入力ファイルの最大サイズ（バイト）
    /// デフォルト: 2GB (2_147_483_648 bytes)
    pub max_input_file_size: u64,
}

impl Default for SecurityConfig {
    fn default() -> Self {
        Self {
            max_decompressed_size: 1_073_741_824, // 1GB
            max_file_count: 10_000,
            max_file_size: 104_857_600,         // 100MB
            max_input_file_size: 2_147_483_648, // 2GB
        }
    }
}

impl SecurityConfig {
    /// 入力ファイルサイズの上限を検証
    pub fn check_input_size(&self, size: u64) -> Result<(), XlsxLoaderError> {
        if size > self.max_input_file_size {
            return Err(XlsxLoaderError::SecurityViolation(format!(
                "Input file size exceeds maximum: {} bytes (max: {} bytes)",
                size, self.max_input_file_size
            )));
        }
        Ok(())
    }

    /// アーカイブ全体の検証
    ///
    /// ファイル数、各エントリのパスとサイズ、展開後サイズの合計を確認します。
    pub fn check_archive<R: Read + Seek>(
        &self,
        archive: &mut ZipArchive<R>,
    ) -> Result<(), XlsxLoaderError> {
        if archive.len() > self.max_file_count {
            return Err(XlsxLoaderError::SecurityViolation(format!(
                "ZIP archive contains too many files: {} (max: {})",
                archive.len(),
                self.max_file_count
            )));
        }

        let mut total_decompressed_size = 0u64;
        for i in 0..archive.len() {
            let file = archive
                .by_index(i)
                .map_err(|e| XlsxLoaderError::Zip(format!("{}", e)))?;

            let file_name = file.name();
            validate_zip_path(file_name).map_err(|e| {
                XlsxLoaderError::SecurityViolation(format!("Invalid ZIP path: {}", e))
            })?;

            let file_size = file.size();
            if file_size > self.max_file_size {
                return Err(XlsxLoaderError::SecurityViolation(format!(
                    "File '{}' exceeds maximum size: {} bytes (max: {} bytes)",
                    file_name, file_size, self.max_file_size
                )));
            }

            total_decompressed_size =
                total_decompressed_size
                    .checked_add(file_size)
                    .ok_or_else(|| {
                        XlsxLoaderError::SecurityViolation(
                            "Total decompressed size calculation overflow".to_string(),
                        )
                    })?;

            if total_decompressed_size > self.max_decompressed_size {
                return Err(XlsxLoaderError::SecurityViolation(format!(
                    "Total decompressed size exceeds maximum: {} bytes (max: {} bytes)",
                    total_decompressed_size, self.max_decompressed_size
                )));
            }
        }

        Ok(())
    }

    /// エントリを`max_file_size`まで読み込む
    ///
    /// ZIPヘッダーの申告サイズではなく、実際に展開されたバイト数で判定します。
    pub fn read_entry<R: Read>(&self, name: &str, entry: R) -> Result<Vec<u8>, XlsxLoaderError> {
        let mut content = Vec::new();
        entry
            .take(self.max_file_size.saturating_add(1))
            .read_to_end(&mut content)?;

        if content.len() as u64 > self.max_file_size {
            return Err(XlsxLoaderError::SecurityViolation(format!(
                "File '{}' exceeds maximum size while reading (max: {} bytes)",
                name, self.max_file_size
            )));
        }
        Ok(content)
    }
}

/// ファイルパスの検証
///
/// パストラバーサル攻撃を防ぐため、ZIPエントリのパスを検証します。
///
/// # 戻り値
///
/// * `Ok(())` - パスが安全な場合
/// * `Err(String)` - パスが危険な場合（`..`や絶対パスを含む）
pub(crate) fn validate_zip_path(path: &str) -> Result<(), String> {
    if path.is_empty() {
        return Err("Empty path is not allowed".to_string());
    }

    // 絶対パスを拒否（Windows形式の`C:\`やUnix形式の`/`で始まるパス）
    if path.starts_with('/') || path.starts_with("C:\\") || path.starts_with("c:\\") {
        return Err(format!("Absolute path is not allowed: {}", path));
    }

    if path.contains("..") {
        return Err(format!("Path traversal detected: {}", path));
    }

    if path.contains('\\') {
        return Err(format!("Backslash in path is not allowed: {}", path));
    }

    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_validate_zip_path_valid() {
        assert!(validate_zip_path("xl/workbook.xml").is_ok());
        assert!(validate_zip_path("xl/worksheets/sheet1.xml").is_ok());
        assert!(validate_zip_path("[Content_Types].xml").is_ok());
        assert!(validate_zip_path("_rels/.rels").is_ok());
    }

    #[test]
    fn test_validate_zip_path_empty() {
        assert!(validate_zip_path("").is_err());
    }

    #[test]
    fn test_validate_zip_path_absolute() {
        assert!(validate_zip_path("/etc/passwd").is_err());
        assert!(validate_zip_path("C:\\Windows\\system32").is_err());
        assert!(validate_zip_path("c:\\xl\\workbook.xml").is_err());
    }

    #[test]
    fn test_validate_zip_path_traversal() {
        assert!(validate_zip_path("../etc/passwd").is_err());
        assert!(validate_zip_path("xl/../../etc/passwd").is_err());
        assert!(validate_zip_path("..").is_err());
    }

    #[test]
    fn test_validate_zip_path_backslash() {
        assert!(validate_zip_path("xl\\workbook.xml").is_err());
    }

    #[test]
    fn test_read_entry_within_limit() {
        let config = SecurityConfig {
            max_file_size: 8,
            ..SecurityConfig::default()
        };
        let content = config.read_entry("part.xml", &b"12345678"[..]).unwrap();
        assert_eq!(content, b"12345678");
    }

    #[test]
    fn test_read_entry_over_limit() {
        let config = SecurityConfig {
            max_file_size: 8,
            ..SecurityConfig::default()
        };
        match config.read_entry("part.xml", &b"123456789"[..]) {
            Err(XlsxLoaderError::SecurityViolation(msg)) => {
                assert!(msg.contains("part.xml"));
                assert!(msg.contains("exceeds maximum size"));
            }
            other => panic!("Expected SecurityViolation error, got {:?}", other),
        }
    }

    #[test]
    fn test_check_input_size() {
        let config = SecurityConfig {
            max_input_file_size: 10,
            ..SecurityConfig::default()
        };
        assert!(config.check_input_size(10).is_ok());
        assert!(matches!(
            config.check_input_size(11),
            Err(XlsxLoaderError::SecurityViolation(_))
        ));
    }
}
