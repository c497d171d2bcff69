//! Security Module
//!
//! 入力ファイルのサイズ制限と、アーカイブのエントリ名の検証を提供するモジュール。
//! 分類子IDはユーザー指定のスキーマファイルから読み込まれる可能性があるため、
//! エントリ名にパストラバーサルが含まれないことを確認します。

/// セキュリティ設定
#[derive(Debug, Clone)]
pub(crate) struct SecurityConfig {
    /// 入力ファイルの最大サイズ（バイト）
    /// デフォルト: 256MB (268_435_456 bytes)
    pub max_input_file_size: u64,
}

impl Default for SecurityConfig {
    fn default() -> Self {
        Self {
            max_input_file_size: 268_435_456, // 256MB
        }
    }
}

/// アーカイブのエントリ名の検証
///
/// # 戻り値
///
/// * `Ok(())` - エントリ名が安全な場合
/// * `Err(String)` - 空、絶対パス、`..`、区切り文字を含む場合
pub(crate) fn validate_entry_name(name: &str) -> Result<(), String> {
    if name.is_empty() {
        return Err("Empty entry name is not allowed".to_string());
    }

    // 絶対パスを拒否（Unix形式の`/`やWindows形式のドライブ指定）
    if name.starts_with('/') || name.as_bytes().get(1) == Some(&b':') {
        return Err(format!("Absolute path is not allowed: {}", name));
    }

    if name.contains("..") {
        return Err(format!("Path traversal detected: {}", name));
    }

    // エントリはアーカイブ直下に置く
    if name.contains('/') || name.contains('\\') {
        return Err(format!("Path separator in entry name is not allowed: {}", name));
    }

    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_validate_entry_name_valid() {
        assert!(validate_entry_name("Classif_fa101c64-0e12-4ee7-ba9e-3c5b7c263d90.xml").is_ok());
        assert!(validate_entry_name("Classif_abc.xml").is_ok());
    }

    #[test]
    fn test_validate_entry_name_empty() {
        assert!(validate_entry_name("").is_err());
    }

    #[test]
    fn test_validate_entry_name_absolute() {
        assert!(validate_entry_name("/etc/passwd").is_err());
        assert!(validate_entry_name("C:\\Windows\\x.xml").is_err());
        assert!(validate_entry_name("c:x.xml").is_err());
    }

    #[test]
    fn test_validate_entry_name_traversal() {
        assert!(validate_entry_name("Classif_../../x.xml").is_err());
        assert!(validate_entry_name("..").is_err());
    }

    #[test]
    fn test_validate_entry_name_separator() {
        assert!(validate_entry_name("Classif_a/b.xml").is_err());
        assert!(validate_entry_name("Classif_a\\b.xml").is_err());
    }

    #[test]
    fn test_default_input_limit() {
        assert_eq!(SecurityConfig::default().max_input_file_size, 268_435_456);
    }
}
