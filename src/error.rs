//! Error Types Module
//!
//! クレート全体で使用する構造化エラー型を定義するモジュール。
//! `thiserror`を使用して、エラーの自動変換とメッセージフォーマットを実現する。
//!
//! ここに定義されるのは処理全体を中断する致命的なエラーのみです。
//! ヘッダー欠落などの回復可能な問題は [`crate::Diagnostic`] として報告されます。

use std::path::PathBuf;

use thiserror::Error;

/// frgu-classifクレート全体で使用するエラー型
///
/// # エラーの種類
///
/// - `Io`: I/O操作中に発生したエラー（ファイル読み込み・書き込み失敗など）
/// - `Parse`: ワークブックの解析中に発生したエラー（calamine由来）
/// - `Xml`: 分類子ドキュメントの書き出し中に発生したエラー
/// - `Zip`: アーカイブの書き出し中に発生したエラー
/// - `Schema`: 分類子スキーマ・レイアウト（JSON）の読み込みに失敗したエラー
/// - `Config`: 設定の検証に失敗したエラー
/// - `InputNotFound`: 入力ファイルが存在しない
/// - `NoWorksheet`: ワークブックにシートが一つもない
/// - `MalformedSheet`: シートの行数・列数が最小要件を満たさない
/// - `SecurityViolation`: 入力サイズ上限やエントリ名の検証に違反した
///
/// # 使用例
///
/// ```rust,no_run
/// use frgu_classif::ClassifError;
/// use std::fs::File;
///
/// fn open_table(path: &str) -> Result<(), ClassifError> {
///     let _file = File::open(path)?;  // Ioエラーが自動的に変換される
///     Ok(())
/// }
/// ```
#[derive(Error, Debug)]
pub enum ClassifError {
    /// I/O操作中に発生したエラー
    ///
    /// `#[from]`属性により、`std::io::Error`から自動的に変換されます。
    #[error("IO error: {0}")]
    Io(#[from] std::io::Error),

    /// ワークブックの解析中に発生したエラー
    ///
    /// ファイル形式が不正、破損したファイルなどが原因となります。
    #[error("Failed to parse workbook: {0}")]
    Parse(#[from] calamine::Error),

    /// XMLドキュメントの書き出しエラー
    #[error("XML writer error: {0}")]
    Xml(#[from] quick_xml::Error),

    /// ZIPアーカイブの書き出しエラー
    #[error("ZIP archive error: {0}")]
    Zip(#[from] zip::result::ZipError),

    /// スキーマ・レイアウトファイルの解析エラー
    #[error("Invalid JSON configuration: {0}")]
    Schema(#[from] serde_json::Error),

    /// 設定の検証に失敗したエラー
    ///
    /// `ConverterBuilder::build()`時に設定を検証し、無効な設定が検出された
    /// 場合に発生します。例えば、座標に0が指定された場合や、ヘッダー行が
    /// 最初のデータ行より下にある場合などです。
    ///
    /// # 例
    ///
    /// ```rust,no_run
    /// use frgu_classif::{ClassifError, ConverterBuilder, SheetLayout};
    ///
    /// let layout = SheetLayout {
    ///     first_data_row: 0,
    ///     ..SheetLayout::default()
    /// };
    ///
    /// match ConverterBuilder::new().with_layout(layout).build() {
    ///     Err(ClassifError::Config(msg)) => println!("設定エラー: {}", msg),
    ///     _ => {}
    /// }
    /// ```
    #[error("Configuration error: {0}")]
    Config(String),

    /// 入力ファイルが存在しない
    #[error("Input file does not exist: {}", .0.display())]
    InputNotFound(PathBuf),

    /// ワークブックにシートが含まれていない
    #[error("Workbook does not contain any worksheet")]
    NoWorksheet,

    /// シートの大きさが最小要件を満たさない
    ///
    /// ヘッダー2行と最初のデータ列を保持できないシートは処理できません。
    /// このエラーが発生した場合、レコードは一件も出力されません。
    #[error("Malformed sheet '{sheet}' ({rows} rows x {columns} columns): {message}")]
    MalformedSheet {
        /// シート名
        sheet: String,
        /// シートの行数
        rows: usize,
        /// シートの列数
        columns: usize,
        /// 詳細メッセージ
        message: String,
    },

    /// セキュリティ制限に違反したエラー
    ///
    /// 入力ファイルサイズの上限超過や、アーカイブのエントリ名に
    /// パストラバーサルが含まれる場合に発生します。
    #[error("Security violation: {0}")]
    SecurityViolation(String),
}
