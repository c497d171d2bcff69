//! Archive Writer Module
//!
//! 分類子ドキュメントを単一エントリのZIPアーカイブとして書き出すモジュール。
//!
//! アーカイブ名は`<入力ファイル名>_<yyyy.MM.dd-HH.mm.ss>.zip`、
//! エントリ名は`Classif_<分類子ID>.xml`です。

use std::io::{Cursor, Seek, Write};
use std::path::{Path, PathBuf};

use chrono::{Local, NaiveDateTime};
use tracing::info;
use zip::write::FileOptions;
use zip::{CompressionMethod, ZipWriter};

use crate::error::ClassifError;
use crate::security::validate_entry_name;

/// アーカイブ名に付与するタイムスタンプの形式
pub const TIMESTAMP_FORMAT: &str = "%Y.%m.%d-%H.%M.%S";

/// アーカイブの拡張子
pub const ARCHIVE_EXTENSION: &str = "zip";

/// 入力ファイルのパスからアーカイブのパスを決定する
///
/// # 引数
///
/// * `input` - 入力ファイルのパス
/// * `output_dir` - 出力先ディレクトリ（`None`の場合は入力ファイルと同じディレクトリ）
/// * `timestamp` - アーカイブ名に付与する時刻
///
/// # 使用例
///
/// ```rust
/// use chrono::NaiveDate;
/// use frgu_classif::archive_path;
/// use std::path::Path;
///
/// let timestamp = NaiveDate::from_ymd_opt(2024, 3, 5)
///     .unwrap()
///     .and_hms_opt(9, 7, 1)
///     .unwrap();
/// let path = archive_path(Path::new("/data/frgu.xlsx"), None, timestamp);
/// assert_eq!(path, Path::new("/data/frgu_2024.03.05-09.07.01.zip"));
/// ```
pub fn archive_path(input: &Path, output_dir: Option<&Path>, timestamp: NaiveDateTime) -> PathBuf {
    let base = input
        .file_stem()
        .map(|stem| stem.to_string_lossy().into_owned())
        .unwrap_or_default();
    let file_name = format!(
        "{}_{}.{}",
        base,
        timestamp.format(TIMESTAMP_FORMAT),
        ARCHIVE_EXTENSION
    );

    let dir = match output_dir {
        Some(dir) => dir.to_path_buf(),
        None => input.parent().map(Path::to_path_buf).unwrap_or_default(),
    };
    dir.join(file_name)
}

/// 現在時刻（ローカル時刻）でアーカイブのパスを決定する
pub fn archive_path_now(input: &Path, output_dir: Option<&Path>) -> PathBuf {
    archive_path(input, output_dir, Local::now().naive_local())
}

/// テキストを単一エントリのZIPアーカイブとしてライターに書き出す
pub fn write_archive<W: Write + Seek>(
    output: W,
    entry_name: &str,
    content: &str,
) -> Result<W, ClassifError> {
    validate_entry_name(entry_name).map_err(ClassifError::SecurityViolation)?;

    let mut zip = ZipWriter::new(output);
    let options = FileOptions::default().compression_method(CompressionMethod::Deflated);
    zip.start_file(entry_name, options)?;
    zip.write_all(content.as_bytes())?;
    Ok(zip.finish()?)
}

/// アーカイブをファイルに保存する
///
/// アーカイブ全体をメモリ上で組み立ててから書き込むため、
/// 途中で失敗した場合に不完全なファイルは残りません。
pub fn save_archive(path: &Path, entry_name: &str, content: &str) -> Result<(), ClassifError> {
    let buffer = write_archive(Cursor::new(Vec::new()), entry_name, content)?.into_inner();
    std::fs::write(path, buffer)?;
    info!(path = %path.display(), entry = entry_name, "archive saved");
    Ok(())
}
