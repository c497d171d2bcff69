//! frgu-classif - Municipal service FRGU code tables to XML classifier archives
//!
//! このクレートは、部署（列）×市町村サービス（行）のマトリクスとして作成された
//! FRGUコード表（Excel）を読み込み、フラットな分類子XMLドキュメントに変換して
//! ZIPアーカイブとして保存します。
//!
//! # シートのレイアウト
//!
//! - 行1: 部署名（列3以降）
//! - 行2: 部署コード（列3以降）
//! - 行3以降: 列1 = サービスコード、列2 = サービス名、列3以降 = FRGUコード
//!
//! # Quick Start
//!
//! ```rust,no_run
//! use frgu_classif::{ConverterBuilder, Outcome};
//!
//! fn main() -> Result<(), Box<dyn std::error::Error>> {
//!     let converter = ConverterBuilder::new().build()?;
//!
//!     if let Outcome::Archived { path, .. } = converter.convert_path("Коды ФРГУ.xlsx")? {
//!         println!("saved: {}", path.display());
//!     }
//!
//!     Ok(())
//! }
//! ```
//!
//! # 段階ごとの実行
//!
//! ```rust
//! use frgu_classif::{ConverterBuilder, MemoryGrid};
//!
//! # fn main() -> Result<(), frgu_classif::ClassifError> {
//! let converter = ConverterBuilder::new().build()?;
//! let grid = MemoryGrid::from_rows("Sheet1", &[
//!     &["", "", "Дорожное хозяйство"],
//!     &["", "", "07"],
//!     &["001", "Ремонт дорог", "A1"],
//! ]);
//!
//! let extraction = converter.extract_grid(&grid)?;
//! let xml = converter.build_document(&extraction.records)?;
//! assert!(xml.contains("<field4>A1</field4>"));
//! # Ok(())
//! # }
//! ```

mod api;
mod archive;
mod builder;
mod document;
mod error;
mod extract;
mod grid;
mod parser;
mod security;

// 公開API
pub use api::{ClassifierSchema, FormulaMode, SheetLayout, FIELD_COUNT};
pub use archive::{
    archive_path, archive_path_now, save_archive, write_archive, ARCHIVE_EXTENSION,
    TIMESTAMP_FORMAT,
};
pub use builder::{Converter, ConverterBuilder, Outcome};
pub use document::build_document;
pub use error::ClassifError;
pub use extract::{extract, ClassifRecord, Diagnostic, ExtractOptions, Extraction};
pub use grid::{ensure_dimensions, CellGrid, MemoryGrid};
pub use parser::{WorkbookParser, WorksheetGrid};
