//! Parser Module
//!
//! calamineを使用したワークブック読み込みの実装。
//! 最初のワークシートを[`crate::CellGrid`]として公開します。

mod workbook;

pub use workbook::{WorkbookParser, WorksheetGrid};
