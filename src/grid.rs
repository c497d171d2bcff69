//! Grid Module
//!
//! ワークシートのセルを1始まりの2次元インデックスで参照するための抽象化を提供するモジュール。
//! calamineで読み込んだシート（[`crate::WorksheetGrid`]）とメモリ上のグリッド
//! （[`MemoryGrid`]）が同じ[`CellGrid`]トレイトを実装します。

use crate::api::SheetLayout;
use crate::error::ClassifError;

/// 1始まりの座標でセルのテキストを返すグリッド
///
/// 範囲外のセルや空セルは`None`を返します。
pub trait CellGrid {
    /// シート名（診断メッセージとエラーに使用）
    fn sheet_name(&self) -> &str;

    /// 行数（最後に使用されている行の番号）
    fn row_count(&self) -> usize;

    /// 列数（最後に使用されている列の番号）
    fn column_count(&self) -> usize;

    /// セルのテキストを取得する
    ///
    /// # 引数
    ///
    /// * `row` - 行番号（1始まり）
    /// * `column` - 列番号（1始まり）
    fn cell_text(&self, row: usize, column: usize) -> Option<String>;

    /// セルの数式テキストを取得する（先頭の`=`なし）
    ///
    /// 数式を保持しないグリッドでは常に`None`です。
    fn cell_formula(&self, _row: usize, _column: usize) -> Option<String> {
        None
    }
}

/// グリッドがレイアウトの最小サイズを満たしているかを検証する
///
/// ヘッダー行と最初のデータ列を保持できない場合、
/// `ClassifError::MalformedSheet`を返します。
pub fn ensure_dimensions<G: CellGrid + ?Sized>(
    grid: &G,
    layout: &SheetLayout,
) -> Result<(), ClassifError> {
    let rows = grid.row_count();
    let columns = grid.column_count();

    let message = if columns < layout.first_data_column {
        Some(format!(
            "at least {} columns are required",
            layout.first_data_column
        ))
    } else if rows < layout.first_data_row {
        Some(format!("at least {} rows are required", layout.first_data_row))
    } else {
        None
    };

    match message {
        Some(message) => Err(ClassifError::MalformedSheet {
            sheet: grid.sheet_name().to_string(),
            rows,
            columns,
            message,
        }),
        None => Ok(()),
    }
}

/// メモリ上に保持されたグリッド
///
/// テストや、ワークブック以外のソースからデータを渡す場合に使用します。
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct MemoryGrid {
    name: String,
    rows: Vec<Vec<Option<String>>>,
    columns: usize,
}

impl MemoryGrid {
    /// 行データからグリッドを生成する
    ///
    /// 列数は最も長い行の長さになります。
    pub fn new(name: impl Into<String>, rows: Vec<Vec<Option<String>>>) -> Self {
        let columns = rows.iter().map(Vec::len).max().unwrap_or(0);
        Self {
            name: name.into(),
            rows,
            columns,
        }
    }

    /// 文字列スライスからグリッドを生成する（空文字列は空セル）
    ///
    /// # 使用例
    ///
    /// ```rust
    /// use frgu_classif::{CellGrid, MemoryGrid};
    ///
    /// let grid = MemoryGrid::from_rows("Sheet1", &[
    ///     &["", "", "Дорожное хозяйство"],
    ///     &["", "", "07"],
    ///     &["001", "Ремонт дорог", "A1"],
    /// ]);
    /// assert_eq!(grid.cell_text(2, 3).as_deref(), Some("07"));
    /// assert_eq!(grid.cell_text(1, 1), None);
    /// ```
    pub fn from_rows(name: impl Into<String>, rows: &[&[&str]]) -> Self {
        let rows = rows
            .iter()
            .map(|row| {
                row.iter()
                    .map(|text| (!text.is_empty()).then(|| text.to_string()))
                    .collect()
            })
            .collect();
        Self::new(name, rows)
    }
}

impl CellGrid for MemoryGrid {
    fn sheet_name(&self) -> &str {
        &self.name
    }

    fn row_count(&self) -> usize {
        self.rows.len()
    }

    fn column_count(&self) -> usize {
        self.columns
    }

    fn cell_text(&self, row: usize, column: usize) -> Option<String> {
        if row == 0 || column == 0 {
            return None;
        }
        self.rows
            .get(row - 1)
            .and_then(|cells| cells.get(column - 1))
            .cloned()
            .flatten()
    }
}
