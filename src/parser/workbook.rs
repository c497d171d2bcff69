//! Workbook Module
//!
//! calamineのラッパーとして、ワークブックを開き最初のシートを読み込みます。
//! ワークブックのハンドルは`WorkbookParser`が所有し、スコープを抜けると解放されます。

use std::io::{Cursor, Read};
use std::path::Path;

use calamine::{open_workbook_auto_from_rs, Data, DataType, Range, Reader, Sheets};
use tracing::{debug, info};

use crate::api::FormulaMode;
use crate::error::ClassifError;
use crate::grid::CellGrid;
use crate::security::SecurityConfig;

/// ワークブックパーサー
pub struct WorkbookParser {
    workbook: Sheets<Cursor<Vec<u8>>>,
}

impl WorkbookParser {
    /// リーダーからワークブックを開く
    ///
    /// 入力全体をメモリに読み込み、形式（xlsx / xls / ods）を自動判別します。
    ///
    /// # 戻り値
    ///
    /// * `Ok(WorkbookParser)` - ワークブックの読み込みに成功した場合
    /// * `Err(ClassifError::SecurityViolation)` - 入力サイズが上限を超えた場合
    /// * `Err(ClassifError::Parse)` - ワークブックとして解析できない場合
    pub fn open<R: Read>(reader: R) -> Result<Self, ClassifError> {
        let security_config = SecurityConfig::default();

        // 上限+1バイトまで読み込み、超過を検出する
        let mut buffer = Vec::new();
        let bytes_read = reader
            .take(security_config.max_input_file_size + 1)
            .read_to_end(&mut buffer)?;

        if bytes_read as u64 > security_config.max_input_file_size {
            return Err(ClassifError::SecurityViolation(format!(
                "Input file size exceeds maximum: {} bytes",
                security_config.max_input_file_size
            )));
        }

        let workbook = open_workbook_auto_from_rs(Cursor::new(buffer))?;
        Ok(Self { workbook })
    }

    /// パスを指定してワークブックを開く
    ///
    /// ファイルが存在しない場合は`ClassifError::InputNotFound`を返します。
    pub fn open_path<P: AsRef<Path>>(path: P) -> Result<Self, ClassifError> {
        let path = path.as_ref();
        if !path.is_file() {
            return Err(ClassifError::InputNotFound(path.to_path_buf()));
        }

        let file = std::fs::File::open(path)?;
        let parser = Self::open(file)?;
        info!(path = %path.display(), "workbook opened");
        Ok(parser)
    }

    /// すべてのシート名を取得
    pub fn sheet_names(&self) -> Vec<String> {
        self.workbook.sheet_names().to_vec()
    }

    /// 最初のワークシートをグリッドとして読み込む
    ///
    /// # 引数
    ///
    /// * `formula_mode` - 結果値に加えて数式文字列も読み込むか
    pub fn first_sheet(&mut self, formula_mode: FormulaMode) -> Result<WorksheetGrid, ClassifError> {
        let name = self
            .sheet_names()
            .into_iter()
            .next()
            .ok_or(ClassifError::NoWorksheet)?;

        let values = self.workbook.worksheet_range(&name)?;

        let formulas = match formula_mode {
            FormulaMode::CachedValue => None,
            // 数式情報が読めない形式では値のみを使用する
            FormulaMode::Formula => match self.workbook.worksheet_formula(&name) {
                Ok(range) => Some(range),
                Err(e) => {
                    debug!(sheet = %name, error = %e, "formulas unavailable");
                    None
                }
            },
        };

        Ok(WorksheetGrid::new(name, values, formulas))
    }
}

/// calamineで読み込んだワークシート
///
/// calamineの絶対座標（0始まり）を1始まりの座標に変換して公開します。
#[derive(Debug, Clone)]
pub struct WorksheetGrid {
    name: String,
    values: Range<Data>,
    formulas: Option<Range<String>>,
}

impl WorksheetGrid {
    pub(crate) fn new(name: String, values: Range<Data>, formulas: Option<Range<String>>) -> Self {
        Self {
            name,
            values,
            formulas,
        }
    }

    fn position(row: usize, column: usize) -> Option<(u32, u32)> {
        let row = u32::try_from(row.checked_sub(1)?).ok()?;
        let column = u32::try_from(column.checked_sub(1)?).ok()?;
        Some((row, column))
    }

    fn extent(&self) -> (usize, usize) {
        let end = |range: Option<(u32, u32)>| {
            range.map_or((0, 0), |(row, col)| (row as usize + 1, col as usize + 1))
        };
        let (value_rows, value_cols) = if self.values.is_empty() {
            (0, 0)
        } else {
            end(self.values.end())
        };
        let (formula_rows, formula_cols) = match &self.formulas {
            Some(range) if !range.is_empty() => end(range.end()),
            _ => (0, 0),
        };
        (value_rows.max(formula_rows), value_cols.max(formula_cols))
    }
}

impl CellGrid for WorksheetGrid {
    fn sheet_name(&self) -> &str {
        &self.name
    }

    fn row_count(&self) -> usize {
        self.extent().0
    }

    fn column_count(&self) -> usize {
        self.extent().1
    }

    fn cell_text(&self, row: usize, column: usize) -> Option<String> {
        let position = Self::position(row, column)?;
        self.values.get_value(position).and_then(data_text)
    }

    fn cell_formula(&self, row: usize, column: usize) -> Option<String> {
        let position = Self::position(row, column)?;
        self.formulas
            .as_ref()
            .and_then(|range| range.get_value(position))
            .map(|f| f.trim_start_matches('=').to_string())
            .filter(|f| !f.is_empty())
    }
}

/// セルの値をテキストに変換する
///
/// 空セルは`None`、整数値の浮動小数点数は小数部なしで返します。
pub(crate) fn data_text(cell: &Data) -> Option<String> {
    match cell {
        Data::Empty => None,
        Data::String(s) => Some(s.clone()),
        Data::Int(i) => Some(i.to_string()),
        Data::Float(f) if f.fract() == 0.0 && f.abs() < 1e15 => Some(format!("{}", *f as i64)),
        Data::Float(f) => Some(f.to_string()),
        Data::Bool(b) => Some(if *b { "TRUE" } else { "FALSE" }.to_string()),
        Data::DateTime(_) => cell
            .as_datetime()
            .map(|dt| dt.format("%Y-%m-%dT%H:%M:%S").to_string())
            .or_else(|| Some(cell.to_string())),
        Data::DateTimeIso(s) | Data::DurationIso(s) => Some(s.clone()),
        Data::Error(e) => Some(e.to_string()),
    }
}
