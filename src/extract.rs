//! Record Extractor Module
//!
//! 部署列×サービス行のマトリクスを走査し、分類子レコードを抽出するモジュール。
//!
//! ヘッダーやサービス識別子の欠落は致命的ではなく、[`Diagnostic`]として記録され、
//! 該当する列・行がスキップされます。シートの大きさが不足している場合のみ
//! エラーとなり、レコードは一件も出力されません。

use std::fmt;

use tracing::{info, warn};

use crate::api::SheetLayout;
use crate::error::ClassifError;
use crate::grid::{ensure_dimensions, CellGrid};

/// 検証済みの（サービス × 部署）ペア
#[derive(Debug, Clone, PartialEq, Eq, Hash)]
pub struct ClassifRecord {
    /// サービスコード
    pub service_code: String,
    /// サービス名
    pub service_name: String,
    /// 部署コード
    pub department_code: String,
    /// 部署名
    pub department_name: String,
    /// FRGUコード（トリム・大文字化済み、空の場合あり）
    pub code_frgu: String,
}

/// スキップされたセルの診断情報（座標は1始まり）
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
#[non_exhaustive]
pub enum Diagnostic {
    /// 部署コードが空のため列をスキップした
    MissingDepartmentCode { row: usize, column: usize },
    /// 部署名が空のため列をスキップした
    MissingDepartmentName { row: usize, column: usize },
    /// サービスコードが空のため行をスキップした
    MissingServiceCode { row: usize, column: usize },
    /// サービス名が空のため行をスキップした
    MissingServiceName { row: usize, column: usize },
}

impl Diagnostic {
    /// 問題のあるセルの座標 `(row, column)`
    pub fn cell(&self) -> (usize, usize) {
        match *self {
            Diagnostic::MissingDepartmentCode { row, column }
            | Diagnostic::MissingDepartmentName { row, column }
            | Diagnostic::MissingServiceCode { row, column }
            | Diagnostic::MissingServiceName { row, column } => (row, column),
        }
    }

    fn subject(&self) -> &'static str {
        match self {
            Diagnostic::MissingDepartmentCode { .. } => "Department code",
            Diagnostic::MissingDepartmentName { .. } => "Department name",
            Diagnostic::MissingServiceCode { .. } => "Service code",
            Diagnostic::MissingServiceName { .. } => "Service name",
        }
    }
}

impl fmt::Display for Diagnostic {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let (row, column) = self.cell();
        write!(f, "{} is missing at cell [{}:{}]", self.subject(), row, column)
    }
}

/// 抽出結果
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct Extraction {
    /// 出現順（列優先、列内は行順）のレコード
    pub records: Vec<ClassifRecord>,
    /// スキップされたセルの診断情報
    pub diagnostics: Vec<Diagnostic>,
}

impl Extraction {
    /// レコードが一件もないか（空の結果。エラーではない）
    pub fn is_empty(&self) -> bool {
        self.records.is_empty()
    }
}

/// 抽出オプション
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct ExtractOptions {
    /// シートのレイアウト
    pub layout: SheetLayout,
    /// 交差セルが空のペアも除外する
    pub skip_empty_codes: bool,
}

/// セルが空（未設定または空文字列）でなければテキストを返す
fn non_empty(text: Option<String>) -> Option<String> {
    text.filter(|t| !t.is_empty())
}

/// グリッドからレコードを抽出する
///
/// # 戻り値
///
/// * `Ok(Extraction)` - レコードと診断情報（レコードが空の場合も`Ok`）
/// * `Err(ClassifError::MalformedSheet)` - シートの行数・列数が不足している場合
pub fn extract<G: CellGrid + ?Sized>(
    grid: &G,
    options: &ExtractOptions,
) -> Result<Extraction, ClassifError> {
    let layout = &options.layout;
    ensure_dimensions(grid, layout)?;

    info!(sheet = grid.sheet_name(), "parsing sheet");

    let mut extraction = Extraction::default();
    let report = |diagnostic: Diagnostic, diagnostics: &mut Vec<Diagnostic>| {
        warn!(sheet = grid.sheet_name(), "{}", diagnostic);
        diagnostics.push(diagnostic);
    };

    for column in layout.first_data_column..=grid.column_count() {
        let Some(department_code) =
            non_empty(grid.cell_text(layout.department_code_row, column))
        else {
            report(
                Diagnostic::MissingDepartmentCode {
                    row: layout.department_code_row,
                    column,
                },
                &mut extraction.diagnostics,
            );
            continue;
        };
        let Some(department_name) =
            non_empty(grid.cell_text(layout.department_name_row, column))
        else {
            report(
                Diagnostic::MissingDepartmentName {
                    row: layout.department_name_row,
                    column,
                },
                &mut extraction.diagnostics,
            );
            continue;
        };

        for row in layout.first_data_row..=grid.row_count() {
            let Some(service_code) = non_empty(grid.cell_text(row, layout.service_code_column))
            else {
                report(
                    Diagnostic::MissingServiceCode {
                        row,
                        column: layout.service_code_column,
                    },
                    &mut extraction.diagnostics,
                );
                continue;
            };
            let Some(service_name) = non_empty(grid.cell_text(row, layout.service_name_column))
            else {
                report(
                    Diagnostic::MissingServiceName {
                        row,
                        column: layout.service_name_column,
                    },
                    &mut extraction.diagnostics,
                );
                continue;
            };

            let code_frgu = grid
                .cell_text(row, column)
                .map(|text| text.trim().to_uppercase())
                .unwrap_or_default();

            // 数式があれば数式で、なければ値で参照数式を判定する
            let is_lookup = match grid.cell_formula(row, column) {
                Some(formula) => layout.is_lookup_formula(&formula.trim().to_uppercase()),
                None => !code_frgu.is_empty() && layout.is_lookup_formula(&code_frgu),
            };
            if is_lookup {
                continue;
            }
            if code_frgu.is_empty() && options.skip_empty_codes {
                continue;
            }

            extraction.records.push(ClassifRecord {
                service_code,
                service_name,
                department_code: department_code.clone(),
                department_name: department_name.clone(),
                code_frgu,
            });
        }
    }

    info!(
        records = extraction.records.len(),
        diagnostics = extraction.diagnostics.len(),
        "extraction finished"
    );

    Ok(extraction)
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::grid::MemoryGrid;

    fn single(code: &str) -> MemoryGrid {
        MemoryGrid::from_rows(
            "Sheet1",
            &[
                &["", "", "Дорожное хозяйство"],
                &["", "", "07"],
                &["001", "Ремонт дорог", code],
            ],
        )
    }

    #[test]
    fn test_single_record() {
        let extraction = extract(&single("A1"), &ExtractOptions::default()).unwrap();
        assert_eq!(
            extraction.records,
            vec![ClassifRecord {
                service_code: "001".to_string(),
                service_name: "Ремонт дорог".to_string(),
                department_code: "07".to_string(),
                department_name: "Дорожное хозяйство".to_string(),
                code_frgu: "A1".to_string(),
            }]
        );
        assert!(extraction.diagnostics.is_empty());
    }

    #[test]
    fn test_code_is_trimmed_and_uppercased() {
        let extraction = extract(&single("  ab12 "), &ExtractOptions::default()).unwrap();
        assert_eq!(extraction.records[0].code_frgu, "AB12");
    }

    #[test]
    fn test_vlookup_is_excluded() {
        let extraction =
            extract(&single("VLOOKUP(A1,B:B,1)"), &ExtractOptions::default()).unwrap();
        assert!(extraction.is_empty());
        assert!(extraction.diagnostics.is_empty());
    }

    #[test]
    fn test_vpr_lowercase_is_excluded() {
        let extraction = extract(&single("  впр(A1;B:B;1)"), &ExtractOptions::default()).unwrap();
        assert!(extraction.is_empty());
    }

    #[test]
    fn test_empty_code_is_emitted_by_default() {
        let extraction = extract(&single(""), &ExtractOptions::default()).unwrap();
        assert_eq!(extraction.records.len(), 1);
        assert_eq!(extraction.records[0].code_frgu, "");
    }

    #[test]
    fn test_empty_code_skipped_when_requested() {
        let options = ExtractOptions {
            skip_empty_codes: true,
            ..ExtractOptions::default()
        };
        assert!(extract(&single("   "), &options).unwrap().is_empty());
    }

    #[test]
    fn test_missing_department_code_skips_column() {
        let grid = MemoryGrid::from_rows(
            "Sheet1",
            &[
                &["", "", "Дорожное хозяйство", "Образование"],
                &["", "", "", "12"],
                &["001", "Ремонт дорог", "A1", "B2"],
            ],
        );
        let extraction = extract(&grid, &ExtractOptions::default()).unwrap();
        assert_eq!(extraction.records.len(), 1);
        assert_eq!(extraction.records[0].department_code, "12");
        assert_eq!(
            extraction.diagnostics,
            vec![Diagnostic::MissingDepartmentCode { row: 2, column: 3 }]
        );
    }

    #[test]
    fn test_missing_department_name_skips_column() {
        let grid = MemoryGrid::from_rows(
            "Sheet1",
            &[&["", "", ""], &["", "", "07"], &["001", "Ремонт дорог", "A1"]],
        );
        let extraction = extract(&grid, &ExtractOptions::default()).unwrap();
        assert!(extraction.is_empty());
        assert_eq!(
            extraction.diagnostics,
            vec![Diagnostic::MissingDepartmentName { row: 1, column: 3 }]
        );
    }

    #[test]
    fn test_missing_service_identifiers_repeat_per_column() {
        let grid = MemoryGrid::from_rows(
            "Sheet1",
            &[
                &["", "", "Д1", "Д2"],
                &["", "", "01", "02"],
                &["", "Без кода", "X", "Y"],
                &["003", "", "X", "Y"],
                &["004", "Услуга", "X", "Y"],
            ],
        );
        let extraction = extract(&grid, &ExtractOptions::default()).unwrap();
        assert_eq!(extraction.records.len(), 2);
        assert_eq!(
            extraction.diagnostics,
            vec![
                Diagnostic::MissingServiceCode { row: 3, column: 1 },
                Diagnostic::MissingServiceName { row: 4, column: 2 },
                Diagnostic::MissingServiceCode { row: 3, column: 1 },
                Diagnostic::MissingServiceName { row: 4, column: 2 },
            ]
        );
    }

    #[test]
    fn test_column_major_order() {
        let grid = MemoryGrid::from_rows(
            "Sheet1",
            &[
                &["", "", "Д1", "Д2"],
                &["", "", "01", "02"],
                &["001", "У1", "a", "c"],
                &["002", "У2", "b", "d"],
            ],
        );
        let extraction = extract(&grid, &ExtractOptions::default()).unwrap();
        let codes: Vec<&str> = extraction
            .records
            .iter()
            .map(|r| r.code_frgu.as_str())
            .collect();
        assert_eq!(codes, vec!["A", "B", "C", "D"]);
    }

    #[test]
    fn test_too_small_grid_fails() {
        let grid = MemoryGrid::from_rows("Sheet1", &[&["", "", "Д1"], &["", "", "01"]]);
        assert!(matches!(
            extract(&grid, &ExtractOptions::default()),
            Err(ClassifError::MalformedSheet { .. })
        ));
    }

    mod formula_cells {
        use super::*;
        use crate::parser::WorksheetGrid;
        use calamine::{Cell, Data, Range};

        fn sheet(formulas: &[((u32, u32), &str)]) -> WorksheetGrid {
            let values = Range::from_sparse(vec![
                Cell::new((0, 2), Data::String("Дорожное хозяйство".to_string())),
                Cell::new((1, 2), Data::String("07".to_string())),
                Cell::new((2, 0), Data::String("001".to_string())),
                Cell::new((2, 1), Data::String("Ремонт дорог".to_string())),
                Cell::new((2, 2), Data::String("A1".to_string())),
            ]);
            let formulas = Range::from_sparse(
                formulas
                    .iter()
                    .map(|(pos, text)| Cell::new(*pos, text.to_string()))
                    .collect(),
            );
            WorksheetGrid::new("Sheet1".to_string(), values, Some(formulas))
        }

        #[test]
        fn test_formula_cells_keep_cached_values() {
            let grid = sheet(&[((1, 2), "Справочник!B2"), ((2, 2), "UPPER(\"a1\")")]);
            let extraction = extract(&grid, &ExtractOptions::default()).unwrap();

            assert_eq!(extraction.records.len(), 1);
            assert_eq!(extraction.records[0].department_code, "07");
            assert_eq!(extraction.records[0].code_frgu, "A1");
            assert!(extraction.diagnostics.is_empty());
        }

        #[test]
        fn test_lookup_formula_excluded_despite_cached_value() {
            let grid = sheet(&[((2, 2), "vlookup(A1,B:B,1)")]);
            let extraction = extract(&grid, &ExtractOptions::default()).unwrap();
            assert!(extraction.is_empty());
        }
    }

    #[test]
    fn test_diagnostic_display() {
        let diagnostic = Diagnostic::MissingServiceName { row: 4, column: 2 };
        assert_eq!(diagnostic.to_string(), "Service name is missing at cell [4:2]");
    }

    mod property_tests {
        use super::*;
        use proptest::prelude::*;

        fn cell() -> impl Strategy<Value = String> {
            prop_oneof![
                Just(String::new()),
                "[A-Za-z0-9 ]{1,6}",
                Just("VLOOKUP(A1,B:B,1)".to_string()),
                Just("впр(A1;B:B;1)".to_string()),
            ]
        }

        proptest! {
            #[test]
            fn test_extraction_matches_expected_pairs(
                cells in proptest::collection::vec(proptest::collection::vec(cell(), 4), 3..8)
            ) {
                let rows: Vec<Vec<Option<String>>> = cells
                    .iter()
                    .map(|row| row.iter().map(|c| (!c.is_empty()).then(|| c.clone())).collect())
                    .collect();
                let grid = MemoryGrid::new("Sheet1", rows);
                let extraction = extract(&grid, &ExtractOptions::default()).unwrap();

                // セル配列から期待されるレコードと診断数を直接求める
                let layout = SheetLayout::default();
                let mut expected = Vec::new();
                let mut skipped = 0;
                for column in 2..4 {
                    if cells[1][column].is_empty() || cells[0][column].is_empty() {
                        skipped += 1;
                        continue;
                    }
                    for row in &cells[2..] {
                        if row[0].is_empty() || row[1].is_empty() {
                            skipped += 1;
                            continue;
                        }
                        let code = row[column].trim().to_uppercase();
                        if !code.is_empty() && layout.is_lookup_formula(&code) {
                            continue;
                        }
                        expected.push(ClassifRecord {
                            service_code: row[0].clone(),
                            service_name: row[1].clone(),
                            department_code: cells[1][column].clone(),
                            department_name: cells[0][column].clone(),
                            code_frgu: code,
                        });
                    }
                }

                prop_assert_eq!(&extraction.records, &expected);
                prop_assert_eq!(extraction.diagnostics.len(), skipped);
            }
        }
    }
}
