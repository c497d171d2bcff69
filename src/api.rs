//! Public API Types
//!
//! 公開APIで使用する設定型を定義するモジュール。
//!
//! - [`ClassifierSchema`]: 出力する分類子ドキュメントの識別子・名称・フィールド名
//! - [`SheetLayout`]: 入力シートのレイアウト（ヘッダー行、サービス列など）
//! - [`FormulaMode`]: 参照数式の判定に数式文字列を使うか

use std::path::Path;

use serde::Deserialize;

use crate::error::ClassifError;

/// 分類子ドキュメントのフィールド数（固定）
pub const FIELD_COUNT: usize = 5;

/// 分類子スキーマ
///
/// 出力XMLのヘッダーブロックに書き込まれる値を保持します。
/// JSONファイルから読み込むことができ、省略されたキーはデフォルト値になります。
///
/// # 使用例
///
/// ```rust
/// use frgu_classif::ClassifierSchema;
///
/// let schema = ClassifierSchema::from_json(r#"{ "name": "Справочник услуг" }"#).unwrap();
/// assert_eq!(schema.name, "Справочник услуг");
/// assert_eq!(schema.table_id, "custom_classif");
/// ```
#[derive(Debug, Clone, PartialEq, Eq, Deserialize)]
#[serde(default)]
pub struct ClassifierSchema {
    /// 分類子の識別子（`isn_classif`、アーカイブのエントリ名にも使用）
    pub classifier_id: String,

    /// 分類子の表示名
    pub name: String,

    /// 対象テーブルの識別子（`TableId`）
    pub table_id: String,

    /// フィールド名（部署コード、部署名、サービスコード、サービス名、FRGUコードの順）
    pub field_names: [String; FIELD_COUNT],
}

impl Default for ClassifierSchema {
    fn default() -> Self {
        Self {
            classifier_id: "fa101c64-0e12-4ee7-ba9e-3c5b7c263d90".to_string(),
            name: "Виды заявлений ДСР".to_string(),
            table_id: "custom_classif".to_string(),
            field_names: [
                "Код ведомства".to_string(),
                "Наименование ведомства".to_string(),
                "Код услуги".to_string(),
                "Наименование услуги".to_string(),
                "Код ФРГУ".to_string(),
            ],
        }
    }
}

impl ClassifierSchema {
    /// JSON文字列からスキーマを読み込む
    pub fn from_json(json: &str) -> Result<Self, ClassifError> {
        Ok(serde_json::from_str(json)?)
    }

    /// JSONファイルからスキーマを読み込む
    pub fn from_json_file<P: AsRef<Path>>(path: P) -> Result<Self, ClassifError> {
        let content = std::fs::read_to_string(path)?;
        Self::from_json(&content)
    }

    /// アーカイブ内のエントリ名（`Classif_<classifier_id>.xml`）
    pub fn entry_name(&self) -> String {
        format!("Classif_{}.xml", self.classifier_id)
    }

    pub(crate) fn validate(&self) -> Result<(), ClassifError> {
        if self.classifier_id.trim().is_empty() {
            return Err(ClassifError::Config(
                "Classifier id must not be empty".to_string(),
            ));
        }
        if self.table_id.trim().is_empty() {
            return Err(ClassifError::Config("Table id must not be empty".to_string()));
        }
        if let Some(index) = self.field_names.iter().position(|n| n.trim().is_empty()) {
            return Err(ClassifError::Config(format!(
                "Field name {} must not be empty",
                index
            )));
        }
        Ok(())
    }
}

/// 入力シートのレイアウト
///
/// 座標はすべて1始まりです（行1 = 最初のヘッダー行）。
/// デフォルトは次のレイアウトです。
///
/// ```text
///          | 列1        | 列2        | 列3 ...
/// 行1      |            |            | 部署名
/// 行2      |            |            | 部署コード
/// 行3 ...  | サービス   | サービス名 | FRGUコード
///          | コード     |            |
/// ```
///
/// スキーマと同様にJSONから読み込むことができ、省略されたキーはデフォルト値になります。
#[derive(Debug, Clone, PartialEq, Eq, Deserialize)]
#[serde(default)]
pub struct SheetLayout {
    /// 部署名のヘッダー行
    pub department_name_row: usize,

    /// 部署コードのヘッダー行
    pub department_code_row: usize,

    /// 最初のサービス行
    pub first_data_row: usize,

    /// サービスコードの列
    pub service_code_column: usize,

    /// サービス名の列
    pub service_name_column: usize,

    /// 最初の部署列
    pub first_data_column: usize,

    /// 参照数式のマーカー（大文字で比較される）
    ///
    /// 交差セルのテキストがいずれかで始まる場合、そのペアは出力されません。
    pub lookup_markers: Vec<String>,
}

impl Default for SheetLayout {
    fn default() -> Self {
        Self {
            department_name_row: 1,
            department_code_row: 2,
            first_data_row: 3,
            service_code_column: 1,
            service_name_column: 2,
            first_data_column: 3,
            lookup_markers: vec!["ВПР(".to_string(), "VLOOKUP(".to_string()],
        }
    }
}

impl SheetLayout {
    /// JSON文字列からレイアウトを読み込む
    pub fn from_json(json: &str) -> Result<Self, ClassifError> {
        Ok(serde_json::from_str(json)?)
    }

    /// JSONファイルからレイアウトを読み込む
    pub fn from_json_file<P: AsRef<Path>>(path: P) -> Result<Self, ClassifError> {
        let content = std::fs::read_to_string(path)?;
        Self::from_json(&content)
    }

    /// テキストが参照数式のマーカーで始まるかを判定
    ///
    /// `text`は呼び出し側で既にトリム・大文字化されている前提です。
    pub fn is_lookup_formula(&self, text: &str) -> bool {
        self.lookup_markers
            .iter()
            .any(|marker| text.starts_with(marker.to_uppercase().as_str()))
    }

    pub(crate) fn validate(&self) -> Result<(), ClassifError> {
        let coords = [
            ("department_name_row", self.department_name_row),
            ("department_code_row", self.department_code_row),
            ("first_data_row", self.first_data_row),
            ("service_code_column", self.service_code_column),
            ("service_name_column", self.service_name_column),
            ("first_data_column", self.first_data_column),
        ];
        if let Some((name, _)) = coords.iter().find(|(_, value)| *value == 0) {
            return Err(ClassifError::Config(format!(
                "Layout coordinates are 1-based: {} must not be 0",
                name
            )));
        }

        for (name, row) in [
            ("department name row", self.department_name_row),
            ("department code row", self.department_code_row),
        ] {
            if row >= self.first_data_row {
                return Err(ClassifError::Config(format!(
                    "The {} ({}) must be above the first data row ({})",
                    name, row, self.first_data_row
                )));
            }
        }

        for (name, column) in [
            ("service code column", self.service_code_column),
            ("service name column", self.service_name_column),
        ] {
            if column >= self.first_data_column {
                return Err(ClassifError::Config(format!(
                    "The {} ({}) must be left of the first data column ({})",
                    name, column, self.first_data_column
                )));
            }
        }

        if self.lookup_markers.iter().any(|m| m.trim().is_empty()) {
            return Err(ClassifError::Config(
                "Lookup formula markers must not be empty".to_string(),
            ));
        }

        Ok(())
    }
}

/// 数式セルの読み取りモード
///
/// 出力されるテキストはどちらのモードでもキャッシュされた結果値です。
/// モードが変えるのは、交差セルが参照数式（`ВПР(` / `VLOOKUP(`）かどうかの判定対象だけです。
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
#[non_exhaustive]
pub enum FormulaMode {
    /// 結果値のみを読み取り、結果値のテキストで判定する（デフォルト）
    ///
    /// 例: `=VLOOKUP(A1,B:B,1)`（結果 `A1`）→ `A1`として出力
    #[default]
    CachedValue,

    /// 数式も読み取り、数式を持つセルは数式文字列で判定する
    ///
    /// 例: `=VLOOKUP(A1,B:B,1)`（結果 `A1`）→ 除外、`=UPPER("a1")` → `A1`として出力
    Formula,
}
