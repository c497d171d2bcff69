//! Builder Module
//!
//! Fluent Builder APIを提供し、`Converter`インスタンスを段階的に構築する。
//! `Converter`は読み込み → 抽出 → ドキュメント生成 → アーカイブ保存の
//! 各段階を個別に、または一括で実行するファサードです。

use std::io::Read;
use std::path::{Path, PathBuf};

use tracing::info;

use crate::api::{ClassifierSchema, FormulaMode, SheetLayout};
use crate::archive::{archive_path_now, save_archive};
use crate::document::build_document;
use crate::error::ClassifError;
use crate::extract::{extract, ClassifRecord, ExtractOptions, Extraction};
use crate::grid::{ensure_dimensions, CellGrid};
use crate::parser::{WorkbookParser, WorksheetGrid};

/// 変換処理の設定を保持する内部構造体
#[derive(Debug, Clone, Default)]
pub(crate) struct ConversionConfig {
    /// 分類子スキーマ
    pub schema: ClassifierSchema,

    /// 抽出オプション（レイアウトと空コードの扱い）
    pub extract: ExtractOptions,

    /// 数式セルの読み取りモード
    pub formula_mode: FormulaMode,

    /// 出力先ディレクトリ（Noneの場合は入力ファイルと同じディレクトリ）
    pub output_dir: Option<PathBuf>,
}

/// Fluent Builder APIを提供する構造体
///
/// すべての設定項目にデフォルト値が設定されており、必要な設定のみをオーバーライドできます。
///
/// # 使用例
///
/// ```rust,no_run
/// use frgu_classif::{ConverterBuilder, FormulaMode};
///
/// # fn main() -> Result<(), frgu_classif::ClassifError> {
/// let converter = ConverterBuilder::new()
///     .with_formula_mode(FormulaMode::Formula)
///     .skip_empty_codes(true)
///     .build()?;
/// # Ok(())
/// # }
/// ```
#[derive(Debug, Default)]
pub struct ConverterBuilder {
    config: ConversionConfig,
}

impl ConverterBuilder {
    /// デフォルト設定を持つビルダーインスタンスを生成する
    ///
    /// # デフォルト設定
    ///
    /// - スキーマ: `ClassifierSchema::default()`
    /// - レイアウト: 部署名=行1、部署コード=行2、サービス=列1/列2、データ=行3・列3から
    /// - 数式モード: キャッシュ値
    /// - 空のFRGUコード: 出力する
    /// - 出力先: 入力ファイルと同じディレクトリ
    pub fn new() -> Self {
        Self::default()
    }

    /// 分類子スキーマを指定する
    pub fn with_schema(mut self, schema: ClassifierSchema) -> Self {
        self.config.schema = schema;
        self
    }

    /// シートのレイアウトを指定する
    pub fn with_layout(mut self, layout: SheetLayout) -> Self {
        self.config.extract.layout = layout;
        self
    }

    /// 数式セルの読み取りモードを指定する
    ///
    /// `FormulaMode::Formula`を指定すると、数式を持つ交差セルは数式そのものが
    /// 参照数式マーカーと比較されます。出力される値は常に結果値です。
    pub fn with_formula_mode(mut self, mode: FormulaMode) -> Self {
        self.config.formula_mode = mode;
        self
    }

    /// 交差セルが空のペアを除外するかを指定する
    pub fn skip_empty_codes(mut self, skip: bool) -> Self {
        self.config.extract.skip_empty_codes = skip;
        self
    }

    /// アーカイブの出力先ディレクトリを指定する
    pub fn with_output_dir(mut self, dir: impl Into<PathBuf>) -> Self {
        self.config.output_dir = Some(dir.into());
        self
    }

    /// 設定を検証し、`Converter`インスタンスを生成する
    ///
    /// # 発生し得るエラー
    ///
    /// * `ClassifError::Config(String)`: 設定の検証に失敗した場合
    ///   * レイアウトの座標に0が含まれる
    ///   * ヘッダー行が最初のデータ行より下、サービス列がデータ列より右にある
    ///   * 分類子ID・テーブルID・フィールド名が空
    /// * `ClassifError::SecurityViolation(String)`: 分類子IDから安全なエントリ名を作れない場合
    pub fn build(self) -> Result<Converter, ClassifError> {
        self.config.extract.layout.validate()?;
        self.config.schema.validate()?;
        crate::security::validate_entry_name(&self.config.schema.entry_name())
            .map_err(ClassifError::SecurityViolation)?;

        Ok(Converter {
            config: self.config,
        })
    }
}

/// 変換の結果
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Outcome {
    /// アーカイブを保存した
    Archived {
        /// 保存したアーカイブのパス
        path: PathBuf,
        /// ドキュメントに含まれるレコード数
        record_count: usize,
    },
    /// 対象となるレコードがなく、アーカイブは作成しなかった
    Empty,
}

/// 変換処理のファサード
///
/// # 使用例
///
/// ```rust,no_run
/// use frgu_classif::{ConverterBuilder, Outcome};
///
/// # fn main() -> Result<(), frgu_classif::ClassifError> {
/// let converter = ConverterBuilder::new().build()?;
/// match converter.convert_path("Коды ФРГУ.xlsx")? {
///     Outcome::Archived { path, record_count } => {
///         println!("{} records -> {}", record_count, path.display());
///     }
///     Outcome::Empty => println!("no data"),
/// }
/// # Ok(())
/// # }
/// ```
#[derive(Debug)]
pub struct Converter {
    config: ConversionConfig,
}

impl Converter {
    /// 分類子スキーマ
    pub fn schema(&self) -> &ClassifierSchema {
        &self.config.schema
    }

    /// ワークブックを開き、最初のシートをグリッドとして読み込む
    ///
    /// ワークブックのハンドルはこの関数内で解放されます。
    pub fn read_grid<R: Read>(&self, input: R) -> Result<WorksheetGrid, ClassifError> {
        let mut parser = WorkbookParser::open(input)?;
        self.load_first_sheet(&mut parser)
    }

    /// パスを指定して最初のシートをグリッドとして読み込む
    pub fn read_grid_path<P: AsRef<Path>>(&self, path: P) -> Result<WorksheetGrid, ClassifError> {
        let mut parser = WorkbookParser::open_path(path)?;
        self.load_first_sheet(&mut parser)
    }

    fn load_first_sheet(&self, parser: &mut WorkbookParser) -> Result<WorksheetGrid, ClassifError> {
        let grid = parser.first_sheet(self.config.formula_mode)?;
        ensure_dimensions(&grid, &self.config.extract.layout)?;
        Ok(grid)
    }

    /// グリッドからレコードを抽出する（I/Oなし）
    pub fn extract_grid<G: CellGrid + ?Sized>(&self, grid: &G) -> Result<Extraction, ClassifError> {
        extract(grid, &self.config.extract)
    }

    /// リーダーからワークブックを読み込み、レコードを抽出する
    pub fn extract<R: Read>(&self, input: R) -> Result<Extraction, ClassifError> {
        let grid = self.read_grid(input)?;
        self.extract_grid(&grid)
    }

    /// パスを指定してワークブックを読み込み、レコードを抽出する
    pub fn extract_path<P: AsRef<Path>>(&self, path: P) -> Result<Extraction, ClassifError> {
        let grid = self.read_grid_path(path)?;
        self.extract_grid(&grid)
    }

    /// レコードから分類子ドキュメントを生成する
    pub fn build_document(&self, records: &[ClassifRecord]) -> Result<String, ClassifError> {
        build_document(records, &self.config.schema)
    }

    /// ワークブックを変換し、入力ファイルの隣（または出力先ディレクトリ）にアーカイブを保存する
    ///
    /// # 戻り値
    ///
    /// * `Ok(Outcome::Archived)` - アーカイブを保存した場合
    /// * `Ok(Outcome::Empty)` - レコードが一件もなかった場合（アーカイブは作成しない）
    /// * `Err(ClassifError)` - 入力ファイルがない、シートが小さすぎる、I/Oエラーなど
    pub fn convert_path<P: AsRef<Path>>(&self, path: P) -> Result<Outcome, ClassifError> {
        let path = path.as_ref();
        let extraction = self.extract_path(path)?;

        if extraction.is_empty() {
            info!("no records found, archive not created");
            return Ok(Outcome::Empty);
        }

        let document = self.build_document(&extraction.records)?;
        let archive = archive_path_now(path, self.config.output_dir.as_deref());
        save_archive(&archive, &self.config.schema.entry_name(), &document)?;

        Ok(Outcome::Archived {
            path: archive,
            record_count: extraction.records.len(),
        })
    }
}
