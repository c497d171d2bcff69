//! frgu-classif command-line tool
//!
//! FRGUコード表（Excel）を分類子XMLのZIPアーカイブに変換します。
//! 入力パスを省略した場合は標準入力から読み込みます。

use std::io::{self, BufRead, Write};
use std::path::PathBuf;
use std::process::ExitCode;

use clap::Parser;
use frgu_classif::{
    ClassifError, ClassifierSchema, ConverterBuilder, FormulaMode, Outcome, SheetLayout,
};
use tracing::{error, info};
use tracing_subscriber::EnvFilter;

#[derive(Parser, Debug)]
#[command(name = "frgu-classif", version, about)]
struct Cli {
    /// Path to the FRGU code table (xlsx, xls, ods); prompted for when omitted
    input: Option<PathBuf>,

    /// JSON file overriding the classifier schema (id, name, table id, field names)
    #[arg(long, value_name = "FILE")]
    schema: Option<PathBuf>,

    /// Detect lookup formulas from formula text (output still uses cached values)
    #[arg(long)]
    formula_text: bool,

    /// JSON file overriding the sheet layout (header rows, service columns, markers)
    #[arg(long, value_name = "FILE")]
    layout: Option<PathBuf>,

    /// Do not emit pairs whose FRGU code cell is empty
    #[arg(long)]
    skip_empty_codes: bool,

    /// Directory for the archive (defaults to the input file's directory)
    #[arg(long, value_name = "DIR")]
    output_dir: Option<PathBuf>,
}

fn main() -> ExitCode {
    tracing_subscriber::fmt()
        .with_env_filter(
            EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("info")),
        )
        .with_target(false)
        .init();

    let cli = Cli::parse();

    match run(cli) {
        Ok(Outcome::Archived { path, record_count }) => {
            info!(records = record_count, "archive created: {}", path.display());
            ExitCode::SUCCESS
        }
        Ok(Outcome::Empty) => {
            info!("no data to export");
            ExitCode::SUCCESS
        }
        Err(e) => {
            error!("{}", e);
            ExitCode::FAILURE
        }
    }
}

fn run(cli: Cli) -> Result<Outcome, ClassifError> {
    let input = match cli.input {
        Some(path) => path,
        None => prompt_input()?,
    };

    let mut builder = ConverterBuilder::new()
        .skip_empty_codes(cli.skip_empty_codes)
        .with_formula_mode(if cli.formula_text {
            FormulaMode::Formula
        } else {
            FormulaMode::CachedValue
        });
    if let Some(schema) = cli.schema {
        builder = builder.with_schema(ClassifierSchema::from_json_file(schema)?);
    }
    if let Some(layout) = cli.layout {
        builder = builder.with_layout(SheetLayout::from_json_file(layout)?);
    }
    if let Some(dir) = cli.output_dir {
        builder = builder.with_output_dir(dir);
    }

    builder.build()?.convert_path(input)
}

fn prompt_input() -> Result<PathBuf, ClassifError> {
    let mut stdout = io::stdout();
    writeln!(
        stdout,
        "Enter the full path to the Excel file with the FRGU codes of municipal services:"
    )?;
    stdout.flush()?;

    let mut line = String::new();
    io::stdin().lock().read_line(&mut line)?;
    let path = line.trim().trim_matches('"');
    if path.is_empty() {
        return Err(ClassifError::Config("No input file given".to_string()));
    }
    Ok(PathBuf::from(path))
}
