//! Export command

use std::fs::File;
use std::io::BufWriter;
use std::path::PathBuf;

use clap::{Args, ValueEnum};

use super::args::TableArgs;
use crate::config::settings::Settings;
use crate::error::{BudgetError, BudgetResult};
use crate::export::{export_summary_json, export_summary_yaml};
use crate::services::aggregate::GroupKey;
use crate::services::table::TableService;
use crate::storage::Storage;

/// Export format options
#[derive(Debug, Clone, Copy, PartialEq, Eq, ValueEnum)]
pub enum ExportFormat {
    /// Table rows with totals (or grouped totals with --by)
    Csv,
    /// Computed summary
    Json,
    /// Computed summary, human-readable
    Yaml,
}

impl ExportFormat {
    fn extension(&self) -> &'static str {
        match self {
            ExportFormat::Csv => "csv",
            ExportFormat::Json => "json",
            ExportFormat::Yaml => "yaml",
        }
    }
}

#[derive(Args, Debug)]
pub struct ExportArgs {
    #[command(flatten)]
    pub table: TableArgs,

    #[arg(short, long, value_enum, default_value = "csv")]
    pub format: ExportFormat,

    /// Group by keys (csv: grouped totals; json/yaml: included in the summary)
    #[arg(short, long, value_delimiter = ',')]
    pub by: Vec<GroupKey>,

    /// Output file (default: the exports directory)
    #[arg(short, long)]
    pub output: Option<PathBuf>,
}

pub fn handle_export_command(
    storage: &Storage,
    settings: &Settings,
    args: ExportArgs,
) -> BudgetResult<()> {
    let service = TableService::new(storage, settings);
    let unit = &args.table.unit;
    let category = args.table.category;

    let output = match args.output {
        Some(path) => path,
        None => {
            let key = crate::models::TableKey::new(unit.clone(), category);
            storage
                .paths()
                .exports_dir()
                .join(format!("{}.{}", key.file_stem(), args.format.extension()))
        }
    };

    match args.format {
        ExportFormat::Csv => service.export_csv(unit, category, &args.by, &output)?,
        ExportFormat::Json | ExportFormat::Yaml => {
            let (table, summary) = service.summarize(unit, category, &args.by, None)?;
            let file = File::create(&output).map_err(|e| {
                BudgetError::Export(format!("Failed to create file {}: {}", output.display(), e))
            })?;
            let mut writer = BufWriter::new(file);
            if args.format == ExportFormat::Json {
                export_summary_json(&summary, &settings.calculation, &mut writer)?;
            } else {
                export_summary_yaml(&summary, &settings.calculation, &mut writer)?;
            }
            service.log_export(&table.key(), &output)?;
        }
    }

    println!("Exported {}/{} to: {}", unit, category, output.display());
    Ok(())
}
