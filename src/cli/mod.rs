pub mod classify;
pub mod config;
pub mod files;
pub mod rules;
pub mod run;
pub mod summary;

use chrono::NaiveDate;
use clap::{ArgAction, Args, Parser, Subcommand};

use clasifica::output::OutputFormat;
use clasifica::settings::{load_settings, Settings, SettingsOverrides};
use clasifica::summary::SummaryFilter;

#[derive(Parser)]
#[command(
    name = "clasifica",
    version,
    about = "Categorize bank-statement CSV files by keyword and merge them into one spreadsheet."
)]
pub struct Cli {
    /// More log output on stderr (-v info, -vv debug). RUST_LOG takes precedence.
    #[arg(short, long, action = ArgAction::Count, global = true)]
    pub verbose: u8,

    #[command(subcommand)]
    pub command: Option<Commands>,
}

#[derive(Subcommand)]
pub enum Commands {
    /// Process every statement in the input directory (default command).
    Run(RunArgs),
    /// Show the loaded keyword → category rules.
    Rules {
        #[command(flatten)]
        source: SourceArgs,
    },
    /// List the statement files that would be processed.
    Files {
        #[command(flatten)]
        source: SourceArgs,
    },
    /// Classify a single description against the rules.
    Classify {
        /// Transaction description, e.g. "COMPRA CARREFOUR MADRID"
        description: String,
        #[command(flatten)]
        source: SourceArgs,
    },
    /// Income, expenses and spending per category across all statements.
    Summary(SummaryArgs),
    /// Show the effective settings, or store them with --save.
    Config {
        #[command(flatten)]
        settings: SettingsArgs,
        /// Write the effective settings to the settings file
        #[arg(long)]
        save: bool,
    },
}

#[derive(Args, Clone, Default)]
pub struct SourceArgs {
    /// Directory holding the statement CSV files (default: current directory)
    #[arg(long = "input-dir")]
    pub input_dir: Option<String>,
    /// Keyword → category table: xlsx, xls, ods or csv (default: relacion_clave_categoria.xlsx)
    #[arg(long)]
    pub rules: Option<String>,
}

#[derive(Args, Clone, Default)]
pub struct SettingsArgs {
    #[command(flatten)]
    pub source: SourceArgs,
    /// Where to write the consolidated file (default: input directory)
    #[arg(long = "output-dir")]
    pub output_dir: Option<String>,
    /// Output file format
    #[arg(long, value_enum)]
    pub format: Option<OutputFormat>,
    /// Keep statement blocks in file-name order instead of completion order
    #[arg(long)]
    pub ordered: bool,
}

#[derive(Args, Clone, Default)]
pub struct RunArgs {
    #[command(flatten)]
    pub settings: SettingsArgs,
    /// Do not wait for Enter before starting and after finishing
    #[arg(short, long)]
    pub yes: bool,
}

#[derive(Args, Clone, Default)]
pub struct SummaryArgs {
    #[command(flatten)]
    pub source: SourceArgs,
    /// Only transactions booked in this year
    #[arg(long)]
    pub year: Option<i32>,
    /// First booking date to include, e.g. 01/01/2024
    #[arg(long, value_parser = summary::parse_day)]
    pub from: Option<NaiveDate>,
    /// Last booking date to include
    #[arg(long, value_parser = summary::parse_day)]
    pub to: Option<NaiveDate>,
}

impl SummaryArgs {
    pub fn filter(&self) -> SummaryFilter {
        SummaryFilter {
            year: self.year,
            from: self.from,
            to: self.to,
        }
    }
}

impl SourceArgs {
    pub(crate) fn settings(&self) -> Settings {
        SettingsArgs {
            source: self.clone(),
            ..SettingsArgs::default()
        }
        .settings()
    }
}

impl SettingsArgs {
    fn overrides(&self) -> SettingsOverrides {
        SettingsOverrides {
            input_dir: self.source.input_dir.clone(),
            rules_path: self.source.rules.clone(),
            output_dir: self.output_dir.clone(),
            output_format: self.format,
            ordered: self.ordered,
        }
    }

    /// Stored settings with this invocation's flags applied.
    pub(crate) fn settings(&self) -> Settings {
        load_settings().with_overrides(&self.overrides())
    }
}
