//! xlsxloader CLI - write the sample records to a spreadsheet and print them back

use anyhow::{Context, Result};
use clap::{Parser, ValueEnum};
use std::io::{self, BufRead};
use std::path::PathBuf;
use tracing_subscriber::EnvFilter;
use xlsxloader::{
    sample_people, LoaderBuilder, OutputFormat, ReaderKind, ShortRowPolicy, WriterKind,
    DEFAULT_FILE_NAME, DEFAULT_SHEET_NAME,
};

#[derive(Parser)]
#[command(name = "xlsxloader")]
#[command(
    author,
    version,
    about = "Write sample records to an XLSX file, read them back and print the rows"
)]
struct Cli {
    /// Spreadsheet file to write and read back
    #[arg(short, long, default_value = DEFAULT_FILE_NAME)]
    file: PathBuf,

    /// Sheet name
    #[arg(short, long, default_value = DEFAULT_SHEET_NAME)]
    sheet: String,

    /// How the file is written
    #[arg(long, value_enum, default_value_t = WriterArg::Package)]
    writer: WriterArg,

    /// How the file is read back
    #[arg(long, value_enum, default_value_t = ReaderArg::Package)]
    reader: ReaderArg,

    /// Pad rows with fewer than three cells instead of failing
    #[arg(long)]
    pad_short_rows: bool,

    /// Row output format
    #[arg(long, value_enum, default_value_t = FormatArg::Plain)]
    format: FormatArg,

    /// Exit without waiting for Enter
    #[arg(long)]
    no_wait: bool,
}

#[derive(Clone, Copy, ValueEnum)]
enum WriterArg {
    /// Build the XML parts directly
    Package,
    /// Use the spreadsheet object model
    Workbook,
}

#[derive(Clone, Copy, ValueEnum)]
enum ReaderArg {
    /// Parse the first worksheet part
    Package,
    /// Query the sheet as the table `<sheet>$`
    Driver,
}

#[derive(Clone, Copy, ValueEnum)]
enum FormatArg {
    Plain,
    Json,
}

impl From<WriterArg> for WriterKind {
    fn from(arg: WriterArg) -> Self {
        match arg {
            WriterArg::Package => WriterKind::Package,
            WriterArg::Workbook => WriterKind::Workbook,
        }
    }
}

impl From<ReaderArg> for ReaderKind {
    fn from(arg: ReaderArg) -> Self {
        match arg {
            ReaderArg::Package => ReaderKind::Package,
            ReaderArg::Driver => ReaderKind::Driver,
        }
    }
}

impl From<FormatArg> for OutputFormat {
    fn from(arg: FormatArg) -> Self {
        match arg {
            FormatArg::Plain => OutputFormat::Plain,
            FormatArg::Json => OutputFormat::Json,
        }
    }
}

fn main() -> Result<()> {
    init_tracing();
    let cli = Cli::parse();

    let short_row_policy = if cli.pad_short_rows {
        ShortRowPolicy::Pad
    } else {
        ShortRowPolicy::Fail
    };

    let loader = LoaderBuilder::new()
        .with_path(cli.file.clone())
        .with_sheet_name(cli.sheet.clone())
        .with_writer(cli.writer.into())
        .with_reader(cli.reader.into())
        .with_short_row_policy(short_row_policy)
        .with_output_format(cli.format.into())
        .build()
        .context("Invalid configuration")?;

    let people = sample_people();
    let stdout = io::stdout();
    loader
        .run(&people, stdout.lock())
        .with_context(|| format!("Failed to process '{}'", cli.file.display()))?;

    if !cli.no_wait {
        let mut line = String::new();
        io::stdin()
            .lock()
            .read_line(&mut line)
            .context("Failed to read from stdin")?;
    }

    Ok(())
}

/// Log to stderr so row output on stdout stays clean. `RUST_LOG` overrides the `warn` default.
fn init_tracing() {
    let filter = EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("warn"));
    tracing_subscriber::fmt()
        .with_env_filter(filter)
        .with_writer(io::stderr)
        .init();
}
