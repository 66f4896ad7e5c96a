use clap::Parser;
use linecsv::{
    parse_file_batch, parse_file_stream, CsvError, ErrorMode, ParseOptions, Passthrough,
    RecordSchema, RowSchema, TupleSchema, UntypedRow, ValidationOutcome,
};
use serde_json::{json, Value};
use std::path::PathBuf;
use std::process::ExitCode;
use tracing_subscriber::EnvFilter;

#[derive(Parser)]
#[command(
    name = "linecsv",
    version,
    about = "Parse a delimited text file and print its rows as JSON"
)]
struct Cli {
    #[arg(help = "Input file")]
    file: PathBuf,
    #[arg(long, help = "Treat the first line as a header")]
    headers: bool,
    #[arg(long, short, default_value_t = ',', help = "Field delimiter")]
    delimiter: char,
    #[arg(long, help = "Print rows as JSON lines while reading")]
    streaming: bool,
    #[arg(long, help = "Report invalid rows and keep going (batch only)")]
    lenient: bool,
    #[arg(
        long,
        conflicts_with = "fields",
        help = "Positional column types, e.g. text,number,bool?"
    )]
    columns: Option<String>,
    #[arg(long, requires = "headers", help = "Named column types, e.g. name:text,age:number")]
    fields: Option<String>,
}

enum CliSchema {
    Raw,
    Tuple(TupleSchema),
    Record(RecordSchema),
}

impl RowSchema for CliSchema {
    type Output = Value;

    fn validate(&self, row: &UntypedRow<'_>) -> ValidationOutcome<Value> {
        match self {
            CliSchema::Raw => Passthrough
                .validate(row)
                .into_result()
                .map(|cells| json!(cells))
                .into(),
            CliSchema::Tuple(schema) => schema.validate(row),
            CliSchema::Record(schema) => schema.validate(row),
        }
    }
}

fn main() -> ExitCode {
    init_tracing();
    let cli = Cli::parse();
    match run(cli) {
        Ok(true) => ExitCode::SUCCESS,
        Ok(false) => ExitCode::from(2),
        Err(err) => {
            eprintln!("{err}");
            ExitCode::FAILURE
        }
    }
}

/// Returns `false` when rows were skipped in lenient mode.
fn run(cli: Cli) -> Result<bool, CsvError> {
    let schema = match (&cli.columns, &cli.fields) {
        (Some(spec), _) => CliSchema::Tuple(spec.parse()?),
        (None, Some(spec)) => CliSchema::Record(spec.parse()?),
        (None, None) => CliSchema::Raw,
    };
    let mut options = if cli.lenient {
        ParseOptions::lenient()
    } else {
        ParseOptions::default()
    };
    options = options
        .with_delimiter(cli.delimiter)
        .with_headers(cli.headers);

    if cli.streaming {
        if options.error_mode == ErrorMode::Collect {
            tracing::warn!("--lenient has no effect when streaming");
        }
        for row in parse_file_stream(&cli.file, schema, options)? {
            println!("{}", row?);
        }
        return Ok(true);
    }

    let batch = parse_file_batch(&cli.file, schema, options)?;
    if let Some(header) = &batch.header {
        println!("{}", json!(header));
    }
    for row in &batch.data {
        println!("{row}");
    }
    for error in &batch.errors {
        eprintln!("row {}: {}", error.row, error.message);
    }
    Ok(batch.errors.is_empty())
}

fn init_tracing() {
    let env_filter = EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("warn"));
    let _ = tracing_subscriber::fmt()
        .with_env_filter(env_filter)
        .with_target(false)
        .with_writer(std::io::stderr)
        .try_init();
}
