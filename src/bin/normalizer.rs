//! Statement Normalizer - CLI tool for converting bank statement CSV exports
//! into the canonical transaction format.

use clap::{Args, Parser, Subcommand};
use std::fs::{self, File};
use std::io::{self, Read, Write};
use statement_normalizer::{
    ColumnMapping, Error, PreparedStatement, Result, SemanticField,
};
use tracing_subscriber::EnvFilter;

#[derive(Parser)]
#[command(name = "statement-normalizer")]
#[command(about = "Normalize bank statement CSV exports into a canonical format", long_about = None)]
struct Cli {
    #[command(subcommand)]
    command: Command,
}

#[derive(Subcommand)]
enum Command {
    /// Show the detected header and the candidate columns for every field
    Suggest(InputArgs),
    /// Convert a statement using confirmed column mappings
    Convert(ConvertArgs),
}

#[derive(Args)]
struct InputArgs {
    /// Input file path (or stdin if not provided)
    #[arg(short, long)]
    input: Option<String>,

    /// Field delimiter (detected when omitted)
    #[arg(long, value_parser = parse_delimiter)]
    delimiter: Option<u8>,
}

#[derive(Args)]
struct ConvertArgs {
    #[command(flatten)]
    input: InputArgs,

    /// Output file path (or stdout if not provided)
    #[arg(short, long)]
    output: Option<String>,

    /// Confirm a column: FIELD=COLUMN, COLUMN being a zero-based index or the header text
    #[arg(short, long = "map", value_parser = parse_assignment)]
    mappings: Vec<(SemanticField, String)>,

    /// Also accept every field that has exactly one candidate column
    #[arg(long)]
    accept_unambiguous: bool,
}

fn main() {
    tracing_subscriber::fmt()
        .with_env_filter(
            EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("error")),
        )
        .with_writer(io::stderr)
        .init();

    if let Err(e) = run() {
        eprintln!("Error: {}", e);
        std::process::exit(1);
    }
}

fn run() -> Result<()> {
    let cli = Cli::parse();

    match cli.command {
        Command::Suggest(args) => {
            let prepared = prepare(&args)?;
            print_suggestions(&prepared);
            Ok(())
        }
        Command::Convert(args) => convert(&args),
    }
}

fn prepare(args: &InputArgs) -> Result<PreparedStatement> {
    let text = if let Some(ref input_path) = args.input {
        fs::read_to_string(input_path)?
    } else {
        let mut text = String::new();
        io::stdin().read_to_string(&mut text)?;
        text
    };

    PreparedStatement::from_text(&text, args.delimiter)
}

fn print_suggestions(prepared: &PreparedStatement) {
    println!("Header columns:");
    for cell in prepared.header().cells() {
        println!("  [{}] {}", cell.column, cell.text);
    }

    println!("Candidates:");
    for field in SemanticField::ALL {
        let candidates = prepared.suggestions().candidates(field);
        let marker = if field.is_required() { "*" } else { " " };
        if candidates.is_empty() {
            println!("  {}{}: -", marker, field);
        } else {
            let list = candidates
                .iter()
                .map(|m| format!("[{}] {}", m.column, m.header))
                .collect::<Vec<_>>()
                .join(", ");
            println!("  {}{}: {}", marker, field, list);
        }
    }
}

fn convert(args: &ConvertArgs) -> Result<()> {
    let prepared = prepare(&args.input)?;

    let explicit = args
        .mappings
        .iter()
        .map(|(field, column)| resolve_column(&prepared, column).map(|c| (*field, c)))
        .collect::<Result<Vec<_>>>()?;
    let suggested = args
        .accept_unambiguous
        .then(|| prepared.suggestions().unambiguous_mapping());
    let mapping = confirmed_mapping(&explicit, suggested.as_ref())?;

    let conversion = prepared.convert(&mapping)?;
    let csv = conversion.to_csv()?;

    // Output based on output file or stdout
    if let Some(ref output_path) = args.output {
        let mut file = File::create(output_path)?;
        file.write_all(csv.as_bytes())?;
    } else {
        io::stdout().write_all(csv.as_bytes())?;
    }

    eprintln!(
        "Converted {} transactions ({} rows skipped)",
        conversion.transactions.len(),
        conversion.skipped
    );
    Ok(())
}

/// Explicit choices first, each column at most once; suggestions only fill
/// fields and columns left untouched.
fn confirmed_mapping(
    explicit: &[(SemanticField, usize)],
    suggested: Option<&ColumnMapping>,
) -> Result<ColumnMapping> {
    let mut mapping = ColumnMapping::new();
    for (field, column) in explicit {
        mapping = mapping.with(*field, *column)?;
    }

    Ok(match suggested {
        Some(suggested) => mapping.filled_from(suggested),
        None => mapping,
    })
}

fn resolve_column(prepared: &PreparedStatement, column: &str) -> Result<usize> {
    if let Ok(index) = column.trim().parse::<usize>() {
        return Ok(index);
    }

    prepared
        .header()
        .column_of(column)
        .ok_or_else(|| Error::InvalidMapping(format!("no header named '{}'", column)))
}

fn parse_assignment(s: &str) -> std::result::Result<(SemanticField, String), String> {
    let (field, column) = s
        .split_once('=')
        .ok_or_else(|| format!("expected FIELD=COLUMN, got '{}'", s))?;
    let field = field.parse::<SemanticField>().map_err(|e| e.to_string())?;
    Ok((field, column.to_string()))
}

fn parse_delimiter(s: &str) -> std::result::Result<u8, String> {
    match s {
        "\\t" | "tab" => Ok(b'\t'),
        _ if s.len() == 1 && s.is_ascii() => Ok(s.as_bytes()[0]),
        _ => Err(format!("delimiter must be a single ASCII character, got '{}'", s)),
    }
}
