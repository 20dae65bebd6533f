use std::fs::{self, File};
use std::io::{self, BufWriter, Write};
use std::path::{Path, PathBuf};

use anyhow::{bail, Context, Result};
use clap::{ArgGroup, Parser};
use log::{debug, info};
use pgn_fen::board::EnPassantMode;
use pgn_fen::convert::{
    label_csv_cell, label_pgn_file, label_pgn_string, Conversion, ConvertOptions,
};
use pgn_fen::output::{write_entries, OutputFormat};

#[derive(Parser, Debug)]
#[command(
    author,
    version,
    about = "Convert PGN games to the FEN of every mainline position"
)]
#[command(group(
    ArgGroup::new("input")
        .required(true)
        .args(["pgn", "pgn_file", "csv_file"])
))]
struct Args {
    /// Literal PGN text holding one or more games
    #[arg(long)]
    pgn: Option<String>,

    /// PGN file, possibly with several games
    #[arg(long, value_name = "PATH")]
    pgn_file: Option<PathBuf>,

    /// CSV file with a column of PGN strings
    #[arg(long, value_name = "PATH")]
    csv_file: Option<PathBuf>,

    /// Column holding the PGN text (with --csv-file)
    #[arg(long, default_value = "pgn")]
    column: String,

    /// CSV field delimiter
    #[arg(long, default_value_t = ',')]
    delimiter: char,

    /// CSV quote character
    #[arg(long, default_value_t = '"')]
    quotechar: char,

    /// Emit the starting position before the first move
    #[arg(long)]
    include_initial: bool,

    /// Stop after this many positions in total
    #[arg(long, value_name = "N")]
    max_positions: Option<usize>,

    #[arg(long, value_enum, default_value_t)]
    format: OutputFormat,

    /// When to print the en passant square
    #[arg(long, value_enum, default_value_t)]
    en_passant: EnPassantMode,

    /// Output file (stdout if omitted)
    #[arg(short, long, value_name = "PATH")]
    output: Option<PathBuf>,
}

impl Args {
    fn convert_options(&self) -> ConvertOptions {
        ConvertOptions {
            include_initial: self.include_initial,
            max_positions: self.max_positions,
            en_passant: self.en_passant,
        }
    }
}

fn ascii_byte(c: char, what: &str) -> Result<u8> {
    match u8::try_from(c) {
        Ok(b) if b.is_ascii() => Ok(b),
        _ => bail!("{what} must be a single ASCII character, got {c:?}"),
    }
}

fn csv_entries(
    path: &Path,
    column: &str,
    delimiter: char,
    quote: char,
    options: &ConvertOptions,
) -> Result<Conversion> {
    let mut reader = csv::ReaderBuilder::new()
        .delimiter(ascii_byte(delimiter, "delimiter")?)
        .quote(ascii_byte(quote, "quote character")?)
        .from_path(path)
        .with_context(|| format!("failed to open CSV file {}", path.display()))?;

    let headers = reader.headers().context("failed to read CSV header")?.clone();
    let Some(index) = headers.iter().position(|h| h == column) else {
        let available: Vec<&str> = headers.iter().collect();
        bail!("Column '{column}' not found in CSV. Available columns: {available:?}");
    };

    let mut conversion = Conversion::default();
    for (row, record) in reader.records().enumerate() {
        let record = record.with_context(|| format!("failed to read CSV row {row}"))?;
        let text = record.get(index).unwrap_or_default();
        conversion.append(label_csv_cell(row, text, options));
    }
    debug!(
        "read {} rows, {} entries from {}",
        conversion.input_entries,
        conversion.entries.len(),
        path.display()
    );
    Ok(conversion.capped(options.max_positions))
}

fn collect_entries(args: &Args) -> Result<Conversion> {
    let options = args.convert_options();
    if let Some(pgn) = &args.pgn {
        return Ok(label_pgn_string(pgn, &options));
    }
    if let Some(path) = &args.pgn_file {
        let text = fs::read_to_string(path)
            .with_context(|| format!("failed to read PGN file {}", path.display()))?;
        return Ok(label_pgn_file(&text, &options));
    }
    if let Some(path) = &args.csv_file {
        return csv_entries(path, &args.column, args.delimiter, args.quotechar, &options);
    }
    bail!("no input given; pass --pgn, --pgn-file or --csv-file")
}

fn run(args: &Args) -> Result<()> {
    let conversion = collect_entries(args)?;
    info!(
        "{} entries, {} positions",
        conversion.entries.len(),
        conversion.entries.iter().map(|e| e.fens.len()).sum::<usize>()
    );

    match &args.output {
        Some(path) => {
            let file = File::create(path)
                .with_context(|| format!("failed to create {}", path.display()))?;
            write_entries(args.format, &conversion, BufWriter::new(file))?;
        }
        None => {
            let stdout = io::stdout().lock();
            write_entries(args.format, &conversion, BufWriter::new(stdout))?;
        }
    }
    Ok(())
}

fn main() {
    let args = Args::parse();

    env_logger::Builder::from_env(
        env_logger::Env::default().filter_or(env_logger::DEFAULT_FILTER_ENV, "warn"),
    )
    .format(|buf, record| writeln!(buf, "[{}] {}", record.level(), record.args()))
    .init();

    if let Err(e) = run(&args) {
        eprintln!("Error: {e:#}");
        std::process::exit(1);
    }
}
