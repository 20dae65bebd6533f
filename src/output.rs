//! Writers for converted games.

use std::io::{self, Write};

use serde::Serialize;
use thiserror::Error;

use crate::convert::{Conversion, LabeledFens};

/// Output encodings offered by the command-line tool.
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq, clap::ValueEnum)]
pub enum OutputFormat {
    /// One FEN per line, a blank line between entries
    #[default]
    Text,
    /// A FEN array for one entry, `{id, fens}` objects for several
    Json,
    /// `id,ply,fen` rows, ply counted from 1
    Csv,
}

/// Error type for writing results
#[derive(Debug, Error)]
pub enum OutputError {
    #[error("failed to write output: {0}")]
    Io(#[from] io::Error),
    #[error("failed to encode JSON: {0}")]
    Json(#[from] serde_json::Error),
    #[error("failed to encode CSV: {0}")]
    Csv(#[from] csv::Error),
}

#[derive(Serialize)]
struct CsvRow<'a> {
    id: &'a str,
    ply: usize,
    fen: &'a str,
}

/// Write `conversion` to `out` in the chosen format.
pub fn write_entries<W: Write>(
    format: OutputFormat,
    conversion: &Conversion,
    out: W,
) -> Result<(), OutputError> {
    match format {
        OutputFormat::Text => write_text(&conversion.entries, out),
        OutputFormat::Json => write_json(conversion, out),
        OutputFormat::Csv => write_csv(&conversion.entries, out),
    }
}

pub fn write_text<W: Write>(entries: &[LabeledFens], mut out: W) -> Result<(), OutputError> {
    for (i, entry) in entries.iter().enumerate() {
        if i > 0 {
            writeln!(out)?;
        }
        for fen in &entry.fens {
            writeln!(out, "{fen}")?;
        }
    }
    out.flush()?;
    Ok(())
}

/// A bare FEN array when the input held one entry, `{id, fens}` objects
/// otherwise.
pub fn write_json<W: Write>(conversion: &Conversion, mut out: W) -> Result<(), OutputError> {
    if conversion.is_single() {
        let fens = conversion
            .entries
            .first()
            .map(|entry| entry.fens.as_slice())
            .unwrap_or_default();
        serde_json::to_writer(&mut out, fens)?;
    } else {
        serde_json::to_writer(&mut out, &conversion.entries)?;
    }
    out.flush()?;
    Ok(())
}

/// `id,ply,fen` rows with the text fields always quoted.
pub fn write_csv<W: Write>(entries: &[LabeledFens], mut out: W) -> Result<(), OutputError> {
    // The header stays unquoted
    out.write_all(b"id,ply,fen\n")?;
    let mut writer = csv::WriterBuilder::new()
        .has_headers(false)
        .quote_style(csv::QuoteStyle::NonNumeric)
        .from_writer(out);
    for entry in entries {
        for (i, fen) in entry.fens.iter().enumerate() {
            writer.serialize(CsvRow {
                id: &entry.id,
                ply: i + 1,
                fen,
            })?;
        }
    }
    writer.flush()?;
    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;

    fn two_games() -> Conversion {
        Conversion {
            entries: vec![
                LabeledFens::new("game_0", vec!["a b".into(), "c d".into()]),
                LabeledFens::new("game_1", vec!["e f".into()]),
            ],
            input_entries: 2,
        }
    }

    fn render(format: OutputFormat, conversion: &Conversion) -> String {
        let mut buf = Vec::new();
        write_entries(format, conversion, &mut buf).unwrap();
        String::from_utf8(buf).unwrap()
    }

    #[test]
    fn test_text_separates_entries() {
        assert_eq!(render(OutputFormat::Text, &two_games()), "a b\nc d\n\ne f\n");
        assert_eq!(render(OutputFormat::Text, &Conversion::default()), "");
    }

    #[test]
    fn test_json_single_entry_is_plain_array() {
        let mut single = two_games();
        single.entries.truncate(1);
        single.input_entries = 1;
        assert_eq!(render(OutputFormat::Json, &single), r#"["a b","c d"]"#);
    }

    #[test]
    fn test_json_single_failed_entry_is_empty_array() {
        let failed = Conversion {
            entries: Vec::new(),
            input_entries: 1,
        };
        assert_eq!(render(OutputFormat::Json, &failed), "[]");
        assert_eq!(render(OutputFormat::Json, &Conversion::default()), "[]");
    }

    #[test]
    fn test_json_many_entries_carry_ids() {
        let json: serde_json::Value =
            serde_json::from_str(&render(OutputFormat::Json, &two_games())).unwrap();
        assert_eq!(json[1]["id"], "game_1");
        assert_eq!(json[0]["fens"][1], "c d");
    }

    #[test]
    fn test_json_shape_follows_input_not_survivors() {
        let mut survivor = two_games();
        survivor.entries.remove(0);
        let json: serde_json::Value =
            serde_json::from_str(&render(OutputFormat::Json, &survivor)).unwrap();
        assert_eq!(json[0]["id"], "game_1");
        assert_eq!(json.as_array().map(Vec::len), Some(1));
    }

    #[test]
    fn test_csv_rows() {
        assert_eq!(
            render(OutputFormat::Csv, &two_games()),
            "id,ply,fen\n\"game_0\",1,\"a b\"\n\"game_0\",2,\"c d\"\n\"game_1\",1,\"e f\"\n"
        );
    }

    #[test]
    fn test_csv_header_without_rows() {
        assert_eq!(render(OutputFormat::Csv, &Conversion::default()), "id,ply,fen\n");
    }
}
