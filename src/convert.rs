//! Batch conversion of PGN text into FEN sequences.
//!
//! Games that fail to replay are skipped with a warning; the rest of the
//! input is still converted.

use log::{debug, warn};
use thiserror::Error;

use crate::board::EnPassantMode;
use crate::pgn::{split_games, PgnError, PgnGame};
use crate::replay::{Replay, ReplayError};

/// Knobs shared by every conversion entry point.
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq)]
pub struct ConvertOptions {
    /// Emit the starting position before the first move.
    pub include_initial: bool,
    /// Stop after this many positions in total.
    pub max_positions: Option<usize>,
    pub en_passant: EnPassantMode,
}

/// Why one game produced no FENs.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum ConvertError {
    #[error(transparent)]
    Pgn(#[from] PgnError),
    #[error(transparent)]
    Replay(#[from] ReplayError),
}

/// Outcome for one game of the input, by position in the input.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct GameFens {
    pub index: usize,
    pub result: Result<Vec<String>, ConvertError>,
}

/// FENs for one output entry, with the identifier it is reported under.
#[derive(Debug, Clone, PartialEq, Eq)]
#[cfg_attr(feature = "serde", derive(serde::Serialize))]
pub struct LabeledFens {
    pub id: String,
    pub fens: Vec<String>,
}

impl LabeledFens {
    pub fn new(id: impl Into<String>, fens: Vec<String>) -> Self {
        LabeledFens {
            id: id.into(),
            fens,
        }
    }
}

/// Labelled FENs plus how many entries the input held.
///
/// Failed games are absent from `entries` but still counted in
/// `input_entries`, so the output shape follows the input rather than the
/// number of games that converted.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct Conversion {
    pub entries: Vec<LabeledFens>,
    pub input_entries: usize,
}

impl Conversion {
    /// True when the input held exactly one entry.
    #[must_use]
    pub fn is_single(&self) -> bool {
        self.input_entries == 1
    }

    /// Add the entries of another conversion after these.
    pub fn append(&mut self, other: Conversion) {
        self.entries.extend(other.entries);
        self.input_entries += other.input_entries;
    }

    /// Truncate so that at most `max` positions remain overall.
    ///
    /// Entries after the one that reaches the cap are dropped.
    #[must_use]
    pub fn capped(mut self, max: Option<usize>) -> Self {
        let Some(max) = max else {
            return self;
        };
        let mut remaining = max;
        let mut keep = 0;
        for entry in &mut self.entries {
            if remaining == 0 {
                break;
            }
            if entry.fens.len() >= remaining {
                entry.fens.truncate(remaining);
                remaining = 0;
            } else {
                remaining -= entry.fens.len();
            }
            keep += 1;
        }
        self.entries.truncate(keep);
        self
    }
}

/// Replay one parsed game from its starting position.
pub fn game_to_fens(game: &PgnGame, options: &ConvertOptions) -> Result<Vec<String>, ConvertError> {
    let start = game.start_position()?;
    let fens = Replay::new(start, &game.moves, options.include_initial)
        .en_passant(options.en_passant)
        .collect::<Result<Vec<_>, _>>()?;
    Ok(fens)
}

/// One [`GameFens`] per game in `text`, in input order.
pub fn iterate_games(text: &str, options: &ConvertOptions) -> impl Iterator<Item = GameFens> {
    let options = *options;
    split_games(text)
        .into_iter()
        .enumerate()
        .map(move |(index, game)| {
            let result = game_to_fens(&game, &options);
            debug!(
                "game {index}: {} token(s), {}",
                game.moves.len(),
                if result.is_ok() { "ok" } else { "failed" }
            );
            GameFens { index, result }
        })
}

/// Log and drop a failed game.
fn keep_ok(game: GameFens) -> Option<(usize, Vec<String>)> {
    match game.result {
        Ok(fens) => Some((game.index, fens)),
        Err(err) => {
            warn!("skipping game {}: {err}", game.index);
            None
        }
    }
}

/// All FENs of all games in `text`, flattened and capped at
/// `options.max_positions`.
#[must_use]
pub fn convert_pgn_text_to_fens(text: &str, options: &ConvertOptions) -> Vec<String> {
    let mut all = Vec::new();
    for (_, fens) in iterate_games(text, options).filter_map(keep_ok) {
        all.extend(fens);
        if let Some(max) = options.max_positions {
            if all.len() >= max {
                all.truncate(max);
                break;
            }
        }
    }
    all
}

/// A literal PGN string reported as a single entry, `game_0`.
#[must_use]
pub fn label_pgn_string(text: &str, options: &ConvertOptions) -> Conversion {
    Conversion {
        entries: vec![LabeledFens::new("game_0", convert_pgn_text_to_fens(text, options))],
        input_entries: 1,
    }
}

/// Each game of a PGN file as `game_{i}`.
#[must_use]
pub fn label_pgn_file(text: &str, options: &ConvertOptions) -> Conversion {
    let games: Vec<GameFens> = iterate_games(text, options).collect();
    let input_entries = games.len();
    let entries = games
        .into_iter()
        .filter_map(keep_ok)
        .map(|(index, fens)| LabeledFens::new(format!("game_{index}"), fens))
        .collect();
    Conversion {
        entries,
        input_entries,
    }
    .capped(options.max_positions)
}

/// The games of one CSV cell.
///
/// A cell holding one game (or none) is reported as `row_{row}`; a cell
/// holding several as `row_{row}_game_{g}`. Failed games are skipped.
#[must_use]
pub fn label_csv_cell(row: usize, text: &str, options: &ConvertOptions) -> Conversion {
    let games: Vec<GameFens> = iterate_games(text, options).collect();
    let input_entries = games.len().max(1);
    let entries = match games.len() {
        0 => vec![LabeledFens::new(format!("row_{row}"), Vec::new())],
        1 => games
            .into_iter()
            .filter_map(keep_ok)
            .map(|(_, fens)| LabeledFens::new(format!("row_{row}"), fens))
            .collect(),
        _ => games
            .into_iter()
            .filter_map(keep_ok)
            .map(|(g, fens)| LabeledFens::new(format!("row_{row}_game_{g}"), fens))
            .collect(),
    };
    Conversion {
        entries,
        input_entries,
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::board::STARTING_FEN;
    use crate::replay::ReplayErrorKind;

    const TWO_GAMES: &str = "1. e4 e5 2. Nf3 1-0\n\n1. d4 d5 0-1\n";

    fn with_initial() -> ConvertOptions {
        ConvertOptions {
            include_initial: true,
            ..ConvertOptions::default()
        }
    }

    #[test]
    fn test_flattened_games() {
        let fens = convert_pgn_text_to_fens(TWO_GAMES, &ConvertOptions::default());
        assert_eq!(fens.len(), 5);
        assert_eq!(
            fens[3],
            "rnbqkbnr/pppppppp/8/8/3P4/8/PPP1PPPP/RNBQKBNR b KQkq d3 0 1"
        );
    }

    #[test]
    fn test_include_initial_per_game() {
        let fens = convert_pgn_text_to_fens(TWO_GAMES, &with_initial());
        assert_eq!(fens.len(), 7);
        assert_eq!(fens[0], STARTING_FEN);
        assert_eq!(fens[4], STARTING_FEN);
    }

    #[test]
    fn test_max_positions_truncates() {
        let options = ConvertOptions {
            max_positions: Some(4),
            ..with_initial()
        };
        let fens = convert_pgn_text_to_fens(TWO_GAMES, &options);
        assert_eq!(fens.len(), 4);
        assert_eq!(fens[0], STARTING_FEN);
    }

    #[test]
    fn test_empty_input_is_not_an_error() {
        assert!(convert_pgn_text_to_fens("", &with_initial()).is_empty());
        assert_eq!(iterate_games("", &with_initial()).count(), 0);
    }

    #[test]
    fn test_failing_game_is_skipped() {
        let text = "1. e4 e5 2. Ke3 *\n\n1. d4 *";
        let games: Vec<GameFens> = iterate_games(text, &ConvertOptions::default()).collect();
        assert_eq!(games.len(), 2);
        match &games[0].result {
            Err(ConvertError::Replay(err)) => {
                assert_eq!(err.ply, 3);
                assert_eq!(err.token, "Ke3");
                assert!(matches!(err.kind, ReplayErrorKind::Resolve(_)));
            }
            other => panic!("expected replay error, got {other:?}"),
        }
        assert_eq!(games[1].index, 1);

        let fens = convert_pgn_text_to_fens(text, &ConvertOptions::default());
        assert_eq!(fens.len(), 1);
    }

    #[test]
    fn test_fen_tag_sets_start() {
        let text = "[FEN \"4k3/8/8/8/8/8/4P3/4K3 w - - 0 1\"]\n1. e4 Kd7 *";
        let fens = convert_pgn_text_to_fens(text, &with_initial());
        assert_eq!(fens[0], "4k3/8/8/8/8/8/4P3/4K3 w - - 0 1");
        assert_eq!(fens[2], "8/3k4/8/8/4P3/8/8/4K3 w - - 1 2");
    }

    #[test]
    fn test_bad_fen_tag_fails_game() {
        let games: Vec<GameFens> =
            iterate_games("[FEN \"8/8 w\"]\n1. e4 *", &ConvertOptions::default()).collect();
        assert!(matches!(games[0].result, Err(ConvertError::Pgn(_))));
    }

    #[test]
    fn test_legal_en_passant_option() {
        let options = ConvertOptions {
            en_passant: EnPassantMode::Legal,
            ..ConvertOptions::default()
        };
        let fens = convert_pgn_text_to_fens("1. e4", &options);
        assert_eq!(
            fens,
            ["rnbqkbnr/pppppppp/8/8/4P3/8/PPPP1PPP/RNBQKBNR b KQkq - 0 1"]
        );
    }

    #[test]
    fn test_pgn_string_is_one_entry() {
        let conversion = label_pgn_string(TWO_GAMES, &ConvertOptions::default());
        assert!(conversion.is_single());
        assert_eq!(conversion.entries.len(), 1);
        assert_eq!(conversion.entries[0].id, "game_0");
        assert_eq!(conversion.entries[0].fens.len(), 5);
    }

    #[test]
    fn test_pgn_file_ids_keep_input_index() {
        let text = format!("1. e4 Ke3 *\n\n{TWO_GAMES}");
        let conversion = label_pgn_file(&text, &ConvertOptions::default());
        let ids: Vec<&str> = conversion.entries.iter().map(|e| e.id.as_str()).collect();
        assert_eq!(ids, ["game_1", "game_2"]);
        assert_eq!(conversion.input_entries, 3);
    }

    #[test]
    fn test_failed_game_still_counts_as_input_entry() {
        let conversion = label_pgn_file("1. e4 Ke3 *\n\n1. d4 *", &ConvertOptions::default());
        assert_eq!(conversion.entries.len(), 1);
        assert_eq!(conversion.entries[0].id, "game_1");
        assert!(!conversion.is_single());
    }

    #[test]
    fn test_csv_cell_ids() {
        let options = ConvertOptions::default();
        let single = label_csv_cell(0, "1. e4 e5", &options);
        assert!(single.is_single());
        assert_eq!(single.entries[0].id, "row_0");
        assert_eq!(single.entries[0].fens.len(), 2);

        let many = label_csv_cell(3, TWO_GAMES, &options);
        let ids: Vec<&str> = many.entries.iter().map(|e| e.id.as_str()).collect();
        assert_eq!(ids, ["row_3_game_0", "row_3_game_1"]);
        assert_eq!(many.input_entries, 2);

        let empty = label_csv_cell(7, "", &options);
        assert_eq!(empty.entries, [LabeledFens::new("row_7", Vec::new())]);
        assert_eq!(empty.input_entries, 1);

        let failed = label_csv_cell(8, "1. Ke3 *", &options);
        assert!(failed.entries.is_empty());
        assert_eq!(failed.input_entries, 1);
    }

    #[test]
    fn test_append_counts_rows() {
        let options = ConvertOptions::default();
        let mut all = Conversion::default();
        all.append(label_csv_cell(0, "1. e4", &options));
        all.append(label_csv_cell(1, "1. d4", &options));
        assert_eq!(all.entries.len(), 2);
        assert!(!all.is_single());
    }

    #[test]
    fn test_capped_across_entries() {
        let conversion = Conversion {
            entries: vec![
                LabeledFens::new("a", vec!["1".into(), "2".into()]),
                LabeledFens::new("b", vec!["3".into(), "4".into()]),
                LabeledFens::new("c", vec!["5".into()]),
            ],
            input_entries: 3,
        };
        let capped = conversion.clone().capped(Some(3));
        assert_eq!(capped.entries.len(), 2);
        assert_eq!(capped.entries[1].fens, ["3"]);
        assert_eq!(capped.input_entries, 3);

        assert_eq!(conversion.clone().capped(None), conversion);
        assert!(conversion.capped(Some(0)).entries.is_empty());
    }
}
