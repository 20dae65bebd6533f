//! Replaying a game's mainline into FEN strings.
//!
//! [`Replay`] walks the move tokens of one game, resolving each against the
//! current position and yielding the FEN reached after it. The first error
//! ends the replay for good; [`replay_game`] collects a whole game or
//! nothing.
//!
//! # Example
//! ```
//! use pgn_fen::board::Board;
//! use pgn_fen::replay::replay_game;
//!
//! let fens = replay_game(Board::new(), &["e4", "e5", "Nf3"], true).unwrap();
//! assert_eq!(fens.len(), 4);
//! assert_eq!(fens[3], "rnbqkbnr/pppp1ppp/8/4p3/4P3/5N2/PPPP1PPP/RNBQKB1R b KQkq - 1 2");
//! ```

use log::{debug, trace};
use thiserror::Error;

use crate::board::{Board, EnPassantMode, IllegalStateError, SanError};

/// Why a ply could not be played.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum ReplayErrorKind {
    #[error(transparent)]
    Resolve(#[from] SanError),
    #[error(transparent)]
    Apply(#[from] IllegalStateError),
}

/// A failed ply, with its 1-based index and the token as written.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
#[error("ply {ply} ({token}): {kind}")]
pub struct ReplayError {
    pub ply: usize,
    pub token: String,
    #[source]
    pub kind: ReplayErrorKind,
}

#[derive(Clone, Copy, Debug, PartialEq, Eq)]
enum Phase {
    Start,
    Replaying,
    Done,
    Failed,
}

/// Lazy FEN sequence for one game.
///
/// Yields the starting FEN first when `include_initial` is set, then one FEN
/// per applied token. After an error or the last token it yields nothing
/// more until [`Replay::restart`] is called.
#[derive(Clone, Debug)]
pub struct Replay<'a, S> {
    start: Board,
    tokens: &'a [S],
    include_initial: bool,
    en_passant: EnPassantMode,
    board: Board,
    next_ply: usize,
    phase: Phase,
}

impl<'a, S: AsRef<str>> Replay<'a, S> {
    #[must_use]
    pub fn new(start: Board, tokens: &'a [S], include_initial: bool) -> Self {
        Replay {
            start,
            tokens,
            include_initial,
            en_passant: EnPassantMode::default(),
            board: start,
            next_ply: 0,
            phase: Phase::Start,
        }
    }

    /// Choose how the en passant field of each FEN is rendered.
    #[must_use]
    pub fn en_passant(mut self, mode: EnPassantMode) -> Self {
        self.en_passant = mode;
        self
    }

    /// Rewind to the starting position.
    pub fn restart(&mut self) {
        self.board = self.start;
        self.next_ply = 0;
        self.phase = Phase::Start;
    }

    /// The position after the last successfully applied token.
    #[must_use]
    pub fn board(&self) -> &Board {
        &self.board
    }

    /// True once the replay has stopped on an error.
    #[must_use]
    pub fn failed(&self) -> bool {
        self.phase == Phase::Failed
    }

    fn step(&mut self, token: &str) -> Result<(), ReplayErrorKind> {
        let mv = self.board.parse_san(token)?;
        self.board = self.board.apply(&mv)?;
        Ok(())
    }
}

impl<S: AsRef<str>> Iterator for Replay<'_, S> {
    type Item = Result<String, ReplayError>;

    fn next(&mut self) -> Option<Self::Item> {
        if self.phase == Phase::Start {
            self.phase = Phase::Replaying;
            debug!("replaying {} plies", self.tokens.len());
            if self.include_initial {
                return Some(Ok(self.board.to_fen_with(self.en_passant)));
            }
        }
        if self.phase != Phase::Replaying {
            return None;
        }

        let Some(token) = self.tokens.get(self.next_ply) else {
            self.phase = Phase::Done;
            return None;
        };
        let token = token.as_ref();
        self.next_ply += 1;

        match self.step(token) {
            Ok(()) => {
                let fen = self.board.to_fen_with(self.en_passant);
                trace!("ply {} {token}: {fen}", self.next_ply);
                Some(Ok(fen))
            }
            Err(kind) => {
                self.phase = Phase::Failed;
                let err = ReplayError {
                    ply: self.next_ply,
                    token: token.to_string(),
                    kind,
                };
                debug!("replay stopped: {err}");
                Some(Err(err))
            }
        }
    }

    fn size_hint(&self) -> (usize, Option<usize>) {
        let remaining = match self.phase {
            Phase::Start => self.tokens.len() + usize::from(self.include_initial),
            Phase::Replaying => self.tokens.len() - self.next_ply,
            Phase::Done | Phase::Failed => 0,
        };
        (0, Some(remaining))
    }
}

/// Replay `tokens` from `start`, returning every FEN or the first error.
pub fn replay_game<S: AsRef<str>>(
    start: Board,
    tokens: &[S],
    include_initial: bool,
) -> Result<Vec<String>, ReplayError> {
    Replay::new(start, tokens, include_initial).collect()
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::board::STARTING_FEN;

    const RUY_LOPEZ: [&str; 5] = ["e4", "e5", "Nf3", "Nc6", "Bb5"];

    #[test]
    fn test_opening_with_initial_position() {
        let fens = replay_game(Board::new(), &RUY_LOPEZ, true).unwrap();
        assert_eq!(fens.len(), 6);
        assert_eq!(fens[0], STARTING_FEN);
        assert_eq!(
            fens[5],
            "r1bqkbnr/pppp1ppp/2n5/1B2p3/4P3/5N2/PPPP1PPP/RNBQK2R b KQkq - 3 3"
        );
    }

    #[test]
    fn test_opening_without_initial_position() {
        let fens = replay_game(Board::new(), &RUY_LOPEZ, false).unwrap();
        assert_eq!(fens.len(), 5);
        assert_eq!(
            fens[0],
            "rnbqkbnr/pppppppp/8/8/4P3/8/PPPP1PPP/RNBQKBNR b KQkq e3 0 1"
        );
    }

    #[test]
    fn test_legal_en_passant_mode() {
        let fens: Vec<String> = Replay::new(Board::new(), &["e4"], false)
            .en_passant(EnPassantMode::Legal)
            .collect::<Result<_, _>>()
            .unwrap();
        assert_eq!(
            fens,
            ["rnbqkbnr/pppppppp/8/8/4P3/8/PPPP1PPP/RNBQKBNR b KQkq - 0 1"]
        );
    }

    #[test]
    fn test_empty_game() {
        assert!(replay_game::<&str>(Board::new(), &[], false).unwrap().is_empty());
        assert_eq!(
            replay_game::<&str>(Board::new(), &[], true).unwrap(),
            [STARTING_FEN]
        );
    }

    #[test]
    fn test_error_reports_ply_and_token() {
        let err = replay_game(Board::new(), &["e4", "e5", "Nf3", "Nf3"], true).unwrap_err();
        assert_eq!(err.ply, 4);
        assert_eq!(err.token, "Nf3");
        assert!(matches!(
            err.kind,
            ReplayErrorKind::Resolve(SanError::NoMatchingMove { .. })
        ));
        assert!(err.to_string().starts_with("ply 4 (Nf3)"));
    }

    #[test]
    fn test_malformed_token_fails_replay() {
        let err = replay_game(Board::new(), &["e4", "e9"], false).unwrap_err();
        assert_eq!(err.ply, 2);
        assert!(matches!(
            err.kind,
            ReplayErrorKind::Resolve(SanError::Malformed { .. })
        ));
    }

    #[test]
    fn test_iteration_stops_after_failure() {
        let tokens = ["e4", "Ke3", "Nf3"];
        let mut replay = Replay::new(Board::new(), &tokens, false);
        assert!(replay.next().unwrap().is_ok());
        assert!(replay.next().unwrap().is_err());
        assert!(replay.failed());
        assert!(replay.next().is_none());
        assert!(replay.next().is_none());
    }

    #[test]
    fn test_restart_yields_same_sequence() {
        let mut replay = Replay::new(Board::new(), &RUY_LOPEZ, true);
        let first: Vec<_> = replay.by_ref().collect();
        assert!(replay.next().is_none());
        replay.restart();
        let second: Vec<_> = replay.collect();
        assert_eq!(first, second);
    }

    #[test]
    fn test_start_from_given_position() {
        let start: Board = "4k3/8/8/8/8/8/4P3/4K3 w - - 0 40".parse().unwrap();
        let fens = replay_game(start, &["e4", "Kd7"], false).unwrap();
        assert_eq!(fens[1], "8/3k4/8/8/4P3/8/8/4K3 w - - 1 41");
    }

    #[test]
    fn test_owned_tokens() {
        let tokens: Vec<String> = RUY_LOPEZ.iter().map(|t| t.to_string()).collect();
        let replay = Replay::new(Board::new(), &tokens, false);
        assert_eq!(replay.count(), 5);
    }
}
