//! PGN mainline extraction.
//!
//! Splits PGN text into games and keeps only the tag pairs and the mainline
//! SAN tokens. Comments, variations, move numbers and annotation glyphs are
//! dropped on the way. Legality is not checked here; see [`crate::replay`].

use log::debug;
use thiserror::Error;

use crate::board::{Board, FenError};

const RESULTS: [&str; 4] = ["1-0", "0-1", "1/2-1/2", "*"];

/// Error type for turning a game's tags into a starting position
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum PgnError {
    /// The `FEN` tag does not hold a valid position
    #[error("Invalid FEN tag '{fen}': {source}")]
    InvalidFen {
        fen: String,
        #[source]
        source: FenError,
    },
    /// The `Variant` tag names something other than standard chess
    #[error("Unsupported variant '{variant}'")]
    UnsupportedVariant { variant: String },
}

/// One game: its tag pairs, mainline SAN tokens and result marker.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct PgnGame {
    pub tags: Vec<(String, String)>,
    pub moves: Vec<String>,
    pub result: Option<String>,
}

impl PgnGame {
    /// Value of the first tag called `name`.
    #[must_use]
    pub fn tag(&self, name: &str) -> Option<&str> {
        self.tags
            .iter()
            .find(|(key, _)| key == name)
            .map(|(_, value)| value.as_str())
    }

    /// Position the mainline starts from: the `FEN` tag if present,
    /// otherwise the standard initial position.
    pub fn start_position(&self) -> Result<Board, PgnError> {
        if let Some(variant) = self.tag("Variant") {
            if !matches!(variant.to_ascii_lowercase().as_str(), "standard" | "chess" | "") {
                return Err(PgnError::UnsupportedVariant {
                    variant: variant.to_string(),
                });
            }
        }
        match self.tag("FEN") {
            Some(fen) => Board::try_from_fen(fen).map_err(|source| PgnError::InvalidFen {
                fen: fen.to_string(),
                source,
            }),
            None => Ok(Board::new()),
        }
    }

    fn is_blank(&self) -> bool {
        self.tags.is_empty() && self.moves.is_empty() && self.result.is_none()
    }
}

#[derive(Debug, PartialEq, Eq)]
enum Token<'a> {
    Tag(String, String),
    Symbol(&'a str),
    OpenVariation,
    CloseVariation,
}

/// Lexer over PGN text. Comments, escapes and NAGs never leave it.
struct Lexer<'a> {
    text: &'a str,
    pos: usize,
    line_start: bool,
}

impl<'a> Lexer<'a> {
    fn new(text: &'a str) -> Self {
        Lexer {
            text,
            pos: 0,
            line_start: true,
        }
    }

    fn peek(&self) -> Option<char> {
        self.text[self.pos..].chars().next()
    }

    fn bump(&mut self) -> Option<char> {
        let c = self.peek()?;
        self.pos += c.len_utf8();
        self.line_start = c == '\n';
        Some(c)
    }

    fn skip_until(&mut self, end: char) {
        while let Some(c) = self.bump() {
            if c == end {
                break;
            }
        }
    }

    /// Tag body after `[`: `Name "value"]`. Returns `None` for junk.
    fn tag(&mut self) -> Option<Token<'a>> {
        let start = self.pos;
        while matches!(self.peek(), Some(c) if c != ']' && c != '"' && c != '\n') {
            self.bump();
        }
        let name = self.text[start..self.pos].trim().to_string();

        let mut value = String::new();
        if self.peek() == Some('"') {
            self.bump();
            while let Some(c) = self.bump() {
                match c {
                    '\\' => {
                        if let Some(escaped) = self.bump() {
                            value.push(escaped);
                        }
                    }
                    '"' => break,
                    _ => value.push(c),
                }
            }
        }
        self.skip_until(']');

        if name.is_empty() || name.contains(char::is_whitespace) {
            return None;
        }
        Some(Token::Tag(name, value))
    }
}

impl<'a> Iterator for Lexer<'a> {
    type Item = Token<'a>;

    fn next(&mut self) -> Option<Token<'a>> {
        loop {
            let at_line_start = self.line_start;
            let c = self.peek()?;
            match c {
                '%' if at_line_start => self.skip_until('\n'),
                ';' => self.skip_until('\n'),
                '{' => self.skip_until('}'),
                '(' => {
                    self.bump();
                    return Some(Token::OpenVariation);
                }
                ')' => {
                    self.bump();
                    return Some(Token::CloseVariation);
                }
                '[' => {
                    self.bump();
                    if let Some(tag) = self.tag() {
                        return Some(tag);
                    }
                }
                '$' => {
                    self.bump();
                    while matches!(self.peek(), Some(d) if d.is_ascii_digit()) {
                        self.bump();
                    }
                }
                c if c.is_whitespace() || c == '}' || c == ']' => {
                    self.bump();
                }
                _ => {
                    let start = self.pos;
                    while matches!(
                        self.peek(),
                        Some(d) if !d.is_whitespace() && !"{}()[];$".contains(d)
                    ) {
                        self.bump();
                    }
                    return Some(Token::Symbol(&self.text[start..self.pos]));
                }
            }
        }
    }
}

/// Drop a leading move number such as `12.` or `3...`.
fn strip_move_number(symbol: &str) -> &str {
    let digits = symbol.len() - symbol.trim_start_matches(|c: char| c.is_ascii_digit()).len();
    if digits == 0 {
        return symbol;
    }
    let rest = &symbol[digits..];
    let dots = rest.len() - rest.trim_start_matches('.').len();
    if dots == 0 {
        return symbol;
    }
    &rest[dots..]
}

/// Split PGN text into games.
///
/// A game ends at its result marker, at the start of the next tag block, or
/// at end of input. Text with no tags and no movetext yields no games.
#[must_use]
pub fn split_games(text: &str) -> Vec<PgnGame> {
    let mut games = Vec::new();
    let mut game = PgnGame::default();
    let mut depth = 0usize;

    for token in Lexer::new(text) {
        match token {
            Token::Tag(name, value) => {
                if !game.moves.is_empty() {
                    games.push(std::mem::take(&mut game));
                    depth = 0;
                }
                game.tags.push((name, value));
            }
            Token::OpenVariation => depth += 1,
            Token::CloseVariation => depth = depth.saturating_sub(1),
            Token::Symbol(_) if depth > 0 => {}
            Token::Symbol(symbol) if RESULTS.contains(&symbol) => {
                game.result = Some(symbol.to_string());
                games.push(std::mem::take(&mut game));
                depth = 0;
            }
            Token::Symbol(symbol) => {
                let san = strip_move_number(symbol);
                if !san.is_empty() {
                    game.moves.push(san.to_string());
                }
            }
        }
    }
    if !game.is_blank() {
        games.push(game);
    }

    debug!("split {} game(s) from {} bytes of PGN", games.len(), text.len());
    games
}

#[cfg(test)]
mod tests {
    use super::*;

    const TAGGED_GAME: &str = r#"[Event "Casual"]
[White "Anderssen, A."]
[Black "Kieseritzky, L."]
[Result "1-0"]

1. e4 e5 2. f4 exf4 3. Bc4 Qh4+ 4. Kf1 b5 1-0
"#;

    #[test]
    fn test_tags_moves_and_result() {
        let games = split_games(TAGGED_GAME);
        assert_eq!(games.len(), 1);
        let game = &games[0];
        assert_eq!(game.tag("White"), Some("Anderssen, A."));
        assert_eq!(game.tag("Round"), None);
        assert_eq!(
            game.moves,
            ["e4", "e5", "f4", "exf4", "Bc4", "Qh4+", "Kf1", "b5"]
        );
        assert_eq!(game.result.as_deref(), Some("1-0"));
    }

    #[test]
    fn test_bare_movetext() {
        let games = split_games("1. e4 e5 2. Nf3 Nc6 3. Bb5 a6");
        assert_eq!(games.len(), 1);
        assert_eq!(games[0].moves, ["e4", "e5", "Nf3", "Nc6", "Bb5", "a6"]);
        assert_eq!(games[0].result, None);
    }

    #[test]
    fn test_empty_input_has_no_games() {
        assert!(split_games("").is_empty());
        assert!(split_games("  \n\n ").is_empty());
        assert!(split_games("{just a comment}").is_empty());
    }

    #[test]
    fn test_comments_variations_and_nags_are_skipped() {
        let text = "1. e4 {best by test} e5 ; open game\n\
                    2. Nf3 $1 (2. f4 exf4 (2... d5) 3. Nf3) Nc6!? 3. Bb5 *";
        let games = split_games(text);
        assert_eq!(games.len(), 1);
        assert_eq!(games[0].moves, ["e4", "e5", "Nf3", "Nc6!?", "Bb5"]);
        assert_eq!(games[0].result.as_deref(), Some("*"));
    }

    #[test]
    fn test_escape_lines_are_skipped() {
        let text = "% generated file\n1. d4 d5 1/2-1/2";
        let games = split_games(text);
        assert_eq!(games[0].moves, ["d4", "d5"]);
        assert_eq!(games[0].result.as_deref(), Some("1/2-1/2"));
    }

    #[test]
    fn test_move_numbers_glued_to_moves() {
        let games = split_games("1.e4 e5 2.Nf3 2...Nc6");
        assert_eq!(games[0].moves, ["e4", "e5", "Nf3", "Nc6"]);
    }

    #[test]
    fn test_black_continuation_number() {
        let games = split_games("[FEN \"4k3/8/8/8/8/8/4P3/4K3 b - - 0 1\"]\n1... Kd7 2. e4 *");
        assert_eq!(games[0].moves, ["Kd7", "e4"]);
    }

    #[test]
    fn test_multiple_games() {
        let text = format!("{TAGGED_GAME}\n[Event \"Second\"]\n\n1. d4 Nf6 0-1\n\n1. c4 *");
        let games = split_games(&text);
        assert_eq!(games.len(), 3);
        assert_eq!(games[1].tag("Event"), Some("Second"));
        assert_eq!(games[1].moves, ["d4", "Nf6"]);
        assert_eq!(games[2].moves, ["c4"]);
    }

    #[test]
    fn test_tags_start_new_game_without_result() {
        let text = "[Event \"A\"]\n1. e4 e5\n[Event \"B\"]\n1. d4";
        let games = split_games(text);
        assert_eq!(games.len(), 2);
        assert_eq!(games[0].moves, ["e4", "e5"]);
        assert_eq!(games[1].tag("Event"), Some("B"));
    }

    #[test]
    fn test_escaped_quote_in_tag() {
        let games = split_games(r#"[Annotator "The \"Doc\""] 1. e4 *"#);
        assert_eq!(games[0].tag("Annotator"), Some("The \"Doc\""));
    }

    #[test]
    fn test_start_position_from_fen_tag() {
        let games = split_games("[SetUp \"1\"]\n[FEN \"4k3/8/8/8/8/8/4P3/4K3 w - - 0 1\"]\n1. e4 *");
        let start = games[0].start_position().unwrap();
        assert_eq!(start.to_fen(), "4k3/8/8/8/8/8/4P3/4K3 w - - 0 1");

        assert_eq!(PgnGame::default().start_position().unwrap(), Board::new());
    }

    #[test]
    fn test_start_position_errors() {
        let games = split_games("[FEN \"not a fen\"]\n1. e4 *");
        assert!(matches!(
            games[0].start_position(),
            Err(PgnError::InvalidFen { .. })
        ));

        let games = split_games("[Variant \"Chess960\"]\n1. e4 *");
        assert!(matches!(
            games[0].start_position(),
            Err(PgnError::UnsupportedVariant { .. })
        ));
    }
}
