use crate::report::Reporter;
use pgn_reader::{BufferedReader, RawHeader, SanPlus, Skip, Visitor};
use shakmaty::{Chess, Color, Outcome, Position};
use std::io;

/// One fully replayed game.
#[derive(Debug, Clone)]
pub struct GameRecord {
    /// Result header mapped to an outcome, `None` for anything else ("*", missing, garbage).
    pub result: Option<Outcome>,
    /// The Event header, kept for diagnostics.
    pub event: String,
    /// Every position of the mainline: index 0 is the starting position,
    /// the last entry is the position after the final move.
    pub positions: Vec<Chess>,
}

struct GameVisitor<'r> {
    report: &'r dyn Reporter,

    result: Option<Outcome>,
    event: String,

    /// All positions for the current game
    positions: Vec<Chess>,

    /// Set when a move cannot be replayed; the rest of the game is ignored
    skip: bool,
}

impl<'r> GameVisitor<'r> {
    fn new(report: &'r dyn Reporter) -> Self {
        GameVisitor {
            report,
            result: None,
            event: "".to_string(),
            positions: vec![Chess::default()], // start pos
            skip: false,
        }
    }
}

impl<'r> Visitor for GameVisitor<'r> {
    type Result = Option<GameRecord>;

    fn begin_game(&mut self) {
        self.result = None;
        self.event = "".to_string();
        self.positions.truncate(1); // only keep starting board
        self.skip = false;
    }

    fn header(&mut self, _key: &[u8], _value: RawHeader<'_>) {
        let key = String::from_utf8_lossy(_key);
        let value = String::from_utf8_lossy(_value.as_bytes());

        if key == "Event" {
            self.event = value.to_string();
        } else if key == "Result" {
            self.result = match value.as_ref() {
                "1-0" => Some(Outcome::Decisive {
                    winner: Color::White,
                }),
                "0-1" => Some(Outcome::Decisive {
                    winner: Color::Black,
                }),
                "1/2-1/2" => Some(Outcome::Draw),
                _ => None,
            };
        }
    }

    fn begin_variation(&mut self) -> Skip {
        Skip(true)
    }

    fn san(&mut self, _san_plus: SanPlus) {
        if self.skip {
            return;
        }

        let pos = self.positions.last().unwrap().clone();
        let mov = match _san_plus.san.to_move(&pos) {
            Ok(mov) => mov,
            Err(err) => {
                self.report
                    .malformed_game(&format!("{} ({})", err, _san_plus));
                self.skip = true;
                return;
            }
        };

        match pos.play(&mov) {
            Ok(next) => self.positions.push(next),
            Err(err) => {
                self.report.malformed_game(&err.to_string());
                self.skip = true;
            }
        }
    }

    fn end_game(&mut self) -> Self::Result {
        if self.skip {
            return None;
        }

        Some(GameRecord {
            result: self.result,
            event: std::mem::take(&mut self.event),
            positions: self.positions.clone(),
        })
    }
}

/// Lazy, single-pass iterator over the games of a PGN source.
///
/// Games with a move that cannot be replayed are reported and skipped;
/// I/O errors from the underlying reader end the file and surface as an
/// `Err` item.
pub struct GameStream<'r, R> {
    games: BufferedReader<R>,
    visitor: GameVisitor<'r>,
}

impl<'r, R: io::Read> GameStream<'r, R> {
    pub fn new(read: R, report: &'r dyn Reporter) -> Self {
        GameStream {
            games: BufferedReader::new(read),
            visitor: GameVisitor::new(report),
        }
    }
}

impl<'r, R: io::Read> Iterator for GameStream<'r, R> {
    type Item = io::Result<GameRecord>;

    fn next(&mut self) -> Option<Self::Item> {
        loop {
            match self.games.read_game(&mut self.visitor) {
                Ok(Some(Some(record))) => return Some(Ok(record)),
                Ok(Some(None)) => continue, // malformed, already reported
                Ok(None) => return None,
                Err(err) => return Some(Err(err)),
            }
        }
    }
}
