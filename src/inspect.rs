use anyhow::{Context, Result};
use clap::Args;
use serde::Serialize;
use shakmaty::fen::Fen;
use shakmaty::san::SanPlus;
use shakmaty::uci::UciMove;
use shakmaty::{CastlingMode, CastlingSide, Chess, Color, Position, Role};

#[derive(Args)]
pub struct InspectCommand {
    /// FEN of the position to inspect
    #[arg(long, value_name = "fen")]
    fen: String,
}

/// Everything there is to say about a single position.
#[derive(Debug, Serialize)]
pub struct PositionReport {
    pub turn: String,
    pub in_check: bool,
    pub castling_rights: CastlingRights,
    pub legal_moves: Vec<MoveInfo>,
}

#[derive(Debug, Serialize)]
pub struct CastlingRights {
    pub white_kingside: bool,
    pub white_queenside: bool,
    pub black_kingside: bool,
    pub black_queenside: bool,
}

#[derive(Debug, Serialize)]
pub struct MoveInfo {
    pub uci: String,
    pub san: String,
    pub from_square: String,
    pub to_square: String,
    /// Piece name for promotions ("queen", "knight", ...), null otherwise.
    pub promotion: Option<String>,
}

fn role_name(role: Role) -> &'static str {
    match role {
        Role::Pawn => "pawn",
        Role::Knight => "knight",
        Role::Bishop => "bishop",
        Role::Rook => "rook",
        Role::Queen => "queen",
        Role::King => "king",
    }
}

/// Builds the report for a FEN, rejecting anything that is not a legal
/// standard-chess position.
pub fn position_report(fen: &str) -> Result<PositionReport> {
    let position: Chess = Fen::from_ascii(fen.as_bytes())
        .with_context(|| format!("invalid FEN: {}", fen))?
        .into_position(CastlingMode::Standard)
        .with_context(|| format!("not a legal position: {}", fen))?;

    let castles = position.castles();
    let castling_rights = CastlingRights {
        white_kingside: castles.has(Color::White, CastlingSide::KingSide),
        white_queenside: castles.has(Color::White, CastlingSide::QueenSide),
        black_kingside: castles.has(Color::Black, CastlingSide::KingSide),
        black_queenside: castles.has(Color::Black, CastlingSide::QueenSide),
    };

    let mut legal_moves = vec![];
    for mov in position.legal_moves() {
        let uci = UciMove::from_move(&mov, CastlingMode::Standard);
        let (from, to, promotion) = match uci {
            UciMove::Normal {
                from,
                to,
                promotion,
            } => (from, to, promotion),
            // drops and null moves never come out of legal_moves
            _ => continue,
        };

        legal_moves.push(MoveInfo {
            uci: uci.to_string(),
            san: SanPlus::from_move(position.clone(), &mov).to_string(),
            from_square: from.to_string(),
            to_square: to.to_string(),
            promotion: promotion.map(|role| role_name(role).to_string()),
        });
    }

    Ok(PositionReport {
        turn: match position.turn() {
            Color::White => "White".to_string(),
            Color::Black => "Black".to_string(),
        },
        in_check: position.is_check(),
        castling_rights,
        legal_moves,
    })
}

pub fn inspect(cmd: InspectCommand) -> Result<()> {
    let report = position_report(&cmd.fen)?;
    println!("{}", serde_json::to_string_pretty(&report)?);
    Ok(())
}
