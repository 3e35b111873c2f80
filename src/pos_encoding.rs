use shakmaty::{Board, Color, Role};

/// Encodes a board into one signed byte per square, a1 first.
///
/// White pieces are positive, black negative: 1=pawn, 2=knight, 3=bishop,
/// 4=rook, 5=queen, 6=king. Empty squares are 0. With `flip` the array is
/// reversed (a1 <-> h8) and every value negated, so the side to move always
/// reads as positive from its own end of the board.
pub fn encode_board(board: &Board, flip: bool) -> [i8; 64] {
    let mut data = [0 as i8; 64];

    for (square, piece) in board.clone().into_iter() {
        let code = match piece.role {
            Role::Pawn => 1,
            Role::Knight => 2,
            Role::Bishop => 3,
            Role::Rook => 4,
            Role::Queen => 5,
            Role::King => 6,
        };

        data[square as usize] = match piece.color {
            Color::White => code,
            Color::Black => -code,
        };
    }

    if flip {
        data.reverse();
        for value in data.iter_mut() {
            *value = -*value;
        }
    }

    data
}
