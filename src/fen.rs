//! FEN 解析和生成
//!
//! 格式: `<棋盘> <回合>`
//!
//! 棋盘从 row 1（黑方底线）写到 row 10（红方底线），行之间用 `/` 分隔。
//!
//! 棋盘符号：
//! - 红方：R(车) H(马) E(相) A(仕) G(帅) C(炮) S(兵)
//! - 黑方：r h e a g c s
//! - 空格：数字 (1-9)
//!
//! 回合：`r` 或 `b`

use crate::board::Board;
use crate::error::{Result, XiangqiError};
use crate::types::{Color, Piece, PieceKind, Position, COLS, ROWS};

/// 解析 FEN 字符串
pub fn parse_fen(fen: &str) -> Result<Board> {
    let parts: Vec<&str> = fen.split_whitespace().collect();
    if parts.len() != 2 {
        return Err(XiangqiError::Fen(format!(
            "expected '<board> <turn>', got: {}",
            fen
        )));
    }

    let pieces = parse_board(parts[0])?;
    let mut turn_chars = parts[1].chars();
    let turn = match (turn_chars.next(), turn_chars.next()) {
        (Some(c), None) => Color::from_fen_char(c),
        _ => None,
    }
    .ok_or_else(|| XiangqiError::Fen(format!("invalid turn: {}", parts[1])))?;

    Board::from_pieces(pieces, turn)
}

/// 解析棋盘字符串
fn parse_board(board_str: &str) -> Result<Vec<Piece>> {
    let rows: Vec<&str> = board_str.split('/').collect();
    if rows.len() != ROWS as usize {
        return Err(XiangqiError::Fen(format!(
            "expected {} rows, got {}",
            ROWS,
            rows.len()
        )));
    }

    let mut pieces = Vec::new();

    for (row_idx, row_str) in rows.iter().enumerate() {
        let row = row_idx as i8 + 1;
        let mut col: i8 = 0;

        for ch in row_str.chars() {
            if let Some(run) = ch.to_digit(10) {
                col += run as i8;
            } else {
                let kind = PieceKind::from_char(ch)?;
                let color = if ch.is_ascii_uppercase() {
                    Color::Red
                } else {
                    Color::Black
                };
                col += 1;
                pieces.push(Piece::new(kind, color, Position::new(row, col)));
            }
            if col > COLS {
                return Err(XiangqiError::Fen(format!(
                    "row {} is wider than {} columns",
                    row, COLS
                )));
            }
        }

        if col != COLS {
            return Err(XiangqiError::Fen(format!(
                "row {} has {} columns, expected {}",
                row, col, COLS
            )));
        }
    }

    Ok(pieces)
}

/// 生成 FEN 字符串
pub fn to_fen(board: &Board) -> String {
    let mut rows = Vec::with_capacity(ROWS as usize);

    for row in 1..=ROWS {
        let mut row_str = String::new();
        let mut empty_count = 0;

        for col in 1..=COLS {
            match board.occupant(Position::new(row, col)) {
                Some(piece) => {
                    if empty_count > 0 {
                        row_str.push_str(&empty_count.to_string());
                        empty_count = 0;
                    }
                    let ch = piece.kind.to_char();
                    row_str.push(match piece.color {
                        Color::Red => ch,
                        Color::Black => ch.to_ascii_lowercase(),
                    });
                }
                None => empty_count += 1,
            }
        }

        if empty_count > 0 {
            row_str.push_str(&empty_count.to_string());
        }

        rows.push(row_str);
    }

    format!("{} {}", rows.join("/"), board.turn().to_fen_char())
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::test_positions;

    #[test]
    fn test_parse_start() {
        let board = parse_fen(test_positions::START).unwrap();

        assert_eq!(board.live_pieces().count(), 32);
        assert_eq!(board.turn(), Color::Red);
        let general = board.occupant(Position::new(1, 5)).unwrap();
        assert_eq!(general.kind, PieceKind::General);
        assert_eq!(general.color, Color::Black);
        let cannon = board.occupant(Position::new(8, 8)).unwrap();
        assert_eq!(cannon.kind, PieceKind::Cannon);
        assert_eq!(cannon.color, Color::Red);
    }

    #[test]
    fn test_start_matches_new_board() {
        assert_eq!(to_fen(&Board::new()), test_positions::START);
    }

    #[test]
    fn test_fen_roundtrip() {
        for fen in test_positions::ALL {
            let board = parse_fen(fen).unwrap();
            assert_eq!(to_fen(&board), fen);
        }
    }

    #[test]
    fn test_invalid_piece_letter() {
        let fen = "3g5/9/9/9/4X4/9/9/9/9/4G4 r";
        assert!(matches!(
            parse_fen(fen),
            Err(XiangqiError::InvalidPieceName('X'))
        ));
    }

    #[test]
    fn test_bad_shapes() {
        assert!(parse_fen("3g5/9/9 r").is_err());
        assert!(parse_fen("3g5/9/9/9/9/9/9/9/9/4G4").is_err());
        assert!(parse_fen("3g5/9/9/9/9/9/9/9/9/4G4 x").is_err());
        assert!(parse_fen("3g5/9/9/9/55/9/9/9/9/4G4 r").is_err());
        assert!(parse_fen("3g5/9/9/9/8/9/9/9/9/4G4 r").is_err());
    }

    #[test]
    fn test_advisor_outside_palace_rejected() {
        let fen = "3g5/9/9/9/4A4/9/9/9/9/4G4 r";
        assert!(matches!(
            parse_fen(fen),
            Err(XiangqiError::IllegalPlacement {
                kind: PieceKind::Advisor,
                ..
            })
        ));
    }
}
