//! 走法生成
//!
//! 每种棋子一个规则函数，按方向检查顺序输出（不排序）。
//! 只读网格，不做将军检查：送将的走法同样合法。

use crate::board::Board;
use crate::error::{Result, XiangqiError};
use crate::types::{Color, Move, Piece, PieceId, PieceKind, Position};

/// 士的五个点
const RED_ADVISOR_CELLS: [Position; 5] = [
    Position::new(10, 4),
    Position::new(10, 6),
    Position::new(9, 5),
    Position::new(8, 4),
    Position::new(8, 6),
];
const BLACK_ADVISOR_CELLS: [Position; 5] = [
    Position::new(1, 4),
    Position::new(1, 6),
    Position::new(2, 5),
    Position::new(3, 4),
    Position::new(3, 6),
];

/// 象的七个点
const RED_ELEPHANT_CELLS: [Position; 7] = [
    Position::new(10, 3),
    Position::new(10, 7),
    Position::new(8, 1),
    Position::new(8, 5),
    Position::new(8, 9),
    Position::new(6, 3),
    Position::new(6, 7),
];
const BLACK_ELEPHANT_CELLS: [Position; 7] = [
    Position::new(1, 3),
    Position::new(1, 7),
    Position::new(3, 1),
    Position::new(3, 5),
    Position::new(3, 9),
    Position::new(5, 3),
    Position::new(5, 7),
];

const DIAGONALS: [(i8, i8); 4] = [(1, 1), (1, -1), (-1, 1), (-1, -1)];
const ORTHOGONALS: [(i8, i8); 4] = [(1, 0), (-1, 0), (0, 1), (0, -1)];
/// 车/炮的扫描顺序：右、左、上、下
const RAYS: [(i8, i8); 4] = [(0, 1), (0, -1), (-1, 0), (1, 0)];
/// 马腿及其对应的两个落点
const HORSE_LEGS: [((i8, i8), [(i8, i8); 2]); 4] = [
    ((0, 1), [(1, 2), (-1, 2)]),
    ((0, -1), [(1, -2), (-1, -2)]),
    ((-1, 0), [(-2, 1), (-2, -1)]),
    ((1, 0), [(2, 1), (2, -1)]),
];

fn advisor_cells(color: Color) -> &'static [Position] {
    match color {
        Color::Red => &RED_ADVISOR_CELLS,
        Color::Black => &BLACK_ADVISOR_CELLS,
    }
}

fn elephant_cells(color: Color) -> &'static [Position] {
    match color {
        Color::Red => &RED_ELEPHANT_CELLS,
        Color::Black => &BLACK_ELEPHANT_CELLS,
    }
}

/// 士、象、将只能站在各自的区域
pub(crate) fn is_allowed_cell(piece: &Piece) -> bool {
    match piece.kind {
        PieceKind::Advisor => advisor_cells(piece.color).contains(&piece.position),
        PieceKind::Elephant => elephant_cells(piece.color).contains(&piece.position),
        PieceKind::General => piece.position.is_in_palace(piece.color),
        _ => true,
    }
}

/// 获取棋子的所有走法
///
/// 前置条件：棋子必须正好在网格记录的位置上，否则返回 `PieceNotOnBoard`；
/// 句柄不属于本棋盘时返回 `UnknownPiece`。
pub fn legal_moves(board: &Board, id: PieceId) -> Result<Vec<Move>> {
    let piece = board
        .get_piece(id)
        .ok_or(XiangqiError::UnknownPiece(id))?;
    if board.piece_at(piece.position) != Some(id) {
        return Err(XiangqiError::PieceNotOnBoard {
            piece: id,
            position: piece.position,
        });
    }
    if !is_allowed_cell(piece) {
        return Err(XiangqiError::IllegalPlacement {
            kind: piece.kind,
            color: piece.color,
            position: piece.position,
        });
    }

    let targets = match piece.kind {
        PieceKind::Advisor => advisor_moves(board, piece),
        PieceKind::General => general_moves(board, piece),
        PieceKind::Elephant => elephant_moves(board, piece),
        PieceKind::Chariot => chariot_moves(board, piece),
        PieceKind::Cannon => cannon_moves(board, piece),
        PieceKind::Horse => horse_moves(board, piece),
        PieceKind::Soldier => soldier_moves(board, piece),
    };

    Ok(targets
        .into_iter()
        .map(|to| Move {
            to,
            captured: board.piece_at(to),
        })
        .collect())
}

/// 在棋盘内，且为空或敌子
#[inline]
fn can_move_to(board: &Board, piece: &Piece, pos: Position) -> bool {
    if !pos.is_valid() {
        return false;
    }
    match board.occupant(pos) {
        None => true,
        Some(target) => target.color != piece.color,
    }
}

fn advisor_moves(board: &Board, piece: &Piece) -> Vec<Position> {
    let cells = advisor_cells(piece.color);
    DIAGONALS
        .iter()
        .map(|&(dr, dc)| piece.position.offset(dr, dc))
        .filter(|pos| cells.contains(pos) && can_move_to(board, piece, *pos))
        .collect()
}

fn general_moves(board: &Board, piece: &Piece) -> Vec<Position> {
    let mut moves: Vec<Position> = ORTHOGONALS
        .iter()
        .map(|&(dr, dc)| piece.position.offset(dr, dc))
        .filter(|pos| pos.is_in_palace(piece.color) && can_move_to(board, piece, *pos))
        .collect();

    // 飞将：沿本列向对方扫描，第一个子是对方将则可以吃
    let step = piece.color.forward();
    let mut pos = piece.position.offset(step, 0);
    while pos.is_valid() {
        if let Some(target) = board.occupant(pos) {
            if target.kind == PieceKind::General && target.color != piece.color {
                moves.push(pos);
            }
            break;
        }
        pos = pos.offset(step, 0);
    }

    moves
}

fn elephant_moves(board: &Board, piece: &Piece) -> Vec<Position> {
    let cells = elephant_cells(piece.color);
    let mut moves = Vec::with_capacity(4);

    for (dr, dc) in DIAGONALS {
        let new_pos = piece.position.offset(dr * 2, dc * 2);
        let eye_pos = piece.position.offset(dr, dc);

        if !cells.contains(&new_pos) {
            continue;
        }
        // 塞象眼
        if board.piece_at(eye_pos).is_some() {
            continue;
        }
        if can_move_to(board, piece, new_pos) {
            moves.push(new_pos);
        }
    }

    moves
}

fn chariot_moves(board: &Board, piece: &Piece) -> Vec<Position> {
    let mut moves = Vec::with_capacity(17);

    for (dr, dc) in RAYS {
        let mut new_pos = piece.position.offset(dr, dc);
        while new_pos.is_valid() {
            match board.occupant(new_pos) {
                None => moves.push(new_pos),
                Some(target) => {
                    if target.color != piece.color {
                        moves.push(new_pos);
                    }
                    break;
                }
            }
            new_pos = new_pos.offset(dr, dc);
        }
    }

    moves
}

fn cannon_moves(board: &Board, piece: &Piece) -> Vec<Position> {
    let mut moves = Vec::with_capacity(17);

    for (dr, dc) in RAYS {
        let mut new_pos = piece.position.offset(dr, dc);
        let mut found_screen = false;

        while new_pos.is_valid() {
            match board.occupant(new_pos) {
                None => {
                    if !found_screen {
                        moves.push(new_pos);
                    }
                }
                Some(target) => {
                    if !found_screen {
                        found_screen = true;
                    } else {
                        if target.color != piece.color {
                            moves.push(new_pos);
                        }
                        break;
                    }
                }
            }
            new_pos = new_pos.offset(dr, dc);
        }
    }

    moves
}

fn horse_moves(board: &Board, piece: &Piece) -> Vec<Position> {
    let mut moves = Vec::with_capacity(8);

    for ((lr, lc), landings) in HORSE_LEGS {
        let leg_pos = piece.position.offset(lr, lc);
        // 蹩马腿
        if !leg_pos.is_valid() || board.piece_at(leg_pos).is_some() {
            continue;
        }
        for (dr, dc) in landings {
            let new_pos = piece.position.offset(dr, dc);
            if can_move_to(board, piece, new_pos) {
                moves.push(new_pos);
            }
        }
    }

    moves
}

fn soldier_moves(board: &Board, piece: &Piece) -> Vec<Position> {
    let forward = piece.color.forward();
    let mut steps = vec![(forward, 0)];
    // 过河后可以左右走
    if piece.position.has_crossed_river(piece.color) {
        steps.push((0, 1));
        steps.push((0, -1));
    }

    steps
        .into_iter()
        .map(|(dr, dc)| piece.position.offset(dr, dc))
        .filter(|pos| can_move_to(board, piece, *pos))
        .collect()
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::test_positions;
    use crate::types::Action;

    fn targets(board: &Board, pos: Position) -> Vec<Position> {
        let id = board.piece_at(pos).unwrap();
        legal_moves(board, id)
            .unwrap()
            .into_iter()
            .map(|m| m.to)
            .collect()
    }

    fn p(row: i8, col: i8) -> Position {
        Position::new(row, col)
    }

    #[test]
    fn test_moves_stay_on_board_and_avoid_friends() {
        for fen in test_positions::ALL {
            let board = Board::from_fen(fen).unwrap();
            for (id, piece) in board.live_pieces() {
                for mv in legal_moves(&board, id).unwrap() {
                    assert!(mv.to.is_valid(), "{} -> {} off board", piece.kind, mv.to);
                    if let Some(target) = board.occupant(mv.to) {
                        assert_ne!(target.color, piece.color, "{:?} lands on a friend", piece);
                        assert_eq!(mv.captured, board.piece_at(mv.to));
                    } else {
                        assert_eq!(mv.captured, None);
                    }
                }
            }
        }
    }

    #[test]
    fn test_cannon_needs_screen() {
        let board = Board::from_fen(test_positions::CANNON_SCREEN).unwrap();
        let cannon = board.piece_at(p(5, 1)).unwrap();
        let chariot = board.piece_at(p(5, 7)).unwrap();
        let moves = legal_moves(&board, cannon).unwrap();
        let dests: Vec<Position> = moves.iter().map(|m| m.to).collect();

        assert!(moves.contains(&Move {
            to: p(5, 7),
            captured: Some(chariot)
        }));
        assert!(dests.contains(&p(5, 2)));
        assert!(dests.contains(&p(5, 3)));
        // 炮架和炮架后面的空格都不能走
        for col in [4, 5, 6, 8, 9] {
            assert!(!dests.contains(&p(5, col)), "cannon should not reach (5,{})", col);
        }
        // 竖线上无子可吃，只能平移
        assert_eq!(dests.iter().filter(|d| d.col == 1).count(), 9);
    }

    #[test]
    fn test_cannon_cannot_capture_friend_beyond_screen() {
        // 炮架后第一个子是己方：不能吃，也不能越过
        let board = Board::from_fen("3g5/9/9/9/C2s2R1r/9/9/9/9/4G4 r").unwrap();
        let dests = targets(&board, p(5, 1));
        assert!(!dests.contains(&p(5, 7)));
        assert!(!dests.contains(&p(5, 9)));
    }

    #[test]
    fn test_cannon_captures_from_opening() {
        let board = Board::new();
        let dests = targets(&board, p(8, 2));
        assert_eq!(
            dests,
            vec![
                p(8, 3),
                p(8, 4),
                p(8, 5),
                p(8, 6),
                p(8, 7),
                p(8, 1),
                p(7, 2),
                p(6, 2),
                p(5, 2),
                p(4, 2),
                p(1, 2),
                p(9, 2),
            ]
        );
    }

    #[test]
    fn test_horse_leg_blocking() {
        let board = Board::from_fen(test_positions::HOBBLED_HORSE).unwrap();
        let dests = targets(&board, p(5, 5));

        assert_eq!(
            dests,
            vec![p(6, 7), p(4, 7), p(6, 3), p(4, 3), p(7, 6), p(7, 4)]
        );
        assert!(!dests.contains(&p(3, 4)));
        assert!(!dests.contains(&p(3, 6)));
    }

    #[test]
    fn test_horse_from_opening() {
        let board = Board::new();
        assert_eq!(targets(&board, p(10, 2)), vec![p(8, 3), p(8, 1)]);
    }

    #[test]
    fn test_flying_general() {
        let board = Board::from_fen(test_positions::FACING_GENERALS).unwrap();
        let red = board.piece_at(p(10, 5)).unwrap();
        let black = board.piece_at(p(1, 5)).unwrap();

        let red_moves = legal_moves(&board, red).unwrap();
        assert_eq!(
            red_moves.last(),
            Some(&Move {
                to: p(1, 5),
                captured: Some(black)
            })
        );
        assert_eq!(
            red_moves.iter().map(|m| m.to).collect::<Vec<_>>(),
            vec![p(9, 5), p(10, 6), p(10, 4), p(1, 5)]
        );

        let black_moves = legal_moves(&board, black).unwrap();
        assert!(black_moves.contains(&Move {
            to: p(10, 5),
            captured: Some(red)
        }));
    }

    #[test]
    fn test_flying_general_blocked() {
        let board = Board::new();
        // 中兵挡住
        assert_eq!(targets(&board, p(10, 5)), vec![p(9, 5)]);
    }

    #[test]
    fn test_advisor_moves() {
        let board = Board::from_fen("3g5/9/9/9/9/9/9/9/4A4/3G5 r").unwrap();
        assert_eq!(
            targets(&board, p(9, 5)),
            vec![p(10, 6), p(8, 6), p(8, 4)]
        );
    }

    #[test]
    fn test_elephant_eye_blocking() {
        let board = Board::from_fen("3g5/9/9/9/9/9/3S5/4E4/9/4G4 r").unwrap();
        let dests = targets(&board, p(8, 5));
        assert_eq!(dests, vec![p(10, 7), p(10, 3), p(6, 7)]);
        assert!(!dests.contains(&p(6, 3)));
    }

    #[test]
    fn test_elephant_cannot_cross_river() {
        let board = Board::from_fen("3g5/9/9/9/9/2E6/9/9/9/4G4 r").unwrap();
        assert_eq!(targets(&board, p(6, 3)), vec![p(8, 5), p(8, 1)]);
    }

    #[test]
    fn test_soldier_moves() {
        let board = Board::from_fen("S2g5/9/9/2s6/4S4/2s6/S8/9/9/4G4 r").unwrap();

        // 红兵未过河：只能前进
        assert_eq!(targets(&board, p(7, 1)), vec![p(6, 1)]);
        // 红兵过河：前、右、左
        assert_eq!(targets(&board, p(5, 5)), vec![p(4, 5), p(5, 6), p(5, 4)]);
        // 红兵到底线：只能横走
        assert_eq!(targets(&board, p(1, 1)), vec![p(1, 2)]);
        // 黑卒未过河
        assert_eq!(targets(&board, p(4, 3)), vec![p(5, 3)]);
        // 黑卒过河
        assert_eq!(targets(&board, p(6, 3)), vec![p(7, 3), p(6, 4), p(6, 2)]);
    }

    #[test]
    fn test_chariot_stops_before_friend() {
        let board = Board::new();
        assert_eq!(targets(&board, p(10, 1)), vec![p(9, 1), p(8, 1)]);
    }

    #[test]
    fn test_dead_piece_is_precondition_violation() {
        let mut board = Board::from_fen(test_positions::CHARIOT_HUNT).unwrap();
        let chariot = board.piece_at(p(5, 1)).unwrap();
        let horse = board.piece_at(p(5, 5)).unwrap();
        board
            .apply(&Action {
                piece: chariot,
                from: p(5, 1),
                to: p(5, 5),
                captured: Some(horse),
            })
            .unwrap();

        assert!(matches!(
            legal_moves(&board, horse),
            Err(XiangqiError::PieceNotOnBoard { .. })
        ));
    }
}
