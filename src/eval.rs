//! 局面评估：只看子力，与位置无关

use crate::board::Board;
use crate::types::{Action, Color};

/// 子力差（perspective 一方减去对方）
pub fn evaluate(board: &Board, perspective: Color) -> f64 {
    board
        .live_pieces()
        .map(|(_, piece)| {
            let value = piece.kind.value();
            if piece.color == perspective {
                value
            } else {
                -value
            }
        })
        .sum()
}

/// 走法吃子的价值，不吃子为 0
#[inline]
pub fn capture_value(board: &Board, action: &Action) -> f64 {
    action
        .captured
        .map_or(0.0, |victim| board.piece(victim).kind.value())
}
