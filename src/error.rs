//! 错误类型

use crate::types::{Color, PieceId, PieceKind, Position};

/// 引擎错误
#[derive(Debug, thiserror::Error)]
pub enum XiangqiError {
    /// 棋子不在棋盘记录的位置上（调用方破坏了不变量）
    #[error("piece {piece} is not on the grid at {position}")]
    PieceNotOnBoard { piece: PieceId, position: Position },

    /// 句柄不属于这个棋盘
    #[error("unknown piece {0}")]
    UnknownPiece(PieceId),

    /// 士/象/将摆在了不允许的位置
    #[error("{color} {kind} cannot stand on {position}")]
    IllegalPlacement {
        kind: PieceKind,
        color: Color,
        position: Position,
    },

    #[error("invalid piece name: {0:?}")]
    InvalidPieceName(char),

    #[error("invalid FEN: {0}")]
    Fen(String),

    /// 走法与当前棋盘不一致
    #[error("stale action: {0}")]
    StaleAction(String),

    #[error("agent plays {agent} but it is {turn}'s turn")]
    TurnMismatch { agent: Color, turn: Color },

    #[error("unknown strategy: {0}")]
    UnknownStrategy(String),

    #[error("IO error: {0}")]
    Io(#[from] std::io::Error),

    #[error("JSON error: {0}")]
    Json(#[from] serde_json::Error),
}

pub type Result<T> = std::result::Result<T, XiangqiError>;
