//! 象棋核心类型定义
//!
//! 坐标沿用 1 起始的 (row, col)：row 1 是黑方底线，row 10 是红方底线，
//! 红方向 row 减小的方向前进。

use crate::error::{Result, XiangqiError};
use serde::{Deserialize, Serialize};
use std::fmt;

/// 行数
pub const ROWS: i8 = 10;
/// 列数
pub const COLS: i8 = 9;

/// 棋子颜色/阵营
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum Color {
    Red,
    Black,
}

impl Color {
    /// 获取对方阵营
    pub fn opposite(&self) -> Color {
        match self {
            Color::Red => Color::Black,
            Color::Black => Color::Red,
        }
    }

    /// 前进方向（行增量）
    #[inline]
    pub fn forward(&self) -> i8 {
        match self {
            Color::Red => -1,
            Color::Black => 1,
        }
    }

    /// 从 FEN 字符解析
    pub fn from_fen_char(c: char) -> Option<Color> {
        match c {
            'r' => Some(Color::Red),
            'b' => Some(Color::Black),
            _ => None,
        }
    }

    /// 转换为 FEN 字符
    pub fn to_fen_char(&self) -> char {
        match self {
            Color::Red => 'r',
            Color::Black => 'b',
        }
    }
}

impl fmt::Display for Color {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Color::Red => write!(f, "red"),
            Color::Black => write!(f, "black"),
        }
    }
}

/// 棋子类型
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum PieceKind {
    /// 仕/士
    Advisor,
    /// 炮/砲
    Cannon,
    /// 俥/車
    Chariot,
    /// 相/象
    Elephant,
    /// 帥/將
    General,
    /// 傌/馬
    Horse,
    /// 兵/卒
    Soldier,
}

impl PieceKind {
    /// 从字母解析（大小写均可）
    pub fn from_char(c: char) -> Result<PieceKind> {
        match c.to_ascii_uppercase() {
            'A' => Ok(PieceKind::Advisor),
            'C' => Ok(PieceKind::Cannon),
            'R' => Ok(PieceKind::Chariot),
            'E' => Ok(PieceKind::Elephant),
            'G' => Ok(PieceKind::General),
            'H' => Ok(PieceKind::Horse),
            'S' => Ok(PieceKind::Soldier),
            _ => Err(XiangqiError::InvalidPieceName(c)),
        }
    }

    /// 转换为字母（大写）
    pub fn to_char(&self) -> char {
        match self {
            PieceKind::Advisor => 'A',
            PieceKind::Cannon => 'C',
            PieceKind::Chariot => 'R',
            PieceKind::Elephant => 'E',
            PieceKind::General => 'G',
            PieceKind::Horse => 'H',
            PieceKind::Soldier => 'S',
        }
    }

    /// 子力价值
    pub fn value(&self) -> f64 {
        match self {
            PieceKind::Soldier => 1.0,
            PieceKind::Advisor => 2.0,
            PieceKind::Elephant => 2.0,
            PieceKind::Horse => 4.0,
            PieceKind::Cannon => 4.5,
            PieceKind::Chariot => 9.0,
            PieceKind::General => 100.0,
        }
    }

    /// 棋子汉字
    pub fn glyph(&self, color: Color) -> char {
        match (self, color) {
            (PieceKind::Chariot, _) => '車',
            (PieceKind::Horse, _) => '馬',
            (PieceKind::Elephant, Color::Red) => '相',
            (PieceKind::Elephant, Color::Black) => '象',
            (PieceKind::Advisor, Color::Red) => '仕',
            (PieceKind::Advisor, Color::Black) => '士',
            (PieceKind::General, Color::Red) => '帥',
            (PieceKind::General, Color::Black) => '將',
            (PieceKind::Cannon, Color::Red) => '炮',
            (PieceKind::Cannon, Color::Black) => '砲',
            (PieceKind::Soldier, Color::Red) => '兵',
            (PieceKind::Soldier, Color::Black) => '卒',
        }
    }
}

impl fmt::Display for PieceKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let name = match self {
            PieceKind::Advisor => "Advisor",
            PieceKind::Cannon => "Cannon",
            PieceKind::Chariot => "Chariot",
            PieceKind::Elephant => "Elephant",
            PieceKind::General => "General",
            PieceKind::Horse => "Horse",
            PieceKind::Soldier => "Soldier",
        };
        write!(f, "{}", name)
    }
}

/// 棋盘位置 (row, col)
///
/// row: 1-10 (1 是黑方底线，10 是红方底线)
/// col: 1-9 (从左到右)
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub struct Position {
    pub row: i8,
    pub col: i8,
}

impl Position {
    pub const fn new(row: i8, col: i8) -> Self {
        Position { row, col }
    }

    /// 检查位置是否在棋盘范围内
    #[inline]
    pub fn is_valid(&self) -> bool {
        (1..=ROWS).contains(&self.row) && (1..=COLS).contains(&self.col)
    }

    /// 检查位置是否在九宫格内
    pub fn is_in_palace(&self, color: Color) -> bool {
        if !(4..=6).contains(&self.col) {
            return false;
        }
        match color {
            Color::Red => (8..=10).contains(&self.row),
            Color::Black => (1..=3).contains(&self.row),
        }
    }

    /// 是否已过河
    pub fn has_crossed_river(&self, color: Color) -> bool {
        match color {
            Color::Red => self.row <= 5,
            Color::Black => self.row >= 6,
        }
    }

    /// 位置加偏移量
    #[inline]
    pub fn offset(&self, row_delta: i8, col_delta: i8) -> Position {
        Position {
            row: self.row + row_delta,
            col: self.col + col_delta,
        }
    }

    /// 网格下标（11 x 10，第 0 行/列不用）
    #[inline]
    pub fn to_index(&self) -> usize {
        self.row as usize * (COLS as usize + 1) + self.col as usize
    }
}

impl fmt::Display for Position {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "({},{})", self.row, self.col)
    }
}

/// 棋子句柄：棋子表中的下标，整盘棋内稳定，棋盘克隆后仍然有效
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
pub struct PieceId(pub u8);

impl PieceId {
    #[inline]
    pub fn index(&self) -> usize {
        self.0 as usize
    }
}

impl fmt::Display for PieceId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "#{}", self.0)
    }
}

/// 棋子：名字、颜色、位置都相同即视为同一个棋子
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub struct Piece {
    pub kind: PieceKind,
    pub color: Color,
    pub position: Position,
}

impl Piece {
    pub const fn new(kind: PieceKind, color: Color, position: Position) -> Self {
        Piece {
            kind,
            color,
            position,
        }
    }

    pub fn glyph(&self) -> char {
        self.kind.glyph(self.color)
    }
}

/// 走法生成器的输出：目标位置以及被吃的棋子
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub struct Move {
    pub to: Position,
    pub captured: Option<PieceId>,
}

/// 选定的走法：哪个棋子，从哪里，到哪里，吃了谁
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub struct Action {
    pub piece: PieceId,
    pub from: Position,
    pub to: Position,
    pub captured: Option<PieceId>,
}

impl Action {
    pub fn new(piece: PieceId, from: Position, mv: Move) -> Self {
        Action {
            piece,
            from,
            to: mv.to,
            captured: mv.captured,
        }
    }

    /// 拆出走法部分
    pub fn as_move(&self) -> Move {
        Move {
            to: self.to,
            captured: self.captured,
        }
    }
}
