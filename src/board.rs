//! 象棋棋盘
//!
//! 棋子存放在扁平的棋子表里，用 `PieceId` 句柄引用；网格只保存句柄。
//! 克隆棋盘只是数组拷贝，句柄在克隆后依然指向同一个棋子。

use crate::error::{Result, XiangqiError};
use crate::fen::to_fen;
use crate::movegen;
use crate::types::{Action, Color, Move, Piece, PieceId, PieceKind, Position, COLS, ROWS};
use serde::Serialize;
use std::fmt;

/// 网格大小：11 行 x 10 列（第 0 行/列不用）
const GRID_SIZE: usize = (ROWS as usize + 1) * (COLS as usize + 1);

/// 开局布子（黑方在前）
const OPENING: [(PieceKind, Color, Position); 32] = [
    (PieceKind::Chariot, Color::Black, Position::new(1, 1)),
    (PieceKind::Horse, Color::Black, Position::new(1, 2)),
    (PieceKind::Elephant, Color::Black, Position::new(1, 3)),
    (PieceKind::Advisor, Color::Black, Position::new(1, 4)),
    (PieceKind::General, Color::Black, Position::new(1, 5)),
    (PieceKind::Advisor, Color::Black, Position::new(1, 6)),
    (PieceKind::Elephant, Color::Black, Position::new(1, 7)),
    (PieceKind::Horse, Color::Black, Position::new(1, 8)),
    (PieceKind::Chariot, Color::Black, Position::new(1, 9)),
    (PieceKind::Cannon, Color::Black, Position::new(3, 2)),
    (PieceKind::Cannon, Color::Black, Position::new(3, 8)),
    (PieceKind::Soldier, Color::Black, Position::new(4, 1)),
    (PieceKind::Soldier, Color::Black, Position::new(4, 3)),
    (PieceKind::Soldier, Color::Black, Position::new(4, 5)),
    (PieceKind::Soldier, Color::Black, Position::new(4, 7)),
    (PieceKind::Soldier, Color::Black, Position::new(4, 9)),
    (PieceKind::Chariot, Color::Red, Position::new(10, 1)),
    (PieceKind::Horse, Color::Red, Position::new(10, 2)),
    (PieceKind::Elephant, Color::Red, Position::new(10, 3)),
    (PieceKind::Advisor, Color::Red, Position::new(10, 4)),
    (PieceKind::General, Color::Red, Position::new(10, 5)),
    (PieceKind::Advisor, Color::Red, Position::new(10, 6)),
    (PieceKind::Elephant, Color::Red, Position::new(10, 7)),
    (PieceKind::Horse, Color::Red, Position::new(10, 8)),
    (PieceKind::Chariot, Color::Red, Position::new(10, 9)),
    (PieceKind::Cannon, Color::Red, Position::new(8, 2)),
    (PieceKind::Cannon, Color::Red, Position::new(8, 8)),
    (PieceKind::Soldier, Color::Red, Position::new(7, 1)),
    (PieceKind::Soldier, Color::Red, Position::new(7, 3)),
    (PieceKind::Soldier, Color::Red, Position::new(7, 5)),
    (PieceKind::Soldier, Color::Red, Position::new(7, 7)),
    (PieceKind::Soldier, Color::Red, Position::new(7, 9)),
];

/// 棋盘状态
#[derive(Debug, Clone)]
pub struct Board {
    /// 网格，只保存活子的句柄
    squares: [Option<PieceId>; GRID_SIZE],
    /// 棋子表（含已被吃的子，保留最后位置）
    pieces: Vec<Piece>,
    /// 活子，保持加入顺序
    live: Vec<PieceId>,
    /// 被吃的子，按被吃顺序
    dead: Vec<PieceId>,
    current_turn: Color,
    winner: Option<Color>,
}

impl Default for Board {
    fn default() -> Self {
        Board::new()
    }
}

impl Board {
    /// 开局局面，红方先走
    pub fn new() -> Board {
        let mut board = Board::empty(Color::Red);
        for (kind, color, position) in OPENING {
            board.place(Piece::new(kind, color, position));
        }
        board
    }

    fn empty(turn: Color) -> Board {
        Board {
            squares: [None; GRID_SIZE],
            pieces: Vec::with_capacity(32),
            live: Vec::with_capacity(32),
            dead: Vec::new(),
            current_turn: turn,
            winner: None,
        }
    }

    fn place(&mut self, piece: Piece) -> PieceId {
        let id = PieceId(self.pieces.len() as u8);
        self.squares[piece.position.to_index()] = Some(id);
        self.pieces.push(piece);
        self.live.push(id);
        id
    }

    /// 用任意棋子构造局面（测试和残局用）
    ///
    /// 越界、重叠、士象将出了自己的区域都会报错。
    pub fn from_pieces<I>(pieces: I, turn: Color) -> Result<Board>
    where
        I: IntoIterator<Item = Piece>,
    {
        let mut board = Board::empty(turn);
        for piece in pieces {
            if !piece.position.is_valid() || !movegen::is_allowed_cell(&piece) {
                return Err(XiangqiError::IllegalPlacement {
                    kind: piece.kind,
                    color: piece.color,
                    position: piece.position,
                });
            }
            if board.piece_at(piece.position).is_some() {
                return Err(XiangqiError::Fen(format!(
                    "two pieces on {}",
                    piece.position
                )));
            }
            board.place(piece);
        }
        Ok(board)
    }

    /// 从 FEN 字符串创建棋盘
    pub fn from_fen(fen: &str) -> Result<Board> {
        crate::fen::parse_fen(fen)
    }

    /// 获取当前回合
    #[inline]
    pub fn turn(&self) -> Color {
        self.current_turn
    }

    /// 设置当前回合
    #[inline]
    pub fn set_turn(&mut self, color: Color) {
        self.current_turn = color;
    }

    /// 胜方，未分胜负时为 None
    #[inline]
    pub fn winner(&self) -> Option<Color> {
        self.winner
    }

    pub(crate) fn set_winner(&mut self, color: Color) {
        self.winner = Some(color);
    }

    /// 按句柄取棋子（句柄必须来自本棋盘或它的克隆）
    #[inline]
    pub fn piece(&self, id: PieceId) -> &Piece {
        &self.pieces[id.index()]
    }

    /// 按句柄取棋子，句柄不属于本棋盘时返回 None
    #[inline]
    pub fn get_piece(&self, id: PieceId) -> Option<&Piece> {
        self.pieces.get(id.index())
    }

    /// 某位置上的棋子句柄
    #[inline]
    pub fn piece_at(&self, pos: Position) -> Option<PieceId> {
        if !pos.is_valid() {
            return None;
        }
        self.squares[pos.to_index()]
    }

    /// 某位置上的棋子
    #[inline]
    pub fn occupant(&self, pos: Position) -> Option<&Piece> {
        self.piece_at(pos).map(|id| self.piece(id))
    }

    /// 所有活子
    pub fn live_pieces(&self) -> impl Iterator<Item = (PieceId, &Piece)> + '_ {
        self.live.iter().map(move |&id| (id, self.piece(id)))
    }

    /// 某方的所有活子
    pub fn pieces_of(&self, color: Color) -> Vec<PieceId> {
        self.live
            .iter()
            .copied()
            .filter(|&id| self.piece(id).color == color)
            .collect()
    }

    /// 被吃的棋子，按被吃顺序
    pub fn dead_pieces(&self) -> impl Iterator<Item = (PieceId, &Piece)> + '_ {
        self.dead.iter().map(move |&id| (id, self.piece(id)))
    }

    /// 是否活子
    pub fn is_live(&self, id: PieceId) -> bool {
        self.live.contains(&id)
    }

    /// 某个棋子的所有走法
    pub fn legal_moves(&self, id: PieceId) -> Result<Vec<Move>> {
        movegen::legal_moves(self, id)
    }

    /// 某方所有 (棋子, 走法)，顺序为活子顺序 x 方向检查顺序
    pub fn actions_for(&self, color: Color) -> Result<Vec<Action>> {
        let mut actions = Vec::with_capacity(64);
        for id in self.pieces_of(color) {
            let from = self.piece(id).position;
            for mv in movegen::legal_moves(self, id)? {
                actions.push(Action::new(id, from, mv));
            }
        }
        Ok(actions)
    }

    /// 某方是否还有任何走法
    pub fn has_any_legal_move(&self, color: Color) -> Result<bool> {
        for id in self.pieces_of(color) {
            if !movegen::legal_moves(self, id)?.is_empty() {
                return Ok(true);
            }
        }
        Ok(false)
    }

    /// 执行走棋，返回被吃的棋子
    ///
    /// 吃掉将/帅立即判胜；无论如何都交换回合。
    pub fn apply(&mut self, action: &Action) -> Result<Option<PieceId>> {
        let mover = *self
            .get_piece(action.piece)
            .ok_or(XiangqiError::UnknownPiece(action.piece))?;
        if mover.position != action.from || self.piece_at(action.from) != Some(action.piece) {
            return Err(XiangqiError::PieceNotOnBoard {
                piece: action.piece,
                position: action.from,
            });
        }
        if !action.to.is_valid() || self.piece_at(action.to) != action.captured {
            return Err(XiangqiError::StaleAction(format!(
                "{} does not match the occupant of {}",
                self.describe(action),
                action.to
            )));
        }
        if let Some(victim) = action.captured {
            if self.piece(victim).color == mover.color {
                return Err(XiangqiError::StaleAction(format!(
                    "{} captures a friendly piece",
                    self.describe(action)
                )));
            }
        }

        self.squares[action.from.to_index()] = None;
        self.squares[action.to.to_index()] = Some(action.piece);
        self.pieces[action.piece.index()].position = action.to;

        if let Some(victim) = action.captured {
            self.live.retain(|&id| id != victim);
            self.dead.push(victim);
            if self.piece(victim).kind == PieceKind::General && self.winner.is_none() {
                self.winner = Some(mover.color);
            }
        }

        self.current_turn = self.current_turn.opposite();
        Ok(action.captured)
    }

    /// 网格是否恰好是活子的投影
    pub fn is_consistent(&self) -> bool {
        let mut count = 0;
        for (index, cell) in self.squares.iter().enumerate() {
            if let Some(id) = cell {
                count += 1;
                let Some(piece) = self.pieces.get(id.index()) else {
                    return false;
                };
                if piece.position.to_index() != index || !self.is_live(*id) {
                    return false;
                }
            }
        }
        count == self.live.len()
            && self
                .live
                .iter()
                .all(|&id| self.piece_at(self.piece(id).position) == Some(id))
            && self.dead.iter().all(|id| !self.live.contains(id))
    }

    /// 走法的可读描述（日志用）
    pub fn describe(&self, action: &Action) -> String {
        let mover = match self.get_piece(action.piece) {
            Some(piece) => format!("{} {}", piece.color, piece.kind),
            None => format!("piece {}", action.piece),
        };
        match action.captured {
            Some(victim) => {
                let victim = match self.get_piece(victim) {
                    Some(piece) => piece.kind.to_string(),
                    None => victim.to_string(),
                };
                format!("{} {}->{} x {}", mover, action.from, action.to, victim)
            }
            None => format!("{} {}->{}", mover, action.from, action.to),
        }
    }

    /// 给界面用的快照
    pub fn view(&self) -> BoardView {
        let to_view = |(id, piece): (PieceId, &Piece)| PieceView {
            id,
            kind: piece.kind,
            color: piece.color,
            row: piece.position.row,
            col: piece.position.col,
            glyph: piece.glyph(),
        };
        BoardView {
            pieces: self.live_pieces().map(to_view).collect(),
            dead: self.dead_pieces().map(to_view).collect(),
            turn: self.current_turn,
            winner: self.winner,
            fen: to_fen(self),
        }
    }
}

impl fmt::Display for Board {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "   ")?;
        for col in 1..=COLS {
            write!(f, " {}", col)?;
        }
        writeln!(f)?;
        for row in 1..=ROWS {
            write!(f, "{:>2} ", row)?;
            for col in 1..=COLS {
                match self.occupant(Position::new(row, col)) {
                    Some(piece) => write!(f, "{}", piece.glyph())?,
                    None => write!(f, " ·")?,
                }
            }
            writeln!(f)?;
            if row == 5 {
                writeln!(f, "    ~~~~~~~~~~~~~~~~~")?;
            }
        }
        write!(f, "{}'s turn", self.current_turn)
    }
}

/// 棋子快照
#[derive(Debug, Clone, Serialize)]
pub struct PieceView {
    pub id: PieceId,
    pub kind: PieceKind,
    pub color: Color,
    pub row: i8,
    pub col: i8,
    pub glyph: char,
}

/// 棋盘快照
#[derive(Debug, Clone, Serialize)]
pub struct BoardView {
    pub pieces: Vec<PieceView>,
    pub dead: Vec<PieceView>,
    pub turn: Color,
    pub winner: Option<Color>,
    pub fen: String,
}
