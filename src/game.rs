//! 对局控制器
//!
//! 界面点击驱动的状态机：选子 -> 显示候选落点 -> 确认落子 -> 轮到 AI。
//! 判胜只有两种：吃掉将/帅，或者轮到的一方无棋可走（判负）。

use crate::ai::Agent;
use crate::board::{Board, BoardView};
use crate::error::{Result, XiangqiError};
use crate::fen::to_fen;
use crate::types::{Action, Color, Move, PieceId, Position};
use log::{debug, info};
use serde::Serialize;

/// 控制器状态
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
pub enum ControllerState {
    /// 等待选子
    AwaitingSelection,
    /// 已选子，显示候选落点
    ShowingCandidateMoves,
    /// 轮到 AI
    AgentMoving,
}

/// 对局控制器，持有唯一的权威棋盘
#[derive(Debug, Clone)]
pub struct GameController {
    board: Board,
    state: ControllerState,
    selected: Option<PieceId>,
    candidates: Vec<Move>,
}

impl Default for GameController {
    fn default() -> Self {
        GameController::new()
    }
}

impl GameController {
    /// 从开局开始
    pub fn new() -> Self {
        GameController::with_board(Board::new())
    }

    pub fn with_board(board: Board) -> Self {
        GameController {
            board,
            state: ControllerState::AwaitingSelection,
            selected: None,
            candidates: Vec::new(),
        }
    }

    pub fn board(&self) -> &Board {
        &self.board
    }

    pub fn state(&self) -> ControllerState {
        self.state
    }

    pub fn selected(&self) -> Option<PieceId> {
        self.selected
    }

    /// 当前选中棋子的候选走法
    pub fn candidates(&self) -> &[Move] {
        &self.candidates
    }

    pub fn winner(&self) -> Option<Color> {
        self.board.winner()
    }

    fn clear_selection(&mut self) {
        self.selected = None;
        self.candidates.clear();
    }

    /// 选子
    ///
    /// 只在等待选子时有效，且必须是轮到的一方的棋子；否则什么都不做，返回 false。
    /// 轮到的一方无棋可走时直接判负。
    pub fn select(&mut self, pos: Position) -> Result<bool> {
        if self.state != ControllerState::AwaitingSelection || self.board.winner().is_some() {
            return Ok(false);
        }
        if self.check_stalemate()?.is_some() {
            return Ok(false);
        }
        let Some(id) = self.board.piece_at(pos) else {
            return Ok(false);
        };
        if self.board.piece(id).color != self.board.turn() {
            return Ok(false);
        }

        self.candidates = self.board.legal_moves(id)?;
        self.selected = Some(id);
        self.state = ControllerState::ShowingCandidateMoves;
        debug!("selected {} with {} candidates", pos, self.candidates.len());
        Ok(true)
    }

    /// 确认落点
    ///
    /// 落点在候选里则走棋并轮到 AI；否则取消选择，回到等待选子。
    pub fn confirm(&mut self, pos: Position) -> Result<Option<Action>> {
        if self.state != ControllerState::ShowingCandidateMoves {
            return Ok(None);
        }

        let chosen = self
            .selected
            .zip(self.candidates.iter().find(|mv| mv.to == pos).copied());
        self.clear_selection();

        match chosen {
            Some((id, mv)) => {
                let action = Action::new(id, self.board.piece(id).position, mv);
                info!("player played {}", self.board.describe(&action));
                self.board.apply(&action)?;
                self.state = ControllerState::AgentMoving;
                Ok(Some(action))
            }
            None => {
                self.state = ControllerState::AwaitingSelection;
                Ok(None)
            }
        }
    }

    /// 直接执行 AI 给出的走法，然后回到等待选子
    pub fn apply_agent_move(&mut self, action: &Action) -> Result<Option<PieceId>> {
        let captured = self.board.apply(action)?;
        self.clear_selection();
        self.state = ControllerState::AwaitingSelection;
        Ok(captured)
    }

    /// 不经点击直接把回合交给 AI（AI 对 AI 用）
    pub fn begin_agent_turn(&mut self) -> bool {
        if self.state != ControllerState::AwaitingSelection {
            return false;
        }
        self.clear_selection();
        self.state = ControllerState::AgentMoving;
        true
    }

    pub fn has_any_legal_move(&self, color: Color) -> Result<bool> {
        self.board.has_any_legal_move(color)
    }

    /// 轮到的一方无棋可走则判负，返回胜方
    pub fn check_stalemate(&mut self) -> Result<Option<Color>> {
        if self.board.winner().is_some() {
            return Ok(None);
        }
        let turn = self.board.turn();
        if self.board.has_any_legal_move(turn)? {
            return Ok(None);
        }

        let winner = turn.opposite();
        info!("{} has no legal move, {} wins", turn, winner);
        self.board.set_winner(winner);
        Ok(Some(winner))
    }

    /// 让 AI 走一步
    ///
    /// 只在 `AgentMoving` 状态有效。AI 执的颜色必须是轮到的一方。
    pub fn run_agent(&mut self, agent: &mut dyn Agent) -> Result<Option<Action>> {
        if self.state != ControllerState::AgentMoving {
            return Ok(None);
        }
        let turn = self.board.turn();
        if agent.color() != turn {
            return Err(XiangqiError::TurnMismatch {
                agent: agent.color(),
                turn,
            });
        }

        if self.board.winner().is_some() || self.check_stalemate()?.is_some() {
            self.state = ControllerState::AwaitingSelection;
            return Ok(None);
        }

        let moves = self.board.actions_for(turn)?.len();
        let choice = agent.choose_move(&self.board)?;
        info!("{} ({}) had {} moves", agent.name(), turn, moves);

        match choice {
            Some(action) => {
                self.apply_agent_move(&action)?;
                Ok(Some(action))
            }
            None => {
                self.state = ControllerState::AwaitingSelection;
                Ok(None)
            }
        }
    }

    /// 给界面用的快照
    pub fn view(&self) -> BoardView {
        self.board.view()
    }
}

/// AI 对 AI 的对局记录
#[derive(Debug, Clone, Serialize)]
pub struct MatchRecord {
    pub red: String,
    pub black: String,
    pub moves: Vec<String>,
    pub plies: u32,
    pub winner: Option<Color>,
    pub final_fen: String,
}

/// AI 对 AI 对局，最多 max_plies 步
pub fn play_match(
    board: Board,
    red: &mut dyn Agent,
    black: &mut dyn Agent,
    max_plies: u32,
) -> Result<MatchRecord> {
    let mut controller = GameController::with_board(board);
    let mut moves = Vec::new();
    let mut plies = 0;

    while plies < max_plies && controller.winner().is_none() {
        controller.begin_agent_turn();
        let agent: &mut dyn Agent = match controller.board().turn() {
            Color::Red => &mut *red,
            Color::Black => &mut *black,
        };
        match controller.run_agent(agent)? {
            Some(action) => {
                moves.push(controller.board().describe(&action));
                plies += 1;
            }
            None => break,
        }
    }

    let record = MatchRecord {
        red: red.name().to_string(),
        black: black.name().to_string(),
        moves,
        plies,
        winner: controller.winner(),
        final_fen: to_fen(controller.board()),
    };
    info!(
        "match {} vs {} finished after {} plies, winner: {:?}",
        record.red, record.black, record.plies, record.winner
    );
    Ok(record)
}
