//! 象棋 AI 引擎
//!
//! 走法生成、棋盘状态、子力评估，以及随机、贪婪、Minimax、MCTS 四种对弈代理。
//! 棋盘采用棋子表 + 句柄网格，搜索时克隆棋盘只是数组拷贝。

pub mod ai;
pub mod board;
pub mod error;
pub mod eval;
pub mod fen;
pub mod game;
pub mod movegen;
pub mod test_positions;
pub mod types;

pub use ai::{
    build_agent, get_node_count, reset_node_count, strategies_help, Agent, AgentConfig,
    GreedyAgent, MctsAgent, MctsConfig, MinimaxAgent, RandomAgent, AVAILABLE_STRATEGIES,
    DEFAULT_STRATEGY,
};
pub use board::{Board, BoardView, PieceView};
pub use error::{Result, XiangqiError};
pub use eval::{capture_value, evaluate};
pub use fen::{parse_fen, to_fen};
pub use game::{play_match, ControllerState, GameController, MatchRecord};
pub use types::{Action, Color, Move, Piece, PieceId, PieceKind, Position};
