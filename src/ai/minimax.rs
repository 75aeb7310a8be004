//! Minimax AI 策略
//!
//! 固定深度的对抗搜索，默认带 Alpha-Beta 剪枝。
//! 叶子节点一律用根方视角的子力差评估。

use super::{count_node, get_node_count, reset_node_count, Agent, AgentConfig};
use crate::board::Board;
use crate::error::Result;
use crate::eval::evaluate;
use crate::types::{Action, Color};
use log::{debug, info};

/// Minimax AI
pub struct MinimaxAgent {
    color: Color,
    depth: u32,
    alpha_beta: bool,
}

impl MinimaxAgent {
    pub fn new(color: Color, config: &AgentConfig) -> Self {
        MinimaxAgent {
            color,
            depth: config.depth.max(1),
            alpha_beta: config.alpha_beta,
        }
    }

    pub fn depth(&self) -> u32 {
        self.depth
    }

    /// 递归搜索，maximizing 为 true 时轮到根方
    fn minimax(
        &self,
        board: &Board,
        depth: u32,
        maximizing: bool,
        mut alpha: f64,
        mut beta: f64,
    ) -> Result<f64> {
        count_node();

        let to_move = if maximizing {
            self.color
        } else {
            self.color.opposite()
        };

        if depth == 0 || board.pieces_of(to_move).is_empty() {
            return Ok(evaluate(board, self.color));
        }

        let actions = board.actions_for(to_move)?;

        if maximizing {
            // 无子可走时保持 -inf，等同判负
            let mut value = f64::NEG_INFINITY;
            for action in &actions {
                let mut sim = board.clone();
                sim.apply(action)?;
                let score = self.minimax(&sim, depth - 1, false, alpha, beta)?;
                value = value.max(score);
                if self.alpha_beta {
                    alpha = alpha.max(value);
                    if beta <= alpha {
                        break;
                    }
                }
            }
            Ok(value)
        } else {
            let mut value = f64::INFINITY;
            for action in &actions {
                let mut sim = board.clone();
                sim.apply(action)?;
                let score = self.minimax(&sim, depth - 1, true, alpha, beta)?;
                value = value.min(score);
                if self.alpha_beta {
                    beta = beta.min(value);
                    if beta <= alpha {
                        break;
                    }
                }
            }
            Ok(value)
        }
    }

    /// 根节点：对每个走法打分，返回最高分的走法
    ///
    /// 第一个走法总会被接受，之后严格更高才替换。
    pub fn search(&self, board: &Board) -> Result<Option<(Action, f64)>> {
        let mut best: Option<(Action, f64)> = None;
        let mut alpha = f64::NEG_INFINITY;

        for action in board.actions_for(self.color)? {
            let mut sim = board.clone();
            sim.apply(&action)?;
            let score = self.minimax(&sim, self.depth - 1, false, alpha, f64::INFINITY)?;
            debug!("minimax root {} -> {:.1}", board.describe(&action), score);

            match best {
                Some((_, best_score)) if score <= best_score => {}
                _ => {
                    best = Some((action, score));
                    if self.alpha_beta {
                        alpha = alpha.max(score);
                    }
                }
            }
        }

        Ok(best)
    }
}

impl Agent for MinimaxAgent {
    fn name(&self) -> &'static str {
        "minimax"
    }

    fn color(&self) -> Color {
        self.color
    }

    fn choose_move(&mut self, board: &Board) -> Result<Option<Action>> {
        reset_node_count();
        let result = self.search(board)?;

        match &result {
            Some((action, score)) => info!(
                "minimax ({}, depth {}) chose {} score={:.1} nodes={}",
                self.color,
                self.depth,
                board.describe(action),
                score,
                get_node_count()
            ),
            None => info!("minimax ({}) has no legal move", self.color),
        }

        Ok(result.map(|(action, _)| action))
    }
}
