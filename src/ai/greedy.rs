//! 贪婪 AI 策略
//!
//! 1 步：只看眼前能吃到的最大子力；吃不到子就随机走。
//! N 步：每个候选走法之后让对手按 N-1 步贪婪回一手，再用子力差打分。
//! 对手只回一手贪婪，不是完整的极小化搜索。

use super::{random_action, seeded_rng, Agent, AgentConfig};
use crate::board::Board;
use crate::error::Result;
use crate::eval::{capture_value, evaluate};
use crate::types::{Action, Color};
use log::{debug, info, warn};
use rand::prelude::*;

/// 贪婪 AI
pub struct GreedyAgent {
    color: Color,
    plies: u32,
    rng: StdRng,
}

impl GreedyAgent {
    pub fn new(color: Color, config: &AgentConfig) -> Self {
        GreedyAgent {
            color,
            plies: config.depth.max(1),
            rng: seeded_rng(config.seed),
        }
    }

    pub fn plies(&self) -> u32 {
        self.plies
    }
}

/// 吃子价值最大的走法，严格大于 0 才算数，同分取先生成的
fn best_capture(board: &Board, color: Color) -> Result<Option<(Action, f64)>> {
    let mut best: Option<(Action, f64)> = None;
    let mut best_score = 0.0;

    for action in board.actions_for(color)? {
        let score = capture_value(board, &action);
        if score > best_score {
            best_score = score;
            best = Some((action, score));
        }
    }

    Ok(best)
}

/// 前瞻 plies 步的贪婪选择，找不到正分走法时随机
fn greedy_pick(
    board: &Board,
    color: Color,
    plies: u32,
    rng: &mut StdRng,
) -> Result<Option<(Action, f64)>> {
    let best = if plies <= 1 {
        best_capture(board, color)?
    } else {
        let mut best: Option<(Action, f64)> = None;
        let mut best_score = 0.0;

        for action in board.actions_for(color)? {
            let mut sim = board.clone();
            sim.apply(&action)?;
            if let Some((reply, _)) = greedy_pick(&sim, color.opposite(), plies - 1, rng)? {
                sim.apply(&reply)?;
            }

            let score = evaluate(&sim, color);
            if score > best_score {
                best_score = score;
                best = Some((action, score));
            }
        }
        best
    };

    match best {
        Some(found) => Ok(Some(found)),
        None => {
            debug!("greedy ({}, {} plies): nothing scores above 0", color, plies);
            Ok(random_action(board, color, rng)?.map(|action| (action, 0.0)))
        }
    }
}

impl Agent for GreedyAgent {
    fn name(&self) -> &'static str {
        "greedy"
    }

    fn color(&self) -> Color {
        self.color
    }

    fn choose_move(&mut self, board: &Board) -> Result<Option<Action>> {
        let picked = greedy_pick(board, self.color, self.plies, &mut self.rng)?;

        match &picked {
            Some((action, score)) if *score > 0.0 => info!(
                "greedy ({}, {} plies) chose {} score={:.1}",
                self.color,
                self.plies,
                board.describe(action),
                score
            ),
            Some((action, _)) => warn!(
                "greedy ({}) found no scoring move, playing random {}",
                self.color,
                board.describe(action)
            ),
            None => info!("greedy ({}) has no legal move", self.color),
        }

        Ok(picked.map(|(action, _)| action))
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::test_positions;
    use crate::types::Position;

    fn greedy(color: Color, plies: u32) -> GreedyAgent {
        GreedyAgent::new(
            color,
            &AgentConfig {
                depth: plies,
                seed: Some(42),
                ..Default::default()
            },
        )
    }

    #[test]
    fn test_opening_capture() {
        // 红炮隔黑炮打马
        let board = Board::new();
        let action = greedy(Color::Red, 1).choose_move(&board).unwrap().unwrap();

        assert_eq!(action.from, Position::new(8, 2));
        assert_eq!(action.to, Position::new(1, 2));
        assert_eq!(
            action.captured,
            board.piece_at(Position::new(1, 2))
        );
    }

    #[test]
    fn test_prefers_bigger_capture() {
        let board = Board::from_fen(test_positions::CHARIOT_HUNT).unwrap();
        let action = greedy(Color::Red, 1).choose_move(&board).unwrap().unwrap();

        assert_eq!(action.from, Position::new(5, 1));
        assert_eq!(action.to, Position::new(5, 5));
    }

    #[test]
    fn test_falls_back_to_random_without_captures() {
        let board = Board::from_fen(test_positions::BARE_GENERALS).unwrap();
        let legal = board.actions_for(Color::Red).unwrap();

        let action = greedy(Color::Red, 1).choose_move(&board).unwrap().unwrap();
        assert!(legal.contains(&action));
        assert_eq!(action.captured, None);
    }

    #[test]
    fn test_one_ply_takes_poisoned_soldier() {
        let board = Board::from_fen(test_positions::POISONED_SOLDIER).unwrap();
        let action = greedy(Color::Red, 1).choose_move(&board).unwrap().unwrap();

        assert_eq!(action.from, Position::new(5, 1));
        assert_eq!(action.to, Position::new(5, 5));
    }

    #[test]
    fn test_two_ply_declines_poisoned_soldier() {
        // 吃卒后黑车沿中路吃回，两步贪婪看得到
        let board = Board::from_fen(test_positions::POISONED_SOLDIER).unwrap();
        let action = greedy(Color::Red, 2).choose_move(&board).unwrap().unwrap();

        assert_eq!(action.from, Position::new(5, 1));
        assert_eq!(action.to, Position::new(5, 2));
        assert_eq!(action.captured, None);
    }

    #[test]
    fn test_search_does_not_touch_board() {
        let board = Board::new();
        let before = crate::fen::to_fen(&board);
        greedy(Color::Red, 2).choose_move(&board).unwrap();
        assert_eq!(crate::fen::to_fen(&board), before);
    }

    #[test]
    fn test_no_moves_returns_none() {
        let board = Board::from_fen(test_positions::BLACK_STALEMATED).unwrap();
        assert_eq!(greedy(Color::Black, 2).choose_move(&board).unwrap(), None);
    }

    #[test]
    fn test_depth_zero_is_one_ply() {
        let agent = greedy(Color::Red, 0);
        assert_eq!(agent.plies(), 1);
    }
}
