//! 随机 AI 策略

use super::{random_action, seeded_rng, Agent};
use crate::board::Board;
use crate::error::Result;
use crate::types::{Action, Color};
use log::info;
use rand::prelude::*;

/// 随机 AI - 在所有合法走法里均匀随机选择
pub struct RandomAgent {
    color: Color,
    rng: StdRng,
}

impl RandomAgent {
    pub fn new(color: Color, seed: Option<u64>) -> Self {
        RandomAgent {
            color,
            rng: seeded_rng(seed),
        }
    }
}

impl Agent for RandomAgent {
    fn name(&self) -> &'static str {
        "random"
    }

    fn color(&self) -> Color {
        self.color
    }

    fn choose_move(&mut self, board: &Board) -> Result<Option<Action>> {
        let action = random_action(board, self.color, &mut self.rng)?;
        if let Some(action) = &action {
            info!("random ({}) chose {}", self.color, board.describe(action));
        }
        Ok(action)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::test_positions;

    #[test]
    fn test_random_move_is_legal() {
        let board = Board::new();
        let mut agent = RandomAgent::new(Color::Red, Some(42));
        let legal = board.actions_for(Color::Red).unwrap();

        for _ in 0..10 {
            let action = agent.choose_move(&board).unwrap().unwrap();
            assert!(legal.contains(&action));
        }
    }

    #[test]
    fn test_same_seed_same_choice() {
        let board = Board::new();
        let mut a = RandomAgent::new(Color::Black, Some(9));
        let mut b = RandomAgent::new(Color::Black, Some(9));
        assert_eq!(
            a.choose_move(&board).unwrap(),
            b.choose_move(&board).unwrap()
        );
    }

    #[test]
    fn test_no_moves_returns_none() {
        let board = Board::from_fen(test_positions::BLACK_STALEMATED).unwrap();
        let mut agent = RandomAgent::new(Color::Black, Some(1));
        assert_eq!(agent.choose_move(&board).unwrap(), None);
    }
}
