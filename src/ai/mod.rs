//! AI 策略模块
//!
//! 提供随机、贪婪、Minimax（alpha-beta）和 MCTS 四种对弈代理。
//! 所有代理只读当前棋盘，需要前瞻时在克隆的棋盘上模拟。

mod greedy;
mod mcts;
mod minimax;
mod random;

pub use greedy::GreedyAgent;
pub use mcts::MctsAgent;
pub use minimax::MinimaxAgent;
pub use random::RandomAgent;

use crate::board::Board;
use crate::error::{Result, XiangqiError};
use crate::types::{Action, Color};
use rand::prelude::*;
use serde::{Deserialize, Serialize};
use std::path::Path;
use std::sync::atomic::{AtomicU64, Ordering as AtomicOrdering};

/// 全局节点计数器
pub static NODE_COUNT: AtomicU64 = AtomicU64::new(0);

/// 重置节点计数器
pub fn reset_node_count() {
    NODE_COUNT.store(0, AtomicOrdering::Relaxed);
}

/// 获取当前节点计数
pub fn get_node_count() -> u64 {
    NODE_COUNT.load(AtomicOrdering::Relaxed)
}

#[inline]
pub(crate) fn count_node() {
    NODE_COUNT.fetch_add(1, AtomicOrdering::Relaxed);
}

/// 可用的策略列表
pub const AVAILABLE_STRATEGIES: &[&str] = &["random", "greedy", "minimax", "mcts"];

/// 默认策略
pub const DEFAULT_STRATEGY: &str = "minimax";

/// MCTS 参数
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(default)]
pub struct MctsConfig {
    /// 扩展次数
    pub expansions: u32,
    /// 每次扩展后的随机模拟次数
    pub rollouts: u32,
    /// 单次模拟的最大步数
    pub rollout_depth: u32,
    /// UCB1 探索系数
    pub exploration: f64,
    /// 模拟走满步数仍未分胜负时的奖励
    pub cutoff_reward: f64,
}

impl Default for MctsConfig {
    fn default() -> Self {
        MctsConfig {
            expansions: 100,
            rollouts: 50,
            rollout_depth: 10,
            exploration: 2.0,
            cutoff_reward: 0.5,
        }
    }
}

/// AI 配置
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(default)]
pub struct AgentConfig {
    /// 搜索深度（贪婪的步数 / Minimax 的层数）
    pub depth: u32,
    /// 随机种子
    pub seed: Option<u64>,
    /// Minimax 是否剪枝
    pub alpha_beta: bool,
    pub mcts: MctsConfig,
}

impl Default for AgentConfig {
    fn default() -> Self {
        AgentConfig {
            depth: 2,
            seed: None,
            alpha_beta: true,
            mcts: MctsConfig::default(),
        }
    }
}

impl AgentConfig {
    /// 从 JSON 文件读取配置，缺省字段取默认值
    pub fn from_json_file(path: impl AsRef<Path>) -> Result<Self> {
        let text = std::fs::read_to_string(path)?;
        Ok(serde_json::from_str(&text)?)
    }
}

/// 对弈代理接口
pub trait Agent {
    /// 策略名
    fn name(&self) -> &'static str;

    /// 代理执哪一方
    fn color(&self) -> Color;

    /// 为自己一方选一步棋，无棋可走时返回 None
    ///
    /// 传入的棋盘不会被修改。
    fn choose_move(&mut self, board: &Board) -> Result<Option<Action>>;
}

/// 按名字创建代理
pub fn build_agent(name: &str, color: Color, config: &AgentConfig) -> Result<Box<dyn Agent>> {
    match name.to_lowercase().as_str() {
        "random" => Ok(Box::new(RandomAgent::new(color, config.seed))),
        "greedy" => Ok(Box::new(GreedyAgent::new(color, config))),
        "minimax" | "alphabeta" => Ok(Box::new(MinimaxAgent::new(color, config))),
        "mcts" | "montecarlo" => Ok(Box::new(MctsAgent::new(color, config))),
        _ => Err(XiangqiError::UnknownStrategy(name.to_string())),
    }
}

/// 策略说明（命令行帮助用）
pub fn strategies_help() -> String {
    format!(
        "Available strategies: {} (default: {})",
        AVAILABLE_STRATEGIES.join(", "),
        DEFAULT_STRATEGY
    )
}

pub(crate) fn seeded_rng(seed: Option<u64>) -> StdRng {
    match seed {
        Some(s) => StdRng::seed_from_u64(s),
        None => StdRng::from_entropy(),
    }
}

/// 在某方所有走法里均匀随机选一步
pub(crate) fn random_action(
    board: &Board,
    color: Color,
    rng: &mut StdRng,
) -> Result<Option<Action>> {
    let actions = board.actions_for(color)?;
    Ok(actions.choose(rng).copied())
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::test_positions;

    #[test]
    fn test_build_all_strategies() {
        let config = AgentConfig {
            seed: Some(1),
            ..Default::default()
        };
        for name in AVAILABLE_STRATEGIES {
            let agent = build_agent(name, Color::Black, &config).unwrap();
            assert_eq!(agent.name(), *name);
            assert_eq!(agent.color(), Color::Black);
        }
    }

    #[test]
    fn test_unknown_strategy() {
        let result = build_agent("stockfish", Color::Red, &AgentConfig::default());
        assert!(matches!(result, Err(XiangqiError::UnknownStrategy(name)) if name == "stockfish"));
    }

    #[test]
    fn test_config_defaults_fill_missing_fields() {
        let config: AgentConfig =
            serde_json::from_str(r#"{"depth": 3, "mcts": {"rollouts": 7}}"#).unwrap();
        assert_eq!(config.depth, 3);
        assert!(config.alpha_beta);
        assert_eq!(config.seed, None);
        assert_eq!(config.mcts.rollouts, 7);
        assert_eq!(config.mcts.expansions, 100);
        assert_eq!(config.mcts.cutoff_reward, 0.5);
    }

    #[test]
    fn test_config_from_missing_file() {
        let result = AgentConfig::from_json_file("/nonexistent/agent.json");
        assert!(matches!(result, Err(XiangqiError::Io(_))));
    }

    #[test]
    fn test_random_action_uses_own_pieces() {
        let board = Board::from_fen(test_positions::CANNON_SCREEN).unwrap();
        let mut rng = seeded_rng(Some(3));
        for _ in 0..20 {
            let action = random_action(&board, Color::Black, &mut rng)
                .unwrap()
                .unwrap();
            assert_eq!(board.piece(action.piece).color, Color::Black);
        }
    }
}
