//! MCTS AI 策略
//!
//! 节点存放在一个 Vec 里，父子关系用下标表示。
//! 根节点预先展开所有走法；之后每轮：UCB1 选择 -> 随机扩展一个新走法 ->
//! 多次随机模拟 -> 回传。奖励按搜索方视角计算。

use super::{
    count_node, get_node_count, random_action, reset_node_count, seeded_rng, Agent, AgentConfig,
    MctsConfig,
};
use crate::board::Board;
use crate::error::Result;
use crate::types::{Action, Color};
use log::{debug, info};
use rand::prelude::*;
use std::collections::HashSet;

const EPSILON: f64 = 1e-10;
const LOG_EPSILON: f64 = 1e-6;

type NodeId = usize;

/// 搜索树节点
#[derive(Debug)]
struct Node {
    board: Board,
    parent: Option<NodeId>,
    /// 子节点，按展开顺序
    children: Vec<(Action, NodeId)>,
    /// 已经展开过的走法
    tried: HashSet<Action>,
    /// 累计奖励
    reward: f64,
    /// 本节点访问次数
    n: u32,
    /// 经过本节点的回传次数（UCB1 中的 N）
    ancestor_visits: u32,
}

impl Node {
    fn new(board: Board, parent: Option<NodeId>) -> Self {
        count_node();
        Node {
            board,
            parent,
            children: Vec::new(),
            tried: HashSet::new(),
            reward: 0.0,
            n: 0,
            ancestor_visits: 0,
        }
    }

    /// UCB1 分数
    fn ucb(&self, exploration: f64) -> f64 {
        let n = self.n as f64 + EPSILON;
        let big_n = self.ancestor_visits as f64 + std::f64::consts::E + LOG_EPSILON;
        self.reward / n + exploration * (big_n.ln() / n).sqrt()
    }
}

/// MCTS AI
pub struct MctsAgent {
    color: Color,
    config: MctsConfig,
    rng: StdRng,
}

impl MctsAgent {
    pub fn new(color: Color, config: &AgentConfig) -> Self {
        MctsAgent {
            color,
            config: config.mcts.clone(),
            rng: seeded_rng(config.seed),
        }
    }

    /// 胜负对应的奖励（搜索方视角）
    fn reward_for(&self, winner: Color) -> f64 {
        if winner == self.color {
            1.0
        } else {
            -1.0
        }
    }

    /// UCB1 严格高于 floor 的子节点中分数最高的一个，没有则返回 None
    fn best_child(&self, tree: &[Node], id: NodeId, floor: f64) -> Option<(Action, NodeId)> {
        let mut best = None;
        let mut best_score = floor;
        for &(action, child) in &tree[id].children {
            let score = tree[child].ucb(self.config.exploration);
            if score > best_score {
                best_score = score;
                best = Some((action, child));
            }
        }
        best
    }

    /// 选择：从根一路走 UCB1 最高的子节点，直到叶子
    fn select(&self, tree: &[Node]) -> NodeId {
        let mut current = 0;
        while let Some((_, child)) = self.best_child(tree, current, f64::NEG_INFINITY) {
            current = child;
        }
        current
    }

    /// 扩展：随机选一个没试过的走法生成子节点
    ///
    /// 已分胜负或走法已全部展开时返回 None。
    fn expand(&mut self, tree: &mut Vec<Node>, id: NodeId) -> Result<Option<NodeId>> {
        let node = &tree[id];
        if node.board.winner().is_some() {
            return Ok(None);
        }

        let untried: Vec<Action> = node
            .board
            .actions_for(node.board.turn())?
            .into_iter()
            .filter(|action| !node.tried.contains(action))
            .collect();
        let Some(&action) = untried.choose(&mut self.rng) else {
            return Ok(None);
        };

        let mut board = node.board.clone();
        board.apply(&action)?;

        let child = tree.len();
        tree.push(Node::new(board, Some(id)));
        tree[id].children.push((action, child));
        tree[id].tried.insert(action);
        Ok(Some(child))
    }

    /// 随机模拟到分出胜负或达到步数上限
    fn rollout(&mut self, board: &Board) -> Result<f64> {
        let mut sim = board.clone();

        for _ in 0..self.config.rollout_depth {
            if let Some(winner) = sim.winner() {
                return Ok(self.reward_for(winner));
            }
            let to_move = sim.turn();
            match random_action(&sim, to_move, &mut self.rng)? {
                Some(action) => {
                    sim.apply(&action)?;
                }
                // 无子可走判负
                None => return Ok(self.reward_for(to_move.opposite())),
            }
        }

        Ok(match sim.winner() {
            Some(winner) => self.reward_for(winner),
            None => self.config.cutoff_reward,
        })
    }

    /// 回传：本节点计访问和奖励，沿途（不含根）累加 N
    fn backpropagate(tree: &mut [Node], id: NodeId, reward: f64) {
        tree[id].n += 1;
        tree[id].reward += reward;

        let mut current = id;
        while let Some(parent) = tree[current].parent {
            tree[current].ancestor_visits += 1;
            current = parent;
        }
    }

    /// 建树并预先展开根节点
    fn build_root(&self, board: &Board) -> Result<Vec<Node>> {
        let mut root_board = board.clone();
        root_board.set_turn(self.color);

        let actions = root_board.actions_for(self.color)?;
        let mut tree = Vec::with_capacity(actions.len() + self.config.expansions as usize + 1);
        tree.push(Node::new(root_board, None));

        for action in actions {
            let mut child_board = tree[0].board.clone();
            child_board.apply(&action)?;
            let child = tree.len();
            tree.push(Node::new(child_board, Some(0)));
            tree[0].children.push((action, child));
            tree[0].tried.insert(action);
        }

        Ok(tree)
    }

    /// 完整搜索，返回根节点 UCB1 最高的走法
    ///
    /// 根节点所有子节点的 UCB1 都不大于 0 时不选走法。
    fn search(&mut self, board: &Board) -> Result<Option<Action>> {
        let mut tree = self.build_root(board)?;
        if tree[0].children.is_empty() {
            return Ok(None);
        }

        for _ in 0..self.config.expansions {
            let leaf = self.select(&tree);
            let target = self.expand(&mut tree, leaf)?.unwrap_or(leaf);

            let mut total = 0.0;
            for _ in 0..self.config.rollouts {
                total += self.rollout(&tree[target].board)?;
            }
            Self::backpropagate(&mut tree, target, total);
        }

        debug!(
            "mcts ({}) tree size={} root children={}",
            self.color,
            tree.len(),
            tree[0].children.len()
        );

        Ok(self.best_child(&tree, 0, 0.0).map(|(action, _)| action))
    }
}

impl Agent for MctsAgent {
    fn name(&self) -> &'static str {
        "mcts"
    }

    fn color(&self) -> Color {
        self.color
    }

    fn choose_move(&mut self, board: &Board) -> Result<Option<Action>> {
        reset_node_count();
        let action = self.search(board)?;

        match &action {
            Some(action) => info!(
                "mcts ({}) chose {} after {} expansions, nodes={}",
                self.color,
                board.describe(action),
                self.config.expansions,
                get_node_count()
            ),
            None => info!("mcts ({}) has no legal move", self.color),
        }

        Ok(action)
    }
}
