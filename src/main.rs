//! Xiangqi AI CLI
//!
//! 命令行界面，用于调试走法生成和 AI

use clap::{Parser, Subcommand};
use serde::Serialize;
use std::path::PathBuf;
use std::time::Instant;
use xiangqi_bots::{
    build_agent, evaluate, get_node_count, play_match, reset_node_count, strategies_help,
    test_positions, AgentConfig, Board, Color, Position, Result, DEFAULT_STRATEGY,
};

#[derive(Parser)]
#[command(name = "xiangqi-bots")]
#[command(about = "Xiangqi engine with random, greedy, minimax and MCTS agents", long_about = None)]
struct Cli {
    #[command(subcommand)]
    command: Commands,
}

/// 代理参数（best 和 play 共用）
#[derive(clap::Args)]
struct AgentArgs {
    /// JSON 配置文件
    #[arg(long)]
    config: Option<PathBuf>,

    /// 搜索深度（覆盖配置文件）
    #[arg(long)]
    depth: Option<u32>,

    /// 随机种子（覆盖配置文件）
    #[arg(long)]
    seed: Option<u64>,
}

impl AgentArgs {
    fn load(&self) -> Result<AgentConfig> {
        let mut config = match &self.config {
            Some(path) => AgentConfig::from_json_file(path)?,
            None => AgentConfig::default(),
        };
        if let Some(depth) = self.depth {
            config.depth = depth;
        }
        if self.seed.is_some() {
            config.seed = self.seed;
        }
        Ok(config)
    }
}

#[derive(Subcommand)]
enum Commands {
    /// 列出合法走法
    Moves {
        /// FEN 字符串或局面名
        #[arg(long, default_value = test_positions::START)]
        fen: String,

        /// JSON 输出
        #[arg(long)]
        json: bool,
    },

    /// 让 AI 选一步
    Best {
        /// FEN 字符串或局面名
        #[arg(long, default_value = test_positions::START)]
        fen: String,

        /// AI 策略 (random, greedy, minimax, mcts)
        #[arg(long, default_value = DEFAULT_STRATEGY)]
        strategy: String,

        #[command(flatten)]
        agent: AgentArgs,

        /// JSON 输出
        #[arg(long)]
        json: bool,
    },

    /// 评估局面分数（轮到的一方视角）
    Score {
        /// FEN 字符串或局面名
        #[arg(long, default_value = test_positions::START)]
        fen: String,

        /// JSON 输出
        #[arg(long)]
        json: bool,
    },

    /// AI 对 AI
    Play {
        /// FEN 字符串或局面名
        #[arg(long, default_value = test_positions::START)]
        fen: String,

        /// 红方策略
        #[arg(long, default_value = "greedy")]
        red: String,

        /// 黑方策略
        #[arg(long, default_value = "random")]
        black: String,

        /// 最多走多少步
        #[arg(long, default_value = "200")]
        max_plies: u32,

        #[command(flatten)]
        agent: AgentArgs,

        /// JSON 输出
        #[arg(long)]
        json: bool,
    },
}

#[derive(Serialize)]
struct MoveInfo {
    piece: String,
    from: Position,
    to: Position,
    captured: Option<String>,
    text: String,
}

#[derive(Serialize)]
struct MovesResponse {
    turn: Color,
    moves: Vec<MoveInfo>,
    total: usize,
}

#[derive(Serialize)]
struct BestResponse {
    strategy: String,
    #[serde(rename = "move")]
    mv: Option<MoveInfo>,
    nodes: u64,
    elapsed_ms: f64,
}

#[derive(Serialize)]
struct ScoreResponse {
    fen: String,
    color: Color,
    score: f64,
}

/// 局面名或 FEN
fn load_board(fen: &str) -> Result<Board> {
    let fen = test_positions::by_name(fen).unwrap_or(fen);
    Board::from_fen(fen)
}

fn move_info(board: &Board, action: &xiangqi_bots::Action) -> MoveInfo {
    let piece = board.piece(action.piece);
    MoveInfo {
        piece: format!("{} {}", piece.color, piece.kind),
        from: action.from,
        to: action.to,
        captured: action
            .captured
            .map(|id| board.piece(id).kind.to_string()),
        text: board.describe(action),
    }
}

fn run(cli: Cli) -> Result<()> {
    match cli.command {
        Commands::Moves { fen, json } => {
            let board = load_board(&fen)?;
            let turn = board.turn();
            let moves: Vec<MoveInfo> = board
                .actions_for(turn)?
                .iter()
                .map(|action| move_info(&board, action))
                .collect();

            if json {
                let response = MovesResponse {
                    turn,
                    total: moves.len(),
                    moves,
                };
                println!("{}", serde_json::to_string_pretty(&response)?);
            } else {
                println!("{}\n", board);
                println!("Legal moves ({}):", moves.len());
                for mv in &moves {
                    println!("  {}", mv.text);
                }
            }
        }

        Commands::Best {
            fen,
            strategy,
            agent,
            json,
        } => {
            let board = load_board(&fen)?;
            let config = agent.load()?;
            let mut ai = build_agent(&strategy, board.turn(), &config)?;

            reset_node_count();
            let start = Instant::now();
            let choice = ai.choose_move(&board)?;
            let elapsed = start.elapsed().as_secs_f64();
            let nodes = get_node_count();

            let response = BestResponse {
                strategy: ai.name().to_string(),
                mv: choice.as_ref().map(|action| move_info(&board, action)),
                nodes,
                elapsed_ms: elapsed * 1000.0,
            };

            if json {
                println!("{}", serde_json::to_string_pretty(&response)?);
            } else {
                match &response.mv {
                    Some(mv) => println!("Best move (strategy={}): {}", response.strategy, mv.text),
                    None => println!("No legal move for {}", board.turn()),
                }
                println!("\nStats: nodes={}, time={:.3}s", nodes, elapsed);
            }
        }

        Commands::Score { fen, json } => {
            let board = load_board(&fen)?;
            let color = board.turn();
            let score = evaluate(&board, color);

            if json {
                let response = ScoreResponse {
                    fen: xiangqi_bots::to_fen(&board),
                    color,
                    score,
                };
                println!("{}", serde_json::to_string(&response)?);
            } else {
                let color_cn = if color == Color::Red { "红方" } else { "黑方" };
                println!("局面评估 ({} 视角): {:.2}", color_cn, score);
            }
        }

        Commands::Play {
            fen,
            red,
            black,
            max_plies,
            agent,
            json,
        } => {
            let board = load_board(&fen)?;
            let config = agent.load()?;
            let mut red_agent = build_agent(&red, Color::Red, &config)?;
            let mut black_agent = build_agent(&black, Color::Black, &config)?;

            let record = play_match(board, red_agent.as_mut(), black_agent.as_mut(), max_plies)?;

            if json {
                println!("{}", serde_json::to_string_pretty(&record)?);
            } else {
                for (i, mv) in record.moves.iter().enumerate() {
                    println!("{:>3}. {}", i + 1, mv);
                }
                println!("\n{}", load_board(&record.final_fen)?);
                match record.winner {
                    Some(winner) => println!("Winner: {} after {} plies", winner, record.plies),
                    None => println!("No result after {} plies", record.plies),
                }
            }
        }
    }

    Ok(())
}

fn main() {
    env_logger::init();

    let cli = Cli::parse();
    if let Err(e) = run(cli) {
        eprintln!("Error: {}", e);
        if matches!(e, xiangqi_bots::XiangqiError::UnknownStrategy(_)) {
            eprintln!("{}", strategies_help());
        }
        std::process::exit(1);
    }
}
