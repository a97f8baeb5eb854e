//! 命令行入口
//!
//! 子命令：
//! - `moves` 列出合法着法
//! - `best`  搜索最佳着法
//! - `eval`  静态评估
//! - `apply` 验证并执行一步棋

use clap::{Parser, Subcommand};
use serde::Serialize;

use xiangqi_engine::{eval, Board, Difficulty, Move, SearchEngine};

#[derive(Parser)]
#[command(name = "xiangqi-engine", version, about = "中国象棋规则与搜索引擎")]
struct Cli {
    #[command(subcommand)]
    command: Command,
}

#[derive(Subcommand)]
enum Command {
    /// 列出当前行棋方的所有合法着法
    Moves {
        /// FEN 局面
        #[arg(long)]
        fen: String,
    },
    /// 搜索最佳着法
    Best {
        /// FEN 局面
        #[arg(long)]
        fen: String,
        /// 难度预设：easy / medium / hard / expert
        #[arg(long, default_value = "medium")]
        difficulty: String,
        /// 覆盖预设的最大搜索深度
        #[arg(long)]
        depth: Option<i32>,
        /// 覆盖预设的时间限制（秒）
        #[arg(long)]
        time_limit: Option<f64>,
        /// 固定随机数种子，结果可复现
        #[arg(long)]
        seed: Option<u64>,
        /// 以 JSON 输出
        #[arg(long)]
        json: bool,
    },
    /// 静态评估当前局面（行棋方视角）
    Eval {
        /// FEN 局面
        #[arg(long)]
        fen: String,
        /// 以 JSON 输出
        #[arg(long)]
        json: bool,
    },
    /// 验证并执行一步棋，输出新局面的 FEN
    Apply {
        /// FEN 局面
        #[arg(long)]
        fen: String,
        /// 着法文本，如 h3e3
        #[arg(long)]
        mv: String,
    },
}

#[derive(Serialize)]
struct BestResponse {
    best_move: String,
    nodes: u64,
    time: f64,
}

#[derive(Serialize)]
struct EvalResponse {
    turn: char,
    score: i32,
}

fn main() {
    env_logger::init();

    let cli = Cli::parse();
    if let Err(err) = run(cli.command) {
        eprintln!("Error: {}", err);
        std::process::exit(1);
    }
}

fn run(command: Command) -> Result<(), String> {
    match command {
        Command::Moves { fen } => {
            let board = Board::from_fen(&fen)?;
            for mv in board.generate_legal_moves(board.turn()) {
                println!("{}", mv);
            }
            Ok(())
        }
        Command::Best {
            fen,
            difficulty,
            depth,
            time_limit,
            seed,
            json,
        } => {
            let board = Board::from_fen(&fen)?;
            let difficulty: Difficulty = difficulty.parse()?;

            let mut engine = SearchEngine::with_difficulty(difficulty);
            if let Some(depth) = depth {
                engine.set_max_depth(depth);
            }
            if let Some(seconds) = time_limit {
                engine.set_time_limit(seconds);
            }
            if let Some(seed) = seed {
                engine.set_seed(seed);
            }

            let best = engine.get_best_move(&board, board.turn());
            if json {
                let response = BestResponse {
                    best_move: best.to_coord_str(),
                    nodes: engine.nodes_searched(),
                    time: engine.last_thinking_time(),
                };
                let text = serde_json::to_string(&response).map_err(|e| e.to_string())?;
                println!("{}", text);
            } else {
                println!("best: {}", best);
                println!("{}", engine.get_search_info());
            }
            Ok(())
        }
        Command::Eval { fen, json } => {
            let board = Board::from_fen(&fen)?;
            let score = eval::evaluate_for(&board, board.turn());
            if json {
                let response = EvalResponse {
                    turn: board.turn().to_turn_char(),
                    score,
                };
                let text = serde_json::to_string(&response).map_err(|e| e.to_string())?;
                println!("{}", text);
            } else {
                println!("{}", score);
            }
            Ok(())
        }
        Command::Apply { fen, mv } => {
            let mut board = Board::from_fen(&fen)?;
            let parsed = Move::parse(&mv).ok_or_else(|| format!("Invalid move text: {}", mv))?;
            if !board.make_move(&parsed) {
                return Err(format!("Illegal move: {}", mv));
            }
            println!("{}", board.to_fen());
            Ok(())
        }
    }
}
