//! 中国象棋规则与搜索引擎
//!
//! 提供完整的象棋规则（走法验证、生成、将军/将死判定）、
//! 基于迭代加深 α-β 剪枝的搜索引擎，以及 FEN 局面编码。
//!
//! 棋盘坐标：row 0 为黑方底线（上方），row 9 为红方底线（下方）；
//! 着法文本 `<列><行><列><行>`，列 a-i 从左到右，行 1-10 从红方底线数起。
//!
//! ```no_run
//! use xiangqi_engine::{Board, Color, Difficulty, SearchEngine};
//!
//! let board = Board::new();
//! let mut engine = SearchEngine::with_difficulty(Difficulty::Medium);
//! let mv = engine.get_best_move(&board, Color::Red);
//! println!("best: {}", mv);
//! ```

pub mod board;
pub mod book;
pub mod eval;
pub mod fen;
pub mod search;
pub mod types;
pub mod zobrist;

pub use board::Board;
pub use book::{EndgameBook, OpeningBook};
pub use fen::INITIAL_FEN;
pub use search::{CancelToken, Difficulty, SearchEngine, SearchReport};
pub use types::{Color, GameResult, Move, Piece, PieceType, Position};
pub use zobrist::ZobristTable;
