//! Zobrist 哈希
//!
//! 每个引擎实例持有自己的哈希表，避免全局状态；
//! 相同种子生成的表完全一致，哈希可复现。

use rand::rngs::StdRng;
use rand::{Rng, SeedableRng};

use crate::board::Board;
use crate::types::{Color, Position};

/// 默认种子，保证跨进程哈希一致
pub const DEFAULT_ZOBRIST_SEED: u64 = 0xDEAD_BEEF;

/// Zobrist 随机键表
///
/// 棋子维度取 15：下标 0 留空（无子），1..=14 对应 `Piece::index()`。
pub struct ZobristTable {
    pieces: [[[u64; 15]; 9]; 10],
    side: u64,
}

impl ZobristTable {
    /// 用默认种子构建
    pub fn new() -> ZobristTable {
        ZobristTable::with_seed(DEFAULT_ZOBRIST_SEED)
    }

    /// 用指定种子构建
    pub fn with_seed(seed: u64) -> ZobristTable {
        let mut rng = StdRng::seed_from_u64(seed);
        let mut pieces = [[[0u64; 15]; 9]; 10];

        for row in pieces.iter_mut() {
            for col in row.iter_mut() {
                for key in col.iter_mut().skip(1) {
                    *key = rng.gen();
                }
            }
        }

        ZobristTable {
            pieces,
            side: rng.gen(),
        }
    }

    /// 计算整个棋盘的哈希值
    pub fn hash(&self, board: &Board) -> u64 {
        let mut h = 0u64;

        for row in 0..10i8 {
            for col in 0..9i8 {
                if let Some(piece) = board.piece_at(Position::new(row, col)) {
                    h ^= self.pieces[row as usize][col as usize][piece.index()];
                }
            }
        }

        if board.turn() == Color::Black {
            h ^= self.side;
        }
        h
    }
}

impl Default for ZobristTable {
    fn default() -> Self {
        ZobristTable::new()
    }
}
