//! 开局库与残局库
//!
//! 开局库按 FEN 精确匹配，命中时从候选着法中随机挑选。
//! 残局库目前只有激活条件，尚无内置残局着法。

use std::collections::HashMap;

use crate::board::Board;
use crate::fen::INITIAL_FEN;
use crate::types::Move;

/// 残局库激活阈值：总棋子数低于该值时才查询
pub const ENDGAME_PIECE_THRESHOLD: usize = 8;

/// 开局库
#[derive(Default)]
pub struct OpeningBook {
    lines: HashMap<String, Vec<Move>>,
}

impl OpeningBook {
    /// 空开局库
    pub fn new() -> OpeningBook {
        OpeningBook {
            lines: HashMap::new(),
        }
    }

    /// 内置的标准开局着法
    ///
    /// 只覆盖初始局面的红方主流首着：
    /// 中炮、仙人指路、飞相、起马。
    pub fn standard() -> OpeningBook {
        let mut book = OpeningBook::new();

        let first_moves = ["h3e3", "b3e3", "c4c5", "g4g5", "c1e3", "g1e3", "h1g3", "b1c3"];
        let moves = first_moves
            .iter()
            .filter_map(|s| Move::parse(s))
            .collect::<Vec<_>>();
        book.insert(INITIAL_FEN, moves);

        book
    }

    /// 查询某局面的候选着法
    pub fn lookup(&self, fen: &str) -> Option<&[Move]> {
        self.lines.get(fen).map(|v| v.as_slice())
    }

    /// 录入一条开局变化
    pub fn insert(&mut self, fen: &str, moves: Vec<Move>) {
        self.lines.insert(fen.to_string(), moves);
    }

    pub fn len(&self) -> usize {
        self.lines.len()
    }

    pub fn is_empty(&self) -> bool {
        self.lines.is_empty()
    }
}

/// 残局库
///
/// 棋子较多时直接跳过，避免无意义的查询开销。
#[derive(Default)]
pub struct EndgameBook;

impl EndgameBook {
    pub fn new() -> EndgameBook {
        EndgameBook
    }

    /// 是否达到残局查询条件
    pub fn is_applicable(&self, board: &Board) -> bool {
        board.piece_count() < ENDGAME_PIECE_THRESHOLD
    }

    /// 查询残局着法
    ///
    /// TODO: 内置常见车兵/炮士残局定式后返回实际着法
    pub fn probe(&self, board: &Board) -> Option<Move> {
        if !self.is_applicable(board) {
            return None;
        }
        None
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::types::Move;

    #[test]
    fn test_standard_book_hits_initial_position() {
        let book = OpeningBook::standard();
        let moves = book.lookup(INITIAL_FEN).unwrap();
        assert!(!moves.is_empty());

        // 所有内置着法在初始局面都必须合法
        let board = Board::new();
        for mv in moves {
            assert!(board.is_valid_move(mv), "book move {} must be legal", mv);
        }
    }

    #[test]
    fn test_book_misses_other_positions() {
        let book = OpeningBook::standard();
        let mut board = Board::new();
        assert!(board.make_move(&Move::parse("h3e3").unwrap()));
        assert!(book.lookup(&board.to_fen()).is_none());
    }

    #[test]
    fn test_insert_and_lookup() {
        let mut book = OpeningBook::new();
        assert!(book.is_empty());

        let fen = "4k4/9/9/9/9/9/9/9/9/4K4 w";
        book.insert(fen, vec![Move::parse("e1d1").unwrap()]);
        assert_eq!(book.len(), 1);
        assert_eq!(book.lookup(fen).unwrap().len(), 1);
    }

    #[test]
    fn test_endgame_threshold() {
        let book = EndgameBook::new();

        // 开局 32 子，不查询
        assert!(!book.is_applicable(&Board::new()));
        assert!(book.probe(&Board::new()).is_none());

        // 少子残局满足条件，但目前没有定式
        let sparse = Board::from_fen("4k4/9/9/9/9/9/9/9/4R4/4K4 w").unwrap();
        assert!(book.is_applicable(&sparse));
        assert!(sparse.piece_count() < ENDGAME_PIECE_THRESHOLD);
        assert!(book.probe(&sparse).is_none());
    }
}
