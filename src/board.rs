//! 象棋规则引擎
//!
//! 棋盘状态、走法验证与生成、将军/将死判定的唯一事实来源。
//! 使用数组而非 HashMap 存储棋子，提高性能。

use crate::fen::{parse_fen, write_fen};
use crate::types::{Color, GameResult, Move, Piece, PieceType, Position};

/// 直线方向：上下左右
const ORTHOGONAL_DIRS: [(i8, i8); 4] = [(-1, 0), (1, 0), (0, -1), (0, 1)];

/// 斜线方向
const DIAGONAL_DIRS: [(i8, i8); 4] = [(-1, -1), (-1, 1), (1, -1), (1, 1)];

/// 象的田字方向及对应象眼偏移
const BISHOP_DIRS: [((i8, i8), (i8, i8)); 4] = [
    ((-2, -2), (-1, -1)),
    ((-2, 2), (-1, 1)),
    ((2, -2), (1, -1)),
    ((2, 2), (1, 1)),
];

/// 马的日字方向及对应马腿偏移
const KNIGHT_DIRS: [((i8, i8), (i8, i8)); 8] = [
    ((-2, -1), (-1, 0)),
    ((-2, 1), (-1, 0)),
    ((2, -1), (1, 0)),
    ((2, 1), (1, 0)),
    ((-1, -2), (0, -1)),
    ((-1, 2), (0, 1)),
    ((1, -2), (0, -1)),
    ((1, 2), (0, 1)),
];

/// 模拟棋盘
///
/// 值语义：`Clone` 复制整个棋盘。搜索引擎只在私有副本上走子，
/// 调用方的对局状态不会在搜索过程中被修改。
#[derive(Clone)]
pub struct Board {
    /// 90 个格子的棋子数组 (10行 x 9列)
    squares: [Option<Piece>; 90],
    turn: Color,
    /// 走法历史（撤销栈），每条记录带有足够还原的信息
    history: Vec<Move>,
}

impl Board {
    /// 标准开局局面，红方先行
    pub fn new() -> Board {
        let mut board = Board::empty();

        // 黑方（上方）
        board.place(0, 0, Color::Black, PieceType::Rook);
        board.place(0, 8, Color::Black, PieceType::Rook);
        board.place(0, 1, Color::Black, PieceType::Knight);
        board.place(0, 7, Color::Black, PieceType::Knight);
        board.place(0, 2, Color::Black, PieceType::Bishop);
        board.place(0, 6, Color::Black, PieceType::Bishop);
        board.place(0, 3, Color::Black, PieceType::Advisor);
        board.place(0, 5, Color::Black, PieceType::Advisor);
        board.place(0, 4, Color::Black, PieceType::King);
        board.place(2, 1, Color::Black, PieceType::Cannon);
        board.place(2, 7, Color::Black, PieceType::Cannon);
        for col in [0, 2, 4, 6, 8] {
            board.place(3, col, Color::Black, PieceType::Pawn);
        }

        // 红方（下方）
        board.place(9, 0, Color::Red, PieceType::Rook);
        board.place(9, 8, Color::Red, PieceType::Rook);
        board.place(9, 1, Color::Red, PieceType::Knight);
        board.place(9, 7, Color::Red, PieceType::Knight);
        board.place(9, 2, Color::Red, PieceType::Bishop);
        board.place(9, 6, Color::Red, PieceType::Bishop);
        board.place(9, 3, Color::Red, PieceType::Advisor);
        board.place(9, 5, Color::Red, PieceType::Advisor);
        board.place(9, 4, Color::Red, PieceType::King);
        board.place(7, 1, Color::Red, PieceType::Cannon);
        board.place(7, 7, Color::Red, PieceType::Cannon);
        for col in [0, 2, 4, 6, 8] {
            board.place(6, col, Color::Red, PieceType::Pawn);
        }

        board
    }

    /// 空棋盘，红方先行
    pub fn empty() -> Board {
        Board {
            squares: [None; 90],
            turn: Color::Red,
            history: Vec::new(),
        }
    }

    /// 重置为标准开局，清空走法历史
    pub fn reset(&mut self) {
        *self = Board::new();
    }

    /// 从 FEN 字符串创建棋盘
    ///
    /// 解析失败时不产生任何棋盘，调用方原有状态不受影响。
    pub fn from_fen(fen: &str) -> Result<Board, String> {
        let state = parse_fen(fen)?;
        Ok(Board {
            squares: state.squares,
            turn: state.turn,
            history: Vec::new(),
        })
    }

    /// 生成 FEN 字符串
    pub fn to_fen(&self) -> String {
        write_fen(&self.squares, self.turn)
    }

    fn place(&mut self, row: i8, col: i8, color: Color, kind: PieceType) {
        self.squares[Position::new(row, col).to_index()] = Some(Piece::new(color, kind));
    }

    /// 获取当前回合
    #[inline]
    pub fn turn(&self) -> Color {
        self.turn
    }

    /// 设置当前回合
    #[inline]
    pub fn set_turn(&mut self, color: Color) {
        self.turn = color;
    }

    /// 获取某位置的棋子，越界返回 None
    #[inline]
    pub fn get_piece(&self, row: i8, col: i8) -> Option<Piece> {
        self.piece_at(Position::new(row, col))
    }

    /// 设置某位置的棋子，越界写入被忽略
    pub fn set_piece(&mut self, row: i8, col: i8, piece: Option<Piece>) {
        let pos = Position::new(row, col);
        if pos.is_valid() {
            self.squares[pos.to_index()] = piece;
        }
    }

    #[inline]
    pub fn piece_at(&self, pos: Position) -> Option<Piece> {
        if !pos.is_valid() {
            return None;
        }
        self.squares[pos.to_index()]
    }

    #[inline]
    fn has_piece(&self, pos: Position) -> bool {
        pos.is_valid() && self.squares[pos.to_index()].is_some()
    }

    /// 棋盘上的棋子总数
    pub fn piece_count(&self) -> usize {
        self.squares.iter().flatten().count()
    }

    /// 走法历史
    pub fn move_history(&self) -> &[Move] {
        &self.history
    }

    /// 找到某方将/帅的位置
    pub fn find_king(&self, color: Color) -> Option<Position> {
        let king = Piece::new(color, PieceType::King);
        for row in 0..10i8 {
            for col in 0..9i8 {
                let pos = Position::new(row, col);
                if self.squares[pos.to_index()] == Some(king) {
                    return Some(pos);
                }
            }
        }
        None
    }

    // ------------------------------------------------------------------
    // 走法验证
    // ------------------------------------------------------------------

    /// 完整走法验证：轮次、几何规则、走后不被将军
    pub fn is_valid_move(&self, mv: &Move) -> bool {
        let piece = match self.piece_at(mv.from) {
            Some(p) => p,
            None => return false,
        };
        if piece.color != self.turn {
            return false;
        }
        if !self.is_valid_move_ignoring_check(mv) {
            return false;
        }
        !self.leaves_king_in_check(mv, piece.color)
    }

    /// 几何规则验证（不含走后被将军的检查）
    ///
    /// 将军检测依赖此方法判断敌子能否攻到将的位置，
    /// 因此这里绝不能反过来调用将军检测。
    pub fn is_valid_move_ignoring_check(&self, mv: &Move) -> bool {
        if !mv.is_valid() || !mv.from.is_valid() || !mv.to.is_valid() || mv.from == mv.to {
            return false;
        }

        let piece = match self.piece_at(mv.from) {
            Some(p) => p,
            None => return false,
        };
        if let Some(target) = self.piece_at(mv.to) {
            if target.color == piece.color {
                return false;
            }
        }

        match piece.kind {
            PieceType::King => self.is_valid_king_move(mv, piece.color),
            PieceType::Advisor => self.is_valid_advisor_move(mv, piece.color),
            PieceType::Bishop => self.is_valid_bishop_move(mv, piece.color),
            PieceType::Knight => self.is_valid_knight_move(mv),
            PieceType::Rook => self.is_valid_rook_move(mv),
            PieceType::Cannon => self.is_valid_cannon_move(mv),
            PieceType::Pawn => self.is_valid_pawn_move(mv, piece.color),
        }
    }

    fn is_valid_king_move(&self, mv: &Move, color: Color) -> bool {
        let row_diff = (mv.to.row - mv.from.row).abs();
        let col_diff = (mv.to.col - mv.from.col).abs();

        // 将/帅走一格，限九宫格内
        if (row_diff == 1 && col_diff == 0) || (row_diff == 0 && col_diff == 1) {
            return mv.to.is_in_palace(color);
        }

        // 飞将：同列直取对方将，中间无子
        if mv.from.col == mv.to.col {
            if let Some(target) = self.piece_at(mv.to) {
                if target.kind == PieceType::King && target.color != color {
                    return self.count_pieces_between(mv.from, mv.to) == 0;
                }
            }
        }

        false
    }

    fn is_valid_advisor_move(&self, mv: &Move, color: Color) -> bool {
        let row_diff = (mv.to.row - mv.from.row).abs();
        let col_diff = (mv.to.col - mv.from.col).abs();
        row_diff == 1 && col_diff == 1 && mv.to.is_in_palace(color)
    }

    fn is_valid_bishop_move(&self, mv: &Move, color: Color) -> bool {
        let row_diff = mv.to.row - mv.from.row;
        let col_diff = mv.to.col - mv.from.col;
        if row_diff.abs() != 2 || col_diff.abs() != 2 {
            return false;
        }

        // 象眼被堵不能走
        let eye = mv.from.offset(row_diff / 2, col_diff / 2);
        if self.has_piece(eye) {
            return false;
        }

        // 象不能过河
        mv.to.is_on_own_side(color)
    }

    fn is_valid_knight_move(&self, mv: &Move) -> bool {
        let row_diff = mv.to.row - mv.from.row;
        let col_diff = mv.to.col - mv.from.col;

        let leg = if row_diff.abs() == 2 && col_diff.abs() == 1 {
            mv.from.offset(row_diff / 2, 0)
        } else if row_diff.abs() == 1 && col_diff.abs() == 2 {
            mv.from.offset(0, col_diff / 2)
        } else {
            return false;
        };

        // 蹩马腿
        !self.has_piece(leg)
    }

    fn is_valid_rook_move(&self, mv: &Move) -> bool {
        if mv.from.row != mv.to.row && mv.from.col != mv.to.col {
            return false;
        }
        self.is_path_clear(mv.from, mv.to)
    }

    fn is_valid_cannon_move(&self, mv: &Move) -> bool {
        if mv.from.row != mv.to.row && mv.from.col != mv.to.col {
            return false;
        }

        let between = self.count_pieces_between(mv.from, mv.to);
        if self.has_piece(mv.to) {
            // 吃子需要恰好一个炮架
            between == 1
        } else {
            between == 0
        }
    }

    fn is_valid_pawn_move(&self, mv: &Move, color: Color) -> bool {
        let row_diff = mv.to.row - mv.from.row;
        let col_diff = (mv.to.col - mv.from.col).abs();
        let forward = if color == Color::Red { -1 } else { 1 };

        // 向前一格总是允许
        if row_diff == forward && col_diff == 0 {
            return true;
        }

        // 过河后可以横走一格，永不后退
        let crossed = !mv.from.is_on_own_side(color);
        crossed && row_diff == 0 && col_diff == 1
    }

    // ------------------------------------------------------------------
    // 直线扫描辅助
    // ------------------------------------------------------------------

    /// 检查两点之间（不含端点）的直线路径是否畅通
    pub fn is_path_clear(&self, from: Position, to: Position) -> bool {
        self.count_pieces_between(from, to) == 0
    }

    /// 统计两点之间（不含端点）直线路径上的棋子数
    ///
    /// 只对同行或同列的两点有意义，其他输入返回 0。
    pub fn count_pieces_between(&self, from: Position, to: Position) -> i32 {
        if from == to || (from.row != to.row && from.col != to.col) {
            return 0;
        }

        let row_step = (to.row - from.row).signum();
        let col_step = (to.col - from.col).signum();

        let mut count = 0;
        let mut pos = from.offset(row_step, col_step);
        while pos != to {
            if self.has_piece(pos) {
                count += 1;
            }
            pos = pos.offset(row_step, col_step);
        }
        count
    }

    // ------------------------------------------------------------------
    // 走子与撤销
    // ------------------------------------------------------------------

    /// 执行走法，非法走法返回 false 且不改动棋盘
    pub fn make_move(&mut self, mv: &Move) -> bool {
        if !self.is_valid_move(mv) {
            return false;
        }

        let mut record = *mv;
        record.piece = self.piece_at(mv.from);
        record.captured = self.piece_at(mv.to);

        self.squares[mv.to.to_index()] = self.squares[mv.from.to_index()].take();
        self.turn = self.turn.opposite();
        self.history.push(record);
        true
    }

    /// 撤销最近一步走法，历史为空返回 false
    pub fn undo_move(&mut self) -> bool {
        let record = match self.history.pop() {
            Some(r) => r,
            None => return false,
        };

        self.squares[record.from.to_index()] = record.piece;
        self.squares[record.to.to_index()] = record.captured;
        self.turn = self.turn.opposite();
        true
    }

    /// 不经验证直接搬子，仅用于自将检查的探测副本
    fn apply_unchecked(&mut self, mv: &Move) {
        self.squares[mv.to.to_index()] = self.squares[mv.from.to_index()].take();
        self.turn = self.turn.opposite();
    }

    /// 走完这步后己方将是否暴露在攻击下
    fn leaves_king_in_check(&self, mv: &Move, color: Color) -> bool {
        // 栈上副本探测，不触碰真实棋盘和历史
        let mut probe = Board {
            squares: self.squares,
            turn: self.turn,
            history: Vec::new(),
        };
        probe.apply_unchecked(mv);
        probe.is_in_check(color)
    }

    /// 走完这步后是否将军对方
    pub fn gives_check(&self, mv: &Move) -> bool {
        let mover = match self.piece_at(mv.from) {
            Some(p) => p.color,
            None => return false,
        };
        let mut probe = Board {
            squares: self.squares,
            turn: self.turn,
            history: Vec::new(),
        };
        probe.apply_unchecked(mv);
        probe.is_in_check(mover.opposite())
    }

    // ------------------------------------------------------------------
    // 将军与终局
    // ------------------------------------------------------------------

    /// 检查某方是否被将军
    ///
    /// 只做几何规则验证（不过滤敌方的自将），避免与走法验证互相递归。
    /// 将不在棋盘上时视为未被将军。
    pub fn is_in_check(&self, color: Color) -> bool {
        let king_pos = match self.find_king(color) {
            Some(pos) => pos,
            None => return false,
        };

        for row in 0..10i8 {
            for col in 0..9i8 {
                let pos = Position::new(row, col);
                if let Some(piece) = self.piece_at(pos) {
                    if piece.color != color
                        && self.is_valid_move_ignoring_check(&Move::new(pos, king_pos))
                    {
                        return true;
                    }
                }
            }
        }
        false
    }

    /// 获取某方所有合法走法
    pub fn generate_legal_moves(&self, color: Color) -> Vec<Move> {
        let mut moves = Vec::with_capacity(50);

        for row in 0..10i8 {
            for col in 0..9i8 {
                let pos = Position::new(row, col);
                let piece = match self.piece_at(pos) {
                    Some(p) if p.color == color => p,
                    _ => continue,
                };

                match piece.kind {
                    PieceType::King => self.generate_king_moves(pos, &mut moves),
                    PieceType::Advisor => self.generate_step_moves(pos, &DIAGONAL_DIRS, &mut moves),
                    PieceType::Bishop => self.generate_bishop_moves(pos, &mut moves),
                    PieceType::Knight => self.generate_knight_moves(pos, &mut moves),
                    PieceType::Rook => self.generate_rook_moves(pos, piece.color, &mut moves),
                    PieceType::Cannon => self.generate_cannon_moves(pos, piece.color, &mut moves),
                    PieceType::Pawn => self.generate_pawn_moves(pos, piece.color, &mut moves),
                }
            }
        }

        // 过滤掉走后被将军的走法
        moves.retain(|mv| !self.leaves_king_in_check(mv, color));
        moves
    }

    /// 带棋子信息的候选走法
    fn candidate(&self, from: Position, to: Position) -> Move {
        Move {
            from,
            to,
            piece: self.piece_at(from),
            captured: self.piece_at(to),
        }
    }

    /// 按方向表生成单步候选并验证（士/将的普通步）
    fn generate_step_moves(&self, pos: Position, dirs: &[(i8, i8)], moves: &mut Vec<Move>) {
        for &(dr, dc) in dirs {
            let to = pos.offset(dr, dc);
            if !to.is_valid() {
                continue;
            }
            let mv = self.candidate(pos, to);
            if self.is_valid_move_ignoring_check(&mv) {
                moves.push(mv);
            }
        }
    }

    fn generate_king_moves(&self, pos: Position, moves: &mut Vec<Move>) {
        self.generate_step_moves(pos, &ORTHOGONAL_DIRS, moves);

        // 飞将候选
        if let Some(piece) = self.piece_at(pos) {
            if let Some(enemy_king) = self.find_king(piece.color.opposite()) {
                if enemy_king.col == pos.col {
                    let mv = self.candidate(pos, enemy_king);
                    if self.is_valid_move_ignoring_check(&mv) {
                        moves.push(mv);
                    }
                }
            }
        }
    }

    fn generate_bishop_moves(&self, pos: Position, moves: &mut Vec<Move>) {
        for ((dr, dc), _) in BISHOP_DIRS {
            let to = pos.offset(dr, dc);
            if !to.is_valid() {
                continue;
            }
            let mv = self.candidate(pos, to);
            if self.is_valid_move_ignoring_check(&mv) {
                moves.push(mv);
            }
        }
    }

    fn generate_knight_moves(&self, pos: Position, moves: &mut Vec<Move>) {
        for ((dr, dc), _) in KNIGHT_DIRS {
            let to = pos.offset(dr, dc);
            if !to.is_valid() {
                continue;
            }
            let mv = self.candidate(pos, to);
            if self.is_valid_move_ignoring_check(&mv) {
                moves.push(mv);
            }
        }
    }

    fn generate_rook_moves(&self, pos: Position, color: Color, moves: &mut Vec<Move>) {
        for (dr, dc) in ORTHOGONAL_DIRS {
            let mut to = pos.offset(dr, dc);
            while to.is_valid() {
                match self.piece_at(to) {
                    None => moves.push(self.candidate(pos, to)),
                    Some(target) => {
                        if target.color != color {
                            moves.push(self.candidate(pos, to));
                        }
                        break;
                    }
                }
                to = to.offset(dr, dc);
            }
        }
    }

    fn generate_cannon_moves(&self, pos: Position, color: Color, moves: &mut Vec<Move>) {
        for (dr, dc) in ORTHOGONAL_DIRS {
            let mut to = pos.offset(dr, dc);
            let mut found_screen = false;

            while to.is_valid() {
                match self.piece_at(to) {
                    None => {
                        if !found_screen {
                            moves.push(self.candidate(pos, to));
                        }
                    }
                    Some(target) => {
                        if !found_screen {
                            found_screen = true;
                        } else {
                            if target.color != color {
                                moves.push(self.candidate(pos, to));
                            }
                            break;
                        }
                    }
                }
                to = to.offset(dr, dc);
            }
        }
    }

    fn generate_pawn_moves(&self, pos: Position, color: Color, moves: &mut Vec<Move>) {
        let forward = if color == Color::Red { -1 } else { 1 };
        let mut targets = vec![pos.offset(forward, 0)];

        // 过河后可以左右走
        if !pos.is_on_own_side(color) {
            targets.push(pos.offset(0, -1));
            targets.push(pos.offset(0, 1));
        }

        for to in targets {
            if !to.is_valid() {
                continue;
            }
            let mv = self.candidate(pos, to);
            if self.is_valid_move_ignoring_check(&mv) {
                moves.push(mv);
            }
        }
    }

    /// 将死：被将军且无合法走法
    pub fn is_checkmate(&self, color: Color) -> bool {
        self.is_in_check(color) && self.generate_legal_moves(color).is_empty()
    }

    /// 困毙：未被将军但无合法走法
    pub fn is_stalemate(&self, color: Color) -> bool {
        !self.is_in_check(color) && self.generate_legal_moves(color).is_empty()
    }

    /// 判断游戏结果（以当前回合方视角）
    pub fn game_result(&self) -> GameResult {
        if !self.generate_legal_moves(self.turn).is_empty() {
            return GameResult::Ongoing;
        }
        if self.is_in_check(self.turn) {
            match self.turn {
                Color::Red => GameResult::BlackWin,
                Color::Black => GameResult::RedWin,
            }
        } else {
            GameResult::Draw
        }
    }
}

impl Default for Board {
    fn default() -> Self {
        Board::new()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::fen::INITIAL_FEN;

    fn count_pieces(board: &Board, color: Color) -> usize {
        let mut n = 0;
        for row in 0..10 {
            for col in 0..9 {
                if board.get_piece(row, col).map(|p| p.color) == Some(color) {
                    n += 1;
                }
            }
        }
        n
    }

    #[test]
    fn test_initial_board() {
        let board = Board::new();
        assert_eq!(count_pieces(&board, Color::Red), 16);
        assert_eq!(count_pieces(&board, Color::Black), 16);
        assert_eq!(board.turn(), Color::Red);
        assert_eq!(board.to_fen(), INITIAL_FEN);
    }

    #[test]
    fn test_out_of_bounds_access() {
        let mut board = Board::new();
        assert_eq!(board.get_piece(-1, 0), None);
        assert_eq!(board.get_piece(10, 4), None);
        assert_eq!(board.get_piece(0, 9), None);
        // 越界写入被忽略
        board.set_piece(12, 4, Some(Piece::new(Color::Red, PieceType::Rook)));
        assert_eq!(board.to_fen(), INITIAL_FEN);
    }

    #[test]
    fn test_legal_moves_initial() {
        let board = Board::new();
        // 标准开局红方有 44 个合法走法
        assert_eq!(board.generate_legal_moves(Color::Red).len(), 44);
        assert_eq!(board.generate_legal_moves(Color::Black).len(), 44);
    }

    #[test]
    fn test_legal_moves_never_leave_own_king_in_check() {
        let fens = [
            INITIAL_FEN,
            "3k5/9/4r4/9/9/4R3c/9/9/9/4K4 w",
            "4k3R/3R5/9/9/9/9/9/9/9/3K5 b",
        ];
        for fen in fens {
            let mut board = Board::from_fen(fen).unwrap();
            let side = board.turn();
            for mv in board.generate_legal_moves(side) {
                assert!(board.make_move(&mv), "move {} must apply", mv);
                assert!(!board.is_in_check(side), "move {} leaves king in check", mv);
                assert!(board.undo_move());
            }
        }
    }

    #[test]
    fn test_make_undo_roundtrip() {
        let mut board = Board::new();
        let fen_before = board.to_fen();

        for mv in board.generate_legal_moves(Color::Red) {
            assert!(board.make_move(&mv));
            assert_eq!(board.turn(), Color::Black);
            assert!(board.undo_move());
            assert_eq!(board.to_fen(), fen_before);
            assert_eq!(board.turn(), Color::Red);
        }
    }

    #[test]
    fn test_undo_restores_captured_piece() {
        // 红炮隔黑卒打黑马
        let mut board = Board::new();
        let mv = Move::parse("h3h10").unwrap();
        assert!(board.make_move(&mv));
        assert_eq!(
            board.get_piece(0, 7),
            Some(Piece::new(Color::Red, PieceType::Cannon))
        );
        assert!(board.undo_move());
        assert_eq!(
            board.get_piece(0, 7),
            Some(Piece::new(Color::Black, PieceType::Knight))
        );
        assert_eq!(board.to_fen(), INITIAL_FEN);
    }

    #[test]
    fn test_undo_empty_history() {
        let mut board = Board::new();
        assert!(!board.undo_move());
    }

    #[test]
    fn test_reset_clears_history() {
        let mut board = Board::new();
        assert!(board.make_move(&Move::parse("h3e3").unwrap()));
        assert_eq!(board.move_history().len(), 1);
        board.reset();
        assert!(board.move_history().is_empty());
        assert_eq!(board.to_fen(), INITIAL_FEN);
    }

    #[test]
    fn test_invalid_move_rejected_without_mutation() {
        let mut board = Board::new();
        // 黑方走法在红方回合被拒绝
        assert!(!board.make_move(&Move::parse("e10e9").unwrap()));
        // 车斜走被拒绝
        assert!(!board.make_move(&Move::parse("a1b2").unwrap()));
        assert_eq!(board.to_fen(), INITIAL_FEN);
        assert!(board.move_history().is_empty());
    }

    #[test]
    fn test_knight_leg_block() {
        let board = Board::new();
        // 马被象蹩腿：(9,1) 向 (8,3)，马腿 (9,2) 有相
        assert!(!board.is_valid_move(&Move::parse("b1d2").unwrap()));
        // 没蹩腿的方向可走
        assert!(board.is_valid_move(&Move::parse("b1c3").unwrap()));
        assert!(board.is_valid_move(&Move::parse("b1a3").unwrap()));
    }

    #[test]
    fn test_bishop_eye_block() {
        let mut board = Board::from_fen("4k4/9/9/9/9/9/9/3p5/9/2B1K4 w").unwrap();
        // 象眼 (8,3) 空，可走
        assert!(board.is_valid_move(&Move::parse("c1e3").unwrap()));
        // 堵上象眼后不可走
        board.set_piece(8, 3, Some(Piece::new(Color::Black, PieceType::Pawn)));
        assert!(!board.is_valid_move(&Move::parse("c1e3").unwrap()));
    }

    #[test]
    fn test_bishop_cannot_cross_river() {
        let board = Board::from_fen("4k4/9/9/9/9/2B6/9/9/9/4K4 w").unwrap();
        // 红相从 (5,2) 过河到 (3,0) 被拒绝
        assert!(!board.is_valid_move(&Move::parse("c5a7").unwrap()));
        // 回到己方半场可走
        assert!(board.is_valid_move(&Move::parse("c5a3").unwrap()));
    }

    #[test]
    fn test_cannon_screen_rule() {
        let board = Board::new();
        // 红炮 (7,7) 隔黑炮 (2,7) 打 (0,7) 黑马：恰好一个炮架，合法
        assert!(board.is_valid_move(&Move::parse("h3h10").unwrap()));
        // 吃 (2,7) 黑炮：中间无子，非法
        assert!(!board.is_valid_move(&Move::parse("h3h8").unwrap()));
        // 走到空位要求路径全空：(7,7) -> (1,7) 中间有黑炮，非法
        assert!(!board.is_valid_move(&Move::parse("h3h9").unwrap()));
        // 近处空位可走
        assert!(board.is_valid_move(&Move::parse("h3h5").unwrap()));
    }

    #[test]
    fn test_rook_path_block() {
        let board = Board::new();
        // 红车 (9,0) 被兵挡住，(6,0) 之后不可达
        assert!(board.is_valid_move(&Move::parse("a1a2").unwrap()));
        assert!(board.is_valid_move(&Move::parse("a1a3").unwrap()));
        assert!(!board.is_valid_move(&Move::parse("a1a5").unwrap()));
        // 横向被马挡住
        assert!(!board.is_valid_move(&Move::parse("a1c1").unwrap()));
    }

    #[test]
    fn test_king_confined_to_palace() {
        let board = Board::from_fen("5k3/9/9/9/9/9/9/9/9/3K5 w").unwrap();
        // (9,3) -> (9,2) 出九宫，非法
        assert!(!board.is_valid_move(&Move::parse("d1c1").unwrap()));
        assert!(board.is_valid_move(&Move::parse("d1e1").unwrap()));
        assert!(board.is_valid_move(&Move::parse("d1d2").unwrap()));
    }

    #[test]
    fn test_advisor_confined_to_palace() {
        let board = Board::new();
        // 士斜走进宫
        assert!(board.is_valid_move(&Move::parse("d1e2").unwrap()));
        // 士直走非法
        assert!(!board.is_valid_move(&Move::parse("d1d2").unwrap()));
        // 出宫非法 (9,3) -> (8,2)
        assert!(!board.is_valid_move(&Move::parse("d1c2").unwrap()));
    }

    #[test]
    fn test_pawn_rules() {
        // 未过河红兵 (6,4)：只能前进
        let board = Board::new();
        assert!(board.is_valid_move(&Move::parse("e4e5").unwrap()));
        assert!(!board.is_valid_move(&Move::parse("e4d4").unwrap()));
        assert!(!board.is_valid_move(&Move::parse("e4f4").unwrap()));
        assert!(!board.is_valid_move(&Move::parse("e4e3").unwrap()));

        // 过河红兵 (4,4)：可以前进或横走，不能后退
        let board = Board::from_fen("4k4/9/9/9/4P4/9/9/9/9/3K5 w").unwrap();
        assert!(board.is_valid_move(&Move::parse("e6e7").unwrap()));
        assert!(board.is_valid_move(&Move::parse("e6d6").unwrap()));
        assert!(board.is_valid_move(&Move::parse("e6f6").unwrap()));
        assert!(!board.is_valid_move(&Move::parse("e6e5").unwrap()));
    }

    #[test]
    fn test_check_detection() {
        // 红车将军黑将
        let board = Board::from_fen("4k4/4R4/9/9/9/9/9/9/9/4K4 b").unwrap();
        assert!(board.is_in_check(Color::Black));
        assert!(!board.is_in_check(Color::Red));
    }

    #[test]
    fn test_check_without_king_on_board() {
        // 将不在棋盘上时不视为被将军
        let board = Board::from_fen("9/9/9/9/9/9/9/9/9/4K4 w").unwrap();
        assert!(!board.is_in_check(Color::Black));
    }

    #[test]
    fn test_flying_general() {
        let board = Board::from_fen("4k4/9/9/9/9/9/9/9/9/4K4 w").unwrap();

        // 同列无遮挡，双方互为将军状态
        assert!(board.is_in_check(Color::Red));
        assert!(board.is_in_check(Color::Black));

        // 红帅可以直接飞将吃对方
        let moves = board.generate_legal_moves(Color::Red);
        assert!(moves
            .iter()
            .any(|m| m.from == Position::new(9, 4) && m.to == Position::new(0, 4)));

        // 横移一列即解除对脸，也是合法走法
        assert!(moves.iter().any(|m| m.to == Position::new(9, 3)));

        // 有遮挡时飞将非法
        let blocked = Board::from_fen("4k4/9/9/9/4p4/9/9/9/9/4K4 w").unwrap();
        assert!(!blocked.is_valid_move(&Move::parse("e1e10").unwrap()));
        assert!(!blocked.is_in_check(Color::Red));
    }

    #[test]
    fn test_pinned_piece_cannot_abandon_king() {
        // 红车在将前被黑车牵制，不能离线吃炮
        let board = Board::from_fen("3k5/9/4r4/9/9/4R3c/9/9/9/4K4 w").unwrap();
        let moves = board.generate_legal_moves(Color::Red);

        let pinned_capture = moves
            .iter()
            .any(|m| m.from == Position::new(5, 4) && m.to == Position::new(5, 8));
        assert!(!pinned_capture, "pinned rook must not leave the file");

        // 沿线走动与吃牵制子是允许的
        assert!(moves
            .iter()
            .any(|m| m.from == Position::new(5, 4) && m.to == Position::new(2, 4)));
    }

    #[test]
    fn test_checkmate_scenario() {
        // 黑方被双车将死
        let board = Board::from_fen("4k3R/3R5/9/9/9/9/9/9/9/3K5 b").unwrap();
        assert!(board.is_in_check(Color::Black));
        assert!(board.generate_legal_moves(Color::Black).is_empty());
        assert!(board.is_checkmate(Color::Black));
        assert!(!board.is_stalemate(Color::Black));
        assert_eq!(board.game_result(), GameResult::RedWin);
    }

    #[test]
    fn test_stalemate_scenario() {
        // 黑将未被将军但无路可走
        let board = Board::from_fen("4k4/9/2N6/9/9/9/9/9/3R5/5K3 b").unwrap();
        assert!(!board.is_in_check(Color::Black));
        assert!(board.generate_legal_moves(Color::Black).is_empty());
        assert!(board.is_stalemate(Color::Black));
        assert!(!board.is_checkmate(Color::Black));
        assert_eq!(board.game_result(), GameResult::Draw);
    }

    #[test]
    fn test_fen_roundtrip_through_board() {
        let mut board = Board::new();
        for s in ["h3e3", "h10g8", "h1g3", "i10h10"] {
            assert!(board.make_move(&Move::parse(s).unwrap()), "move {}", s);
        }
        let fen = board.to_fen();
        let restored = Board::from_fen(&fen).unwrap();
        assert_eq!(restored.to_fen(), fen);
        assert_eq!(restored.turn(), board.turn());
    }
}
