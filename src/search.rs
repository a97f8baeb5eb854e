//! 搜索引擎
//!
//! 迭代加深 + α-β 剪枝 + 静态搜索 + 置换表。
//! 评估统一红方视角：红方节点取最大值，黑方节点取最小值。
//!
//! 搜索只在棋盘的私有副本上进行，调用方的对局状态不受影响。

use std::sync::atomic::{AtomicBool, Ordering};
use std::sync::Arc;
use std::time::{Duration, Instant};

use log::debug;
use rand::rngs::StdRng;
use rand::{Rng, SeedableRng};

use crate::board::Board;
use crate::book::{EndgameBook, OpeningBook};
use crate::eval;
use crate::types::{Color, Move};
use crate::zobrist::ZobristTable;

/// 置换表槽数，必须是 2 的幂
const TT_SIZE: usize = 1 << 20;

/// 绝杀分值基准
const MATE_SCORE: i32 = 10_000;

/// 搜索窗口边界
const INFINITY: i32 = 1_000_000;

/// 静态搜索最大延伸深度
const QUIESCENCE_MAX_DEPTH: i32 = 4;

/// 走法排序：置换表着法优先级
const HASH_MOVE_BONUS: i32 = 100_000;

/// 走法排序：将军着法加分
const CHECK_MOVE_BONUS: i32 = 50;

/// 难度预设
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Difficulty {
    Easy,
    Medium,
    Hard,
    Expert,
}

impl Difficulty {
    /// 最大搜索深度
    pub fn depth(self) -> i32 {
        match self {
            Difficulty::Easy => 2,
            Difficulty::Medium => 4,
            Difficulty::Hard => 6,
            Difficulty::Expert => 8,
        }
    }

    /// 时间限制（秒）
    pub fn time_limit(self) -> f64 {
        match self {
            Difficulty::Easy => 1.0,
            Difficulty::Medium => 3.0,
            Difficulty::Hard => 5.0,
            Difficulty::Expert => 10.0,
        }
    }

    /// 随机性系数，0.0 = 总是最佳着法
    pub fn randomness(self) -> f64 {
        match self {
            Difficulty::Easy => 0.3,
            Difficulty::Medium => 0.1,
            Difficulty::Hard => 0.05,
            Difficulty::Expert => 0.0,
        }
    }
}

impl std::str::FromStr for Difficulty {
    type Err = String;

    fn from_str(s: &str) -> Result<Difficulty, String> {
        match s.to_ascii_lowercase().as_str() {
            "easy" => Ok(Difficulty::Easy),
            "medium" => Ok(Difficulty::Medium),
            "hard" => Ok(Difficulty::Hard),
            "expert" => Ok(Difficulty::Expert),
            _ => Err(format!(
                "Unknown difficulty: {} (expected easy/medium/hard/expert)",
                s
            )),
        }
    }
}

/// 取消令牌
///
/// 可克隆后交给其他线程，搜索循环在每个节点轮询。
#[derive(Clone, Default)]
pub struct CancelToken(Arc<AtomicBool>);

impl CancelToken {
    pub fn new() -> CancelToken {
        CancelToken(Arc::new(AtomicBool::new(false)))
    }

    pub fn cancel(&self) {
        self.0.store(true, Ordering::Relaxed);
    }

    pub fn is_cancelled(&self) -> bool {
        self.0.load(Ordering::Relaxed)
    }

    pub fn reset(&self) {
        self.0.store(false, Ordering::Relaxed);
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
enum TTFlag {
    Exact,
    LowerBound,
    UpperBound,
}

#[derive(Debug, Clone, Copy)]
struct TTEntry {
    hash: u64,
    score: i32,
    depth: i32,
    flag: TTFlag,
    best_move: Move,
}

/// 固定容量置换表
///
/// `hash & mask` 直接定位，同槽冲突时保留更深的记录。
struct TranspositionTable {
    entries: Vec<Option<TTEntry>>,
    mask: usize,
}

impl TranspositionTable {
    fn new(capacity: usize) -> TranspositionTable {
        let capacity = capacity.next_power_of_two().max(2);
        TranspositionTable {
            entries: vec![None; capacity],
            mask: capacity - 1,
        }
    }

    fn probe(&self, hash: u64) -> Option<TTEntry> {
        let entry = self.entries[(hash as usize) & self.mask]?;
        if entry.hash == hash {
            Some(entry)
        } else {
            None
        }
    }

    fn store(&mut self, entry: TTEntry) {
        let idx = (entry.hash as usize) & self.mask;
        match self.entries[idx] {
            None => self.entries[idx] = Some(entry),
            Some(existing) => {
                if existing.hash == entry.hash || entry.depth >= existing.depth {
                    self.entries[idx] = Some(entry);
                }
            }
        }
    }

    fn clear(&mut self) {
        self.entries.iter_mut().for_each(|e| *e = None);
    }
}

/// 一次完整搜索的结果报告
#[derive(Debug, Clone)]
pub struct SearchReport {
    /// 行棋方视角的分值
    pub score: i32,
    pub best_move: Move,
    /// 实际完成的迭代深度
    pub depth: i32,
    pub nodes_searched: u64,
    /// 耗时（秒）
    pub time_used: f64,
}

/// 搜索引擎
///
/// 每个实例拥有独立的哈希表、置换表和随机数流；
/// 两个引擎可以互不干扰地同时搜索。
pub struct SearchEngine {
    max_depth: i32,
    time_limit: Duration,
    randomness: f64,
    zobrist: ZobristTable,
    tt: TranspositionTable,
    opening_book: OpeningBook,
    endgame_book: EndgameBook,
    rng: StdRng,
    token: CancelToken,
    nodes: u64,
    last_time: f64,
    search_start: Instant,
    deadline: Instant,
    thinking: bool,
    result: Option<Move>,
}

impl SearchEngine {
    /// 默认中等难度
    pub fn new() -> SearchEngine {
        SearchEngine::with_difficulty(Difficulty::Medium)
    }

    pub fn with_difficulty(difficulty: Difficulty) -> SearchEngine {
        let time_limit = Duration::from_secs_f64(difficulty.time_limit());
        let now = Instant::now();
        SearchEngine {
            max_depth: difficulty.depth(),
            time_limit,
            randomness: difficulty.randomness(),
            zobrist: ZobristTable::new(),
            tt: TranspositionTable::new(TT_SIZE),
            opening_book: OpeningBook::standard(),
            endgame_book: EndgameBook::new(),
            rng: StdRng::from_entropy(),
            token: CancelToken::new(),
            nodes: 0,
            last_time: 0.0,
            search_start: now,
            deadline: now + time_limit,
            thinking: false,
            result: None,
        }
    }

    // ------------------------------------------------------------------
    // 配置
    // ------------------------------------------------------------------

    pub fn set_difficulty(&mut self, difficulty: Difficulty) {
        self.max_depth = difficulty.depth();
        self.time_limit = Duration::from_secs_f64(difficulty.time_limit());
        self.randomness = difficulty.randomness();
    }

    pub fn set_max_depth(&mut self, depth: i32) {
        self.max_depth = depth.max(1);
    }

    pub fn set_time_limit(&mut self, seconds: f64) {
        self.time_limit = Duration::from_secs_f64(seconds.max(0.0));
    }

    pub fn set_randomness(&mut self, randomness: f64) {
        self.randomness = randomness.clamp(0.0, 1.0);
    }

    /// 固定随机数种子，搜索结果可复现
    pub fn set_seed(&mut self, seed: u64) {
        self.rng = StdRng::seed_from_u64(seed);
    }

    pub fn max_depth(&self) -> i32 {
        self.max_depth
    }

    /// 当前搜索的取消令牌，可克隆到其他线程
    pub fn cancel_token(&self) -> CancelToken {
        self.token.clone()
    }

    // ------------------------------------------------------------------
    // 统计
    // ------------------------------------------------------------------

    pub fn nodes_searched(&self) -> u64 {
        self.nodes
    }

    pub fn last_thinking_time(&self) -> f64 {
        self.last_time
    }

    pub fn get_search_info(&self) -> String {
        format!("Nodes: {}, Time: {:.3}s", self.nodes, self.last_time)
    }

    pub fn clear_statistics(&mut self) {
        self.nodes = 0;
        self.last_time = 0.0;
        self.tt.clear();
    }

    // ------------------------------------------------------------------
    // 顶层接口
    // ------------------------------------------------------------------

    /// 为指定方计算最佳着法
    ///
    /// 流程：开局库 → 残局库 → 单着速断 → 迭代加深搜索 → 随机化选择。
    /// 无合法着法时返回 `Move::none()`。
    pub fn get_best_move(&mut self, board: &Board, color: Color) -> Move {
        self.begin_search();

        let mut search_board = board.clone();
        search_board.set_turn(color);

        let legal = search_board.generate_legal_moves(color);
        if legal.is_empty() {
            self.finish_search();
            return Move::none();
        }

        // 开局库命中时在候选里均匀随机
        let book_lines = self
            .opening_book
            .lookup(&search_board.to_fen())
            .map(|lines| lines.to_vec());
        if let Some(lines) = book_lines {
            let playable: Vec<Move> = legal
                .iter()
                .copied()
                .filter(|lm| lines.iter().any(|bm| bm.from == lm.from && bm.to == lm.to))
                .collect();
            if !playable.is_empty() {
                let mv = playable[self.rng.gen_range(0..playable.len())];
                debug!("opening book hit: {}", mv);
                self.finish_search();
                return mv;
            }
        }

        // 残局库
        if let Some(mv) = self.endgame_book.probe(&search_board) {
            if search_board.is_valid_move(&mv) {
                debug!("endgame book hit: {}", mv);
                self.finish_search();
                return mv;
            }
        }

        // 只有一个着法时不必搜索
        if legal.len() == 1 {
            self.finish_search();
            return legal[0];
        }

        let (best_move, best_score, depth) = self.search_root(&mut search_board, color, &legal);
        debug!(
            "search done: {} score {} depth {} nodes {}",
            best_move, best_score, depth, self.nodes
        );

        let chosen = self.randomize_choice(&mut search_board, &legal, color, best_move);
        self.finish_search();
        chosen
    }

    /// 完整搜索并返回统计报告，分值为行棋方视角
    pub fn analyze_position(&mut self, board: &Board, color: Color) -> SearchReport {
        self.begin_search();

        let mut search_board = board.clone();
        search_board.set_turn(color);

        let legal = search_board.generate_legal_moves(color);
        if legal.is_empty() {
            let score = if search_board.is_in_check(color) {
                -MATE_SCORE
            } else {
                0
            };
            self.finish_search();
            return SearchReport {
                score,
                best_move: Move::none(),
                depth: 0,
                nodes_searched: self.nodes,
                time_used: self.last_time,
            };
        }

        let (best_move, red_score, depth) = self.search_root(&mut search_board, color, &legal);
        self.finish_search();

        let score = match color {
            Color::Red => red_score,
            Color::Black => -red_score,
        };
        SearchReport {
            score,
            best_move,
            depth,
            nodes_searched: self.nodes,
            time_used: self.last_time,
        }
    }

    // ------------------------------------------------------------------
    // 同步思考封装
    // ------------------------------------------------------------------

    /// 开始思考；在调用线程上同步完成，通过取消令牌协作中断
    pub fn start_thinking(&mut self, board: &Board, color: Color) {
        self.thinking = true;
        self.result = None;
        let mv = self.get_best_move(board, color);
        self.result = Some(mv);
        self.thinking = false;
    }

    pub fn is_thinking(&self) -> bool {
        self.thinking
    }

    pub fn has_result(&self) -> bool {
        self.result.is_some()
    }

    /// 取走思考结果，取走后清空
    pub fn get_thinking_result(&mut self) -> Option<Move> {
        self.result.take()
    }

    /// 请求中断当前搜索
    pub fn stop_thinking(&self) {
        self.token.cancel();
    }

    // ------------------------------------------------------------------
    // 内部搜索
    // ------------------------------------------------------------------

    fn begin_search(&mut self) {
        self.nodes = 0;
        self.token.reset();
        self.search_start = Instant::now();
        self.deadline = self.search_start + self.time_limit;
    }

    fn finish_search(&mut self) {
        self.last_time = self.search_start.elapsed().as_secs_f64();
    }

    #[inline]
    fn is_time_up(&self) -> bool {
        self.token.is_cancelled() || Instant::now() >= self.deadline
    }

    /// 迭代加深主循环
    ///
    /// 每层都用全窗口从头搜索，上一层的最佳着法排在首位；
    /// 只有完整跑完的一层才会提交结果，超时的半层被丢弃。
    fn search_root(
        &mut self,
        board: &mut Board,
        color: Color,
        legal: &[Move],
    ) -> (Move, i32, i32) {
        let maximizing_child = color.opposite() == Color::Red;
        let mut ordered = legal.to_vec();
        self.order_moves(board, &mut ordered, &Move::none());

        let mut best_move = ordered[0];
        let mut best_score = 0;
        let mut completed_depth = 0;

        'deepening: for depth in 1..=self.max_depth {
            if let Some(idx) = ordered.iter().position(|m| *m == best_move) {
                let mv = ordered.remove(idx);
                ordered.insert(0, mv);
            }

            let mut alpha = -INFINITY;
            let mut beta = INFINITY;
            let mut iter_best = ordered[0];
            let mut iter_score = match color {
                Color::Red => -INFINITY,
                Color::Black => INFINITY,
            };

            for mv in &ordered {
                if self.is_time_up() {
                    break 'deepening;
                }

                board.make_move(mv);
                let score = self.alpha_beta(board, depth - 1, alpha, beta, maximizing_child);
                board.undo_move();

                // 超时中断时子树分值不可信，整层作废
                if self.is_time_up() {
                    break 'deepening;
                }

                match color {
                    Color::Red => {
                        if score > iter_score {
                            iter_score = score;
                            iter_best = *mv;
                        }
                        alpha = alpha.max(iter_score);
                    }
                    Color::Black => {
                        if score < iter_score {
                            iter_score = score;
                            iter_best = *mv;
                        }
                        beta = beta.min(iter_score);
                    }
                }
            }

            best_move = iter_best;
            best_score = iter_score;
            completed_depth = depth;
            debug!(
                "depth {} complete: {} score {}",
                depth, best_move, best_score
            );
        }

        (best_move, best_score, completed_depth)
    }

    /// α-β 剪枝（红方节点取最大值，黑方节点取最小值）
    fn alpha_beta(
        &mut self,
        board: &mut Board,
        depth: i32,
        mut alpha: i32,
        mut beta: i32,
        maximizing: bool,
    ) -> i32 {
        self.nodes += 1;

        if depth <= 0 || self.is_time_up() {
            return self.quiescence(board, alpha, beta, maximizing, 0);
        }

        let hash = self.zobrist.hash(board);
        let mut hash_move = Move::none();
        if let Some(entry) = self.tt.probe(hash) {
            if entry.depth >= depth {
                match entry.flag {
                    TTFlag::Exact => return entry.score,
                    TTFlag::LowerBound => {
                        if entry.score >= beta {
                            return entry.score;
                        }
                    }
                    TTFlag::UpperBound => {
                        if entry.score <= alpha {
                            return entry.score;
                        }
                    }
                }
            }
            hash_move = entry.best_move;
        }

        let side = board.turn();
        let mut moves = board.generate_legal_moves(side);
        if moves.is_empty() {
            if board.is_in_check(side) {
                // 剩余深度越大说明杀得越快，分值越极端，引导选最快的杀
                return if maximizing {
                    -MATE_SCORE - depth
                } else {
                    MATE_SCORE + depth
                };
            }
            // 困毙和棋
            return 0;
        }

        self.order_moves(board, &mut moves, &hash_move);

        let original_alpha = alpha;
        let original_beta = beta;
        let mut best_score = if maximizing { -INFINITY } else { INFINITY };
        let mut best_move = moves[0];

        for mv in &moves {
            board.make_move(mv);
            let score = self.alpha_beta(board, depth - 1, alpha, beta, !maximizing);
            board.undo_move();

            if maximizing {
                if score > best_score {
                    best_score = score;
                    best_move = *mv;
                }
                alpha = alpha.max(best_score);
            } else {
                if score < best_score {
                    best_score = score;
                    best_move = *mv;
                }
                beta = beta.min(best_score);
            }

            if beta <= alpha || self.is_time_up() {
                break;
            }
        }

        // 超时/取消中断的节点分值不完整，不能污染置换表
        if self.is_time_up() {
            return best_score;
        }

        let flag = if best_score <= original_alpha {
            TTFlag::UpperBound
        } else if best_score >= original_beta {
            TTFlag::LowerBound
        } else {
            TTFlag::Exact
        };
        self.tt.store(TTEntry {
            hash,
            score: best_score,
            depth,
            flag,
            best_move,
        });

        best_score
    }

    /// 静态搜索：只延伸吃子着法，消除水平线效应
    fn quiescence(
        &mut self,
        board: &mut Board,
        mut alpha: i32,
        mut beta: i32,
        maximizing: bool,
        qdepth: i32,
    ) -> i32 {
        self.nodes += 1;

        let stand_pat = eval::evaluate(board);
        if qdepth > QUIESCENCE_MAX_DEPTH || self.is_time_up() {
            return stand_pat;
        }

        if maximizing {
            if stand_pat >= beta {
                return stand_pat;
            }
            alpha = alpha.max(stand_pat);
        } else {
            if stand_pat <= alpha {
                return stand_pat;
            }
            beta = beta.min(stand_pat);
        }

        let side = board.turn();
        let mut captures: Vec<Move> = board
            .generate_legal_moves(side)
            .into_iter()
            .filter(|mv| mv.is_capture())
            .collect();
        if captures.is_empty() {
            return stand_pat;
        }
        self.order_moves(board, &mut captures, &Move::none());

        let mut best_score = stand_pat;
        for mv in &captures {
            board.make_move(mv);
            let score = self.quiescence(board, alpha, beta, !maximizing, qdepth + 1);
            board.undo_move();

            if maximizing {
                best_score = best_score.max(score);
                alpha = alpha.max(score);
            } else {
                best_score = best_score.min(score);
                beta = beta.min(score);
            }
            if beta <= alpha {
                break;
            }
        }

        best_score
    }

    /// 走法排序：置换表着法 > 吃子(MVV-LVA) > 将军
    fn order_moves(&self, board: &Board, moves: &mut [Move], hash_move: &Move) {
        moves.sort_by_cached_key(|mv| {
            let mut score = 0;
            if mv == hash_move {
                score += HASH_MOVE_BONUS;
            }
            if let (Some(attacker), Some(victim)) = (mv.piece, mv.captured) {
                score += victim.kind.value() - attacker.kind.value() / 10;
            }
            if board.gives_check(mv) {
                score += CHECK_MOVE_BONUS;
            }
            -score
        });
    }

    /// 低难度随机化：静态重评根着法，在接近最优的集合里均匀随机
    fn randomize_choice(
        &mut self,
        board: &mut Board,
        legal: &[Move],
        color: Color,
        searched_best: Move,
    ) -> Move {
        if self.randomness <= 0.0 || legal.len() < 2 {
            return searched_best;
        }

        let margin = (100.0 * self.randomness) as i32;
        let mut scored = Vec::with_capacity(legal.len());
        for mv in legal {
            if !board.make_move(mv) {
                continue;
            }
            scored.push((*mv, eval::evaluate(board)));
            board.undo_move();
        }
        if scored.is_empty() {
            return searched_best;
        }

        let best = match color {
            Color::Red => scored.iter().map(|(_, s)| *s).max(),
            Color::Black => scored.iter().map(|(_, s)| *s).min(),
        };
        let best = match best {
            Some(b) => b,
            None => return searched_best,
        };

        let candidates: Vec<Move> = scored
            .iter()
            .filter(|(_, s)| match color {
                Color::Red => *s >= best - margin,
                Color::Black => *s <= best + margin,
            })
            .map(|(mv, _)| *mv)
            .collect();

        if candidates.is_empty() {
            return searched_best;
        }
        let chosen = candidates[self.rng.gen_range(0..candidates.len())];
        debug!(
            "randomized pick: {} from {} candidates (margin {})",
            chosen,
            candidates.len(),
            margin
        );
        chosen
    }
}

impl Default for SearchEngine {
    fn default() -> Self {
        SearchEngine::new()
    }
}
