//! 局面评估
//!
//! 内部统一红方视角：正分利红，负分利黑。
//! `evaluate_for` 按调用方颜色翻转符号。
//!
//! 评估项：子力、机动性、将帅安全、位置分。
//! 位置分是独立的静态查表项，不回调评估函数本身。

use lazy_static::lazy_static;

use crate::board::Board;
use crate::types::{Color, PieceType, Position};

/// 机动性权重：每个合法走法 2 分
const MOBILITY_WEIGHT: i32 = 2;

/// 将军惩罚/奖励
const CHECK_PENALTY: i32 = 50;

const ZERO_PST: [[i32; 9]; 10] = [[0; 9]; 10];

/// 兵的位置分（红方视角，row 9 为红方底线）
///
/// 过河后价值迅速上升，逼近九宫时最高；底线反而回落。
const PAWN_PST: [[i32; 9]; 10] = [
    [0, 3, 6, 9, 12, 9, 6, 3, 0],
    [18, 36, 56, 80, 120, 80, 56, 36, 18],
    [14, 26, 42, 60, 80, 60, 42, 26, 14],
    [10, 20, 30, 34, 40, 34, 30, 20, 10],
    [6, 12, 18, 18, 20, 18, 18, 12, 6],
    [2, 0, 8, 0, 8, 0, 8, 0, 2],
    [0, 0, -2, 0, 4, 0, -2, 0, 0],
    [0, 0, 0, 0, 0, 0, 0, 0, 0],
    [0, 0, 0, 0, 0, 0, 0, 0, 0],
    [0, 0, 0, 0, 0, 0, 0, 0, 0],
];

/// 马的位置分：占中有利，贴边受压
const KNIGHT_PST: [[i32; 9]; 10] = [
    [4, 8, 16, 12, 4, 12, 16, 8, 4],
    [4, 10, 28, 16, 8, 16, 28, 10, 4],
    [12, 14, 16, 20, 18, 20, 16, 14, 12],
    [8, 24, 18, 24, 20, 24, 18, 24, 8],
    [6, 16, 14, 18, 16, 18, 14, 16, 6],
    [4, 12, 16, 14, 12, 14, 16, 12, 4],
    [2, 6, 8, 6, 10, 6, 8, 6, 2],
    [4, 2, 8, 8, 4, 8, 8, 2, 4],
    [-2, 2, 4, 4, -2, 4, 4, 2, -2],
    [0, -4, 0, 0, 0, 0, 0, -4, 0],
];

/// 车的位置分：控制中路与敌方要道
const ROOK_PST: [[i32; 9]; 10] = [
    [14, 14, 12, 18, 16, 18, 12, 14, 14],
    [16, 20, 18, 24, 26, 24, 18, 20, 16],
    [12, 12, 12, 18, 18, 18, 12, 12, 12],
    [12, 18, 16, 22, 22, 22, 16, 18, 12],
    [12, 14, 12, 18, 18, 18, 12, 14, 12],
    [12, 16, 14, 20, 20, 20, 14, 16, 12],
    [6, 10, 8, 14, 14, 14, 8, 10, 6],
    [4, 8, 6, 14, 12, 14, 6, 8, 4],
    [8, 4, 8, 16, 8, 16, 8, 4, 8],
    [-2, 10, 6, 14, 12, 14, 6, 10, -2],
];

/// 炮的位置分：中路与巡河位有利
const CANNON_PST: [[i32; 9]; 10] = [
    [6, 4, 0, -10, -12, -10, 0, 4, 6],
    [2, 2, 0, -4, -14, -4, 0, 2, 2],
    [2, 2, 0, -10, -8, -10, 0, 2, 2],
    [0, 0, -2, 4, 10, 4, -2, 0, 0],
    [0, 0, 0, 2, 8, 2, 0, 0, 0],
    [-2, 0, 4, 2, 6, 2, 4, 0, -2],
    [0, 0, 0, 2, 4, 2, 0, 0, 0],
    [4, 0, 8, 6, 10, 6, 8, 0, 4],
    [0, 2, 4, 6, 6, 6, 4, 2, 0],
    [0, 0, 2, 6, 6, 6, 2, 0, 0],
];

/// 红方表上下镜像得到黑方表
fn mirror(table: &[[i32; 9]; 10]) -> [[i32; 9]; 10] {
    let mut out = [[0; 9]; 10];
    for row in 0..10 {
        out[row] = table[9 - row];
    }
    out
}

lazy_static! {
    static ref BLACK_PAWN_PST: [[i32; 9]; 10] = mirror(&PAWN_PST);
    static ref BLACK_KNIGHT_PST: [[i32; 9]; 10] = mirror(&KNIGHT_PST);
    static ref BLACK_ROOK_PST: [[i32; 9]; 10] = mirror(&ROOK_PST);
    static ref BLACK_CANNON_PST: [[i32; 9]; 10] = mirror(&CANNON_PST);
}

fn red_pst(kind: PieceType) -> &'static [[i32; 9]; 10] {
    match kind {
        PieceType::Pawn => &PAWN_PST,
        PieceType::Knight => &KNIGHT_PST,
        PieceType::Rook => &ROOK_PST,
        PieceType::Cannon => &CANNON_PST,
        _ => &ZERO_PST,
    }
}

fn black_pst(kind: PieceType) -> &'static [[i32; 9]; 10] {
    match kind {
        PieceType::Pawn => &BLACK_PAWN_PST,
        PieceType::Knight => &BLACK_KNIGHT_PST,
        PieceType::Rook => &BLACK_ROOK_PST,
        PieceType::Cannon => &BLACK_CANNON_PST,
        _ => &ZERO_PST,
    }
}

/// 评估局面（红方视角）
pub fn evaluate(board: &Board) -> i32 {
    let mut score = 0;

    // 子力 + 位置
    for row in 0..10i8 {
        for col in 0..9i8 {
            if let Some(piece) = board.piece_at(Position::new(row, col)) {
                let (r, c) = (row as usize, col as usize);
                match piece.color {
                    Color::Red => {
                        score += piece.kind.value();
                        score += red_pst(piece.kind)[r][c];
                    }
                    Color::Black => {
                        score -= piece.kind.value();
                        score -= black_pst(piece.kind)[r][c];
                    }
                }
            }
        }
    }

    // 机动性
    let red_mobility = board.generate_legal_moves(Color::Red).len() as i32;
    let black_mobility = board.generate_legal_moves(Color::Black).len() as i32;
    score += (red_mobility - black_mobility) * MOBILITY_WEIGHT;

    // 将帅安全
    if board.is_in_check(Color::Red) {
        score -= CHECK_PENALTY;
    }
    if board.is_in_check(Color::Black) {
        score += CHECK_PENALTY;
    }

    score
}

/// 按指定方视角评估局面
#[inline]
pub fn evaluate_for(board: &Board, color: Color) -> i32 {
    match color {
        Color::Red => evaluate(board),
        Color::Black => -evaluate(board),
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_initial_position_balanced() {
        let board = Board::new();
        assert_eq!(evaluate(&board), 0);
    }

    #[test]
    fn test_evaluate_for_negates() {
        let board = Board::from_fen("4k4/9/9/9/9/9/9/9/4R4/4K4 w").unwrap();
        let red_view = evaluate_for(&board, Color::Red);
        let black_view = evaluate_for(&board, Color::Black);
        assert!(red_view > 0);
        assert_eq!(red_view, -black_view);
    }

    #[test]
    fn test_material_advantage_dominates() {
        // 红方多一车
        let board = Board::from_fen("4k4/9/9/9/9/9/9/9/4R4/4K4 w").unwrap();
        assert!(evaluate(&board) > 500);
    }

    #[test]
    fn test_pawn_advancement_rewarded() {
        // 过河兵比未过河兵得分高
        let home = Board::from_fen("4k4/9/9/9/9/9/4P4/9/9/3K5 w").unwrap();
        let crossed = Board::from_fen("4k4/9/9/4P4/9/9/9/9/9/3K5 w").unwrap();
        assert!(evaluate(&crossed) > evaluate(&home));
    }

    #[test]
    fn test_check_penalty() {
        // 黑方被将军，红方得分应高于未将军的同等子力局面
        let checking = Board::from_fen("4k4/4R4/9/9/9/9/9/9/9/3K5 b").unwrap();
        let quiet = Board::from_fen("4k4/9/6R2/9/9/9/9/9/9/3K5 b").unwrap();
        assert!(evaluate(&checking) > 0);
        assert!(evaluate(&quiet) > 0);
    }
}
