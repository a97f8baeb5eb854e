//! FEN 解析和生成
//!
//! 格式: `<棋盘> <回合>`
//!
//! 棋盘从 row 0（黑方底线）到 row 9（红方底线），行间以 `/` 分隔；
//! 行内连续空格折叠为数字。棋子符号：
//! - 红方：K(帅) A(仕) B(相) N(马) R(车) C(炮) P(兵)
//! - 黑方：k a b n r c p
//!
//! 回合记号：`w` = 红方，`b` = 黑方。

use crate::types::{Color, Piece, Position};

/// 标准开局 FEN
pub const INITIAL_FEN: &str = "rnbakabnr/9/1c5c1/p1p1p1p1p/9/9/P1P1P1P1P/1C5C1/9/RNBAKABNR w";

/// FEN 解析后的状态
#[derive(Debug, Clone)]
pub struct FenState {
    pub squares: [Option<Piece>; 90],
    pub turn: Color,
}

/// 解析 FEN 字符串
///
/// 解析在独立的状态上完成，任何错误都不会留下半成品棋盘。
pub fn parse_fen(fen: &str) -> Result<FenState, String> {
    let parts: Vec<&str> = fen.split_whitespace().collect();
    if parts.len() != 2 {
        return Err(format!(
            "Invalid FEN format: expected '<board> <turn>', got: {}",
            fen
        ));
    }

    let squares = parse_board(parts[0])?;
    let turn = Color::from_turn_char(parts[1].chars().next().unwrap_or(' '))
        .ok_or_else(|| format!("Invalid turn: {}", parts[1]))?;

    Ok(FenState { squares, turn })
}

/// 解析棋盘字符串
fn parse_board(board_str: &str) -> Result<[Option<Piece>; 90], String> {
    let rows: Vec<&str> = board_str.split('/').collect();
    if rows.len() != 10 {
        return Err(format!(
            "Invalid board: expected 10 rows, got {}",
            rows.len()
        ));
    }

    let mut squares = [None; 90];

    for (row_idx, row_str) in rows.iter().enumerate() {
        let row = row_idx as i8;
        let mut col: i8 = 0;

        for ch in row_str.chars() {
            if col > 9 {
                break;
            }

            if ch.is_ascii_digit() {
                col += (ch as i8) - (b'0' as i8);
            } else {
                let piece = Piece::from_fen_char(ch)
                    .ok_or_else(|| format!("Invalid piece char: {}", ch))?;
                if col >= 9 {
                    return Err(format!("Row {} overflows 9 columns", row));
                }
                squares[Position::new(row, col).to_index()] = Some(piece);
                col += 1;
            }
        }

        if col != 9 {
            return Err(format!("Row {} has {} columns, expected 9", row, col));
        }
    }

    Ok(squares)
}

/// 从棋盘状态生成 FEN 字符串
pub fn write_fen(squares: &[Option<Piece>; 90], turn: Color) -> String {
    let mut rows = Vec::with_capacity(10);

    for row in 0..10i8 {
        let mut row_str = String::new();
        let mut empty_count = 0;

        for col in 0..9i8 {
            match squares[Position::new(row, col).to_index()] {
                Some(piece) => {
                    if empty_count > 0 {
                        row_str.push_str(&empty_count.to_string());
                        empty_count = 0;
                    }
                    row_str.push(piece.to_fen_char());
                }
                None => empty_count += 1,
            }
        }

        if empty_count > 0 {
            row_str.push_str(&empty_count.to_string());
        }
        rows.push(row_str);
    }

    format!("{} {}", rows.join("/"), turn.to_turn_char())
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::types::PieceType;

    #[test]
    fn test_parse_initial_fen() {
        let state = parse_fen(INITIAL_FEN).unwrap();
        assert_eq!(state.turn, Color::Red);

        let red_count = state
            .squares
            .iter()
            .flatten()
            .filter(|p| p.color == Color::Red)
            .count();
        let black_count = state
            .squares
            .iter()
            .flatten()
            .filter(|p| p.color == Color::Black)
            .count();
        assert_eq!(red_count, 16);
        assert_eq!(black_count, 16);

        // 红帅在 (9,4)，黑将在 (0,4)
        assert_eq!(
            state.squares[Position::new(9, 4).to_index()],
            Some(Piece::new(Color::Red, PieceType::King))
        );
        assert_eq!(
            state.squares[Position::new(0, 4).to_index()],
            Some(Piece::new(Color::Black, PieceType::King))
        );
    }

    #[test]
    fn test_fen_roundtrip() {
        for fen in [
            INITIAL_FEN,
            "4k4/9/9/9/9/9/9/9/9/4K4 b",
            "4k3R/3R5/9/9/9/9/9/9/9/3K5 b",
        ] {
            let state = parse_fen(fen).unwrap();
            assert_eq!(write_fen(&state.squares, state.turn), fen);
        }
    }

    #[test]
    fn test_parse_rejects_malformed() {
        // 行数不足
        assert!(parse_fen("9/9/9 w").is_err());
        // 未知棋子字符
        assert!(parse_fen("4z4/9/9/9/9/9/9/9/9/4K4 w").is_err());
        // 行宽错误
        assert!(parse_fen("4k5/9/9/9/9/9/9/9/9/4K4 w").is_err());
        // 缺少回合记号
        assert!(parse_fen("4k4/9/9/9/9/9/9/9/9/4K4").is_err());
        // 非法回合记号
        assert!(parse_fen("4k4/9/9/9/9/9/9/9/9/4K4 r").is_err());
    }
}
