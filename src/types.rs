//! 象棋核心类型定义
//!
//! 定义棋盘坐标、棋子、走法等基础数据类型

use std::fmt;

/// 棋子颜色/阵营
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum Color {
    Red,
    Black,
}

impl Color {
    /// 获取对方阵营
    pub fn opposite(&self) -> Color {
        match self {
            Color::Red => Color::Black,
            Color::Black => Color::Red,
        }
    }

    /// 从 FEN 回合字符解析（w = 红方，b = 黑方）
    pub fn from_turn_char(c: char) -> Option<Color> {
        match c {
            'w' => Some(Color::Red),
            'b' => Some(Color::Black),
            _ => None,
        }
    }

    /// 转换为 FEN 回合字符
    pub fn to_turn_char(&self) -> char {
        match self {
            Color::Red => 'w',
            Color::Black => 'b',
        }
    }
}

impl fmt::Display for Color {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Color::Red => write!(f, "Red"),
            Color::Black => write!(f, "Black"),
        }
    }
}

/// 棋子类型
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum PieceType {
    /// 将/帅
    King,
    /// 士/仕
    Advisor,
    /// 象/相
    Bishop,
    /// 马
    Knight,
    /// 车
    Rook,
    /// 炮
    Cannon,
    /// 卒/兵
    Pawn,
}

impl PieceType {
    pub const ALL: [PieceType; 7] = [
        PieceType::King,
        PieceType::Advisor,
        PieceType::Bishop,
        PieceType::Knight,
        PieceType::Rook,
        PieceType::Cannon,
        PieceType::Pawn,
    ];

    /// 从 FEN 字符解析（小写）
    pub fn from_fen_char(c: char) -> Option<PieceType> {
        match c.to_ascii_lowercase() {
            'k' => Some(PieceType::King),
            'a' => Some(PieceType::Advisor),
            'b' => Some(PieceType::Bishop),
            'n' => Some(PieceType::Knight),
            'r' => Some(PieceType::Rook),
            'c' => Some(PieceType::Cannon),
            'p' => Some(PieceType::Pawn),
            _ => None,
        }
    }

    /// 转换为 FEN 字符（小写）
    pub fn to_fen_char(&self) -> char {
        match self {
            PieceType::King => 'k',
            PieceType::Advisor => 'a',
            PieceType::Bishop => 'b',
            PieceType::Knight => 'n',
            PieceType::Rook => 'r',
            PieceType::Cannon => 'c',
            PieceType::Pawn => 'p',
        }
    }

    /// 获取棋子的评估值
    pub fn value(&self) -> i32 {
        match self {
            PieceType::King => 10000,
            PieceType::Rook => 600,
            PieceType::Knight => 400,
            PieceType::Cannon => 300,
            PieceType::Advisor => 200,
            PieceType::Bishop => 200,
            PieceType::Pawn => 100,
        }
    }
}

impl fmt::Display for PieceType {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let name = match self {
            PieceType::King => "King",
            PieceType::Advisor => "Advisor",
            PieceType::Bishop => "Bishop",
            PieceType::Knight => "Knight",
            PieceType::Rook => "Rook",
            PieceType::Cannon => "Cannon",
            PieceType::Pawn => "Pawn",
        };
        write!(f, "{}", name)
    }
}

/// 棋子（颜色 + 类型）
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub struct Piece {
    pub color: Color,
    pub kind: PieceType,
}

impl Piece {
    pub fn new(color: Color, kind: PieceType) -> Self {
        Piece { color, kind }
    }

    /// 棋子索引，1..=14（红方 1..=7，黑方 8..=14）
    ///
    /// 用于 Zobrist 表和位置价值表的下标，0 保留给空格。
    #[inline]
    pub fn index(&self) -> usize {
        let base = match self.color {
            Color::Red => 0,
            Color::Black => 7,
        };
        base + self.kind as usize + 1
    }

    /// 从 FEN 字符解析（大写 = 红方，小写 = 黑方）
    pub fn from_fen_char(c: char) -> Option<Piece> {
        let kind = PieceType::from_fen_char(c)?;
        let color = if c.is_ascii_uppercase() {
            Color::Red
        } else {
            Color::Black
        };
        Some(Piece { color, kind })
    }

    /// 转换为 FEN 字符
    pub fn to_fen_char(&self) -> char {
        let ch = self.kind.to_fen_char();
        match self.color {
            Color::Red => ch.to_ascii_uppercase(),
            Color::Black => ch,
        }
    }
}

/// 棋盘位置 (row, col)
///
/// row: 0-9（0 是黑方底线，9 是红方底线）
/// col: 0-8（从左到右，对应纵线 a-i）
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub struct Position {
    pub row: i8,
    pub col: i8,
}

impl Position {
    pub fn new(row: i8, col: i8) -> Self {
        Position { row, col }
    }

    /// 检查位置是否在棋盘范围内
    #[inline]
    pub fn is_valid(&self) -> bool {
        (0..=9).contains(&self.row) && (0..=8).contains(&self.col)
    }

    /// 转换为 0..90 的格子索引
    #[inline]
    pub fn to_index(&self) -> usize {
        self.row as usize * 9 + self.col as usize
    }

    /// 检查位置是否在九宫格内
    pub fn is_in_palace(&self, color: Color) -> bool {
        if !(3..=5).contains(&self.col) {
            return false;
        }
        match color {
            Color::Red => (7..=9).contains(&self.row),
            Color::Black => (0..=2).contains(&self.row),
        }
    }

    /// 检查位置是否在己方半场（未过河）
    pub fn is_on_own_side(&self, color: Color) -> bool {
        match color {
            Color::Red => (5..=9).contains(&self.row),
            Color::Black => (0..=4).contains(&self.row),
        }
    }

    /// 位置加偏移量
    #[inline]
    pub fn offset(&self, row_delta: i8, col_delta: i8) -> Position {
        Position {
            row: self.row + row_delta,
            col: self.col + col_delta,
        }
    }

    /// 从纵线字符和横线序号构造（file: 'a'..='i', rank: 1..=10）
    pub fn from_file_rank(file: char, rank: i32) -> Option<Position> {
        if !('a'..='i').contains(&file) || !(1..=10).contains(&rank) {
            return None;
        }
        Some(Position {
            row: (10 - rank) as i8,
            col: (file as i8) - (b'a' as i8),
        })
    }

    /// 转换为坐标文本（如 "e4"，横线序号 = 10 - row）
    pub fn to_coord_str(&self) -> String {
        let file = (b'a' + self.col as u8) as char;
        format!("{}{}", file, 10 - self.row)
    }
}

impl fmt::Display for Position {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.to_coord_str())
    }
}

/// 走法
///
/// `piece` 与 `captured` 在走法执行时填入，撤销时据此精确还原。
/// 负坐标表示"无走法"哨兵值。
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct Move {
    pub from: Position,
    pub to: Position,
    pub piece: Option<Piece>,
    pub captured: Option<Piece>,
}

impl Move {
    pub fn new(from: Position, to: Position) -> Self {
        Move {
            from,
            to,
            piece: None,
            captured: None,
        }
    }

    /// "无走法"哨兵值
    pub fn none() -> Self {
        Move {
            from: Position::new(-1, -1),
            to: Position::new(-1, -1),
            piece: None,
            captured: None,
        }
    }

    /// 检查是否为有效走法（非哨兵值）
    #[inline]
    pub fn is_valid(&self) -> bool {
        self.from.row >= 0 && self.from.col >= 0 && self.to.row >= 0 && self.to.col >= 0
    }

    /// 是否为吃子走法
    #[inline]
    pub fn is_capture(&self) -> bool {
        self.captured.is_some()
    }

    /// 从坐标文本解析（如 "h3e3"、"i6i10"）
    pub fn parse(s: &str) -> Option<Move> {
        let chars: Vec<char> = s.trim().chars().collect();
        if chars.len() < 4 {
            return None;
        }

        let from_file = chars[0];
        let mut i = 1;
        let mut from_rank = String::new();
        while i < chars.len() && chars[i].is_ascii_digit() {
            from_rank.push(chars[i]);
            i += 1;
        }

        if from_rank.is_empty() || i >= chars.len() {
            return None;
        }
        let to_file = chars[i];
        i += 1;
        let to_rank: String = chars[i..].iter().collect();
        if to_rank.is_empty() || !to_rank.chars().all(|c| c.is_ascii_digit()) {
            return None;
        }

        let from = Position::from_file_rank(from_file, from_rank.parse().ok()?)?;
        let to = Position::from_file_rank(to_file, to_rank.parse().ok()?)?;
        Some(Move::new(from, to))
    }

    /// 转换为坐标文本
    pub fn to_coord_str(&self) -> String {
        if !self.is_valid() {
            return "none".to_string();
        }
        format!("{}{}", self.from.to_coord_str(), self.to.to_coord_str())
    }
}

impl fmt::Display for Move {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.to_coord_str())
    }
}

/// 游戏结果
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum GameResult {
    Ongoing,
    RedWin,
    BlackWin,
    Draw,
}
