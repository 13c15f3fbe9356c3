// ぷよの色型定義

use anyhow::{anyhow, Result};
use serde::{Deserialize, Serialize};

/// 盤面セルの色。EMPTY / WALL / OJAMA / 通常色 4 種の閉じた集合
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[repr(u8)]
pub enum PuyoColor {
    Empty = 0,
    Wall = 1,
    Ojama = 2,
    Red = 4,
    Blue = 5,
    Yellow = 6,
    Green = 7,
}

/// 通常色の一覧（探索で試す色パレット）
pub const NORMAL_COLORS: [PuyoColor; 4] = [
    PuyoColor::Red,
    PuyoColor::Blue,
    PuyoColor::Yellow,
    PuyoColor::Green,
];

impl PuyoColor {
    /// 連結判定の対象になる色か（おじゃま・壁・空白は対象外）
    #[inline]
    pub fn is_normal_color(self) -> bool {
        (self as u8) & 0b100 != 0
    }

    /// 盤面文字列の 1 文字から変換。大文字小文字は区別しない
    pub fn from_char(ch: char) -> Result<Self> {
        match ch {
            ' ' | '.' => Ok(PuyoColor::Empty),
            'O' | 'o' | '@' => Ok(PuyoColor::Ojama),
            'R' | 'r' => Ok(PuyoColor::Red),
            'B' | 'b' => Ok(PuyoColor::Blue),
            'Y' | 'y' => Ok(PuyoColor::Yellow),
            'G' | 'g' => Ok(PuyoColor::Green),
            _ => Err(anyhow!("不正な盤面文字: {:?}", ch)),
        }
    }

    pub fn to_char(self) -> char {
        match self {
            PuyoColor::Empty => '.',
            PuyoColor::Wall => '#',
            PuyoColor::Ojama => 'O',
            PuyoColor::Red => 'R',
            PuyoColor::Blue => 'B',
            PuyoColor::Yellow => 'Y',
            PuyoColor::Green => 'G',
        }
    }
}
