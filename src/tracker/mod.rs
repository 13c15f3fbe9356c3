// 連鎖ステップの観測フック（プラガブルなトラッカー）
//
// シミュレータは各ステップで、重力適用の前に track() を 1 回呼ぶ。
// トラッカーは観測専用で、消去や重力を自分で行うことはない。

use anyhow::{anyhow, Result};
use serde::{Deserialize, Serialize};

use crate::constants::{HEIGHT, MAP_HEIGHT, MAP_WIDTH, WIDTH};

/// シミュレータが各連鎖ステップで呼び出す観測フック
pub trait RensaTracker {
    /// nth_chain: 1 始まりのステップ番号 / erased: このステップで消えたセル
    fn track(&mut self, nth_chain: usize, erased: &[(usize, usize)]);
}

/// 何もしない既定トラッカー。単相化によりオーバーヘッドは消える
#[derive(Clone, Copy, Debug, Default)]
pub struct NoopTracker;

impl RensaTracker for NoopTracker {
    #[inline]
    fn track(&mut self, _nth_chain: usize, _erased: &[(usize, usize)]) {}
}

/// 各セルが何連鎖目に消えたかの記録。0 = 一度も消えていない
#[derive(Clone, Debug, PartialEq, Eq, Serialize, Deserialize)]
pub struct ChainTrackResult {
    erased_at: [[u8; MAP_HEIGHT]; MAP_WIDTH],
}

impl ChainTrackResult {
    pub fn new() -> Self {
        Self {
            erased_at: [[0; MAP_HEIGHT]; MAP_WIDTH],
        }
    }

    /// 固定値フィクスチャ用のコンパクト表記から構築。
    /// 6 文字で 1 段・最下段が最後、16 進 1 桁が連鎖番号、'.'/' ' は未消去
    pub fn from_str(s: &str) -> Result<Self> {
        let chars: Vec<char> = s.chars().filter(|&c| c != '\n').collect();
        if chars.len() % WIDTH != 0 {
            return Err(anyhow!(
                "トラック文字列の長さが {} の倍数でない: {}",
                WIDTH,
                chars.len()
            ));
        }

        let rows = chars.len() / WIDTH;
        if rows > HEIGHT {
            return Err(anyhow!("トラック文字列の段数が多すぎる: {}", rows));
        }
        let mut r = Self::new();
        for (i, &ch) in chars.iter().enumerate() {
            let x = i % WIDTH + 1;
            let y = rows - i / WIDTH;
            match ch {
                ' ' | '.' => {}
                _ => {
                    let v = ch
                        .to_digit(16)
                        .ok_or_else(|| anyhow!("不正なトラック文字: {:?}", ch))?;
                    r.erased_at[x][y] = v as u8;
                }
            }
        }
        Ok(r)
    }

    /// (x, y) が消えた連鎖番号（1 始まり）。未消去なら 0
    #[inline]
    pub fn erased_at(&self, x: usize, y: usize) -> u8 {
        debug_assert!(x < MAP_WIDTH && y < MAP_HEIGHT);
        self.erased_at[x][y]
    }

    #[inline]
    pub(crate) fn set_erased_at(&mut self, x: usize, y: usize, nth_chain: u8) {
        self.erased_at[x][y] = nth_chain;
    }

    /// 一度でも消えたセルの総数
    pub fn count_erased_cells(&self) -> usize {
        let mut n = 0;
        for x in 1..=WIDTH {
            for y in 1..=HEIGHT {
                if self.erased_at[x][y] != 0 {
                    n += 1;
                }
            }
        }
        n
    }
}

impl Default for ChainTrackResult {
    fn default() -> Self {
        Self::new()
    }
}

/// デバッグ用の固定幅グリッド表示。上段から 1 セル 3 文字右詰め
impl std::fmt::Display for ChainTrackResult {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        for y in (1..=HEIGHT).rev() {
            for x in 1..=WIDTH {
                write!(f, "{:3}", self.erased_at[x][y])?;
            }
            writeln!(f)?;
        }
        Ok(())
    }
}

/// 連鎖番号を記録するトラッカー
#[derive(Clone, Debug, Default)]
pub struct RensaChainTracker {
    result: ChainTrackResult,
}

impl RensaChainTracker {
    pub fn new() -> Self {
        Self {
            result: ChainTrackResult::new(),
        }
    }

    pub fn result(&self) -> &ChainTrackResult {
        &self.result
    }

    pub fn into_result(self) -> ChainTrackResult {
        self.result
    }
}

impl RensaTracker for RensaChainTracker {
    fn track(&mut self, nth_chain: usize, erased: &[(usize, usize)]) {
        for &(x, y) in erased {
            self.result.set_erased_at(x, y, nth_chain as u8);
        }
    }
}
