// 連鎖結果の定義

use serde::{Deserialize, Serialize};

/// 1 回の連鎖解決の結果。シミュレータのみが生成し、以後は不変
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct RensaResult {
    /// 連鎖数（0 = 何も消えなかった）
    pub chains: usize,
    /// 累積スコア（全消しボーナス込み）
    pub score: usize,
    /// 解決後に可視領域が完全に空になったか
    pub all_clear: bool,
    /// 解決の過程で窒息点が埋まったか
    pub overflowed: bool,
}

impl RensaResult {
    pub fn new(chains: usize, score: usize, all_clear: bool, overflowed: bool) -> Self {
        Self {
            chains,
            score,
            all_clear,
            overflowed,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn default_is_zero() {
        let r = RensaResult::default();
        assert_eq!(r.chains, 0);
        assert_eq!(r.score, 0);
        assert!(!r.all_clear);
        assert!(!r.overflowed);
    }
}
