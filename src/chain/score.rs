// スコア計算テーブルと 1 ステップ分のスコア式
//
// テーブル値は本家の公開スコア規則そのまま。既存の学習済み評価器と
// スコア互換を保つ必要があるため、値を変えてはならない。

/// 連鎖ボーナス（添字 = 連鎖数、1 連鎖目は 0）
pub const CHAIN_BONUS: [usize; 20] = [
    0, 0, 8, 16, 32, 64, 96, 128, 160, 192, 224, 256, 288, 320, 352, 384, 416, 448, 480, 512,
];

/// 色数ボーナス（添字 = 同時に消えた色の種類数）
pub const COLOR_BONUS: [usize; 6] = [0, 0, 3, 6, 12, 24];

/// 連結ボーナス（添字 = グループの大きさ、11 以上は 10 で頭打ち）
pub const LONG_BONUS: [usize; 12] = [0, 0, 0, 0, 0, 2, 3, 4, 5, 6, 7, 10];

/// グループ 1 個分の連結ボーナス
#[inline]
pub fn long_bonus(group_size: usize) -> usize {
    LONG_BONUS[group_size.min(11)]
}

/// ステップ倍率 = clamp(連鎖 + 連結 + 色数, 1, 999)
#[inline]
pub fn calculate_rensa_bonus_coef(
    chain_bonus_coef: usize,
    long_bonus_coef: usize,
    color_bonus_coef: usize,
) -> usize {
    (chain_bonus_coef + long_bonus_coef + color_bonus_coef).clamp(1, 999)
}

/// 1 ステップのスコア = 10 × 消去数 × ステップ倍率
#[inline]
pub fn score_for_step(
    nth_chain: usize,
    num_erased: usize,
    long_bonus_coef: usize,
    num_colors: usize,
) -> usize {
    let coef = calculate_rensa_bonus_coef(
        CHAIN_BONUS[nth_chain.min(CHAIN_BONUS.len() - 1)],
        long_bonus_coef,
        COLOR_BONUS[num_colors.min(COLOR_BONUS.len() - 1)],
    );
    10 * num_erased * coef
}
