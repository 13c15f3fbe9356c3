// 消去・重力の固定点計算（連鎖シミュレーション本体）

use super::result::RensaResult;
use super::score;
use crate::constants::{ERASE_THRESHOLD, HEIGHT, MAP_HEIGHT, MAP_WIDTH, WIDTH, ZENKESHI_BONUS};
use crate::field::{CoreField, PuyoColor};
use crate::tracker::RensaTracker;

/// 1 ステップ分の消去情報
struct VanishStep {
    erased: Vec<(usize, usize)>,
    long_bonus_coef: usize,
    num_colors: usize,
}

/// 落下直後の盤面を安定するまで解決し、結果を返す。
/// 同一入力に対して結果はバイト単位で再現される（乱数なし）。
pub fn simulate<T: RensaTracker>(field: &mut CoreField, tracker: &mut T) -> RensaResult {
    // 窒息は配置時点で決まる。シミュレーションはぷよを増やさない
    let overflowed = field.is_dead();

    let mut chains = 0;
    let mut total_score = 0;

    while let Some(step) = find_vanishing_step(field) {
        chains += 1;
        total_score += score::score_for_step(
            chains,
            step.erased.len(),
            step.long_bonus_coef,
            step.num_colors,
        );

        // 重力適用の前にトラッカーへ通知する
        tracker.track(chains, &step.erased);

        let mut touched = [false; MAP_WIDTH];
        for &(x, y) in &step.erased {
            field.unchecked_set(x, y, PuyoColor::Empty);
            touched[x] = true;
        }
        drop_after_vanish(field, &touched);
    }

    let all_clear = chains > 0 && field.is_zenkeshi();
    let score = if all_clear {
        total_score + ZENKESHI_BONUS
    } else {
        total_score
    };

    RensaResult::new(chains, score, all_clear, overflowed)
}

/// 4 連結以上のグループと、その周囲のおじゃまを収集する。
/// 消えるものがなければ None（シミュレーション終了）。
fn find_vanishing_step(field: &CoreField) -> Option<VanishStep> {
    let mut checked = [[false; MAP_HEIGHT]; MAP_WIDTH];
    let mut erased_mark = [[false; MAP_HEIGHT]; MAP_WIDTH];
    let mut positions = [(0usize, 0usize); WIDTH * HEIGHT];

    let mut erased: Vec<(usize, usize)> = Vec::new();
    let mut long_bonus_coef = 0;
    let mut color_seen = [false; 8];

    for x in 1..=WIDTH {
        for y in 1..=field.height(x).min(HEIGHT) {
            if checked[x][y] || !field.color(x, y).is_normal_color() {
                continue;
            }
            let n = field.fill_same_color_positions(x, y, &mut positions);
            for &(px, py) in &positions[..n] {
                checked[px][py] = true;
            }
            if n < ERASE_THRESHOLD {
                continue;
            }

            long_bonus_coef += score::long_bonus(n);
            color_seen[field.color(x, y) as usize & 7] = true;
            for &(px, py) in &positions[..n] {
                erased_mark[px][py] = true;
                erased.push((px, py));
            }
        }
    }

    if erased.is_empty() {
        return None;
    }

    // グループに隣接するおじゃまは巻き込まれて消える（グループ自体にはならない）
    let num_group_cells = erased.len();
    for i in 0..num_group_cells {
        let (x, y) = erased[i];
        for (nx, ny) in [(x + 1, y), (x - 1, y), (x, y + 1), (x, y - 1)] {
            if ny > HEIGHT || erased_mark[nx][ny] {
                continue;
            }
            if field.color(nx, ny) == PuyoColor::Ojama {
                erased_mark[nx][ny] = true;
                erased.push((nx, ny));
            }
        }
    }

    let num_colors = color_seen.iter().filter(|&&b| b).count();
    Some(VanishStep {
        erased,
        long_bonus_coef,
        num_colors,
    })
}

/// 消去で穴の空いた列を 1 回だけ下詰めし、高さを正確に更新する
fn drop_after_vanish(field: &mut CoreField, touched: &[bool; MAP_WIDTH]) {
    for x in 1..=WIDTH {
        if !touched[x] {
            continue;
        }
        let mut write = 1;
        for y in 1..=field.height(x) {
            let c = field.color(x, y);
            if c == PuyoColor::Empty {
                continue;
            }
            if write != y {
                field.unchecked_set(x, write, c);
                field.unchecked_set(x, y, PuyoColor::Empty);
            }
            write += 1;
        }
        field.set_height(x, write - 1);
    }
}
