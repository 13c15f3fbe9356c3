// 連鎖可能性の列挙（キーぷよ + 発火ぷよの探索）

use crate::chain::RensaResult;
use crate::constants::{ERASE_THRESHOLD, HEIGHT, MAX_STACK_HEIGHT, WIDTH};
use crate::field::{ColumnPuyoList, CoreField, PuyoColor, NORMAL_COLORS};
use crate::tracker::{ChainTrackResult, NoopTracker, RensaChainTracker};
use crate::vlog;

/// 探索モード。FLOAT は DROP の候補集合を包含する
#[derive(Clone, Copy, Debug, PartialEq, Eq, serde::Serialize, serde::Deserialize)]
pub enum DetectMode {
    /// 現在の積み上がりの頂上にしか置けない（実機で即実現可能な連鎖）
    Drop,
    /// 発火ぷよを空中の段に仮置きし、下をおじゃまで埋めて支える
    /// （将来の積み込み後に実現しうる連鎖ポテンシャルの評価用）
    Float,
}

/// 発見した候補ごとに 1 回呼ばれるコールバック。
/// 引数は (連鎖解決後の盤面, 連鎖結果, キーぷよ, 発火ぷよ)。
/// 結果の重複排除は保証しない（必要なら呼び出し側で盤面ハッシュを使う）。
pub fn iterate_possible_rensas<F>(
    field: &CoreField,
    max_key_puyos: usize,
    mode: DetectMode,
    mut callback: F,
) where
    F: FnMut(&CoreField, &RensaResult, &ColumnPuyoList, &ColumnPuyoList),
{
    debug_assert!(
        !field.rensa_will_occur(),
        "未解決の消去グループを含む盤面が渡された"
    );
    vlog!("[検出器] 列挙開始: maxKey={} / mode={:?}", max_key_puyos, mode);

    let mut sink = |mut candidate: CoreField, keys: &ColumnPuyoList, fires: &ColumnPuyoList| {
        let result = candidate.simulate_with_tracker(&mut NoopTracker);
        if result.chains >= 1 {
            callback(&candidate, &result, keys, fires);
        }
    };
    enumerate_from(field, &ColumnPuyoList::new(), max_key_puyos, mode, &mut sink);
}

/// トラッカー付きの変種。コールバックは追加で各セルの消去ステップ行列を受け取る
pub fn iterate_possible_rensas_with_tracking<F>(
    field: &CoreField,
    max_key_puyos: usize,
    mode: DetectMode,
    mut callback: F,
) where
    F: FnMut(&CoreField, &RensaResult, &ColumnPuyoList, &ColumnPuyoList, &ChainTrackResult),
{
    debug_assert!(
        !field.rensa_will_occur(),
        "未解決の消去グループを含む盤面が渡された"
    );
    vlog!(
        "[検出器] 列挙開始(トラック付き): maxKey={} / mode={:?}",
        max_key_puyos,
        mode
    );

    let mut sink = |mut candidate: CoreField, keys: &ColumnPuyoList, fires: &ColumnPuyoList| {
        let mut tracker = RensaChainTracker::new();
        let result = candidate.simulate_with_tracker(&mut tracker);
        if result.chains >= 1 {
            callback(&candidate, &result, keys, fires, tracker.result());
        }
    };
    enumerate_from(field, &ColumnPuyoList::new(), max_key_puyos, mode, &mut sink);
}

/// 現在の盤面から発火を試し、残りのキーぷよ予算があれば配置を 1 個ずつ
/// 伸ばして再帰する。sink は「キー + 発火を落とした直後（連鎖解決前）」の
/// 盤面を受け取る。
pub(crate) fn enumerate_from(
    field: &CoreField,
    key_puyos: &ColumnPuyoList,
    rest_keys: usize,
    mode: DetectMode,
    sink: &mut impl FnMut(CoreField, &ColumnPuyoList, &ColumnPuyoList),
) {
    emit_fires(field, key_puyos, mode, sink);
    if rest_keys == 0 {
        return;
    }

    for x in 1..=WIDTH {
        if field.height(x) >= MAX_STACK_HEIGHT {
            continue;
        }
        for c in NORMAL_COLORS {
            let mut f = field.clone();
            f.drop_puyo_on(x, c);
            // 置いた瞬間に 4 連結が完成する配置は発火側の担当
            if f.count_connected(x, f.height(x)) >= ERASE_THRESHOLD {
                continue;
            }
            let mut keys = key_puyos.clone();
            keys.add(x, c);
            enumerate_from(&f, &keys, rest_keys - 1, mode, sink);
        }
    }
}

/// 発火候補を列挙して sink に流す
pub(crate) fn emit_fires(
    field: &CoreField,
    key_puyos: &ColumnPuyoList,
    mode: DetectMode,
    sink: &mut impl FnMut(CoreField, &ColumnPuyoList, &ColumnPuyoList),
) {
    try_drop_fire(field, key_puyos, sink);
    if mode == DetectMode::Float {
        try_float_fire(field, key_puyos, sink);
    }
}

/// DROP 発火: 各列の頂上への 1 個落下。着地セルが同色に隣接しない配置は
/// 1 個では発火し得ないので候補から外せる（キー 0 個の場合に網羅的）。
fn try_drop_fire(
    field: &CoreField,
    key_puyos: &ColumnPuyoList,
    sink: &mut impl FnMut(CoreField, &ColumnPuyoList, &ColumnPuyoList),
) {
    for x in 1..=WIDTH {
        let ly = field.height(x) + 1;
        if ly > HEIGHT {
            // 幽霊段への落下は連結に参加しないため発火しない
            continue;
        }
        for c in NORMAL_COLORS {
            if !(field.is_color(x - 1, ly, c)
                || field.is_color(x + 1, ly, c)
                || field.is_color(x, ly - 1, c))
            {
                continue;
            }
            let mut f = field.clone();
            f.drop_puyo_on(x, c);
            let mut fires = ColumnPuyoList::new();
            fires.add(x, c);
            sink(f, key_puyos, &fires);
        }
    }
}

/// FLOAT 発火: 大きさ 1..=3 の既存グループの各セルを種として、隣の列に
/// 不足分の同色ぷよを「頂上が種と同じ段になる」ように縦積みで仮置きする。
/// 仮置きを支えるため、その下の空きはおじゃまで埋める（おじゃまも発火
/// リストに含まれる）。複数の仮置きぷよを互いの上に重ねるのは 1 列内の
/// 縦積みに限る。
fn try_float_fire(
    field: &CoreField,
    key_puyos: &ColumnPuyoList,
    sink: &mut impl FnMut(CoreField, &ColumnPuyoList, &ColumnPuyoList),
) {
    for x in 1..=WIDTH {
        for y in 1..=field.height(x).min(HEIGHT) {
            let c = field.color(x, y);
            if !c.is_normal_color() {
                continue;
            }
            let needed = ERASE_THRESHOLD.saturating_sub(field.count_connected(x, y));
            // needed > y だと塔の最下段が床を割る
            if needed == 0 || needed > y {
                continue;
            }

            for dx in [x.wrapping_sub(1), x + 1] {
                if !(1..=WIDTH).contains(&dx) {
                    continue;
                }
                // 種の段が既に埋まっている列には浮かせられない
                if y <= field.height(dx) {
                    continue;
                }
                // 色ぷよの最下段。既存の山と重なる積み方は扱わない
                let lowest = y + 1 - needed;
                if lowest <= field.height(dx) {
                    continue;
                }

                let mut fires = ColumnPuyoList::new();
                for _ in field.height(dx)..(lowest - 1) {
                    fires.add(dx, PuyoColor::Ojama);
                }
                for _ in 0..needed {
                    fires.add(dx, c);
                }

                let mut f = field.clone();
                if !f.drop_puyo_list(&fires) {
                    continue;
                }
                sink(f, key_puyos, &fires);
            }
        }
    }
}
