// 検出の並列ストリーミング実行
//
// コア自体は単一スレッドの純計算。ここでは独立な探索枝（深さ 0 の発火
// パスと、最初のキーぷよ配置ごとの部分木）を rayon のワーカーに割り、
// 見つけた候補を crossbeam のチャネルで逐次送出する。枝ごとに盤面の
// 独立コピーを使うため共有可変状態はなく、中断フラグは枝の境界でのみ
// 確認する（枝の途中では列挙を打ち切らない）。

use std::sync::atomic::{AtomicBool, Ordering};
use std::sync::Arc;

use crossbeam_channel::{unbounded, Receiver, Sender};
use rayon::prelude::*;
use serde::{Deserialize, Serialize};

use super::detector::{emit_fires, enumerate_from, DetectMode};
use crate::chain::RensaResult;
use crate::constants::{DU64Set, ERASE_THRESHOLD, MAX_STACK_HEIGHT, WIDTH};
use crate::field::{ColumnPuyoList, CoreField, NORMAL_COLORS};
use crate::hash::field_fingerprint;
use crate::tracker::{ChainTrackResult, RensaChainTracker};
use crate::vlog;

/// 並列検出の設定
#[derive(Clone, Debug, Serialize, Deserialize)]
pub struct ParallelDetectConfig {
    /// ワーカースレッド数
    pub num_workers: usize,
    /// キーぷよの最大追加数
    pub max_key_puyos: usize,
    pub mode: DetectMode,
    /// 解決後盤面 + スコアによる重複排除を行うか
    pub dedup: bool,
    /// 各候補に消去ステップ行列を付けるか
    pub with_tracking: bool,
}

impl Default for ParallelDetectConfig {
    fn default() -> Self {
        Self {
            num_workers: num_cpus::get(),
            max_key_puyos: 0,
            mode: DetectMode::Drop,
            dedup: true,
            with_tracking: false,
        }
    }
}

/// 発見された 1 候補。チャネル越しに所有権ごと渡す
#[derive(Clone, Debug)]
pub struct RensaCandidate {
    /// 連鎖解決後の盤面
    pub field_after: CoreField,
    pub result: RensaResult,
    pub key_puyos: ColumnPuyoList,
    pub fire_puyos: ColumnPuyoList,
    pub track: Option<ChainTrackResult>,
}

/// 実行中の検出を外から中断するためのハンドル。
/// 中断は枝の切れ目で効く（送出済みの候補はそのまま受信できる）。
#[derive(Clone, Debug)]
pub struct AbortHandle(Arc<AtomicBool>);

impl AbortHandle {
    pub fn abort(&self) {
        self.0.store(true, Ordering::Relaxed);
    }

    pub fn is_aborted(&self) -> bool {
        self.0.load(Ordering::Relaxed)
    }
}

/// 探索枝。Fire はルート盤面での発火列挙、Key は最初のキー配置の部分木
enum Branch {
    Fire,
    Key(usize, crate::field::PuyoColor),
}

/// 候補をチャネルで流しながら並列に検出する。
/// 送信側が全枝を処理し終えるとチャネルは閉じる。
pub fn detect_streaming(
    field: &CoreField,
    config: &ParallelDetectConfig,
) -> (Receiver<RensaCandidate>, AbortHandle) {
    let (tx, rx) = unbounded();
    let abort = AbortHandle(Arc::new(AtomicBool::new(false)));

    let field = field.clone();
    let config = config.clone();
    let handle = abort.clone();
    std::thread::spawn(move || {
        run_branches(field, config, tx, handle);
    });

    (rx, abort)
}

fn run_branches(
    field: CoreField,
    config: ParallelDetectConfig,
    tx: Sender<RensaCandidate>,
    abort: AbortHandle,
) {
    let mut branches = vec![Branch::Fire];
    if config.max_key_puyos > 0 {
        for x in 1..=WIDTH {
            if field.height(x) >= MAX_STACK_HEIGHT {
                continue;
            }
            for c in NORMAL_COLORS {
                branches.push(Branch::Key(x, c));
            }
        }
    }
    vlog!(
        "[並列検出] 枝数={} / ワーカー={} / mode={:?}",
        branches.len(),
        config.num_workers,
        config.mode
    );

    let seen: DU64Set = DU64Set::default();

    let pool = match rayon::ThreadPoolBuilder::new()
        .num_threads(config.num_workers)
        .build()
    {
        Ok(p) => p,
        Err(e) => {
            vlog!("[並列検出] スレッドプール構築失敗: {}", e);
            return;
        }
    };

    pool.install(|| {
        branches.into_par_iter().for_each(|branch| {
            if abort.is_aborted() {
                return;
            }

            let mut sink = |mut candidate: CoreField, keys: &ColumnPuyoList, fires: &ColumnPuyoList| {
                let (result, track) = if config.with_tracking {
                    let mut tracker = RensaChainTracker::new();
                    let r = candidate.simulate_with_tracker(&mut tracker);
                    (r, Some(tracker.into_result()))
                } else {
                    (candidate.simulate(), None)
                };
                if result.chains < 1 {
                    return;
                }
                if config.dedup && !seen.insert(dedup_key(&candidate, &result)) {
                    return;
                }
                let _ = tx.send(RensaCandidate {
                    field_after: candidate,
                    result,
                    key_puyos: keys.clone(),
                    fire_puyos: fires.clone(),
                    track,
                });
            };

            match branch {
                Branch::Fire => {
                    emit_fires(&field, &ColumnPuyoList::new(), config.mode, &mut sink);
                }
                Branch::Key(x, c) => {
                    let mut f = field.clone();
                    f.drop_puyo_on(x, c);
                    if f.count_connected(x, f.height(x)) >= ERASE_THRESHOLD {
                        // 即発火する配置はキーではなく Fire 枝の担当
                        return;
                    }
                    let mut keys = ColumnPuyoList::new();
                    keys.add(x, c);
                    enumerate_from(&f, &keys, config.max_key_puyos - 1, config.mode, &mut sink);
                }
            }
        });
    });

    vlog!("[並列検出] 完了: 重複排除後 {} 件", seen.len());
}

/// 解決後盤面とスコアから重複排除キーを作る
fn dedup_key(field_after: &CoreField, result: &RensaResult) -> u64 {
    field_fingerprint(field_after)
        .wrapping_mul(0x9e37_79b9_7f4a_7c15)
        .wrapping_add(result.score as u64)
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn streaming_matches_serial_results() {
        let f = CoreField::from_str(concat!(
            " BRR  ", //
            " RBR  ", //
            "BBYYY ",
        ))
        .unwrap();

        let mut serial_scores: Vec<usize> = Vec::new();
        super::super::detector::iterate_possible_rensas(
            &f,
            0,
            DetectMode::Drop,
            |_, result, _, _| serial_scores.push(result.score),
        );
        serial_scores.sort_unstable();

        let config = ParallelDetectConfig {
            num_workers: 2,
            dedup: false,
            ..Default::default()
        };
        let (rx, _abort) = detect_streaming(&f, &config);
        let mut parallel_scores: Vec<usize> = rx.iter().map(|c| c.result.score).collect();
        parallel_scores.sort_unstable();

        assert_eq!(serial_scores, parallel_scores);
    }

    #[test]
    fn dedup_removes_identical_outcomes() {
        let f = CoreField::from_str(concat!(
            " BRR  ", //
            " RBR  ", //
            "BBYYY ",
        ))
        .unwrap();

        let base = ParallelDetectConfig {
            num_workers: 2,
            max_key_puyos: 1,
            ..Default::default()
        };

        let (rx, _abort) = detect_streaming(&f, &base);
        let deduped = rx.iter().count();

        let (rx, _abort) = detect_streaming(
            &f,
            &ParallelDetectConfig {
                dedup: false,
                ..base
            },
        );
        let raw = rx.iter().count();

        assert!(deduped <= raw);
        assert!(deduped > 0);
    }

    #[test]
    fn tracking_attaches_track_result() {
        let f = CoreField::from_str("RRR   ").unwrap();
        let config = ParallelDetectConfig {
            num_workers: 1,
            with_tracking: true,
            ..Default::default()
        };
        let (rx, _abort) = detect_streaming(&f, &config);
        let candidates: Vec<_> = rx.iter().collect();
        assert!(!candidates.is_empty());
        for c in &candidates {
            let track = c.track.as_ref().unwrap();
            // トラッカーの消去セル数は盤面から消えた個数と一致する
            assert_eq!(track.count_erased_cells(), 4);
        }
    }

    #[test]
    fn abort_stops_between_branches() {
        let f = CoreField::from_str(concat!(
            " BRR  ", //
            " RBR  ", //
            "BBYYY ",
        ))
        .unwrap();
        let config = ParallelDetectConfig {
            num_workers: 1,
            max_key_puyos: 2,
            ..Default::default()
        };
        let (rx, abort) = detect_streaming(&f, &config);
        abort.abort();
        // 中断後もチャネルは正常に閉じ、受信側はブロックし続けない
        let _ = rx.iter().count();
        assert!(abort.is_aborted());
    }
}
