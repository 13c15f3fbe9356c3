// ぷよぷよ連鎖シミュレーションと連鎖可能性探索 - ライブラリモジュール

pub mod constants;
pub mod field; // 盤面データモデル
pub mod chain; // 消去・重力・スコアのシミュレーション
pub mod tracker; // 連鎖ステップの観測フック
pub mod detect; // キー + 発火配置の列挙
pub mod hash;
pub mod logging;

// 外部クレートの再エクスポート
pub use anyhow::{anyhow, Context, Result};

// 主要な型を再エクスポート
pub use chain::RensaResult;
pub use constants::{HEIGHT, MAX_STACK_HEIGHT, WIDTH};
pub use detect::{
    detect_streaming, iterate_possible_rensas, iterate_possible_rensas_with_tracking,
    AbortHandle, DetectMode, ParallelDetectConfig, RensaCandidate,
};
pub use field::{ColumnPuyoList, CoreField, PuyoColor, NORMAL_COLORS};
pub use tracker::{ChainTrackResult, NoopTracker, RensaChainTracker, RensaTracker};
