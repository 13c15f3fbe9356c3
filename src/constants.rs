// 盤面定数とユーティリティ型定義

use nohash_hasher::BuildNoHashHasher;
pub use dashmap::DashSet;

/// ====== 盤面定数 ======
/// 可視領域は 6 列 × 12 段。13 段目は「幽霊段」で、ぷよを置くことは
/// できるが連結判定には参加しない。周囲 1 マスは番兵(WALL)。
pub const WIDTH: usize = 6;
pub const HEIGHT: usize = 12;
pub const MAP_WIDTH: usize = WIDTH + 2;
pub const MAP_HEIGHT: usize = 16;

/// 1 列に積める最大高さ（幽霊段込み）
pub const MAX_STACK_HEIGHT: usize = 13;

/// 消去に必要な連結数
pub const ERASE_THRESHOLD: usize = 4;

/// 窒息点（ここが埋まると負け）
pub const DEATH_X: usize = 3;
pub const DEATH_Y: usize = 12;

/// 全消しボーナス
pub const ZENKESHI_BONUS: usize = 2100;

// u64 キー専用のノーハッシュ（重複排除の高速化）
pub type U64Set = std::collections::HashSet<u64, BuildNoHashHasher<u64>>;
pub type DU64Set = DashSet<u64, BuildNoHashHasher<u64>>;
