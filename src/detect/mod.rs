// 連鎖検出層

pub mod detector;
pub mod parallel;

pub use detector::{
    iterate_possible_rensas, iterate_possible_rensas_with_tracking, DetectMode,
};
pub use parallel::{detect_streaming, AbortHandle, ParallelDetectConfig, RensaCandidate};
