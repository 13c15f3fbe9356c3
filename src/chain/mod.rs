// 連鎖シミュレーション層

pub mod result;
pub mod score;
pub mod simulator;

pub use result::RensaResult;
pub use simulator::simulate;
