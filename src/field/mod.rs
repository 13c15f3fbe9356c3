// 盤面のドメイン層

pub mod color;
pub mod column_puyo_list;
pub mod core_field;

pub use color::{PuyoColor, NORMAL_COLORS};
pub use column_puyo_list::ColumnPuyoList;
pub use core_field::CoreField;
