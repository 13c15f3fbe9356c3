// (列, 色) の順序付き配置リスト

use super::color::PuyoColor;
use serde::{Deserialize, Serialize};

/// ぷよを落とす列と色の順序付きリスト。キーぷよ・発火ぷよの表現に使う。
/// 先頭から順に適用され、各落下はその時点での列の頂上に積まれる。
#[derive(Clone, Debug, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct ColumnPuyoList {
    list: Vec<(usize, PuyoColor)>,
}

impl ColumnPuyoList {
    pub fn new() -> Self {
        Self { list: Vec::new() }
    }

    pub fn add(&mut self, x: usize, color: PuyoColor) {
        debug_assert!((1..=crate::constants::WIDTH).contains(&x));
        self.list.push((x, color));
    }

    pub fn len(&self) -> usize {
        self.list.len()
    }

    pub fn is_empty(&self) -> bool {
        self.list.is_empty()
    }

    pub fn iter(&self) -> std::slice::Iter<'_, (usize, PuyoColor)> {
        self.list.iter()
    }

    /// 指定列に積まれる個数
    pub fn count_in_column(&self, x: usize) -> usize {
        self.list.iter().filter(|&&(cx, _)| cx == x).count()
    }
}

impl<'a> IntoIterator for &'a ColumnPuyoList {
    type Item = &'a (usize, PuyoColor);
    type IntoIter = std::slice::Iter<'a, (usize, PuyoColor)>;

    fn into_iter(self) -> Self::IntoIter {
        self.list.iter()
    }
}
