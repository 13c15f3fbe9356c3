// CoreField - 6×12(+幽霊段)の盤面と列高さの管理

use anyhow::{anyhow, Result};

use super::color::PuyoColor;
use super::column_puyo_list::ColumnPuyoList;
use crate::chain::result::RensaResult;
use crate::chain::simulator;
use crate::constants::{
    DEATH_X, DEATH_Y, HEIGHT, MAP_HEIGHT, MAP_WIDTH, MAX_STACK_HEIGHT, WIDTH,
};
use crate::tracker::{NoopTracker, RensaTracker};

/// 盤面本体。座標は 1 始まり (x: 1..=6, y: 1..=12 が可視領域、y=13 は幽霊段)。
/// 周囲 1 マスは番兵(WALL)で、走査時の境界チェックを省く。
/// 列高さは set_color / 落下処理の副作用として増分維持する（毎回の走査はしない）。
#[derive(Clone, Debug)]
pub struct CoreField {
    field: [[PuyoColor; MAP_HEIGHT]; MAP_WIDTH],
    heights: [usize; MAP_WIDTH],
}

impl CoreField {
    pub fn new() -> Self {
        let mut field = [[PuyoColor::Empty; MAP_HEIGHT]; MAP_WIDTH];
        for y in 0..MAP_HEIGHT {
            field[0][y] = PuyoColor::Wall;
            field[MAP_WIDTH - 1][y] = PuyoColor::Wall;
        }
        for x in 0..MAP_WIDTH {
            field[x][0] = PuyoColor::Wall;
        }
        Self {
            field,
            heights: [0; MAP_WIDTH],
        }
    }

    /// 盤面文字列から構築。6 文字で 1 段、最後の 6 文字が最下段。
    /// 空中に浮いたぷよがある盤面は不正として拒否する。
    pub fn from_str(s: &str) -> Result<Self> {
        let chars: Vec<char> = s.chars().filter(|&c| c != '\n').collect();
        if chars.len() % WIDTH != 0 {
            return Err(anyhow!(
                "盤面文字列の長さが {} の倍数でない: {}",
                WIDTH,
                chars.len()
            ));
        }

        let rows = chars.len() / WIDTH;
        if rows > MAX_STACK_HEIGHT {
            return Err(anyhow!("盤面文字列の段数が多すぎる: {}", rows));
        }

        let mut f = Self::new();
        for (i, &ch) in chars.iter().enumerate() {
            let x = i % WIDTH + 1;
            let y = rows - i / WIDTH;
            let c = PuyoColor::from_char(ch)?;
            f.field[x][y] = c;
        }

        // 列高さの再構築。途中に空白があれば浮きぷよなので不正
        for x in 1..=WIDTH {
            let mut h = 0;
            while h < MAX_STACK_HEIGHT && f.field[x][h + 1] != PuyoColor::Empty {
                h += 1;
            }
            for y in (h + 1)..=MAX_STACK_HEIGHT {
                if f.field[x][y] != PuyoColor::Empty {
                    return Err(anyhow!("列 {} の y={} に浮きぷよがある", x, y));
                }
            }
            f.heights[x] = h;
        }
        Ok(f)
    }

    #[inline]
    pub fn color(&self, x: usize, y: usize) -> PuyoColor {
        debug_assert!(x < MAP_WIDTH && y < MAP_HEIGHT);
        self.field[x][y]
    }

    #[inline]
    pub fn is_empty(&self, x: usize, y: usize) -> bool {
        self.color(x, y) == PuyoColor::Empty
    }

    #[inline]
    pub fn is_color(&self, x: usize, y: usize, c: PuyoColor) -> bool {
        self.color(x, y) == c
    }

    /// 列 x の高さ（底から連続する非空セル数）
    #[inline]
    pub fn height(&self, x: usize) -> usize {
        debug_assert!((1..=WIDTH).contains(&x));
        self.heights[x]
    }

    /// セルを直接書き換える。呼び出し側が重力整合性を保つ前提で、
    /// 頂上への書き込み/頂上の消去に限り高さを増分更新する。
    pub fn set_color(&mut self, x: usize, y: usize, c: PuyoColor) {
        debug_assert!((1..=WIDTH).contains(&x) && (1..=MAX_STACK_HEIGHT).contains(&y));
        self.field[x][y] = c;
        if c == PuyoColor::Empty {
            if self.heights[x] == y {
                self.heights[x] = y - 1;
            }
        } else if self.heights[x] < y {
            debug_assert_eq!(self.heights[x], y - 1, "浮きぷよ書き込み: ({}, {})", x, y);
            self.heights[x] = y;
        }
    }

    /// 重力整合性を保たない生書き込み（シミュレータ内部専用）
    #[inline]
    pub(crate) fn unchecked_set(&mut self, x: usize, y: usize, c: PuyoColor) {
        self.field[x][y] = c;
    }

    #[inline]
    pub(crate) fn set_height(&mut self, x: usize, h: usize) {
        self.heights[x] = h;
    }

    /// 列 x の頂上に 1 個積む。列が満杯なら何もせず false を返す
    /// （探索中の投機的な配置で天井に当たるのは正常系）。
    pub fn drop_puyo_on(&mut self, x: usize, c: PuyoColor) -> bool {
        debug_assert!(c != PuyoColor::Empty && c != PuyoColor::Wall);
        if self.heights[x] >= MAX_STACK_HEIGHT {
            return false;
        }
        self.heights[x] += 1;
        self.field[x][self.heights[x]] = c;
        true
    }

    /// 配置リストを先頭から順に適用。途中で満杯に当たったら false
    pub fn drop_puyo_list(&mut self, list: &ColumnPuyoList) -> bool {
        let mut ok = true;
        for &(x, c) in list {
            ok &= self.drop_puyo_on(x, c);
        }
        ok
    }

    /// (x, y) を含む同色 4 連結グループの大きさ。
    /// 幽霊段(y=13)は連結に参加しない。
    pub fn count_connected(&self, x: usize, y: usize) -> usize {
        let mut positions = [(0usize, 0usize); WIDTH * HEIGHT];
        self.fill_same_color_positions(x, y, &mut positions)
    }

    /// (x, y) と同色で連結なセル座標を positions に書き込み、個数を返す
    pub(crate) fn fill_same_color_positions(
        &self,
        x: usize,
        y: usize,
        positions: &mut [(usize, usize)],
    ) -> usize {
        let c = self.color(x, y);
        if !c.is_normal_color() || y > HEIGHT {
            return 0;
        }

        let mut visited = [[false; MAP_HEIGHT]; MAP_WIDTH];
        let mut write = 0;
        let mut read = 0;
        visited[x][y] = true;
        positions[write] = (x, y);
        write += 1;

        while read < write {
            let (cx, cy) = positions[read];
            read += 1;
            for (nx, ny) in [(cx + 1, cy), (cx - 1, cy), (cx, cy + 1), (cx, cy - 1)] {
                if ny > HEIGHT || visited[nx][ny] || self.field[nx][ny] != c {
                    continue;
                }
                visited[nx][ny] = true;
                positions[write] = (nx, ny);
                write += 1;
            }
        }
        write
    }

    /// 消去可能な(4 連結以上の)グループが存在するか
    pub fn rensa_will_occur(&self) -> bool {
        let mut checked = [[false; MAP_HEIGHT]; MAP_WIDTH];
        let mut positions = [(0usize, 0usize); WIDTH * HEIGHT];
        for x in 1..=WIDTH {
            for y in 1..=self.heights[x].min(HEIGHT) {
                if checked[x][y] || !self.field[x][y].is_normal_color() {
                    continue;
                }
                let n = self.fill_same_color_positions(x, y, &mut positions);
                for &(px, py) in &positions[..n] {
                    checked[px][py] = true;
                }
                if n >= crate::constants::ERASE_THRESHOLD {
                    return true;
                }
            }
        }
        false
    }

    /// 連鎖を最後まで解決する。トラッカーなしの標準経路
    pub fn simulate(&mut self) -> RensaResult {
        simulator::simulate(self, &mut NoopTracker)
    }

    /// トラッカー付きで連鎖を解決する
    pub fn simulate_with_tracker<T: RensaTracker>(&mut self, tracker: &mut T) -> RensaResult {
        simulator::simulate(self, tracker)
    }

    /// 可視領域が完全に空か（全消し判定）
    pub fn is_zenkeshi(&self) -> bool {
        (1..=WIDTH).all(|x| self.heights[x] == 0)
    }

    /// 窒息点が埋まっているか
    pub fn is_dead(&self) -> bool {
        !self.is_empty(DEATH_X, DEATH_Y)
    }

    /// 可視領域のぷよ総数
    pub fn count_puyos(&self) -> usize {
        (1..=WIDTH).map(|x| self.heights[x].min(HEIGHT)).sum()
    }
}

impl Default for CoreField {
    fn default() -> Self {
        Self::new()
    }
}

/// 盤面の等価性はプレイ領域（幽霊段含む）のセル値で判定する
impl PartialEq for CoreField {
    fn eq(&self, other: &Self) -> bool {
        for x in 1..=WIDTH {
            for y in 1..=MAX_STACK_HEIGHT {
                if self.field[x][y] != other.field[x][y] {
                    return false;
                }
            }
        }
        true
    }
}

impl Eq for CoreField {}

impl std::fmt::Display for CoreField {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        for y in (1..=MAX_STACK_HEIGHT).rev() {
            for x in 1..=WIDTH {
                write!(f, "{}", self.field[x][y].to_char())?;
            }
            writeln!(f)?;
        }
        Ok(())
    }
}

impl std::str::FromStr for CoreField {
    type Err = anyhow::Error;

    fn from_str(s: &str) -> Result<Self> {
        CoreField::from_str(s)
    }
}
