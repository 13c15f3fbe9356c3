// 盤面の 64bit フィンガープリント（重複排除用）

use crate::constants::{MAX_STACK_HEIGHT, WIDTH};
use crate::field::CoreField;

const FNV_OFFSET: u64 = 0xcbf2_9ce4_8422_2325;
const FNV_PRIME: u64 = 0x0000_0100_0000_01b3;

/// プレイ領域のセル値から FNV-1a でハッシュを計算する。
/// 同一盤面は常に同一ハッシュになる（正規化やミラー対称は考慮しない）。
pub fn field_fingerprint(field: &CoreField) -> u64 {
    let mut h = FNV_OFFSET;
    for x in 1..=WIDTH {
        for y in 1..=MAX_STACK_HEIGHT {
            h ^= field.color(x, y) as u64;
            h = h.wrapping_mul(FNV_PRIME);
        }
    }
    h
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::field::PuyoColor;

    #[test]
    fn equal_fields_hash_equal() {
        let a = CoreField::from_str("RGBY  ").unwrap();
        let b = CoreField::from_str("RGBY  ").unwrap();
        assert_eq!(field_fingerprint(&a), field_fingerprint(&b));
    }

    #[test]
    fn different_fields_hash_differently() {
        let a = CoreField::from_str("RGBY  ").unwrap();
        let mut b = CoreField::from_str("RGBY  ").unwrap();
        b.drop_puyo_on(6, PuyoColor::Red);
        assert_ne!(field_fingerprint(&a), field_fingerprint(&b));
    }

    #[test]
    fn empty_field_hash_is_stable() {
        assert_eq!(
            field_fingerprint(&CoreField::new()),
            field_fingerprint(&CoreField::new())
        );
    }
}
