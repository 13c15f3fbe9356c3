// 検出器の統合テスト（盤面フィクスチャは本家互換）

use rensa_core::{
    iterate_possible_rensas, ColumnPuyoList, CoreField, DetectMode, RensaResult,
};

/// キーぷよ・発火ぷよを順に落とした盤面を作る
fn drop_key_and_fire_puyos(
    f: &CoreField,
    key_puyos: &ColumnPuyoList,
    fire_puyos: &ColumnPuyoList,
) -> CoreField {
    let mut actual = f.clone();
    assert!(actual.drop_puyo_list(key_puyos));
    assert!(actual.drop_puyo_list(fire_puyos));
    actual
}

#[test]
fn iterate_possible_rensas_depth0() {
    let f = CoreField::from_str(concat!(
        " BRR  ", //
        " RBR  ", //
        "BBYYY ",
    ))
    .unwrap();

    // 右端の Y 列に 1 個落とす形
    let expected1 = CoreField::from_str(concat!(
        " BRR  ", //
        " RBR  ", //
        "BBYYYY",
    ))
    .unwrap();

    // 5 列目の Y の上に 1 個積む形
    let expected2 = CoreField::from_str(concat!(
        " BRR  ", //
        " RBRY ", //
        "BBYYY ",
    ))
    .unwrap();

    let mut found1 = false;
    let mut found2 = false;
    iterate_possible_rensas(&f, 0, DetectMode::Drop, |_, _, keys, fires| {
        let actual = drop_key_and_fire_puyos(&f, keys, fires);
        if actual == expected1 {
            found1 = true;
        }
        if actual == expected2 {
            found2 = true;
        }
    });

    assert!(found1);
    assert!(found2);
}

#[test]
fn iterate_possible_rensas_with_key_puyos() {
    let f = CoreField::from_str(concat!(
        "RB    ", //
        "RRB   ", //
        "BBY   ",
    ))
    .unwrap();

    let expected = [
        CoreField::from_str(concat!(
            "R     ", //
            "RBY   ", //
            "RRBY  ", //
            "BBYY  ",
        ))
        .unwrap(),
        CoreField::from_str(concat!(
            "R     ", //
            "RBY   ", //
            "RRB   ", //
            "BBYYY ",
        ))
        .unwrap(),
        CoreField::from_str(concat!(
            "RY    ", //
            "RBY   ", //
            "RRB   ", //
            "BBYY  ",
        ))
        .unwrap(),
        CoreField::from_str(concat!(
            "RY    ", //
            "RB    ", //
            "RRB   ", //
            "BBYYY ",
        ))
        .unwrap(),
    ];

    let mut found = [false; 4];
    iterate_possible_rensas(&f, 3, DetectMode::Drop, |_, _, keys, fires| {
        let actual = drop_key_and_fire_puyos(&f, keys, fires);
        for (i, e) in expected.iter().enumerate() {
            if actual == *e {
                found[i] = true;
                break;
            }
        }
    });

    assert!(found[0]);
    assert!(found[1]);
    assert!(found[2]);
    assert!(found[3]);
}

#[test]
fn iterate_possible_rensas_float() {
    let f = CoreField::from_str(concat!(
        "y     ", //
        "b     ", //
        "r     ", //
        "b     ", //
        "b     ", //
        "b     ", //
        "y     ", //
        "y     ", //
        "y     ",
    ))
    .unwrap();

    // 孤立した r の隣に r を 3 個浮かせ、下をおじゃまで支えた形
    let mut g = CoreField::from_str(concat!(
        "y     ", //
        "b     ", //
        "rr    ", //
        "br    ", //
        "br    ", //
        "bO    ", //
        "yO    ", //
        "yO    ", //
        "yO    ",
    ))
    .unwrap();
    let expected = g.simulate();
    assert!(expected.chains >= 1);

    let mut found = false;
    iterate_possible_rensas(&f, 0, DetectMode::Float, |_, result, _, _| {
        if *result == expected {
            found = true;
        }
    });
    assert!(found);
}

#[test]
fn float_mode_is_superset_of_drop_mode() {
    let f = CoreField::from_str(concat!(
        " BRR  ", //
        " RBR  ", //
        "BBYYY ",
    ))
    .unwrap();

    for max_key in 0..=1 {
        let mut drop_results: Vec<RensaResult> = Vec::new();
        iterate_possible_rensas(&f, max_key, DetectMode::Drop, |_, result, _, _| {
            drop_results.push(*result);
        });

        let mut float_results: Vec<RensaResult> = Vec::new();
        iterate_possible_rensas(&f, max_key, DetectMode::Float, |_, result, _, _| {
            float_results.push(*result);
        });

        for r in &drop_results {
            assert!(
                float_results.contains(r),
                "maxKey={} で DROP の結果 {:?} が FLOAT に含まれない",
                max_key,
                r
            );
        }
        assert!(float_results.len() >= drop_results.len());
    }
}

#[test]
fn zero_callback_invocations_is_a_valid_outcome() {
    let f = CoreField::new();
    let mut calls = 0;
    iterate_possible_rensas(&f, 0, DetectMode::Drop, |_, _, _, _| calls += 1);
    assert_eq!(calls, 0);

    // 空盤面ではキーを足しても発火に 4 個必要なので、予算 2 では何も出ない
    iterate_possible_rensas(&f, 2, DetectMode::Drop, |_, _, _, _| calls += 1);
    assert_eq!(calls, 0);
}

#[test]
fn reported_result_matches_resimulation() {
    let f = CoreField::from_str(concat!(
        " BRR  ", //
        " RBR  ", //
        "BBYYY ",
    ))
    .unwrap();

    let mut checked = 0;
    iterate_possible_rensas(&f, 1, DetectMode::Drop, |after, result, keys, fires| {
        let mut replay = drop_key_and_fire_puyos(&f, keys, fires);
        let replayed = replay.simulate();
        assert_eq!(replayed, *result);
        assert_eq!(replay, *after);
        checked += 1;
    });
    assert!(checked > 0);
}
