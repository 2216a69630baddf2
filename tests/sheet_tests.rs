//! Integration tests for data-driven stats.
//!
//! These tests verify:
//! - Loading descriptors from JSON and building sheets
//! - Operator resolution failures surfacing as errors
//! - Equipment-style source removal across a sheet
//! - Save/load through snapshots

use modstat::descriptor::load_descriptors;
use modstat::*;
use std::collections::BTreeMap;

const CHARACTER_STATS: &str = r#"[
    { "stat": "HP", "initial_value": 100, "min_value": 0, "max_value": 150, "operator": "int" },
    { "stat": "AP", "initial_value": 12, "min_value": 0, "max_value": 99, "operator": "int" },
    { "stat": "MoveSpeed", "initial_value": 5, "min_value": 1, "max_value": 10, "operator": "int" }
]"#;

fn character() -> StatSheet<i32> {
    let descriptors = load_descriptors::<i32>(CHARACTER_STATS).unwrap();
    StatSheet::from_descriptors(&descriptors, &OperatorRegistry::with_defaults()).unwrap()
}

// ============================================================================
// Loading
// ============================================================================

#[test]
fn test_sheet_from_json() {
    let sheet = character();
    assert_eq!(sheet.len(), 3);
    assert_eq!(sheet.current_value(&StatId::from_str("HP")), Some(100));
    assert_eq!(sheet.current_value(&StatId::from_str("MoveSpeed")), Some(5));
    assert_eq!(sheet.current_value(&StatId::from_str("MP")), None);
}

#[test]
fn test_missing_operator_fails_fast() {
    let descriptors = load_descriptors::<i32>(CHARACTER_STATS).unwrap();
    let mut registry = OperatorRegistry::new();
    registry.register_numeric::<f32>();

    let err = StatSheet::from_descriptors(&descriptors, &registry).unwrap_err();
    assert_eq!(
        err,
        StatError::OperatorNotRegistered {
            kind: OperatorKind::Int
        }
    );
}

#[test]
fn test_wrong_operator_for_type_fails_fast() {
    let descriptors = load_descriptors::<f32>(
        r#"[{ "stat": "Speed", "initial_value": 1.5, "min_value": 0.0, "max_value": 3.0, "operator": "int" }]"#,
    )
    .unwrap();

    let err = StatSheet::from_descriptors(&descriptors, &OperatorRegistry::with_defaults())
        .unwrap_err();
    assert!(matches!(err, StatError::OperatorTypeMismatch { .. }));
}

#[test]
fn test_descriptor_round_trip_through_json() {
    let descriptor = StatDescriptor::with_default_operator("Crit", 0.05_f64, 0.0, 1.0);
    let json = serde_json::to_string(&descriptor).unwrap();
    assert!(json.contains("\"operator\":\"double\""));

    let parsed = StatDescriptor::<f64>::from_json(&json).unwrap();
    assert_eq!(parsed, descriptor);
}

// ============================================================================
// Equipment
// ============================================================================

#[test]
fn test_unequip_removes_item_bonuses_everywhere() {
    let mut sheet = character();
    let hp = StatId::from_str("HP");
    let ap = StatId::from_str("AP");
    let armor = SourceId::new(10);
    let ring = SourceId::new(11);

    sheet
        .get_mut(&hp)
        .unwrap()
        .add_modifier(StatModifier::flat(30).with_source(armor));
    sheet
        .get_mut(&ap)
        .unwrap()
        .add_modifier(StatModifier::flat(-2).with_source(armor));
    sheet
        .get_mut(&ap)
        .unwrap()
        .add_modifier(StatModifier::percent_mult(1).with_source(ring).with_order(1));

    assert_eq!(sheet.current_value(&hp), Some(130));
    assert_eq!(sheet.current_value(&ap), Some(20));

    assert_eq!(sheet.remove_modifiers_by_source(armor), 2);
    assert_eq!(sheet.current_value(&hp), Some(100));
    assert_eq!(sheet.current_value(&ap), Some(24));

    assert_eq!(sheet.remove_modifiers_by_source(armor), 0);
}

// ============================================================================
// Save / load
// ============================================================================

#[test]
fn test_snapshot_survives_json() {
    let mut sheet = character();
    let hp = StatId::from_str("HP");
    sheet.get_mut(&hp).unwrap().subtract_base_value(35);
    sheet.get_mut(&hp).unwrap().add_max_value(50);

    let saved = serde_json::to_string(&sheet.snapshot()).unwrap();

    let mut loaded = character();
    let snapshots: BTreeMap<StatId, StatSnapshot<i32>> = serde_json::from_str(&saved).unwrap();
    loaded.restore(&snapshots).unwrap();

    let stat = loaded.get(&hp).unwrap();
    assert_eq!(stat.base_value(), 65);
    assert_eq!(stat.max_value(), 200);
    // restore does not move the reset point
    assert_eq!(stat.initial_value(), 100);
}

#[test]
fn test_restore_keeps_modifiers() {
    let mut sheet = character();
    let ap = StatId::from_str("AP");
    sheet
        .get_mut(&ap)
        .unwrap()
        .add_modifier(StatModifier::flat(3));

    let mut snapshots = BTreeMap::new();
    snapshots.insert(
        ap.clone(),
        StatSnapshot {
            base_value: 20,
            min_value: 0,
            max_value: 99,
        },
    );
    sheet.restore(&snapshots).unwrap();

    assert_eq!(sheet.current_value(&ap), Some(23));
}

// ============================================================================
// Fixed point
// ============================================================================

#[cfg(feature = "fixed-point")]
#[test]
fn test_fixed_point_stat() {
    let registry = OperatorRegistry::with_defaults();
    let descriptor = StatDescriptor::new(
        "Gold",
        FixedPoint::from_int(100),
        FixedPoint::from_int(0),
        FixedPoint::from_int(1000),
        OperatorKind::Fixed,
    );
    let mut gold = descriptor.build(&registry).unwrap();
    gold.add_modifier(StatModifier::percent_add(FixedPoint::from_f64(0.10)));
    gold.add_modifier(StatModifier::percent_add(FixedPoint::from_f64(0.20)));

    assert_eq!(gold.current_value(), FixedPoint::from_int(130));
}

#[cfg(feature = "fixed-point")]
#[test]
fn test_fixed_point_scale_out_of_range_is_config_error() {
    let err = load_descriptors::<FixedPoint>(
        r#"[{
            "stat": "Gold",
            "initial_value": { "value": 1, "scale": 40 },
            "min_value": { "value": 0, "scale": 4 },
            "max_value": { "value": 10000000, "scale": 4 },
            "operator": "fixed"
        }]"#,
    )
    .unwrap_err();
    assert!(matches!(err, StatError::Config(_)));

    let descriptors = load_descriptors::<FixedPoint>(
        r#"[{
            "stat": "Gold",
            "initial_value": { "value": 1, "scale": 18 },
            "min_value": { "value": 0, "scale": 0 },
            "max_value": { "value": 1000, "scale": 0 },
            "operator": "fixed"
        }]"#,
    )
    .unwrap();
    let gold = descriptors[0].build(&OperatorRegistry::with_defaults()).unwrap();
    assert_eq!(gold.current_value(), FixedPoint::new(1, 18));
}
