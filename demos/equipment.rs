//! Equipment example: a character sheet loaded from data
//!
//! This example demonstrates:
//! - Loading stat descriptors from JSON
//! - Equipping items as sourced modifiers
//! - Unequipping by source across every stat
//! - Saving and restoring base values

use modstat::descriptor::load_descriptors;
use modstat::*;

const STATS: &str = r#"[
    { "stat": "HP", "initial_value": 120, "min_value": 0, "max_value": 500, "operator": "int" },
    { "stat": "AP", "initial_value": 15, "min_value": 0, "max_value": 99, "operator": "int" }
]"#;

fn print_sheet(sheet: &StatSheet<i32>) {
    for id in sheet.ids() {
        if let Some(stat) = sheet.get(&id) {
            println!(
                "  {:<3} {:>4} (base {}, {} modifiers)",
                id,
                stat.current_value(),
                stat.base_value(),
                stat.modifier_count()
            );
        }
    }
}

fn main() -> Result<(), StatError> {
    tracing_subscriber::fmt()
        .with_env_filter(tracing_subscriber::EnvFilter::from_default_env())
        .init();

    let registry = OperatorRegistry::with_defaults();
    let descriptors = load_descriptors::<i32>(STATS)?;
    let mut sheet = StatSheet::from_descriptors(&descriptors, &registry)?;

    let hp = StatId::from_str("HP");
    let ap = StatId::from_str("AP");
    let plate = SourceId::new(1);
    let ring = SourceId::new(2);

    println!("Fresh character:");
    print_sheet(&sheet);

    if let Some(stat) = sheet.get_mut(&hp) {
        stat.add_modifier(StatModifier::flat(80).with_source(plate));
    }
    if let Some(stat) = sheet.get_mut(&ap) {
        stat.add_modifier(StatModifier::flat(-3).with_source(plate));
        stat.add_modifier(StatModifier::percent_mult(1).with_source(ring).with_order(1));
    }
    println!("\nWith plate armor and ring:");
    print_sheet(&sheet);

    let affected = sheet.remove_modifiers_by_source(plate);
    println!("\nRemoved plate armor ({} stats affected):", affected);
    print_sheet(&sheet);

    if let Some(stat) = sheet.get_mut(&hp) {
        stat.subtract_base_value(45);
    }
    let saved = serde_json::to_string_pretty(&sheet.snapshot())?;
    println!("\nSaved:\n{}", saved);

    sheet.reset_all();
    println!("\nAfter reset:");
    print_sheet(&sheet);

    Ok(())
}
