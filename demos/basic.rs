//! Basic example: a single stat with layered modifiers
//!
//! This example demonstrates:
//! - Creating a stat with bounds
//! - Flat, additive-percent and multiplicative-percent modifiers
//! - Listening for value changes
//! - Inspecting a breakdown

use modstat::*;

fn main() {
    tracing_subscriber::fmt()
        .with_env_filter(tracing_subscriber::EnvFilter::from_default_env())
        .init();

    let mut attack = Stat::with_default_operator(100.0_f64, 0.0, 1000.0);

    attack.register_listener(|stat: &Stat<f64>| {
        println!("  -> attack is now {:.2}", stat.current_value());
    });

    println!("Adding +50 flat:");
    attack.add_modifier(StatModifier::flat(50.0));

    println!("Adding +10% and +20% (summed):");
    attack.add_modifier(StatModifier::percent_add(0.10).with_order(1));
    attack.add_modifier(StatModifier::percent_add(0.20).with_order(1));

    println!("Adding x1.5 (compounding):");
    attack.add_modifier(StatModifier::percent_mult(0.50).with_order(2));

    let breakdown = attack.breakdown();
    println!("\n=== Breakdown ===");
    println!("Base: {:.2}", breakdown.base_value);
    for (description, value) in &breakdown.steps {
        println!("  {}: {:.2}", description, value);
    }
    println!("Final: {:.2}", breakdown.value);
    println!("Ratio: {:.3}", attack.ratio());

    println!("\nResetting:");
    attack.reset();
}
