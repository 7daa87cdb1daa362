//! List predicates command implementation.

use archgraph_core::builtin;

/// Runs the list-predicates command.
pub fn run() {
    println!("Built-in predicates:\n");
    println!("{:<22} {:<20} Description", "Name", "Applies to");
    println!("{}", "-".repeat(80));

    for (name, predicate) in builtin::all() {
        println!(
            "{:<22} {:<20} {}",
            name,
            predicate.kinds().to_string(),
            predicate.description()
        );
    }

    println!("\nCombine them in code with `and`, `or` and `not`, e.g.:");
    println!("  builtin::lookup(\"public\") and reside_in(\"..api..\")");
}
