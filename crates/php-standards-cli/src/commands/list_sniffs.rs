//! List sniffs command implementation.

use php_standards_sniffs::all_sniffs;

/// Runs the list-sniffs command.
pub fn run() {
    println!("Available sniffs:\n");
    println!("{:<8} {:<32} Description", "Code", "Name");
    println!("{}", "-".repeat(90));

    for sniff in all_sniffs() {
        println!(
            "{:<8} {:<32} {}",
            sniff.code(),
            sniff.name(),
            sniff.description()
        );
    }

    println!("\nPresets:");
    println!("  standard  - PS001 to PS005 (default)");
    println!("  minimal   - PS001 only (for gradual adoption)");

    println!("\nUse --sniffs to run specific sniffs, e.g.:");
    println!("  php-standards check --sniffs strict-declaration,yoda-condition");
    println!("  php-standards check --sniffs PS001,PS004");
}
