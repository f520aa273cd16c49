//! Text output formatter

use linty_core::Outcome;

pub fn output_text(outcome: &Outcome) {
    for failure in &outcome.failures {
        println!("Lint failed for file: {}", failure.file.display());
        if let Some(detail) = &failure.detail {
            println!("Error: {}", detail);
        }
    }

    if outcome.passed {
        println!("All lint checks passed!");
    } else {
        println!();
        println!(
            "Checked {} files, {} failed",
            outcome.checked,
            outcome.failures.len()
        );
    }
}
