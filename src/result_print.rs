//! Printing of solver results: a fixed-width formula/rate table followed by a
//! target-language-neutral code rendering of each listed formula.

use std::io::Write;
use termcolor::{Color, ColorChoice, ColorSpec, StandardStream, WriteColor};

/// How many results to print from each pool.
pub const NUMBER_OF_RESULTS: usize = 20;

/// Column width of the formula strings.
pub const FORMULA_WIDTH: usize = 70;

/// Column width of the rates.
pub const RATE_WIDTH: usize = 10;

/// Decimal digits printed for rates.
pub const RATE_PRECISION: usize = 8;

/// One printable result row.
pub struct DisplayRow {
    pub text: String,
    pub code: String,
    pub rate: f64,
    pub perfect: bool,
}

/// Print a titled table of formulas and rates (best first), then the code
/// section. Verified perfect matches print a green 1.0 regardless of the
/// capped rate their evaluator reported.
pub fn print_solution_table(title: &str, rows: &[DisplayRow]) {
    let mut stdout = StandardStream::stdout(ColorChoice::Auto);

    writeln!(&mut stdout, "\n{title}").unwrap();
    writeln!(
        &mut stdout,
        "{:<formula_width$}{:>rate_width$}",
        "Formula:",
        "Rate:",
        formula_width = FORMULA_WIDTH,
        rate_width = RATE_WIDTH
    )
    .unwrap();

    for row in rows.iter().take(NUMBER_OF_RESULTS) {
        write!(
            &mut stdout,
            "{:<formula_width$}",
            row.text,
            formula_width = FORMULA_WIDTH
        )
        .unwrap();
        if row.perfect {
            stdout
                .set_color(ColorSpec::new().set_fg(Some(Color::Green)))
                .unwrap();
            writeln!(
                &mut stdout,
                "{:>rate_width$.precision$}",
                1.0,
                rate_width = RATE_WIDTH,
                precision = RATE_PRECISION
            )
            .unwrap();
            stdout.reset().unwrap();
        } else {
            writeln!(
                &mut stdout,
                "{:>rate_width$.precision$}",
                row.rate,
                rate_width = RATE_WIDTH,
                precision = RATE_PRECISION
            )
            .unwrap();
        }
    }

    if !rows.is_empty() {
        writeln!(&mut stdout, "\nCode (for integration):").unwrap();
        for (index, row) in rows.iter().take(NUMBER_OF_RESULTS).enumerate() {
            writeln!(&mut stdout, "// Formula {}: {}", index + 1, row.text).unwrap();
            writeln!(&mut stdout, "result = {};", row.code).unwrap();
            writeln!(&mut stdout).unwrap();
        }
    }
}
