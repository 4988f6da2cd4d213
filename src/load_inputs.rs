//! Contains wrappers for loading the numeric CSV inputs from files.

use std::fs::read_to_string;

/// Load and parse a CSV file of decimal numbers (scientific notation accepted).
/// Empty lines are skipped. Return an error naming the file or the offending field.
pub fn load_numeric_csv(path: &str) -> Result<Vec<Vec<f64>>, String> {
    let content = read_to_string(path).map_err(|e| format!("Couldn't read file `{path}`: {e}"))?;
    parse_numeric_csv(&content)
}

/// Parse CSV content: one comma-separated list of numbers per non-empty line.
pub fn parse_numeric_csv(content: &str) -> Result<Vec<Vec<f64>>, String> {
    let mut rows: Vec<Vec<f64>> = Vec::new();
    for line in content.lines() {
        let trimmed = line.trim();
        if trimmed.is_empty() {
            continue;
        }
        let mut row = Vec::new();
        for field in trimmed.split(',') {
            let value: f64 = field
                .trim()
                .parse()
                .map_err(|_| format!("Incorrect content detected: `{}`", field.trim()))?;
            row.push(value);
        }
        rows.push(row);
    }
    Ok(rows)
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    /// Decimal and scientific fields parse; empty lines are skipped.
    fn test_parse() {
        let content = "1,2.5,3\n\n-4e2, 5 \n";
        let rows = parse_numeric_csv(content).unwrap();
        assert_eq!(rows, vec![vec![1.0, 2.5, 3.0], vec![-400.0, 5.0]]);
    }

    #[test]
    /// Bad fields are reported with the offending value.
    fn test_parse_error() {
        let error = parse_numeric_csv("1,two,3").unwrap_err();
        assert!(error.contains("two"));
        assert!(load_numeric_csv("/definitely/not/a/file.csv").is_err());
    }
}
