//! CSV header parsing and delimiter detection.

/// Delimiters tried when sniffing the header line, in preference order.
const CANDIDATE_DELIMITERS: [u8; 3] = [b',', b';', b'\t'];

/// Result of CSV header analysis.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct CsvHeaders {
    /// Trimmed column names in file order.
    pub columns: Vec<String>,
    /// Field separator detected from the header line.
    pub delimiter: u8,
}

impl CsvHeaders {
    pub fn new(columns: Vec<String>, delimiter: u8) -> Self {
        Self { columns, delimiter }
    }

    /// Returns the number of columns.
    pub fn len(&self) -> usize {
        self.columns.len()
    }

    /// Returns true if there are no columns.
    pub fn is_empty(&self) -> bool {
        self.columns.is_empty()
    }

    pub fn contains(&self, column: &str) -> bool {
        self.columns.iter().any(|c| c == column)
    }

    /// Returns the configured columns that are absent, preserving input order.
    pub fn missing<'a>(&self, required: &[&'a str]) -> Vec<&'a str> {
        required
            .iter()
            .copied()
            .filter(|column| !self.contains(column))
            .collect()
    }
}

/// Picks the candidate delimiter that splits the header into the most fields.
///
/// Falls back to a comma when no candidate occurs outside quotes.
pub fn detect_delimiter(line: &str) -> u8 {
    let mut best = b',';
    let mut best_fields = 1;
    for delimiter in CANDIDATE_DELIMITERS {
        let fields = parse_csv_line(line, delimiter).len();
        if fields > best_fields {
            best = delimiter;
            best_fields = fields;
        }
    }
    best
}

/// Parses a CSV line into trimmed fields, handling quoted values.
pub fn parse_csv_line(line: &str, delimiter: u8) -> Vec<String> {
    let delimiter = char::from(delimiter);
    let mut fields = Vec::new();
    let mut current = String::new();
    let mut in_quotes = false;
    let mut chars = line.chars().peekable();

    while let Some(c) = chars.next() {
        match c {
            '"' if !in_quotes => {
                in_quotes = true;
            }
            '"' if in_quotes => {
                // Escaped quote ("")
                if chars.peek() == Some(&'"') {
                    current.push('"');
                    chars.next();
                } else {
                    in_quotes = false;
                }
            }
            c if c == delimiter && !in_quotes => {
                fields.push(current.trim().to_string());
                current.clear();
            }
            _ => {
                current.push(c);
            }
        }
    }

    fields.push(current.trim().to_string());
    fields
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_parse_quoted_fields() {
        let fields = parse_csv_line(r#"id,"Order, Date","say ""hi""""#, b',');
        assert_eq!(fields, vec!["id", "Order, Date", r#"say "hi""#]);
    }

    #[test]
    fn test_detect_semicolon() {
        assert_eq!(detect_delimiter("customer;date;amount"), b';');
        assert_eq!(detect_delimiter("customer\tdate\tamount"), b'\t');
        assert_eq!(detect_delimiter("customer,date,amount"), b',');
    }

    #[test]
    fn test_detect_ignores_quoted_delimiters() {
        assert_eq!(detect_delimiter(r#""a;b",c,d"#), b',');
    }

    #[test]
    fn test_single_column_defaults_to_comma() {
        assert_eq!(detect_delimiter("amount"), b',');
    }

    #[test]
    fn test_missing_preserves_order() {
        let headers = CsvHeaders::new(vec!["customer_id".to_string(), "amount".to_string()], b',');
        assert_eq!(
            headers.missing(&["customer_id", "timestamp", "amount", "region"]),
            vec!["timestamp", "region"]
        );
    }
}
