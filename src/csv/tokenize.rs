//! Split one physical line into fields.
use thiserror::Error;

const QUOTE: char = '"';

#[derive(Error, Debug, Clone, Copy, PartialEq, Eq)]
pub enum TokenizeError {
    /// A quoted section opened at this 1-based column was still open at end of line.
    #[error("quote opened at column {column} is never closed")]
    UnterminatedQuote { column: usize },
}

/// Tokenize a single line on `delimiter`, honoring `"` quoting.
///
/// - `""` inside quotes is one literal quote.
/// - A lone quote toggles quoting, including mid-field (`ab"c,d"e` is one field).
/// - Fields that were never quoted are trimmed; quoted fields keep their whitespace.
/// - An empty line is a single empty field.
pub fn tokenize(line: &str, delimiter: char) -> Result<Vec<String>, TokenizeError> {
    let mut chars = line.chars().peekable();
    let mut row: Vec<String> = Vec::new();
    let mut current_field = String::new();
    let mut within_quotes = false;
    let mut was_quoted = false;
    let mut column = 0;
    let mut opened_at = 0;

    while let Some(ch) = chars.next() {
        column += 1;
        if ch == QUOTE {
            if within_quotes && chars.peek() == Some(&QUOTE) {
                current_field.push(QUOTE);
                chars.next();
                column += 1;
            } else {
                if !within_quotes {
                    was_quoted = true;
                    opened_at = column;
                }
                within_quotes = !within_quotes;
            }
        } else if ch == delimiter && !within_quotes {
            row.push(finish_field(current_field, was_quoted));
            current_field = String::new();
            was_quoted = false;
        } else {
            current_field.push(ch);
        }
    }

    if within_quotes {
        return Err(TokenizeError::UnterminatedQuote { column: opened_at });
    }
    row.push(finish_field(current_field, was_quoted));
    Ok(row)
}

fn finish_field(field: String, was_quoted: bool) -> String {
    if was_quoted {
        field
    } else {
        field.trim().to_string()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use proptest::prelude::*;

    fn fields(line: &str) -> Vec<String> {
        tokenize(line, ',').unwrap()
    }

    #[test]
    fn test_plain_fields() {
        assert_eq!(fields("name,age"), vec!["name", "age"]);
        assert_eq!(fields("Bob,thirty"), vec!["Bob", "thirty"]);
    }

    #[test]
    fn test_escaped_quotes() {
        assert_eq!(
            fields(r#""Alice ""The Ace""",23"#),
            vec![r#"Alice "The Ace""#, "23"]
        );
    }

    #[test]
    fn test_embedded_delimiters_and_quotes() {
        assert_eq!(
            fields(r#"1,"Alice, A.",23,"Loves ""coding"", enjoys pizza""#),
            vec!["1", "Alice, A.", "23", r#"Loves "coding", enjoys pizza"#]
        );
        assert_eq!(
            fields(r#"2,Bob,thirty,"Favorite city: ""San Francisco, CA""""#),
            vec!["2", "Bob", "thirty", r#"Favorite city: "San Francisco, CA""#]
        );
    }

    #[test]
    fn test_whitespace_trimmed_unless_quoted() {
        assert_eq!(fields("  Alice  ,  23 "), vec!["Alice", "23"]);
        assert_eq!(fields(r#"" Alice ",  23"#), vec![" Alice ", "23"]);
    }

    #[test]
    fn test_empty_edges() {
        assert_eq!(fields(",Alice"), vec!["", "Alice"]);
        assert_eq!(fields("Bob,"), vec!["Bob", ""]);
        assert_eq!(fields(""), vec![""]);
        assert_eq!(fields(r#""""#), vec![""]);
    }

    #[test]
    fn test_mid_field_quote_enters_quoted_mode() {
        assert_eq!(fields(r#"ab"c,d"e,f"#), vec!["abc,de", "f"]);
        assert_eq!(fields(r#" x"y" "#), vec![" xy "]);
    }

    #[test]
    fn test_other_delimiters() {
        assert_eq!(tokenize("a;b;\"c;d\"", ';').unwrap(), vec!["a", "b", "c;d"]);
        assert_eq!(tokenize("a\t b\t", '\t').unwrap(), vec!["a", "b", ""]);
        assert_eq!(tokenize("a,b", '|').unwrap(), vec!["a,b"]);
    }

    #[test]
    fn test_unterminated_quote() {
        assert_eq!(
            tokenize(r#"Alice,"unfinished"#, ','),
            Err(TokenizeError::UnterminatedQuote { column: 7 })
        );
        assert_eq!(
            tokenize(r#""a""b"#, ','),
            Err(TokenizeError::UnterminatedQuote { column: 1 })
        );
    }

    proptest! {
        #[test]
        fn join_round_trips(raw in prop::collection::vec("[a-z0-9 ]{0,10}", 1..8)) {
            let cells: Vec<String> = raw.iter().map(|c| c.trim().to_string()).collect();
            let line = cells.join(",");
            prop_assert_eq!(tokenize(&line, ',').unwrap(), cells);
        }

        #[test]
        fn quoted_whitespace_is_preserved(cell in "[ a-z,]{0,12}") {
            let line = format!("\"{cell}\",x");
            prop_assert_eq!(tokenize(&line, ',').unwrap(), vec![cell, "x".to_string()]);
        }
    }
}
