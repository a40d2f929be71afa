//! Minimal comma-separated row reader shared by the table and sheet loaders.
//!
//! Only what the inputs need: ordered rows, trimmed fields, double-quoted
//! fields with `""` escapes, and the source line of every row.

/// One non-blank input line split into fields
#[derive(Debug, Clone, PartialEq)]
pub struct Row {
    /// 1-based line number in the source file
    pub line: usize,
    pub fields: Vec<String>,
}

impl Row {
    pub fn field(&self, index: usize) -> Option<&str> {
        self.fields.get(index).map(String::as_str)
    }
}

/// Split `source` into rows, skipping blank lines and a leading byte order
/// mark.
///
/// Returns the line number and a message for an unterminated quote; callers
/// wrap it into their own error variant.
pub fn read_rows(source: &str) -> Result<Vec<Row>, (usize, String)> {
    let mut rows = Vec::new();
    let source = source.strip_prefix('\u{feff}').unwrap_or(source);

    for (i, raw) in source.split('\n').enumerate() {
        let line = i + 1;
        let text = raw.strip_suffix('\r').unwrap_or(raw);
        if text.trim().is_empty() {
            continue;
        }
        let fields = split_fields(text).map_err(|message| (line, message))?;
        rows.push(Row { line, fields });
    }

    Ok(rows)
}

fn split_fields(text: &str) -> Result<Vec<String>, String> {
    let mut fields = Vec::new();
    let mut chars = text.chars().peekable();
    let mut current = String::new();
    let mut quoted = false;
    let mut in_quotes = false;

    while let Some(c) = chars.next() {
        if in_quotes {
            match c {
                '"' if chars.peek() == Some(&'"') => {
                    chars.next();
                    current.push('"');
                }
                '"' => in_quotes = false,
                _ => current.push(c),
            }
            continue;
        }

        match c {
            ',' => {
                fields.push(finish_field(&current, quoted));
                current.clear();
                quoted = false;
            }
            // Opening quote is only recognised at the start of a field
            '"' if current.trim().is_empty() && !quoted => {
                current.clear();
                quoted = true;
                in_quotes = true;
            }
            _ => current.push(c),
        }
    }

    if in_quotes {
        return Err("unterminated quoted field".to_string());
    }
    fields.push(finish_field(&current, quoted));
    Ok(fields)
}

fn finish_field(current: &str, quoted: bool) -> String {
    if quoted {
        // Keep the quoted content intact, only drop padding after the closing quote
        current.trim_end().to_string()
    } else {
        current.trim().to_string()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_plain_rows() {
        let rows = read_rows("a,1\nb, 2 \n").unwrap();
        assert_eq!(rows.len(), 2);
        assert_eq!(rows[0].fields, vec!["a", "1"]);
        assert_eq!(rows[1].fields, vec!["b", "2"]);
        assert_eq!(rows[1].line, 2);
    }

    #[test]
    fn test_blank_lines_skipped_but_counted() {
        let rows = read_rows("\n  \na,1\r\n\nb,2").unwrap();
        assert_eq!(rows.len(), 2);
        assert_eq!(rows[0].line, 3);
        assert_eq!(rows[1].line, 5);
        assert_eq!(rows[0].fields, vec!["a", "1"]);
    }

    #[test]
    fn test_quoted_field_with_comma_and_escape() {
        let rows = read_rows(r#""C#/Db",277.18,"say ""hi"", ok""#).unwrap();
        assert_eq!(rows[0].fields, vec!["C#/Db", "277.18", r#"say "hi", ok"#]);
    }

    #[test]
    fn test_empty_fields_preserved() {
        let rows = read_rows("a,,").unwrap();
        assert_eq!(rows[0].fields, vec!["a", "", ""]);
        assert_eq!(rows[0].field(1), Some(""));
        assert_eq!(rows[0].field(3), None);
    }

    #[test]
    fn test_byte_order_mark_stripped() {
        let rows = read_rows("\u{feff}Note,Frequency\nc,1\n").unwrap();
        assert_eq!(rows[0].fields, vec!["Note", "Frequency"]);
        assert_eq!(rows[0].line, 1);
    }

    #[test]
    fn test_unterminated_quote() {
        let err = read_rows("a,1\n\"b,2\n").unwrap_err();
        assert_eq!(err.0, 2);
        assert!(err.1.contains("unterminated"));
    }
}
