//! Minimal RFC 4180 reader and field quoting for roster files.

/// Splits `input` into records. Quoted fields may hold commas, doubled
/// quotes and line breaks. Both CRLF and LF end a record; blank lines yield
/// no record.
pub(crate) fn parse_records(input: &str) -> Vec<Vec<String>> {
    let mut records = Vec::new();
    let mut record: Vec<String> = Vec::new();
    let mut field = String::new();
    let mut in_quotes = false;
    let mut quoted = false;
    let mut chars = input.chars().peekable();

    while let Some(ch) = chars.next() {
        if in_quotes {
            if ch == '"' {
                if chars.peek() == Some(&'"') {
                    field.push('"');
                    chars.next();
                } else {
                    in_quotes = false;
                }
            } else {
                field.push(ch);
            }
            continue;
        }

        match ch {
            '"' => {
                in_quotes = true;
                quoted = true;
            }
            ',' => record.push(std::mem::take(&mut field)),
            '\r' if chars.peek() == Some(&'\n') => {}
            '\n' | '\r' => finish_record(&mut records, &mut record, &mut field, &mut quoted),
            _ => field.push(ch),
        }
    }
    finish_record(&mut records, &mut record, &mut field, &mut quoted);

    records
}

/// A line is blank only when it holds no separator and no quotes; `""`
/// alone is a record with one empty field.
fn finish_record(
    records: &mut Vec<Vec<String>>,
    record: &mut Vec<String>,
    field: &mut String,
    quoted: &mut bool,
) {
    let blank = record.is_empty() && field.is_empty() && !*quoted;
    *quoted = false;
    if blank {
        return;
    }
    record.push(std::mem::take(field));
    records.push(std::mem::take(record));
}

pub(crate) fn quote(value: &str) -> String {
    if value.contains([',', '"', '\n', '\r']) {
        format!("\"{}\"", value.replace('"', "\"\""))
    } else {
        value.to_string()
    }
}

pub(crate) fn write_row(out: &mut String, fields: &[String]) {
    let line = fields.iter().map(|field| quote(field)).collect::<Vec<_>>().join(",");
    out.push_str(&line);
    out.push_str("\r\n");
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn parses_quoted_fields_with_commas_quotes_and_newlines() {
        let input = "name,notes\r\n\"Doe, Jane\",\"said \"\"hi\"\"\nthen left\"\r\n";
        let records = parse_records(input);
        assert_eq!(
            records,
            vec![
                vec!["name".to_string(), "notes".to_string()],
                vec!["Doe, Jane".to_string(), "said \"hi\"\nthen left".to_string()],
            ]
        );
    }

    #[test]
    fn skips_blank_lines_and_keeps_trailing_empty_fields() {
        let records = parse_records("a,b\n\n1,\n\r\n2,3");
        assert_eq!(
            records,
            vec![
                vec!["a".to_string(), "b".to_string()],
                vec!["1".to_string(), String::new()],
                vec!["2".to_string(), "3".to_string()],
            ]
        );
    }

    #[test]
    fn quoted_empty_line_is_a_record() {
        let records = parse_records("notes\n\"\"\n\nlast\n");
        assert_eq!(
            records,
            vec![vec!["notes".to_string()], vec![String::new()], vec!["last".to_string()]]
        );
    }

    #[test]
    fn quote_escapes_only_when_needed() {
        assert_eq!(quote("plain"), "plain");
        assert_eq!(quote("a,b"), "\"a,b\"");
        assert_eq!(quote("say \"x\""), "\"say \"\"x\"\"\"");
        assert_eq!(quote("two\nlines"), "\"two\nlines\"");
    }

    #[test]
    fn written_rows_parse_back() {
        let mut out = String::new();
        write_row(&mut out, &["Doe, Jane".to_string(), "72.5".to_string()]);
        assert_eq!(out, "\"Doe, Jane\",72.5\r\n");
        assert_eq!(parse_records(&out), vec![vec!["Doe, Jane".to_string(), "72.5".to_string()]]);
    }
}
