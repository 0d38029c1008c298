use super::ZoneParseError;
use std::iter::Peekable;
use std::str::Chars;

#[derive(Debug, Clone, PartialEq, Eq)]
pub(crate) struct Token {
    pub text: String,
    pub quoted: bool,
}

/// One record or directive, possibly spanning several physical lines
/// through parentheses.
#[derive(Debug, Clone)]
pub(crate) struct LogicalLine {
    pub line: usize,
    /// Physical line started with whitespace: the owner is inherited.
    pub blank_owner: bool,
    pub tokens: Vec<Token>,
}

pub(crate) fn tokenize(text: &str, source_name: &str) -> Result<Vec<LogicalLine>, ZoneParseError> {
    let mut lines = Vec::new();
    let mut chars = text.chars().peekable();

    let mut line_no = 1usize;
    let mut at_line_start = true;
    let mut depth = 0usize;
    let mut current: Option<LogicalLine> = None;
    let mut buf = String::new();

    fn flush_token(buf: &mut String, current: &mut Option<LogicalLine>, quoted: bool) {
        if buf.is_empty() && !quoted {
            return;
        }
        if let Some(line) = current.as_mut() {
            line.tokens.push(Token {
                text: std::mem::take(buf),
                quoted,
            });
        }
    }

    while let Some(c) = chars.next() {
        if current.is_none() {
            current = Some(LogicalLine {
                line: line_no,
                blank_owner: at_line_start && (c == ' ' || c == '\t'),
                tokens: Vec::new(),
            });
        }
        at_line_start = false;

        match c {
            '\n' => {
                flush_token(&mut buf, &mut current, false);
                line_no += 1;
                at_line_start = true;
                if depth == 0 {
                    if let Some(line) = current.take() {
                        if !line.tokens.is_empty() {
                            lines.push(line);
                        }
                    }
                }
            }
            ';' => {
                flush_token(&mut buf, &mut current, false);
                while let Some(&next) = chars.peek() {
                    if next == '\n' {
                        break;
                    }
                    chars.next();
                }
            }
            '"' => {
                flush_token(&mut buf, &mut current, false);
                let start_line = line_no;
                let mut closed = false;
                while let Some(q) = chars.next() {
                    match q {
                        '\\' => {
                            let escaped = read_escape(&mut chars, true)
                                .map_err(|e| ZoneParseError::new(source_name, line_no, e))?;
                            if escaped == '\n' {
                                line_no += 1;
                            }
                            buf.push(escaped);
                        }
                        '"' => {
                            closed = true;
                            break;
                        }
                        '\n' => {
                            line_no += 1;
                            buf.push(q);
                        }
                        _ => buf.push(q),
                    }
                }
                if !closed {
                    return Err(ZoneParseError::new(
                        source_name,
                        start_line,
                        "unterminated quoted string",
                    ));
                }
                flush_token(&mut buf, &mut current, true);
            }
            '(' => {
                flush_token(&mut buf, &mut current, false);
                depth += 1;
            }
            ')' => {
                flush_token(&mut buf, &mut current, false);
                if depth == 0 {
                    return Err(ZoneParseError::new(source_name, line_no, "unbalanced ')'"));
                }
                depth -= 1;
            }
            '\\' => {
                let escaped = read_escape(&mut chars, false)
                    .map_err(|e| ZoneParseError::new(source_name, line_no, e))?;
                buf.push(escaped);
            }
            ' ' | '\t' | '\r' => flush_token(&mut buf, &mut current, false),
            _ => buf.push(c),
        }
    }

    if depth > 0 {
        return Err(ZoneParseError::new(source_name, line_no, "unbalanced '('"));
    }

    flush_token(&mut buf, &mut current, false);
    if let Some(line) = current.take() {
        if !line.tokens.is_empty() {
            lines.push(line);
        }
    }

    Ok(lines)
}

/// Reads the rest of a `\X` or `\DDD` escape (the backslash is consumed).
///
/// Names are kept as dotted text, so an escaped dot inside an unquoted
/// label cannot be represented and is rejected.
fn read_escape(chars: &mut Peekable<Chars<'_>>, quoted: bool) -> Result<char, String> {
    let first = chars
        .next()
        .ok_or_else(|| "backslash at end of input".to_string())?;

    if let Some(mut value) = first.to_digit(10) {
        for _ in 0..2 {
            let digit = chars
                .next_if(char::is_ascii_digit)
                .and_then(|d| d.to_digit(10))
                .ok_or_else(|| "\\DDD escape needs three decimal digits".to_string())?;
            value = value * 10 + digit;
        }
        let byte = u8::try_from(value).map_err(|_| format!("\\{value} is not an octet value"))?;
        return Ok(char::from(byte));
    }

    match first {
        '.' if !quoted => Err("escaped '.' inside a label is not supported".to_string()),
        '\n' if !quoted => Err("backslash at end of line".to_string()),
        other => Ok(other),
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn texts(line: &LogicalLine) -> Vec<&str> {
        line.tokens.iter().map(|t| t.text.as_str()).collect()
    }

    #[test]
    fn test_comments_and_blank_lines_are_skipped() {
        let lines = tokenize("; header\n\nwww 60 A 1.2.3.4 ; trailing\n", "t").unwrap();
        assert_eq!(lines.len(), 1);
        assert_eq!(texts(&lines[0]), vec!["www", "60", "A", "1.2.3.4"]);
        assert_eq!(lines[0].line, 3);
    }

    #[test]
    fn test_parentheses_join_lines() {
        let lines = tokenize("srv 60 SRV ( 0 5\n 12345 target )\nnext 60 A 1.1.1.1", "t").unwrap();
        assert_eq!(lines.len(), 2);
        assert_eq!(texts(&lines[0]), vec!["srv", "60", "SRV", "0", "5", "12345", "target"]);
    }

    #[test]
    fn test_quoted_strings_keep_spaces() {
        let lines = tokenize("txt 60 TXT \"a b\" \"semi;colon\"", "t").unwrap();
        assert_eq!(texts(&lines[0]), vec!["txt", "60", "TXT", "a b", "semi;colon"]);
        assert!(lines[0].tokens[3].quoted);
    }

    #[test]
    fn test_leading_whitespace_marks_blank_owner() {
        let lines = tokenize("www 60 A 1.1.1.1\n    60 AAAA ::1", "t").unwrap();
        assert!(!lines[0].blank_owner);
        assert!(lines[1].blank_owner);
    }

    #[test]
    fn test_backslash_escapes_in_unquoted_tokens() {
        let lines = tokenize("owner\\032x 60 TXT semi\\;colon paren\\(", "t").unwrap();
        assert_eq!(texts(&lines[0]), vec!["owner x", "60", "TXT", "semi;colon", "paren("]);

        let lines = tokenize("txt 60 TXT \"tab\\009end\" \"a\\.b\"", "t").unwrap();
        assert_eq!(texts(&lines[0]), vec!["txt", "60", "TXT", "tab\tend", "a.b"]);
    }

    #[test]
    fn test_unsupported_escapes_are_rejected() {
        assert!(tokenize("a\\.b 60 A 10.0.0.1", "t").is_err());
        assert!(tokenize("a\\256 60 A 10.0.0.1", "t").is_err());
        assert!(tokenize("a\\03 60 A 10.0.0.1", "t").is_err());
        assert!(tokenize("a 60 A 10.0.0.1 \\", "t").is_err());
    }

    #[test]
    fn test_unbalanced_input_is_rejected() {
        assert!(tokenize("www 60 A ( 1.1.1.1", "t").is_err());
        assert!(tokenize("www 60 A 1.1.1.1 )", "t").is_err());
        assert!(tokenize("txt 60 TXT \"open", "t").is_err());
    }
}
