/// Split one calendar row on commas, honouring double-quoted spans.
///
/// Quotes delimit but are not copied; `""` inside a quoted span is a literal
/// `"`. Unbalanced quotes are tolerated: whatever was scanned is flushed as
/// the last field. Always returns at least one field.
pub fn tokenize(line: &str) -> Vec<String> {
    let mut fields = Vec::new();
    let mut field = String::new();
    let mut in_quotes = false;
    let mut chars = line.chars().peekable();

    while let Some(ch) = chars.next() {
        if in_quotes {
            if ch == '"' {
                if chars.peek() == Some(&'"') {
                    chars.next();
                    field.push('"');
                } else {
                    in_quotes = false;
                }
            } else {
                field.push(ch);
            }
        } else {
            match ch {
                '"' => in_quotes = true,
                ',' => fields.push(std::mem::take(&mut field)),
                _ => field.push(ch),
            }
        }
    }

    fields.push(field);
    fields
}
