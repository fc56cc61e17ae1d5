//! Escaping for ninja build files

/// Escapes a path or command line for a ninja build file.
///
/// Surrounding whitespace is trimmed. A `"` is dropped; when it is directly
/// followed by a space, that space is written bare (the quote closed an
/// argument and the space separates it from the next one). Every other space
/// becomes `$ `, `:` becomes `$:` and `$` becomes `$$`.
pub fn ninja_escape(input: &str) -> String {
    let input = input.trim();
    let mut escaped = String::with_capacity(input.len() + input.len() / 4);
    let mut chars = input.chars().peekable();

    while let Some(ch) = chars.next() {
        match ch {
            '"' => {
                if chars.peek() == Some(&' ') {
                    chars.next();
                    escaped.push(' ');
                }
            }
            ' ' => escaped.push_str("$ "),
            ':' => escaped.push_str("$:"),
            '$' => escaped.push_str("$$"),
            _ => escaped.push(ch),
        }
    }

    escaped
}
