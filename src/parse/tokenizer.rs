//! Marker-anchored token scanning for compiler command lines
//!
//! Token boundary rule: a token starts at the first non-whitespace character
//! after its marker and ends at the first space that is not inside a
//! double-quoted span. Every `"` opens or closes a span, including one right
//! after a backslash such as the tail of `/I"C:\sdk\"`. An unterminated span
//! runs to the end of the text.
//!
//! Values without quotes therefore end at the next space, so an unquoted
//! value containing a space is split there; quote it to keep it whole.

/// Iterator over every token that follows `marker` in `text`, left to right.
pub struct MarkerTokens<'a> {
    text: &'a str,
    marker: &'a str,
    pos: usize,
}

impl<'a> MarkerTokens<'a> {
    pub fn new(text: &'a str, marker: &'a str) -> Self {
        Self {
            text,
            marker,
            pos: 0,
        }
    }
}

impl<'a> Iterator for MarkerTokens<'a> {
    type Item = &'a str;

    fn next(&mut self) -> Option<Self::Item> {
        if self.marker.is_empty() {
            return None;
        }

        loop {
            let found = self.text.get(self.pos..)?.find(self.marker)?;
            let after = self.pos + found + self.marker.len();
            let begin = skip_whitespace(self.text, after);
            let end = token_end(self.text, begin);
            self.pos = end;

            // Marker followed by nothing but whitespace
            if begin == end {
                continue;
            }
            return Some(&self.text[begin..end]);
        }
    }
}

fn skip_whitespace(text: &str, from: usize) -> usize {
    text[from..]
        .char_indices()
        .find(|(_, ch)| !ch.is_whitespace())
        .map(|(offset, _)| from + offset)
        .unwrap_or(text.len())
}

/// Byte offset one past the token starting at `begin`.
pub fn token_end(text: &str, begin: usize) -> usize {
    let mut in_quotes = false;

    for (offset, ch) in text[begin..].char_indices() {
        match ch {
            '"' => in_quotes = !in_quotes,
            ' ' if !in_quotes => return begin + offset,
            _ => {}
        }
    }

    text.len()
}

#[cfg(test)]
mod tests {
    use super::*;

    fn tokens<'a>(text: &'a str, marker: &'a str) -> Vec<&'a str> {
        MarkerTokens::new(text, marker).collect()
    }

    #[test]
    fn test_every_occurrence_in_order() {
        let text = "/c /DWIN32 /D_DEBUG /DUNICODE main.cpp";
        assert_eq!(tokens(text, " /D"), vec!["WIN32", "_DEBUG", "UNICODE"]);
    }

    #[test]
    fn test_skips_whitespace_after_marker() {
        let text = "/c /I  include /I\tother x.cpp";
        assert_eq!(tokens(text, " /I"), vec!["include", "other"]);
    }

    #[test]
    fn test_token_runs_to_end_of_text() {
        assert_eq!(tokens("/c /DLAST", " /D"), vec!["LAST"]);
    }

    #[test]
    fn test_no_marker() {
        assert!(tokens("/c /nologo main.cpp", " /D").is_empty());
    }

    #[test]
    fn test_marker_at_end_yields_nothing() {
        assert!(tokens("/c /D   ", " /D").is_empty());
    }

    #[test]
    fn test_quoted_value_keeps_spaces() {
        let text = "/c /I\"C:\\Program Files\\sdk\\include\" /I inc x.cpp";
        assert_eq!(
            tokens(text, " /I"),
            vec!["\"C:\\Program Files\\sdk\\include\"", "inc"]
        );
    }

    #[test]
    fn test_unquoted_value_with_space_is_split() {
        let text = "/c /IC:\\Program Files\\sdk x.cpp";
        assert_eq!(tokens(text, " /I"), vec!["C:\\Program"]);
    }

    #[test]
    fn test_trailing_escaped_backslash_closes_quote() {
        let text = "/c /Fo\"x64\\Debug\\\\\" /Gd x.cpp";
        assert_eq!(tokens(text, " /Fo"), vec!["\"x64\\Debug\\\\\""]);
    }

    #[test]
    fn test_backslash_before_closing_quote() {
        let text = "/c /I\"C:\\sdk\\\" /I other /DX main.cpp\n";
        assert_eq!(tokens(text, " /I"), vec!["\"C:\\sdk\\\"", "other"]);
        assert_eq!(tokens(text, " /D"), vec!["X"]);
    }

    #[test]
    fn test_unterminated_quote_runs_to_end() {
        let text = "/c /I\"broken path x.cpp";
        assert_eq!(tokens(text, " /I"), vec!["\"broken path x.cpp"]);
    }

    #[test]
    fn test_empty_marker() {
        assert!(tokens("anything", "").is_empty());
    }
}
