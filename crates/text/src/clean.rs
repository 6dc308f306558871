//! Whitespace normalization applied before any token counting.

/// Clean and normalize text: carriage returns become newlines, tabs become
/// spaces, runs of spaces collapse to one, runs of 3+ newlines collapse to
/// exactly two (paragraph breaks survive), and the result is trimmed.
///
/// Idempotent — CR and tab normalization run before the collapsing passes,
/// so a second application changes nothing.
pub fn clean(text: &str) -> String {
    let mut out = String::with_capacity(text.len());

    // Pass 1: normalize CR and tabs. Each \r becomes its own \n, so a CRLF
    // pair reads as two newlines and collapses into a paragraph break below.
    let mut normalized = String::with_capacity(text.len());
    for c in text.chars() {
        match c {
            '\r' => normalized.push('\n'),
            '\t' => normalized.push(' '),
            other => normalized.push(other),
        }
    }

    // Pass 2: collapse runs. A space run becomes one space; a newline run of
    // 3+ becomes exactly two. Runs are collapsed in place, never reordered.
    let mut chars = normalized.chars().peekable();
    while let Some(c) = chars.next() {
        match c {
            ' ' => {
                while chars.peek() == Some(&' ') {
                    chars.next();
                }
                out.push(' ');
            }
            '\n' => {
                let mut run = 1usize;
                while chars.peek() == Some(&'\n') {
                    chars.next();
                    run += 1;
                }
                out.push_str(if run == 1 { "\n" } else { "\n\n" });
            }
            other => out.push(other),
        }
    }

    out.trim().to_string()
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn collapses_space_runs() {
        assert_eq!(clean("a    b c"), "a b c");
    }

    #[test]
    fn collapses_newline_runs_to_two() {
        assert_eq!(clean("a\n\n\n\n\nb"), "a\n\nb");
        assert_eq!(clean("a\n\nb"), "a\n\nb");
        assert_eq!(clean("a\nb"), "a\nb");
    }

    #[test]
    fn normalizes_carriage_returns_and_tabs() {
        assert_eq!(clean("a\r\nb"), "a\n\nb");
        assert_eq!(clean("a\rb"), "a\nb");
        assert_eq!(clean("a\tb"), "a b");
        assert_eq!(clean("a\t\tb"), "a b");
    }

    #[test]
    fn trims_leading_and_trailing_whitespace() {
        assert_eq!(clean("  \n hello \n  "), "hello");
    }

    #[test]
    fn idempotent() {
        let cases = [
            "a    b\t\tc\r\n\r\n\r\nd",
            "  spaced  \n\n\n\n out \r mixed\t",
            "already clean\n\ntext",
            "",
        ];
        for case in cases {
            let once = clean(case);
            assert_eq!(clean(&once), once, "clean must be idempotent for {case:?}");
        }
    }

    #[test]
    fn space_interrupted_newline_runs_are_not_merged() {
        // The space breaks the newline run, so neither side reaches three.
        assert_eq!(clean("a\n \n\nb"), "a\n \n\nb");
    }

    #[test]
    fn cr_runs_do_not_survive_a_single_pass() {
        // A \r adjacent to \n\n must not leave a 3-newline run behind.
        let cleaned = clean("a\n\n\rb");
        assert!(!cleaned.contains("\n\n\n"));
        assert_eq!(clean(&cleaned), cleaned);
    }
}
