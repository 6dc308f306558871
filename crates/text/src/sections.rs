//! Heuristic section detection on cleaned text.

/// Lines shorter than this, when followed by a blank line, are treated as
/// heading-like section boundaries.
const SHORT_LINE_LEN: usize = 50;

/// Split text into heuristically detected sections.
///
/// A line closes the current section when it ends with `:`, is blank, or is
/// short and immediately precedes a blank line. Sections are trimmed and
/// empty ones dropped; if no boundary is ever found the whole text comes
/// back as a single section.
///
/// Best-effort only — boundaries are plausible, not guaranteed semantic.
/// The failure mode is sections larger than ideal, never lost content.
pub fn split_sections(text: &str) -> Vec<String> {
    let lines: Vec<&str> = text.split('\n').collect();
    let mut sections = Vec::new();
    let mut current: Vec<&str> = Vec::new();

    for (i, line) in lines.iter().copied().enumerate() {
        current.push(line);

        let short_before_blank = line.chars().count() < SHORT_LINE_LEN
            && i + 1 < lines.len()
            && lines[i + 1].is_empty();
        let boundary = line.ends_with(':') || short_before_blank || line.trim().is_empty();

        if boundary {
            let section = current.join("\n").trim().to_string();
            if !section.is_empty() {
                sections.push(section);
            }
            current.clear();
        }
    }

    let tail = current.join("\n").trim().to_string();
    if !tail.is_empty() {
        sections.push(tail);
    }

    if sections.is_empty() {
        vec![text.to_string()]
    } else {
        sections
    }
}
