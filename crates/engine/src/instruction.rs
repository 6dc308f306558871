//! Depth/style instruction composition.

/// Depth label used when an unrecognized depth is requested.
const FALLBACK_DEPTH: &str = "Executive Summary";

const DEPTHS: &[(&str, &str)] = &[
    ("TL;DR (1-2 lines)", "Provide a 1-2 sentence TL;DR summary."),
    ("Bullet Points", "Create a bullet-point summary with 5-8 key points."),
    (
        "Executive Summary",
        "Write a concise executive summary (2-3 paragraphs) highlighting main points and insights.",
    ),
    (
        "Detailed Summary",
        "Provide a comprehensive summary covering all major points, arguments, and details.",
    ),
    (
        "Structured Outline",
        "Create a structured outline with main sections, sub-points, and key details.",
    ),
];

const STYLES: &[(&str, &str)] = &[
    (
        "Simple Explanation",
        "Use simple language suitable for a general audience.",
    ),
    (
        "Technical Explanation",
        "Use technical terminology and detailed explanations.",
    ),
    (
        "Academic Tone",
        "Write in an academic, scholarly tone with formal language.",
    ),
    (
        "Executive Tone",
        "Write in a professional, executive-level tone.",
    ),
    ("Casual Tone", "Use a conversational, casual tone."),
    (
        "LinkedIn Post",
        "Format as an engaging LinkedIn post with appropriate hashtags.",
    ),
    (
        "Twitter Thread",
        "Format as a Twitter thread (multiple connected tweets).",
    ),
];

/// Immutable lookup tables mapping (depth, style) to instruction text.
/// Injected at construction so alternative tables can be swapped in without
/// touching engine logic.
#[derive(Debug, Clone)]
pub struct InstructionSet {
    depths: Vec<(String, String)>,
    styles: Vec<(String, String)>,
}

impl Default for InstructionSet {
    fn default() -> Self {
        Self::new(
            DEPTHS.iter().map(|&(k, v)| (k.into(), v.into())).collect(),
            STYLES.iter().map(|&(k, v)| (k.into(), v.into())).collect(),
        )
    }
}

impl InstructionSet {
    pub fn new(depths: Vec<(String, String)>, styles: Vec<(String, String)>) -> Self {
        Self { depths, styles }
    }

    /// Names of the known depth levels, in table order.
    pub fn depth_names(&self) -> impl Iterator<Item = &str> {
        self.depths.iter().map(|(k, _)| k.as_str())
    }

    /// Names of the known style modifiers, in table order.
    pub fn style_names(&self) -> impl Iterator<Item = &str> {
        self.styles.iter().map(|(k, _)| k.as_str())
    }

    /// Compose `base + " " + modifier`, trimmed. Total over its domain:
    /// an unrecognized depth falls back to the executive-summary base and
    /// an unrecognized or empty style contributes no modifier.
    pub fn compose(&self, depth: &str, style: &str) -> String {
        let base = self
            .lookup(&self.depths, depth)
            .or_else(|| self.lookup(&self.depths, FALLBACK_DEPTH))
            .unwrap_or_default();
        let modifier = self.lookup(&self.styles, style).unwrap_or_default();

        format!("{} {}", base, modifier).trim().to_string()
    }

    fn lookup<'a>(&self, table: &'a [(String, String)], key: &str) -> Option<&'a str> {
        table
            .iter()
            .find(|(k, _)| k == key)
            .map(|(_, v)| v.as_str())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn known_depth_and_style_concatenate_with_one_space() {
        let set = InstructionSet::default();
        let composed = set.compose("Bullet Points", "Casual Tone");
        assert_eq!(
            composed,
            "Create a bullet-point summary with 5-8 key points. Use a conversational, casual tone."
        );
    }

    #[test]
    fn unknown_depth_falls_back_to_executive_summary() {
        let set = InstructionSet::default();
        let composed = set.compose("Novel-Length Recap", "");
        assert!(composed.contains("executive summary"));
    }

    #[test]
    fn unknown_style_contributes_no_modifier() {
        let set = InstructionSet::default();
        let with_unknown = set.compose("TL;DR (1-2 lines)", "Morse Code");
        let with_none = set.compose("TL;DR (1-2 lines)", "");
        assert_eq!(with_unknown, with_none);
        assert_eq!(with_unknown, "Provide a 1-2 sentence TL;DR summary.");
    }

    #[test]
    fn compose_never_returns_empty_for_default_tables() {
        let set = InstructionSet::default();
        assert!(!set.compose("", "").is_empty());
    }

    #[test]
    fn custom_tables_are_honoured() {
        let set = InstructionSet::new(
            vec![("Short".into(), "Be short.".into())],
            vec![("Loud".into(), "BE LOUD.".into())],
        );
        assert_eq!(set.compose("Short", "Loud"), "Be short. BE LOUD.");
        // Unknown depth with no fallback entry degrades to modifier only.
        assert_eq!(set.compose("Missing", "Loud"), "BE LOUD.");
    }

    #[test]
    fn default_tables_carry_expected_enumerations() {
        let set = InstructionSet::default();
        assert_eq!(set.depth_names().count(), 5);
        assert_eq!(set.style_names().count(), 7);
    }
}
