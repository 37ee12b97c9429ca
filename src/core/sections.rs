//! Label-based extraction of the closing free-text sections.

use crate::types::ExtraSections;
use regex::Regex;
use std::sync::OnceLock;

/// The six closing sections, in the order they appear in a plan.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum SectionKey {
    FamousShopping,
    WhatToPack,
    SafetyRules,
    ExtraTravelTips,
    EstimatedTotalBudget,
    ClosingNote,
}

impl SectionKey {
    pub const ALL: [SectionKey; 6] = [
        SectionKey::FamousShopping,
        SectionKey::WhatToPack,
        SectionKey::SafetyRules,
        SectionKey::ExtraTravelTips,
        SectionKey::EstimatedTotalBudget,
        SectionKey::ClosingNote,
    ];

    pub fn as_str(self) -> &'static str {
        match self {
            SectionKey::FamousShopping => "famous_shopping",
            SectionKey::WhatToPack => "what_to_pack",
            SectionKey::SafetyRules => "safety_rules",
            SectionKey::ExtraTravelTips => "extra_travel_tips",
            SectionKey::EstimatedTotalBudget => "estimated_total_budget",
            SectionKey::ClosingNote => "closing_note",
        }
    }

    /// Heading pattern including an optional `:` or `-` separator.
    fn label_pattern(self) -> &'static str {
        match self {
            SectionKey::FamousShopping => r"famous\s+shopping(?:\s+recommendations)?",
            SectionKey::WhatToPack => r"what\s+to\s+pack",
            SectionKey::SafetyRules => r"safety\s+rules",
            SectionKey::ExtraTravelTips => r"extra\s+travel\s+tips",
            SectionKey::EstimatedTotalBudget => r"estimated\s+total\s+budget",
            SectionKey::ClosingNote => r"closing\s+note",
        }
    }

    fn position(self) -> usize {
        self as usize
    }

    fn label_re(self) -> &'static Regex {
        static LABELS: OnceLock<Vec<Regex>> = OnceLock::new();
        let labels = LABELS.get_or_init(|| {
            SectionKey::ALL
                .iter()
                .map(|key| {
                    Regex::new(&format!(r"(?is){}\s*[:\-]?", key.label_pattern()))
                        .expect("section label regex must compile")
                })
                .collect()
        });
        &labels[self.position()]
    }

    fn slot(self, sections: &mut ExtraSections) -> &mut String {
        match self {
            SectionKey::FamousShopping => &mut sections.famous_shopping,
            SectionKey::WhatToPack => &mut sections.what_to_pack,
            SectionKey::SafetyRules => &mut sections.safety_rules,
            SectionKey::ExtraTravelTips => &mut sections.extra_travel_tips,
            SectionKey::EstimatedTotalBudget => &mut sections.estimated_total_budget,
            SectionKey::ClosingNote => &mut sections.closing_note,
        }
    }
}

/// Text following `key`'s label, up to the nearest label that comes later in
/// the fixed order, or the end of `text`.
fn capture_section(text: &str, key: SectionKey) -> Option<&str> {
    let label = key.label_re().find(text)?;
    let start = label.end();

    let end = SectionKey::ALL[key.position() + 1..]
        .iter()
        .filter_map(|later| later.label_re().find_at(text, start))
        .map(|found| found.start())
        .min()
        .unwrap_or(text.len());

    Some(text[start..end].trim())
}

/// Pull the six closing sections out of free text by their headings.
///
/// Never fails: a missing heading yields an empty section.
pub fn extract_labeled_sections(text: &str) -> ExtraSections {
    let mut sections = ExtraSections::default();
    if text.trim().is_empty() {
        return sections;
    }

    for key in SectionKey::ALL {
        if let Some(captured) = capture_section(text, key) {
            *key.slot(&mut sections) = captured.to_string();
        }
    }

    sections
}

#[cfg(test)]
mod tests {
    use super::*;

    const PLAN_TAIL: &str = "\
Famous shopping recommendations: Pike Place Market for local crafts.
What to pack - Layers, rain jacket,
and comfortable shoes.
Safety rules: Stay on marked trails.
Extra travel tips: Buy a transit pass.
Estimated total budget: $1,200 for two.
Closing note: Enjoy the Pacific Northwest!";

    #[test]
    fn test_all_sections_extracted() {
        let sections = extract_labeled_sections(PLAN_TAIL);
        assert_eq!(sections.famous_shopping, "Pike Place Market for local crafts.");
        assert_eq!(
            sections.what_to_pack,
            "Layers, rain jacket,\nand comfortable shoes."
        );
        assert_eq!(sections.safety_rules, "Stay on marked trails.");
        assert_eq!(sections.extra_travel_tips, "Buy a transit pass.");
        assert_eq!(sections.estimated_total_budget, "$1,200 for two.");
        assert_eq!(sections.closing_note, "Enjoy the Pacific Northwest!");
    }

    #[test]
    fn test_empty_input_yields_defaults() {
        assert_eq!(extract_labeled_sections(""), ExtraSections::default());
        assert_eq!(extract_labeled_sections("  \n"), ExtraSections::default());
    }

    #[test]
    fn test_labels_are_case_insensitive() {
        let sections = extract_labeled_sections("WHAT TO PACK: sunscreen\nclosing NOTE: bye");
        assert_eq!(sections.what_to_pack, "sunscreen");
        assert_eq!(sections.closing_note, "bye");
        assert_eq!(sections.safety_rules, "");
    }

    #[test]
    fn test_missing_middle_section_stops_at_next_present_label() {
        let sections = extract_labeled_sections(
            "Famous shopping: outlet mall\nEstimated total budget: $500",
        );
        assert_eq!(sections.famous_shopping, "outlet mall");
        assert_eq!(sections.estimated_total_budget, "$500");
        assert_eq!(sections.what_to_pack, "");
    }

    #[test]
    fn test_earlier_label_does_not_end_a_capture() {
        // A closing note that mentions an earlier heading keeps running to the end.
        let sections = extract_labeled_sections("Closing note: see what to pack above");
        assert_eq!(sections.closing_note, "see what to pack above");
    }

    #[test]
    fn test_section_keys_in_order() {
        let keys: Vec<_> = SectionKey::ALL.iter().map(|key| key.as_str()).collect();
        let sections = ExtraSections::default();
        let expected: Vec<_> = sections.iter().map(|(key, _)| key).collect();
        assert_eq!(keys, expected);
    }
}
