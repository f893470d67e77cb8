//! Profile store: rule-derived user preference and style signals.
//!
//! Each field is driven by an ordered rule table. The first rule whose cue
//! appears in the (lowercased) text wins; text matching no rule leaves the
//! field untouched.

use serde::{Deserialize, Serialize};
use tracing::debug;

/// A single extraction rule: any cue present → `value`.
#[derive(Debug, Clone, Copy)]
pub struct Rule {
    pub cues: &'static [&'static str],
    pub value: &'static str,
}

impl Rule {
    fn matches(&self, lowered: &str) -> bool {
        self.cues.iter().any(|cue| lowered.contains(cue))
    }
}

/// Preference rules, highest priority first. Negations precede the plain
/// "i like" cue, which they contain.
pub const PREFERENCE_RULES: &[Rule] = &[
    Rule {
        cues: &["i don't like", "i do not like", "i dislike"],
        value: "avoid what the user dislikes",
    },
    Rule {
        cues: &["i like"],
        value: "follow what the user likes",
    },
    Rule {
        cues: &["i prefer", "my preference is"],
        value: "follow the user's stated preference",
    },
];

/// Style rules, highest priority first.
pub const STYLE_RULES: &[Rule] = &[
    Rule {
        cues: &["formal"],
        value: "formal",
    },
    Rule {
        cues: &["casual", "informal"],
        value: "casual",
    },
    Rule {
        cues: &["concise", "brief"],
        value: "concise",
    },
    Rule {
        cues: &["detailed", "thorough"],
        value: "detailed",
    },
];

/// First matching rule's value, if any.
pub fn first_match(rules: &[Rule], lowered: &str) -> Option<&'static str> {
    rules.iter().find(|rule| rule.matches(lowered)).map(|rule| rule.value)
}

/// The two profile fields. Empty means "not yet observed".
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct ProfileState {
    pub preference: String,
    pub style: String,
}

/// Which fields a call to [`ProfileStore::update_from_text`] overwrote.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct ProfileUpdate {
    pub preference: bool,
    pub style: bool,
}

#[derive(Debug, Clone, Default)]
pub struct ProfileStore {
    state: ProfileState,
}

impl ProfileStore {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn update_from_text(&mut self, text: &str) -> ProfileUpdate {
        let lowered = text.to_lowercase();
        let mut update = ProfileUpdate::default();

        if let Some(preference) = first_match(PREFERENCE_RULES, &lowered) {
            self.state.preference = preference.to_string();
            update.preference = true;
        }

        if let Some(style) = first_match(STYLE_RULES, &lowered) {
            self.state.style = style.to_string();
            update.style = true;
        }

        if update.preference || update.style {
            debug!(
                preference = %self.state.preference,
                style = %self.state.style,
                "Profile updated"
            );
        }
        update
    }

    /// Render set fields as prompt lines, preference before style.
    ///
    /// Empty string when nothing has been observed.
    pub fn get_profile_prompt(&self) -> String {
        let mut lines = Vec::with_capacity(2);
        if !self.state.preference.is_empty() {
            lines.push(format!("User preference: {}.", self.state.preference));
        }
        if !self.state.style.is_empty() {
            lines.push(format!("User style: {}.", self.state.style));
        }
        lines.join("\n")
    }

    pub fn state(&self) -> &ProfileState {
        &self.state
    }
}
