use regex::Regex;
use std::sync::LazyLock;

// Only static custom emoji can be reaction-role keys; unicode emoji have no id.
static CUSTOM_EMOJI: LazyLock<Regex> =
    LazyLock::new(|| Regex::new(r"^<:([^:\s>]+):([0-9]+)>$").expect("valid emoji pattern"));

/// A custom emoji reference as typed in a command, e.g. `<:tux:123>`.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct CustomEmoji {
    pub name: String,
    pub id: u64,
}

impl CustomEmoji {
    pub fn parse(text: &str) -> Option<Self> {
        let captures = CUSTOM_EMOJI.captures(text)?;
        let id = captures[2].parse().ok()?;
        Some(Self {
            name: captures[1].to_string(),
            id,
        })
    }
}
