// Flavor replies: the bot occasionally answers when someone mentions Arch in
// ordinary chat, and always has an opinion about `rm`.

use rand::seq::SliceRandom;
use rand::Rng;

pub const TRIGGER_WORD: &str = "arch";

const ARCH_RESPONSES: [&str; 8] = [
    "ARCH IS THE BEST!",
    "Arch ist toll.",
    "I use Arch btw.",
    "AAAAAAAAAAAAAAAAAAAAAAAAAAAAAAAAAAAAAAAAAAAAAAAAAAAAAAARCH!:wq",
    "arch?",
    "Habe ich Arch gehört?",
    "Schonmal Arch installiert?",
    "Arch for the win!",
];

const RM_RESPONSES: [&str; 5] = [
    "YOLO!!!!!! ||Nur ein Witz. Wer würde denn auch so verrückt sein und einfach etwas löschen. _Erinnert sich an sein Legacy-Backup_||",
    "*Uno reverse card*",
    "No u!",
    "uwu",
    "***aRe yOU sUrE AbOUt thAT?***",
];

pub struct DistractionService {
    arch_responses: &'static [&'static str],
    rm_responses: &'static [&'static str],
}

impl DistractionService {
    pub fn new() -> Self {
        Self {
            arch_responses: &ARCH_RESPONSES,
            rm_responses: &RM_RESPONSES,
        }
    }

    pub fn is_triggered(&self, content: &str) -> bool {
        content.to_lowercase().contains(TRIGGER_WORD)
    }

    /// A flavor reply for `content`, or `None` if the trigger word is absent
    /// or the roll fails. `probability` is a percentage: 0 never replies,
    /// 100 always does.
    pub fn distraction_for<R: Rng>(
        &self,
        content: &str,
        probability: u8,
        rng: &mut R,
    ) -> Option<&'static str> {
        if !self.is_triggered(content) {
            return None;
        }
        if rng.gen_range(1..=100u8) > probability {
            return None;
        }
        self.arch_responses.choose(rng).copied()
    }

    pub fn rm_reply<R: Rng>(&self, rng: &mut R) -> &'static str {
        self.rm_responses
            .choose(rng)
            .copied()
            .unwrap_or(RM_RESPONSES[0])
    }
}

impl Default for DistractionService {
    fn default() -> Self {
        Self::new()
    }
}
