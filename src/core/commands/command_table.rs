// The fixed command table: every command name maps to its permission flag and
// an argument validator that produces a typed invocation.

use crate::core::reaction_roles::CustomEmoji;
use crate::core::settings::MAX_DISTRACTION_PROBABILITY;
use thiserror::Error;

// ============================================================================
// ERRORS
// ============================================================================

/// Malformed arguments. The messages are the replies users see.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum UsageError {
    #[error("Kein neues Präfix angegeben.")]
    MissingPrefix,

    #[error("Das Präfix darf nicht leer sein.")]
    EmptyPrefix,

    #[error("Mindestens ein Argument ist zum leetifien benötigt.")]
    MissingLeetifyText,

    #[error("Mindestens ein Argument ist zum borkifien benötigt.")]
    MissingBorkifyText,

    #[error("Es wurde kein Paket zum Nachschauen angegeben.")]
    MissingPackage,

    #[error("Keine Rolle angegeben.")]
    MissingRoleName,

    #[error("Kein Channel angegeben.")]
    MissingChannel,

    #[error("Die Channel-ID scheint keine Zahl zu sein. IDs in Discord sind immer Zahlen.")]
    ChannelNotANumber,

    /// Digits, but too large to be any Discord id.
    #[error("Der Channel scheint nicht zu existieren.")]
    UnknownChannel,

    #[error("Es wurden zu wenig Argumente angegeben.")]
    TooFewArguments,

    #[error("Das erste Argument scheint kein custom Emoji sein.")]
    FirstArgumentNotAnEmoji,

    #[error("Kein Emoji angegeben.")]
    MissingEmoji,

    #[error("Das Argument scheint kein custom Emoji sein.")]
    ArgumentNotAnEmoji,

    #[error("Keine Wahrscheinlichkeit angegeben.")]
    MissingProbability,

    #[error("Die Wahrscheinlichkeit scheint keine Zahl zu sein.")]
    ProbabilityNotANumber,

    #[error("Bitte eine Zahl im Bereich von 0-100.")]
    ProbabilityOutOfRange,
}

// ============================================================================
// INVOCATIONS
// ============================================================================

/// A validated command, ready to execute.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Invocation {
    Help,
    SetPrefix(String),
    WhoAmI,
    Show,
    Leetify(String),
    Borkify(String),
    Lookup(String),
    Rm,
    SetModRole(String),
    SendRoleMessage(u64),
    AddRole { emoji: CustomEmoji, role_name: String },
    RemoveRole(CustomEmoji),
    DistractionProbability(u8),
}

pub type ArgParser = fn(&[String]) -> Result<Invocation, UsageError>;

pub struct CommandDef {
    pub name: &'static str,
    pub requires_moderator: bool,
    /// Validates the tokens after the command name.
    pub parse: ArgParser,
}

pub static COMMANDS: &[CommandDef] = &[
    CommandDef {
        name: "help",
        requires_moderator: false,
        parse: |_| Ok(Invocation::Help),
    },
    CommandDef {
        name: "prefix",
        requires_moderator: true,
        parse: parse_prefix,
    },
    CommandDef {
        name: "show",
        requires_moderator: false,
        parse: |_| Ok(Invocation::Show),
    },
    CommandDef {
        name: "whoami",
        requires_moderator: false,
        parse: |_| Ok(Invocation::WhoAmI),
    },
    CommandDef {
        name: "leetify",
        requires_moderator: false,
        parse: |args| joined(args, UsageError::MissingLeetifyText).map(Invocation::Leetify),
    },
    CommandDef {
        name: "borkify",
        requires_moderator: false,
        parse: |args| joined(args, UsageError::MissingBorkifyText).map(Invocation::Borkify),
    },
    CommandDef {
        name: "lookup",
        requires_moderator: false,
        parse: |args| {
            first(args, UsageError::MissingPackage).map(|name| Invocation::Lookup(name.to_string()))
        },
    },
    CommandDef {
        name: "rm",
        requires_moderator: false,
        parse: |_| Ok(Invocation::Rm),
    },
    CommandDef {
        name: "set-mod-role",
        requires_moderator: true,
        parse: |args| {
            first(args, UsageError::MissingRoleName)
                .map(|name| Invocation::SetModRole(name.to_string()))
        },
    },
    CommandDef {
        name: "send-role-message",
        requires_moderator: true,
        parse: parse_send_role_message,
    },
    CommandDef {
        name: "add-role",
        requires_moderator: true,
        parse: parse_add_role,
    },
    CommandDef {
        name: "remove-role",
        requires_moderator: true,
        parse: parse_remove_role,
    },
    CommandDef {
        name: "distraction-probability",
        requires_moderator: true,
        parse: parse_distraction_probability,
    },
];

/// Case-sensitive lookup of a command by name.
pub fn lookup(name: &str) -> Option<&'static CommandDef> {
    COMMANDS.iter().find(|command| command.name == name)
}

// ============================================================================
// ARGUMENT PARSERS
// ============================================================================

fn first(args: &[String], missing: UsageError) -> Result<&str, UsageError> {
    args.first().map(String::as_str).ok_or(missing)
}

fn joined(args: &[String], missing: UsageError) -> Result<String, UsageError> {
    if args.is_empty() {
        return Err(missing);
    }
    Ok(args.join(" "))
}

fn is_number(text: &str) -> bool {
    !text.is_empty() && text.chars().all(|c| c.is_ascii_digit())
}

fn parse_prefix(args: &[String]) -> Result<Invocation, UsageError> {
    let prefix = first(args, UsageError::MissingPrefix)?;
    if prefix.is_empty() {
        return Err(UsageError::EmptyPrefix);
    }
    Ok(Invocation::SetPrefix(prefix.to_string()))
}

fn parse_send_role_message(args: &[String]) -> Result<Invocation, UsageError> {
    let channel = first(args, UsageError::MissingChannel)?;
    if !is_number(channel) {
        return Err(UsageError::ChannelNotANumber);
    }
    let channel_id = channel.parse().map_err(|_| UsageError::UnknownChannel)?;
    Ok(Invocation::SendRoleMessage(channel_id))
}

fn parse_add_role(args: &[String]) -> Result<Invocation, UsageError> {
    let [emoji, role_name, ..] = args else {
        return Err(UsageError::TooFewArguments);
    };
    let emoji = CustomEmoji::parse(emoji).ok_or(UsageError::FirstArgumentNotAnEmoji)?;
    Ok(Invocation::AddRole {
        emoji,
        role_name: role_name.clone(),
    })
}

fn parse_remove_role(args: &[String]) -> Result<Invocation, UsageError> {
    let emoji = first(args, UsageError::MissingEmoji)?;
    let emoji = CustomEmoji::parse(emoji).ok_or(UsageError::ArgumentNotAnEmoji)?;
    Ok(Invocation::RemoveRole(emoji))
}

fn parse_distraction_probability(args: &[String]) -> Result<Invocation, UsageError> {
    let value = first(args, UsageError::MissingProbability)?;
    if !is_number(value) {
        return Err(UsageError::ProbabilityNotANumber);
    }
    match value.parse::<u8>() {
        Ok(probability) if probability <= MAX_DISTRACTION_PROBABILITY => {
            Ok(Invocation::DistractionProbability(probability))
        }
        _ => Err(UsageError::ProbabilityOutOfRange),
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn args(parts: &[&str]) -> Vec<String> {
        parts.iter().map(|p| p.to_string()).collect()
    }

    fn parse(name: &str, parts: &[&str]) -> Result<Invocation, UsageError> {
        (lookup(name).unwrap().parse)(&args(parts))
    }

    #[test]
    fn lookup_is_case_sensitive() {
        assert!(lookup("help").is_some());
        assert!(lookup("HELP").is_none());
        assert!(lookup("nope").is_none());
    }

    #[test]
    fn command_names_are_unique() {
        for (i, command) in COMMANDS.iter().enumerate() {
            assert!(COMMANDS[i + 1..].iter().all(|c| c.name != command.name));
        }
    }

    #[test]
    fn moderator_flags() {
        let privileged: Vec<_> = COMMANDS
            .iter()
            .filter(|c| c.requires_moderator)
            .map(|c| c.name)
            .collect();
        assert_eq!(
            privileged,
            [
                "prefix",
                "set-mod-role",
                "send-role-message",
                "add-role",
                "remove-role",
                "distraction-probability"
            ]
        );
    }

    #[test]
    fn prefix_arguments() {
        assert_eq!(parse("prefix", &[]), Err(UsageError::MissingPrefix));
        assert_eq!(parse("prefix", &[""]), Err(UsageError::EmptyPrefix));
        assert_eq!(
            parse("prefix", &["! "]),
            Ok(Invocation::SetPrefix("! ".into()))
        );
    }

    #[test]
    fn add_role_arguments() {
        assert_eq!(parse("add-role", &["<:foo:123>"]), Err(UsageError::TooFewArguments));
        assert_eq!(
            parse("add-role", &["foo", "Helper"]),
            Err(UsageError::FirstArgumentNotAnEmoji)
        );
        assert_eq!(
            parse("add-role", &["<:foo:123>", "Helper"]),
            Ok(Invocation::AddRole {
                emoji: CustomEmoji {
                    name: "foo".into(),
                    id: 123
                },
                role_name: "Helper".into(),
            })
        );
    }

    #[test]
    fn remove_role_arguments() {
        assert_eq!(parse("remove-role", &[]), Err(UsageError::MissingEmoji));
        assert_eq!(parse("remove-role", &["😀"]), Err(UsageError::ArgumentNotAnEmoji));
    }

    #[test]
    fn send_role_message_arguments() {
        assert_eq!(parse("send-role-message", &[]), Err(UsageError::MissingChannel));
        assert_eq!(
            parse("send-role-message", &["#general"]),
            Err(UsageError::ChannelNotANumber)
        );
        assert_eq!(
            parse("send-role-message", &["500"]),
            Ok(Invocation::SendRoleMessage(500))
        );
        assert_eq!(
            parse("send-role-message", &["18446744073709551616"]),
            Err(UsageError::UnknownChannel)
        );
    }

    #[test]
    fn distraction_probability_arguments() {
        assert_eq!(
            parse("distraction-probability", &[]),
            Err(UsageError::MissingProbability)
        );
        assert_eq!(
            parse("distraction-probability", &["-1"]),
            Err(UsageError::ProbabilityNotANumber)
        );
        assert_eq!(
            parse("distraction-probability", &["fifty"]),
            Err(UsageError::ProbabilityNotANumber)
        );
        assert_eq!(
            parse("distraction-probability", &["101"]),
            Err(UsageError::ProbabilityOutOfRange)
        );
        assert_eq!(
            parse("distraction-probability", &["99999999999999999999"]),
            Err(UsageError::ProbabilityOutOfRange)
        );
        assert_eq!(
            parse("distraction-probability", &["0"]),
            Ok(Invocation::DistractionProbability(0))
        );
    }

    #[test]
    fn text_commands_join_their_words() {
        assert_eq!(
            parse("leetify", &["hello", "world"]),
            Ok(Invocation::Leetify("hello world".into()))
        );
        assert_eq!(parse("borkify", &[]), Err(UsageError::MissingBorkifyText));
        assert_eq!(parse("lookup", &[]), Err(UsageError::MissingPackage));
    }
}
