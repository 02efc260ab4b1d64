// Turns one line of a chat message into command tokens.

/// How a single line of a message reads to the dispatcher.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum ParsedLine {
    /// The line does not start with the prefix.
    NotCommand,
    /// Only the prefix, nothing after it.
    Empty,
    /// A quote was opened and never closed.
    Unbalanced,
    /// At least one token; the first one names the command.
    Tokens(Vec<String>),
}

impl ParsedLine {
    pub fn is_command(&self) -> bool {
        !matches!(self, ParsedLine::NotCommand)
    }
}

/// Strip `prefix` from `line` and split the rest like a POSIX shell would.
pub fn parse_line(line: &str, prefix: &str) -> ParsedLine {
    let Some(rest) = line.strip_prefix(prefix) else {
        return ParsedLine::NotCommand;
    };

    match split_words(rest) {
        None => ParsedLine::Unbalanced,
        Some(tokens) if tokens.is_empty() => ParsedLine::Empty,
        Some(tokens) => ParsedLine::Tokens(tokens),
    }
}

/// Shell word splitting without any expansion.
///
/// Single quotes keep everything literally, double quotes only honor
/// backslash before `"`, `\`, `$` and `` ` ``, and an unquoted backslash
/// escapes the next character. Returns `None` when a quote is never closed
/// or the text ends in a lone backslash.
pub fn split_words(text: &str) -> Option<Vec<String>> {
    let mut words = Vec::new();
    let mut word = String::new();
    // Tracked apart from `word` so that `""` still yields an empty word.
    let mut in_word = false;
    let mut chars = text.chars();

    while let Some(c) = chars.next() {
        match c {
            c if c.is_whitespace() => {
                if in_word {
                    words.push(std::mem::take(&mut word));
                    in_word = false;
                }
            }
            '\\' => {
                word.push(chars.next()?);
                in_word = true;
            }
            '\'' => {
                in_word = true;
                loop {
                    match chars.next()? {
                        '\'' => break,
                        c => word.push(c),
                    }
                }
            }
            '"' => {
                in_word = true;
                loop {
                    match chars.next()? {
                        '"' => break,
                        '\\' => match chars.next()? {
                            c @ ('"' | '\\' | '$' | '`') => word.push(c),
                            c => {
                                word.push('\\');
                                word.push(c);
                            }
                        },
                        c => word.push(c),
                    }
                }
            }
            c => {
                word.push(c);
                in_word = true;
            }
        }
    }

    if in_word {
        words.push(word);
    }
    Some(words)
}
