// Text toys for the `leetify` and `borkify` commands.

const LEET_TABLE: [(char, char); 7] = [
    ('l', '1'),
    ('i', '1'),
    ('t', '7'),
    ('e', '3'),
    ('a', '4'),
    ('b', '8'),
    ('o', '0'),
];

pub fn leetify(text: &str) -> String {
    text.chars()
        .map(|c| {
            let lower = c.to_ascii_lowercase();
            LEET_TABLE
                .iter()
                .find(|(from, _)| *from == lower)
                .map_or(c, |(_, to)| *to)
        })
        .collect()
}

/// Swaps the first and last character of every space separated word.
pub fn borkify(text: &str) -> String {
    text.split(' ').map(bork_word).collect::<Vec<_>>().join(" ")
}

fn bork_word(word: &str) -> String {
    let chars: Vec<char> = word.chars().collect();
    match chars.as_slice() {
        [] | [_] => word.to_string(),
        [first, middle @ .., last] => {
            let mut out = String::with_capacity(word.len());
            out.push(*last);
            out.extend(middle);
            out.push(*first);
            out
        }
    }
}
