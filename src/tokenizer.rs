use crate::error::{PassageError, Result};

/// The most parts a single reference may split into.
pub const MAX_TOKENS: usize = 8;

// the character classes that decide where one token ends and the next begins
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
enum Class {
    Digit,
    Letter,
    Other,
}

/// Splits one reference into its parts: book names, numbers, the end
/// markers `$` and `ff`, and a trailing `!sub` sub-identifier.
///
/// A number always starts a new part. Letters following a separator or a
/// number continue the current part after a space, so "1 Cor 13:4" becomes
/// `["1 Cor", "13", "4"]` and "Song of Songs" stays whole.
pub fn tokenize(input: &str) -> Result<Vec<String>> {
    let chars: Vec<char> = input.chars().collect();
    let mut tokens: Vec<String> = Vec::new();
    let mut current = String::new();
    let mut last = Class::Digit;
    let mut i = 0;
    while i < chars.len() {
        let c = chars[i];
        if c == '!' {
            if !current.is_empty() {
                tokens.push(std::mem::take(&mut current));
            }
            tokens.push(chars[i..].iter().collect());
            check_count(input, tokens.len())?;
            return Ok(tokens);
        }
        // "ff" reads as a number unless it is the tail of a word
        let end_marker = c == 'f' && chars.get(i + 1) == Some(&'f') && last != Class::Letter;
        let class = if c.is_ascii_digit() || c == '$' || end_marker {
            Class::Digit
        } else if c.is_alphabetic() {
            Class::Letter
        } else {
            Class::Other
        };
        match class {
            Class::Other => {
                if !current.is_empty() {
                    last = Class::Other;
                }
                i += 1;
                continue;
            }
            Class::Digit => {
                // end markers never share a part with a number
                let boundary = last != Class::Digit || end_marker || c == '$' || current.ends_with(['f', '$']);
                if !current.is_empty() && boundary {
                    tokens.push(std::mem::take(&mut current));
                    check_count(input, tokens.len())?;
                }
                if end_marker {
                    current.push_str("ff");
                    i += 1;
                } else {
                    current.push(c);
                }
            }
            Class::Letter => {
                if !current.is_empty() && last != Class::Letter {
                    current.push(' ');
                }
                current.push(c);
            }
        }
        last = class;
        i += 1;
    }
    if !current.is_empty() || tokens.is_empty() {
        tokens.push(current);
    }
    check_count(input, tokens.len())?;
    Ok(tokens)
}

fn check_count(input: &str, count: usize) -> Result<()> {
    if count > MAX_TOKENS {
        return Err(PassageError::TooManyParts { input: input.to_string() });
    }
    Ok(())
}
