//! Size Descriptor Parser
//!
//! Tokenizes `"sm:100vw, md:50vw 400px"` into `(key, value)` pairs.
//! Separators are commas and whitespace; anything inside parentheses
//! (e.g. `calc(100vw - 2rem)`) stays in one token.

use crate::SizesError;

/// One descriptor token
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct SizeToken {
    /// Breakpoint key, `None` for a bare token
    pub key: Option<String>,
    /// Raw size value (`"300"`, `"300px"`, `"100vw"`, `"calc(...)"`)
    pub value: String,
}

impl SizeToken {
    pub fn keyed(key: &str, value: &str) -> Self {
        Self {
            key: Some(key.to_string()),
            value: value.to_string(),
        }
    }

    pub fn bare(value: &str) -> Self {
        Self {
            key: None,
            value: value.to_string(),
        }
    }

    pub fn is_bare(&self) -> bool {
        self.key.is_none()
    }
}

/// Parse a size descriptor.
///
/// Blank input yields no tokens. Unknown keys are not checked here.
pub fn parse_descriptor(input: &str) -> Result<Vec<SizeToken>, SizesError> {
    split_tokens(input)?.into_iter().map(parse_token).collect()
}

fn parse_token(raw: &str) -> Result<SizeToken, SizesError> {
    // A colon after an opening paren belongs to the value
    let colon = raw.find(':').filter(|&i| !raw[..i].contains('('));

    let Some(i) = colon else {
        return Ok(SizeToken::bare(raw));
    };

    let (key, value) = (&raw[..i], &raw[i + 1..]);
    if key.is_empty() {
        return Err(SizesError::MalformedDescriptor(format!("missing breakpoint in '{}'", raw)));
    }
    if value.is_empty() {
        return Err(SizesError::MalformedDescriptor(format!("missing size in '{}'", raw)));
    }
    Ok(SizeToken::keyed(key, value))
}

fn split_tokens(input: &str) -> Result<Vec<&str>, SizesError> {
    let mut tokens = Vec::new();
    let mut start: Option<usize> = None;
    let mut depth = 0usize;
    // A comma was seen and no token has followed it yet
    let mut after_comma = false;

    for (i, ch) in input.char_indices() {
        if depth == 0 && (ch == ',' || ch.is_whitespace()) {
            if let Some(s) = start.take() {
                tokens.push(&input[s..i]);
                after_comma = false;
            }
            if ch == ',' {
                if after_comma || tokens.is_empty() {
                    return Err(SizesError::MalformedDescriptor(format!(
                        "empty token at offset {}",
                        i
                    )));
                }
                after_comma = true;
            }
            continue;
        }

        match ch {
            '(' => depth += 1,
            ')' => {
                depth = depth.checked_sub(1).ok_or_else(|| {
                    SizesError::MalformedDescriptor(format!("unbalanced ')' at offset {}", i))
                })?;
            }
            _ => {}
        }
        if start.is_none() {
            start = Some(i);
        }
    }

    if depth > 0 {
        return Err(SizesError::MalformedDescriptor("unterminated '('".into()));
    }
    match start {
        Some(s) => tokens.push(&input[s..]),
        None if after_comma => {
            return Err(SizesError::MalformedDescriptor("trailing ','".into()));
        }
        None => {}
    }

    Ok(tokens)
}
