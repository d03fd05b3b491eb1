//! Structural helpers over flattened token lists.
//!
//! Every BEGIN token is closed by its matching END token, nested like
//! parentheses. These helpers locate span boundaries without copying tokens,
//! so callers can hand sub-slices straight to the generators.

use crate::error::IrError;
use crate::types::{Signal, Token};

/// Index of the END token matching the BEGIN token at `begin`.
pub fn find_end(tokens: &[Token], begin: usize) -> Result<usize, IrError> {
    let opening = tokens.get(begin).ok_or(IrError::Empty)?;
    if !opening.signal.is_begin() {
        return Err(IrError::NotABegin {
            found: opening.signal,
            index: begin,
        });
    }

    let mut expected: Vec<Signal> = Vec::new();
    for (index, token) in tokens.iter().enumerate().skip(begin) {
        if let Some(end) = token.signal.matching_end() {
            expected.push(end);
            continue;
        }

        if token.signal.is_end() {
            match expected.pop() {
                Some(want) if want == token.signal => {
                    if expected.is_empty() {
                        return Ok(index);
                    }
                }
                Some(want) => {
                    return Err(IrError::MismatchedEnd {
                        expected: want,
                        found: token.signal,
                        name: token.name.clone(),
                        index,
                    });
                }
                None => {
                    return Err(IrError::UnexpectedEnd {
                        signal: token.signal,
                        name: token.name.clone(),
                        index,
                    });
                }
            }
        }
    }

    Err(IrError::Unbalanced {
        signal: opening.signal,
        name: opening.name.clone(),
        index: begin,
    })
}

/// Index of the last token of the element starting at `index`: the matching
/// END for a BEGIN token, the token itself otherwise.
pub fn element_end(tokens: &[Token], index: usize) -> Result<usize, IrError> {
    match tokens.get(index) {
        Some(token) if token.signal.is_begin() => find_end(tokens, index),
        Some(_) => Ok(index),
        None => Err(IrError::Empty),
    }
}

/// Body of a single span with its outer BEGIN/END pair removed.
pub fn strip_outer(tokens: &[Token]) -> Result<&[Token], IrError> {
    if tokens.is_empty() {
        return Err(IrError::Empty);
    }

    let end = find_end(tokens, 0)?;
    if end != tokens.len() - 1 {
        return Err(IrError::TrailingTokens {
            index: end,
            count: tokens.len() - 1 - end,
        });
    }

    Ok(&tokens[1..end])
}

/// Stack check over a whole token list.
pub fn validate_balanced(tokens: &[Token]) -> Result<(), IrError> {
    let mut open: Vec<(Signal, usize)> = Vec::new();

    for (index, token) in tokens.iter().enumerate() {
        if token.signal.is_begin() {
            open.push((token.signal, index));
        } else if token.signal.is_end() {
            let Some((begin, _)) = open.pop() else {
                return Err(IrError::UnexpectedEnd {
                    signal: token.signal,
                    name: token.name.clone(),
                    index,
                });
            };

            let want = begin.matching_end().unwrap_or(begin);
            if want != token.signal {
                return Err(IrError::MismatchedEnd {
                    expected: want,
                    found: token.signal,
                    name: token.name.clone(),
                    index,
                });
            }
        }
    }

    match open.first() {
        Some(&(signal, index)) => Err(IrError::Unbalanced {
            signal,
            name: tokens[index].name.clone(),
            index,
        }),
        None => Ok(()),
    }
}
