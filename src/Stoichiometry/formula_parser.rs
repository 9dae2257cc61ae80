//! Parser of chemical formulae.
//!
//! Turns strings like "Ca3(PO4)2" into a map {"Ca": 3, "O": 8, "P": 2}.
//! Bracket levels are kept on an explicit stack, so the nesting depth is bounded
//! by memory only, not by the call stack.
//! Element symbols are checked only syntactically (one uppercase letter followed by
//! any number of lowercase letters), so "Xx2" parses fine; whether the element
//! exists is decided later by the molar mass lookup.
use serde::{Deserialize, Serialize};
use std::collections::BTreeMap;
use std::fmt;
use thiserror::Error;

/// element symbol -> number of atoms. BTreeMap keeps the symbols sorted so that
/// everything built on top of it (matrices, tables) has a canonical element order
pub type ElementCounts = BTreeMap<String, usize>;

#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum ParseError {
    #[error("empty formula")]
    EmptyFormula,
    #[error("lowercase letter at position {position} does not continue an element symbol")]
    InvalidElementSymbol { position: usize },
    #[error("opening bracket is never closed")]
    UnterminatedGroup,
    #[error("closing bracket at position {position} has no opening bracket")]
    UnexpectedGroupClose { position: usize },
    #[error("unexpected character '{character}' at position {position}")]
    UnexpectedCharacter { character: char, position: usize },
    #[error("number at position {position} does not follow an element or a group")]
    MissingElement { position: usize },
    #[error("zero multiplier at position {position}")]
    ZeroCount { position: usize },
    #[error("multiplier at position {position} is too large")]
    CountOverflow { position: usize },
}

/// A chemical species: its text as the user typed it together with the atomic composition.
/// Two formulae are the same if their texts are the same ("CH3OH" != "CH4O").
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Formula {
    pub text: String,
    pub composition: ElementCounts,
}

impl Formula {
    pub fn parse(text: &str) -> Result<Self, ParseError> {
        let composition = parse_formula(text)?;
        Ok(Self {
            text: text.to_string(),
            composition,
        })
    }

    pub fn count_of(&self, element: &str) -> usize {
        self.composition.get(element).copied().unwrap_or(0)
    }

    pub fn elements(&self) -> impl Iterator<Item = &str> {
        self.composition.keys().map(|el| el.as_str())
    }
}

impl PartialEq for Formula {
    fn eq(&self, other: &Self) -> bool {
        self.text == other.text
    }
}
impl Eq for Formula {}

impl fmt::Display for Formula {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.text)
    }
}

/// Parse a chemical formula and return the map of elements and their counts.
///
/// # Examples
/// ```
/// use StoichKit::Stoichiometry::formula_parser::parse_formula;
/// let counts = parse_formula("Na(NO3)2").unwrap();
/// assert_eq!(counts["N"], 2);
/// assert_eq!(counts["O"], 6);
/// ```
pub fn parse_formula(formula: &str) -> Result<ElementCounts, ParseError> {
    let chars: Vec<char> = formula.chars().collect();
    if chars.is_empty() {
        return Err(ParseError::EmptyFormula);
    }
    // counts of the enclosing bracket levels, the innermost level lives in `counts`
    let mut open_groups: Vec<ElementCounts> = Vec::new();
    let mut counts = ElementCounts::new();
    let mut pending: Option<PendingElement> = None;
    let mut i = 0;
    while i < chars.len() {
        let c = chars[i];
        match c {
            '(' => {
                flush(&mut counts, &mut pending, i)?;
                open_groups.push(std::mem::take(&mut counts));
                i += 1;
            }
            ')' => {
                let Some(mut outer) = open_groups.pop() else {
                    return Err(ParseError::UnexpectedGroupClose { position: i });
                };
                flush(&mut counts, &mut pending, i)?;
                let (multiplier, next) = read_number(&chars, i + 1)?;
                let multiplier = multiplier.unwrap_or(1);
                for (element, amount) in std::mem::take(&mut counts) {
                    let amount = amount
                        .checked_mul(multiplier)
                        .ok_or(ParseError::CountOverflow { position: i + 1 })?;
                    add_atoms(&mut outer, element, amount, i)?;
                }
                counts = outer;
                i = next;
            }
            c if c.is_ascii_uppercase() => {
                flush(&mut counts, &mut pending, i)?;
                pending = Some(PendingElement {
                    symbol: c.to_string(),
                    count: None,
                });
                i += 1;
            }
            c if c.is_ascii_lowercase() => {
                // only valid right after the uppercase letter (or other lowercase letters) of a symbol
                match pending.as_mut() {
                    Some(el) if el.count.is_none() && chars[i - 1].is_ascii_alphabetic() => {
                        el.symbol.push(c);
                    }
                    _ => return Err(ParseError::InvalidElementSymbol { position: i }),
                }
                i += 1;
            }
            c if c.is_ascii_digit() => {
                let (number, next) = read_number(&chars, i)?;
                match pending.as_mut() {
                    Some(el) if el.count.is_none() => el.count = number,
                    _ => return Err(ParseError::MissingElement { position: i }),
                }
                i = next;
            }
            _ => {
                return Err(ParseError::UnexpectedCharacter {
                    character: c,
                    position: i,
                });
            }
        }
    }
    if !open_groups.is_empty() {
        return Err(ParseError::UnterminatedGroup);
    }
    flush(&mut counts, &mut pending, i)?;
    if counts.is_empty() {
        // e.g. "()" - nothing to count
        return Err(ParseError::EmptyFormula);
    }
    Ok(counts)
}

// element symbol waiting for its count
struct PendingElement {
    symbol: String,
    count: Option<usize>,
}

fn add_atoms(
    counts: &mut ElementCounts,
    element: String,
    amount: usize,
    position: usize,
) -> Result<(), ParseError> {
    let total = counts.entry(element).or_insert(0);
    *total = total
        .checked_add(amount)
        .ok_or(ParseError::CountOverflow { position })?;
    Ok(())
}

fn flush(
    counts: &mut ElementCounts,
    pending: &mut Option<PendingElement>,
    position: usize,
) -> Result<(), ParseError> {
    if let Some(el) = pending.take() {
        add_atoms(counts, el.symbol, el.count.unwrap_or(1), position)?;
    }
    Ok(())
}

/// reads the digits starting at `start`, returns the number (if there were any digits) and the position after them
fn read_number(chars: &[char], start: usize) -> Result<(Option<usize>, usize), ParseError> {
    let mut i = start;
    let mut number: Option<usize> = None;
    while i < chars.len() {
        let Some(digit) = chars[i].to_digit(10) else {
            break;
        };
        let value = number
            .unwrap_or(0)
            .checked_mul(10)
            .and_then(|n| n.checked_add(digit as usize))
            .ok_or(ParseError::CountOverflow { position: start })?;
        number = Some(value);
        i += 1;
    }
    if number == Some(0) {
        return Err(ParseError::ZeroCount { position: start });
    }
    Ok((number, i))
}

#[cfg(test)]
mod tests {
    use super::*;

    fn counts(pairs: &[(&str, usize)]) -> ElementCounts {
        pairs.iter().map(|(el, n)| (el.to_string(), *n)).collect()
    }

    #[test]
    fn test_parse_formula() {
        assert_eq!(
            parse_formula("C6H8O6").unwrap(),
            counts(&[("C", 6), ("H", 8), ("O", 6)])
        );
        assert_eq!(
            parse_formula("Na(NO3)2").unwrap(),
            counts(&[("Na", 1), ("N", 2), ("O", 6)])
        );
        assert_eq!(parse_formula("H2O").unwrap(), counts(&[("H", 2), ("O", 1)]));
        assert_eq!(
            parse_formula("C5H6OOH").unwrap(),
            counts(&[("C", 5), ("H", 7), ("O", 2)])
        );
        assert_eq!(parse_formula("H2O2H2").unwrap(), counts(&[("H", 4), ("O", 2)]));
    }

    #[test]
    fn test_brackets_expand_like_manual_expansion() {
        assert_eq!(
            parse_formula("(NH4)3PO4").unwrap(),
            parse_formula("N3H12PO4").unwrap()
        );
        assert_eq!(
            parse_formula("K4Fe(CN)6").unwrap(),
            counts(&[("K", 4), ("Fe", 1), ("C", 6), ("N", 6)])
        );
        assert_eq!(
            parse_formula("Ca(H2PO4)2").unwrap(),
            counts(&[("Ca", 1), ("H", 4), ("P", 2), ("O", 8)])
        );
    }

    #[test]
    fn test_nested_brackets() {
        // Mg((OH)2)3 = Mg O6 H6
        assert_eq!(
            parse_formula("Mg((OH)2)3").unwrap(),
            counts(&[("Mg", 1), ("O", 6), ("H", 6)])
        );
        // bracket without multiplier
        assert_eq!(
            parse_formula("Ca(OH)").unwrap(),
            counts(&[("Ca", 1), ("O", 1), ("H", 1)])
        );
    }

    #[test]
    fn test_deep_nesting() {
        let depth = 200_000;
        let formula = format!("{}H{}", "(".repeat(depth), ")".repeat(depth));
        assert_eq!(parse_formula(&formula).unwrap(), counts(&[("H", 1)]));

        let unclosed = format!("{}H{}", "(".repeat(depth), ")".repeat(depth - 1));
        assert_eq!(parse_formula(&unclosed), Err(ParseError::UnterminatedGroup));
    }

    #[test]
    fn test_multidigit_counts() {
        assert_eq!(
            parse_formula("C12H22O11").unwrap(),
            counts(&[("C", 12), ("H", 22), ("O", 11)])
        );
        assert_eq!(
            parse_formula("(C2H4)100").unwrap(),
            counts(&[("C", 200), ("H", 400)])
        );
    }

    #[test]
    fn test_unknown_symbols_are_syntactically_fine() {
        assert_eq!(parse_formula("Xx2").unwrap(), counts(&[("Xx", 2)]));
    }

    #[test]
    fn test_parsing_is_deterministic() {
        let first = parse_formula("Al2(SO4)3").unwrap();
        let second = parse_formula("Al2(SO4)3").unwrap();
        assert_eq!(first, second);
    }

    #[test]
    fn test_errors() {
        assert_eq!(parse_formula("Na2("), Err(ParseError::UnterminatedGroup));
        assert_eq!(parse_formula("(OH"), Err(ParseError::UnterminatedGroup));
        assert_eq!(
            parse_formula("aH"),
            Err(ParseError::InvalidElementSymbol { position: 0 })
        );
        assert_eq!(
            parse_formula("H2e"),
            Err(ParseError::InvalidElementSymbol { position: 2 })
        );
        assert_eq!(
            parse_formula("(OH)a"),
            Err(ParseError::InvalidElementSymbol { position: 4 })
        );
        assert_eq!(
            parse_formula("OH)2"),
            Err(ParseError::UnexpectedGroupClose { position: 2 })
        );
        assert_eq!(
            parse_formula("2H2O"),
            Err(ParseError::MissingElement { position: 0 })
        );
        assert_eq!(
            parse_formula("H2O+"),
            Err(ParseError::UnexpectedCharacter {
                character: '+',
                position: 3
            })
        );
        assert_eq!(parse_formula("H0"), Err(ParseError::ZeroCount { position: 1 }));
        assert_eq!(parse_formula(""), Err(ParseError::EmptyFormula));
        assert_eq!(parse_formula("()"), Err(ParseError::EmptyFormula));
        assert!(matches!(
            parse_formula("H99999999999999999999999"),
            Err(ParseError::CountOverflow { .. })
        ));
        // each count fits, their sum does not
        assert!(matches!(
            parse_formula(&format!("H{}H", usize::MAX)),
            Err(ParseError::CountOverflow { .. })
        ));
        assert!(matches!(
            parse_formula(&format!("H{}(H)", usize::MAX)),
            Err(ParseError::CountOverflow { .. })
        ));
    }

    #[test]
    fn test_formula_equality_is_textual() {
        let a = Formula::parse("CH3OH").unwrap();
        let b = Formula::parse("CH4O").unwrap();
        assert_eq!(a.composition, b.composition);
        assert_ne!(a, b);
        assert_eq!(a.count_of("H"), 4);
        assert_eq!(a.count_of("N"), 0);
        assert_eq!(a.elements().collect::<Vec<_>>(), vec!["C", "H", "O"]);
    }
}
