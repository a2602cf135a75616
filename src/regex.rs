//! Regular expression values and the algebra used to combine them.
//!
//! A [`Regex`] is kept as a tagged tree rather than a string so that the
//! algebraic identities of union, concatenation and star hold exactly. The
//! only way values are combined is through [`Regex::union`],
//! [`Regex::concat`] and [`Regex::star`]; these maintain the shape invariants
//! documented on each variant. Rendering to text happens in the `Display`
//! impl and nowhere else.

use std::fmt;

use bincode::{Decode, Encode};

pub const EMPTY_SET_STR: &str = "∅";
pub const EPSILON_STR: &str = "ε";

// chars with a meaning in rendered expressions
const RESERVED_CHARS: [char; 9] = ['+', '*', '(', ')', '{', '}', '\\', '∅', 'ε'];

#[derive(Debug, Clone, Default, PartialEq, Eq, PartialOrd, Ord, Hash, Encode, Decode)]
pub enum Regex {
    /// The empty language.
    #[default]
    Empty,
    /// The language containing only the empty string.
    Epsilon,
    /// Renders verbatim when it is a single plain char, otherwise braced as
    /// `{ab}` with `}` and `\\` escaped.
    Symbol(String),
    /// At least two terms, sorted and distinct, none of them `Empty` or `Union`.
    Union(Vec<Regex>),
    /// At least two factors, none of them `Empty`, `Epsilon` or `Concat`.
    Concat(Vec<Regex>),
    /// Never wraps `Empty`, `Epsilon` or another `Star`.
    Star(Box<Regex>),
}

impl Regex {
    pub fn symbol(symbol: impl Into<String>) -> Self {
        Regex::Symbol(symbol.into())
    }

    /// Whether this is the empty-language sentinel.
    pub fn is_empty(&self) -> bool {
        matches!(self, Regex::Empty)
    }

    pub fn is_epsilon(&self) -> bool {
        matches!(self, Regex::Epsilon)
    }

    pub fn is_union(&self) -> bool {
        matches!(self, Regex::Union(_))
    }

    pub fn union(self, other: Regex) -> Regex {
        let mut terms: Vec<Regex> = Vec::new();
        for operand in [self, other] {
            match operand {
                Regex::Empty => {}
                Regex::Union(parts) => terms.extend(parts),
                term => terms.push(term),
            }
        }
        terms.sort();
        terms.dedup();
        if terms.len() > 1 {
            Regex::Union(terms)
        } else {
            terms.pop().unwrap_or(Regex::Empty)
        }
    }

    pub fn concat(self, other: Regex) -> Regex {
        match (self, other) {
            (Regex::Empty, _) | (_, Regex::Empty) => Regex::Empty,
            (Regex::Epsilon, rhs) => rhs,
            (lhs, Regex::Epsilon) => lhs,
            (lhs, rhs) => {
                let mut factors: Vec<Regex> = Vec::new();
                for operand in [lhs, rhs] {
                    match operand {
                        Regex::Concat(parts) => factors.extend(parts),
                        factor => factors.push(factor),
                    }
                }
                Regex::Concat(factors)
            }
        }
    }

    pub fn star(self) -> Regex {
        match self {
            Regex::Empty | Regex::Epsilon => Regex::Epsilon,
            starred @ Regex::Star(_) => starred,
            inner => Regex::Star(Box::new(inner)),
        }
    }

    // symbols render as a single char or a braced group, both take a bare star
    fn is_atomic(&self) -> bool {
        matches!(self, Regex::Symbol(_))
    }

    /// Length in characters of the rendered expression, computed without
    /// rendering it.
    pub fn width(&self) -> usize {
        match self {
            Regex::Empty | Regex::Epsilon => 1,
            Regex::Symbol(s) if is_plain_symbol(s) => 1,
            Regex::Symbol(s) => {
                let escapes = s.chars().filter(|&c| c == '}' || c == '\\').count();
                s.chars().count() + escapes + 2
            }
            Regex::Union(terms) => {
                terms.iter().map(Regex::width).sum::<usize>() + terms.len().saturating_sub(1)
            }
            Regex::Concat(factors) => factors
                .iter()
                .map(|f| if f.is_union() { f.width() + 2 } else { f.width() })
                .sum(),
            Regex::Star(inner) => {
                let parens = if inner.is_atomic() { 0 } else { 2 };
                inner.width() + parens + 1
            }
        }
    }
}

fn is_plain_symbol(symbol: &str) -> bool {
    let mut chars = symbol.chars();
    match (chars.next(), chars.next()) {
        (Some(c), None) => !RESERVED_CHARS.contains(&c),
        _ => false,
    }
}

impl fmt::Display for Regex {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Regex::Empty => f.write_str(EMPTY_SET_STR),
            Regex::Epsilon => f.write_str(EPSILON_STR),
            Regex::Symbol(s) if is_plain_symbol(s) => f.write_str(s),
            Regex::Symbol(s) => {
                f.write_str("{")?;
                for c in s.chars() {
                    if c == '}' || c == '\\' {
                        f.write_str("\\")?;
                    }
                    write!(f, "{}", c)?;
                }
                f.write_str("}")
            }
            Regex::Union(terms) => {
                for (i, term) in terms.iter().enumerate() {
                    if i > 0 {
                        f.write_str("+")?;
                    }
                    write!(f, "{}", term)?;
                }
                Ok(())
            }
            Regex::Concat(factors) => {
                for factor in factors {
                    if factor.is_union() {
                        write!(f, "({})", factor)?;
                    } else {
                        write!(f, "{}", factor)?;
                    }
                }
                Ok(())
            }
            Regex::Star(inner) if inner.is_atomic() => write!(f, "{}*", inner),
            Regex::Star(inner) => write!(f, "({})*", inner),
        }
    }
}
