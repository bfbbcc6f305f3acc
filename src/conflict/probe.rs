//! Probe synthesis for conflict detection.
//!
//! A probe is a synthetic card number that satisfies one BIN pattern. To
//! build probes we parse the small subset of regex syntax that catalog BIN
//! patterns actually use and enumerate literal digit prefixes from it:
//!
//! - literal digits, `\d`, `.`
//! - character classes of digits and digit ranges (`[0-6]`, `[046]`)
//! - groups `(...)` and `(?:...)` with `|` alternation, at any depth
//! - quantifiers `{n}`, `{n,m}`, `{n,}`, `?`, `*`, `+` (the minimum count
//!   is used)
//! - a leading `^`
//!
//! Anything else ends the expansion at that point. Enumeration is capped,
//! and alternatives are visited round-robin so the cap samples every branch
//! before going deeper into any one of them. If nothing usable comes out,
//! the longest literal digit run of the pattern is used instead.
//!
//! Every probe is checked against its own pattern before it is returned, so
//! a truncated or approximate expansion never yields a false probe.

use crate::catalog::BinPattern;
use crate::matcher::matches;

/// No card number is longer, so no longer prefix can yield a probe.
const MAX_PREFIX_LEN: usize = 19;

/// Group nesting deeper than this ends the expansion.
const MAX_DEPTH: usize = 32;

#[derive(Debug, Clone, PartialEq, Eq)]
enum Node {
    Digit(u8),
    Class(Vec<u8>),
    Group(Vec<Vec<Atom>>),
}

#[derive(Debug, Clone, PartialEq, Eq)]
struct Atom {
    node: Node,
    repeat: usize,
}

struct Parser<'a> {
    src: &'a [u8],
    pos: usize,
    depth: usize,
    /// Set once an unsupported construct is hit; parsing unwinds from there.
    stopped: bool,
}

impl<'a> Parser<'a> {
    fn new(src: &'a str) -> Self {
        Self {
            src: src.as_bytes(),
            pos: 0,
            depth: 0,
            stopped: false,
        }
    }

    fn peek(&self) -> Option<u8> {
        self.src.get(self.pos).copied()
    }

    fn eat(&mut self, b: u8) -> bool {
        if self.peek() == Some(b) {
            self.pos += 1;
            true
        } else {
            false
        }
    }

    fn alternation(&mut self) -> Vec<Vec<Atom>> {
        let mut alternatives = vec![self.sequence()];
        while !self.stopped && self.eat(b'|') {
            alternatives.push(self.sequence());
        }
        alternatives
    }

    fn sequence(&mut self) -> Vec<Atom> {
        let mut atoms = Vec::new();
        let start = self.pos;

        loop {
            if self.stopped {
                break;
            }
            let node = match self.peek() {
                None | Some(b'|') | Some(b')') => break,
                Some(b'^') if self.pos == start => {
                    self.pos += 1;
                    continue;
                }
                Some(b) if b.is_ascii_digit() => {
                    self.pos += 1;
                    Node::Digit(b - b'0')
                }
                Some(b'.') => {
                    self.pos += 1;
                    Node::Class((0..10).collect())
                }
                Some(b'\\') => match self.src.get(self.pos + 1) {
                    Some(b'd') => {
                        self.pos += 2;
                        Node::Class((0..10).collect())
                    }
                    _ => break self.stop(),
                },
                Some(b'[') => match self.class() {
                    Some(members) => Node::Class(members),
                    None => break self.stop(),
                },
                Some(b'(') => match self.group() {
                    Some(alternatives) => Node::Group(alternatives),
                    None => break self.stop(),
                },
                Some(_) => break self.stop(),
            };

            let repeat = match self.quantifier() {
                Some(n) => n,
                None => break self.stop(),
            };
            atoms.push(Atom { node, repeat });
        }

        atoms
    }

    fn stop(&mut self) {
        self.stopped = true;
    }

    /// Parses `[...]` into the sorted digits it admits.
    fn class(&mut self) -> Option<Vec<u8>> {
        self.pos += 1;
        if self.peek() == Some(b'^') {
            return None;
        }

        let mut members = [false; 10];
        loop {
            match self.peek()? {
                b']' => {
                    self.pos += 1;
                    break;
                }
                b'\\' => {
                    if self.src.get(self.pos + 1) != Some(&b'd') {
                        return None;
                    }
                    members = [true; 10];
                    self.pos += 2;
                }
                lo if lo.is_ascii_digit() => {
                    self.pos += 1;
                    let hi = if self.peek() == Some(b'-')
                        && self.src.get(self.pos + 1).is_some_and(u8::is_ascii_digit)
                    {
                        let hi = self.src[self.pos + 1];
                        self.pos += 2;
                        hi
                    } else {
                        lo
                    };
                    for d in lo..=hi {
                        members[(d - b'0') as usize] = true;
                    }
                }
                // Non-digit members can never match a card number.
                _ => self.pos += 1,
            }
        }

        let digits: Vec<u8> = (0..10u8).filter(|&d| members[d as usize]).collect();
        (!digits.is_empty()).then_some(digits)
    }

    /// Parses `(...)` or `(?:...)`.
    fn group(&mut self) -> Option<Vec<Vec<Atom>>> {
        if self.depth == MAX_DEPTH {
            return None;
        }
        self.pos += 1;
        if self.eat(b'?') && !self.eat(b':') {
            return None;
        }
        self.depth += 1;
        let alternatives = self.alternation();
        self.depth -= 1;
        if self.stopped {
            // Keep the branches parsed so far; the caller stops after us.
            return Some(alternatives);
        }
        self.eat(b')').then_some(alternatives)
    }

    /// Parses an optional quantifier and returns its minimum count, clamped
    /// to [`MAX_PREFIX_LEN`].
    fn quantifier(&mut self) -> Option<usize> {
        let count = match self.peek() {
            Some(b'?') | Some(b'*') => {
                self.pos += 1;
                0
            }
            Some(b'+') => {
                self.pos += 1;
                1
            }
            Some(b'{') => {
                let close = self.src[self.pos..].iter().position(|&b| b == b'}')?;
                let body = std::str::from_utf8(&self.src[self.pos + 1..self.pos + close]).ok()?;
                let min = body.split(',').next()?.trim();
                if min.is_empty() || !min.bytes().all(|b| b.is_ascii_digit()) {
                    return None;
                }
                self.pos += close + 1;
                // Parsing saturates instead of overflowing on huge counts
                min.bytes()
                    .fold(0usize, |n, b| (n * 10 + (b - b'0') as usize).min(MAX_PREFIX_LEN))
            }
            _ => return Some(1),
        };
        // Lazy modifier
        self.eat(b'?');
        Some(count)
    }
}

/// Appends each option to each prefix, keeping at most `cap` distinct
/// results of at most [`MAX_PREFIX_LEN`] digits.
fn product(prefixes: Vec<String>, options: &[String], cap: usize) -> Vec<String> {
    let mut out: Vec<String> = Vec::with_capacity(cap.min(prefixes.len() * options.len()));
    'outer: for prefix in &prefixes {
        for option in options {
            if out.len() == cap {
                break 'outer;
            }
            let mut joined = format!("{}{}", prefix, option);
            joined.truncate(MAX_PREFIX_LEN);
            if !out.contains(&joined) {
                out.push(joined);
            }
        }
    }
    out
}

fn expand_sequence(atoms: &[Atom], cap: usize) -> Vec<String> {
    let mut prefixes = vec![String::new()];
    for atom in atoms {
        let options: Vec<String> = match &atom.node {
            Node::Digit(d) => vec![d.to_string()],
            Node::Class(members) => members.iter().map(u8::to_string).collect(),
            Node::Group(alternatives) => expand_alternatives(alternatives, cap),
        };
        if options.is_empty() {
            break;
        }
        for _ in 0..atom.repeat {
            if prefixes.iter().all(|p| p.len() >= MAX_PREFIX_LEN) {
                return prefixes;
            }
            prefixes = product(prefixes, &options, cap);
        }
    }
    prefixes
}

/// Expands alternatives round-robin, deduplicated, up to `cap` strings.
fn expand_alternatives(alternatives: &[Vec<Atom>], cap: usize) -> Vec<String> {
    let expanded: Vec<Vec<String>> = alternatives
        .iter()
        .map(|alt| expand_sequence(alt, cap))
        .collect();

    let mut out: Vec<String> = Vec::new();
    let longest = expanded.iter().map(Vec::len).max().unwrap_or(0);
    for round in 0..longest {
        for strings in &expanded {
            if out.len() == cap {
                return out;
            }
            if let Some(s) = strings.get(round) {
                if !out.contains(s) {
                    out.push(s.clone());
                }
            }
        }
    }
    out
}

/// Returns the longest run of literal digits in a pattern source.
fn longest_digit_run(bin: &str) -> String {
    bin.split(|c: char| !c.is_ascii_digit())
        .fold("", |best, run| if run.len() > best.len() { run } else { best })
        .to_string()
}

/// Enumerates up to `cap` literal digit prefixes admitted by a BIN regex.
///
/// # Example
///
/// ```
/// use card_identifier::conflict::probe::literal_prefixes;
///
/// assert_eq!(
///     literal_prefixes("^(506699|5067[0-6]\\d)", 3),
///     vec!["506699", "506700", "506701"]
/// );
/// assert_eq!(literal_prefixes("^3[47]", 5), vec!["34", "37"]);
/// ```
pub fn literal_prefixes(bin: &str, cap: usize) -> Vec<String> {
    if cap == 0 {
        return Vec::new();
    }

    let mut parser = Parser::new(bin);
    let alternatives = parser.alternation();
    let prefixes: Vec<String> = expand_alternatives(&alternatives, cap)
        .into_iter()
        .filter(|p| !p.is_empty())
        .collect();

    if prefixes.is_empty() {
        let run = longest_digit_run(bin);
        return if run.is_empty() { Vec::new() } else { vec![run] };
    }
    prefixes
}

/// Synthesizes probe numbers for a pattern.
///
/// Each literal prefix is zero-padded to every declared length it fits in,
/// and only probes the pattern itself accepts are kept.
pub fn probes(pattern: &BinPattern, cap: usize) -> Vec<String> {
    if cap == 0 {
        return Vec::new();
    }

    let mut prefixes = literal_prefixes(pattern.bin(), cap);
    let expanded = prefixes.len();

    let fallback = longest_digit_run(pattern.bin());
    if !fallback.is_empty() && !prefixes.contains(&fallback) {
        // Only consulted when none of the expanded prefixes survives below.
        prefixes.push(fallback);
    }

    let mut out = Vec::new();
    for (i, prefix) in prefixes.iter().enumerate() {
        if i >= expanded && !out.is_empty() {
            break;
        }
        for &length in pattern.lengths() {
            if prefix.len() > length {
                continue;
            }
            let mut probe = String::with_capacity(length);
            probe.push_str(prefix);
            probe.extend(std::iter::repeat('0').take(length - prefix.len()));
            if matches(&probe, pattern) && !out.contains(&probe) {
                out.push(probe);
            }
        }
    }
    out
}
