//! Shorthand expansion into canonical Hack instructions.
//!
//! Each rule inspects the fields of a compute instruction and either declines
//! or returns the replacement lines. Rules are tried in order and the first
//! match wins. Replacement lines are never expanded again.

use tracing::trace;

use crate::error::AsmError;
use crate::normalize::SourceLine;
use crate::parser::{Fields, parse_literal, split_fields};
use crate::tables::{is_comp, is_dest};

/// One canonical instruction, tagged with the source line it came from.
#[derive(Debug, Clone, PartialEq)]
pub struct CanonicalLine<'a> {
    /// 1-based line number in the source.
    pub line: usize,
    /// Raw source text, used in error messages.
    pub source: &'a str,
    /// Canonical instruction text.
    pub text: String,
}

impl CanonicalLine<'_> {
    pub(crate) fn malformed(&self) -> AsmError {
        AsmError::MalformedLine {
            line: self.line,
            text: self.source.to_string(),
        }
    }
}

type Rule = fn(&Fields<'_>) -> Option<Vec<String>>;

const RULES: &[Rule] = &[
    increment,
    decrement,
    copy_memory,
    store_register,
    load_register,
    assign_immediate,
    labeled_jump,
];

/// Expand one normalized, non-empty line.
///
/// Lines that are not shorthand come back unchanged as a single element.
pub fn expand_line(line: &str) -> Vec<String> {
    if !line.starts_with('@') && !line.starts_with('(') {
        if let Some(fields) = split_fields(line) {
            for rule in RULES {
                if let Some(expanded) = rule(&fields) {
                    return expanded;
                }
            }
        }
    }
    vec![line.to_string()]
}

/// Expand a sequence of normalized source lines.
pub fn expand<'a>(lines: impl IntoIterator<Item = SourceLine<'a>>) -> Vec<CanonicalLine<'a>> {
    let mut canonical = Vec::new();

    for src in lines {
        let expanded = expand_line(&src.text);
        if expanded.len() > 1 || expanded[0] != src.text {
            trace!(line = src.number, from = %src.text, into = ?expanded, "expanded shorthand");
        }
        canonical.extend(expanded.into_iter().map(|text| CanonicalLine {
            line: src.number,
            source: src.raw,
            text,
        }));
    }

    canonical
}

/// `dest=comp` with both sides present and no jump.
fn assignment<'a>(fields: &Fields<'a>) -> Option<(&'a str, &'a str)> {
    match (fields.dest, fields.jump) {
        (Some(dest), None) => Some((dest, fields.comp)),
        _ => None,
    }
}

/// A plain symbol operand: not a comp mnemonic and not an integer literal.
fn is_memory_operand(s: &str) -> bool {
    !is_comp(s) && parse_literal(s).is_none()
}

fn step(fields: &Fields<'_>, suffix: &str, op: char) -> Option<Vec<String>> {
    if fields.dest.is_some() || fields.jump.is_some() {
        return None;
    }
    let target = fields.comp.strip_suffix(suffix).filter(|t| !t.is_empty())?;

    if is_dest(target) {
        Some(vec![format!("{target}={target}{op}1")])
    } else {
        Some(vec![format!("@{target}"), format!("M=M{op}1")])
    }
}

/// `X++`
fn increment(fields: &Fields<'_>) -> Option<Vec<String>> {
    step(fields, "++", '+')
}

/// `X--`
fn decrement(fields: &Fields<'_>) -> Option<Vec<String>> {
    step(fields, "--", '-')
}

/// `X=Y`, both memory locations.
fn copy_memory(fields: &Fields<'_>) -> Option<Vec<String>> {
    let (dest, src) = assignment(fields)?;
    if is_dest(dest) || !is_memory_operand(src) {
        return None;
    }
    Some(vec![
        format!("@{src}"),
        "D=M".to_string(),
        format!("@{dest}"),
        "M=D".to_string(),
    ])
}

/// `X=comp`, storing a computed value to memory.
fn store_register(fields: &Fields<'_>) -> Option<Vec<String>> {
    let (dest, comp) = assignment(fields)?;
    if is_dest(dest) || !is_comp(comp) {
        return None;
    }
    Some(vec![format!("@{dest}"), format!("M={comp}")])
}

/// `dest=X`, loading a memory location into registers.
fn load_register(fields: &Fields<'_>) -> Option<Vec<String>> {
    let (dest, src) = assignment(fields)?;
    if !is_dest(dest) || !is_memory_operand(src) {
        return None;
    }
    Some(vec![format!("@{src}"), format!("{dest}=M")])
}

/// `dest=N` or `X=N` for an integer literal `N`.
fn assign_immediate(fields: &Fields<'_>) -> Option<Vec<String>> {
    let (dest, value) = assignment(fields)?;
    if is_comp(value) || parse_literal(value).is_none() {
        return None;
    }

    if is_dest(dest) {
        Some(vec![format!("@{value}"), format!("{dest}=A")])
    } else {
        Some(vec![
            format!("@{value}"),
            "D=A".to_string(),
            format!("@{dest}"),
            "M=D".to_string(),
        ])
    }
}

/// `comp;jump:label`
fn labeled_jump(fields: &Fields<'_>) -> Option<Vec<String>> {
    let (jump, label) = fields.jump?.split_once(':')?;
    let instruction = match fields.dest {
        Some(dest) => format!("{dest}={};{jump}", fields.comp),
        None => format!("{};{jump}", fields.comp),
    };
    Some(vec![format!("@{label}"), instruction])
}
