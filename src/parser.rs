//! Classification of canonical instruction text.
//!
//! Parsing borrows from the line text and never fails with an error: `None`
//! means the line matches none of the label, address, or compute forms, and
//! each pass decides how to report that.

/// Operand of an address instruction.
#[derive(Debug, Clone, Copy, PartialEq)]
pub enum Operand<'a> {
    /// Decimal literal, sign included. Saturates instead of wrapping.
    Literal(i64),
    Symbol(&'a str),
}

/// The three fields of a compute instruction, `dest=comp;jump`.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct Fields<'a> {
    pub dest: Option<&'a str>,
    pub comp: &'a str,
    pub jump: Option<&'a str>,
}

impl<'a> Fields<'a> {
    /// Destination mnemonic, `""` when omitted.
    #[inline]
    pub fn dest_str(&self) -> &'a str {
        self.dest.unwrap_or("")
    }

    /// Jump mnemonic, `""` when omitted.
    #[inline]
    pub fn jump_str(&self) -> &'a str {
        self.jump.unwrap_or("")
    }
}

#[derive(Debug, Clone, Copy, PartialEq)]
pub enum Instruction<'a> {
    Label(&'a str),
    Address(Operand<'a>),
    Compute(Fields<'a>),
}

/// Instruction with every symbol converted to an address and every mnemonic
/// to its bits. This type makes it impossible to have unresolved symbols at
/// codegen time.
#[derive(Debug, Clone, PartialEq)]
pub enum ResolvedInstruction {
    AValue(u16),
    CInstruction { dest: u8, comp: u8, jump: u8 },
}

/// Characters allowed in labels and variables.
#[inline]
fn is_symbol_char(c: char) -> bool {
    c.is_ascii_alphanumeric() || matches!(c, '_' | '.' | '$' | ':')
}

/// True if `s` is non-empty and made only of symbol characters.
/// A leading digit is accepted here; the resolver rejects it.
pub fn is_symbol(s: &str) -> bool {
    !s.is_empty() && s.chars().all(is_symbol_char)
}

/// Parse an optionally signed decimal literal.
pub fn parse_literal(s: &str) -> Option<i64> {
    let (negative, digits) = match s.as_bytes().first()? {
        b'-' => (true, &s[1..]),
        b'+' => (false, &s[1..]),
        _ => (false, s),
    };
    if digits.is_empty() || !digits.bytes().all(|b| b.is_ascii_digit()) {
        return None;
    }
    let magnitude = digits.parse::<i64>().unwrap_or(i64::MAX);
    Some(if negative { -magnitude } else { magnitude })
}

/// Split a compute instruction into its fields.
///
/// Returns `None` for repeated `=` or `;`, a jump before the destination,
/// or an empty destination or comp field.
pub fn split_fields(line: &str) -> Option<Fields<'_>> {
    if line.matches('=').count() > 1 || line.matches(';').count() > 1 {
        return None;
    }

    let (dest, rest) = match line.find('=') {
        Some(eq_pos) => (Some(&line[..eq_pos]), &line[eq_pos + 1..]),
        None => (None, line),
    };

    let (comp, jump) = match rest.find(';') {
        Some(semi_pos) => (&rest[..semi_pos], Some(&rest[semi_pos + 1..])),
        None => (rest, None),
    };

    if comp.is_empty() || dest.is_some_and(|d| d.is_empty() || d.contains(';')) {
        return None;
    }

    Some(Fields { dest, comp, jump })
}

/// Parse a single normalized line.
pub fn parse_instruction(line: &str) -> Option<Instruction<'_>> {
    if let Some(rest) = line.strip_prefix('(') {
        let name = rest.strip_suffix(')')?;
        return is_symbol(name).then_some(Instruction::Label(name));
    }

    if let Some(value) = line.strip_prefix('@') {
        if let Some(literal) = parse_literal(value) {
            return Some(Instruction::Address(Operand::Literal(literal)));
        }
        return is_symbol(value).then_some(Instruction::Address(Operand::Symbol(value)));
    }

    split_fields(line).map(Instruction::Compute)
}
