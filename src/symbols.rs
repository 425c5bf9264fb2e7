use indexmap::IndexMap;
use phf::phf_map;
use std::collections::HashMap;
use tracing::{debug, trace};

use crate::codegen::MAX_ADDRESS;
use crate::error::{AsmError, Result};
use crate::macros::CanonicalLine;
use crate::parser::{Instruction, Operand, parse_instruction};

/// Predefined symbols (compile-time perfect hash map)
pub static PREDEFINED: phf::Map<&'static str, u16> = phf_map! {
    "R0" => 0, "R1" => 1, "R2" => 2, "R3" => 3,
    "R4" => 4, "R5" => 5, "R6" => 6, "R7" => 7,
    "R8" => 8, "R9" => 9, "R10" => 10, "R11" => 11,
    "R12" => 12, "R13" => 13, "R14" => 14, "R15" => 15,
};

/// First RAM address handed out to variables.
pub const VARIABLE_BASE: u16 = 16;

/// Label and variable bindings on top of the predefined registers.
///
/// Bindings are only ever added. Once `build` returns, the table is complete
/// and every address symbol in the program resolves.
#[derive(Debug)]
pub struct SymbolTable {
    symbols: HashMap<String, u16>,
    next_var_address: u16,
}

impl Default for SymbolTable {
    fn default() -> Self {
        Self::new()
    }
}

impl SymbolTable {
    pub fn new() -> Self {
        Self {
            symbols: HashMap::with_capacity(64),
            next_var_address: VARIABLE_BASE,
        }
    }

    /// Build the table in one forward pass over the canonical program.
    ///
    /// Labels bind to the count of instructions before them. Address symbols
    /// that are not yet bound are queued in first-seen order and become
    /// variables once the pass ends, so forward label references never use
    /// up a variable slot.
    pub fn build(lines: &[CanonicalLine<'_>]) -> Result<Self> {
        let mut table = Self::new();
        let mut pending: IndexMap<&str, &CanonicalLine<'_>> = IndexMap::new();
        let mut rom_address = 0usize;

        for line in lines {
            match parse_instruction(&line.text).ok_or_else(|| line.malformed())? {
                Instruction::Label(name) => {
                    check_symbol(name, line)?;
                    let address = u16::try_from(rom_address)
                        .ok()
                        .filter(|&addr| addr <= MAX_ADDRESS)
                        .ok_or_else(|| overflow(line, rom_address))?;
                    table
                        .add_label(name.to_string(), address)
                        .map_err(|label| AsmError::DuplicateLabel {
                            line: line.line,
                            text: line.source.to_string(),
                            label,
                        })?;
                    continue;
                }
                Instruction::Address(Operand::Literal(value)) if value < 0 => {
                    return Err(AsmError::NegativeLiteral {
                        line: line.line,
                        text: line.source.to_string(),
                    });
                }
                Instruction::Address(Operand::Symbol(symbol)) => {
                    check_symbol(symbol, line)?;
                    if table.get(symbol).is_none() {
                        pending.entry(symbol).or_insert(line);
                    }
                }
                Instruction::Address(Operand::Literal(_)) | Instruction::Compute(_) => {}
            }
            rom_address += 1;
        }

        for (symbol, line) in pending {
            if table.get(symbol).is_none() {
                let addr = table.allocate(symbol, line)?;
                trace!(symbol, addr, "allocated variable");
            }
        }

        debug!(
            instructions = rom_address,
            symbols = table.len(),
            variables = table.variable_count(),
            "symbol table complete"
        );
        Ok(table)
    }

    /// Bind a label. Fails with the label name if it is already bound,
    /// including to a predefined register.
    pub fn add_label(&mut self, label: String, address: u16) -> std::result::Result<(), String> {
        if PREDEFINED.contains_key(label.as_str()) || self.symbols.contains_key(&label) {
            return Err(label);
        }
        self.symbols.insert(label, address);
        Ok(())
    }

    /// Bind `symbol` to the next free RAM address. `line` is the first
    /// reference, reported if RAM above the 15-bit range would be needed.
    fn allocate(&mut self, symbol: &str, line: &CanonicalLine<'_>) -> Result<u16> {
        let addr = self.next_var_address;
        if addr > MAX_ADDRESS {
            return Err(overflow(line, usize::from(addr)));
        }
        self.symbols.insert(symbol.to_string(), addr);
        self.next_var_address = addr
            .checked_add(1)
            .ok_or_else(|| overflow(line, usize::from(addr) + 1))?;
        Ok(addr)
    }

    pub fn get(&self, symbol: &str) -> Option<u16> {
        PREDEFINED
            .get(symbol)
            .copied()
            .or_else(|| self.symbols.get(symbol).copied())
    }

    /// Number of user symbols (labels and variables).
    pub fn len(&self) -> usize {
        self.symbols.len()
    }

    pub fn is_empty(&self) -> bool {
        self.symbols.is_empty()
    }

    /// Number of variables allocated so far.
    pub fn variable_count(&self) -> usize {
        usize::from(self.next_var_address - VARIABLE_BASE)
    }
}

fn overflow(line: &CanonicalLine<'_>, address: usize) -> AsmError {
    AsmError::Overflow {
        line: line.line,
        text: line.source.to_string(),
        value: address.to_string(),
    }
}

/// Labels and variables may not start with a digit.
fn check_symbol(symbol: &str, line: &CanonicalLine<'_>) -> Result<()> {
    if symbol.starts_with(|c: char| c.is_ascii_digit()) {
        return Err(AsmError::InvalidLabel {
            line: line.line,
            text: line.source.to_string(),
            symbol: symbol.to_string(),
        });
    }
    Ok(())
}
