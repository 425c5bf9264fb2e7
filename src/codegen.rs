use tracing::debug;

use crate::error::{AsmError, Result};
use crate::macros::CanonicalLine;
use crate::parser::{Fields, Instruction, Operand, ResolvedInstruction, parse_instruction};
use crate::symbols::SymbolTable;
use crate::tables;

/// Largest literal an A-instruction can load (15 bits).
pub const MAX_ADDRESS: u16 = 0x7FFF;

/// Extension point for different output formats, writing into a caller buffer.
pub trait Backend {
    fn encode_a(&self, value: u16, buf: &mut String);
    fn encode_c(&self, dest: u8, comp: u8, jump: u8, buf: &mut String);
}

/// Hack binary format (15-bit addresses, 16-bit instructions)
pub struct HackBinary;

impl HackBinary {
    fn push_word(word: u16, buf: &mut String) {
        for i in (0..16).rev() {
            buf.push(if word & (1 << i) != 0 { '1' } else { '0' });
        }
    }
}

impl Backend for HackBinary {
    fn encode_a(&self, value: u16, buf: &mut String) {
        // Out-of-range addresses are rejected before encoding.
        Self::push_word(value & MAX_ADDRESS, buf);
    }

    fn encode_c(&self, dest: u8, comp: u8, jump: u8, buf: &mut String) {
        let word =
            0b1110_0000_0000_0000 | ((comp as u16) << 6) | ((dest as u16) << 3) | (jump as u16);
        Self::push_word(word, buf);
    }
}

/// Code generator (generic over backend)
pub struct CodeGen<B: Backend> {
    backend: B,
}

impl<B: Backend> CodeGen<B> {
    pub fn new(backend: B) -> Self {
        Self { backend }
    }

    /// Encode a resolved instruction into `buf`.
    pub fn encode(&self, inst: &ResolvedInstruction, buf: &mut String) {
        match inst {
            ResolvedInstruction::AValue(value) => self.backend.encode_a(*value, buf),
            ResolvedInstruction::CInstruction { dest, comp, jump } => {
                self.backend.encode_c(*dest, *comp, *jump, buf)
            }
        }
    }

    /// Second pass: one output word per non-label instruction, in order.
    pub fn generate(
        &self,
        lines: &[CanonicalLine<'_>],
        symbols: &SymbolTable,
    ) -> Result<Vec<String>> {
        let mut words = Vec::with_capacity(lines.len());

        for line in lines {
            if let Some(resolved) = resolve(line, symbols)? {
                let mut buf = String::with_capacity(16);
                self.encode(&resolved, &mut buf);
                words.push(buf);
            }
        }

        debug!(words = words.len(), "code generation complete");
        Ok(words)
    }
}

/// Turn one canonical line into its resolved form. Labels yield `None`.
fn resolve(
    line: &CanonicalLine<'_>,
    symbols: &SymbolTable,
) -> Result<Option<ResolvedInstruction>> {
    let inst = match parse_instruction(&line.text).ok_or_else(|| line.malformed())? {
        Instruction::Label(_) => return Ok(None),
        Instruction::Address(Operand::Literal(value)) => {
            ResolvedInstruction::AValue(literal_address(value, line)?)
        }
        Instruction::Address(Operand::Symbol(symbol)) => {
            let addr = symbols
                .get(symbol)
                .ok_or_else(|| AsmError::UnresolvedSymbol {
                    line: line.line,
                    text: line.source.to_string(),
                    symbol: symbol.to_string(),
                })?;
            ResolvedInstruction::AValue(addr)
        }
        Instruction::Compute(fields) => encode_fields(&fields, line)?,
    };
    Ok(Some(inst))
}

fn literal_address(value: i64, line: &CanonicalLine<'_>) -> Result<u16> {
    if value < 0 {
        return Err(AsmError::NegativeLiteral {
            line: line.line,
            text: line.source.to_string(),
        });
    }
    if value > i64::from(MAX_ADDRESS) {
        return Err(AsmError::Overflow {
            line: line.line,
            text: line.source.to_string(),
            value: value.to_string(),
        });
    }
    Ok(value as u16)
}

fn encode_fields(fields: &Fields<'_>, line: &CanonicalLine<'_>) -> Result<ResolvedInstruction> {
    let dest_str = fields.dest_str();
    let jump_str = fields.jump_str();

    let dest = tables::dest(dest_str).ok_or_else(|| AsmError::InvalidDest {
        line: line.line,
        text: line.source.to_string(),
        mnemonic: dest_str.to_string(),
    })?;

    let comp = tables::comp(fields.comp).ok_or_else(|| AsmError::InvalidComp {
        line: line.line,
        text: line.source.to_string(),
        mnemonic: fields.comp.to_string(),
    })?;

    let jump = tables::jump(jump_str).ok_or_else(|| AsmError::InvalidJump {
        line: line.line,
        text: line.source.to_string(),
        mnemonic: jump_str.to_string(),
    })?;

    Ok(ResolvedInstruction::CInstruction { dest, comp, jump })
}

// Type alias for current implementation
pub type HackCodeGen = CodeGen<HackBinary>;

impl HackCodeGen {
    pub fn hack() -> Self {
        Self::new(HackBinary)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn canonical(lines: &[&str]) -> Vec<CanonicalLine<'static>> {
        lines
            .iter()
            .enumerate()
            .map(|(i, text)| CanonicalLine {
                line: i + 1,
                source: "",
                text: text.to_string(),
            })
            .collect()
    }

    fn generate(lines: &[&str]) -> Result<Vec<String>> {
        let lines = canonical(lines);
        let symbols = SymbolTable::build(&lines)?;
        HackCodeGen::hack().generate(&lines, &symbols)
    }

    #[test]
    fn test_encode_a_value() {
        let codegen = HackCodeGen::hack();
        let mut buf = String::new();

        codegen.encode(&ResolvedInstruction::AValue(0), &mut buf);
        assert_eq!(buf, "0000000000000000");

        buf.clear();
        codegen.encode(&ResolvedInstruction::AValue(17), &mut buf);
        assert_eq!(buf, "0000000000010001");

        buf.clear();
        codegen.encode(&ResolvedInstruction::AValue(32767), &mut buf);
        assert_eq!(buf, "0111111111111111");
    }

    #[test]
    fn test_encode_c_instruction() {
        let codegen = HackCodeGen::hack();
        let mut buf = String::new();

        // D=M
        let inst = ResolvedInstruction::CInstruction {
            dest: 0b010,
            comp: 0b1110000,
            jump: 0b000,
        };
        codegen.encode(&inst, &mut buf);
        assert_eq!(buf, "1111110000010000");

        buf.clear();
        // MD=D+1;JMP
        let inst = ResolvedInstruction::CInstruction {
            dest: 0b011,
            comp: 0b0011111,
            jump: 0b111,
        };
        codegen.encode(&inst, &mut buf);
        assert_eq!(buf, "1110011111011111");
    }

    #[test]
    fn test_generate_mixed() {
        let words = generate(&["@2", "D=A", "(END)", "@END", "D;JGT"]).unwrap();
        assert_eq!(
            words,
            [
                "0000000000000010",
                "1110110000010000",
                "0000000000000010",
                "1110001100000001",
            ]
        );
    }

    #[test]
    fn test_overflow() {
        assert!(generate(&["@32767"]).is_ok());
        let err = generate(&["@32768"]).unwrap_err();
        assert!(matches!(err, AsmError::Overflow { ref value, .. } if value == "32768"));
    }

    #[test]
    fn test_unrecognized_mnemonics() {
        let err = generate(&["@0", "X=D"]).unwrap_err();
        assert!(matches!(err, AsmError::InvalidDest { line: 2, .. }));

        let err = generate(&["D=D*A"]).unwrap_err();
        assert!(matches!(err, AsmError::InvalidComp { ref mnemonic, .. } if mnemonic == "D*A"));

        let err = generate(&["0;JUMP"]).unwrap_err();
        assert!(matches!(err, AsmError::InvalidJump { ref mnemonic, .. } if mnemonic == "JUMP"));
    }

    #[test]
    fn test_unresolved_without_symbol_pass() {
        let lines = canonical(&["@nowhere"]);
        let err = HackCodeGen::hack()
            .generate(&lines, &SymbolTable::new())
            .unwrap_err();
        assert!(matches!(err, AsmError::UnresolvedSymbol { .. }));
    }
}
