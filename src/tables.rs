//! Encoding tables for C-instruction fields (compile-time perfect hash maps).

use phf::phf_map;

/// comp field (7 bits: a + 6 c-bits).
/// The 'a' bit selects M (a=1) or A (a=0) as the second ALU operand.
pub static COMP: phf::Map<&'static str, u8> = phf_map! {
    // === Constants (a=0) ===
    "0" => 0b0101010,
    "1" => 0b0111111,
    "-1" => 0b0111010,

    // === D-register operations (a=0) ===
    "D" => 0b0001100,
    "!D" => 0b0001101,
    "-D" => 0b0001111,
    "D+1" => 0b0011111, "1+D" => 0b0011111,
    "D-1" => 0b0001110,

    // === A-register operations (a=0) ===
    "A" => 0b0110000,
    "!A" => 0b0110001,
    "-A" => 0b0110011,
    "A+1" => 0b0110111, "1+A" => 0b0110111,
    "A-1" => 0b0110010,

    // === ALU operations with A-register (a=0) ===
    "D+A" => 0b0000010, "A+D" => 0b0000010,
    "D-A" => 0b0010011,
    "A-D" => 0b0000111,
    "D&A" => 0b0000000, "A&D" => 0b0000000,
    "D|A" => 0b0010101, "A|D" => 0b0010101,

    // === M-register operations (a=1) ===
    "M" => 0b1110000,
    "!M" => 0b1110001,
    "-M" => 0b1110011,
    "M+1" => 0b1110111, "1+M" => 0b1110111,
    "M-1" => 0b1110010,

    // === ALU operations with M-register (a=1) ===
    "D+M" => 0b1000010, "M+D" => 0b1000010,
    "D-M" => 0b1010011,
    "M-D" => 0b1000111,
    "D&M" => 0b1000000, "M&D" => 0b1000000,
    "D|M" => 0b1010101, "M|D" => 0b1010101,
};

/// dest field (3 bits: A D M). The empty string is "no destination".
pub static DEST: phf::Map<&'static str, u8> = phf_map! {
    "" => 0b000,
    "M" => 0b001,
    "D" => 0b010,
    "MD" => 0b011, "DM" => 0b011,
    "A" => 0b100,
    "AM" => 0b101, "MA" => 0b101,
    "AD" => 0b110, "DA" => 0b110,
    "AMD" => 0b111, "ADM" => 0b111, "MAD" => 0b111,
    "MDA" => 0b111, "DAM" => 0b111, "DMA" => 0b111,
};

/// jump field (3 bits). The empty string is "no jump".
pub static JUMP: phf::Map<&'static str, u8> = phf_map! {
    "" => 0b000,
    "JGT" => 0b001,
    "JEQ" => 0b010,
    "JGE" => 0b011,
    "JLT" => 0b100,
    "JNE" => 0b101,
    "JLE" => 0b110,
    "JMP" => 0b111,
};

#[inline]
pub fn comp(s: &str) -> Option<u8> {
    COMP.get(s).copied()
}

#[inline]
pub fn dest(s: &str) -> Option<u8> {
    DEST.get(s).copied()
}

#[inline]
pub fn jump(s: &str) -> Option<u8> {
    JUMP.get(s).copied()
}

#[inline]
pub fn is_comp(s: &str) -> bool {
    COMP.contains_key(s)
}

#[inline]
pub fn is_dest(s: &str) -> bool {
    DEST.contains_key(s)
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_comp_selector_bit() {
        for (mnemonic, bits) in COMP.entries() {
            let uses_m = mnemonic.contains('M');
            assert_eq!(bits & 0b1000000 != 0, uses_m, "selector bit for {mnemonic}");
        }
    }

    #[test]
    fn test_commutative_aliases() {
        assert_eq!(comp("D+A"), comp("A+D"));
        assert_eq!(comp("D|M"), comp("M|D"));
        assert_eq!(dest("AMD"), dest("DMA"));
    }

    #[test]
    fn test_empty_fields() {
        assert_eq!(dest(""), Some(0));
        assert_eq!(jump(""), Some(0));
        assert_eq!(comp(""), None);
    }

    #[test]
    fn test_all_jumps() {
        let expected = ["JGT", "JEQ", "JGE", "JLT", "JNE", "JLE", "JMP"];
        for (i, mnemonic) in expected.iter().enumerate() {
            assert_eq!(jump(mnemonic), Some(i as u8 + 1));
        }
        assert_eq!(JUMP.len(), 8);
    }
}
