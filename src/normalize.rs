/// A non-blank source line with its 1-based line number.
#[derive(Debug, Clone, PartialEq)]
pub struct SourceLine<'a> {
    pub number: usize,
    pub raw: &'a str,
    pub text: String,
}

/// Strip comments and every non-printable or whitespace character.
///
/// Whitespace is insignificant anywhere in an instruction, so `D = M + 1`
/// normalizes to `D=M+1`.
pub fn normalize_line(line: &str) -> String {
    let code = match line.find("//") {
        Some(pos) => &line[..pos],
        None => line,
    };
    code.chars().filter(|c| c.is_ascii_graphic()).collect()
}

/// Normalize every line of `source`, dropping the ones left empty.
pub fn source_lines(source: &str) -> impl Iterator<Item = SourceLine<'_>> {
    source
        .lines()
        .enumerate()
        .filter_map(|(idx, raw)| {
            let text = normalize_line(raw);
            (!text.is_empty()).then(|| SourceLine {
                number: idx + 1,
                raw: raw.trim(),
                text,
            })
        })
}
