use crate::utils::constants::{CARRIAGE_RETURN, DEFAULT_DELIMITER, DEFAULT_LINE_TERMINATOR};
use bstr::ByteSlice;

/// Splits raw chunk content into `<station><delimiter><value>` records
#[derive(Debug, Clone, Copy)]
pub struct MeasurementParser {
    delimiter: u8,
    line_terminator: u8,
}

impl MeasurementParser {
    pub fn new() -> Self {
        Self {
            delimiter: DEFAULT_DELIMITER,
            line_terminator: DEFAULT_LINE_TERMINATOR,
        }
    }

    pub fn with_format(delimiter: u8, line_terminator: u8) -> Self {
        Self {
            delimiter,
            line_terminator,
        }
    }

    pub fn lines<'a>(&self, buffer: &'a [u8]) -> Lines<'a> {
        Lines {
            remaining: buffer,
            terminator: self.line_terminator,
        }
    }

    /// Parse one line into station name and value.
    ///
    /// Returns `None` for anything that is not exactly two fields with a
    /// UTF-8 name and a base-10 float; callers count those as skipped. NaN and
    /// literals that overflow `f64` are rejected, while `inf`/`infinity`
    /// spelled out are kept.
    #[inline]
    pub fn parse_line<'a>(&self, line: &'a [u8]) -> Option<(&'a str, f64)> {
        let split = line.find_byte(self.delimiter)?;
        let (name, value) = (&line[..split], &line[split + 1..]);

        // A second delimiter means more than two fields
        if value.find_byte(self.delimiter).is_some() {
            return None;
        }

        let name = name.to_str().ok()?;
        let text = value.to_str().ok()?;
        let value: f64 = text.parse().ok()?;

        if value.is_nan() || (value.is_infinite() && !is_infinity_literal(text)) {
            return None;
        }

        Some((name, value))
    }
}

/// `inf` or `infinity` with an optional sign, in any case
fn is_infinity_literal(text: &str) -> bool {
    let unsigned = text.strip_prefix(['+', '-']).unwrap_or(text);
    unsigned.eq_ignore_ascii_case("inf") || unsigned.eq_ignore_ascii_case("infinity")
}

impl Default for MeasurementParser {
    fn default() -> Self {
        Self::new()
    }
}

/// Iterator over the lines of a buffer.
///
/// The terminator is stripped, as is a trailing carriage return when lines
/// end in `\n`. A final piece without a terminator is still yielded; the
/// empty piece after a final terminator is not.
pub struct Lines<'a> {
    remaining: &'a [u8],
    terminator: u8,
}

impl<'a> Iterator for Lines<'a> {
    type Item = &'a [u8];

    fn next(&mut self) -> Option<Self::Item> {
        if self.remaining.is_empty() {
            return None;
        }

        let line = match self.remaining.find_byte(self.terminator) {
            Some(position) => {
                let line = &self.remaining[..position];
                self.remaining = &self.remaining[position + 1..];
                line
            }
            None => std::mem::take(&mut self.remaining),
        };

        if self.terminator == DEFAULT_LINE_TERMINATOR {
            Some(line.strip_suffix(&[CARRIAGE_RETURN]).unwrap_or(line))
        } else {
            Some(line)
        }
    }
}
