use crate::internal::*;

// line/col are 1-based; duplicate function names carry no position
// and render at 0, 0
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Diagnostic {
  pub line: u32,
  pub col: u32,
  pub msg: String,
}

impl Diagnostic {
  pub fn from_lex(src: &str, err: &LexError) -> Diagnostic {
    let offset = match err {
      LexError::UnrecognizedChar { offset, .. } | LexError::IntOverflow { offset } => *offset,
    };
    let (line, col) = line_col(src, offset);
    Diagnostic { line, col, msg: err.to_string() }
  }

  pub fn from_parse(src: &str, err: &ParseError) -> Diagnostic {
    let (line, col) = match err.offset() {
      Some(offset) => line_col(src, offset),
      // input exhausted: point at the end of the source
      None if matches!(err, ParseError::UnexpectedEof { .. }) => line_col(src, src.len() as u32),
      None => (0, 0),
    };
    Diagnostic { line, col, msg: err.to_string() }
  }
}

fn line_col(src: &str, offset: u32) -> (u32, u32) {
  let offset = (offset as usize).min(src.len());
  let before = &src.as_bytes()[..offset];
  let line = before.iter().filter(|&&b| b == b'\n').count() as u32 + 1;
  let line_start = before
    .iter()
    .rposition(|&b| b == b'\n')
    .map(|pos| pos + 1)
    .unwrap_or(0);
  let col = (offset - line_start) as u32 + 1;
  (line, col)
}
