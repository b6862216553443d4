#[derive(Debug, PartialEq, Eq)]
pub struct StrPool {
  data: Vec<u8>,
  spans: Vec<Span>,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct Index(u32);

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
struct Span {
  start: u32,
  len: u32,
}

impl StrPool {
  pub fn new() -> Self {
    Self {
      data: Vec::with_capacity(256),
      spans: Vec::with_capacity(32),
    }
  }

  pub fn intern(&mut self, s: &str) -> Index {
    let bytes = s.as_bytes();
    for (i, span) in self.spans.iter().enumerate() {
      if self.span_bytes(*span) == bytes {
        return Index(i as u32);
      }
    }
    assert!(self.spans.len() < u32::MAX as usize);
    let index = self.spans.len() as u32;
    let start = self.data.len() as u32;
    self.data.extend_from_slice(bytes);
    self.spans.push(Span { start, len: bytes.len() as u32 });
    Index(index)
  }

  pub fn get(&self, index: Index) -> &str {
    let span = self.spans[index.0 as usize];
    // SAFETY: the only way to get bytes into the pool is as a &str
    unsafe { std::str::from_utf8_unchecked(self.span_bytes(span)) }
  }

  fn span_bytes(&self, span: Span) -> &[u8] {
    &self.data[span.start as usize..(span.start + span.len) as usize]
  }
}

impl Default for StrPool {
  fn default() -> Self {
    Self::new()
  }
}
