use std::fmt;

use crate::internal::{TokenKind as T, *};

pub fn tokenize(source: &str) -> Result<TokenStream, LexError> {
  Lexer::new_str(source).lex()
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum LexError {
  UnrecognizedChar { ch: char, offset: u32 },
  IntOverflow { offset: u32 },
}

#[derive(Debug)]
pub struct Lexer {
  src: Vec<u8>,
  strs: StrPool,
  pos: usize,
}

impl Lexer {
  pub fn new(src: Vec<u8>) -> Self {
    assert!(src.len() <= u32::MAX as usize);
    Lexer {
      src,
      pos: 0,
      strs: StrPool::new(),
    }
  }

  pub fn new_str(src: &str) -> Self {
    Self::new(src.bytes().collect())
  }

  pub fn lex(mut self) -> Result<TokenStream, LexError> {
    let mut tokens = Vec::with_capacity(64);
    loop {
      let token = self.next_token()?;
      let done = token.kind == T::Eof;
      tokens.push(token);
      if done {
        return Ok(TokenStream::new(tokens, self.strs));
      }
    }
  }

  fn next_token(&mut self) -> Result<Token, LexError> {
    while !self.eof() && self.src[self.pos].is_ascii_whitespace() {
      self.pos += 1;
    }
    if self.eof() {
      return Ok(Token::new(T::Eof, self.pos as u32, Payload::None));
    }
    match self.src[self.pos] {
      b'(' => Ok(self.punct(T::LParen)),
      b')' => Ok(self.punct(T::RParen)),
      b'{' => Ok(self.punct(T::LBrace)),
      b'}' => Ok(self.punct(T::RBrace)),
      b';' => Ok(self.punct(T::Semicolon)),
      b'+' => Ok(self.punct(T::Plus)),
      b',' => Ok(self.punct(T::Comma)),
      b if b.is_ascii_digit() => self.int_lit(),
      b if b.is_ascii_alphabetic() => Ok(self.word()),
      _ => Err(LexError::UnrecognizedChar {
        ch: self.cur_char(),
        offset: self.pos as u32,
      }),
    }
  }

  fn punct(&mut self, kind: TokenKind) -> Token {
    let token = Token::new(kind, self.pos as u32, Payload::None);
    self.pos += 1;
    token
  }

  fn int_lit(&mut self) -> Result<Token, LexError> {
    let start = self.pos as u32;
    self.pos += 1;
    while !self.eof() && self.src[self.pos].is_ascii_digit() {
      self.pos += 1;
    }
    let span = &self.src[start as usize..self.pos];
    // SAFETY: we only have ascii digits, so this is fine
    let lexeme = unsafe { std::str::from_utf8_unchecked(span) };
    let value = lexeme
      .parse::<i64>()
      .map_err(|_| LexError::IntOverflow { offset: start })?;
    Ok(Token::new(T::IntLit, start, Payload::Int(value)))
  }

  fn word(&mut self) -> Token {
    let start = self.pos as u32;
    self.pos += 1;
    while !self.eof() && self.src[self.pos].is_ascii_alphabetic() {
      self.pos += 1;
    }
    let span = &self.src[start as usize..self.pos];
    match span {
      b"int" => Token::new(T::Int, start, Payload::None),
      b"return" => Token::new(T::Return, start, Payload::None),
      _ => {
        // SAFETY: we only have ascii alphabetic bytes, so this is fine
        let lexeme = unsafe { std::str::from_utf8_unchecked(span) };
        Token::new(T::Ident, start, Payload::Str(self.strs.intern(lexeme)))
      }
    }
  }

  fn cur_char(&self) -> char {
    std::str::from_utf8(&self.src[self.pos..])
      .ok()
      .and_then(|rest| rest.chars().next())
      .unwrap_or(char::REPLACEMENT_CHARACTER)
  }

  const fn eof(&self) -> bool {
    self.pos >= self.src.len()
  }
}

impl fmt::Display for LexError {
  fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
    match self {
      LexError::UnrecognizedChar { ch, offset } => {
        write!(f, "unrecognized character `{ch}` at byte {offset}")
      }
      LexError::IntOverflow { offset } => {
        write!(f, "integer literal at byte {offset} is out of range")
      }
    }
  }
}

impl std::error::Error for LexError {}
