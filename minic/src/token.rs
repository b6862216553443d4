use std::fmt;

use crate::str_pool::{self, StrPool};

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum TokenKind {
  Ident,
  IntLit,
  Int,
  Return,
  LParen,
  RParen,
  LBrace,
  RBrace,
  Semicolon,
  Plus,
  Comma,
  Eof,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Payload {
  None,
  Str(str_pool::Index),
  Int(i64),
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct Token {
  pub kind: TokenKind,
  pub offset: u32,
  pub payload: Payload,
}

impl Token {
  pub fn new(kind: TokenKind, offset: u32, payload: Payload) -> Self {
    Token { kind, offset, payload }
  }

  pub fn lexeme<'a>(&self, strs: &'a StrPool) -> &'a str {
    match self.payload {
      Payload::Str(index) => strs.get(index),
      Payload::None | Payload::Int(_) => "",
    }
  }
}

// always terminated by exactly one `Eof` token
#[derive(Debug, PartialEq, Eq)]
pub struct TokenStream {
  tokens: Vec<Token>,
  strs: StrPool,
}

impl TokenStream {
  pub(crate) fn new(tokens: Vec<Token>, strs: StrPool) -> Self {
    debug_assert!(matches!(
      tokens.last(),
      Some(Token { kind: TokenKind::Eof, .. })
    ));
    TokenStream { tokens, strs }
  }

  pub fn get(&self, pos: usize) -> Token {
    self.tokens[pos]
  }

  pub fn len(&self) -> usize {
    self.tokens.len()
  }

  pub fn is_empty(&self) -> bool {
    self.tokens.is_empty()
  }

  pub fn lexeme(&self, token: Token) -> &str {
    token.lexeme(&self.strs)
  }
}

impl fmt::Display for TokenKind {
  fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
    match self {
      TokenKind::Ident => write!(f, "identifier"),
      TokenKind::IntLit => write!(f, "integer literal"),
      TokenKind::Int => write!(f, "`int`"),
      TokenKind::Return => write!(f, "`return`"),
      TokenKind::LParen => write!(f, "`(`"),
      TokenKind::RParen => write!(f, "`)`"),
      TokenKind::LBrace => write!(f, "`{{`"),
      TokenKind::RBrace => write!(f, "`}}`"),
      TokenKind::Semicolon => write!(f, "`;`"),
      TokenKind::Plus => write!(f, "`+`"),
      TokenKind::Comma => write!(f, "`,`"),
      TokenKind::Eof => write!(f, "end of input"),
    }
  }
}
