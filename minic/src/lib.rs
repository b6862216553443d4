pub mod ast;
pub mod diag;
pub mod lexer;
pub mod parser;
pub mod str_pool;
pub mod token;

pub use ast::Program;
pub use lexer::{LexError, tokenize};
pub use parser::{ParseError, parse};
pub use token::TokenStream;

pub mod internal {
  pub use crate::ast::*;
  pub use crate::diag::*;
  pub use crate::lexer::*;
  pub use crate::parser::*;
  pub use crate::str_pool::*;
  pub use crate::token::*;
}
