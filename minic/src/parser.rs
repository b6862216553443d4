use std::fmt;
use std::sync::Once;

use tracing::{instrument, trace};
use tracing_subscriber::fmt::format::FmtSpan;
use tracing_subscriber::{EnvFilter, fmt as tracing_fmt};

use crate::internal::{TokenKind as T, *};
use ParseError as E;

pub fn parse(tokens: TokenStream) -> Result<Program, ParseError> {
  Parser::new(tokens).parse()
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub enum ParseError {
  ExpectedToken { kind: TokenKind, found: TokenKind, offset: u32 },
  ExpectedExpression { found: TokenKind, offset: u32 },
  UnexpectedEof { expected: Expectation },
  DuplicateFn(String),
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Expectation {
  Kind(TokenKind),
  Expression,
}

#[derive(Eq, Ord, PartialEq, PartialOrd, Copy, Clone, Debug)]
enum Prec {
  Lowest,
  Sum,
}

type PrefixParseFn = fn(&mut Parser) -> Result<Expr, ParseError>;
type InfixParseFn = fn(&mut Parser, Expr) -> Result<Expr, ParseError>;

#[derive(Debug)]
pub struct Parser {
  tokens: TokenStream,
  pos: usize,
}

impl Parser {
  pub fn new(tokens: TokenStream) -> Parser {
    #[cfg(debug_assertions)]
    configure_test_tracing();

    Parser { tokens, pos: 0 }
  }

  #[instrument(skip_all)]
  pub fn parse(mut self) -> Result<Program, ParseError> {
    trace!("Parser::parse()");
    let mut fns: Vec<FnDecl> = Vec::new();
    while !self.cur_is(T::Eof) {
      let decl = self.parse_fn_decl()?;
      if fns.iter().any(|f| f.name == decl.name) {
        return Err(E::DuplicateFn(decl.name));
      }
      fns.push(decl);
    }
    Ok(Program { fns })
  }

  #[instrument(skip_all)]
  fn parse_fn_decl(&mut self) -> Result<FnDecl, ParseError> {
    self.expect(T::Int)?;
    let name_token = self.expect(T::Ident)?;
    let name = self.tokens.lexeme(name_token).to_owned();
    self.expect(T::LParen)?;
    let params = self.parse_params()?;
    self.expect(T::LBrace)?;
    let mut body = Vec::new();
    while !self.cur_is(T::RBrace) {
      if self.cur_is(T::Eof) {
        return Err(E::UnexpectedEof { expected: Expectation::Kind(T::RBrace) });
      }
      body.push(self.parse_stmt()?);
    }
    self.advance(); // `}`
    Ok(FnDecl { name, params, body })
  }

  #[instrument(skip_all)]
  fn parse_params(&mut self) -> Result<Vec<Param>, ParseError> {
    let mut params = Vec::new();
    if self.cur_is(T::RParen) {
      self.advance();
      return Ok(params);
    }
    loop {
      self.expect(T::Int)?;
      let name_token = self.expect(T::Ident)?;
      params.push(Param {
        name: self.tokens.lexeme(name_token).to_owned(),
        ty: Type::Int,
      });
      if self.cur_is(T::Comma) {
        self.advance();
        continue;
      }
      self.expect(T::RParen)?;
      return Ok(params);
    }
  }

  #[instrument(skip_all)]
  fn parse_stmt(&mut self) -> Result<Stmt, ParseError> {
    if self.cur_is(T::Return) {
      self.advance();
      let expr = self.parse_expr(Prec::Lowest)?;
      self.expect(T::Semicolon)?;
      Ok(Stmt::Return(expr))
    } else {
      let expr = self.parse_expr(Prec::Lowest)?;
      self.expect(T::Semicolon)?;
      Ok(Stmt::Expr(expr))
    }
  }

  #[instrument(skip_all)]
  fn parse_expr(&mut self, prec: Prec) -> Result<Expr, ParseError> {
    let Some(prefix_fn) = self.prefix_parse_fn() else {
      let token = self.cur_token();
      return if token.kind == T::Eof {
        Err(E::UnexpectedEof { expected: Expectation::Expression })
      } else {
        Err(E::ExpectedExpression { found: token.kind, offset: token.offset })
      };
    };
    let mut expr = prefix_fn(self)?;
    while prec < precedence(self.cur_token().kind) {
      let Some(infix_fn) = self.infix_parse_fn() else {
        return Ok(expr);
      };
      expr = infix_fn(self, expr)?;
    }
    Ok(expr)
  }

  #[instrument(skip_all)]
  fn parse_int_lit(&mut self) -> Result<Expr, ParseError> {
    let token = self.advance();
    let Payload::Int(value) = token.payload else {
      unreachable!("integer literal token without integer payload")
    };
    Ok(Expr::IntLit(value))
  }

  #[instrument(skip_all)]
  fn parse_ident(&mut self) -> Result<Expr, ParseError> {
    let token = self.advance();
    let name = self.tokens.lexeme(token).to_owned();
    if !self.cur_is(T::LParen) {
      return Ok(Expr::Var(name));
    }
    self.advance(); // `(`
    let args = self.parse_call_args()?;
    Ok(Expr::Call { callee: name, args })
  }

  #[instrument(skip_all)]
  fn parse_grouped(&mut self) -> Result<Expr, ParseError> {
    self.advance(); // `(`
    let expr = self.parse_expr(Prec::Lowest)?;
    self.expect(T::RParen)?;
    Ok(expr)
  }

  #[instrument(skip_all)]
  fn parse_add(&mut self, lhs: Expr) -> Result<Expr, ParseError> {
    self.advance(); // `+`
    let rhs = self.parse_expr(Prec::Sum)?;
    Ok(Expr::add(lhs, rhs))
  }

  #[instrument(skip_all)]
  fn parse_call_args(&mut self) -> Result<Vec<Expr>, ParseError> {
    let mut args = Vec::new();
    if self.cur_is(T::RParen) {
      self.advance();
      return Ok(args);
    }
    loop {
      args.push(self.parse_expr(Prec::Lowest)?);
      if self.cur_is(T::Comma) {
        self.advance();
        continue;
      }
      self.expect(T::RParen)?;
      return Ok(args);
    }
  }

  fn prefix_parse_fn(&self) -> Option<PrefixParseFn> {
    match self.cur_token().kind {
      T::IntLit => Some(Self::parse_int_lit),
      T::Ident => Some(Self::parse_ident),
      T::LParen => Some(Self::parse_grouped),
      _ => None,
    }
  }

  fn infix_parse_fn(&self) -> Option<InfixParseFn> {
    match self.cur_token().kind {
      T::Plus => Some(Self::parse_add),
      _ => None,
    }
  }

  fn cur_token(&self) -> Token {
    self.tokens.get(self.pos)
  }

  fn cur_is(&self, kind: TokenKind) -> bool {
    self.cur_token().kind == kind
  }

  fn expect(&mut self, kind: TokenKind) -> Result<Token, ParseError> {
    let token = self.cur_token();
    if token.kind == kind {
      self.pos += 1;
      Ok(token)
    } else if token.kind == T::Eof {
      Err(E::UnexpectedEof { expected: Expectation::Kind(kind) })
    } else {
      Err(E::ExpectedToken {
        kind,
        found: token.kind,
        offset: token.offset,
      })
    }
  }

  // the terminating `Eof` token is never consumed, so the cursor
  // stays in bounds
  fn advance(&mut self) -> Token {
    let token = self.cur_token();
    self.pos += 1;
    token
  }
}

fn precedence(kind: TokenKind) -> Prec {
  match kind {
    TokenKind::Plus => Prec::Sum,
    _ => Prec::Lowest,
  }
}

impl ParseError {
  pub fn offset(&self) -> Option<u32> {
    match self {
      E::ExpectedToken { offset, .. } | E::ExpectedExpression { offset, .. } => Some(*offset),
      E::UnexpectedEof { .. } | E::DuplicateFn(_) => None,
    }
  }
}

impl fmt::Display for Expectation {
  fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
    match self {
      Expectation::Kind(kind) => write!(f, "{kind}"),
      Expectation::Expression => write!(f, "an expression"),
    }
  }
}

impl fmt::Display for ParseError {
  fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
    match self {
      E::ExpectedToken { kind, found, .. } => {
        write!(f, "expected {kind}, found {found}")
      }
      E::ExpectedExpression { found, .. } => {
        write!(f, "expected an expression, found {found}")
      }
      E::UnexpectedEof { expected } => {
        write!(f, "unexpected end of input, expected {expected}")
      }
      E::DuplicateFn(name) => {
        write!(f, "function `{name}` is defined more than once")
      }
    }
  }
}

impl std::error::Error for ParseError {}

#[cfg(debug_assertions)]
static INIT: Once = Once::new();

#[cfg(debug_assertions)]
fn configure_test_tracing() {
  INIT.call_once(|| {
    let subscriber = tracing_fmt::Subscriber::builder()
      .with_env_filter(EnvFilter::from_default_env())
      .with_test_writer()
      .with_span_events(FmtSpan::ACTIVE)
      .finish();
    tracing::subscriber::set_global_default(subscriber)
      .expect("setting default tracing subscriber failed");
  });
}

#[cfg(test)]
mod tests {
  use super::*;
  use crate::lexer::tokenize;
  use pretty_assertions::assert_eq;

  fn parse_str(input: &str) -> Result<Program, ParseError> {
    let tokens = tokenize(input).expect("lexing failed");
    Parser::new(tokens).parse()
  }

  #[test]
  fn parse_main_only() {
    let program = parse_str("int main(){return 1;}").unwrap();
    assert_eq!(
      program,
      Program {
        fns: vec![FnDecl {
          name: "main".to_owned(),
          params: vec![],
          body: vec![Stmt::Return(Expr::IntLit(1))],
        }],
      }
    );
  }

  #[test]
  fn parse_two_function_program() {
    let input = "int doIt(int a){return a + 1;} int main(){doIt(3);}";
    let program = parse_str(input).unwrap();
    assert_eq!(
      program,
      Program {
        fns: vec![
          FnDecl {
            name: "doIt".to_owned(),
            params: vec![Param { name: "a".to_owned(), ty: Type::Int }],
            body: vec![Stmt::Return(Expr::add(
              Expr::Var("a".to_owned()),
              Expr::IntLit(1),
            ))],
          },
          FnDecl {
            name: "main".to_owned(),
            params: vec![],
            body: vec![Stmt::Expr(Expr::Call {
              callee: "doIt".to_owned(),
              args: vec![Expr::IntLit(3)],
            })],
          },
        ],
      }
    );
  }

  #[test]
  fn add_is_left_associative() {
    let program = parse_str("int f(){return 1 + 2 + 3;}").unwrap();
    assert_eq!(
      program.fns[0].body,
      vec![Stmt::Return(Expr::add(
        Expr::add(Expr::IntLit(1), Expr::IntLit(2)),
        Expr::IntLit(3),
      ))]
    );
  }

  #[test]
  fn grouping_overrides_associativity() {
    let program = parse_str("int f(){return 1 + (2 + 3);}").unwrap();
    assert_eq!(
      program.fns[0].body,
      vec![Stmt::Return(Expr::add(
        Expr::IntLit(1),
        Expr::add(Expr::IntLit(2), Expr::IntLit(3)),
      ))]
    );
  }

  #[test]
  fn multiple_params_and_args() {
    let input = "int add(int a, int b){return a + b;} int main(){add(1 + 2, add(3, 4));}";
    let program = parse_str(input).unwrap();
    let add = program.get_fn("add").unwrap();
    assert_eq!(
      add.params,
      vec![
        Param { name: "a".to_owned(), ty: Type::Int },
        Param { name: "b".to_owned(), ty: Type::Int },
      ]
    );
    let main = program.get_fn("main").unwrap();
    assert_eq!(
      main.body,
      vec![Stmt::Expr(Expr::Call {
        callee: "add".to_owned(),
        args: vec![
          Expr::add(Expr::IntLit(1), Expr::IntLit(2)),
          Expr::Call {
            callee: "add".to_owned(),
            args: vec![Expr::IntLit(3), Expr::IntLit(4)],
          },
        ],
      })]
    );
  }

  #[test]
  fn empty_body_and_empty_args() {
    let program = parse_str("int f(){} int main(){f();}").unwrap();
    assert_eq!(program.get_fn("f").unwrap().body, vec![]);
    assert_eq!(
      program.get_fn("main").unwrap().body,
      vec![Stmt::Expr(Expr::Call { callee: "f".to_owned(), args: vec![] })]
    );
  }

  #[test]
  fn eof_mid_production() {
    assert_eq!(
      parse_str("int f(int a"),
      Err(E::UnexpectedEof { expected: Expectation::Kind(T::RParen) })
    );
    assert_eq!(
      parse_str("int f()"),
      Err(E::UnexpectedEof { expected: Expectation::Kind(T::LBrace) })
    );
    assert_eq!(
      parse_str("int f(){return"),
      Err(E::UnexpectedEof { expected: Expectation::Expression })
    );
    assert_eq!(
      parse_str("int f(){return 1;"),
      Err(E::UnexpectedEof { expected: Expectation::Kind(T::RBrace) })
    );
  }

  #[test]
  fn grammar_mismatches() {
    assert_eq!(
      parse_str("int f(){return 1}"),
      Err(E::ExpectedToken { kind: T::Semicolon, found: T::RBrace, offset: 16 })
    );
    assert_eq!(
      parse_str("int f(){return ;}"),
      Err(E::ExpectedExpression { found: T::Semicolon, offset: 15 })
    );
    assert_eq!(
      parse_str("int f(){return +1;}"),
      Err(E::ExpectedExpression { found: T::Plus, offset: 15 })
    );
    assert_eq!(
      parse_str("1 + 2;"),
      Err(E::ExpectedToken { kind: T::Int, found: T::IntLit, offset: 0 })
    );
  }

  #[test]
  fn duplicate_function_names() {
    assert_eq!(
      parse_str("int f(){} int f(){}"),
      Err(E::DuplicateFn("f".to_owned()))
    );
    // distinct names are fine
    assert!(parse_str("int f(){} int g(){}").is_ok());
  }

  #[test]
  fn parse_is_idempotent() {
    let input = "int doIt(int a){return a + 1;} int main(){doIt(3);}";
    assert_eq!(parse_str(input).unwrap(), parse_str(input).unwrap());
  }
}
