#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Program {
  pub fns: Vec<FnDecl>,
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct FnDecl {
  pub name: String,
  pub params: Vec<Param>,
  pub body: Vec<Stmt>,
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Param {
  pub name: String,
  pub ty: Type,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Type {
  Int,
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Stmt {
  Return(Expr),
  Expr(Expr),
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Expr {
  IntLit(i64),
  Var(String),
  Add(Box<Expr>, Box<Expr>),
  Call { callee: String, args: Vec<Expr> },
}

impl Program {
  pub fn get_fn(&self, name: &str) -> Option<&FnDecl> {
    self.fns.iter().find(|f| f.name == name)
  }
}

impl Expr {
  pub fn add(lhs: Expr, rhs: Expr) -> Expr {
    Expr::Add(Box::new(lhs), Box::new(rhs))
  }
}
