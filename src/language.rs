use std::fmt::Display;

use crate::{
    error::{Error, Result},
    evaluator::Assignment,
};

#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Expr {
    Variable(String),
    Constant(bool),
    BinaryOp(BinaryOperation),
    UnaryOp(UnaryOperation),
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub enum BinaryOperation {
    And(Box<Expr>, Box<Expr>),
    Or(Box<Expr>, Box<Expr>),
    Xor(Box<Expr>, Box<Expr>),
    Implies(Box<Expr>, Box<Expr>),
    Equates(Box<Expr>, Box<Expr>),
}

impl BinaryOperation {
    fn split(&self) -> (&Box<Expr>, &Box<Expr>) {
        match self {
            Self::And(a, b) => (a, b),
            Self::Or(a, b) => (a, b),
            Self::Xor(a, b) => (a, b),
            Self::Implies(a, b) => (a, b),
            Self::Equates(a, b) => (a, b),
        }
    }

    pub fn eval(&self, assignment: &Assignment) -> Result<bool> {
        let (a, b) = self.split();
        let (a, b) = (a.eval(assignment)?, b.eval(assignment)?);
        Ok(match self {
            Self::And(..) => a && b,
            Self::Or(..) => a || b,
            Self::Xor(..) => a ^ b,
            Self::Implies(..) => !a || b,
            Self::Equates(..) => a == b,
        })
    }
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub enum UnaryOperation {
    Not(Box<Expr>),
}

impl UnaryOperation {
    fn inner(&self) -> &Box<Expr> {
        match self {
            Self::Not(e) => e,
        }
    }

    pub fn eval(&self, assignment: &Assignment) -> Result<bool> {
        match self {
            Self::Not(_) => Ok(!self.inner().eval(assignment)?),
        }
    }
}

impl Expr {
    pub fn eval(&self, assignment: &Assignment) -> Result<bool> {
        match self {
            Expr::Constant(x) => Ok(*x),
            Expr::Variable(x) => assignment
                .get(x)
                .ok_or_else(|| Error::UnboundVariable(x.clone())),
            Expr::BinaryOp(bin) => bin.eval(assignment),
            Expr::UnaryOp(un) => un.eval(assignment),
        }
    }

    pub fn and(a: Box<Expr>, b: Box<Expr>) -> Box<Expr> {
        Box::new(Expr::BinaryOp(BinaryOperation::And(a, b)))
    }

    pub fn or(a: Box<Expr>, b: Box<Expr>) -> Box<Expr> {
        Box::new(Expr::BinaryOp(BinaryOperation::Or(a, b)))
    }

    pub fn xor(a: Box<Expr>, b: Box<Expr>) -> Box<Expr> {
        Box::new(Expr::BinaryOp(BinaryOperation::Xor(a, b)))
    }

    pub fn implies(a: Box<Expr>, b: Box<Expr>) -> Box<Expr> {
        Box::new(Expr::BinaryOp(BinaryOperation::Implies(a, b)))
    }

    pub fn equates(a: Box<Expr>, b: Box<Expr>) -> Box<Expr> {
        Box::new(Expr::BinaryOp(BinaryOperation::Equates(a, b)))
    }

    pub fn not(a: Box<Expr>) -> Box<Expr> {
        Box::new(Expr::UnaryOp(UnaryOperation::Not(a)))
    }
}

impl Display for Expr {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            Self::Variable(e) => write!(f, "{e}"),
            Self::Constant(c) => write!(f, "{}", if *c { '1' } else { '0' }),
            Self::UnaryOp(un) => write!(f, "{un}"),
            Self::BinaryOp(bin) => write!(f, "({bin})"),
        }
    }
}

impl Display for UnaryOperation {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            Self::Not(e) => write!(f, "¬{e}"),
        }
    }
}

impl Display for BinaryOperation {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            Self::And(a, b) => write!(f, "{a} ∧ {b}"),
            Self::Or(a, b) => write!(f, "{a} ∨ {b}"),
            Self::Xor(a, b) => write!(f, "{a} ⊕ {b}"),
            Self::Implies(a, b) => write!(f, "{a} ⇒ {b}"),
            Self::Equates(a, b) => write!(f, "{a} ⇔ {b}"),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::sync::Arc;

    fn var(name: &str) -> Box<Expr> {
        Box::new(Expr::Variable(name.into()))
    }

    #[test]
    fn connectives_follow_their_truth_tables() {
        let names: Arc<[String]> = Arc::from(vec!["a".to_string(), "b".to_string()]);
        // bits are (a, b) with `a` as the high bit
        let cases = [
            (Expr::and(var("a"), var("b")), [false, false, false, true]),
            (Expr::or(var("a"), var("b")), [false, true, true, true]),
            (Expr::xor(var("a"), var("b")), [false, true, true, false]),
            (Expr::implies(var("a"), var("b")), [true, true, false, true]),
            (Expr::equates(var("a"), var("b")), [true, false, false, true]),
        ];
        for (expr, expected) in cases {
            for (bits, want) in expected.into_iter().enumerate() {
                let assignment = Assignment::new(names.clone(), bits);
                assert_eq!(expr.eval(&assignment), Ok(want), "{expr} at {bits:02b}");
            }
        }
    }

    #[test]
    fn unknown_variable_is_an_error() {
        let assignment = Assignment::new(Arc::from(Vec::<String>::new()), 0);
        assert_eq!(
            Expr::not(var("q")).eval(&assignment),
            Err(Error::UnboundVariable("q".into()))
        );
    }

    #[test]
    fn display_brackets_binary_operations() {
        let expr = Expr::implies(
            Expr::not(var("a")),
            Expr::and(var("b"), Box::new(Expr::Constant(true))),
        );
        assert_eq!(expr.to_string(), "(¬a ⇒ (b ∧ 1))");
    }
}
