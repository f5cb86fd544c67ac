use logos::Logos;
use std::fmt;

use crate::error::MockError;

#[derive(Logos, Debug, Clone, PartialEq)]
#[logos(skip r"\s+")]
enum Token {
    #[token("==")]
    EqEq,
    #[token("!=")]
    BangEq,
    #[token("<")]
    Lt,
    #[token("<=")]
    LtEq,
    #[token(">")]
    Gt,
    #[token(">=")]
    GtEq,
    #[regex(r"-?[0-9]+", |lex| lex.slice().parse::<i64>().ok())]
    Int(i64),
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum CmpOp {
    Eq,
    Neq,
    Lt,
    Lte,
    Gt,
    Gte,
}

impl CmpOp {
    pub fn symbol(&self) -> &'static str {
        match self {
            CmpOp::Eq => "==",
            CmpOp::Neq => "!=",
            CmpOp::Lt => "<",
            CmpOp::Lte => "<=",
            CmpOp::Gt => ">",
            CmpOp::Gte => ">=",
        }
    }

    fn from_token(token: &Token) -> Option<Self> {
        match token {
            Token::EqEq => Some(CmpOp::Eq),
            Token::BangEq => Some(CmpOp::Neq),
            Token::Lt => Some(CmpOp::Lt),
            Token::LtEq => Some(CmpOp::Lte),
            Token::Gt => Some(CmpOp::Gt),
            Token::GtEq => Some(CmpOp::Gte),
            Token::Int(_) => None,
        }
    }
}

/// A parsed times expression such as `"2"`, `">=2"` or `"!=0"`.
///
/// A bare integer means `==`. The operand is a signed integer and is not
/// range-checked: `"<-1"` parses and is simply never satisfied.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Comparator {
    op: CmpOp,
    operand: i64,
    expr: String,
}

impl Comparator {
    pub fn parse(expr: &str) -> Result<Self, MockError> {
        let mut tokens = Vec::new();
        let mut lexer = Token::lexer(expr);
        while let Some(result) = lexer.next() {
            match result {
                Ok(token) => tokens.push(token),
                Err(_) => {
                    return Err(invalid(
                        expr,
                        format!("unexpected input {:?}", lexer.slice()),
                    ));
                }
            }
        }

        let (op, operand) = match tokens.as_slice() {
            [Token::Int(n)] => (CmpOp::Eq, *n),
            [op, Token::Int(n)] => match CmpOp::from_token(op) {
                Some(op) => (op, *n),
                None => return Err(invalid(expr, "expected a single operand".into())),
            },
            [] => return Err(invalid(expr, "empty expression".into())),
            [_] => return Err(invalid(expr, "missing operand".into())),
            _ => {
                return Err(invalid(
                    expr,
                    "expected an optional operator followed by an integer".into(),
                ));
            }
        };

        Ok(Comparator {
            op,
            operand,
            expr: expr.trim().to_string(),
        })
    }

    pub fn op(&self) -> CmpOp {
        self.op
    }

    pub fn operand(&self) -> i64 {
        self.operand
    }

    /// The expression as the caller wrote it.
    pub fn expr(&self) -> &str {
        &self.expr
    }

    pub fn evaluate(&self, actual: usize) -> bool {
        let actual = i64::try_from(actual).unwrap_or(i64::MAX);
        let n = self.operand;
        match self.op {
            CmpOp::Eq => actual == n,
            CmpOp::Neq => actual != n,
            CmpOp::Lt => actual < n,
            CmpOp::Lte => actual <= n,
            CmpOp::Gt => actual > n,
            CmpOp::Gte => actual >= n,
        }
    }
}

impl fmt::Display for Comparator {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}{}", self.op.symbol(), self.operand)
    }
}

fn invalid(expr: &str, reason: String) -> MockError {
    MockError::InvalidComparator {
        expr: expr.to_string(),
        reason,
    }
}

/// Anything usable as a times expression: DSL strings, plain counts, or an
/// already parsed [`Comparator`]. Integers are formatted and parsed like
/// strings, so `2` and `"2"` behave identically.
pub trait IntoComparator {
    fn into_comparator(self) -> Result<Comparator, MockError>;
}

impl IntoComparator for Comparator {
    fn into_comparator(self) -> Result<Comparator, MockError> {
        Ok(self)
    }
}

impl IntoComparator for &Comparator {
    fn into_comparator(self) -> Result<Comparator, MockError> {
        Ok(self.clone())
    }
}

impl IntoComparator for &str {
    fn into_comparator(self) -> Result<Comparator, MockError> {
        Comparator::parse(self)
    }
}

impl IntoComparator for String {
    fn into_comparator(self) -> Result<Comparator, MockError> {
        Comparator::parse(&self)
    }
}

impl IntoComparator for &String {
    fn into_comparator(self) -> Result<Comparator, MockError> {
        Comparator::parse(self)
    }
}

macro_rules! int_comparator {
    ($($t:ty),*) => {
        $(
            impl IntoComparator for $t {
                fn into_comparator(self) -> Result<Comparator, MockError> {
                    Comparator::parse(&self.to_string())
                }
            }
        )*
    };
}

int_comparator!(i32, i64, u32, u64, usize);
