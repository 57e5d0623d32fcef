use std::fmt::Display;

/// Binary operators of Q. Each one resolves to a method on the left
/// operand's class during type checking and dispatches through the
/// class's vtable at runtime.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum BinaryOp {
    Plus,
    Minus,
    Times,
    Divide,
    Equals,
    AtMost,
    Less,
    AtLeast,
    More,
    And,
    Or,
}

impl BinaryOp {
    pub fn from_symbol(symbol: &str) -> BinaryOp {
        match symbol {
            "+" => BinaryOp::Plus,
            "-" => BinaryOp::Minus,
            "*" => BinaryOp::Times,
            "/" => BinaryOp::Divide,
            "==" => BinaryOp::Equals,
            "<=" => BinaryOp::AtMost,
            "<" => BinaryOp::Less,
            ">=" => BinaryOp::AtLeast,
            ">" => BinaryOp::More,
            "and" => BinaryOp::And,
            "or" => BinaryOp::Or,
            _ => unreachable!("unknown binary operator '{symbol}'"),
        }
    }

    /// The runtime method this operator maps onto.
    pub fn method_name(self) -> &'static str {
        match self {
            BinaryOp::Plus => "PLUS",
            BinaryOp::Minus => "MINUS",
            BinaryOp::Times => "TIMES",
            BinaryOp::Divide => "DIVIDE",
            BinaryOp::Equals => "EQUALS",
            BinaryOp::AtMost => "ATMOST",
            BinaryOp::Less => "LESS",
            BinaryOp::AtLeast => "ATLEAST",
            BinaryOp::More => "MORE",
            BinaryOp::And => "AND",
            BinaryOp::Or => "OR",
        }
    }

    /// Comparison and logical operators produce `Boolean`; the arithmetic
    /// ones produce the type of their left operand.
    pub fn yields_boolean(self) -> bool {
        !matches!(
            self,
            BinaryOp::Plus | BinaryOp::Minus | BinaryOp::Times | BinaryOp::Divide
        )
    }
}

impl Display for BinaryOp {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        let symbol = match self {
            BinaryOp::Plus => "+",
            BinaryOp::Minus => "-",
            BinaryOp::Times => "*",
            BinaryOp::Divide => "/",
            BinaryOp::Equals => "==",
            BinaryOp::AtMost => "<=",
            BinaryOp::Less => "<",
            BinaryOp::AtLeast => ">=",
            BinaryOp::More => ">",
            BinaryOp::And => "and",
            BinaryOp::Or => "or",
        };
        f.write_str(symbol)
    }
}
