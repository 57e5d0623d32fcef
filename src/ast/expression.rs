use pest::iterators::Pair;

use super::{BinaryOp, LExpr, Position, Rule};

/// An expression (an "r-expression" in the grammar).
#[derive(Debug, Clone)]
pub enum RExpr {
    /// The value of a bare `return;`.
    Empty {
        position: Position,
    },
    Int {
        value: i64,
        position: Position,
    },
    Str {
        value: String,
        position: Position,
    },
    Not {
        value: Box<RExpr>,
        position: Position,
    },
    Binary {
        op: BinaryOp,
        lhs: Box<RExpr>,
        rhs: Box<RExpr>,
        position: Position,
    },
    /// `T(args)`, constructing an instance of class `T`.
    Constructor {
        class: String,
        args: Vec<RExpr>,
        position: Position,
    },
    /// `receiver.method(args)`.
    Call {
        receiver: Box<RExpr>,
        method: String,
        args: Vec<RExpr>,
        position: Position,
    },
    /// An l-expression read as a value.
    LExpr(LExpr),
}

impl RExpr {
    pub fn position(&self) -> Position {
        match self {
            RExpr::Empty { position }
            | RExpr::Int { position, .. }
            | RExpr::Str { position, .. }
            | RExpr::Not { position, .. }
            | RExpr::Binary { position, .. }
            | RExpr::Constructor { position, .. }
            | RExpr::Call { position, .. } => *position,
            RExpr::LExpr(lexpr) => lexpr.position(),
        }
    }

    pub fn from_pair(pair: Pair<Rule>) -> RExpr {
        match pair.as_rule() {
            Rule::rexpr | Rule::primary | Rule::paren_expr => {
                Self::from_pair(pair.into_inner().next().unwrap())
            }
            Rule::or_expr | Rule::and_expr | Rule::comparison | Rule::sum | Rule::term => {
                Self::from_binary_chain(pair)
            }
            Rule::not_expr => Self::from_not_expr(pair),
            Rule::postfix => Self::from_postfix(pair),
            Rule::int_lit => RExpr::Int {
                value: pair.as_str().parse().unwrap(),
                position: pair.line_col(),
            },
            Rule::string_lit => Self::from_string_lit(pair),
            Rule::constructor_call => Self::from_constructor_call(pair),
            Rule::ident => RExpr::LExpr(LExpr::Ident {
                name: pair.as_str().to_owned(),
                position: pair.line_col(),
            }),
            rule => unreachable!("unexpected expression rule '{rule:?}'"),
        }
    }

    /// Left-fold a `lhs (op rhs)*` chain into nested binary nodes.
    fn from_binary_chain(pair: Pair<Rule>) -> RExpr {
        let mut inner = pair.into_inner();
        let mut expression = Self::from_pair(inner.next().unwrap());

        while let Some(op) = inner.next() {
            let position = op.line_col();
            let op = BinaryOp::from_symbol(op.as_str());
            let rhs = Self::from_pair(inner.next().unwrap());
            expression = RExpr::Binary {
                op,
                lhs: Box::new(expression),
                rhs: Box::new(rhs),
                position,
            };
        }

        expression
    }

    fn from_not_expr(pair: Pair<Rule>) -> RExpr {
        let position = pair.line_col();
        let mut inner = pair.into_inner();

        let first = inner.next().unwrap();
        if first.as_rule() == Rule::not_op {
            RExpr::Not {
                value: Box::new(Self::from_pair(inner.next().unwrap())),
                position,
            }
        } else {
            Self::from_pair(first)
        }
    }

    /// A primary expression followed by `.name` (field access) or
    /// `.name(args)` (method call) suffixes.
    fn from_postfix(pair: Pair<Rule>) -> RExpr {
        let mut inner = pair.into_inner();
        let mut expression = Self::from_pair(inner.next().unwrap());

        for suffix in inner {
            let position = suffix.line_col();
            let mut parts = suffix.into_inner();
            let name = parts.next().unwrap().as_str().to_owned();

            expression = match parts.next() {
                Some(args) => RExpr::Call {
                    receiver: Box::new(expression),
                    method: name,
                    args: parse_actual_args(args),
                    position,
                },
                None => RExpr::LExpr(LExpr::Field {
                    receiver: Box::new(expression),
                    field: name,
                    position,
                }),
            };
        }

        expression
    }

    fn from_string_lit(pair: Pair<Rule>) -> RExpr {
        let position = pair.line_col();
        let raw = pair.as_str();
        let raw = &raw[1..raw.len() - 1];

        RExpr::Str {
            value: unescape::unescape(raw).unwrap_or_else(|| raw.to_owned()),
            position,
        }
    }

    fn from_constructor_call(pair: Pair<Rule>) -> RExpr {
        let position = pair.line_col();
        let mut inner = pair.into_inner();

        RExpr::Constructor {
            class: inner.next().unwrap().as_str().to_owned(),
            args: parse_actual_args(inner.next().unwrap()),
            position,
        }
    }
}

pub(super) fn parse_actual_args(pair: Pair<Rule>) -> Vec<RExpr> {
    assert_eq!(pair.as_rule(), Rule::actual_args);
    pair.into_inner().map(RExpr::from_pair).collect()
}

#[cfg(test)]
mod tests {
    use super::super::{Ast, QParser, Statement};
    use super::*;

    fn parse_expression(source: &str) -> RExpr {
        let program = format!("{source};");
        let ast = Ast::from_program(QParser::try_parse_program(&program).unwrap());
        match ast.statements.into_iter().next().unwrap() {
            Statement::Expression(statement) => statement.expression,
            statement => panic!("expected expression statement, got {statement:?}"),
        }
    }

    #[test]
    fn test_product_binds_tighter_than_sum() {
        let RExpr::Binary { op, rhs, .. } = parse_expression("1 + 2 * 3") else {
            panic!("expected binary expression");
        };
        assert_eq!(op, BinaryOp::Plus);
        assert!(matches!(
            *rhs,
            RExpr::Binary {
                op: BinaryOp::Times,
                ..
            }
        ));
    }

    #[test]
    fn test_comparison_yields_binary_node() {
        let RExpr::Binary { op, .. } = parse_expression("x < 10") else {
            panic!("expected binary expression");
        };
        assert_eq!(op, BinaryOp::Less);
    }

    #[test]
    fn test_dot_call_chains_left_to_right() {
        let RExpr::Call { receiver, method, .. } = parse_expression("p.x.PRINT()") else {
            panic!("expected method call");
        };
        assert_eq!(method, "PRINT");
        assert!(matches!(*receiver, RExpr::LExpr(LExpr::Field { .. })));
    }

    #[test]
    fn test_ident_with_args_is_a_constructor() {
        let RExpr::Constructor { class, args, .. } = parse_expression("Pt(1, 2)") else {
            panic!("expected constructor call");
        };
        assert_eq!(class, "Pt");
        assert_eq!(args.len(), 2);
    }

    #[test]
    fn test_and_or_precedence() {
        // `a or b and c` parses as `a or (b and c)`
        let RExpr::Binary { op, rhs, .. } = parse_expression("a or b and c") else {
            panic!("expected binary expression");
        };
        assert_eq!(op, BinaryOp::Or);
        assert!(matches!(
            *rhs,
            RExpr::Binary {
                op: BinaryOp::And,
                ..
            }
        ));
    }

    #[test]
    fn test_not_wraps_comparison() {
        let RExpr::Not { value, .. } = parse_expression("not x == y") else {
            panic!("expected not expression");
        };
        assert!(matches!(
            *value,
            RExpr::Binary {
                op: BinaryOp::Equals,
                ..
            }
        ));
    }

    #[test]
    fn test_string_literal_unescapes() {
        let RExpr::Str { value, .. } = parse_expression("\"a\\nb\"") else {
            panic!("expected string literal");
        };
        assert_eq!(value, "a\nb");
    }
}
