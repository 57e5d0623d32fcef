use pest::iterators::Pair;

use super::{Assignment, IfBlock, Position, RExpr, Rule, WhileLoop};

#[derive(Debug, Clone)]
pub enum Statement {
    Assignment(Assignment),
    Return(Return),
    Expression(ExprStatement),
    While(WhileLoop),
    If(IfBlock),
}

/// A `return` statement. A bare `return;` carries the empty expression.
#[derive(Debug, Clone)]
pub struct Return {
    pub value: RExpr,
    pub position: Position,
}

/// An expression evaluated for its effect.
#[derive(Debug, Clone)]
pub struct ExprStatement {
    pub expression: RExpr,
    pub position: Position,
}

impl Statement {
    pub fn from_pair(pair: Pair<Rule>) -> Statement {
        assert_eq!(pair.as_rule(), Rule::statement);

        let inner = pair.into_inner().next().unwrap();
        match inner.as_rule() {
            Rule::while_stmt => Statement::While(WhileLoop::from_pair(inner)),
            Rule::if_block => Statement::If(IfBlock::from_pair(inner)),
            Rule::return_stmt => Statement::Return(Return::from_pair(inner)),
            Rule::assignment => Statement::Assignment(Assignment::from_pair(inner)),
            Rule::rexpr_stmt => Statement::Expression(ExprStatement::from_pair(inner)),
            rule => unreachable!("unexpected statement rule '{rule:?}'"),
        }
    }
}

impl Return {
    pub fn from_pair(pair: Pair<Rule>) -> Return {
        assert_eq!(pair.as_rule(), Rule::return_stmt);

        let position = pair.line_col();
        let value = match pair.into_inner().next() {
            Some(expression) => RExpr::from_pair(expression),
            None => RExpr::Empty { position },
        };

        Return { value, position }
    }
}

impl ExprStatement {
    pub fn from_pair(pair: Pair<Rule>) -> ExprStatement {
        assert_eq!(pair.as_rule(), Rule::rexpr_stmt);

        let position = pair.line_col();
        let expression = RExpr::from_pair(pair.into_inner().next().unwrap());

        ExprStatement {
            expression,
            position,
        }
    }
}
