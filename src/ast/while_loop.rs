use pest::iterators::Pair;

use crate::typechecker::ScopeId;

use super::{Position, RExpr, Rule, Statement};

#[derive(Debug, Clone)]
pub struct WhileLoop {
    pub condition: RExpr,
    pub statements: Vec<Statement>,

    /// Scope as it stood after the body reached its fixpoint, attached by
    /// the type checker.
    pub scope: Option<ScopeId>,
    pub position: Position,
}

impl WhileLoop {
    pub fn from_pair(pair: Pair<Rule>) -> WhileLoop {
        assert_eq!(pair.as_rule(), Rule::while_stmt);

        let position = pair.line_col();
        let mut inner = pair.into_inner();

        let condition = RExpr::from_pair(inner.next().unwrap());
        let statements = inner.map(Statement::from_pair).collect();

        WhileLoop {
            condition,
            statements,
            scope: None,
            position,
        }
    }
}
