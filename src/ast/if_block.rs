use pest::iterators::Pair;

use crate::typechecker::ScopeId;

use super::{Position, RExpr, Rule, Statement};

/// An `if` statement with any number of `elif` branches and an optional
/// `else` branch.
#[derive(Debug, Clone)]
pub struct IfBlock {
    pub if_clause: IfClause,
    pub elif_clauses: Vec<ElifClause>,
    pub else_clause: Option<ElseClause>,
    pub position: Position,
}

/// The branch scopes below hold only what the branch bound beyond the
/// join; the emitter turns them into per-branch declarations.
#[derive(Debug, Clone)]
pub struct IfClause {
    pub condition: RExpr,
    pub statements: Vec<Statement>,
    pub scope: Option<ScopeId>,
    pub position: Position,
}

#[derive(Debug, Clone)]
pub struct ElifClause {
    pub condition: RExpr,
    pub statements: Vec<Statement>,
    pub scope: Option<ScopeId>,
    pub position: Position,
}

#[derive(Debug, Clone)]
pub struct ElseClause {
    pub statements: Vec<Statement>,
    pub scope: Option<ScopeId>,
    pub position: Position,
}

impl IfBlock {
    pub fn from_pair(pair: Pair<Rule>) -> IfBlock {
        assert_eq!(pair.as_rule(), Rule::if_block);

        let position = pair.line_col();
        let mut inner = pair.into_inner();

        let if_clause = IfClause::from_pair(inner.next().unwrap());

        let mut elif_clauses = vec![];
        let mut else_clause = None;

        for pair in inner {
            match pair.as_rule() {
                Rule::elif_clause => elif_clauses.push(ElifClause::from_pair(pair)),
                Rule::else_clause => else_clause = Some(ElseClause::from_pair(pair)),
                rule => unreachable!("unexpected rule '{rule:?}' in if block"),
            }
        }

        IfBlock {
            if_clause,
            elif_clauses,
            else_clause,
            position,
        }
    }
}

impl IfClause {
    pub fn from_pair(pair: Pair<Rule>) -> IfClause {
        assert_eq!(pair.as_rule(), Rule::if_clause);

        let position = pair.line_col();
        let mut inner = pair.into_inner();

        IfClause {
            condition: RExpr::from_pair(inner.next().unwrap()),
            statements: inner.map(Statement::from_pair).collect(),
            scope: None,
            position,
        }
    }
}

impl ElifClause {
    pub fn from_pair(pair: Pair<Rule>) -> ElifClause {
        assert_eq!(pair.as_rule(), Rule::elif_clause);

        let position = pair.line_col();
        let mut inner = pair.into_inner();

        ElifClause {
            condition: RExpr::from_pair(inner.next().unwrap()),
            statements: inner.map(Statement::from_pair).collect(),
            scope: None,
            position,
        }
    }
}

impl ElseClause {
    pub fn from_pair(pair: Pair<Rule>) -> ElseClause {
        assert_eq!(pair.as_rule(), Rule::else_clause);

        let position = pair.line_col();

        ElseClause {
            statements: pair.into_inner().map(Statement::from_pair).collect(),
            scope: None,
            position,
        }
    }
}
