use pest::iterators::Pair;

use crate::typechecker::ScopeId;

use super::{class::parse_formal_args, FormalArg, Position, Rule, Statement};

/// A method declaration within a class body.
#[derive(Debug, Clone)]
pub struct Method {
    pub name: String,
    pub formal_args: Vec<FormalArg>,

    /// The declared return type; methods without one return `Nothing`.
    pub return_type: Option<String>,
    pub statements: Vec<Statement>,

    /// Method body scope, attached by the type checker.
    pub scope: Option<ScopeId>,
    pub position: Position,
}

impl Method {
    pub fn from_pair(pair: Pair<Rule>) -> Method {
        assert_eq!(pair.as_rule(), Rule::method);

        let position = pair.line_col();
        let mut inner = pair.into_inner();

        let name = inner.next().unwrap().as_str().to_owned();
        let formal_args = parse_formal_args(inner.next().unwrap());

        let mut return_type = None;
        let mut statements = vec![];

        for pair in inner {
            match pair.as_rule() {
                Rule::return_type => {
                    return_type = Some(pair.into_inner().next().unwrap().as_str().to_owned());
                }
                Rule::statement => statements.push(Statement::from_pair(pair)),
                rule => unreachable!("unexpected rule '{rule:?}' in method declaration"),
            }
        }

        Method {
            name,
            formal_args,
            return_type,
            statements,
            scope: None,
            position,
        }
    }

    pub fn declared_return(&self) -> &str {
        self.return_type.as_deref().unwrap_or("Nothing")
    }
}
