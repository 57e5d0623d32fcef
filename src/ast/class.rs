use pest::iterators::Pair;

use crate::typechecker::ScopeId;

use super::{Method, Position, Rule, Statement};

/// A class declaration: its signature (name, constructor formals,
/// optional supertype) together with the class body.
#[derive(Debug, Clone)]
pub struct Class {
    pub name: String,
    pub formal_args: Vec<FormalArg>,
    pub extends: Option<String>,
    pub body: ClassBody,
    pub position: Position,
}

/// The body of a class. Its statements form the constructor.
#[derive(Default, Debug, Clone)]
pub struct ClassBody {
    pub statements: Vec<Statement>,
    pub methods: Vec<Method>,

    /// Constructor scope, attached by the type checker.
    pub scope: Option<ScopeId>,
}

#[derive(Debug, Clone)]
pub struct FormalArg {
    pub name: String,
    pub ty: String,
    pub position: Position,
}

impl Class {
    pub fn from_pair(pair: Pair<Rule>) -> Class {
        assert_eq!(pair.as_rule(), Rule::class_decl);

        let position = pair.line_col();
        let mut inner = pair.into_inner();

        let name = inner.next().unwrap().as_str().to_owned();
        let formal_args = parse_formal_args(inner.next().unwrap());

        let mut extends = None;
        let mut statements = vec![];
        let mut methods = vec![];

        for pair in inner {
            match pair.as_rule() {
                Rule::extends_clause => {
                    extends = Some(pair.into_inner().next().unwrap().as_str().to_owned());
                }
                Rule::statement => statements.push(Statement::from_pair(pair)),
                Rule::method => methods.push(Method::from_pair(pair)),
                rule => unreachable!("unexpected rule '{rule:?}' in class declaration"),
            }
        }

        Class {
            name,
            formal_args,
            extends,
            body: ClassBody {
                statements,
                methods,
                scope: None,
            },
            position,
        }
    }

    /// The declared supertype, defaulting to the root of the hierarchy.
    pub fn supertype(&self) -> &str {
        self.extends.as_deref().unwrap_or("Obj")
    }
}

pub(super) fn parse_formal_args(pair: Pair<Rule>) -> Vec<FormalArg> {
    assert_eq!(pair.as_rule(), Rule::formal_args);
    pair.into_inner().map(FormalArg::from_pair).collect()
}

impl FormalArg {
    pub fn from_pair(pair: Pair<Rule>) -> FormalArg {
        assert_eq!(pair.as_rule(), Rule::formal_arg);

        let position = pair.line_col();
        let mut inner = pair.into_inner();

        FormalArg {
            name: inner.next().unwrap().as_str().to_owned(),
            ty: inner.next().unwrap().as_str().to_owned(),
            position,
        }
    }
}
