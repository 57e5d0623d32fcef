//! Module for parsing Q programs.
//!
//! It contains all structs for the internal representation of Q (i.e., the AST).
mod assignment;
mod binary_op;
mod class;
mod expression;
mod if_block;
mod lexpr;
mod method;
mod parser;
mod statement;
mod while_loop;

pub use self::assignment::*;
pub use self::binary_op::*;
pub use self::class::*;
pub use self::expression::*;
pub use self::if_block::*;
pub use self::lexpr::*;
pub use self::method::*;
pub use self::parser::*;
pub use self::statement::*;
pub use self::while_loop::*;

use pest::iterators::Pairs;

use crate::typechecker::ScopeId;

/// A position within a source file (i.e., line and column).
pub type Position = (usize, usize);

/// AST of a single Q program: its class declarations followed by the
/// top-level statements that become the body of `main`.
#[derive(Default, Debug, Clone)]
pub struct Ast {
    pub classes: Vec<Class>,
    pub statements: Vec<Statement>,

    /// Scope of the top-level statements, attached by the type checker.
    pub scope: Option<ScopeId>,
}

impl Ast {
    /// Create a new AST from the parsed program pairs.
    /// Note: This AST is not type-correct by default.
    pub fn from_program(program: Pairs<Rule>) -> Ast {
        let mut classes = vec![];
        let mut statements = vec![];

        for pair in program {
            match pair.as_rule() {
                Rule::class_decl => classes.push(Class::from_pair(pair)),
                Rule::statement => statements.push(Statement::from_pair(pair)),
                Rule::EOI => {}
                rule => unreachable!("unexpected rule '{rule:?}' at program level"),
            }
        }

        Ast {
            classes,
            statements,
            scope: None,
        }
    }
}
