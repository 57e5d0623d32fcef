use pest::iterators::Pair;

use super::{Position, RExpr, Rule};

/// An l-expression: something an assignment may target.
#[derive(Debug, Clone)]
pub enum LExpr {
    Ident {
        name: String,
        position: Position,
    },
    /// `receiver.field`.
    Field {
        receiver: Box<RExpr>,
        field: String,
        position: Position,
    },
}

impl LExpr {
    pub fn position(&self) -> Position {
        match self {
            LExpr::Ident { position, .. } | LExpr::Field { position, .. } => *position,
        }
    }

    pub fn from_pair(pair: Pair<Rule>) -> LExpr {
        assert_eq!(pair.as_rule(), Rule::lexpr);

        let mut inner = pair.into_inner();
        let first = inner.next().unwrap();
        let mut lexpr = LExpr::Ident {
            name: first.as_str().to_owned(),
            position: first.line_col(),
        };

        for ident in inner {
            lexpr = LExpr::Field {
                receiver: Box::new(RExpr::LExpr(lexpr)),
                field: ident.as_str().to_owned(),
                position: ident.line_col(),
            };
        }

        lexpr
    }
}
