use pest::iterators::Pair;

use super::{LExpr, Position, RExpr, Rule};

/// An assignment statement with an optional type annotation on the
/// left-hand side.
#[derive(Debug, Clone)]
pub struct Assignment {
    pub lhs: LExpr,
    pub annotation: Option<String>,
    pub value: RExpr,
    pub position: Position,
}

impl Assignment {
    pub fn from_pair(pair: Pair<Rule>) -> Assignment {
        assert_eq!(pair.as_rule(), Rule::assignment);

        let position = pair.line_col();
        let mut inner = pair.into_inner();

        let lhs = LExpr::from_pair(inner.next().unwrap());

        let mut annotation = None;
        let mut next = inner.next().unwrap();
        if next.as_rule() == Rule::type_annotation {
            annotation = Some(next.into_inner().next().unwrap().as_str().to_owned());
            next = inner.next().unwrap();
        }

        Assignment {
            lhs,
            annotation,
            value: RExpr::from_pair(next),
            position,
        }
    }
}
