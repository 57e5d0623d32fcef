//! Constructor audit: every class a program constructs must be declared,
//! either built in or by the program itself. This is a pure name-level
//! pre-pass; no type information is consulted.

use log::debug;

use crate::ast::{Ast, LExpr, Position, RExpr, Statement};

use super::error::TypeError;
use super::type_tree::{BOOLEAN, INT, NOTHING, OBJ, STRING};

/// Check that every constructor call in `ast` names a declared class.
pub fn audit_constructors(ast: &Ast) -> Result<(), Vec<TypeError>> {
    let declared: Vec<&str> = [OBJ, INT, STRING, BOOLEAN, NOTHING]
        .into_iter()
        .chain(ast.classes.iter().map(|class| class.name.as_str()))
        .collect();

    let mut constructed = vec![];
    for class in &ast.classes {
        collect_statements(&class.body.statements, &mut constructed);
        for method in &class.body.methods {
            collect_statements(&method.statements, &mut constructed);
        }
    }
    collect_statements(&ast.statements, &mut constructed);
    debug!("audited {} constructor calls", constructed.len());

    let errors: Vec<TypeError> = constructed
        .into_iter()
        .filter(|(class, _)| !declared.contains(&class.as_str()))
        .map(|(class, position)| TypeError {
            message: format!("Call to constructor of undefined class '{class}'"),
            lineno: position.0,
        })
        .collect();

    if errors.is_empty() {
        Ok(())
    } else {
        Err(errors)
    }
}

fn collect_statements(statements: &[Statement], constructed: &mut Vec<(String, Position)>) {
    for statement in statements {
        match statement {
            Statement::Assignment(assignment) => {
                collect_lexpr(&assignment.lhs, constructed);
                collect_rexpr(&assignment.value, constructed);
            }
            Statement::Return(ret) => collect_rexpr(&ret.value, constructed),
            Statement::Expression(statement) => collect_rexpr(&statement.expression, constructed),
            Statement::While(while_loop) => {
                collect_rexpr(&while_loop.condition, constructed);
                collect_statements(&while_loop.statements, constructed);
            }
            Statement::If(if_block) => {
                collect_rexpr(&if_block.if_clause.condition, constructed);
                collect_statements(&if_block.if_clause.statements, constructed);
                for elif in &if_block.elif_clauses {
                    collect_rexpr(&elif.condition, constructed);
                    collect_statements(&elif.statements, constructed);
                }
                if let Some(else_clause) = &if_block.else_clause {
                    collect_statements(&else_clause.statements, constructed);
                }
            }
        }
    }
}

fn collect_rexpr(expression: &RExpr, constructed: &mut Vec<(String, Position)>) {
    match expression {
        RExpr::Constructor {
            class,
            args,
            position,
        } => {
            constructed.push((class.clone(), *position));
            for arg in args {
                collect_rexpr(arg, constructed);
            }
        }
        RExpr::Call { receiver, args, .. } => {
            collect_rexpr(receiver, constructed);
            for arg in args {
                collect_rexpr(arg, constructed);
            }
        }
        RExpr::Not { value, .. } => collect_rexpr(value, constructed),
        RExpr::Binary { lhs, rhs, .. } => {
            collect_rexpr(lhs, constructed);
            collect_rexpr(rhs, constructed);
        }
        RExpr::LExpr(lexpr) => collect_lexpr(lexpr, constructed),
        RExpr::Empty { .. } | RExpr::Int { .. } | RExpr::Str { .. } => {}
    }
}

fn collect_lexpr(lexpr: &LExpr, constructed: &mut Vec<(String, Position)>) {
    if let LExpr::Field { receiver, .. } = lexpr {
        collect_rexpr(receiver, constructed);
    }
}

#[cfg(test)]
mod tests {
    use crate::ast::QParser;

    use super::*;

    fn parse(source: &str) -> Ast {
        Ast::from_program(QParser::try_parse_program(source).unwrap())
    }

    #[test]
    fn test_accepts_declared_and_builtin_constructors() {
        let ast = parse("class Pt(x: Int) { this.x = x; } p = Pt(1); s = String();");
        assert!(audit_constructors(&ast).is_ok());
    }

    #[test]
    fn test_rejects_undefined_constructor() {
        let ast = parse("p = Pt(1, 2);");
        let errors = audit_constructors(&ast).unwrap_err();
        assert_eq!(errors.len(), 1);
        assert!(errors[0].message.contains("undefined class 'Pt'"));
    }

    #[test]
    fn test_finds_constructors_nested_in_arguments_and_branches() {
        let ast = parse("if true { x = Obj(); y = Wrapper(Missing()); }");
        let errors = audit_constructors(&ast).unwrap_err();
        assert_eq!(errors.len(), 2);
    }

    #[test]
    fn test_finds_constructors_inside_class_bodies() {
        let ast = parse("class A() { def f(): Nothing { x = Ghost(); } }");
        let errors = audit_constructors(&ast).unwrap_err();
        assert_eq!(errors.len(), 1);
        assert!(errors[0].message.contains("'Ghost'"));
    }
}
