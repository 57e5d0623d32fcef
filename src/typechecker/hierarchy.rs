//! Builds the type tree from the class declarations and rejects
//! malformed hierarchies before the main checking pass runs.

use log::debug;

use crate::ast::Ast;

use super::error::TypeError;
use super::type_tree::{MethodSig, TypeTree, BOOLEAN, INT, NOTHING, OBJ, STRING};

/// Reject hierarchies with cycles or undefined supertypes.
///
/// Classes are walked in source order keeping a queue of supertypes that
/// are still to be defined. A class completing a cycle is caught when it
/// is itself pending while its supertype is already defined; anything
/// left in the queue at the end names a supertype that never appears.
pub fn check_hierarchy(ast: &Ast) -> Result<(), TypeError> {
    let builtin = [OBJ, INT, STRING, BOOLEAN, NOTHING];
    let mut user_defined: Vec<&str> = vec![];
    let mut to_be_defined: Vec<&str> = vec![];

    for class in &ast.classes {
        let name = class.name.as_str();
        let extends = class.supertype();

        if name == extends {
            return Err(TypeError {
                message: format!("Class hierarchy is malformed: '{name}' extends itself"),
                lineno: class.position.0,
            });
        }
        if to_be_defined.contains(&name) && user_defined.contains(&extends) {
            return Err(TypeError {
                message: format!(
                    "Class hierarchy is malformed: '{name}' completes an inheritance cycle"
                ),
                lineno: class.position.0,
            });
        }

        user_defined.push(name);
        to_be_defined.retain(|&pending| pending != name);
        if !user_defined.contains(&extends) && !builtin.contains(&extends) {
            to_be_defined.push(extends);
        }
    }

    if let Some(&missing) = to_be_defined.first() {
        let offender = ast
            .classes
            .iter()
            .find(|class| class.supertype() == missing);
        return Err(TypeError {
            message: format!(
                "Class hierarchy is malformed: supertype '{missing}' is never defined"
            ),
            lineno: offender.map(|class| class.position.0).unwrap_or(0),
        });
    }

    Ok(())
}

/// Construct the lattice for a structurally valid program: every class
/// node is registered first, then the supertype edges are wired and the
/// method signatures recorded, so forward references resolve.
pub fn build_type_tree(ast: &Ast) -> Result<TypeTree, TypeError> {
    check_hierarchy(ast)?;

    let mut tree = TypeTree::new();
    for class in &ast.classes {
        tree.declare(&class.name);
    }
    for class in &ast.classes {
        if !tree.add_subtype(&class.name, class.supertype()) {
            return Err(TypeError {
                message: format!(
                    "Class '{}' extends undefined type '{}'",
                    class.name,
                    class.supertype()
                ),
                lineno: class.position.0,
            });
        }
        for method in &class.body.methods {
            tree.add_method(
                &class.name,
                MethodSig {
                    id: method.name.clone(),
                    arg_types: method.formal_args.iter().map(|arg| arg.ty.clone()).collect(),
                    return_type: method.declared_return().to_owned(),
                },
            );
        }
    }
    debug!("type tree built for {} user classes", ast.classes.len());

    Ok(tree)
}

#[cfg(test)]
mod tests {
    use crate::ast::QParser;

    use super::*;

    fn parse(source: &str) -> Ast {
        Ast::from_program(QParser::try_parse_program(source).unwrap())
    }

    #[test]
    fn test_accepts_a_linear_hierarchy() {
        let ast = parse("class A() { } class B() extends A { } class C() extends B { }");
        assert!(check_hierarchy(&ast).is_ok());
    }

    #[test]
    fn test_accepts_forward_references() {
        let ast = parse("class A() extends B { } class B() { }");
        assert!(check_hierarchy(&ast).is_ok());

        let tree = build_type_tree(&ast).unwrap();
        assert!(tree.is_subtype("A", "B"));
        assert!(tree.is_subtype("A", OBJ));
    }

    #[test]
    fn test_rejects_undefined_supertype() {
        let ast = parse("class A() extends Ghost { }");
        let error = check_hierarchy(&ast).unwrap_err();
        assert!(error.message.contains("'Ghost'"));
    }

    #[test]
    fn test_rejects_inheritance_cycles() {
        let ast = parse("class A() extends B { } class B() extends A { }");
        assert!(check_hierarchy(&ast).is_err());
    }

    #[test]
    fn test_rejects_self_extension() {
        let ast = parse("class A() extends A { }");
        assert!(check_hierarchy(&ast).is_err());
    }

    #[test]
    fn test_records_method_signatures() {
        let ast = parse("class A() { def f(x: Int): String { return \"\"; } }");
        let tree = build_type_tree(&ast).unwrap();

        let method = tree.method("A", "f").unwrap();
        assert_eq!(method.arg_types, vec![INT.to_owned()]);
        assert_eq!(method.return_type, STRING);
    }

    #[test]
    fn test_methods_default_to_returning_nothing() {
        let ast = parse("class A() { def f() { } }");
        let tree = build_type_tree(&ast).unwrap();
        assert_eq!(tree.method("A", "f").unwrap().return_type, NOTHING);
    }

    #[test]
    fn test_extending_a_builtin_works() {
        let ast = parse("class Fancy() extends String { }");
        let tree = build_type_tree(&ast).unwrap();
        assert!(tree.is_subtype("Fancy", STRING));
        assert!(tree.has_method("Fancy", "LESS"));
    }
}
