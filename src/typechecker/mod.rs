//! Type checker for Q.
//!
//! The main semantic pass: it infers variable types flow-sensitively,
//! joins branches by least-common-ancestor, validates operators, calls
//! and overrides, proves return coverage, and attaches to the AST the
//! scopes code generation needs. Diagnostics accumulate; the driver only
//! aborts after the pass has seen the whole program.
mod audit;
mod error;
mod hierarchy;
mod symbol_table;
mod type_tree;

pub use self::audit::audit_constructors;
pub use self::error::TypeError;
pub use self::hierarchy::{build_type_tree, check_hierarchy};
pub use self::symbol_table::{Binding, ScopeArena, ScopeId};
pub use self::type_tree::{InstanceVar, MethodSig, TypeTree, BOOLEAN, INT, NOTHING, OBJ, STRING};

use log::debug;

use crate::ast::{
    Assignment, Ast, BinaryOp, Class, IfBlock, LExpr, Method, Position, RExpr, Return, Statement,
    WhileLoop,
};

/// Soft cap on reported diagnostics; expression checking short-circuits
/// beyond it to bound output.
const ERROR_CAP: usize = 10;

/// Everything later passes need from a successful check.
#[derive(Debug)]
pub struct Analysis {
    pub type_tree: TypeTree,
    pub scopes: ScopeArena,
}

/// Struct for type checking an AST against a prebuilt type tree.
pub struct Typechecker {
    tree: TypeTree,
    scopes: ScopeArena,
    errors: Vec<TypeError>,

    /// The scope checking currently happens in.
    st: ScopeId,

    in_method: bool,
    in_while: bool,
    in_class: bool,
    must_repeat: bool,
    returned: bool,
    return_type: String,
    class_name: Option<String>,
    supertype: Option<String>,
}

impl Typechecker {
    pub fn new(tree: TypeTree) -> Typechecker {
        let mut scopes = ScopeArena::new();
        let st = scopes.push(None);
        // The boolean singletons are ordinary pre-bound variables.
        scopes.insert(st, "true", BOOLEAN);
        scopes.insert(st, "false", BOOLEAN);

        Typechecker {
            tree,
            scopes,
            errors: vec![],
            st,
            in_method: false,
            in_while: false,
            in_class: false,
            must_repeat: false,
            returned: false,
            return_type: String::new(),
            class_name: None,
            supertype: None,
        }
    }

    /// Check the whole program, annotating the AST with the scopes code
    /// generation needs. Returns the lattice and scope arena on success,
    /// otherwise every accumulated diagnostic.
    pub fn check(mut self, ast: &mut Ast) -> Result<Analysis, Vec<TypeError>> {
        for class in &mut ast.classes {
            self.check_class(class);
        }

        let origin = self.st;
        self.st = self.scopes.push(Some(origin));
        for statement in &mut ast.statements {
            self.check_statement(statement);
        }
        ast.scope = Some(self.st);
        self.st = origin;

        debug!("type check finished with {} errors", self.errors.len());
        if self.errors.is_empty() {
            Ok(Analysis {
                type_tree: self.tree,
                scopes: self.scopes,
            })
        } else {
            Err(self.errors)
        }
    }

    fn error(&mut self, lineno: usize, message: String) {
        self.errors.push(TypeError { message, lineno });
    }

    fn capped(&self) -> bool {
        self.errors.len() > ERROR_CAP
    }

    fn check_class(&mut self, class: &mut Class) {
        debug!("checking class '{}'", class.name);
        self.in_class = true;
        self.class_name = Some(class.name.clone());
        self.supertype = Some(class.supertype().to_owned());

        // The class scope holds the constructor only; it is dropped
        // before methods are checked, while `this.field` survives in the
        // lattice.
        let beyond_constructor = self.st;
        self.st = self.scopes.push(Some(beyond_constructor));

        for arg in &class.formal_args {
            self.scopes.insert(self.st, &arg.name, &arg.ty);
        }
        for statement in &mut class.body.statements {
            self.check_statement(statement);
        }
        class.body.scope = Some(self.st);

        self.st = beyond_constructor;
        for method in &mut class.body.methods {
            self.check_method(method);
        }

        self.in_class = false;
        self.class_name = None;
        self.supertype = None;
    }

    fn check_method(&mut self, method: &mut Method) {
        debug!("checking method '{}'", method.name);
        self.in_method = true;
        let origin = self.st;
        self.st = self.scopes.push(Some(origin));

        self.check_override(method);

        for arg in &method.formal_args {
            self.scopes.insert(self.st, &arg.name, &arg.ty);
        }

        self.return_type = method.declared_return().to_owned();
        // A method declared to return Nothing is vacuously covered.
        self.returned = self.return_type == NOTHING;

        for statement in &mut method.statements {
            self.check_statement(statement);
        }

        if !self.returned {
            self.error(
                method.position.0,
                format!(
                    "Method '{}' does not return a value of type '{}'",
                    method.name, self.return_type
                ),
            );
        }

        method.scope = Some(self.st);
        self.st = origin;
        self.in_method = false;
        self.returned = false;
    }

    /// If the supertype declares a method of the same name, enforce
    /// contravariant arguments and a covariant return type.
    fn check_override(&mut self, method: &mut Method) {
        let supertype = self.supertype.clone().unwrap_or_else(|| OBJ.to_owned());
        let Some(super_sig) = self.tree.method(&supertype, &method.name).cloned() else {
            return;
        };
        let class_name = self.class_name.clone().unwrap_or_default();
        let Some(override_sig) = self.tree.method(&class_name, &method.name).cloned() else {
            return;
        };

        if super_sig.arg_types.len() != override_sig.arg_types.len() {
            self.error(
                method.position.0,
                format!(
                    "Overridden method '{}' does not have the correct number of arguments",
                    method.name
                ),
            );
            return;
        }

        for (i, (super_arg, override_arg)) in super_sig
            .arg_types
            .iter()
            .zip(&override_sig.arg_types)
            .enumerate()
        {
            if !self.tree.is_supertype(override_arg, super_arg) {
                self.error(
                    method.position.0,
                    format!(
                        "Method argument override at position {} is not the same type or a supertype of the overridden method",
                        i + 1
                    ),
                );
            }
        }
        if !self
            .tree
            .is_subtype(&override_sig.return_type, &super_sig.return_type)
        {
            self.error(
                method.position.0,
                "Return value of overriding method is not the same type or a subtype of the overridden method".to_owned(),
            );
        }
    }

    fn check_statement(&mut self, statement: &mut Statement) {
        match statement {
            Statement::Assignment(assignment) => self.check_assignment(assignment),
            Statement::Return(ret) => self.check_return(ret),
            Statement::Expression(statement) => {
                self.check_rexpr(&statement.expression);
            }
            Statement::While(while_loop) => self.check_while(while_loop),
            Statement::If(if_block) => self.check_if_block(if_block),
        }
    }

    fn check_assignment(&mut self, assignment: &Assignment) {
        let rhs_type = self.check_rexpr(&assignment.value);

        match &assignment.lhs {
            LExpr::Ident { name, .. } => {
                let existing = self.scopes.lookup(self.st, name).map(str::to_owned);
                let recorded = match (&assignment.annotation, existing) {
                    (Some(annotation), Some(existing)) => rhs_type
                        .and_then(|rhs| self.tree.lca(annotation, &rhs))
                        .and_then(|joined| self.tree.lca(&existing, &joined)),
                    (None, Some(existing)) => {
                        match rhs_type.and_then(|rhs| self.tree.lca(&existing, &rhs)) {
                            Some(joined) => {
                                if self.in_while && joined != existing && joined != OBJ {
                                    self.must_repeat = true;
                                }
                                Some(joined)
                            }
                            // Keep the old recorded type when the join
                            // cannot be computed.
                            None => Some(existing),
                        }
                    }
                    (Some(annotation), None) => {
                        rhs_type.and_then(|rhs| self.tree.lca(annotation, &rhs))
                    }
                    (None, None) => rhs_type,
                };

                if let Some(ty) = recorded {
                    self.scopes.insert(self.st, name, &ty);
                }
            }
            LExpr::Field { receiver, field, .. } => {
                // `this.field = e` inside a class records (and possibly
                // widens) the instance variable on the lattice node.
                if self.in_class && is_this(receiver) {
                    if let (Some(class_name), Some(ty)) = (self.class_name.clone(), rhs_type) {
                        self.tree.add_instance_var(&class_name, field, &ty);
                    }
                }
            }
        }
    }

    fn check_return(&mut self, ret: &Return) {
        if !self.in_method {
            self.error(
                ret.position.0,
                "Return statement outside of method declaration".to_owned(),
            );
            return;
        }

        let Some(ty) = self.check_rexpr(&ret.value) else {
            return;
        };
        if self.tree.is_subtype(&ty, &self.return_type) {
            self.returned = true;
        } else {
            self.error(
                ret.position.0,
                format!(
                    "Method returns value of type '{}', should return '{}' or a subtype of '{}'",
                    ty, self.return_type, self.return_type
                ),
            );
        }
    }

    fn check_while(&mut self, while_loop: &mut WhileLoop) {
        if let Some(condition) = self.check_rexpr(&while_loop.condition) {
            if condition != BOOLEAN {
                self.error(
                    while_loop.position.0,
                    "While condition must be of type 'Boolean'".to_owned(),
                );
            }
        }

        let was_in_while = self.in_while;
        self.in_while = true;

        // Re-check the whole body until no assignment widens a
        // loop-carried variable. Every widening strictly ascends the
        // lattice, so the iteration is bounded by its height. Diagnostics
        // of abandoned passes are dropped; only the final pass reports.
        let errors_before = self.errors.len();
        loop {
            self.must_repeat = false;
            self.errors.truncate(errors_before);
            for statement in &mut while_loop.statements {
                self.check_statement(statement);
            }
            if !self.must_repeat {
                break;
            }
        }

        while_loop.scope = Some(self.st);
        self.in_while = was_in_while;
    }

    fn check_if_block(&mut self, if_block: &mut IfBlock) {
        let origin = self.st;
        let mut branch_scopes = vec![];

        self.st = self.scopes.push(Some(origin));
        let if_scope = self.st;
        branch_scopes.push(if_scope);
        if let Some(condition) = self.check_rexpr(&if_block.if_clause.condition) {
            if condition != BOOLEAN {
                self.error(
                    if_block.if_clause.position.0,
                    "If condition must be of type 'Boolean'".to_owned(),
                );
            }
        }
        for statement in &mut if_block.if_clause.statements {
            self.check_statement(statement);
        }

        let mut elif_scopes = vec![];
        for elif in &mut if_block.elif_clauses {
            self.st = self.scopes.push(Some(origin));
            branch_scopes.push(self.st);
            elif_scopes.push(self.st);
            if let Some(condition) = self.check_rexpr(&elif.condition) {
                if condition != BOOLEAN {
                    self.error(
                        elif.position.0,
                        "Elif condition must be of type 'Boolean'".to_owned(),
                    );
                }
            }
            for statement in &mut elif.statements {
                self.check_statement(statement);
            }
        }

        let else_scope = match &mut if_block.else_clause {
            Some(else_clause) => {
                self.st = self.scopes.push(Some(origin));
                branch_scopes.push(self.st);
                for statement in &mut else_clause.statements {
                    self.check_statement(statement);
                }
                self.st
            }
            // Without an else the if branch stands in for it.
            None => if_scope,
        };

        // Join the branches, then let the joined view adopt whatever the
        // enclosing scope already bound.
        let joined = self
            .scopes
            .intersection(if_scope, &branch_scopes, &self.tree);
        self.scopes.merge(joined, origin);
        self.st = joined;

        // What each branch bound beyond the join becomes that branch's
        // declaration scope during emission.
        if_block.if_clause.scope = Some(self.scopes.difference(if_scope, joined));
        for (elif, scope) in if_block.elif_clauses.iter_mut().zip(elif_scopes) {
            elif.scope = Some(self.scopes.difference(scope, joined));
        }
        if let Some(else_clause) = &mut if_block.else_clause {
            else_clause.scope = Some(self.scopes.difference(else_scope, joined));
        }
    }

    /// Infer the type of an expression, recording diagnostics along the
    /// way. `None` means the type could not be computed; the fault has
    /// already been reported.
    fn check_rexpr(&mut self, expression: &RExpr) -> Option<String> {
        match expression {
            RExpr::Empty { .. } => Some(NOTHING.to_owned()),
            RExpr::Int { .. } => Some(INT.to_owned()),
            RExpr::Str { .. } => Some(STRING.to_owned()),
            RExpr::Not { value, .. } => {
                self.check_rexpr(value);
                Some(BOOLEAN.to_owned())
            }
            RExpr::Binary {
                op,
                lhs,
                rhs,
                position,
            } => self.check_binary(*op, lhs, rhs, *position),
            RExpr::Constructor { class, args, .. } => {
                for arg in args {
                    self.check_rexpr(arg);
                }
                Some(class.clone())
            }
            RExpr::Call {
                receiver,
                method,
                args,
                position,
            } => self.check_call(receiver, method, args, *position),
            RExpr::LExpr(lexpr) => self.check_lexpr(lexpr),
        }
    }

    fn check_lexpr(&mut self, lexpr: &LExpr) -> Option<String> {
        match lexpr {
            LExpr::Ident { name, position } => {
                if name == "this" {
                    if let Some(class_name) = &self.class_name {
                        return Some(class_name.clone());
                    }
                }
                match self.scopes.lookup(self.st, name) {
                    Some(ty) => Some(ty.to_owned()),
                    None => {
                        self.error(
                            position.0,
                            format!("Use of uninitialized variable '{name}'"),
                        );
                        None
                    }
                }
            }
            LExpr::Field {
                receiver,
                field,
                position,
            } => {
                let receiver_type = self.check_rexpr(receiver)?;
                match self.tree.instance_var(&receiver_type, field) {
                    Some(ty) => Some(ty.to_owned()),
                    None => {
                        self.error(
                            position.0,
                            format!("Type '{receiver_type}' has no instance variable '{field}'"),
                        );
                        None
                    }
                }
            }
        }
    }

    fn check_binary(
        &mut self,
        op: BinaryOp,
        lhs: &RExpr,
        rhs: &RExpr,
        position: Position,
    ) -> Option<String> {
        if self.capped() {
            return None;
        }

        let left = self.check_rexpr(lhs);
        let right = self.check_rexpr(rhs);
        let (left, right) = (left?, right?);

        if left != right {
            self.error(
                position.0,
                format!("Binary operator type mismatch: '{left}' and '{right}'"),
            );
        }
        if !self.tree.has_method(&left, op.method_name()) {
            self.error(
                position.0,
                format!("Type '{left}' has no operator named '{}'", op.method_name()),
            );
        }

        if op.yields_boolean() {
            Some(BOOLEAN.to_owned())
        } else {
            Some(left)
        }
    }

    fn check_call(
        &mut self,
        receiver: &RExpr,
        method: &str,
        args: &[RExpr],
        position: Position,
    ) -> Option<String> {
        let receiver_type = self.check_rexpr(receiver);
        let arg_types: Vec<Option<String>> =
            args.iter().map(|arg| self.check_rexpr(arg)).collect();
        let receiver_type = receiver_type?;

        let Some(sig) = self.tree.method(&receiver_type, method).cloned() else {
            self.error(
                position.0,
                format!("Type '{receiver_type}' has no method named '{method}'"),
            );
            return None;
        };

        if sig.arg_types.len() != args.len() {
            self.error(
                position.0,
                format!("Invalid call to method '{method}'; wrong number of arguments supplied"),
            );
            return Some(sig.return_type);
        }

        for (i, (formal, actual)) in sig.arg_types.iter().zip(&arg_types).enumerate() {
            if let Some(actual) = actual {
                if !self.tree.is_subtype(actual, formal) {
                    self.error(
                        position.0,
                        format!(
                            "Method call argument at position {} is not the same type or a subtype of the required argument",
                            i + 1
                        ),
                    );
                }
            }
        }

        Some(sig.return_type)
    }
}

fn is_this(expression: &RExpr) -> bool {
    matches!(expression, RExpr::LExpr(LExpr::Ident { name, .. }) if name == "this")
}

#[cfg(test)]
mod tests {
    use crate::ast::QParser;

    use super::*;

    fn parse(source: &str) -> Ast {
        Ast::from_program(QParser::try_parse_program(source).unwrap())
    }

    fn analyse(source: &str) -> Result<(Ast, Analysis), Vec<TypeError>> {
        let mut ast = parse(source);
        let tree = build_type_tree(&ast).map_err(|error| vec![error])?;
        let analysis = Typechecker::new(tree).check(&mut ast)?;
        Ok((ast, analysis))
    }

    fn top_level_type(source: &str, name: &str) -> String {
        let (ast, analysis) = analyse(source).expect("program should check");
        analysis
            .scopes
            .lookup(ast.scope.unwrap(), name)
            .unwrap_or_else(|| panic!("'{name}' should be bound"))
            .to_owned()
    }

    fn first_error(source: &str) -> TypeError {
        analyse(source).expect_err("program should be rejected").remove(0)
    }

    #[test]
    fn test_literals_and_calls_infer() {
        assert_eq!(top_level_type("x = 3;", "x"), INT);
        assert_eq!(top_level_type("x = \"hi\";", "x"), STRING);
        assert_eq!(top_level_type("x = not true;", "x"), BOOLEAN);
        assert_eq!(top_level_type("x = 3.STR();", "x"), STRING);
        assert_eq!(top_level_type("x = 1 + 2;", "x"), INT);
        assert_eq!(top_level_type("x = 1 < 2;", "x"), BOOLEAN);
    }

    #[test]
    fn test_if_else_join_widens_by_lca() {
        let source = "x = 3; if true { x = \"hi\"; } else { x = 4; } y = x;";
        assert_eq!(top_level_type(source, "x"), OBJ);
    }

    #[test]
    fn test_join_of_sibling_classes_is_their_parent() {
        let source = "class A() { } class B() extends A { } class C() extends A { } \
                      if true { x = B(); } else { x = C(); } y = x;";
        assert_eq!(top_level_type(source, "x"), "A");
    }

    #[test]
    fn test_branch_only_binding_is_dropped_at_the_join() {
        let source = "if true { y = 1; } else { z = 2; } q = 3;";
        let (ast, analysis) = analyse(source).unwrap();
        let scope = ast.scope.unwrap();
        assert_eq!(analysis.scopes.lookup(scope, "y"), None);
        assert_eq!(analysis.scopes.lookup(scope, "z"), None);
    }

    #[test]
    fn test_branch_difference_scopes_hold_the_novel_bindings() {
        let source = "if true { y = 1; } else { z = 2; }";
        let (ast, analysis) = analyse(source).unwrap();
        let Statement::If(if_block) = &ast.statements[0] else {
            panic!("expected if block");
        };
        let if_scope = if_block.if_clause.scope.unwrap();
        assert_eq!(analysis.scopes.lookup_local(if_scope, "y"), Some(INT));
        let else_scope = if_block.else_clause.as_ref().unwrap().scope.unwrap();
        assert_eq!(analysis.scopes.lookup_local(else_scope, "z"), Some(INT));
    }

    #[test]
    fn test_while_fixpoint_reaches_the_least_upper_bound() {
        let source = "class A() { } class B() extends A { } class C() extends A { } \
                      flag = true; x = B(); \
                      while flag { x = C(); flag = false; } y = x;";
        assert_eq!(top_level_type(source, "x"), "A");
    }

    #[test]
    fn test_while_without_widening_stays_put() {
        let source = "x = 1; while x < 10 { x = x + 1; } y = x;";
        assert_eq!(top_level_type(source, "x"), INT);
    }

    #[test]
    fn test_annotation_joins_into_the_recorded_type() {
        assert_eq!(top_level_type("x: Obj = 3;", "x"), OBJ);
    }

    #[test]
    fn test_uninitialized_variable_is_reported() {
        let error = first_error("y = foo;");
        assert!(error.message.contains("Use of uninitialized variable 'foo'"));
        assert_eq!(error.lineno, 1);
    }

    #[test]
    fn test_condition_must_be_boolean() {
        assert!(first_error("if 1 { x = 2; }").message.contains("If condition"));
        assert!(first_error("while 1 { x = 2; }")
            .message
            .contains("While condition"));
    }

    #[test]
    fn test_binary_operator_mismatch_is_reported() {
        let error = first_error("x = 1 + \"one\";");
        assert!(error.message.contains("Binary operator type mismatch"));
    }

    #[test]
    fn test_missing_operator_is_reported() {
        let error = first_error("x = true + false;");
        assert!(error.message.contains("has no operator named 'PLUS'"));
    }

    #[test]
    fn test_missing_method_is_reported() {
        let error = first_error("x = 3.FROB();");
        assert!(error.message.contains("has no method named 'FROB'"));
    }

    #[test]
    fn test_call_argument_subtyping() {
        let ok = "class A() { def f(x: Obj): Nothing { } } a = A(); a.f(3);";
        assert!(analyse(ok).is_ok());

        let bad = "class A() { def f(x: Int): Nothing { } } a = A(); a.f(\"s\");";
        assert!(first_error(bad)
            .message
            .contains("not the same type or a subtype"));
    }

    #[test]
    fn test_call_arity_is_checked() {
        let error = first_error("class A() { def f(x: Int): Nothing { } } a = A(); a.f();");
        assert!(error.message.contains("wrong number of arguments"));
    }

    #[test]
    fn test_instance_variables_are_recorded_and_readable() {
        let source = "class Pt(x: Int, y: Int) { this.x = x; this.y = y; } \
                      p = Pt(1, 2); q = p.x;";
        let (_, analysis) = analyse(source).unwrap();
        assert_eq!(analysis.type_tree.instance_var("Pt", "x"), Some(INT));
    }

    #[test]
    fn test_unknown_instance_variable_is_reported() {
        let error = first_error(
            "class Pt(x: Int) { this.x = x; } p = Pt(1); q = p.z;",
        );
        assert!(error.message.contains("has no instance variable 'z'"));
    }

    #[test]
    fn test_field_assigned_differently_widens() {
        let source = "class Box(a: Int, flag: Boolean) { \
                          if flag { this.v = a; } else { this.v = \"s\"; } \
                      } b = Box(1, true);";
        let (_, analysis) = analyse(source).unwrap();
        assert_eq!(analysis.type_tree.instance_var("Box", "v"), Some(OBJ));
    }

    #[test]
    fn test_override_with_covariant_return_is_accepted() {
        let source = "class A() { } class B() extends A { } \
                      class P() { def make(): A { return A(); } } \
                      class Q() extends P { def make(): B { return B(); } }";
        assert!(analyse(source).is_ok());
    }

    #[test]
    fn test_override_return_supertype_is_rejected() {
        let source = "class A() { def f(): Int { return 1; } } \
                      class B() extends A { def f(): String { return \"x\"; } }";
        assert!(first_error(source)
            .message
            .contains("not the same type or a subtype of the overridden method"));
    }

    #[test]
    fn test_override_argument_subtype_is_rejected() {
        let source = "class A() { def f(x: Obj): Nothing { } } \
                      class B() extends A { def f(x: Int): Nothing { } }";
        assert!(first_error(source)
            .message
            .contains("not the same type or a supertype"));
    }

    #[test]
    fn test_override_with_contravariant_argument_is_accepted() {
        let source = "class A() { def f(x: Int): Nothing { } } \
                      class B() extends A { def f(x: Obj): Nothing { } }";
        assert!(analyse(source).is_ok());
    }

    #[test]
    fn test_override_arity_mismatch_is_rejected() {
        let source = "class A() { def f(x: Int): Nothing { } } \
                      class B() extends A { def f(): Nothing { } }";
        assert!(first_error(source)
            .message
            .contains("correct number of arguments"));
    }

    #[test]
    fn test_method_must_return() {
        let source = "class A() { def f(): Int { x = 1; } }";
        assert!(first_error(source).message.contains("does not return"));
    }

    #[test]
    fn test_returning_a_subtype_counts_as_coverage() {
        let source = "class A() { } class B() extends A { } \
                      class F() { def make(): A { return B(); } }";
        assert!(analyse(source).is_ok());
    }

    #[test]
    fn test_return_type_mismatch_is_reported() {
        let source = "class A() { def f(): Int { return \"x\"; } }";
        assert!(first_error(source)
            .message
            .contains("should return 'Int' or a subtype"));
    }

    #[test]
    fn test_return_outside_method_is_rejected() {
        assert!(first_error("return 3;")
            .message
            .contains("outside of method declaration"));
    }

    #[test]
    fn test_methods_do_not_see_constructor_locals() {
        let source = "class A(x: Int) { \
                          helper = x + 1; \
                          def f(): Int { return helper; } \
                      }";
        assert!(first_error(source)
            .message
            .contains("Use of uninitialized variable 'helper'"));
    }

    #[test]
    fn test_methods_see_fields_through_this() {
        let source = "class A(x: Int) { \
                          this.x = x; \
                          def f(): Int { return this.x; } \
                      }";
        assert!(analyse(source).is_ok());
    }

    #[test]
    fn test_dispatch_on_inherited_method() {
        let source = "class A() { def f(): Int { return 1; } } \
                      class B() extends A { } \
                      b = B(); x = b.f();";
        assert_eq!(top_level_type(source, "x"), INT);
    }

    #[test]
    fn test_error_accumulation_reports_several_faults() {
        let errors = analyse("a = x; b = y; c = z;").unwrap_err();
        assert_eq!(errors.len(), 3);
    }
}
