//! Compiler backend for the Q programming language.
//!
//! This module translates a type-correct program into a single C
//! translation unit realising single-inheritance dispatch through
//! per-class vtables, and then drives the system C toolchain to produce
//! the final executable. You should run the type checker beforehand: the
//! emitter is total on a well-typed AST and reports no errors of its own.
mod runtime;

use std::{collections::HashMap, error::Error, fs, path::Path, process::Command};

use log::{error, info};
use once_cell::sync::Lazy;

use crate::{
    ast::{
        Ast, BinaryOp, Class, IfBlock, LExpr, Method, RExpr, Statement,
    },
    typechecker::{Analysis, ScopeId, TypeTree, BOOLEAN, INT, NOTHING, OBJ, STRING},
};

pub use self::runtime::{BUILTINS_C, BUILTINS_H};

/// Name of the emitted C translation unit.
pub const C_OUTPUT: &str = "q.c";
/// Name of the linked executable.
pub const EXECUTABLE: &str = "pgm";

const C_OBJECT: &str = "q.o";
const RUNTIME_HEADER: &str = "Builtins.h";
const RUNTIME_SOURCE: &str = "Builtins.c";
const RUNTIME_OBJECT: &str = "Builtins.o";

/// C types of the built-in classes; user classes map to `obj_<Name>`.
static BUILTIN_C_TYPES: Lazy<HashMap<&str, &str>> = Lazy::new(|| {
    HashMap::from([
        (OBJ, "obj_Obj"),
        (INT, "obj_Int"),
        (STRING, "obj_String"),
        (BOOLEAN, "obj_Boolean"),
        (NOTHING, "obj_Nothing"),
    ])
});

/// Surface identifiers rewritten to runtime singletons.
static KEYWORDS: Lazy<HashMap<&str, &str>> =
    Lazy::new(|| HashMap::from([("true", "lit_true"), ("false", "lit_false")]));

fn c_type(tree: &TypeTree, ty: &str) -> Option<String> {
    if let Some(mapped) = BUILTIN_C_TYPES.get(ty) {
        return Some((*mapped).to_owned());
    }
    tree.contains(ty).then(|| format!("obj_{ty}"))
}

pub struct Compiler<'a> {
    analysis: &'a Analysis,
    out: String,

    class_name: String,
    /// Constructor formals already emitted, so locals are not redeclared.
    printed: Vec<String>,
    /// Formals of the function currently being emitted.
    method_printed: Vec<String>,
    /// Method name and implementing function, for the descriptor table.
    class_methods: Vec<(String, String)>,
}

impl<'a> Compiler<'a> {
    pub fn new(analysis: &'a Analysis) -> Compiler<'a> {
        Compiler {
            analysis,
            out: String::new(),
            class_name: String::new(),
            printed: vec![],
            method_printed: vec![],
            class_methods: vec![],
        }
    }

    /// Translate the checked program into C source text.
    pub fn translate(mut self, ast: &Ast) -> String {
        self.emit_program(ast);
        self.out
    }

    /// Full backend pipeline: write the C translation unit, make sure the
    /// runtime object exists, then compile and link the executable.
    pub fn compile_program(self, ast: &Ast, emit_only: bool) -> Result<(), Box<dyn Error>> {
        let code = self.translate(ast);
        fs::write(C_OUTPUT, code)?;
        info!("Wrote '{C_OUTPUT}'");

        if emit_only {
            return Ok(());
        }

        ensure_runtime()?;
        compile_c(C_OUTPUT)?;
        link_program()?;
        info!("Built '{EXECUTABLE}'");
        Ok(())
    }

    /*
     * Program and class layout
     */

    fn emit_program(&mut self, ast: &Ast) {
        self.out.push_str("#include \"Builtins.h\"\n");
        self.out.push_str("#include <stdlib.h>\n\n");

        self.emit_forward_declarations(ast);
        for class in &ast.classes {
            self.emit_class(class);
        }

        self.out.push_str("int main() {\n");
        if let Some(scope) = ast.scope {
            self.emit_locals(scope, &[]);
        }
        for statement in &ast.statements {
            self.emit_statement(statement);
        }
        self.out.push_str("\treturn 0;\n}\n");
    }

    /// Classes may reference classes declared later (or each other), so
    /// every descriptor and object typedef is introduced up front.
    fn emit_forward_declarations(&mut self, ast: &Ast) {
        for class in &ast.classes {
            let name = &class.name;
            self.out.push_str(&format!("struct class_{name}_struct;\n"));
            self.out
                .push_str(&format!("typedef struct class_{name}_struct* class_{name};\n"));
            self.out.push_str(&format!("struct obj_{name}_struct;\n"));
            self.out
                .push_str(&format!("typedef struct obj_{name}_struct* obj_{name};\n"));
        }
        if !ast.classes.is_empty() {
            self.out.push('\n');
        }
    }

    fn emit_class(&mut self, class: &Class) {
        info!("emitting class '{}'", class.name);
        self.class_name = class.name.clone();
        self.class_methods.clear();
        self.printed.clear();
        self.method_printed.clear();

        self.emit_class_signature(class);
        self.emit_class_body(class);

        let name = &class.name;
        self.out.push_str(&format!(
            "struct class_{name}_struct the_class_{name}_struct = {{\n"
        ));
        self.out.push_str(&format!("\t.constructor = new_{name},\n"));
        for (method, function) in &self.class_methods {
            self.out.push_str(&format!("\t.{method} = {function},\n"));
        }
        self.out.push_str("};\n");
        self.out.push_str(&format!(
            "class_{name} the_class_{name} = &the_class_{name}_struct;\n\n\n"
        ));
    }

    /// Object layout, descriptor struct and the opening of the
    /// constructor function.
    fn emit_class_signature(&mut self, class: &Class) {
        let analysis = self.analysis;
        let name = &class.name;

        self.out.push_str(&format!("struct obj_{name}_struct {{\n"));
        self.out.push_str(&format!("\tclass_{name} clazz;\n"));
        for var in analysis.type_tree.instance_vars(name) {
            let field_type =
                c_type(&analysis.type_tree, &var.ty).unwrap_or_else(|| "obj_Obj".to_owned());
            self.out.push_str(&format!("\t{field_type} {};\n", var.name));
        }
        self.out.push_str("};\n");

        self.out.push_str(&format!(
            "struct class_{name}_struct the_class_{name}_struct;\n"
        ));
        self.out
            .push_str(&format!("extern class_{name} the_class_{name};\n"));

        self.out.push_str(&format!("struct class_{name}_struct {{\n"));
        self.out.push_str(&format!("\tobj_{name} (*constructor) ("));
        for (i, arg) in class.formal_args.iter().enumerate() {
            if i > 0 {
                self.out.push_str(", ");
            }
            self.emit_formal_arg(&arg.ty, &arg.name);
        }
        self.out.push_str(");\n");
        self.emit_method_slots(name);
        self.collect_method_table(name);
        self.out.push_str("};\n\n");

        self.out.push_str(&format!("obj_{name} new_{name}("));
        for (i, arg) in class.formal_args.iter().enumerate() {
            if i > 0 {
                self.out.push_str(", ");
            }
            self.emit_formal_arg(&arg.ty, &arg.name);
            self.printed.push(arg.name.clone());
        }
        self.out.push_str(") {\n");
    }

    fn emit_formal_arg(&mut self, ty: &str, name: &str) {
        let arg_type =
            c_type(&self.analysis.type_tree, ty).unwrap_or_else(|| "obj_Obj".to_owned());
        self.out.push_str(&format!("{arg_type} {name}"));
    }

    /// One function-pointer slot per method name, walking the chain
    /// leaves-first and skipping names already emitted.
    fn emit_method_slots(&mut self, class: &str) {
        let tree = &self.analysis.type_tree;
        let mut displayed: Vec<&str> = vec![];
        let mut slots = String::new();

        let mut current = Some(class);
        while let Some(ty) = current {
            for method in tree.methods_of(ty) {
                if displayed.contains(&method.id.as_str()) {
                    continue;
                }
                displayed.push(&method.id);

                let ret = c_type(tree, &method.return_type).unwrap_or_else(|| "obj_Obj".to_owned());
                let owner = c_type(tree, ty).unwrap_or_else(|| "obj_Obj".to_owned());
                slots.push_str(&format!("\t{ret} (*{}) ({owner}", method.id));
                for arg in &method.arg_types {
                    let arg = c_type(tree, arg).unwrap_or_else(|| "obj_Obj".to_owned());
                    slots.push_str(&format!(", {arg}"));
                }
                slots.push_str(");\n");
            }
            current = tree.parent_of(ty);
        }

        self.out.push_str(&slots);
    }

    /// Fill `class_methods` with `name -> OwningClass_method_name`
    /// entries, leaves-first so overrides win.
    fn collect_method_table(&mut self, class: &str) {
        let tree = &self.analysis.type_tree;
        let mut table = vec![];

        let mut current = Some(class);
        while let Some(ty) = current {
            for method in tree.methods_of(ty) {
                if table.iter().any(|(name, _)| name == &method.id) {
                    continue;
                }
                table.push((method.id.clone(), format!("{ty}_method_{}", method.id)));
            }
            current = tree.parent_of(ty);
        }

        self.class_methods = table;
    }

    /// Rest of the constructor, then the methods.
    fn emit_class_body(&mut self, class: &Class) {
        let name = self.class_name.clone();

        if let Some(scope) = class.body.scope {
            let skip = self.printed.clone();
            self.emit_locals(scope, &skip);
        }
        self.out.push_str(&format!(
            "\tobj_{name} this = malloc(sizeof(struct obj_{name}_struct));\n"
        ));
        self.out
            .push_str(&format!("\tthis->clazz = the_class_{name};\n"));
        for statement in &class.body.statements {
            self.emit_statement(statement);
        }
        self.out.push_str("\treturn this;\n}\n");

        for method in &class.body.methods {
            self.emit_method(method);
        }
    }

    fn emit_method(&mut self, method: &Method) {
        let analysis = self.analysis;
        self.method_printed.clear();

        let return_type = c_type(&analysis.type_tree, method.declared_return())
            .unwrap_or_else(|| "obj_Nothing".to_owned());
        let self_type = c_type(&analysis.type_tree, &self.class_name)
            .unwrap_or_else(|| "obj_Obj".to_owned());
        self.out.push_str(&format!(
            "{return_type} {}_method_{}({self_type} this",
            self.class_name, method.name
        ));
        for arg in &method.formal_args {
            self.out.push_str(", ");
            self.emit_formal_arg(&arg.ty, &arg.name);
            self.method_printed.push(arg.name.clone());
        }
        self.out.push_str(") {\n");

        if let Some(scope) = method.scope {
            let skip = self.method_printed.clone();
            self.emit_locals(scope, &skip);
        }
        for statement in &method.statements {
            self.emit_statement(statement);
        }
        if method.declared_return() == NOTHING {
            self.out.push_str("\treturn nothing;\n");
        }
        self.out.push_str("}\n");
    }

    /// Declare every binding of `scope` that has a C type and is not
    /// already bound as a formal argument.
    fn emit_locals(&mut self, scope: ScopeId, skip: &[String]) {
        let analysis = self.analysis;
        for binding in analysis.scopes.entries(scope) {
            if skip.iter().any(|name| name == &binding.name) {
                continue;
            }
            if let Some(local_type) = c_type(&analysis.type_tree, &binding.ty) {
                self.out
                    .push_str(&format!("\t{local_type} {};\n", binding.name));
            }
        }
    }

    /*
     * Statements
     */

    fn emit_statement(&mut self, statement: &Statement) {
        match statement {
            Statement::Assignment(assignment) => {
                self.out.push('\t');
                self.emit_lexpr(&assignment.lhs);
                self.out.push_str(" = ");
                self.emit_rexpr(&assignment.value);
                self.out.push_str(";\n");
            }
            Statement::Return(ret) => {
                self.out.push_str("\treturn ");
                self.emit_rexpr(&ret.value);
                self.out.push_str(";\n");
            }
            Statement::Expression(statement) => {
                self.out.push('\t');
                self.emit_rexpr(&statement.expression);
                self.out.push_str(";\n");
            }
            Statement::While(while_loop) => {
                self.out.push_str("\twhile ");
                self.emit_condition(&while_loop.condition);
                self.out.push_str(" {\n");
                // While bodies do not open a declaration scope.
                for statement in &while_loop.statements {
                    self.emit_statement(statement);
                }
                self.out.push_str("\t}\n");
            }
            Statement::If(if_block) => self.emit_if_block(if_block),
        }
    }

    fn emit_if_block(&mut self, if_block: &IfBlock) {
        self.out.push_str("\tif ");
        self.emit_condition(&if_block.if_clause.condition);
        self.out.push_str(" {\n");
        self.emit_branch(if_block.if_clause.scope, &if_block.if_clause.statements);

        for elif in &if_block.elif_clauses {
            self.out.push_str("\telse if ");
            self.emit_condition(&elif.condition);
            self.out.push_str(" {\n");
            self.emit_branch(elif.scope, &elif.statements);
        }

        if let Some(else_clause) = &if_block.else_clause {
            self.out.push_str("\telse {\n");
            self.emit_branch(else_clause.scope, &else_clause.statements);
        }
    }

    /// Branch-local declarations, the branch statements, closing brace.
    fn emit_branch(&mut self, scope: Option<ScopeId>, statements: &[Statement]) {
        if let Some(scope) = scope {
            let skip = self.method_printed.clone();
            self.emit_locals(scope, &skip);
        }
        for statement in statements {
            self.emit_statement(statement);
        }
        self.out.push_str("\t}\n");
    }

    /// Conditions dispatch uniformly on the runtime boolean's `value`.
    fn emit_condition(&mut self, condition: &RExpr) {
        self.out.push_str("((");
        self.emit_rexpr(condition);
        self.out.push_str(")->value)");
    }

    /*
     * Expressions
     */

    fn emit_rexpr(&mut self, expression: &RExpr) {
        match expression {
            RExpr::Empty { .. } => self.out.push_str("nothing"),
            RExpr::Int { value, .. } => self.out.push_str(&format!("int_literal({value})")),
            RExpr::Str { value, .. } => self
                .out
                .push_str(&format!("str_literal(\"{}\")", escape_c(value))),
            RExpr::Not { value, .. } => {
                self.out.push_str("(((");
                self.emit_rexpr(value);
                self.out.push_str(")->value) ? lit_false : lit_true)");
            }
            RExpr::Binary { op, lhs, rhs, .. } => self.emit_binary(*op, lhs, rhs),
            RExpr::Constructor { class, args, .. } => {
                self.out.push_str(&format!("new_{class}("));
                for (i, arg) in args.iter().enumerate() {
                    if i > 0 {
                        self.out.push_str(", ");
                    }
                    self.emit_rexpr(arg);
                }
                self.out.push(')');
            }
            RExpr::Call {
                receiver,
                method,
                args,
                ..
            } => {
                self.emit_rexpr(receiver);
                self.out.push_str(&format!("->clazz->{method}("));
                self.emit_rexpr(receiver);
                for arg in args {
                    self.out.push_str(", ");
                    self.emit_rexpr(arg);
                }
                self.out.push(')');
            }
            RExpr::LExpr(lexpr) => self.emit_lexpr(lexpr),
        }
    }

    fn emit_binary(&mut self, op: BinaryOp, lhs: &RExpr, rhs: &RExpr) {
        match op {
            // and/or short-circuit as ternaries on the boxed value.
            BinaryOp::And => {
                self.out.push_str("(((");
                self.emit_rexpr(lhs);
                self.out.push_str(")->value) ? (");
                self.emit_rexpr(rhs);
                self.out.push_str(") : lit_false)");
            }
            BinaryOp::Or => {
                self.out.push_str("(((");
                self.emit_rexpr(lhs);
                self.out.push_str(")->value) ? lit_true : (");
                self.emit_rexpr(rhs);
                self.out.push_str("))");
            }
            _ => {
                self.emit_rexpr(lhs);
                self.out
                    .push_str(&format!("->clazz->{}(", op.method_name()));
                self.emit_rexpr(lhs);
                self.out.push_str(", ");
                self.emit_rexpr(rhs);
                self.out.push(')');
            }
        }
    }

    fn emit_lexpr(&mut self, lexpr: &LExpr) {
        match lexpr {
            LExpr::Ident { name, .. } => match KEYWORDS.get(name.as_str()) {
                Some(replacement) => self.out.push_str(replacement),
                None => self.out.push_str(name),
            },
            LExpr::Field {
                receiver, field, ..
            } => {
                self.emit_rexpr(receiver);
                self.out.push_str(&format!("->{field}"));
            }
        }
    }
}

fn escape_c(value: &str) -> String {
    let mut escaped = String::with_capacity(value.len());
    for c in value.chars() {
        match c {
            '\\' => escaped.push_str("\\\\"),
            '"' => escaped.push_str("\\\""),
            '\n' => escaped.push_str("\\n"),
            '\t' => escaped.push_str("\\t"),
            '\r' => escaped.push_str("\\r"),
            '\0' => escaped.push_str("\\0"),
            other => escaped.push(other),
        }
    }
    escaped
}

/*
 * Toolchain driving
 */

/// Materialise the embedded runtime next to the output and compile it,
/// unless a runtime object is already present.
fn ensure_runtime() -> Result<(), Box<dyn Error>> {
    if !Path::new(RUNTIME_HEADER).exists() {
        fs::write(RUNTIME_HEADER, BUILTINS_H)?;
    }
    if !Path::new(RUNTIME_OBJECT).exists() {
        if !Path::new(RUNTIME_SOURCE).exists() {
            fs::write(RUNTIME_SOURCE, BUILTINS_C)?;
        }
        compile_c(RUNTIME_SOURCE)?;
    }
    Ok(())
}

fn compile_c(file: &str) -> Result<(), Box<dyn Error>> {
    info!("Compiling '{file}'...");

    // Widened variables make the emitted C assign across the class
    // pointer types; newer compilers reject that by default.
    let output = Command::new("cc")
        .args(["-Wno-incompatible-pointer-types", "-c", file])
        .output()?;
    let stderr = std::str::from_utf8(&output.stderr)?;
    if !stderr.is_empty() {
        error!("{stderr}");
    }
    if !output.status.success() {
        return Err(format!("cc failed on '{file}'").into());
    }

    Ok(())
}

fn link_program() -> Result<(), Box<dyn Error>> {
    info!("Linking program...");

    let output = Command::new("cc")
        .args([C_OBJECT, RUNTIME_OBJECT, "-o", EXECUTABLE])
        .output()?;
    let stderr = std::str::from_utf8(&output.stderr)?;
    if !stderr.is_empty() {
        error!("{stderr}");
    }
    if !output.status.success() {
        return Err("cc failed to link the program".into());
    }

    Ok(())
}

#[cfg(test)]
mod tests {
    use crate::ast::QParser;
    use crate::typechecker::{build_type_tree, Typechecker};

    use super::*;

    fn translate(source: &str) -> String {
        let mut ast = Ast::from_program(QParser::try_parse_program(source).unwrap());
        let tree = build_type_tree(&ast).unwrap();
        let analysis = Typechecker::new(tree).check(&mut ast).unwrap();
        Compiler::new(&analysis).translate(&ast)
    }

    #[test]
    fn test_main_declares_and_assigns_locals() {
        let code = translate("x = 3; x.PRINT();");
        assert!(code.contains("#include \"Builtins.h\""));
        assert!(code.contains("int main() {"));
        assert!(code.contains("\tobj_Int x;\n"));
        assert!(code.contains("\tx = int_literal(3);\n"));
        assert!(code.contains("x->clazz->PRINT(x)"));
    }

    #[test]
    fn test_string_literals_are_escaped() {
        let code = translate("s = \"a\\nb\";");
        assert!(code.contains("str_literal(\"a\\nb\")"));
    }

    #[test]
    fn test_boolean_keywords_become_singletons() {
        let code = translate("b = true; c = false;");
        assert!(code.contains("b = lit_true;"));
        assert!(code.contains("c = lit_false;"));
    }

    #[test]
    fn test_class_emits_layout_descriptor_and_constructor() {
        let code = translate(
            "class Pt(x: Int, y: Int) { this.x = x; this.y = y; } p = Pt(1, 2); p.x.PRINT();",
        );
        assert!(code.contains("typedef struct obj_Pt_struct* obj_Pt;"));
        assert!(code.contains("struct obj_Pt_struct {\n\tclass_Pt clazz;\n\tobj_Int x;\n\tobj_Int y;\n};"));
        assert!(code.contains("obj_Pt (*constructor) (obj_Int x, obj_Int y);"));
        assert!(code.contains("obj_Pt new_Pt(obj_Int x, obj_Int y) {"));
        assert!(code.contains("\tobj_Pt this = malloc(sizeof(struct obj_Pt_struct));"));
        assert!(code.contains("\tthis->clazz = the_class_Pt;"));
        assert!(code.contains("\tthis->x = x;"));
        assert!(code.contains(".constructor = new_Pt,"));
        assert!(code.contains("class_Pt the_class_Pt = &the_class_Pt_struct;"));
        assert!(code.contains("p = new_Pt(int_literal(1), int_literal(2));"));
        assert!(code.contains("p->x->clazz->PRINT(p->x)"));
    }

    #[test]
    fn test_descriptor_slots_walk_the_chain_leaves_first() {
        let code = translate("class A() { def f(): Int { return 1; } } a = A();");
        let descriptor_at = code.find("struct class_A_struct {").unwrap();
        let descriptor = &code[descriptor_at..code[descriptor_at..].find("};").unwrap() + descriptor_at];
        let f_at = descriptor.find("(*f)").unwrap();
        let str_at = descriptor.find("(*STR)").unwrap();
        assert!(f_at < str_at, "declared methods come before inherited ones");
        assert!(code.contains(".f = A_method_f,"));
        assert!(code.contains(".PRINT = Obj_method_PRINT,"));
    }

    #[test]
    fn test_override_points_the_slot_at_the_subclass() {
        let code = translate(
            "class A() { def f(): Int { return 1; } } \
             class B() extends A { def f(): Int { return 2; } } b = B();",
        );
        let b_instance_at = code.find("the_class_B_struct = {").unwrap();
        let b_instance = &code[b_instance_at..];
        assert!(b_instance.contains(".f = B_method_f,"));
    }

    #[test]
    fn test_methods_emit_with_this_and_nothing_fallback() {
        let code = translate("class A() { def hello() { \"hi\".PRINT(); } } a = A();");
        assert!(code.contains("obj_Nothing A_method_hello(obj_A this) {"));
        assert!(code.contains("\treturn nothing;\n}"));
    }

    #[test]
    fn test_conditions_dispatch_on_value() {
        let code = translate("x = 1; while x < 10 { x = x + 1; }");
        assert!(code.contains("\twhile ((x->clazz->LESS(x, int_literal(10)))->value) {"));
        assert!(code.contains("\tx = x->clazz->PLUS(x, int_literal(1));"));
    }

    #[test]
    fn test_branches_declare_their_novel_locals() {
        let code = translate("if true { y = 1; } else { z = \"s\"; }");
        let if_at = code.find("\tif ((lit_true)->value) {").unwrap();
        let after_if = &code[if_at..];
        assert!(after_if.contains("\tobj_Int y;\n"));
        assert!(after_if.contains("\tobj_String z;\n"));
        assert!(after_if.contains("\telse {"));
    }

    #[test]
    fn test_joined_variable_is_declared_once_in_main() {
        let code = translate("x = 3; if true { x = \"hi\"; } else { x = 4; } x.PRINT();");
        assert_eq!(code.matches("\tobj_Obj x;\n").count(), 1);
        assert!(code.contains("x->clazz->PRINT(x)"));
    }

    #[test]
    fn test_logical_operators_short_circuit() {
        let code = translate("b = true and false; c = true or false;");
        assert!(code.contains("b = (((lit_true)->value) ? (lit_false) : lit_false);"));
        assert!(code.contains("c = (((lit_true)->value) ? lit_true : (lit_false));"));
    }

    #[test]
    fn test_not_emits_a_value_ternary() {
        let code = translate("b = not true;");
        assert!(code.contains("b = (((lit_true)->value) ? lit_false : lit_true);"));
    }

    #[test]
    fn test_equality_dispatches_through_the_vtable() {
        let code = translate("b = 1 == 2;");
        assert!(code.contains("b = int_literal(1)->clazz->EQUALS(int_literal(1), int_literal(2));"));
    }
}
