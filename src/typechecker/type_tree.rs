//! The class hierarchy (the "type tree") of a Q program.
//!
//! A rooted tree of class records holding each class's methods and
//! instance variables. Nodes live in an arena and reference their parents
//! by index; `Obj` is the root and the built-in classes hang directly off
//! it with their method tables prepopulated.

use std::collections::HashMap;

pub const OBJ: &str = "Obj";
pub const INT: &str = "Int";
pub const STRING: &str = "String";
pub const BOOLEAN: &str = "Boolean";
pub const NOTHING: &str = "Nothing";

/// The signature of a method as recorded on its declaring class.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct MethodSig {
    pub id: String,
    pub arg_types: Vec<String>,
    pub return_type: String,
}

impl MethodSig {
    pub fn new(id: &str, arg_types: &[&str], return_type: &str) -> MethodSig {
        MethodSig {
            id: id.to_owned(),
            arg_types: arg_types.iter().map(|ty| (*ty).to_owned()).collect(),
            return_type: return_type.to_owned(),
        }
    }
}

/// An instance variable and its recorded type. The type may widen when
/// the same field is assigned under different dynamic contexts.
#[derive(Debug, Clone)]
pub struct InstanceVar {
    pub name: String,
    pub ty: String,
}

#[derive(Debug)]
struct TypeNode {
    name: String,
    parent: Option<usize>,
    children: Vec<usize>,
    methods: Vec<MethodSig>,
    instance_vars: Vec<InstanceVar>,
}

#[derive(Debug)]
pub struct TypeTree {
    nodes: Vec<TypeNode>,
    index: HashMap<String, usize>,
}

impl Default for TypeTree {
    fn default() -> Self {
        Self::new()
    }
}

impl TypeTree {
    /// A tree holding only the built-in classes and their methods.
    pub fn new() -> TypeTree {
        let mut tree = TypeTree {
            nodes: vec![],
            index: HashMap::new(),
        };

        let root = tree.add_node(OBJ, None);
        tree.nodes[root].methods = vec![
            MethodSig::new("STR", &[], STRING),
            MethodSig::new("PRINT", &[], NOTHING),
            MethodSig::new("EQUALS", &[OBJ], BOOLEAN),
        ];

        let int = tree.add_node(INT, Some(root));
        tree.nodes[int].methods = vec![
            MethodSig::new("PLUS", &[INT], INT),
            MethodSig::new("MINUS", &[INT], INT),
            MethodSig::new("TIMES", &[INT], INT),
            MethodSig::new("DIVIDE", &[INT], INT),
            MethodSig::new("ATMOST", &[INT], BOOLEAN),
            MethodSig::new("LESS", &[INT], BOOLEAN),
            MethodSig::new("ATLEAST", &[INT], BOOLEAN),
            MethodSig::new("MORE", &[INT], BOOLEAN),
        ];

        let string = tree.add_node(STRING, Some(root));
        tree.nodes[string].methods = vec![
            MethodSig::new("PLUS", &[STRING], STRING),
            MethodSig::new("ATMOST", &[STRING], BOOLEAN),
            MethodSig::new("LESS", &[STRING], BOOLEAN),
            MethodSig::new("ATLEAST", &[STRING], BOOLEAN),
            MethodSig::new("MORE", &[STRING], BOOLEAN),
        ];

        let boolean = tree.add_node(BOOLEAN, Some(root));
        tree.nodes[boolean].methods = vec![
            MethodSig::new("NOT", &[BOOLEAN], BOOLEAN),
            MethodSig::new("AND", &[BOOLEAN], BOOLEAN),
            MethodSig::new("OR", &[BOOLEAN], BOOLEAN),
        ];

        tree.add_node(NOTHING, Some(root));

        tree
    }

    fn add_node(&mut self, name: &str, parent: Option<usize>) -> usize {
        let idx = self.nodes.len();
        self.nodes.push(TypeNode {
            name: name.to_owned(),
            parent,
            children: vec![],
            methods: vec![],
            instance_vars: vec![],
        });
        if let Some(parent) = parent {
            self.nodes[parent].children.push(idx);
        }
        // The first node registered under a name wins.
        self.index.entry(name.to_owned()).or_insert(idx);
        idx
    }

    /// Register a class by name without wiring it into the hierarchy yet.
    /// Lets classes extend classes that appear later in the source.
    pub fn declare(&mut self, name: &str) {
        if !self.index.contains_key(name) {
            self.add_node(name, None);
        }
    }

    /// Record `sub` as a subtype of `sup`. Fails when the supertype is
    /// undefined.
    pub fn add_subtype(&mut self, sub: &str, sup: &str) -> bool {
        let Some(&parent) = self.index.get(sup) else {
            return false;
        };
        let child = match self.index.get(sub) {
            Some(&idx) => idx,
            None => self.add_node(sub, None),
        };
        if self.nodes[child].parent.is_some() {
            return true;
        }
        self.nodes[child].parent = Some(parent);
        self.nodes[parent].children.push(child);
        true
    }

    pub fn contains(&self, name: &str) -> bool {
        self.index.contains_key(name)
    }

    /// Record a method signature on a class. Within one class the first
    /// method of a name wins on lookup.
    pub fn add_method(&mut self, ty: &str, method: MethodSig) -> bool {
        let Some(&idx) = self.index.get(ty) else {
            return false;
        };
        self.nodes[idx].methods.push(method);
        true
    }

    /// Record an instance variable on a class. If the field already
    /// exists its recorded type is replaced by the LCA of old and new.
    pub fn add_instance_var(&mut self, ty: &str, name: &str, var_ty: &str) -> bool {
        let Some(&idx) = self.index.get(ty) else {
            return false;
        };
        let widened = self.nodes[idx]
            .instance_vars
            .iter()
            .find(|var| var.name == name)
            .and_then(|existing| self.lca(&existing.ty, var_ty));

        let node = &mut self.nodes[idx];
        match node.instance_vars.iter_mut().find(|var| var.name == name) {
            Some(existing) => {
                if let Some(widened) = widened {
                    existing.ty = widened;
                }
            }
            None => node.instance_vars.push(InstanceVar {
                name: name.to_owned(),
                ty: var_ty.to_owned(),
            }),
        }
        true
    }

    /// Is `sub` the same type as or a subtype of `sup`?
    pub fn is_subtype(&self, sub: &str, sup: &str) -> bool {
        let Some(&start) = self.index.get(sub) else {
            return false;
        };
        let Some(&target) = self.index.get(sup) else {
            return false;
        };
        let mut current = start;
        loop {
            if current == target {
                return true;
            }
            match self.nodes[current].parent {
                Some(parent) => current = parent,
                None => return false,
            }
        }
    }

    pub fn is_supertype(&self, sup: &str, sub: &str) -> bool {
        self.is_subtype(sub, sup)
    }

    /// The least common ancestor of two types in the hierarchy, `Obj` in
    /// the worst case. `None` when either type is undefined.
    pub fn lca(&self, a: &str, b: &str) -> Option<String> {
        let mut t1 = *self.index.get(a)?;
        let t2_origin = *self.index.get(b)?;

        loop {
            let mut t2 = t2_origin;
            loop {
                if t1 == t2 {
                    return Some(self.nodes[t1].name.clone());
                }
                match self.nodes[t2].parent {
                    Some(parent) => t2 = parent,
                    None => break,
                }
            }
            match self.nodes[t1].parent {
                Some(parent) => t1 = parent,
                None => break,
            }
        }

        Some(OBJ.to_owned())
    }

    /// Resolve a method by walking from `ty` up the parent chain; the
    /// first match wins.
    pub fn method(&self, ty: &str, id: &str) -> Option<&MethodSig> {
        let mut current = Some(*self.index.get(ty)?);
        while let Some(idx) = current {
            if let Some(method) = self.nodes[idx].methods.iter().find(|m| m.id == id) {
                return Some(method);
            }
            current = self.nodes[idx].parent;
        }
        None
    }

    pub fn has_method(&self, ty: &str, id: &str) -> bool {
        self.method(ty, id).is_some()
    }

    /// The recorded type of an instance variable declared on `ty` itself.
    pub fn instance_var(&self, ty: &str, name: &str) -> Option<&str> {
        let idx = *self.index.get(ty)?;
        self.nodes[idx]
            .instance_vars
            .iter()
            .find(|var| var.name == name)
            .map(|var| var.ty.as_str())
    }

    pub fn instance_vars(&self, ty: &str) -> &[InstanceVar] {
        match self.index.get(ty) {
            Some(&idx) => &self.nodes[idx].instance_vars,
            None => &[],
        }
    }

    /// The methods declared directly on `ty`.
    pub fn methods_of(&self, ty: &str) -> &[MethodSig] {
        match self.index.get(ty) {
            Some(&idx) => &self.nodes[idx].methods,
            None => &[],
        }
    }

    pub fn parent_of(&self, ty: &str) -> Option<&str> {
        let idx = *self.index.get(ty)?;
        self.nodes[idx]
            .parent
            .map(|parent| self.nodes[parent].name.as_str())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    /// Obj <- A <- B, Obj <- A <- C, Obj <- D
    fn sample_tree() -> TypeTree {
        let mut tree = TypeTree::new();
        assert!(tree.add_subtype("A", OBJ));
        assert!(tree.add_subtype("B", "A"));
        assert!(tree.add_subtype("C", "A"));
        assert!(tree.add_subtype("D", OBJ));
        tree
    }

    #[test]
    fn test_lca_is_idempotent() {
        let tree = sample_tree();
        for ty in ["A", "B", INT, OBJ] {
            assert_eq!(tree.lca(ty, ty).as_deref(), Some(ty));
        }
    }

    #[test]
    fn test_lca_is_commutative() {
        let tree = sample_tree();
        assert_eq!(tree.lca("B", "C"), tree.lca("C", "B"));
        assert_eq!(tree.lca("B", "C").as_deref(), Some("A"));
        assert_eq!(tree.lca("B", "D").as_deref(), Some(OBJ));
    }

    #[test]
    fn test_lca_is_associative() {
        let tree = sample_tree();
        let left = tree.lca("B", &tree.lca("C", "D").unwrap());
        let right = tree.lca(&tree.lca("B", "C").unwrap(), "D");
        assert_eq!(left, right);
    }

    #[test]
    fn test_lca_with_root_is_root() {
        let tree = sample_tree();
        assert_eq!(tree.lca("B", OBJ).as_deref(), Some(OBJ));
        assert_eq!(tree.lca(INT, STRING).as_deref(), Some(OBJ));
    }

    #[test]
    fn test_lca_of_undefined_type_is_none() {
        let tree = sample_tree();
        assert_eq!(tree.lca("B", "Nope"), None);
    }

    #[test]
    fn test_subtype_is_reflexive() {
        let tree = sample_tree();
        assert!(tree.is_subtype("B", "B"));
        assert!(!tree.is_subtype("Nope", "Nope"));
    }

    #[test]
    fn test_subtype_is_transitive() {
        let tree = sample_tree();
        assert!(tree.is_subtype("B", "A"));
        assert!(tree.is_subtype("A", OBJ));
        assert!(tree.is_subtype("B", OBJ));
        assert!(!tree.is_subtype("A", "B"));
        assert!(tree.is_supertype("A", "B"));
    }

    #[test]
    fn test_add_subtype_fails_on_undefined_supertype() {
        let mut tree = TypeTree::new();
        assert!(!tree.add_subtype("A", "Ghost"));
    }

    #[test]
    fn test_method_lookup_walks_the_parent_chain() {
        let mut tree = sample_tree();
        tree.add_method("A", MethodSig::new("f", &[], INT));
        assert_eq!(tree.method("B", "f").unwrap().return_type, INT);
        assert!(tree.has_method("B", "PRINT"));
        assert!(!tree.has_method("D", "f"));
    }

    #[test]
    fn test_first_declared_method_wins() {
        let mut tree = sample_tree();
        tree.add_method("A", MethodSig::new("f", &[], INT));
        tree.add_method("A", MethodSig::new("f", &[], STRING));
        assert_eq!(tree.method("A", "f").unwrap().return_type, INT);
    }

    #[test]
    fn test_instance_var_widens_in_place() {
        let mut tree = sample_tree();
        tree.add_instance_var("D", "x", "B");
        assert_eq!(tree.instance_var("D", "x"), Some("B"));
        tree.add_instance_var("D", "x", "C");
        assert_eq!(tree.instance_var("D", "x"), Some("A"));
        tree.add_instance_var("D", "x", INT);
        assert_eq!(tree.instance_var("D", "x"), Some(OBJ));
    }

    #[test]
    fn test_instance_vars_are_not_inherited() {
        let mut tree = sample_tree();
        tree.add_instance_var("A", "x", INT);
        assert_eq!(tree.instance_var("B", "x"), None);
    }
}
