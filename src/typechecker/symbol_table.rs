//! Lexically scoped symbol tables used while type checking Q programs.
//!
//! Scopes live in an arena and reference their parents by index. During
//! if-block checking several branch scopes share one parent, so the
//! chain is really a DAG; the arena keeps that free of ownership cycles.
//! Entries are kept in insertion order so that emitted declarations are
//! deterministic.

use super::type_tree::TypeTree;

/// Index of a scope inside a [`ScopeArena`].
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct ScopeId(usize);

/// A single variable binding.
#[derive(Debug, Clone)]
pub struct Binding {
    pub name: String,
    pub ty: String,
}

/// One level of the symbol table chain.
#[derive(Default, Debug)]
struct Scope {
    parent: Option<ScopeId>,
    entries: Vec<Binding>,
}

#[derive(Default, Debug)]
pub struct ScopeArena {
    scopes: Vec<Scope>,
}

impl ScopeArena {
    pub fn new() -> ScopeArena {
        ScopeArena::default()
    }

    /// Create a new scope whose lookups fall through to `parent`.
    pub fn push(&mut self, parent: Option<ScopeId>) -> ScopeId {
        self.scopes.push(Scope {
            parent,
            entries: vec![],
        });
        ScopeId(self.scopes.len() - 1)
    }

    pub fn parent(&self, scope: ScopeId) -> Option<ScopeId> {
        self.scopes[scope.0].parent
    }

    /// Bind `name` in `scope`, replacing any previous local binding.
    pub fn insert(&mut self, scope: ScopeId, name: &str, ty: &str) {
        let scope = &mut self.scopes[scope.0];
        match scope.entries.iter_mut().find(|binding| binding.name == name) {
            Some(binding) => binding.ty = ty.to_owned(),
            None => scope.entries.push(Binding {
                name: name.to_owned(),
                ty: ty.to_owned(),
            }),
        }
    }

    /// Look `name` up through the scope chain.
    pub fn lookup(&self, scope: ScopeId, name: &str) -> Option<&str> {
        let mut current = Some(scope);
        while let Some(id) = current {
            if let Some(ty) = self.lookup_local(id, name) {
                return Some(ty);
            }
            current = self.scopes[id.0].parent;
        }
        None
    }

    /// Look `name` up in `scope` alone. The join operations rely on this
    /// so they never pick up outer bindings.
    pub fn lookup_local(&self, scope: ScopeId, name: &str) -> Option<&str> {
        self.scopes[scope.0]
            .entries
            .iter()
            .find(|binding| binding.name == name)
            .map(|binding| binding.ty.as_str())
    }

    pub fn entries(&self, scope: ScopeId) -> &[Binding] {
        &self.scopes[scope.0].entries
    }

    /// Join `base` with its sibling branch scopes: a name survives iff
    /// `base` and every sibling bind it locally, and its joined type is
    /// the LCA fold of all recorded types. The result hangs off `base`'s
    /// parent, not `base`, so later lookups see the joined view.
    pub fn intersection(
        &mut self,
        base: ScopeId,
        siblings: &[ScopeId],
        tree: &TypeTree,
    ) -> ScopeId {
        let mut joined = vec![];
        for binding in self.entries(base) {
            let mut ty = Some(binding.ty.clone());
            for &sibling in siblings {
                ty = match (ty, self.lookup_local(sibling, &binding.name)) {
                    (Some(ty), Some(other)) => tree.lca(&ty, other),
                    _ => None,
                };
            }
            if let Some(ty) = ty {
                joined.push(Binding {
                    name: binding.name.clone(),
                    ty,
                });
            }
        }

        let parent = self.parent(base);
        let result = self.push(parent);
        self.scopes[result.0].entries = joined;
        result
    }

    /// The local bindings of `a` whose names are absent from `b`. Used to
    /// recover what a branch bound beyond the joined view.
    pub fn difference(&mut self, a: ScopeId, b: ScopeId) -> ScopeId {
        let entries: Vec<Binding> = self
            .entries(a)
            .iter()
            .filter(|binding| self.lookup_local(b, &binding.name).is_none())
            .cloned()
            .collect();

        let parent = self.parent(a);
        let result = self.push(parent);
        self.scopes[result.0].entries = entries;
        result
    }

    /// Adopt every local binding of `from` that `into` does not already
    /// bind. One level; parents are not consulted.
    pub fn merge(&mut self, into: ScopeId, from: ScopeId) {
        let adopted: Vec<Binding> = self
            .entries(from)
            .iter()
            .filter(|binding| self.lookup_local(into, &binding.name).is_none())
            .cloned()
            .collect();
        self.scopes[into.0].entries.extend(adopted);
    }
}
