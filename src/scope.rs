//! Scoped symbol table shared by the semantic analyzer and the code
//! generator. The payload differs per client (type and usage facts for
//! analysis, frame offsets for codegen), so the stack is generic over it.

use crate::ast::Identifier;
use rustc_hash::FxHashMap;

pub type Scope<T> = FxHashMap<Identifier, T>;

#[derive(Debug)]
pub struct ScopeStack<T> {
    scopes: Vec<Scope<T>>,
}

impl<T> ScopeStack<T> {
    /// Starts with a single outermost scope already open.
    pub fn new() -> Self {
        Self {
            scopes: vec![Scope::default()],
        }
    }

    pub fn push_scope(&mut self) {
        self.scopes.push(Scope::default());
    }

    /// Closes the innermost scope and hands its entries back so the
    /// caller can inspect them (unused-variable reporting).
    pub fn pop_scope(&mut self) -> Scope<T> {
        self.scopes.pop().expect("scope stack underflow")
    }

    /// Adds a binding to the innermost scope; rejects a duplicate name
    /// within that scope. Shadowing an outer scope is fine.
    pub fn declare(&mut self, name: Identifier, entry: T) -> Result<(), Identifier> {
        let current = self.scopes.last_mut().expect("scope stack underflow");
        if current.contains_key(&name) {
            return Err(name);
        }
        current.insert(name, entry);
        Ok(())
    }

    /// Adds a binding without the duplicate check. The code generator
    /// runs after validation, where duplicates are already ruled out.
    pub fn insert(&mut self, name: Identifier, entry: T) {
        let current = self.scopes.last_mut().expect("scope stack underflow");
        current.insert(name, entry);
    }

    /// Innermost-to-outermost lookup.
    pub fn lookup(&self, name: &str) -> Option<&T> {
        self.scopes.iter().rev().find_map(|scope| scope.get(name))
    }

    pub fn lookup_mut(&mut self, name: &str) -> Option<&mut T> {
        self.scopes
            .iter_mut()
            .rev()
            .find_map(|scope| scope.get_mut(name))
    }
}

impl<T> Default for ScopeStack<T> {
    fn default() -> Self {
        Self::new()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn duplicate_in_same_scope_is_rejected() {
        let mut scopes: ScopeStack<u32> = ScopeStack::new();
        assert!(scopes.declare("x".into(), 1).is_ok());
        assert_eq!(scopes.declare("x".into(), 2), Err("x".to_owned()));
    }

    #[test]
    fn shadowing_resolves_innermost_first() {
        let mut scopes: ScopeStack<u32> = ScopeStack::new();
        scopes.declare("x".into(), 1).unwrap();
        scopes.push_scope();
        scopes.declare("x".into(), 2).unwrap();
        assert_eq!(scopes.lookup("x"), Some(&2));
        scopes.pop_scope();
        assert_eq!(scopes.lookup("x"), Some(&1));
    }

    #[test]
    fn popped_scope_returns_its_entries() {
        let mut scopes: ScopeStack<u32> = ScopeStack::new();
        scopes.push_scope();
        scopes.declare("y".into(), 7).unwrap();
        let closed = scopes.pop_scope();
        assert_eq!(closed.get("y"), Some(&7));
        assert!(scopes.lookup("y").is_none());
    }
}
