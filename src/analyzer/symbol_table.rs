use std::collections::HashMap;

use tracing::trace;

use super::Ty;

#[derive(Clone, Debug, PartialEq)]
pub enum Symbol {
    Variable { name: String, ty: Ty },
    Argument { name: String, ty: Ty },
    Array { name: String, ty: Ty, size: usize },
    Function { name: String, args: usize },
}

#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum SymbolKind {
    Variable,
    Argument,
    Array,
    Function,
}

impl Symbol {
    pub fn name(&self) -> &str {
        match self {
            Symbol::Variable { name, .. }
            | Symbol::Argument { name, .. }
            | Symbol::Array { name, .. }
            | Symbol::Function { name, .. } => name,
        }
    }

    pub fn kind(&self) -> SymbolKind {
        match self {
            Symbol::Variable { .. } => SymbolKind::Variable,
            Symbol::Argument { .. } => SymbolKind::Argument,
            Symbol::Array { .. } => SymbolKind::Array,
            Symbol::Function { .. } => SymbolKind::Function,
        }
    }
}

/// How far up the scope chain a lookup is allowed to go.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum Reach {
    /// Only the innermost scope.
    Local,
    /// The innermost scope, then each enclosing scope out to the root.
    Enclosing,
}

/// Outcome of a kind-restricted lookup. The first symbol found by name wins,
/// even when it has the wrong kind: shadowing is by name only.
#[derive(Clone, Copy, Debug, PartialEq)]
pub enum Resolution<'a> {
    Found(&'a Symbol),
    WrongKind(&'a Symbol),
    NotFound,
}

#[derive(Clone, Debug, Default)]
struct Scope {
    symbols: HashMap<String, Symbol>,
}

/// A stack of scopes. Entering pushes a fresh scope, exiting drops it along
/// with every symbol it held.
#[derive(Clone, Debug, Default)]
pub struct SymbolTable {
    scopes: Vec<Scope>,
}

impl SymbolTable {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn depth(&self) -> usize {
        self.scopes.len()
    }

    pub fn enter_scope(&mut self) {
        self.scopes.push(Scope::default());
        trace!(depth = self.depth(), "enter scope");
    }

    pub fn exit_scope(&mut self) {
        self.scopes.pop();
        trace!(depth = self.depth(), "exit scope");
    }

    /// Adds `symbol` to the current scope, replacing any symbol of the same
    /// name there. Callers wanting to reject redeclarations check
    /// [`SymbolTable::check_local`] first.
    ///
    /// # Panics
    ///
    /// Panics when no scope has been entered.
    pub fn add_symbol(&mut self, symbol: Symbol) {
        trace!(?symbol, depth = self.depth(), "add symbol");
        let scope = self
            .scopes
            .last_mut()
            .expect("symbol added outside of any scope");
        scope.symbols.insert(symbol.name().to_string(), symbol);
    }

    pub fn add_var_symbol(&mut self, name: &str, ty: Ty) {
        self.add_symbol(Symbol::Variable {
            name: name.to_string(),
            ty,
        });
    }

    pub fn add_arg_symbol(&mut self, name: &str, ty: Ty) {
        self.add_symbol(Symbol::Argument {
            name: name.to_string(),
            ty,
        });
    }

    pub fn add_array_symbol(&mut self, name: &str, ty: Ty, size: usize) {
        self.add_symbol(Symbol::Array {
            name: name.to_string(),
            ty,
            size,
        });
    }

    pub fn add_func_symbol(&mut self, name: &str, args: usize) {
        self.add_symbol(Symbol::Function {
            name: name.to_string(),
            args,
        });
    }

    /// Is `name` declared in the current scope?
    pub fn check_local(&self, name: &str) -> bool {
        self.scopes
            .last()
            .is_some_and(|scope| scope.symbols.contains_key(name))
    }

    /// Searches the current scope first, then outer scopes.
    pub fn find_symbol(&self, name: &str) -> Option<&Symbol> {
        self.scopes
            .iter()
            .rev()
            .find_map(|scope| scope.symbols.get(name))
    }

    pub fn find_local(&self, name: &str) -> Option<&Symbol> {
        self.scopes.last().and_then(|scope| scope.symbols.get(name))
    }

    pub fn resolve(&self, name: &str, kinds: &[SymbolKind], reach: Reach) -> Resolution<'_> {
        let symbol = match reach {
            Reach::Local => self.find_local(name),
            Reach::Enclosing => self.find_symbol(name),
        };
        match symbol {
            Some(s) if kinds.contains(&s.kind()) => Resolution::Found(s),
            Some(s) => Resolution::WrongKind(s),
            None => Resolution::NotFound,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn lookup_reaches_enclosing_scope() {
        let mut st = SymbolTable::new();
        st.enter_scope();
        st.add_var_symbol("a", Ty::Int);
        st.enter_scope();
        st.add_var_symbol("b", Ty::Int);

        assert_eq!(
            st.find_symbol("a"),
            Some(&Symbol::Variable {
                name: "a".to_string(),
                ty: Ty::Int
            })
        );
        assert!(st.find_local("a").is_none());
        assert!(st.find_symbol("c").is_none());
    }

    #[test]
    fn innermost_declaration_shadows() {
        let mut st = SymbolTable::new();
        st.enter_scope();
        st.add_var_symbol("x", Ty::Int);
        st.enter_scope();
        st.add_array_symbol("x", Ty::Int, 3);

        assert_eq!(st.find_symbol("x").map(Symbol::kind), Some(SymbolKind::Array));
        st.exit_scope();
        assert_eq!(
            st.find_symbol("x").map(Symbol::kind),
            Some(SymbolKind::Variable)
        );
    }

    #[test]
    fn exited_scopes_are_gone() {
        let mut st = SymbolTable::new();
        st.enter_scope();
        st.enter_scope();
        st.add_arg_symbol("n", Ty::Int);
        st.exit_scope();

        assert!(st.find_symbol("n").is_none());
        assert_eq!(st.depth(), 1);
    }

    #[test]
    fn resolve_distinguishes_wrong_kind() {
        let mut st = SymbolTable::new();
        st.enter_scope();
        st.add_func_symbol("f", 2);
        st.add_var_symbol("v", Ty::Int);

        assert!(matches!(
            st.resolve("f", &[SymbolKind::Function], Reach::Local),
            Resolution::Found(Symbol::Function { args: 2, .. })
        ));
        assert!(matches!(
            st.resolve("v", &[SymbolKind::Function], Reach::Local),
            Resolution::WrongKind(_)
        ));
        assert_eq!(
            st.resolve("w", &[SymbolKind::Variable], Reach::Enclosing),
            Resolution::NotFound
        );
    }

    #[test]
    fn local_reach_stops_at_current_scope() {
        let mut st = SymbolTable::new();
        st.enter_scope();
        st.add_var_symbol("g", Ty::Int);
        st.enter_scope();

        assert_eq!(
            st.resolve("g", &[SymbolKind::Variable], Reach::Local),
            Resolution::NotFound
        );
        assert!(matches!(
            st.resolve("g", &[SymbolKind::Variable], Reach::Enclosing),
            Resolution::Found(_)
        ));
    }

    #[test]
    fn same_scope_declaration_replaces() {
        let mut st = SymbolTable::new();
        st.enter_scope();
        st.add_var_symbol("a", Ty::Int);
        assert!(st.check_local("a"));
        st.add_array_symbol("a", Ty::Int, 4);

        assert_eq!(st.find_local("a").map(Symbol::kind), Some(SymbolKind::Array));
    }
}
