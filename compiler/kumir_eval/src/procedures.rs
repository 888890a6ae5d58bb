//! Registry of user-defined algorithms.
//!
//! Filled once when a program is loaded and read-only afterwards. Entries
//! borrow the definitions from the program tree, which outlives the run.

use rustc_hash::{FxHashMap, FxHashSet};

use kumir_ir::{AlgorithmDef, Name, TypeTag};
use kumir_value::{
    duplicate_algorithm, duplicate_variable, table_return_type, undeclarable_type, EvalResult,
};

#[derive(Clone, Debug, Default)]
pub struct AlgorithmRegistry<'p> {
    algorithms: FxHashMap<Name, &'p AlgorithmDef>,
    /// Registration order, for listing.
    order: Vec<Name>,
}

impl<'p> AlgorithmRegistry<'p> {
    pub fn new() -> Self {
        Self::default()
    }

    /// Register one definition.
    ///
    /// Fails on a duplicate name (case-insensitive), a table return type,
    /// or a malformed parameter list.
    pub fn register(&mut self, def: &'p AlgorithmDef) -> EvalResult<()> {
        if self.algorithms.contains_key(&def.name) {
            return Err(duplicate_algorithm(def.name.as_str()).or_span(def.span));
        }
        match def.return_type {
            Some(TypeTag::Table) => {
                return Err(table_return_type(def.name.as_str()).or_span(def.span));
            }
            Some(ty) if !ty.is_declarable() => {
                return Err(undeclarable_type(def.name.as_str(), ty.keyword()).or_span(def.span));
            }
            _ => {}
        }
        let mut seen = FxHashSet::default();
        for param in &def.params {
            if !param.ty.is_declarable() {
                let err = undeclarable_type(param.name.as_str(), param.ty.keyword());
                return Err(err.or_span(def.span));
            }
            if !seen.insert(&param.name) {
                return Err(duplicate_variable(param.name.as_str()).or_span(def.span));
            }
        }
        tracing::debug!(name = %def.name, params = def.params.len(), "registered algorithm");
        self.order.push(def.name.clone());
        self.algorithms.insert(def.name.clone(), def);
        Ok(())
    }

    #[inline]
    pub fn get(&self, name: &Name) -> Option<&'p AlgorithmDef> {
        self.algorithms.get(name).copied()
    }

    pub fn contains(&self, name: &Name) -> bool {
        self.algorithms.contains_key(name)
    }

    pub fn len(&self) -> usize {
        self.algorithms.len()
    }

    pub fn is_empty(&self) -> bool {
        self.algorithms.is_empty()
    }

    /// Names in registration order.
    pub fn names(&self) -> impl Iterator<Item = &Name> {
        self.order.iter()
    }
}

#[cfg(test)]
#[expect(clippy::unwrap_used, reason = "Tests use unwrap for brevity")]
mod tests {
    use kumir_ir::{Param, ParamMode, Span};
    use kumir_value::ErrorCategory;

    use super::*;

    #[test]
    fn duplicate_names_are_case_insensitive() {
        let a = AlgorithmDef::procedure("Рисовать", vec![], vec![]);
        let mut b = AlgorithmDef::procedure("рисовать", vec![], vec![]);
        b.span = Span::new(10, 1);
        let mut registry = AlgorithmRegistry::new();
        registry.register(&a).unwrap();
        let err = registry.register(&b).unwrap_err();
        assert_eq!(err.category(), ErrorCategory::Declaration);
        assert_eq!(err.span, Some(Span::new(10, 1)));
        assert_eq!(registry.len(), 1);
    }

    #[test]
    fn table_return_type_is_rejected() {
        let def = AlgorithmDef::function("f", TypeTag::Table, vec![], vec![]);
        let err = AlgorithmRegistry::new().register(&def).unwrap_err();
        assert_eq!(err.category(), ErrorCategory::Declaration);
    }

    #[test]
    fn duplicate_parameters_are_rejected() {
        let def = AlgorithmDef::procedure(
            "p",
            vec![
                Param::new("x", TypeTag::Int, ParamMode::In),
                Param::new("X", TypeTag::Real, ParamMode::Out),
            ],
            vec![],
        );
        let err = AlgorithmRegistry::new().register(&def).unwrap_err();
        assert_eq!(err.category(), ErrorCategory::Declaration);
    }

    #[test]
    fn names_keep_registration_order() {
        let defs = [
            AlgorithmDef::procedure("в", vec![], vec![]),
            AlgorithmDef::procedure("а", vec![], vec![]),
        ];
        let mut registry = AlgorithmRegistry::new();
        for def in &defs {
            registry.register(def).unwrap();
        }
        let names: Vec<_> = registry.names().map(Name::as_str).collect();
        assert_eq!(names, ["в", "а"]);
        assert!(registry.get(&Name::new("А")).is_some());
    }
}
