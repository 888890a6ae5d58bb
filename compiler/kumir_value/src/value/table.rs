//! Bounded multi-dimensional tables (`таб`).
//!
//! Storage is sparse: only written cells exist, and reading a cell that was
//! never written is an error rather than a default.

use std::fmt;

use kumir_ir::TypeTag;
use rustc_hash::FxHashMap;

use super::Value;
use crate::coerce::coerce;
use crate::{
    index_out_of_bounds, invalid_bounds, table_shape_mismatch, undeclarable_type,
    uninitialized_element, wrong_index_count, EvalResult,
};

/// Inclusive bounds of one dimension.
#[derive(Copy, Clone, Debug, PartialEq, Eq, Hash)]
pub struct Bounds {
    pub lower: i64,
    pub upper: i64,
}

impl Bounds {
    pub const fn new(lower: i64, upper: i64) -> Self {
        Bounds { lower, upper }
    }

    #[inline]
    pub const fn contains(self, index: i64) -> bool {
        self.lower <= index && index <= self.upper
    }
}

impl fmt::Display for Bounds {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}:{}", self.lower, self.upper)
    }
}

/// Table of one element type with one or more bounded dimensions.
#[derive(Clone, Debug)]
pub struct Table {
    name: String,
    elem: TypeTag,
    bounds: Vec<Bounds>,
    cells: FxHashMap<Box<[i64]>, Value>,
}

/// Equality ignores the diagnostic name.
impl PartialEq for Table {
    fn eq(&self, other: &Self) -> bool {
        self.elem == other.elem && self.bounds == other.bounds && self.cells == other.cells
    }
}

impl Table {
    /// Create an empty table. `name` is used in diagnostics only.
    ///
    /// Fails if the element type is not declarable, if there are no
    /// dimensions, or if any dimension has `lower > upper`.
    pub fn new(name: &str, elem: TypeTag, bounds: Vec<Bounds>) -> EvalResult<Table> {
        if !elem.is_declarable() {
            return Err(undeclarable_type(name, &format!("{elem}таб")));
        }
        if bounds.is_empty() {
            return Err(invalid_bounds(name, 0, -1));
        }
        if let Some(bad) = bounds.iter().find(|b| b.lower > b.upper) {
            return Err(invalid_bounds(name, bad.lower, bad.upper));
        }
        Ok(Table {
            name: name.to_string(),
            elem,
            bounds,
            cells: FxHashMap::default(),
        })
    }

    #[inline]
    pub fn elem_type(&self) -> TypeTag {
        self.elem
    }

    #[inline]
    pub fn bounds(&self) -> &[Bounds] {
        &self.bounds
    }

    #[inline]
    pub fn dimensions(&self) -> usize {
        self.bounds.len()
    }

    /// Number of written cells.
    #[inline]
    pub fn written(&self) -> usize {
        self.cells.len()
    }

    /// Rename for diagnostics, e.g. when bound to a parameter.
    pub fn renamed(mut self, name: &str) -> Table {
        self.name = name.to_string();
        self
    }

    /// Read a cell; fails when the index is malformed or the cell is unset.
    pub fn get(&self, indices: &[i64]) -> EvalResult<&Value> {
        self.check_indices(indices)?;
        self.cells
            .get(indices)
            .ok_or_else(|| uninitialized_element(&self.name, indices))
    }

    pub fn is_set(&self, indices: &[i64]) -> bool {
        self.cells.contains_key(indices)
    }

    /// Write a cell, coercing `value` to the element type.
    pub fn set(&mut self, indices: &[i64], value: Value) -> EvalResult<()> {
        self.check_indices(indices)?;
        let value = coerce(value, self.elem)?;
        self.cells.insert(indices.into(), value);
        Ok(())
    }

    pub fn same_bounds(&self, other: &Table) -> bool {
        self.bounds == other.bounds
    }

    /// Convert to a table of `elem`, widening `цел` cells to `вещ` when asked.
    ///
    /// Any other element type change is a type error.
    pub fn converted(self, elem: TypeTag) -> EvalResult<Table> {
        if self.elem == elem {
            return Ok(self);
        }
        if self.elem != TypeTag::Int || elem != TypeTag::Real {
            return Err(crate::type_mismatch(
                &format!("{elem}таб"),
                &format!("{}таб", self.elem),
            ));
        }
        let cells: FxHashMap<Box<[i64]>, Value> = self
            .cells
            .into_iter()
            .map(|(key, value)| coerce(value, elem).map(|value| (key, value)))
            .collect::<EvalResult<_>>()?;
        Ok(Table {
            name: self.name,
            elem,
            bounds: self.bounds,
            cells,
        })
    }

    /// Check that `other` can replace this table's contents wholesale.
    pub fn check_replaceable_by(&self, other: &Table) -> EvalResult<()> {
        if !self.same_bounds(other) {
            return Err(table_shape_mismatch(&self.describe(), &other.describe()));
        }
        Ok(())
    }

    /// Short description for diagnostics: `цел таб[1:3, 0:5]`.
    pub fn describe(&self) -> String {
        let dims = self
            .bounds
            .iter()
            .map(ToString::to_string)
            .collect::<Vec<_>>()
            .join(", ");
        format!("{} таб[{dims}]", self.elem)
    }

    fn check_indices(&self, indices: &[i64]) -> EvalResult<()> {
        if indices.len() != self.bounds.len() {
            return Err(wrong_index_count(
                &self.name,
                self.bounds.len(),
                indices.len(),
            ));
        }
        for (&index, bounds) in indices.iter().zip(&self.bounds) {
            if !bounds.contains(index) {
                return Err(index_out_of_bounds(
                    &self.name,
                    index,
                    bounds.lower,
                    bounds.upper,
                ));
            }
        }
        Ok(())
    }
}
