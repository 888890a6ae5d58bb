//! Variable storage for the interpreter.
//!
//! A stack of frames: index 0 is the permanent global frame, and every
//! active algorithm call owns exactly one frame above it. Frames keep
//! declaration order; names are already case-normalized by `Name`.
//!
//! Lookup scans the frames top-down and the first hit wins, so locals
//! shadow globals. There is no block scoping inside `если` or loops.

use std::sync::Arc;

use rustc_hash::FxHashMap;

use kumir_ir::{Name, Span, TypeTag};
use kumir_value::{
    coerce, duplicate_variable, index_out_of_bounds, not_indexable, type_mismatch,
    undeclarable_type, undefined_variable, uninitialized_variable, wrong_index_count, Bounds,
    EvalResult, Table, Value,
};

/// A declared variable or table.
#[derive(Clone, Debug)]
pub struct Variable {
    name: Name,
    ty: TypeTag,
    is_table: bool,
    /// `None` until the first write. Tables always hold their handle.
    value: Option<Value>,
    /// Declaration site; re-running the same declaration re-initializes.
    site: Span,
}

impl Variable {
    #[inline]
    pub fn name(&self) -> &Name {
        &self.name
    }

    /// Declared type; the element type for tables.
    #[inline]
    pub fn ty(&self) -> TypeTag {
        self.ty
    }

    #[inline]
    pub fn is_table(&self) -> bool {
        self.is_table
    }

    #[inline]
    pub fn is_initialized(&self) -> bool {
        self.value.is_some()
    }

    #[inline]
    pub fn value(&self) -> Option<&Value> {
        self.value.as_ref()
    }

    /// The table handle, for table variables.
    pub fn table(&self) -> Option<&Table> {
        match &self.value {
            Some(Value::Table(table)) => Some(table),
            _ => None,
        }
    }

    /// Type as written in a declaration: `цел` or `целтаб`.
    pub fn type_name(&self) -> String {
        type_label(self.ty, self.is_table)
    }
}

/// Stable handle to a variable: frame index plus slot within the frame.
///
/// Handles into a caller's frame stay valid while a callee runs, because
/// frames are strictly LIFO and slots are never removed from a live frame.
#[derive(Copy, Clone, Debug, PartialEq, Eq, Hash)]
pub struct VarRef {
    frame: usize,
    slot: usize,
}

impl VarRef {
    #[inline]
    pub fn frame(self) -> usize {
        self.frame
    }
}

#[derive(Clone, Debug, Default)]
struct Frame {
    vars: Vec<Variable>,
    index: FxHashMap<Name, usize>,
}

/// Frame stack of the running program.
#[derive(Clone, Debug)]
pub struct Environment {
    frames: Vec<Frame>,
}

impl Environment {
    /// Create an environment holding only the global frame.
    pub fn new() -> Self {
        Environment {
            frames: vec![Frame::default()],
        }
    }

    /// Number of frames, the global frame included.
    #[inline]
    pub fn depth(&self) -> usize {
        self.frames.len()
    }

    #[inline]
    pub fn push_frame(&mut self) {
        self.frames.push(Frame::default());
    }

    /// Pop the current frame, releasing its variables.
    ///
    /// The global frame is never popped.
    #[inline]
    pub fn pop_frame(&mut self) {
        if self.frames.len() > 1 {
            self.frames.pop();
        }
    }

    /// Declare a scalar in the current frame.
    pub fn declare_scalar(
        &mut self,
        name: &Name,
        ty: TypeTag,
        initial: Option<Value>,
    ) -> EvalResult<VarRef> {
        self.declare_scalar_at(name, ty, initial, Span::DUMMY)
    }

    /// Declare a scalar, remembering its declaration site.
    ///
    /// Running the same declaration again (a declaration inside a loop
    /// body) re-initializes the variable instead of failing.
    pub fn declare_scalar_at(
        &mut self,
        name: &Name,
        ty: TypeTag,
        initial: Option<Value>,
        site: Span,
    ) -> EvalResult<VarRef> {
        if !ty.is_declarable() {
            return Err(undeclarable_type(name.as_str(), ty.keyword()));
        }
        let value = match initial {
            Some(Value::Table(_)) => return Err(type_mismatch(ty.keyword(), "таблица")),
            Some(value) => Some(coerce(value, ty)?),
            None => None,
        };
        self.insert(Variable {
            name: name.clone(),
            ty,
            is_table: false,
            value,
            site,
        })
    }

    /// Declare an empty table with the given bounds in the current frame.
    pub fn declare_table(
        &mut self,
        name: &Name,
        ty: TypeTag,
        bounds: Vec<Bounds>,
    ) -> EvalResult<VarRef> {
        self.declare_table_at(name, ty, bounds, Span::DUMMY)
    }

    pub fn declare_table_at(
        &mut self,
        name: &Name,
        ty: TypeTag,
        bounds: Vec<Bounds>,
        site: Span,
    ) -> EvalResult<VarRef> {
        let table = Table::new(name.as_str(), ty, bounds)?;
        self.insert(Variable {
            name: name.clone(),
            ty,
            is_table: true,
            value: Some(Value::table(table)),
            site,
        })
    }

    /// Declare a table holding a copy of `table`, converted to `ty` cells.
    pub fn declare_table_value(
        &mut self,
        name: &Name,
        ty: TypeTag,
        table: Table,
    ) -> EvalResult<VarRef> {
        let table = table.converted(ty)?.renamed(name.as_str());
        self.insert(Variable {
            name: name.clone(),
            ty,
            is_table: true,
            value: Some(Value::table(table)),
            site: Span::DUMMY,
        })
    }

    fn insert(&mut self, var: Variable) -> EvalResult<VarRef> {
        let frame_index = self.frames.len() - 1;
        let frame = &mut self.frames[frame_index];
        if let Some(&slot) = frame.index.get(&var.name) {
            let existing = &mut frame.vars[slot];
            if var.site.is_dummy() || existing.site != var.site {
                return Err(duplicate_variable(var.name.as_str()));
            }
            *existing = var;
            return Ok(VarRef {
                frame: frame_index,
                slot,
            });
        }
        let slot = frame.vars.len();
        frame.index.insert(var.name.clone(), slot);
        frame.vars.push(var);
        Ok(VarRef {
            frame: frame_index,
            slot,
        })
    }

    /// Resolve `name`, scanning from the topmost frame down.
    pub fn lookup(&self, name: &Name) -> Option<VarRef> {
        self.frames
            .iter()
            .enumerate()
            .rev()
            .find_map(|(frame, f)| f.index.get(name).map(|&slot| VarRef { frame, slot }))
    }

    /// Like [`lookup`](Self::lookup), failing with a NameError.
    pub fn find(&self, name: &Name) -> EvalResult<VarRef> {
        self.lookup(name)
            .ok_or_else(|| undefined_variable(name.as_str()))
    }

    /// The record behind a handle.
    ///
    /// # Panics
    ///
    /// Handles are only produced by this environment and never outlive
    /// their frame; a stale handle is a bug in the caller.
    #[inline]
    pub fn variable(&self, at: VarRef) -> &Variable {
        &self.frames[at.frame].vars[at.slot]
    }

    #[inline]
    fn variable_mut(&mut self, at: VarRef) -> &mut Variable {
        &mut self.frames[at.frame].vars[at.slot]
    }

    /// Current value; reading an uninitialized scalar is an error.
    pub fn read(&self, at: VarRef) -> EvalResult {
        let var = self.variable(at);
        var.value
            .clone()
            .ok_or_else(|| uninitialized_variable(var.name.as_str()))
    }

    /// Resolve `name` and store `value` into it.
    pub fn assign(&mut self, name: &Name, value: Value) -> EvalResult<()> {
        let at = self.find(name)?;
        self.assign_at(at, value)
    }

    /// Store `value`, coercing it to the declared type.
    ///
    /// A table variable accepts only a whole table with the same bounds
    /// whose element type converts to its own.
    pub fn assign_at(&mut self, at: VarRef, value: Value) -> EvalResult<()> {
        let var = self.variable_mut(at);
        if var.is_table {
            let Value::Table(source) = value else {
                return Err(type_mismatch(&var.type_name(), &value.type_name()));
            };
            let source = Arc::unwrap_or_clone(source)
                .converted(var.ty)?
                .renamed(var.name.as_str());
            if let Some(Value::Table(current)) = &var.value {
                current.check_replaceable_by(&source)?;
            }
            var.value = Some(Value::table(source));
            return Ok(());
        }
        if value.is_table() {
            return Err(type_mismatch(var.ty.keyword(), &value.type_name()));
        }
        var.value = Some(coerce(value, var.ty)?);
        Ok(())
    }

    /// Read `name[indices]`.
    ///
    /// Tables delegate bound and initialization checks to [`Table::get`];
    /// a `лит` variable with one index yields its 1-based character.
    pub fn read_element(&self, at: VarRef, indices: &[i64]) -> EvalResult {
        let var = self.variable(at);
        match &var.value {
            Some(Value::Table(table)) => table.get(indices).cloned(),
            Some(Value::Str(text)) => {
                let index = single_index(&var.name, indices)?;
                char_at(&var.name, text, index).map(Value::Char)
            }
            None if var.ty == TypeTag::Str && !var.is_table => {
                Err(uninitialized_variable(var.name.as_str()))
            }
            _ => Err(not_indexable(var.name.as_str(), &var.type_name())),
        }
    }

    /// Write `name[indices] := value`.
    pub fn write_element(&mut self, at: VarRef, indices: &[i64], value: Value) -> EvalResult<()> {
        let var = self.variable_mut(at);
        match &mut var.value {
            Some(Value::Table(table)) => Arc::make_mut(table).set(indices, value),
            Some(Value::Str(text)) => {
                let c = match coerce(value, TypeTag::Char)? {
                    Value::Char(c) => c,
                    other => return Err(type_mismatch("сим", &other.type_name())),
                };
                let index = single_index(&var.name, indices)?;
                char_at(&var.name, text, index)?;
                *text = text
                    .chars()
                    .zip(1_i64..)
                    .map(|(old, position)| if position == index { c } else { old })
                    .collect();
                Ok(())
            }
            None if var.ty == TypeTag::Str && !var.is_table => {
                Err(uninitialized_variable(var.name.as_str()))
            }
            _ => Err(not_indexable(
                var.name.as_str(),
                &type_label(var.ty, var.is_table),
            )),
        }
    }
}

impl Default for Environment {
    fn default() -> Self {
        Self::new()
    }
}

fn type_label(ty: TypeTag, is_table: bool) -> String {
    if is_table {
        format!("{ty}таб")
    } else {
        ty.to_string()
    }
}

fn single_index(name: &Name, indices: &[i64]) -> EvalResult<i64> {
    match indices {
        [index] => Ok(*index),
        _ => Err(wrong_index_count(name.as_str(), 1, indices.len())),
    }
}

/// The character at 1-based `index`.
#[expect(
    clippy::cast_possible_wrap,
    reason = "string lengths are far below i64::MAX"
)]
pub(crate) fn char_at(name: &Name, text: &str, index: i64) -> EvalResult<char> {
    usize::try_from(index)
        .ok()
        .and_then(|i| i.checked_sub(1))
        .and_then(|i| text.chars().nth(i))
        .ok_or_else(|| index_out_of_bounds(name.as_str(), index, 1, text.chars().count() as i64))
}

#[cfg(test)]
mod tests;
