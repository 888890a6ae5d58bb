//! `вывод` and `ввод`.

use kumir_ir::{AssignTarget, OutputItem, TypeTag};
use kumir_value::{coerce, invalid_input, return_outside_function, type_mismatch, EvalResult, Value};

use super::exec::Target;
use super::{ExecResult, Interpreter, Outcome, Place};
use crate::builtins::{parse_bool, parse_int, parse_real};

impl Interpreter<'_> {
    /// Evaluate every item, then emit the whole line with one write.
    pub(crate) fn exec_output(&mut self, items: &[OutputItem]) -> ExecResult {
        let mut text = String::new();
        for item in items {
            match item {
                OutputItem::Newline => text.push('\n'),
                OutputItem::Expr(expr) => {
                    let value = value_or_stop!(self.eval_expr(expr));
                    if value.is_table() {
                        return Err(type_mismatch("скаляр", &value.type_name()).or_span(expr.span));
                    }
                    text.push_str(&value.to_display_string());
                }
            }
        }
        self.io.write_output(&text)?;
        Ok(Outcome::Normal)
    }

    /// One input line per target, parsed by the target's declared type.
    pub(crate) fn exec_input(&mut self, targets: &[AssignTarget]) -> ExecResult {
        for target in targets {
            let target = value_or_stop!(self.resolve_target(target));
            let (name, ty) = self.target_info(&target)?;
            let line = self.io.read_input_line("")?;
            tracing::trace!(%name, %ty, "input");
            let value = parse_input(ty, &line)
                .ok_or_else(|| invalid_input(&name, ty.keyword(), &line))?;
            self.store(&target, value)?;
        }
        Ok(Outcome::Normal)
    }

    /// Name (for messages) and scalar type of an input target.
    fn target_info(&self, target: &Target) -> EvalResult<(String, TypeTag)> {
        match target {
            Target::Place(place) => {
                let at = match place {
                    Place::Var(at) | Place::Element(at, _) => *at,
                };
                let (ty, is_table) = self.place_type(place);
                let name = self.env.variable(at).name().to_string();
                if is_table {
                    return Err(type_mismatch("скаляр", "таблица"));
                }
                Ok((name, ty))
            }
            Target::ReturnSlot => self
                .call_stack
                .current()
                .and_then(|frame| frame.return_slot.as_ref())
                .map(|slot| ("знач".to_owned(), slot.ty))
                .ok_or_else(return_outside_function),
        }
    }
}

/// Parse one input line for a slot of type `ty`. `лит` takes the line as is.
fn parse_input(ty: TypeTag, line: &str) -> Option<Value> {
    match ty {
        TypeTag::Int => parse_int(line).map(Value::Int),
        TypeTag::Real => parse_real(line).map(Value::Real),
        TypeTag::Bool => parse_bool(line).map(Value::Bool),
        TypeTag::Char => {
            let mut chars = line.chars();
            match (chars.next(), chars.next()) {
                (Some(c), None) => Some(Value::Char(c)),
                _ => None,
            }
        }
        TypeTag::Str => Some(Value::string(line)),
        TypeTag::Color => coerce(Value::string(line.trim()), TypeTag::Color).ok(),
        TypeTag::Table | TypeTag::Void | TypeTag::Unknown => None,
    }
}
