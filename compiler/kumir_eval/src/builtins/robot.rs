//! Bridge from builtin names to the attached [`Actuator`](crate::Actuator).

use kumir_ir::TypeTag::{Bool, Int, Real};
use kumir_value::{EvalResult, Value};

use super::{BuiltinContext, BuiltinFunction, BuiltinProcedure};
use crate::Direction;

pub(super) const FUNCTIONS: &[BuiltinFunction] = &[
    BuiltinFunction::new("слева стена", &[], Bool, wall_left),
    BuiltinFunction::new("справа стена", &[], Bool, wall_right),
    BuiltinFunction::new("сверху стена", &[], Bool, wall_up),
    BuiltinFunction::new("снизу стена", &[], Bool, wall_down),
    BuiltinFunction::new("слева свободно", &[], Bool, free_left),
    BuiltinFunction::new("справа свободно", &[], Bool, free_right),
    BuiltinFunction::new("сверху свободно", &[], Bool, free_up),
    BuiltinFunction::new("снизу свободно", &[], Bool, free_down),
    BuiltinFunction::new("клетка закрашена", &[], Bool, cell_painted),
    BuiltinFunction::new("клетка чистая", &[], Bool, cell_clean),
    BuiltinFunction::new("есть маркер", &[], Bool, marker_present),
    BuiltinFunction::new("радиация", &[], Real, radiation),
    BuiltinFunction::new("температура", &[], Int, temperature),
];

pub(super) const PROCEDURES: &[BuiltinProcedure] = &[
    BuiltinProcedure::new("влево", &[], left),
    BuiltinProcedure::new("вправо", &[], right),
    BuiltinProcedure::new("вверх", &[], up),
    BuiltinProcedure::new("вниз", &[], down),
    BuiltinProcedure::new("закрасить", &[], paint),
    BuiltinProcedure::new("положить маркер", &[], place_marker),
    BuiltinProcedure::new("поднять маркер", &[], remove_marker),
];

fn step(ctx: &mut BuiltinContext<'_>, direction: Direction) -> EvalResult<()> {
    tracing::trace!(%direction, "robot step");
    Ok(ctx.actuator.step(direction)?)
}

fn left(ctx: &mut BuiltinContext<'_>, _: &mut [Value]) -> EvalResult<()> {
    step(ctx, Direction::Left)
}

fn right(ctx: &mut BuiltinContext<'_>, _: &mut [Value]) -> EvalResult<()> {
    step(ctx, Direction::Right)
}

fn up(ctx: &mut BuiltinContext<'_>, _: &mut [Value]) -> EvalResult<()> {
    step(ctx, Direction::Up)
}

fn down(ctx: &mut BuiltinContext<'_>, _: &mut [Value]) -> EvalResult<()> {
    step(ctx, Direction::Down)
}

fn paint(ctx: &mut BuiltinContext<'_>, _: &mut [Value]) -> EvalResult<()> {
    Ok(ctx.actuator.paint()?)
}

fn place_marker(ctx: &mut BuiltinContext<'_>, _: &mut [Value]) -> EvalResult<()> {
    Ok(ctx.actuator.place_marker()?)
}

fn remove_marker(ctx: &mut BuiltinContext<'_>, _: &mut [Value]) -> EvalResult<()> {
    Ok(ctx.actuator.remove_marker()?)
}

fn wall(ctx: &mut BuiltinContext<'_>, direction: Direction) -> EvalResult {
    Ok(Value::Bool(ctx.actuator.wall(direction)?))
}

fn free(ctx: &mut BuiltinContext<'_>, direction: Direction) -> EvalResult {
    Ok(Value::Bool(ctx.actuator.free(direction)?))
}

fn wall_left(ctx: &mut BuiltinContext<'_>, _: &[Value]) -> EvalResult {
    wall(ctx, Direction::Left)
}

fn wall_right(ctx: &mut BuiltinContext<'_>, _: &[Value]) -> EvalResult {
    wall(ctx, Direction::Right)
}

fn wall_up(ctx: &mut BuiltinContext<'_>, _: &[Value]) -> EvalResult {
    wall(ctx, Direction::Up)
}

fn wall_down(ctx: &mut BuiltinContext<'_>, _: &[Value]) -> EvalResult {
    wall(ctx, Direction::Down)
}

fn free_left(ctx: &mut BuiltinContext<'_>, _: &[Value]) -> EvalResult {
    free(ctx, Direction::Left)
}

fn free_right(ctx: &mut BuiltinContext<'_>, _: &[Value]) -> EvalResult {
    free(ctx, Direction::Right)
}

fn free_up(ctx: &mut BuiltinContext<'_>, _: &[Value]) -> EvalResult {
    free(ctx, Direction::Up)
}

fn free_down(ctx: &mut BuiltinContext<'_>, _: &[Value]) -> EvalResult {
    free(ctx, Direction::Down)
}

fn cell_painted(ctx: &mut BuiltinContext<'_>, _: &[Value]) -> EvalResult {
    Ok(Value::Bool(ctx.actuator.cell_painted()?))
}

fn cell_clean(ctx: &mut BuiltinContext<'_>, _: &[Value]) -> EvalResult {
    Ok(Value::Bool(!ctx.actuator.cell_painted()?))
}

fn marker_present(ctx: &mut BuiltinContext<'_>, _: &[Value]) -> EvalResult {
    Ok(Value::Bool(ctx.actuator.marker_present()?))
}

fn radiation(ctx: &mut BuiltinContext<'_>, _: &[Value]) -> EvalResult {
    Ok(Value::Real(ctx.actuator.radiation()?))
}

fn temperature(ctx: &mut BuiltinContext<'_>, _: &[Value]) -> EvalResult {
    Ok(Value::Int(ctx.actuator.temperature()?))
}
