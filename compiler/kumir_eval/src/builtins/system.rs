//! Session clock and waiting.

use std::time::Duration;

use kumir_ir::ParamMode::In;
use kumir_ir::TypeTag::Int;
use kumir_value::{cancelled, domain_error, EvalResult, Value};

use super::{int_arg, BuiltinContext, BuiltinFunction, BuiltinProcedure};

pub(super) const FUNCTIONS: &[BuiltinFunction] = &[BuiltinFunction::new("время", &[], Int, time)];

pub(super) const PROCEDURES: &[BuiltinProcedure] =
    &[BuiltinProcedure::new("ждать", &[(Int, In)], wait)];

/// Polling interval while waiting, so cancellation is noticed promptly.
const WAIT_SLICE: Duration = Duration::from_millis(10);

/// Milliseconds since the session started.
fn time(ctx: &mut BuiltinContext<'_>, _: &[Value]) -> EvalResult {
    let elapsed = ctx.started.elapsed().as_millis();
    Ok(Value::Int(i64::try_from(elapsed).unwrap_or(i64::MAX)))
}

fn wait(ctx: &mut BuiltinContext<'_>, args: &mut [Value]) -> EvalResult<()> {
    let ms = int_arg(args, 0)?;
    let Ok(ms) = u64::try_from(ms) else {
        return Err(domain_error("ждать", format!("{ms} ms is negative")));
    };
    let mut remaining = Duration::from_millis(ms);
    while !remaining.is_zero() {
        if ctx.cancel.is_cancelled() {
            return Err(cancelled());
        }
        let slice = remaining.min(WAIT_SLICE);
        std::thread::sleep(slice);
        remaining -= slice;
    }
    Ok(())
}
