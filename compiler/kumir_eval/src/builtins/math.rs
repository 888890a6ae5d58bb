//! Numeric builtins and the `МАКСЦЕЛ`/`МАКСВЕЩ` constants.

use kumir_ir::TypeTag::{Int, Real};
use kumir_value::{
    check_int_range, domain_error, integer_overflow, EvalResult, Value, MAX_INT, MAX_REAL,
};

use super::{int_arg, real_arg, BuiltinContext, BuiltinFunction};
use crate::operators::{floor_div, floor_mod};

pub(super) const FUNCTIONS: &[BuiltinFunction] = &[
    BuiltinFunction::new("sqrt", &[Real], Real, sqrt),
    BuiltinFunction::new("abs", &[Real], Real, abs),
    BuiltinFunction::new("iabs", &[Int], Int, iabs),
    BuiltinFunction::new("sign", &[Real], Int, sign),
    BuiltinFunction::new("int", &[Real], Int, int),
    BuiltinFunction::new("sin", &[Real], Real, sin),
    BuiltinFunction::new("cos", &[Real], Real, cos),
    BuiltinFunction::new("tg", &[Real], Real, tg),
    BuiltinFunction::new("ctg", &[Real], Real, ctg),
    BuiltinFunction::new("arcsin", &[Real], Real, arcsin),
    BuiltinFunction::new("arccos", &[Real], Real, arccos),
    BuiltinFunction::new("arctg", &[Real], Real, arctg),
    BuiltinFunction::new("arcctg", &[Real], Real, arcctg),
    BuiltinFunction::new("ln", &[Real], Real, ln),
    BuiltinFunction::new("lg", &[Real], Real, lg),
    BuiltinFunction::new("exp", &[Real], Real, exp),
    BuiltinFunction::new("min", &[Real, Real], Real, min),
    BuiltinFunction::new("max", &[Real, Real], Real, max),
    BuiltinFunction::new("imin", &[Int, Int], Int, imin),
    BuiltinFunction::new("imax", &[Int, Int], Int, imax),
    BuiltinFunction::new("div", &[Int, Int], Int, div),
    BuiltinFunction::new("mod", &[Int, Int], Int, modulo),
    BuiltinFunction::new("МАКСЦЕЛ", &[], Int, max_int),
    BuiltinFunction::new("МАКСВЕЩ", &[], Real, max_real),
];

/// Wrap a real result, rejecting NaN and infinities.
fn finite(function: &str, value: f64) -> EvalResult {
    if value.is_finite() {
        Ok(Value::Real(value))
    } else {
        Err(domain_error(function, "result is out of range"))
    }
}

fn sqrt(_: &mut BuiltinContext<'_>, args: &[Value]) -> EvalResult {
    let x = real_arg(args, 0)?;
    if x < 0.0 {
        return Err(domain_error("sqrt", "argument is negative"));
    }
    Ok(Value::Real(x.sqrt()))
}

fn abs(_: &mut BuiltinContext<'_>, args: &[Value]) -> EvalResult {
    Ok(Value::Real(real_arg(args, 0)?.abs()))
}

fn iabs(_: &mut BuiltinContext<'_>, args: &[Value]) -> EvalResult {
    int_arg(args, 0)?
        .checked_abs()
        .map(Value::Int)
        .ok_or_else(|| integer_overflow("iabs"))
}

fn sign(_: &mut BuiltinContext<'_>, args: &[Value]) -> EvalResult {
    let x = real_arg(args, 0)?;
    Ok(Value::Int(if x > 0.0 {
        1
    } else if x < 0.0 {
        -1
    } else {
        0
    }))
}

/// Largest integer not greater than the argument.
#[expect(
    clippy::cast_possible_truncation,
    reason = "the floored value is range-checked against MAX_INT first"
)]
fn int(_: &mut BuiltinContext<'_>, args: &[Value]) -> EvalResult {
    let x = real_arg(args, 0)?.floor();
    #[expect(clippy::cast_precision_loss, reason = "MAX_INT is exact in f64")]
    let limit = MAX_INT as f64;
    if !(-limit..=limit).contains(&x) {
        return Err(domain_error("int", format!("{x} is outside the цел range")));
    }
    check_int_range(x as i64).map(Value::Int)
}

fn sin(_: &mut BuiltinContext<'_>, args: &[Value]) -> EvalResult {
    Ok(Value::Real(real_arg(args, 0)?.sin()))
}

fn cos(_: &mut BuiltinContext<'_>, args: &[Value]) -> EvalResult {
    Ok(Value::Real(real_arg(args, 0)?.cos()))
}

fn tg(_: &mut BuiltinContext<'_>, args: &[Value]) -> EvalResult {
    let x = real_arg(args, 0)?;
    if x.cos().abs() < f64::EPSILON {
        return Err(domain_error("tg", "cosine of the argument is zero"));
    }
    finite("tg", x.tan())
}

fn ctg(_: &mut BuiltinContext<'_>, args: &[Value]) -> EvalResult {
    let x = real_arg(args, 0)?;
    if x.sin().abs() < f64::EPSILON {
        return Err(domain_error("ctg", "sine of the argument is zero"));
    }
    finite("ctg", x.cos() / x.sin())
}

fn arcsin(_: &mut BuiltinContext<'_>, args: &[Value]) -> EvalResult {
    let x = real_arg(args, 0)?;
    if !(-1.0..=1.0).contains(&x) {
        return Err(domain_error("arcsin", "argument is outside [-1, 1]"));
    }
    Ok(Value::Real(x.asin()))
}

fn arccos(_: &mut BuiltinContext<'_>, args: &[Value]) -> EvalResult {
    let x = real_arg(args, 0)?;
    if !(-1.0..=1.0).contains(&x) {
        return Err(domain_error("arccos", "argument is outside [-1, 1]"));
    }
    Ok(Value::Real(x.acos()))
}

fn arctg(_: &mut BuiltinContext<'_>, args: &[Value]) -> EvalResult {
    Ok(Value::Real(real_arg(args, 0)?.atan()))
}

fn arcctg(_: &mut BuiltinContext<'_>, args: &[Value]) -> EvalResult {
    let x = real_arg(args, 0)?;
    Ok(Value::Real(std::f64::consts::FRAC_PI_2 - x.atan()))
}

fn ln(_: &mut BuiltinContext<'_>, args: &[Value]) -> EvalResult {
    let x = real_arg(args, 0)?;
    if x <= 0.0 {
        return Err(domain_error("ln", "argument is not positive"));
    }
    Ok(Value::Real(x.ln()))
}

fn lg(_: &mut BuiltinContext<'_>, args: &[Value]) -> EvalResult {
    let x = real_arg(args, 0)?;
    if x <= 0.0 {
        return Err(domain_error("lg", "argument is not positive"));
    }
    Ok(Value::Real(x.log10()))
}

fn exp(_: &mut BuiltinContext<'_>, args: &[Value]) -> EvalResult {
    finite("exp", real_arg(args, 0)?.exp())
}

fn min(_: &mut BuiltinContext<'_>, args: &[Value]) -> EvalResult {
    Ok(Value::Real(real_arg(args, 0)?.min(real_arg(args, 1)?)))
}

fn max(_: &mut BuiltinContext<'_>, args: &[Value]) -> EvalResult {
    Ok(Value::Real(real_arg(args, 0)?.max(real_arg(args, 1)?)))
}

fn imin(_: &mut BuiltinContext<'_>, args: &[Value]) -> EvalResult {
    Ok(Value::Int(int_arg(args, 0)?.min(int_arg(args, 1)?)))
}

fn imax(_: &mut BuiltinContext<'_>, args: &[Value]) -> EvalResult {
    Ok(Value::Int(int_arg(args, 0)?.max(int_arg(args, 1)?)))
}

fn div(_: &mut BuiltinContext<'_>, args: &[Value]) -> EvalResult {
    floor_div(int_arg(args, 0)?, int_arg(args, 1)?).map(Value::Int)
}

fn modulo(_: &mut BuiltinContext<'_>, args: &[Value]) -> EvalResult {
    floor_mod(int_arg(args, 0)?, int_arg(args, 1)?).map(Value::Int)
}

fn max_int(_: &mut BuiltinContext<'_>, _: &[Value]) -> EvalResult {
    Ok(Value::Int(MAX_INT))
}

fn max_real(_: &mut BuiltinContext<'_>, _: &[Value]) -> EvalResult {
    Ok(Value::Real(MAX_REAL))
}
