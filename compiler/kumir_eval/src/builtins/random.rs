//! Random numbers from the session's seeded generator.

use rand::Rng;

use kumir_ir::TypeTag::{Int, Real};
use kumir_value::{domain_error, EvalResult, Value};

use super::{int_arg, real_arg, BuiltinContext, BuiltinFunction};

pub(super) const FUNCTIONS: &[BuiltinFunction] = &[
    BuiltinFunction::new("rnd", &[Real], Real, rnd),
    BuiltinFunction::new("rand", &[Real, Real], Real, rand_real),
    BuiltinFunction::new("irnd", &[Int], Int, irnd),
    BuiltinFunction::new("irand", &[Int, Int], Int, irand),
];

/// Uniform `вещ` in `[0, x)`.
fn rnd(ctx: &mut BuiltinContext<'_>, args: &[Value]) -> EvalResult {
    let x = real_arg(args, 0)?;
    if !(x > 0.0 && x.is_finite()) {
        return Err(domain_error("rnd", format!("upper bound {x} is not a positive number")));
    }
    Ok(Value::Real(ctx.rng.gen_range(0.0..x)))
}

/// Uniform `вещ` in `[a, b]`.
///
/// Interpolates between the bounds instead of using `gen_range`, whose
/// scale `b - a` overflows for ranges as wide as `[-МАКСВЕЩ, МАКСВЕЩ]`.
fn rand_real(ctx: &mut BuiltinContext<'_>, args: &[Value]) -> EvalResult {
    let (a, b) = (real_arg(args, 0)?, real_arg(args, 1)?);
    if !(a.is_finite() && b.is_finite()) {
        return Err(domain_error("rand", format!("range [{a}, {b}] is not finite")));
    }
    if a > b {
        return Err(domain_error("rand", format!("range [{a}, {b}] is reversed")));
    }
    let t: f64 = ctx.rng.gen();
    Ok(Value::Real((a * (1.0 - t) + b * t).clamp(a, b)))
}

/// Uniform `цел` in `[1, x]`.
fn irnd(ctx: &mut BuiltinContext<'_>, args: &[Value]) -> EvalResult {
    let x = int_arg(args, 0)?;
    if x < 1 {
        return Err(domain_error("irnd", format!("upper bound {x} is less than 1")));
    }
    Ok(Value::Int(ctx.rng.gen_range(1..=x)))
}

/// Uniform `цел` in `[a, b]`.
fn irand(ctx: &mut BuiltinContext<'_>, args: &[Value]) -> EvalResult {
    let (a, b) = (int_arg(args, 0)?, int_arg(args, 1)?);
    if a > b {
        return Err(domain_error("irand", format!("range [{a}, {b}] is reversed")));
    }
    Ok(Value::Int(ctx.rng.gen_range(a..=b)))
}
