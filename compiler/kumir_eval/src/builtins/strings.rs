//! Text builtins. Positions are 1-based and count characters, not bytes.

use kumir_ir::ParamMode::{In, InOut};
use kumir_ir::TypeTag::{Bool, Char, Int, Str};
use kumir_value::{domain_error, EvalResult, Value};

use super::{
    bool_arg, char_arg, int_arg, str_arg, BuiltinContext, BuiltinFunction, BuiltinProcedure,
};

pub(super) const FUNCTIONS: &[BuiltinFunction] = &[
    BuiltinFunction::new("длин", &[Str], Int, length),
    BuiltinFunction::new("код", &[Char], Int, code),
    BuiltinFunction::new("символ", &[Int], Char, symbol),
    BuiltinFunction::new("юникод", &[Char], Int, unicode),
    BuiltinFunction::new("юнисимвол", &[Int], Char, unisymbol),
    BuiltinFunction::new("верхний регистр", &[Str], Str, upper),
    BuiltinFunction::new("нижний регистр", &[Str], Str, lower),
    BuiltinFunction::new("поз", &[Str, Str], Int, position),
    BuiltinFunction::new("позиция", &[Str, Str], Int, position),
    BuiltinFunction::new("поз после", &[Int, Str, Str], Int, position_after),
];

pub(super) const PROCEDURES: &[BuiltinProcedure] = &[
    BuiltinProcedure::new("вставить", &[(Str, In), (Str, InOut), (Int, In)], insert),
    BuiltinProcedure::new("удалить", &[(Str, InOut), (Int, In), (Int, In)], delete),
    BuiltinProcedure::new(
        "заменить",
        &[(Str, InOut), (Str, In), (Str, In), (Bool, In)],
        replace,
    ),
];

/// Windows-1251 code of a character, for the letters Kumir programs use.
pub(crate) fn cp1251_encode(c: char) -> Option<u8> {
    match c {
        '\0'..='\x7f' => u8::try_from(u32::from(c)).ok(),
        'А'..='я' => u8::try_from(u32::from(c) - 0x0410 + 0xC0).ok(),
        'Ё' => Some(0xA8),
        'ё' => Some(0xB8),
        _ => None,
    }
}

pub(crate) fn cp1251_decode(code: u8) -> Option<char> {
    match code {
        0x00..=0x7F => Some(char::from(code)),
        0xC0..=0xFF => char::from_u32(u32::from(code) - 0xC0 + 0x0410),
        0xA8 => Some('Ё'),
        0xB8 => Some('ё'),
        _ => None,
    }
}

#[expect(
    clippy::cast_possible_wrap,
    reason = "string lengths are far below i64::MAX"
)]
fn char_count(text: &str) -> i64 {
    text.chars().count() as i64
}

/// Byte offset of the 1-based character position `start`, which may be
/// one past the end.
fn byte_offset(text: &str, start: i64) -> Option<usize> {
    let skip = usize::try_from(start.checked_sub(1)?).ok()?;
    if skip == 0 {
        return Some(0);
    }
    text.char_indices()
        .map(|(offset, _)| offset)
        .chain(std::iter::once(text.len()))
        .nth(skip)
}

/// 1-based character position of byte `offset`.
fn char_position(text: &str, offset: usize) -> i64 {
    char_count(&text[..offset]) + 1
}

fn length(_: &mut BuiltinContext<'_>, args: &[Value]) -> EvalResult {
    Ok(Value::Int(char_count(str_arg(args, 0)?)))
}

fn code(_: &mut BuiltinContext<'_>, args: &[Value]) -> EvalResult {
    let c = char_arg(args, 0)?;
    cp1251_encode(c)
        .map(|code| Value::Int(i64::from(code)))
        .ok_or_else(|| domain_error("код", format!("'{c}' has no Windows-1251 code")))
}

fn symbol(_: &mut BuiltinContext<'_>, args: &[Value]) -> EvalResult {
    let n = int_arg(args, 0)?;
    u8::try_from(n)
        .ok()
        .and_then(cp1251_decode)
        .map(Value::Char)
        .ok_or_else(|| domain_error("символ", format!("{n} is not a Windows-1251 letter code")))
}

fn unicode(_: &mut BuiltinContext<'_>, args: &[Value]) -> EvalResult {
    Ok(Value::Int(i64::from(u32::from(char_arg(args, 0)?))))
}

fn unisymbol(_: &mut BuiltinContext<'_>, args: &[Value]) -> EvalResult {
    let n = int_arg(args, 0)?;
    u32::try_from(n)
        .ok()
        .and_then(char::from_u32)
        .map(Value::Char)
        .ok_or_else(|| domain_error("юнисимвол", format!("{n} is not a Unicode scalar value")))
}

fn upper(_: &mut BuiltinContext<'_>, args: &[Value]) -> EvalResult {
    Ok(Value::Str(str_arg(args, 0)?.to_uppercase()))
}

fn lower(_: &mut BuiltinContext<'_>, args: &[Value]) -> EvalResult {
    Ok(Value::Str(str_arg(args, 0)?.to_lowercase()))
}

/// `поз(фрагмент, s)`: first occurrence, or 0.
fn position(_: &mut BuiltinContext<'_>, args: &[Value]) -> EvalResult {
    let (fragment, text) = (str_arg(args, 0)?, str_arg(args, 1)?);
    Ok(Value::Int(
        text.find(fragment)
            .map_or(0, |offset| char_position(text, offset)),
    ))
}

/// `поз после(начало, фрагмент, s)`: first occurrence at or after `начало`.
fn position_after(_: &mut BuiltinContext<'_>, args: &[Value]) -> EvalResult {
    let start = int_arg(args, 0)?;
    let (fragment, text) = (str_arg(args, 1)?, str_arg(args, 2)?);
    let from = byte_offset(text, start).ok_or_else(|| {
        domain_error("поз после", format!("start {start} is outside the string"))
    })?;
    Ok(Value::Int(
        text[from..]
            .find(fragment)
            .map_or(0, |offset| char_position(text, from + offset)),
    ))
}

/// `вставить(фрагмент, аргрез s, начало)`
fn insert(_: &mut BuiltinContext<'_>, args: &mut [Value]) -> EvalResult<()> {
    let fragment = str_arg(args, 0)?.to_string();
    let start = int_arg(args, 2)?;
    let text = str_arg(args, 1)?;
    let at = byte_offset(text, start)
        .ok_or_else(|| domain_error("вставить", format!("start {start} is outside the string")))?;
    let mut result = String::with_capacity(text.len() + fragment.len());
    result.push_str(&text[..at]);
    result.push_str(&fragment);
    result.push_str(&text[at..]);
    args[1] = Value::Str(result);
    Ok(())
}

/// `удалить(аргрез s, начало, количество)`; deleting past the end stops
/// at the end.
fn delete(_: &mut BuiltinContext<'_>, args: &mut [Value]) -> EvalResult<()> {
    let (start, count) = (int_arg(args, 1)?, int_arg(args, 2)?);
    if count < 0 {
        return Err(domain_error("удалить", format!("count {count} is negative")));
    }
    let text = str_arg(args, 0)?;
    let from = byte_offset(text, start)
        .ok_or_else(|| domain_error("удалить", format!("start {start} is outside the string")))?;
    let to = byte_offset(text, start.saturating_add(count)).unwrap_or(text.len());
    let result = format!("{}{}", &text[..from], &text[to..]);
    args[0] = Value::Str(result);
    Ok(())
}

/// `заменить(аргрез s, старый, новый, каждый)`: every occurrence or the first.
fn replace(_: &mut BuiltinContext<'_>, args: &mut [Value]) -> EvalResult<()> {
    let (old, new) = (str_arg(args, 1)?, str_arg(args, 2)?);
    let every = bool_arg(args, 3)?;
    let text = str_arg(args, 0)?;
    let result = if old.is_empty() {
        text.to_string()
    } else if every {
        text.replace(old, new)
    } else {
        text.replacen(old, new, 1)
    };
    args[0] = Value::Str(result);
    Ok(())
}
