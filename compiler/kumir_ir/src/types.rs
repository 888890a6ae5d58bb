//! Declared types.
//!
//! `TypeTag` names the kind of a value; `TypeSpec` adds table-ness for
//! declarations written as a single token (`целтаб`).

use std::fmt;

/// Kind of a value or declared variable.
#[derive(Copy, Clone, Eq, PartialEq, Hash, Debug)]
#[cfg_attr(
    feature = "json",
    derive(serde::Serialize, serde::Deserialize),
    serde(from = "String", into = "String")
)]
pub enum TypeTag {
    Int,
    Real,
    Bool,
    Char,
    Str,
    Table,
    Void,
    Color,
    Unknown,
}

impl TypeTag {
    /// Map a type token to its tag.
    ///
    /// Accepts the Kumir keywords (`цел`, `вещ`, `лог`, `сим`, `лит`,
    /// `цвет`) and their English spellings, case-insensitively. Table
    /// tokens (`целтаб`, `таб`) map to `Table`; anything else is `Unknown`.
    pub fn normalize(token: &str) -> TypeTag {
        let token = token.trim().to_lowercase();
        if let Some(tag) = scalar_tag(&token) {
            return tag;
        }
        if table_element(&token).is_some() || token == "таб" || token == "table" {
            return TypeTag::Table;
        }
        match token.as_str() {
            "" | "void" => TypeTag::Void,
            _ => TypeTag::Unknown,
        }
    }

    /// The Kumir keyword for this tag.
    pub const fn keyword(self) -> &'static str {
        match self {
            TypeTag::Int => "цел",
            TypeTag::Real => "вещ",
            TypeTag::Bool => "лог",
            TypeTag::Char => "сим",
            TypeTag::Str => "лит",
            TypeTag::Table => "таб",
            TypeTag::Void => "void",
            TypeTag::Color => "цвет",
            TypeTag::Unknown => "unknown",
        }
    }

    #[inline]
    pub const fn is_numeric(self) -> bool {
        matches!(self, TypeTag::Int | TypeTag::Real)
    }

    /// Whether a variable may be declared with this tag as its scalar type
    /// or table element type.
    #[inline]
    pub const fn is_declarable(self) -> bool {
        matches!(
            self,
            TypeTag::Int
                | TypeTag::Real
                | TypeTag::Bool
                | TypeTag::Char
                | TypeTag::Str
                | TypeTag::Color
        )
    }
}

fn scalar_tag(token: &str) -> Option<TypeTag> {
    Some(match token {
        "цел" | "int" | "integer" => TypeTag::Int,
        "вещ" | "real" | "float" => TypeTag::Real,
        "лог" | "bool" | "boolean" => TypeTag::Bool,
        "сим" | "char" => TypeTag::Char,
        "лит" | "str" | "string" => TypeTag::Str,
        "цвет" | "color" => TypeTag::Color,
        _ => return None,
    })
}

fn table_element(token: &str) -> Option<TypeTag> {
    let stem = token
        .strip_suffix("таб")
        .or_else(|| token.strip_suffix("table"))?
        .trim_end_matches([' ', '_']);
    scalar_tag(stem)
}

impl fmt::Display for TypeTag {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.keyword())
    }
}

impl From<String> for TypeTag {
    fn from(token: String) -> Self {
        TypeTag::normalize(&token)
    }
}

impl From<TypeTag> for String {
    fn from(tag: TypeTag) -> Self {
        tag.keyword().to_string()
    }
}

/// Declared shape: scalar type or table of a scalar type.
#[derive(Copy, Clone, Eq, PartialEq, Hash, Debug)]
pub struct TypeSpec {
    pub base: TypeTag,
    pub is_table: bool,
}

impl TypeSpec {
    pub const fn scalar(base: TypeTag) -> Self {
        TypeSpec {
            base,
            is_table: false,
        }
    }

    pub const fn table(base: TypeTag) -> Self {
        TypeSpec {
            base,
            is_table: true,
        }
    }

    /// Parse a full type token, keeping the element type of table tokens.
    pub fn parse(token: &str) -> TypeSpec {
        let lowered = token.trim().to_lowercase();
        match table_element(&lowered) {
            Some(elem) => TypeSpec::table(elem),
            None => TypeSpec::scalar(TypeTag::normalize(&lowered)),
        }
    }
}

impl fmt::Display for TypeSpec {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        if self.is_table {
            write!(f, "{}таб", self.base)
        } else {
            write!(f, "{}", self.base)
        }
    }
}
