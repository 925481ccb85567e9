use std::fmt;

/// The only scalar type is `Int`; `Bool` is the result of a comparison.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum Ty {
    Int,
    Bool,
}

impl Ty {
    pub fn is_comparable(&self) -> bool {
        matches!(self, Ty::Int | Ty::Bool)
    }

    /// The IR type a value of this type lives in.
    pub fn ir_type(&self) -> &'static str {
        match self {
            Ty::Int => "i32",
            Ty::Bool => "i1",
        }
    }
}

impl fmt::Display for Ty {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Ty::Int => f.write_str("int"),
            Ty::Bool => f.write_str("bool"),
        }
    }
}
