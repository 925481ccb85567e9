/// How pointer types are spelled in the emitted IR.
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq)]
pub enum PointerStyle {
    /// `i32*`, `[4 x i8]*`: accepted by LLVM up to release 16.
    #[default]
    Typed,
    /// `ptr`: required from LLVM 17 on.
    Opaque,
}

#[derive(Clone, Debug, PartialEq, Eq)]
pub struct CompileOptions {
    pub pointer_style: PointerStyle,
    /// Append `ret i32 0` to every user function so a body that falls off its
    /// end still has a terminator.
    pub fallthrough_return: bool,
}

impl Default for CompileOptions {
    fn default() -> Self {
        Self {
            pointer_style: PointerStyle::Typed,
            fallthrough_return: true,
        }
    }
}
