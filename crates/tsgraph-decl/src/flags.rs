//! Modifier and node flags.

use bitflags::bitflags;

bitflags! {
    /// Declaration modifiers as written in source.
    #[derive(Copy, Clone, Debug, Default, PartialEq, Eq, Hash)]
    pub struct ModifierFlags: u16 {
        const ABSTRACT  = 1 << 0;
        const ASYNC     = 1 << 1;
        const CONST     = 1 << 2;
        const DECLARE   = 1 << 3;
        const DEFAULT   = 1 << 4;
        const EXPORT    = 1 << 5;
        const PUBLIC    = 1 << 6;
        const PRIVATE   = 1 << 7;
        const PROTECTED = 1 << 8;
        const READONLY  = 1 << 9;
        const STATIC    = 1 << 10;

        const ACCESSIBILITY = Self::PUBLIC.bits() | Self::PRIVATE.bits() | Self::PROTECTED.bits();
    }
}

impl ModifierFlags {
    /// Source keywords in canonical order, for rendering.
    pub const KEYWORDS: [(ModifierFlags, &'static str); 11] = [
        (Self::EXPORT, "export"),
        (Self::DEFAULT, "default"),
        (Self::DECLARE, "declare"),
        (Self::PUBLIC, "public"),
        (Self::PRIVATE, "private"),
        (Self::PROTECTED, "protected"),
        (Self::STATIC, "static"),
        (Self::ABSTRACT, "abstract"),
        (Self::ASYNC, "async"),
        (Self::READONLY, "readonly"),
        (Self::CONST, "const"),
    ];

    /// Space-separated modifier keywords (`"export declare"`).
    pub fn keywords(self) -> String {
        Self::KEYWORDS
            .iter()
            .filter(|(flag, _)| self.contains(*flag))
            .map(|(_, kw)| *kw)
            .collect::<Vec<_>>()
            .join(" ")
    }
}

bitflags! {
    /// Structural markers that are not modifiers.
    #[derive(Copy, Clone, Debug, Default, PartialEq, Eq, Hash)]
    pub struct NodeFlags: u8 {
        /// `?` after a parameter, property or method name.
        const OPTIONAL = 1 << 0;
        /// `...` before a parameter or tuple element.
        const REST     = 1 << 1;
        /// `const` variable statement.
        const CONST    = 1 << 2;
        /// `let` variable statement.
        const LET      = 1 << 3;
        /// `asserts x is T` / `asserts x` predicate.
        const ASSERTS  = 1 << 4;

        const BLOCK_SCOPED = Self::CONST.bits() | Self::LET.bits();
    }
}
