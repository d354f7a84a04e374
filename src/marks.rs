//! Text marks (bold, italic, code, ...).
//!
//! A [`Marks`] value is a set of mark types applied to a run of text. It is
//! a bitflag set, so a run can never carry the same mark twice.
//!
//! # Examples
//!
//! ```
//! use richdoc::Marks;
//!
//! let strong_code = Marks::BOLD | Marks::CODE;
//! assert!(strong_code.contains(Marks::CODE));
//! assert_eq!(strong_code.names().collect::<Vec<_>>(), vec!["bold", "code"]);
//! assert_eq!(Marks::from_mark_name("italic"), Some(Marks::ITALIC));
//! ```

use bitflags::bitflags;

bitflags! {
    /// Set of marks applied to a run of text.
    #[derive(Clone, Copy, Debug, Default, Eq, PartialEq, Hash)]
    pub struct Marks: u16 {
        /// Strong emphasis.
        const BOLD          = 0x01;
        /// Emphasis.
        const ITALIC        = 0x02;
        /// Underlined text.
        const UNDERLINE     = 0x04;
        /// Struck-through text.
        const STRIKETHROUGH = 0x08;
        /// Inline code.
        const CODE          = 0x10;
    }
}

impl Marks {
    /// Plain text.
    pub const NONE: Self = Self::empty();

    /// Look up a single mark by its lowercase name.
    ///
    /// Unlike the generated [`Marks::from_name`], which matches the
    /// uppercase flag names, this reads the names used by [`Marks::names`].
    #[must_use]
    pub fn from_mark_name(name: &str) -> Option<Self> {
        match name {
            "bold" => Some(Self::BOLD),
            "italic" => Some(Self::ITALIC),
            "underline" => Some(Self::UNDERLINE),
            "strikethrough" => Some(Self::STRIKETHROUGH),
            "code" => Some(Self::CODE),
            _ => None,
        }
    }

    /// Name of a single mark, `None` for combined or empty sets.
    #[must_use]
    pub fn name(self) -> Option<&'static str> {
        match self {
            Self::BOLD => Some("bold"),
            Self::ITALIC => Some("italic"),
            Self::UNDERLINE => Some("underline"),
            Self::STRIKETHROUGH => Some("strikethrough"),
            Self::CODE => Some("code"),
            _ => None,
        }
    }

    /// Names of every mark in the set, lowest bit first.
    pub fn names(self) -> impl Iterator<Item = &'static str> {
        self.iter().filter_map(Self::name)
    }

    /// Parse a list of names into a set.
    ///
    /// Returns the first unknown name on failure.
    pub fn from_names<'a, I>(names: I) -> std::result::Result<Self, &'a str>
    where
        I: IntoIterator<Item = &'a str>,
    {
        names.into_iter().try_fold(Self::NONE, |acc, name| {
            Self::from_mark_name(name).map(|mark| acc | mark).ok_or(name)
        })
    }
}
