//! Node color of the red-black tree.

use std::fmt;

/// The color of a red-black tree node.
///
/// A missing child counts as [`Color::Black`] for every invariant.
#[derive(Clone, Copy, PartialEq, Eq, Hash, Debug)]
pub enum Color {
    /// Freshly inserted nodes start red.
    Red,
    /// Counted by the black-height invariant.
    Black,
}

impl Color {
    /// Returns `true` if the color is [`Red`](Color::Red).
    #[inline]
    #[must_use]
    pub const fn is_red(self) -> bool {
        matches!(self, Self::Red)
    }

    /// Returns `true` if the color is [`Black`](Color::Black).
    #[inline]
    #[must_use]
    pub const fn is_black(self) -> bool {
        matches!(self, Self::Black)
    }

    /// Returns the other color.
    ///
    /// # Examples
    ///
    /// ```rust
    /// use redblack_multiset::multiset::Color;
    ///
    /// assert_eq!(Color::Red.toggled(), Color::Black);
    /// assert_eq!(Color::Black.toggled(), Color::Red);
    /// ```
    #[inline]
    #[must_use]
    pub const fn toggled(self) -> Self {
        match self {
            Self::Red => Self::Black,
            Self::Black => Self::Red,
        }
    }
}

impl fmt::Display for Color {
    fn fmt(&self, formatter: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::Red => write!(formatter, "red"),
            Self::Black => write!(formatter, "black"),
        }
    }
}
