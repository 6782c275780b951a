//! Color handling for Atlas diagrams
//!
//! This module provides the [`Color`] type which wraps the `DynamicColor` type
//! from the color crate. Diagram entities store colors as the strings the
//! document store hands them; [`Color`] is used to decide whether such a string
//! is a usable CSS color before it is accepted.

use std::str::FromStr;

use color::DynamicColor;

/// Wrapper around the `DynamicColor` type from the color crate
#[derive(Clone, Copy, PartialEq, Debug)]
pub struct Color {
    color: DynamicColor,
}

impl Color {
    /// Create a new `Color` from a string
    /// This will parse CSS color strings such as "#ff0000", "rgb(255, 0, 0)", "red", etc.
    ///
    /// # Examples
    ///
    /// ```
    /// use atlas_core::color::Color;
    ///
    /// let red = Color::new("#ff0000").unwrap();
    /// let blue = Color::new("blue").unwrap();
    /// ```
    pub fn new(color_str: &str) -> Result<Self, String> {
        match DynamicColor::from_str(color_str.trim()) {
            Ok(color) => Ok(Self { color }),
            Err(err) => Err(format!("invalid color `{color_str}`: {err}")),
        }
    }

    /// Returns `true` if `color_str` parses as a CSS color.
    ///
    /// # Examples
    ///
    /// ```
    /// use atlas_core::color::Color;
    ///
    /// assert!(Color::is_valid("#1e1e1e"));
    /// assert!(!Color::is_valid("not-a-color"));
    /// ```
    pub fn is_valid(color_str: &str) -> bool {
        Self::new(color_str).is_ok()
    }
}

impl std::fmt::Display for Color {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "{}", self.color)
    }
}
