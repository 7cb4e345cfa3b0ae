//! Box drawing characters for the text preview
//!
//! Supports both ASCII and Unicode modes.

use super::CharacterSet;

/// Box drawing characters for rendering person boxes
#[derive(Debug, Clone, Copy)]
pub struct BoxChars {
    pub top_left: char,
    pub top_right: char,
    pub bottom_left: char,
    pub bottom_right: char,
    pub horizontal: char,
    pub vertical: char,
}

impl BoxChars {
    /// Plain box for ordinary people
    pub fn rectangle(style: CharacterSet) -> Self {
        match style {
            CharacterSet::Ascii => Self::ascii(),
            CharacterSet::Unicode => Self::unicode(),
        }
    }

    /// Heavier box marking the selected person
    pub fn double(style: CharacterSet) -> Self {
        match style {
            CharacterSet::Ascii => Self {
                top_left: '#',
                top_right: '#',
                bottom_left: '#',
                bottom_right: '#',
                horizontal: '=',
                vertical: '#',
            },
            CharacterSet::Unicode => Self {
                top_left: '╔',
                top_right: '╗',
                bottom_left: '╚',
                bottom_right: '╝',
                horizontal: '═',
                vertical: '║',
            },
        }
    }

    /// ASCII-only box characters
    pub fn ascii() -> Self {
        Self {
            top_left: '+',
            top_right: '+',
            bottom_left: '+',
            bottom_right: '+',
            horizontal: '-',
            vertical: '|',
        }
    }

    /// Unicode box-drawing characters
    pub fn unicode() -> Self {
        Self {
            top_left: '┌',
            top_right: '┐',
            bottom_left: '└',
            bottom_right: '┘',
            horizontal: '─',
            vertical: '│',
        }
    }
}

impl Default for BoxChars {
    fn default() -> Self {
        Self::unicode()
    }
}

/// Line drawing characters for connectors
#[derive(Debug, Clone, Copy)]
pub struct LineChars {
    pub horizontal: char,
    pub vertical: char,
    /// Where a horizontal and a vertical run meet
    pub junction: char,
    /// Spouse links
    pub spouse: char,
    /// Midpoint marker on a spouse link
    pub marker: char,
}

impl LineChars {
    /// Get line characters for the given style
    pub fn new(style: CharacterSet) -> Self {
        match style {
            CharacterSet::Ascii => Self::ascii(),
            CharacterSet::Unicode => Self::unicode(),
        }
    }

    /// ASCII line characters
    pub fn ascii() -> Self {
        Self {
            horizontal: '-',
            vertical: '|',
            junction: '+',
            spouse: '=',
            marker: 'o',
        }
    }

    /// Unicode line characters
    pub fn unicode() -> Self {
        Self {
            horizontal: '─',
            vertical: '│',
            junction: '┼',
            spouse: '═',
            marker: '♥',
        }
    }
}

impl Default for LineChars {
    fn default() -> Self {
        Self::unicode()
    }
}
