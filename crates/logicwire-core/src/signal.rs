//! Signal values
//!
//! A signal line only ever stores a [`Level`]. [`Logic`] adds the
//! indeterminate marker a storage element reports when it cannot resolve
//! a clock edge; it is never written to a line.

use std::fmt;
use std::ops::Not;

use crate::{KernelError, KernelResult};

/// Binary signal level
#[derive(Clone, Copy, Debug, PartialEq, Eq, PartialOrd, Ord, Hash, Default)]
#[repr(u8)]
pub enum Level {
    #[default]
    Low = 0,
    High = 1,
}

impl Level {
    /// Both levels, low first (truth-table order)
    pub const ALL: [Level; 2] = [Level::Low, Level::High];

    #[inline]
    pub fn from_bit(bit: u8) -> KernelResult<Self> {
        match bit {
            0 => Ok(Level::Low),
            1 => Ok(Level::High),
            other => Err(KernelError::InvalidSignal(other as u32)),
        }
    }

    #[inline]
    pub fn to_bit(self) -> u8 {
        self as u8
    }

    #[inline]
    pub fn is_high(self) -> bool {
        self == Level::High
    }

    #[inline]
    pub fn is_low(self) -> bool {
        self == Level::Low
    }
}

impl Not for Level {
    type Output = Level;

    #[inline]
    fn not(self) -> Level {
        match self {
            Level::Low => Level::High,
            Level::High => Level::Low,
        }
    }
}

impl From<bool> for Level {
    #[inline]
    fn from(value: bool) -> Self {
        if value {
            Level::High
        } else {
            Level::Low
        }
    }
}

impl From<Level> for bool {
    #[inline]
    fn from(level: Level) -> bool {
        level.is_high()
    }
}

impl TryFrom<u8> for Level {
    type Error = KernelError;

    fn try_from(bit: u8) -> KernelResult<Self> {
        Level::from_bit(bit)
    }
}

impl fmt::Display for Level {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.to_bit())
    }
}

/// Conversion of raw caller values into a line level.
///
/// Anything other than 0 or 1 is rejected with `InvalidSignal`.
pub trait IntoLevel {
    fn into_level(self) -> KernelResult<Level>;
}

impl IntoLevel for Level {
    #[inline]
    fn into_level(self) -> KernelResult<Level> {
        Ok(self)
    }
}

impl IntoLevel for bool {
    #[inline]
    fn into_level(self) -> KernelResult<Level> {
        Ok(Level::from(self))
    }
}

impl IntoLevel for u8 {
    #[inline]
    fn into_level(self) -> KernelResult<Level> {
        Level::from_bit(self)
    }
}

impl IntoLevel for u32 {
    fn into_level(self) -> KernelResult<Level> {
        match self {
            0 => Ok(Level::Low),
            1 => Ok(Level::High),
            other => Err(KernelError::InvalidSignal(other)),
        }
    }
}

impl IntoLevel for i32 {
    fn into_level(self) -> KernelResult<Level> {
        match self {
            0 => Ok(Level::Low),
            1 => Ok(Level::High),
            // Negative values are reported by their bit pattern
            other => Err(KernelError::InvalidSignal(other as u32)),
        }
    }
}

/// Level as observed by a storage element, including the unresolved state
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash, Default)]
pub enum Logic {
    #[default]
    Low,
    High,
    /// Unresolved race (e.g. an edge sampled a floating data input)
    Indeterminate,
}

impl Logic {
    /// Resolved level, if any
    #[inline]
    pub fn level(self) -> Option<Level> {
        match self {
            Logic::Low => Some(Level::Low),
            Logic::High => Some(Level::High),
            Logic::Indeterminate => None,
        }
    }

    #[inline]
    pub fn is_indeterminate(self) -> bool {
        self == Logic::Indeterminate
    }
}

impl From<Level> for Logic {
    #[inline]
    fn from(level: Level) -> Self {
        match level {
            Level::Low => Logic::Low,
            Level::High => Logic::High,
        }
    }
}

impl fmt::Display for Logic {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Logic::Low => write!(f, "0"),
            Logic::High => write!(f, "1"),
            Logic::Indeterminate => write!(f, "X"),
        }
    }
}
