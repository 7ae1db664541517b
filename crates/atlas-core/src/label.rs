//! The 6-component vertex label and its exhaustive enumeration.
//!
//! A label carries five binary fields (`e1`, `e2`, `e3`, `e6`, `e7`) and one
//! ternary field `d45` restricted to {-1, 0, +1}. The ternary field
//! summarizes two hidden sub-bits `e4` and `e5` as their difference; the
//! hidden bits never appear individually, only through the step tables
//! [`E4_TABLE`] and [`E5_TABLE`] that describe how flipping one of them moves
//! `d45`.
//!
//! Exactly 96 labels exist (2^5 * 3). They are enumerated once, in a fixed
//! nested order, and never mutated.

use std::fmt;

use thiserror::Error;

/// Undirected effect on `d45` of flipping hidden bit `e4`.
///
/// Flipping `e4` moves `d45 = e4 - e5` by one step upward or downward
/// depending on the current hidden state; as an undirected relation the
/// reachable pairs are exactly these.
pub const E4_TABLE: [(i8, i8); 2] = [(-1, 0), (0, 1)];

/// Undirected effect on `d45` of flipping hidden bit `e5`.
pub const E5_TABLE: [(i8, i8); 2] = [(0, -1), (1, 0)];

/// Number of distinct labels.
pub const NUM_LABELS: usize = 96;

/// A 6-component semantic coordinate.
///
/// Equality and hashing are structural and total. Labels are ordered by the
/// enumeration order of [`Label::enumerate`] when compared as values
/// (`e1, e2, e3, d45, e6, e7`, last component fastest).
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord)]
pub struct Label {
    e1: bool,
    e2: bool,
    e3: bool,
    d45: i8,
    e6: bool,
    e7: bool,
}

/// Failure to parse the textual label form.
#[derive(Debug, Error, Clone, PartialEq, Eq)]
#[non_exhaustive]
pub enum LabelParseError {
    /// The string did not split into six comma-separated components.
    #[error("expected 6 comma-separated components, got {actual}")]
    ComponentCount {
        /// How many components were found.
        actual: usize,
    },

    /// A binary field held something other than `0` or `1`.
    #[error("component {position} must be 0 or 1, got {value:?}")]
    BadBinaryField {
        /// Zero-based component position.
        position: usize,
        /// The offending text.
        value: String,
    },

    /// The ternary field held something other than `-1`, `0` or `1`.
    #[error("component 3 must be -1, 0 or 1, got {value:?}")]
    BadTernaryField {
        /// The offending text.
        value: String,
    },
}

impl Label {
    /// Creates a label from its six components.
    ///
    /// `d45` outside {-1, 0, 1} is a programming error; this constructor is
    /// crate-internal and only fed by the enumeration and the symmetry
    /// action, both of which preserve the range.
    pub(crate) const fn new(e1: bool, e2: bool, e3: bool, d45: i8, e6: bool, e7: bool) -> Self {
        Self {
            e1,
            e2,
            e3,
            d45,
            e6,
            e7,
        }
    }

    /// First binary field.
    #[must_use]
    pub const fn e1(&self) -> bool {
        self.e1
    }

    /// Second binary field.
    #[must_use]
    pub const fn e2(&self) -> bool {
        self.e2
    }

    /// Third binary field.
    #[must_use]
    pub const fn e3(&self) -> bool {
        self.e3
    }

    /// The ternary field summarizing the hidden bits `e4`, `e5`.
    #[must_use]
    pub const fn d45(&self) -> i8 {
        self.d45
    }

    /// Fourth designated binary field.
    #[must_use]
    pub const fn e6(&self) -> bool {
        self.e6
    }

    /// The mirror field. Never participates in adjacency.
    #[must_use]
    pub const fn e7(&self) -> bool {
        self.e7
    }

    /// Enumerates all 96 labels in the fixed nested order
    /// (`e1, e2, e3, d45, e6, e7`, last component fastest).
    #[must_use]
    pub fn enumerate() -> Vec<Self> {
        let mut labels = Vec::with_capacity(NUM_LABELS);
        for e1 in [false, true] {
            for e2 in [false, true] {
                for e3 in [false, true] {
                    for d45 in [-1i8, 0, 1] {
                        for e6 in [false, true] {
                            for e7 in [false, true] {
                                labels.push(Self::new(e1, e2, e3, d45, e6, e7));
                            }
                        }
                    }
                }
            }
        }
        labels
    }

    /// The mirror image: `e7` flipped, everything else fixed.
    #[must_use]
    pub const fn mirror(&self) -> Self {
        Self {
            e1: self.e1,
            e2: self.e2,
            e3: self.e3,
            d45: self.d45,
            e6: self.e6,
            e7: !self.e7,
        }
    }

    /// Whether `self` and `other` are Atlas-adjacent.
    ///
    /// Adjacency holds when the labels differ in exactly one of the four
    /// designated flip fields (`e1`, `e2`, `e3`, `e6`), or agree on all
    /// binary fields while `d45` moves by one hidden-bit step. The mirror
    /// field `e7` and the quotiented-out bit `e8` never contribute.
    #[must_use]
    pub fn is_adjacent(&self, other: &Self) -> bool {
        let flips = usize::from(self.e1 != other.e1)
            + usize::from(self.e2 != other.e2)
            + usize::from(self.e3 != other.e3)
            + usize::from(self.e6 != other.e6);
        if self.e7 != other.e7 {
            return false;
        }
        if self.d45 == other.d45 {
            flips == 1
        } else {
            flips == 0 && hidden_bit_step(self.d45, other.d45)
        }
    }

    /// Stable textual form used by the certificate: `"e1,e2,e3,d45,e6,e7"`
    /// with binary fields as `0`/`1` and `d45` as `-1`/`0`/`1`.
    #[must_use]
    pub fn to_compact_string(&self) -> String {
        format!(
            "{},{},{},{},{},{}",
            u8::from(self.e1),
            u8::from(self.e2),
            u8::from(self.e3),
            self.d45,
            u8::from(self.e6),
            u8::from(self.e7),
        )
    }

    /// Parses the textual form produced by [`Label::to_compact_string`].
    ///
    /// # Errors
    ///
    /// Returns a [`LabelParseError`] describing the first malformed
    /// component.
    pub fn parse(s: &str) -> Result<Self, LabelParseError> {
        let parts: Vec<&str> = s.split(',').map(str::trim).collect();
        if parts.len() != 6 {
            return Err(LabelParseError::ComponentCount {
                actual: parts.len(),
            });
        }
        let bit = |position: usize| -> Result<bool, LabelParseError> {
            match parts[position] {
                "0" => Ok(false),
                "1" => Ok(true),
                other => Err(LabelParseError::BadBinaryField {
                    position,
                    value: other.to_string(),
                }),
            }
        };
        let d45 = match parts[3] {
            "-1" => -1i8,
            "0" => 0,
            "1" => 1,
            other => {
                return Err(LabelParseError::BadTernaryField {
                    value: other.to_string(),
                })
            }
        };
        Ok(Self::new(bit(0)?, bit(1)?, bit(2)?, d45, bit(4)?, bit(5)?))
    }
}

impl fmt::Display for Label {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.to_compact_string())
    }
}

/// Whether one hidden-bit flip moves `d45` from `a` to `b`.
fn hidden_bit_step(a: i8, b: i8) -> bool {
    E4_TABLE
        .iter()
        .chain(E5_TABLE.iter())
        .any(|&(x, y)| (a, b) == (x, y) || (b, a) == (x, y))
}
