//! Size negotiation types.
//!
//! Measurement works one axis at a time with [`MeasureLength`], a length that
//! is either *not specified* or a non-negative finite value. An unspecified
//! length means "no limit" when used as a maximum and "zero" when used as a
//! minimum.
//!
//! - [`MeasureSize`] is a pair of lengths used as a *preferred* size: a soft
//!   hint a render object may exceed if its content demands it.
//! - [`MeasureRequirement`] is a hard `min`/`max` pair. A size satisfies it
//!   iff it lies within the bounds on both axes.
//!
//! ```
//! use trellis::render::{MeasureLength, MeasureRequirement, MeasureSize};
//! use trellis::Size;
//!
//! let parent = MeasureRequirement::new(MeasureSize::new(200.0, 200.0), MeasureSize::NOT_SPECIFIED);
//! let custom = MeasureRequirement::new(MeasureSize::new(150.0, f32::NAN), MeasureSize::new(10.0, 10.0));
//!
//! // The tighter bound wins on every side.
//! let merged = parent.merge(&custom);
//! assert_eq!(merged.max, MeasureSize::new(150.0, 200.0));
//! assert_eq!(merged.min, MeasureSize::new(10.0, 10.0));
//!
//! assert!(merged.satisfy(Size::new(100.0, 20.0)));
//! assert_eq!(merged.coerce(Size::new(300.0, 5.0)), Size::new(150.0, 10.0));
//! assert_eq!(MeasureLength::NOT_SPECIFIED.length_or_zero(), 0.0);
//! ```

use std::fmt;

use trellis_core::logging::targets;
use trellis_render::Size;

/// One axis of a measure bound or hint.
///
/// Constructed values are finite and never negative; negative inputs become
/// zero, NaN and infinite inputs become not-specified.
#[derive(Debug, Clone, Copy, PartialEq, Default)]
pub struct MeasureLength(Option<f32>);

impl MeasureLength {
    /// No value.
    pub const NOT_SPECIFIED: Self = Self(None);

    /// Zero length.
    pub const ZERO: Self = Self(Some(0.0));

    /// A specified length. Negative values clamp to zero; NaN and infinite
    /// values yield [`MeasureLength::NOT_SPECIFIED`].
    pub fn new(value: f32) -> Self {
        if !value.is_finite() {
            Self::NOT_SPECIFIED
        } else {
            Self(Some(value.max(0.0)))
        }
    }

    #[inline]
    pub fn is_specified(self) -> bool {
        self.0.is_some()
    }

    #[inline]
    pub fn is_not_specified(self) -> bool {
        self.0.is_none()
    }

    /// The value, if specified.
    #[inline]
    pub fn value(self) -> Option<f32> {
        self.0
    }

    /// The value, or `f32::MAX` if not specified.
    #[inline]
    pub fn length_or_max(self) -> f32 {
        self.0.unwrap_or(f32::MAX)
    }

    /// The value, or zero if not specified.
    #[inline]
    pub fn length_or_zero(self) -> f32 {
        self.0.unwrap_or(0.0)
    }

    /// `self` if specified, otherwise `fallback`.
    #[inline]
    pub fn or(self, fallback: MeasureLength) -> Self {
        if self.is_specified() { self } else { fallback }
    }

    /// The value if specified, otherwise `fallback`.
    #[inline]
    pub fn or_value(self, fallback: f32) -> f32 {
        self.0.unwrap_or(fallback)
    }

    /// `other` if it is specified, otherwise `self`.
    #[inline]
    pub fn override_by(self, other: MeasureLength) -> Self {
        other.or(self)
    }

    /// Add to a specified length. Not specified stays not specified.
    pub fn plus(self, delta: f32) -> Self {
        match self.0 {
            Some(v) => Self::new(v + delta),
            None => self,
        }
    }

    /// Subtract from a specified length, never going below zero.
    pub fn minus(self, delta: f32) -> Self {
        self.plus(-delta)
    }

    /// The smaller length. If one side is not specified the other is
    /// returned.
    pub fn min(self, other: MeasureLength) -> Self {
        match (self.0, other.0) {
            (Some(a), Some(b)) => Self(Some(a.min(b))),
            (Some(_), None) => self,
            _ => other,
        }
    }

    /// The larger length. If one side is not specified the other is
    /// returned.
    pub fn max(self, other: MeasureLength) -> Self {
        match (self.0, other.0) {
            (Some(a), Some(b)) => Self(Some(a.max(b))),
            (Some(_), None) => self,
            _ => other,
        }
    }
}

impl From<f32> for MeasureLength {
    fn from(value: f32) -> Self {
        Self::new(value)
    }
}

impl From<Option<f32>> for MeasureLength {
    fn from(value: Option<f32>) -> Self {
        value.map_or(Self::NOT_SPECIFIED, Self::new)
    }
}

impl fmt::Display for MeasureLength {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self.0 {
            Some(v) => write!(f, "{v}"),
            None => f.write_str("unspecified"),
        }
    }
}

/// A width/height pair of [`MeasureLength`]s.
#[derive(Debug, Clone, Copy, PartialEq, Default)]
pub struct MeasureSize {
    pub width: MeasureLength,
    pub height: MeasureLength,
}

impl MeasureSize {
    /// Both axes not specified.
    pub const NOT_SPECIFIED: Self = Self {
        width: MeasureLength::NOT_SPECIFIED,
        height: MeasureLength::NOT_SPECIFIED,
    };

    /// Create from raw values; NaN means not specified.
    pub fn new(width: f32, height: f32) -> Self {
        Self {
            width: MeasureLength::new(width),
            height: MeasureLength::new(height),
        }
    }

    /// Create from per-axis lengths.
    pub const fn from_lengths(width: MeasureLength, height: MeasureLength) -> Self {
        Self { width, height }
    }

    /// Per-axis [`MeasureLength::override_by`].
    pub fn override_by(self, other: MeasureSize) -> Self {
        Self {
            width: self.width.override_by(other.width),
            height: self.height.override_by(other.height),
        }
    }

    /// Fill unspecified axes from `fallback`.
    pub fn or_size(self, fallback: Size) -> Size {
        Size::new(self.width.or_value(fallback.width), self.height.or_value(fallback.height))
    }

    /// Unspecified axes become zero.
    pub fn or_zero(self) -> Size {
        self.or_size(Size::ZERO)
    }

    /// Unspecified axes become `f32::MAX`.
    pub fn or_max(self) -> Size {
        self.or_size(Size::MAX)
    }

    pub fn plus(self, size: Size) -> Self {
        Self {
            width: self.width.plus(size.width),
            height: self.height.plus(size.height),
        }
    }

    pub fn minus(self, size: Size) -> Self {
        Self {
            width: self.width.minus(size.width),
            height: self.height.minus(size.height),
        }
    }

    pub fn min(self, other: MeasureSize) -> Self {
        Self {
            width: self.width.min(other.width),
            height: self.height.min(other.height),
        }
    }

    pub fn max(self, other: MeasureSize) -> Self {
        Self {
            width: self.width.max(other.width),
            height: self.height.max(other.height),
        }
    }

    pub fn with_width(self, width: MeasureLength) -> Self {
        Self { width, ..self }
    }

    pub fn with_height(self, height: MeasureLength) -> Self {
        Self { height, ..self }
    }
}

impl From<Size> for MeasureSize {
    fn from(size: Size) -> Self {
        Self::new(size.width, size.height)
    }
}

impl fmt::Display for MeasureSize {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "({}, {})", self.width, self.height)
    }
}

/// Hard size bounds for a measure call.
#[derive(Debug, Clone, Copy, PartialEq, Default)]
pub struct MeasureRequirement {
    pub max: MeasureSize,
    pub min: MeasureSize,
}

impl MeasureRequirement {
    /// No bounds at all.
    pub const UNSPECIFIED: Self = Self {
        max: MeasureSize::NOT_SPECIFIED,
        min: MeasureSize::NOT_SPECIFIED,
    };

    /// Create a requirement. A specified minimum larger than the specified
    /// maximum on the same axis is clamped down to the maximum with a
    /// diagnostic.
    pub fn new(max: MeasureSize, min: MeasureSize) -> Self {
        Self { max, min }.normalized()
    }

    /// Only an upper bound.
    pub fn with_max(max: MeasureSize) -> Self {
        Self {
            max,
            min: MeasureSize::NOT_SPECIFIED,
        }
    }

    /// Exactly `size` on both axes.
    pub fn exact(size: Size) -> Self {
        let size = MeasureSize::from(size);
        Self { max: size, min: size }
    }

    /// Whether `size` lies within `[min, max]` on both axes.
    pub fn satisfy(&self, size: Size) -> bool {
        let fits = |v: f32, min: MeasureLength, max: MeasureLength| {
            v >= min.length_or_zero() && v <= max.length_or_max()
        };
        fits(size.width, self.min.width, self.max.width)
            && fits(size.height, self.min.height, self.max.height)
    }

    /// Clamp `size` into the bounds. The maximum wins over the minimum.
    pub fn coerce(&self, size: Size) -> Size {
        let clamp = |v: f32, min: MeasureLength, max: MeasureLength| {
            v.max(min.length_or_zero()).min(max.length_or_max())
        };
        Size::new(
            clamp(size.width, self.min.width, self.max.width),
            clamp(size.height, self.min.height, self.max.height),
        )
    }

    /// Clamp the specified axes of a size hint into the bounds. Unspecified
    /// axes stay unspecified.
    pub fn coerce_hint(&self, hint: MeasureSize) -> MeasureSize {
        let clamp = |v: MeasureLength, min: MeasureLength, max: MeasureLength| match v.value() {
            Some(v) => MeasureLength::new(v.max(min.length_or_zero()).min(max.length_or_max())),
            None => v,
        };
        MeasureSize {
            width: clamp(hint.width, self.min.width, self.max.width),
            height: clamp(hint.height, self.min.height, self.max.height),
        }
    }

    /// Shrink both bounds by `size` (e.g. margin and padding), never below
    /// zero.
    pub fn minus(&self, size: Size) -> Self {
        Self {
            max: self.max.minus(size),
            min: self.min.minus(size),
        }
    }

    /// Intersect with `other`: the smaller maximum and the larger minimum.
    pub fn merge(&self, other: &MeasureRequirement) -> Self {
        Self {
            max: self.max.min(other.max),
            min: self.min.max(other.min),
        }
        .normalized()
    }

    fn normalized(mut self) -> Self {
        let fix = |min: &mut MeasureLength, max: MeasureLength, axis: &str| {
            if let (Some(lo), Some(hi)) = (min.value(), max.value())
                && lo > hi
            {
                tracing::warn!(target: targets::LAYOUT, axis, min = lo, max = hi, "measure requirement min exceeds max, clamping min");
                *min = max;
            }
        };
        fix(&mut self.min.width, self.max.width, "width");
        fix(&mut self.min.height, self.max.height, "height");
        self
    }
}

impl fmt::Display for MeasureRequirement {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{{max: {}, min: {}}}", self.max, self.min)
    }
}
