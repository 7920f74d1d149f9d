//! Decoder configuration.
//!
//! EDF variants differ in the width of the reserved header field and in the
//! number of bytes per sample. Neither is sniffed from the file: the caller
//! states which layout it expects.

use crate::ANNOTATION_LABEL_MARKER;

/// Width of the reserved field in the fixed part of the header.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ReservedWidth {
    /// 32 bytes
    Base,
    /// 44 bytes, the layout written by EDF+ and BDF+ recorders
    Extended,
}

impl ReservedWidth {
    pub fn bytes(self) -> usize {
        match self {
            ReservedWidth::Base => 32,
            ReservedWidth::Extended => 44,
        }
    }
}

/// Number of bytes per stored sample.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum SampleWidth {
    One,
    Two,
    Three,
}

impl SampleWidth {
    pub fn bytes(self) -> usize {
        match self {
            SampleWidth::One => 1,
            SampleWidth::Two => 2,
            SampleWidth::Three => 3,
        }
    }
}

/// How a signal label is recognised as an annotation channel.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum AnnotationMatch {
    /// Label contains [`ANNOTATION_LABEL_MARKER`] anywhere.
    Substring,
    /// Trimmed label is exactly `EDF Annotations` or `BDF Annotations`.
    Exact,
}

impl AnnotationMatch {
    pub fn matches(self, label: &str) -> bool {
        match self {
            AnnotationMatch::Substring => label.contains(ANNOTATION_LABEL_MARKER),
            AnnotationMatch::Exact => {
                let label = label.trim();
                label == "EDF Annotations" || label == "BDF Annotations"
            }
        }
    }
}

/// Conversion from stored integers to physical units.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Scaling {
    /// `raw * scale`. Drops the offset of asymmetric digital ranges.
    Multiplicative,
    /// `physical_min + (raw - digital_min) * scale`
    Affine,
}

/// Layout and interpretation options for [`decode_with`](crate::decode_with).
///
/// # Examples
///
/// ```rust
/// use edfdecode::{DecoderConfig, ReservedWidth, SampleWidth, Scaling};
///
/// let config = DecoderConfig::default()
///     .with_reserved_width(ReservedWidth::Base)
///     .with_scaling(Scaling::Affine);
/// assert_eq!(config.sample_width, SampleWidth::Two);
/// assert_eq!(config.reserved_width.bytes(), 32);
///
/// assert_eq!(DecoderConfig::bdf().sample_width.bytes(), 3);
/// ```
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct DecoderConfig {
    pub reserved_width: ReservedWidth,
    pub sample_width: SampleWidth,
    pub annotation_match: AnnotationMatch,
    pub scaling: Scaling,
}

impl Default for DecoderConfig {
    fn default() -> Self {
        DecoderConfig {
            reserved_width: ReservedWidth::Extended,
            sample_width: SampleWidth::Two,
            annotation_match: AnnotationMatch::Substring,
            scaling: Scaling::Multiplicative,
        }
    }
}

impl DecoderConfig {
    /// 24-bit samples, as stored by BDF recorders.
    pub fn bdf() -> Self {
        DecoderConfig::default().with_sample_width(SampleWidth::Three)
    }

    pub fn with_reserved_width(mut self, width: ReservedWidth) -> Self {
        self.reserved_width = width;
        self
    }

    pub fn with_sample_width(mut self, width: SampleWidth) -> Self {
        self.sample_width = width;
        self
    }

    pub fn with_annotation_match(mut self, rule: AnnotationMatch) -> Self {
        self.annotation_match = rule;
        self
    }

    pub fn with_scaling(mut self, scaling: Scaling) -> Self {
        self.scaling = scaling;
        self
    }
}
