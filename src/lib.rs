//! # EDF/EDF+ Decoder for Rust
//!
//! Decodes European Data Format recordings held in memory into a read-only
//! model with random-access time-range queries over the physical samples.
//!
//! An EDF buffer is a fixed-width ASCII header followed by data records. Each
//! record holds one block of little-endian integers per signal. In EDF+ one
//! or more channels labelled `EDF Annotations` carry Time-stamped
//! Annotations Lists instead of samples.
//!
//! ## Quick Start
//!
//! ```rust
//! use edfdecode::{decode, Result};
//!
//! fn main() -> Result<()> {
//!     # let bytes = edfdecode::doctest_utils::create_multi_channel_test_buffer();
//!     // `bytes` holds a complete EDF file
//!     let edf = decode(&bytes)?;
//!
//!     let header = edf.header();
//!     println!("Records: {} x {} s", header.data_records_count, header.data_record_duration);
//!     println!("Sampling rate: {} Hz", edf.sampling_rate());
//!
//!     for signal in edf.signals() {
//!         println!("{} [{}]", signal.descriptor.label, signal.descriptor.physical_dimension);
//!     }
//!
//!     // Seconds 2..4 of every signal
//!     let window = edf.all_signals_in_range(2.0, 2.0);
//!     assert_eq!(window.len(), edf.signals().len());
//!
//!     for annotation in edf.annotations().filter(|a| !a.is_time_keeping()) {
//!         println!("{:.2}s {:?}", annotation.onset, annotation.notes);
//!     }
//!     Ok(())
//! }
//! ```
//!
//! ## Layout options
//!
//! The reserved header field width and the sample width are not detected
//! from the file. Use [`decode_with`] and a [`DecoderConfig`] for anything
//! other than 44-byte reserved fields and 16-bit samples:
//!
//! ```rust
//! use edfdecode::{decode_with, DecoderConfig};
//!
//! # let bytes = edfdecode::doctest_utils::EdfBuilder::new(1.0)
//! #     .sample_width(3)
//! #     .signal(edfdecode::doctest_utils::SignalSpec::new("EEG", 4))
//! #     .records(2)
//! #     .build();
//! let edf = decode_with(&bytes, &DecoderConfig::bdf())?;
//! assert_eq!(edf.signals()[0].records.len(), 2);
//! # Ok::<(), edfdecode::EdfError>(())
//! ```
//!
//! ## Physical values
//!
//! By default a sample is `raw * scale` with
//! `scale = (physical_max - physical_min) / (digital_max - digital_min)`.
//! This drops the offset of channels whose digital range is not symmetric
//! around zero. [`Scaling::Affine`] applies the full
//! `physical_min + (raw - digital_min) * scale` instead.

pub mod annotation;
pub mod config;
pub mod cursor;
pub mod error;
pub mod header;
pub mod query;
pub mod reader;
pub mod record;
pub mod types;
pub mod utils;

#[doc(hidden)]
pub mod doctest_utils; // For internal doctest support

// Re-export main types for convenience
pub use config::{AnnotationMatch, DecoderConfig, ReservedWidth, SampleWidth, Scaling};
pub use cursor::ByteCursor;
pub use error::{EdfError, Result};
pub use query::RecordRange;
pub use reader::{decode, decode_with, EdfFile};
pub use types::{
    Annotation, AnnotationChannel, DecodedSignal, FileHeader, PatientInfo, RecordingInfo,
    SignalDescriptor,
};

/// Label fragment shared by `EDF Annotations` and `BDF Annotations`.
pub const ANNOTATION_LABEL_MARKER: &str = "DF Annotations";

/// Library version
///
/// Returns the current version of the edfdecode library.
///
/// # Examples
///
/// ```rust
/// let version = edfdecode::version();
/// assert!(!version.is_empty());
/// assert!(version.contains('.'));
/// ```
pub fn version() -> &'static str {
    env!("CARGO_PKG_VERSION")
}
