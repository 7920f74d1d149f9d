use log::debug;

use crate::config::DecoderConfig;
use crate::cursor::ByteCursor;
use crate::error::{EdfError, Result};
use crate::header::decode_header;
use crate::query::{compute_range, extract, RecordRange};
use crate::record::{decode_records, ChannelData};
use crate::types::{Annotation, AnnotationChannel, DecodedSignal, FileHeader};

/// A fully decoded EDF/EDF+ recording.
///
/// Built once by [`decode`] or [`decode_with`] and read-only afterwards, so
/// range queries can run concurrently from several threads.
///
/// # Examples
///
/// ## Basic usage
///
/// ```rust
/// use edfdecode::decode;
///
/// # let bytes = edfdecode::doctest_utils::create_simple_test_buffer();
/// let edf = decode(&bytes)?;
///
/// println!("Duration: {:.1} seconds", edf.header().recording_duration());
/// println!("Signals: {}", edf.signals().len());
///
/// // First two seconds of the first signal
/// let samples = edf.samples_in_range(0, 0.0, 2.0)?;
/// assert_eq!(samples.len(), 2 * edf.signals()[0].descriptor.samples_per_record);
/// # Ok::<(), edfdecode::EdfError>(())
/// ```
///
/// ## Processing all signals
///
/// ```rust
/// use edfdecode::decode;
///
/// # let bytes = edfdecode::doctest_utils::create_multi_channel_test_buffer();
/// let edf = decode(&bytes)?;
/// let window = edf.all_signals_in_range(1.0, 1.0);
///
/// for (signal, samples) in edf.signals().iter().zip(&window) {
///     let mean = samples.iter().sum::<f64>() / samples.len() as f64;
///     println!("{}: mean {:.2} {}", signal.descriptor.label, mean,
///         signal.descriptor.physical_dimension);
/// }
///
/// for annotation in edf.annotations().filter(|a| !a.is_time_keeping()) {
///     println!("{:.3}s {:?}", annotation.onset, annotation.notes);
/// }
/// # Ok::<(), edfdecode::EdfError>(())
/// ```
#[derive(Debug, Clone)]
pub struct EdfFile {
    header: FileHeader,
    signals: Vec<DecodedSignal>,
    annotation_channels: Vec<AnnotationChannel>,
    issues: Vec<EdfError>,
}

/// Decodes a complete EDF/EDF+ buffer with the default layout.
///
/// # Errors
///
/// * `EdfError::TruncatedHeader` - the buffer ends inside the header
/// * `EdfError::MalformedNumber` - a field the record layout depends on is
///   not a number
/// * `EdfError::TruncatedRecords` - fewer data records than declared
pub fn decode(buffer: &[u8]) -> Result<EdfFile> {
    decode_with(buffer, &DecoderConfig::default())
}

/// Decodes a complete buffer with an explicit layout.
pub fn decode_with(buffer: &[u8], config: &DecoderConfig) -> Result<EdfFile> {
    let mut cursor = ByteCursor::new(buffer);
    let decoded = decode_header(&mut cursor, config)?;
    let channels = decode_records(
        &mut cursor,
        &decoded.signals,
        decoded.header.data_records_count,
        config,
    )?;

    let mut signals = Vec::new();
    let mut annotation_channels = Vec::new();
    for (descriptor, data) in decoded.signals.into_iter().zip(channels) {
        match data {
            ChannelData::Samples(records) => signals.push(DecodedSignal { descriptor, records }),
            ChannelData::Annotations(annotations) => {
                annotation_channels.push(AnnotationChannel {
                    descriptor,
                    annotations,
                })
            }
        }
    }

    debug!(
        "Decoded {} signals and {} annotation channels, {} issues",
        signals.len(),
        annotation_channels.len(),
        decoded.issues.len()
    );

    Ok(EdfFile {
        header: decoded.header,
        signals,
        annotation_channels,
        issues: decoded.issues,
    })
}

impl EdfFile {
    pub fn header(&self) -> &FileHeader {
        &self.header
    }

    /// Ordinary channels, in header order.
    pub fn signals(&self) -> &[DecodedSignal] {
        &self.signals
    }

    pub fn signal(&self, index: usize) -> Result<&DecodedSignal> {
        self.signals
            .get(index)
            .ok_or(EdfError::InvalidSignalIndex(index))
    }

    pub fn signal_by_label(&self, label: &str) -> Option<&DecodedSignal> {
        self.signals.iter().find(|s| s.descriptor.label == label)
    }

    pub fn annotation_channels(&self) -> &[AnnotationChannel] {
        &self.annotation_channels
    }

    /// Every annotation of every annotation channel, channel by channel.
    pub fn annotations(&self) -> impl Iterator<Item = &Annotation> {
        self.annotation_channels
            .iter()
            .flat_map(|channel| channel.annotations.iter())
    }

    /// Problems that did not stop decoding: fields that were not numbers
    /// and signals whose digital range is empty.
    pub fn issues(&self) -> &[EdfError] {
        &self.issues
    }

    /// Highest per-signal sampling rate in samples per second.
    pub fn sampling_rate(&self) -> f64 {
        let max_samples = self
            .signals
            .iter()
            .map(|s| s.descriptor.samples_per_record)
            .max()
            .unwrap_or(0);
        max_samples as f64 / self.header.data_record_duration
    }

    /// Data records covering `duration` seconds starting at `time_offset`.
    pub fn record_range(&self, time_offset: f64, duration: f64) -> RecordRange {
        compute_range(
            time_offset,
            duration,
            self.header.data_record_duration,
            self.header.data_records_count,
        )
    }

    /// Physical values of one ordinary signal over whole data records.
    ///
    /// The window is widened to record boundaries.
    ///
    /// # Errors
    ///
    /// * `EdfError::InvalidSignalIndex` - `signal` is not an ordinary signal index
    pub fn samples_in_range(&self, signal: usize, time_offset: f64, duration: f64) -> Result<Vec<f64>> {
        let signal = self.signal(signal)?;
        let range = self.record_range(time_offset, duration);
        Ok(extract(&signal.records, range))
    }

    /// One sample sequence per ordinary signal, in header order.
    pub fn all_signals_in_range(&self, time_offset: f64, duration: f64) -> Vec<Vec<f64>> {
        let range = self.record_range(time_offset, duration);
        self.signals
            .iter()
            .map(|signal| extract(&signal.records, range))
            .collect()
    }
}
