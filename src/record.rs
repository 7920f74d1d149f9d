use log::{debug, warn};

use crate::annotation::decode_tal_block;
use crate::config::DecoderConfig;
use crate::cursor::ByteCursor;
use crate::error::{EdfError, Result};
use crate::types::{Annotation, SignalDescriptor};

/// Decoded contents of one channel, in header order.
#[derive(Debug, Clone, PartialEq)]
pub enum ChannelData {
    /// One block of physical values per data record.
    Samples(Vec<Vec<f64>>),
    /// Entries of every record's TAL block, in file order.
    Annotations(Vec<Annotation>),
}

/// Reads `data_records_count` records, each holding one block per signal.
///
/// A signal with a degenerate scale decodes with scale 0; the problem was
/// already reported while decoding the header.
///
/// # Errors
///
/// `EdfError::TruncatedRecords` if the buffer ends before the declared
/// number of records. Nothing is returned for the records already read.
pub fn decode_records(
    cursor: &mut ByteCursor<'_>,
    signals: &[SignalDescriptor],
    data_records_count: usize,
    config: &DecoderConfig,
) -> Result<Vec<ChannelData>> {
    let sample_bytes = config.sample_width.bytes();
    let record_bytes: usize = signals
        .iter()
        .map(|s| s.samples_per_record * sample_bytes)
        .sum();

    // Cap the reservation by what the buffer can actually hold.
    let expected_records = if record_bytes == 0 {
        0
    } else {
        data_records_count.min(cursor.remaining() / record_bytes)
    };

    let scales: Vec<f64> = signals
        .iter()
        .map(|s| if s.is_annotation_channel { 0.0 } else { s.scale().unwrap_or(0.0) })
        .collect();

    let mut channels: Vec<ChannelData> = signals
        .iter()
        .map(|s| {
            if s.is_annotation_channel {
                ChannelData::Annotations(Vec::new())
            } else {
                ChannelData::Samples(Vec::with_capacity(expected_records))
            }
        })
        .collect();

    for record in 0..data_records_count {
        for ((signal, &scale), channel) in signals.iter().zip(&scales).zip(channels.iter_mut()) {
            let truncated = |_| {
                warn!(
                    "Data records end early: record {} of {}, signal {}",
                    record, data_records_count, signal.index
                );
                EdfError::TruncatedRecords {
                    record,
                    signal: signal.index,
                }
            };

            match channel {
                ChannelData::Annotations(annotations) => {
                    let block = cursor
                        .read_bytes(signal.samples_per_record * sample_bytes)
                        .map_err(truncated)?;
                    annotations.extend(decode_tal_block(block));
                }
                ChannelData::Samples(records) => {
                    let capacity = signal
                        .samples_per_record
                        .min(cursor.remaining() / sample_bytes);
                    let mut samples = Vec::with_capacity(capacity);
                    for _ in 0..signal.samples_per_record {
                        let raw = cursor
                            .read_signed_int(config.sample_width)
                            .map_err(truncated)?;
                        samples.push(signal.to_physical(raw, scale, config.scaling));
                    }
                    records.push(samples);
                }
            }
        }
    }

    if cursor.remaining() > 0 {
        debug!("{} bytes after the last data record ignored", cursor.remaining());
    }
    debug!(
        "Decoded {} data records of {} bytes",
        data_records_count,
        record_bytes
    );

    Ok(channels)
}
