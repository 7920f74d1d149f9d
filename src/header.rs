use log::{debug, warn};

use crate::config::DecoderConfig;
use crate::cursor::{ByteCursor, NumericText};
use crate::error::{EdfError, Result};
use crate::types::{FileHeader, SignalDescriptor};

/// Per-signal attributes in file order, with their field widths.
///
/// The header stores each attribute for all signals before moving on to
/// the next attribute.
const SIGNAL_FIELDS: [(SignalField, usize); 10] = [
    (SignalField::Label, 16),
    (SignalField::Transducer, 80),
    (SignalField::PhysicalDimension, 8),
    (SignalField::PhysicalMin, 8),
    (SignalField::PhysicalMax, 8),
    (SignalField::DigitalMin, 8),
    (SignalField::DigitalMax, 8),
    (SignalField::Prefilter, 80),
    (SignalField::SamplesPerRecord, 8),
    (SignalField::Reserved, 32),
];

/// Declared in file order, so `field as usize` is the column index.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
enum SignalField {
    Label,
    Transducer,
    PhysicalDimension,
    PhysicalMin,
    PhysicalMax,
    DigitalMin,
    DigitalMax,
    Prefilter,
    SamplesPerRecord,
    Reserved,
}

impl SignalField {
    fn name(self) -> &'static str {
        match self {
            SignalField::Label => "label",
            SignalField::Transducer => "transducer type",
            SignalField::PhysicalDimension => "physical dimension",
            SignalField::PhysicalMin => "physical minimum",
            SignalField::PhysicalMax => "physical maximum",
            SignalField::DigitalMin => "digital minimum",
            SignalField::DigitalMax => "digital maximum",
            SignalField::Prefilter => "prefiltering",
            SignalField::SamplesPerRecord => "samples per record",
            SignalField::Reserved => "signal reserved",
        }
    }
}

/// Result of decoding the header section.
#[derive(Debug, Clone)]
pub struct DecodedHeader {
    pub header: FileHeader,
    pub signals: Vec<SignalDescriptor>,
    /// Best-effort problems: malformed descriptive numbers and degenerate scales.
    pub issues: Vec<EdfError>,
}

/// Reads the fixed header and all signal descriptors from `cursor`.
///
/// Leaves the cursor at the first data record.
///
/// # Errors
///
/// * `EdfError::TruncatedHeader` - the buffer ends inside the header
/// * `EdfError::MalformedNumber` - the record count, signal count or a
///   samples-per-record field is not a number
pub fn decode_header(cursor: &mut ByteCursor<'_>, config: &DecoderConfig) -> Result<DecodedHeader> {
    let mut issues = Vec::new();

    let version = read_text(cursor, 8, "version")?;
    let patient_id = read_text(cursor, 80, "patient id")?;
    let recording_id = read_text(cursor, 80, "recording id")?;
    let start_date = read_text(cursor, 8, "start date")?;
    let start_time = read_text(cursor, 8, "start time")?;
    let header_bytes = read_number::<usize>(cursor, 8, "header size")?;
    let header_bytes = value_or_issue(header_bytes, "header size", None, &mut issues);
    let reserved = read_text(cursor, config.reserved_width.bytes(), "reserved")?;

    let data_records_count =
        read_number::<usize>(cursor, 8, "data records count")?.require("data records count", None)?;
    let data_record_duration = read_number::<f64>(cursor, 8, "data record duration")?;
    let data_record_duration =
        value_or_issue(data_record_duration, "data record duration", None, &mut issues)
            .unwrap_or(f64::NAN);
    let signal_count =
        read_number::<usize>(cursor, 4, "signal count")?.require("signal count", None)?;

    debug!(
        "EDF header parsed: version={:?}, data_records={}, record_duration={}, signals={}",
        version, data_records_count, data_record_duration, signal_count
    );

    let columns = read_signal_columns(cursor, signal_count)?;
    let signals = build_descriptors(columns, signal_count, config, &mut issues)?;

    if let Some(declared) = header_bytes {
        if declared != cursor.offset() {
            warn!(
                "Header declares {} bytes but {} bytes were read",
                declared,
                cursor.offset()
            );
        }
    }

    let header = FileHeader {
        version,
        patient_id,
        recording_id,
        start_date,
        start_time,
        header_bytes,
        reserved,
        data_records_count,
        data_record_duration,
    };

    Ok(DecodedHeader {
        header,
        signals,
        issues,
    })
}

fn truncated(field: &'static str, signal: Option<usize>) -> impl FnOnce(EdfError) -> EdfError {
    move |_| EdfError::TruncatedHeader { field, signal }
}

fn read_text(cursor: &mut ByteCursor<'_>, len: usize, field: &'static str) -> Result<String> {
    cursor.read_text(len).map_err(truncated(field, None))
}

fn read_number<T: std::str::FromStr>(
    cursor: &mut ByteCursor<'_>,
    len: usize,
    field: &'static str,
) -> Result<NumericText<T>> {
    cursor.read_numeric_text(len).map_err(truncated(field, None))
}

fn value_or_issue<T: std::str::FromStr>(
    number: NumericText<T>,
    field: &'static str,
    signal: Option<usize>,
    issues: &mut Vec<EdfError>,
) -> Option<T> {
    match number.require(field, signal) {
        Ok(value) => Some(value),
        Err(issue) => {
            warn!("{}", issue);
            issues.push(issue);
            None
        }
    }
}

/// Reads every attribute block: one column per attribute, one entry per signal.
fn read_signal_columns(cursor: &mut ByteCursor<'_>, signal_count: usize) -> Result<Vec<Vec<String>>> {
    let mut columns = Vec::with_capacity(SIGNAL_FIELDS.len());

    for (field, width) in SIGNAL_FIELDS {
        let mut column = Vec::new();
        for signal in 0..signal_count {
            let text = cursor
                .read_text(width)
                .map_err(truncated(field.name(), Some(signal)))?;
            column.push(text);
        }
        columns.push(column);
    }

    Ok(columns)
}

fn build_descriptors(
    mut columns: Vec<Vec<String>>,
    signal_count: usize,
    config: &DecoderConfig,
    issues: &mut Vec<EdfError>,
) -> Result<Vec<SignalDescriptor>> {
    let mut signals = Vec::with_capacity(signal_count);

    for index in 0..signal_count {
        let mut take = |field: SignalField| std::mem::take(&mut columns[field as usize][index]);

        let label = take(SignalField::Label);
        let transducer = take(SignalField::Transducer);
        let physical_dimension = take(SignalField::PhysicalDimension);
        let physical_min = NumericText::<f64>::parse(take(SignalField::PhysicalMin));
        let physical_max = NumericText::<f64>::parse(take(SignalField::PhysicalMax));
        let digital_min = NumericText::<i32>::parse(take(SignalField::DigitalMin));
        let digital_max = NumericText::<i32>::parse(take(SignalField::DigitalMax));
        let prefilter = take(SignalField::Prefilter);
        let samples_per_record = NumericText::<usize>::parse(take(SignalField::SamplesPerRecord));
        let reserved = take(SignalField::Reserved);

        let samples_per_record =
            samples_per_record.require(SignalField::SamplesPerRecord.name(), Some(index))?;
        let mut number = |text: NumericText<f64>, field: SignalField| {
            value_or_issue(text, field.name(), Some(index), issues).unwrap_or(f64::NAN)
        };
        let physical_min = number(physical_min, SignalField::PhysicalMin);
        let physical_max = number(physical_max, SignalField::PhysicalMax);
        let digital_min =
            value_or_issue(digital_min, SignalField::DigitalMin.name(), Some(index), issues);
        let digital_max =
            value_or_issue(digital_max, SignalField::DigitalMax.name(), Some(index), issues);

        let signal = SignalDescriptor {
            index,
            is_annotation_channel: config.annotation_match.matches(&label),
            label,
            transducer,
            physical_dimension,
            physical_min,
            physical_max,
            digital_min,
            digital_max,
            prefilter,
            samples_per_record,
            reserved,
        };

        // Annotation channels carry text, their digital range is never used.
        if !signal.is_annotation_channel {
            if let Err(issue) = signal.scale() {
                warn!("{}", issue);
                issues.push(issue);
            }
        }

        signals.push(signal);
    }

    Ok(signals)
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::doctest_utils::{EdfBuilder, SignalSpec};

    #[test]
    fn test_decode_header_fields() {
        let bytes = EdfBuilder::new(1.0)
            .patient("MCH-0234567 F 02-MAY-1951 Haagse_Harry")
            .signal(SignalSpec::new("EEG Fp1", 4).physical(-100.0, 100.0).digital(-1000, 1000))
            .signal(SignalSpec::annotations(8))
            .records(3)
            .build();
        let mut cursor = ByteCursor::new(&bytes);

        let decoded = decode_header(&mut cursor, &DecoderConfig::default()).unwrap();
        let header = &decoded.header;

        assert_eq!(header.version, "0");
        assert_eq!(header.patient_id, "MCH-0234567 F 02-MAY-1951 Haagse_Harry");
        assert_eq!(header.header_bytes, Some(256 * 3));
        assert_eq!(header.data_records_count, 3);
        assert_eq!(header.data_record_duration, 1.0);
        assert_eq!(cursor.offset(), 256 * 3);
        assert!(decoded.issues.is_empty());

        assert_eq!(decoded.signals.len(), 2);
        let eeg = &decoded.signals[0];
        assert_eq!(eeg.label, "EEG Fp1");
        assert_eq!(eeg.physical_dimension, "uV");
        assert_eq!(eeg.digital_min, Some(-1000));
        assert_eq!(eeg.samples_per_record, 4);
        assert!(!eeg.is_annotation_channel);
        assert!(decoded.signals[1].is_annotation_channel);
        assert_eq!(decoded.signals[1].index, 1);
    }

    #[test]
    fn test_attribute_major_order() {
        // Two signals: the second label must come right after the first one,
        // before any transducer field.
        let bytes = EdfBuilder::new(1.0)
            .signal(SignalSpec::new("A", 1).transducer("first"))
            .signal(SignalSpec::new("B", 1).transducer("second"))
            .build();
        let label_block = 256;
        assert_eq!(&bytes[label_block..label_block + 1], b"A");
        assert_eq!(&bytes[label_block + 16..label_block + 17], b"B");

        let mut cursor = ByteCursor::new(&bytes);
        let decoded = decode_header(&mut cursor, &DecoderConfig::default()).unwrap();
        assert_eq!(decoded.signals[0].transducer, "first");
        assert_eq!(decoded.signals[1].transducer, "second");
    }

    #[test]
    fn test_truncated_header() {
        let bytes = EdfBuilder::new(1.0).signal(SignalSpec::new("EEG", 1)).build();

        let mut cursor = ByteCursor::new(&bytes[..100]);
        let err = decode_header(&mut cursor, &DecoderConfig::default()).unwrap_err();
        assert_eq!(
            err,
            EdfError::TruncatedHeader {
                field: "recording id",
                signal: None
            }
        );

        let mut cursor = ByteCursor::new(&bytes[..300]);
        let err = decode_header(&mut cursor, &DecoderConfig::default()).unwrap_err();
        assert_eq!(
            err,
            EdfError::TruncatedHeader {
                field: "transducer type",
                signal: Some(0)
            }
        );
    }

    #[test]
    fn test_degenerate_scale_is_per_signal() {
        let bytes = EdfBuilder::new(1.0)
            .signal(SignalSpec::new("Flat", 1).digital(5, 5))
            .signal(SignalSpec::new("EEG", 1))
            .build();
        let mut cursor = ByteCursor::new(&bytes);

        let decoded = decode_header(&mut cursor, &DecoderConfig::default()).unwrap();
        assert_eq!(
            decoded.issues,
            vec![EdfError::DegenerateScale {
                signal: 0,
                label: "Flat".to_string()
            }]
        );
        assert!(decoded.signals[1].scale().is_ok());
    }

    #[test]
    fn test_malformed_numbers() {
        let bytes = EdfBuilder::new(1.0)
            .signal(SignalSpec::new("EEG", 1).raw_physical_min("n/a"))
            .build();
        let mut cursor = ByteCursor::new(&bytes);
        let decoded = decode_header(&mut cursor, &DecoderConfig::default()).unwrap();

        assert!(decoded.signals[0].physical_min.is_nan());
        assert_eq!(
            decoded.issues,
            vec![EdfError::MalformedNumber {
                field: "physical minimum",
                signal: Some(0),
                text: "n/a".to_string()
            }]
        );

        let bytes = EdfBuilder::new(1.0)
            .signal(SignalSpec::new("EEG", 1).raw_samples_per_record("many"))
            .build();
        let mut cursor = ByteCursor::new(&bytes);
        let err = decode_header(&mut cursor, &DecoderConfig::default()).unwrap_err();
        assert!(matches!(
            err,
            EdfError::MalformedNumber {
                field: "samples per record",
                signal: Some(0),
                ..
            }
        ));
    }

    #[test]
    fn test_base_reserved_width() {
        let bytes = EdfBuilder::new(0.5)
            .reserved_width(32)
            .signal(SignalSpec::new("EEG", 2))
            .records(1)
            .build();
        let config = DecoderConfig::default().with_reserved_width(crate::ReservedWidth::Base);
        let mut cursor = ByteCursor::new(&bytes);

        let decoded = decode_header(&mut cursor, &config).unwrap();
        assert_eq!(decoded.header.data_record_duration, 0.5);
        assert_eq!(decoded.header.data_records_count, 1);
        assert_eq!(decoded.signals[0].samples_per_record, 2);
    }
}
