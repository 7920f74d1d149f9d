use chrono::NaiveDateTime;

use crate::config::Scaling;
use crate::error::{EdfError, Result};
use crate::utils::{parse_patient_field, parse_recording_field, parse_start_datetime};

/// File-level metadata from the fixed part of the header.
#[derive(Debug, Clone, PartialEq)]
pub struct FileHeader {
    pub version: String,
    pub patient_id: String,
    pub recording_id: String,
    /// `dd.mm.yy`
    pub start_date: String,
    /// `hh.mm.ss`
    pub start_time: String,
    /// Declared header size in bytes, `None` if the field was not a number.
    pub header_bytes: Option<usize>,
    pub reserved: String,
    pub data_records_count: usize,
    /// Seconds per data record, `NaN` if the field was not a number.
    pub data_record_duration: f64,
}

impl FileHeader {
    /// Total recording length in seconds.
    pub fn recording_duration(&self) -> f64 {
        self.data_record_duration * self.data_records_count as f64
    }

    /// Start of the recording, if the date and time fields are well formed.
    ///
    /// Two-digit years follow the EDF clipping rule: `85..=99` map to the
    /// 1900s, everything else to the 2000s.
    ///
    /// ```rust
    /// # let mut header = edfdecode::doctest_utils::sample_header();
    /// header.start_date = "17.04.01".to_string();
    /// header.start_time = "11.25.00".to_string();
    /// let start = header.start_datetime().unwrap();
    /// assert_eq!(start.to_string(), "2001-04-17 11:25:00");
    /// ```
    pub fn start_datetime(&self) -> Option<NaiveDateTime> {
        parse_start_datetime(&self.start_date, &self.start_time)
    }

    pub fn is_edf_plus(&self) -> bool {
        self.reserved.starts_with("EDF+")
    }

    /// EDF+D files may have gaps between data records.
    pub fn is_discontinuous(&self) -> bool {
        self.reserved.starts_with("EDF+D")
    }

    /// Splits the EDF+ patient field into its sub-fields.
    pub fn patient(&self) -> PatientInfo {
        parse_patient_field(&self.patient_id)
    }

    /// Splits the EDF+ recording field into its sub-fields.
    pub fn recording(&self) -> RecordingInfo {
        parse_recording_field(&self.recording_id)
    }
}

/// EDF+ patient sub-fields: `code sex birthdate name additional...`
#[derive(Debug, Clone, Default, PartialEq)]
pub struct PatientInfo {
    pub code: String,
    pub sex: String,
    pub birthdate: String,
    pub name: String,
    pub additional: String,
}

/// EDF+ recording sub-fields: `Startdate date admincode technician equipment additional...`
#[derive(Debug, Clone, Default, PartialEq)]
pub struct RecordingInfo {
    pub start_date: String,
    pub admin_code: String,
    pub technician: String,
    pub equipment: String,
    pub additional: String,
}

/// Per-channel header fields.
#[derive(Debug, Clone, PartialEq)]
pub struct SignalDescriptor {
    /// Position of the signal in the header.
    pub index: usize,
    pub label: String,
    pub transducer: String,
    pub physical_dimension: String,
    pub physical_min: f64,
    pub physical_max: f64,
    /// `None` if the field was not an integer.
    pub digital_min: Option<i32>,
    pub digital_max: Option<i32>,
    pub prefilter: String,
    pub samples_per_record: usize,
    pub reserved: String,
    pub is_annotation_channel: bool,
}

impl SignalDescriptor {
    /// Physical units per digital step.
    ///
    /// # Errors
    ///
    /// [`EdfError::DegenerateScale`] when the digital range is empty or unknown.
    pub fn scale(&self) -> Result<f64> {
        match (self.digital_min, self.digital_max) {
            (Some(min), Some(max)) if min != max => {
                Ok((self.physical_max - self.physical_min) / (max as f64 - min as f64))
            }
            _ => Err(EdfError::DegenerateScale {
                signal: self.index,
                label: self.label.clone(),
            }),
        }
    }

    /// Physical value of digital zero under the affine transform.
    pub fn offset(&self) -> Result<f64> {
        let scale = self.scale()?;
        let digital_min = self.digital_min.unwrap_or_default();
        Ok(self.physical_min - digital_min as f64 * scale)
    }

    pub fn to_physical(&self, raw: i32, scale: f64, scaling: Scaling) -> f64 {
        match scaling {
            Scaling::Multiplicative => raw as f64 * scale,
            Scaling::Affine => {
                let digital_min = self.digital_min.unwrap_or_default();
                self.physical_min + (raw as f64 - digital_min as f64) * scale
            }
        }
    }

    /// Samples per second for this channel.
    pub fn sampling_rate(&self, data_record_duration: f64) -> f64 {
        self.samples_per_record as f64 / data_record_duration
    }
}

/// One annotation entry from a TAL.
///
/// All notes of one TAL share its onset and duration.
#[derive(Debug, Clone, Default, PartialEq)]
pub struct Annotation {
    /// Seconds from recording start.
    pub onset: f64,
    /// Seconds, `None` when the TAL has no duration field.
    pub duration: Option<f64>,
    pub notes: Vec<String>,
}

impl Annotation {
    /// Duration in seconds, zero when absent.
    pub fn duration_secs(&self) -> f64 {
        self.duration.unwrap_or(0.0)
    }

    /// EDF+ starts every annotation record with a TAL that only marks the
    /// record start time: no duration and no notes.
    pub fn is_time_keeping(&self) -> bool {
        self.duration.is_none() && self.notes.is_empty()
    }
}

/// An ordinary channel with its decoded sample blocks, one per data record.
#[derive(Debug, Clone, PartialEq)]
pub struct DecodedSignal {
    pub descriptor: SignalDescriptor,
    pub records: Vec<Vec<f64>>,
}

/// An annotation channel with the entries of all its records in file order.
#[derive(Debug, Clone, PartialEq)]
pub struct AnnotationChannel {
    pub descriptor: SignalDescriptor,
    pub annotations: Vec<Annotation>,
}

#[cfg(test)]
mod tests {
    use super::*;

    fn descriptor(physical: (f64, f64), digital: (i32, i32)) -> SignalDescriptor {
        SignalDescriptor {
            index: 0,
            label: "EEG Fp1".to_string(),
            transducer: String::new(),
            physical_dimension: "uV".to_string(),
            physical_min: physical.0,
            physical_max: physical.1,
            digital_min: Some(digital.0),
            digital_max: Some(digital.1),
            prefilter: String::new(),
            samples_per_record: 256,
            reserved: String::new(),
            is_annotation_channel: false,
        }
    }

    #[test]
    fn test_scale() {
        let signal = descriptor((-100.0, 100.0), (-1000, 1000));
        assert_eq!(signal.scale().unwrap(), 0.1);
        assert_eq!(signal.to_physical(500, 0.1, Scaling::Multiplicative), 50.0);
    }

    #[test]
    fn test_degenerate_scale() {
        let signal = descriptor((-100.0, 100.0), (7, 7));
        assert_eq!(
            signal.scale(),
            Err(EdfError::DegenerateScale {
                signal: 0,
                label: "EEG Fp1".to_string()
            })
        );

        let mut unknown = descriptor((-100.0, 100.0), (0, 10));
        unknown.digital_max = None;
        assert!(unknown.scale().is_err());
    }

    #[test]
    fn test_affine_keeps_offset() {
        // Asymmetric digital range: 0..=1000 maps to 0..=10 mV
        let signal = descriptor((0.0, 10.0), (0, 1000));
        let scale = signal.scale().unwrap();
        assert!((signal.to_physical(1000, scale, Scaling::Affine) - 10.0).abs() < 1e-9);

        let signal = descriptor((5.0, 15.0), (0, 1000));
        let scale = signal.scale().unwrap();
        assert!((signal.to_physical(0, scale, Scaling::Affine) - 5.0).abs() < 1e-9);
        assert_eq!(signal.to_physical(0, scale, Scaling::Multiplicative), 0.0);
        assert!((signal.offset().unwrap() - 5.0).abs() < 1e-9);
    }

    #[test]
    fn test_sampling_rate() {
        let signal = descriptor((-1.0, 1.0), (-1, 1));
        assert_eq!(signal.sampling_rate(0.5), 512.0);
    }

    #[test]
    fn test_time_keeping_annotation() {
        let marker = Annotation {
            onset: 3.0,
            duration: None,
            notes: Vec::new(),
        };
        assert!(marker.is_time_keeping());
        assert_eq!(marker.duration_secs(), 0.0);

        let silent_span = Annotation {
            onset: 3.4,
            duration: Some(1.5),
            notes: Vec::new(),
        };
        assert!(!silent_span.is_time_keeping());
    }
}
