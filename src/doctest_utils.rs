// Internal utilities for documentation and integration tests.
// Builds synthetic EDF buffers in memory, byte for byte in the on-disk layout.

use crate::types::FileHeader;

/// One channel of a synthetic buffer.
#[derive(Debug, Clone)]
pub struct SignalSpec {
    label: String,
    transducer: String,
    physical_dimension: String,
    physical_min: String,
    physical_max: String,
    digital_min: String,
    digital_max: String,
    prefilter: String,
    samples_per_record: String,
    samples: Vec<Vec<i32>>,
    tals: Vec<(usize, Vec<u8>)>,
    is_annotation: bool,
}

impl SignalSpec {
    pub fn new(label: &str, samples_per_record: usize) -> Self {
        SignalSpec {
            label: label.to_string(),
            transducer: "AgAgCl electrode".to_string(),
            physical_dimension: "uV".to_string(),
            physical_min: "-100".to_string(),
            physical_max: "100".to_string(),
            digital_min: "-32768".to_string(),
            digital_max: "32767".to_string(),
            prefilter: "HP:0.1Hz LP:75Hz".to_string(),
            samples_per_record: samples_per_record.to_string(),
            samples: Vec::new(),
            tals: Vec::new(),
            is_annotation: false,
        }
    }

    /// An `EDF Annotations` channel `samples_per_record` two-byte words wide.
    pub fn annotations(samples_per_record: usize) -> Self {
        let mut channel = SignalSpec::new("EDF Annotations", samples_per_record);
        channel.transducer = String::new();
        channel.physical_dimension = String::new();
        channel.physical_min = "-1".to_string();
        channel.physical_max = "1".to_string();
        channel.prefilter = String::new();
        channel.is_annotation = true;
        channel
    }

    pub fn transducer(mut self, transducer: &str) -> Self {
        self.transducer = transducer.to_string();
        self
    }

    pub fn dimension(mut self, dimension: &str) -> Self {
        self.physical_dimension = dimension.to_string();
        self
    }

    pub fn physical(mut self, min: f64, max: f64) -> Self {
        self.physical_min = min.to_string();
        self.physical_max = max.to_string();
        self
    }

    pub fn digital(mut self, min: i32, max: i32) -> Self {
        self.digital_min = min.to_string();
        self.digital_max = max.to_string();
        self
    }

    pub fn raw_physical_min(mut self, text: &str) -> Self {
        self.physical_min = text.to_string();
        self
    }

    pub fn raw_samples_per_record(mut self, text: &str) -> Self {
        self.samples_per_record = text.to_string();
        self
    }

    /// Digital values, one block per record. Missing values are zero.
    pub fn samples(mut self, records: Vec<Vec<i32>>) -> Self {
        self.samples = records;
        self
    }

    /// Raw TAL bytes for one record, NUL padded to the channel width.
    pub fn tal(mut self, record: usize, bytes: &[u8]) -> Self {
        self.tals.push((record, bytes.to_vec()));
        self
    }

    fn samples_per_record(&self) -> usize {
        self.samples_per_record.parse().unwrap_or(0)
    }
}

/// Assembles a complete EDF buffer: fixed header, attribute-major signal
/// header, then interleaved data records.
#[derive(Debug, Clone)]
pub struct EdfBuilder {
    patient: String,
    recording: String,
    start_date: String,
    start_time: String,
    reserved: String,
    reserved_width: usize,
    record_duration: f64,
    records: usize,
    sample_width: usize,
    signals: Vec<SignalSpec>,
}

impl EdfBuilder {
    pub fn new(record_duration: f64) -> Self {
        EdfBuilder {
            patient: "X X X X".to_string(),
            recording: "Startdate X X X X".to_string(),
            start_date: "17.04.01".to_string(),
            start_time: "11.25.00".to_string(),
            reserved: "EDF+C".to_string(),
            reserved_width: 44,
            record_duration,
            records: 0,
            sample_width: 2,
            signals: Vec::new(),
        }
    }

    pub fn patient(mut self, patient: &str) -> Self {
        self.patient = patient.to_string();
        self
    }

    pub fn recording(mut self, recording: &str) -> Self {
        self.recording = recording.to_string();
        self
    }

    pub fn reserved(mut self, reserved: &str) -> Self {
        self.reserved = reserved.to_string();
        self
    }

    pub fn reserved_width(mut self, width: usize) -> Self {
        self.reserved_width = width;
        self
    }

    pub fn sample_width(mut self, width: usize) -> Self {
        self.sample_width = width;
        self
    }

    pub fn records(mut self, records: usize) -> Self {
        self.records = records;
        self
    }

    pub fn signal(mut self, signal: SignalSpec) -> Self {
        self.signals.push(signal);
        self
    }

    pub fn build(&self) -> Vec<u8> {
        let header_len = 8 + 80 + 80 + 8 + 8 + 8 + self.reserved_width + 8 + 8 + 4
            + self.signals.len() * 256;
        let mut out = Vec::with_capacity(header_len);

        push_field(&mut out, "0", 8);
        push_field(&mut out, &self.patient, 80);
        push_field(&mut out, &self.recording, 80);
        push_field(&mut out, &self.start_date, 8);
        push_field(&mut out, &self.start_time, 8);
        push_field(&mut out, &header_len.to_string(), 8);
        push_field(&mut out, &self.reserved, self.reserved_width);
        push_field(&mut out, &self.records.to_string(), 8);
        push_field(&mut out, &self.record_duration.to_string(), 8);
        push_field(&mut out, &self.signals.len().to_string(), 4);

        let columns: [(fn(&SignalSpec) -> &str, usize); 10] = [
            (|s| s.label.as_str(), 16),
            (|s| s.transducer.as_str(), 80),
            (|s| s.physical_dimension.as_str(), 8),
            (|s| s.physical_min.as_str(), 8),
            (|s| s.physical_max.as_str(), 8),
            (|s| s.digital_min.as_str(), 8),
            (|s| s.digital_max.as_str(), 8),
            (|s| s.prefilter.as_str(), 80),
            (|s| s.samples_per_record.as_str(), 8),
            (|_| "", 32),
        ];
        for (field, width) in columns {
            for signal in &self.signals {
                push_field(&mut out, field(signal), width);
            }
        }

        for record in 0..self.records {
            for signal in &self.signals {
                let spr = signal.samples_per_record();
                if signal.is_annotation {
                    let mut block = vec![0u8; spr * self.sample_width];
                    if let Some((_, tal)) = signal.tals.iter().find(|(r, _)| *r == record) {
                        let len = tal.len().min(block.len());
                        block[..len].copy_from_slice(&tal[..len]);
                    }
                    out.extend_from_slice(&block);
                } else {
                    let values = signal.samples.get(record);
                    for i in 0..spr {
                        let value = values.and_then(|v| v.get(i)).copied().unwrap_or(0);
                        out.extend_from_slice(&value.to_le_bytes()[..self.sample_width]);
                    }
                }
            }
        }

        out
    }
}

fn push_field(out: &mut Vec<u8>, text: &str, width: usize) {
    let mut bytes = text.as_bytes().to_vec();
    bytes.resize(width, b' ');
    out.extend_from_slice(&bytes);
}

/// One second records of a 10 Hz sine on a single 256 Hz channel.
pub fn create_simple_test_buffer() -> Vec<u8> {
    EdfBuilder::new(1.0)
        .patient("DOC001 M 01-JAN-1990 Test_Patient")
        .signal(
            SignalSpec::new("EEG Fp1", 256)
                .physical(-200.0, 200.0)
                .samples(sine_records(10.0, 256, 4, 8000.0)),
        )
        .records(4)
        .build()
}

/// Two EEG channels, one ECG channel and an annotation channel.
pub fn create_multi_channel_test_buffer() -> Vec<u8> {
    let records = 5;
    let mut annotations = SignalSpec::annotations(30);
    for record in 0..records {
        let tal = if record == 2 {
            format!("+{}\x14\x14\x00+2.5\x150.8\x14Eye blink\x14\x00", record)
        } else {
            format!("+{}\x14\x14\x00", record)
        };
        annotations = annotations.tal(record, tal.as_bytes());
    }

    EdfBuilder::new(1.0)
        .patient("DOC002 F 15-MAR-1985 Multi_Channel_Test")
        .signal(
            SignalSpec::new("EEG C3", 256)
                .physical(-200.0, 200.0)
                .samples(sine_records(10.0, 256, records, 8000.0)),
        )
        .signal(
            SignalSpec::new("EEG C4", 256)
                .physical(-200.0, 200.0)
                .samples(sine_records(12.0, 256, records, 6000.0)),
        )
        .signal(
            SignalSpec::new("ECG", 128)
                .dimension("mV")
                .physical(-5.0, 5.0)
                .samples(sine_records(1.2, 128, records, 20000.0)),
        )
        .signal(annotations)
        .records(records)
        .build()
}

/// Header of [`create_simple_test_buffer`].
pub fn sample_header() -> FileHeader {
    FileHeader {
        version: "0".to_string(),
        patient_id: "DOC001 M 01-JAN-1990 Test_Patient".to_string(),
        recording_id: "Startdate X X X X".to_string(),
        start_date: "17.04.01".to_string(),
        start_time: "11.25.00".to_string(),
        header_bytes: Some(512),
        reserved: "EDF+C".to_string(),
        data_records_count: 4,
        data_record_duration: 1.0,
    }
}

fn sine_records(frequency: f64, samples_per_record: usize, records: usize, amplitude: f64) -> Vec<Vec<i32>> {
    (0..records)
        .map(|record| {
            (0..samples_per_record)
                .map(|i| {
                    let t = (record * samples_per_record + i) as f64 / samples_per_record as f64;
                    (amplitude * (2.0 * std::f64::consts::PI * frequency * t).sin()) as i32
                })
                .collect()
        })
        .collect()
}
