use chrono::{NaiveDate, NaiveDateTime, NaiveTime};

use crate::types::{PatientInfo, RecordingInfo};

/// Splits a dotted `aa.bb.cc` header field into three integers.
fn split_dotted(s: &str) -> Option<(u32, u32, u32)> {
    let mut parts = s.trim().split('.').map(|p| p.trim().parse::<u32>().ok());
    let first = parts.next()??;
    let second = parts.next()??;
    let third = parts.next()??;
    if parts.next().is_some() {
        return None;
    }
    Some((first, second, third))
}

/// Parses the `dd.mm.yy` start date and `hh.mm.ss` start time fields.
pub fn parse_start_datetime(date: &str, time: &str) -> Option<NaiveDateTime> {
    let (day, month, yy) = split_dotted(date)?;
    let year = if yy > 84 { 1900 + yy } else { 2000 + yy };
    let date = NaiveDate::from_ymd_opt(year as i32, month, day)?;

    let (hour, minute, second) = split_dotted(time)?;
    let time = NaiveTime::from_hms_opt(hour, minute, second)?;

    Some(NaiveDateTime::new(date, time))
}

/// Splits the EDF+ patient field: `code sex birthdate name additional...`
pub fn parse_patient_field(field: &str) -> PatientInfo {
    let parts: Vec<&str> = field.split_whitespace().collect();
    let part = |i: usize| parts.get(i).copied().unwrap_or_default().to_string();

    PatientInfo {
        code: part(0),
        sex: part(1),
        birthdate: part(2),
        name: part(3),
        additional: parts.get(4..).map(|s| s.join(" ")).unwrap_or_default(),
    }
}

/// Splits the EDF+ recording field: `Startdate date admincode technician equipment additional...`
pub fn parse_recording_field(field: &str) -> RecordingInfo {
    let parts: Vec<&str> = field.split_whitespace().collect();
    let part = |i: usize| parts.get(i).copied().unwrap_or_default().to_string();

    RecordingInfo {
        start_date: part(1),
        admin_code: part(2),
        technician: part(3),
        equipment: part(4),
        additional: parts.get(5..).map(|s| s.join(" ")).unwrap_or_default(),
    }
}
