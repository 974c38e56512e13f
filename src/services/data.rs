use crate::models::{Donor, Hospital};
use chrono::NaiveDate;
use serde::Deserialize;
use std::fs::File;
use std::io::Read;
use std::path::Path;
use thiserror::Error;

/// Errors that can occur while loading snapshot files
///
/// These are fatal at startup: a service without its donor and hospital
/// snapshots has nothing to match against.
#[derive(Debug, Error)]
pub enum DataError {
    #[error("I/O error: {0}")]
    Io(#[from] std::io::Error),

    #[error("CSV error: {0}")]
    Csv(#[from] csv::Error),
}

/// Immutable donor/hospital snapshot shared by all matching operations
#[derive(Debug, Clone)]
pub struct Snapshot {
    pub donors: Vec<Donor>,
    pub hospitals: Vec<Hospital>,
}

impl Snapshot {
    /// Load both snapshot files
    pub fn load<P: AsRef<Path>, Q: AsRef<Path>>(
        donors_path: P,
        hospitals_path: Q,
    ) -> Result<Self, DataError> {
        Ok(Self {
            donors: load_donors(donors_path)?,
            hospitals: load_hospitals(hospitals_path)?,
        })
    }
}

/// Wire format of a donor row as it appears in donors.csv
#[derive(Debug, Deserialize)]
struct DonorRecord {
    id: u32,
    blood_type: String,
    latitude: f64,
    longitude: f64,
    #[serde(default)]
    last_donation: Option<String>,
    #[serde(default)]
    phone: Option<String>,
}

/// Wire format of a hospital row as it appears in hospitals.csv
#[derive(Debug, Deserialize)]
struct HospitalRecord {
    id: u32,
    name: String,
    latitude: f64,
    longitude: f64,
    blood_type: String,
    stock: u32,
}

/// Load the donor snapshot from a CSV file
pub fn load_donors<P: AsRef<Path>>(path: P) -> Result<Vec<Donor>, DataError> {
    let file = File::open(path.as_ref())?;
    let donors = read_donors(file)?;
    tracing::info!("loaded {} donors from {}", donors.len(), path.as_ref().display());
    Ok(donors)
}

/// Load the hospital snapshot from a CSV file
pub fn load_hospitals<P: AsRef<Path>>(path: P) -> Result<Vec<Hospital>, DataError> {
    let file = File::open(path.as_ref())?;
    let hospitals = read_hospitals(file)?;
    tracing::info!(
        "loaded {} hospital stock lines from {}",
        hospitals.len(),
        path.as_ref().display()
    );
    Ok(hospitals)
}

/// Parse donor rows, skipping malformed records with a warning
///
/// Row-level problems (bad field types, unknown blood type) drop the row;
/// only reader-level failures are returned as errors.
pub fn read_donors<R: Read>(reader: R) -> Result<Vec<Donor>, DataError> {
    let mut rdr = csv::Reader::from_reader(reader);
    let mut donors = Vec::new();

    for row in rdr.deserialize::<DonorRecord>() {
        let record = match row {
            Ok(record) => record,
            Err(e) => {
                tracing::warn!("skipping malformed donor row: {}", e);
                continue;
            }
        };

        let blood_type = match record.blood_type.parse() {
            Ok(bt) => bt,
            Err(e) => {
                tracing::warn!("skipping donor {}: {}", record.id, e);
                continue;
            }
        };

        donors.push(Donor {
            id: record.id,
            blood_type,
            latitude: record.latitude,
            longitude: record.longitude,
            last_donation: parse_donation_date(record.id, record.last_donation.as_deref()),
            phone: record.phone,
        });
    }

    Ok(donors)
}

/// Parse hospital rows, skipping malformed records with a warning
pub fn read_hospitals<R: Read>(reader: R) -> Result<Vec<Hospital>, DataError> {
    let mut rdr = csv::Reader::from_reader(reader);
    let mut hospitals = Vec::new();

    for row in rdr.deserialize::<HospitalRecord>() {
        let record = match row {
            Ok(record) => record,
            Err(e) => {
                tracing::warn!("skipping malformed hospital row: {}", e);
                continue;
            }
        };

        let blood_type = match record.blood_type.parse() {
            Ok(bt) => bt,
            Err(e) => {
                tracing::warn!("skipping hospital {}: {}", record.id, e);
                continue;
            }
        };

        hospitals.push(Hospital {
            id: record.id,
            name: record.name,
            latitude: record.latitude,
            longitude: record.longitude,
            blood_type,
            stock: record.stock,
        });
    }

    Ok(hospitals)
}

/// An unparseable last-donation date degrades to "never recorded" rather
/// than dropping an otherwise usable donor
fn parse_donation_date(donor_id: u32, raw: Option<&str>) -> Option<NaiveDate> {
    let raw = raw?.trim();
    if raw.is_empty() {
        return None;
    }
    match NaiveDate::parse_from_str(raw, "%Y-%m-%d") {
        Ok(date) => Some(date),
        Err(e) => {
            tracing::warn!("donor {}: unparseable last_donation '{}': {}", donor_id, raw, e);
            None
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::core::compat::BloodType;

    const DONORS_CSV: &str = "\
id,blood_type,latitude,longitude,last_donation,phone
1,O-,20.2961,85.8245,2024-11-02,+919876543210
2,AB+,20.4625,85.8828,,+919876500000
3,X+,20.0,85.0,2024-01-01,+919876511111
4,A+,not-a-number,85.0,2024-01-01,+919876522222
5,B-,19.8134,85.8315,garbage-date,+919876533333
";

    const HOSPITALS_CSV: &str = "\
id,name,latitude,longitude,blood_type,stock
1,Capital Hospital,20.2700,85.8400,O-,3
2,SCB Medical,20.4700,85.8900,banana,4
3,District HQ,19.8100,85.8300,A+,9
";

    #[test]
    fn test_read_donors_skips_bad_rows() {
        let donors = read_donors(DONORS_CSV.as_bytes()).unwrap();

        // Rows 3 (unknown blood type) and 4 (bad latitude) are dropped
        let ids: Vec<u32> = donors.iter().map(|d| d.id).collect();
        assert_eq!(ids, vec![1, 2, 5]);
    }

    #[test]
    fn test_read_donors_fields() {
        let donors = read_donors(DONORS_CSV.as_bytes()).unwrap();

        assert_eq!(donors[0].blood_type, BloodType::ONeg);
        assert_eq!(
            donors[0].last_donation,
            NaiveDate::from_ymd_opt(2024, 11, 2)
        );
        assert_eq!(donors[0].phone.as_deref(), Some("+919876543210"));

        // Empty date field is simply absent
        assert_eq!(donors[1].last_donation, None);

        // Garbage date degrades to None without dropping the donor
        assert_eq!(donors[2].id, 5);
        assert_eq!(donors[2].last_donation, None);
    }

    #[test]
    fn test_read_hospitals_skips_bad_rows() {
        let hospitals = read_hospitals(HOSPITALS_CSV.as_bytes()).unwrap();

        let ids: Vec<u32> = hospitals.iter().map(|h| h.id).collect();
        assert_eq!(ids, vec![1, 3]);
        assert_eq!(hospitals[0].name, "Capital Hospital");
        assert_eq!(hospitals[0].stock, 3);
    }

    #[test]
    fn test_load_missing_file_is_fatal() {
        let result = load_donors("/nonexistent/donors.csv");
        assert!(matches!(result, Err(DataError::Io(_))));
    }
}
