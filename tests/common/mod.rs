//! Fixtures shared by the integration tests.

use std::path::PathBuf;

use chrono::NaiveDate;
use location_search::domain::location::Location;
use location_search::domain::types::LocationId;
use location_search::repository::StaticLocationSource;
use tempfile::TempDir;

/// Temporary directory removed when the value is dropped.
pub struct TestDir {
    dir: TempDir,
}

impl TestDir {
    pub fn new() -> Self {
        Self {
            dir: tempfile::tempdir().expect("create temp dir"),
        }
    }

    pub fn path(&self, name: &str) -> PathBuf {
        self.dir.path().join(name)
    }
}

pub fn date(y: i32, m: u32, d: u32) -> Option<NaiveDate> {
    NaiveDate::from_ymd_opt(y, m, d)
}

/// 32 active locations plus two archived ones. Every fourth one offers
/// Moderna, the rest Pfizer.
pub fn locations() -> Vec<Location> {
    let mut locations: Vec<Location> = (1..=32)
        .map(|i| {
            let mut location = Location::new(
                LocationId::new(format!("a0B{i:03}")).unwrap(),
                format!("Clinic {i:02}"),
            );
            location.address = Some(format!("{i} Main St"));
            location.vaccine_type = Some(if i % 4 == 0 { "Moderna" } else { "Pfizer" }.into());
            location.start_date = date(2024, 5, (i % 28) + 1);
            location.close_date = date(2024, 6, (i % 28) + 1);
            location.active = true;
            location
        })
        .collect();

    for i in 33..=34 {
        let mut location = Location::new(
            LocationId::new(format!("a0B{i:03}")).unwrap(),
            format!("Closed Hall {i}"),
        );
        location.archived = true;
        locations.push(location);
    }
    locations
}

pub fn source() -> StaticLocationSource {
    StaticLocationSource::new(locations())
}
