//! Durable key-value settings.
//!
//! The only thing persisted today is the last known location, stored as two
//! string values so the file stays readable and hand-editable.

use std::{
    collections::BTreeMap,
    fs,
    path::PathBuf,
};

use parking_lot::Mutex;

use crate::{Coordinate, StoreError};

pub const LAST_LATITUDE_KEY: &str = "LastLatitude";
pub const LAST_LONGITUDE_KEY: &str = "LastLongitude";

/// String key-value storage shared by everything that needs to persist state.
pub trait SettingsStore: Send + Sync {
    fn get(&self, key: &str) -> Option<String>;
    fn set(&self, key: &str, value: String) -> Result<(), StoreError>;
}

/// Settings held in memory for the lifetime of the process.
#[derive(Debug, Default)]
pub struct MemorySettings {
    values: Mutex<BTreeMap<String, String>>,
}

impl MemorySettings {
    pub fn new() -> Self {
        Self::default()
    }
}

impl SettingsStore for MemorySettings {
    fn get(&self, key: &str) -> Option<String> {
        self.values.lock().get(key).cloned()
    }

    fn set(&self, key: &str, value: String) -> Result<(), StoreError> {
        self.values.lock().insert(key.to_owned(), value);
        Ok(())
    }
}

/// Settings backed by a flat TOML file.
///
/// The file is read once at open and rewritten in full on every `set`.
/// Concurrent writers are last-write-wins.
#[derive(Debug)]
pub struct FileSettings {
    path: PathBuf,
    values: Mutex<BTreeMap<String, String>>,
}

impl FileSettings {
    /// Open the settings file, treating a missing file as empty.
    pub fn open(path: impl Into<PathBuf>) -> Result<Self, StoreError> {
        let path = path.into();
        let values = if path.exists() {
            toml::from_str(&fs::read_to_string(&path)?)?
        } else {
            BTreeMap::new()
        };

        Ok(Self {
            path,
            values: Mutex::new(values),
        })
    }

    fn persist(&self, values: &BTreeMap<String, String>) -> Result<(), StoreError> {
        if let Some(parent) = self.path.parent() {
            fs::create_dir_all(parent)?;
        }
        fs::write(&self.path, toml::to_string(values)?)?;
        Ok(())
    }
}

impl SettingsStore for FileSettings {
    fn get(&self, key: &str) -> Option<String> {
        self.values.lock().get(key).cloned()
    }

    fn set(&self, key: &str, value: String) -> Result<(), StoreError> {
        let mut values = self.values.lock();
        values.insert(key.to_owned(), value);
        self.persist(&values)
    }
}

/// Reads and writes the last known location through a [`SettingsStore`].
pub struct LastKnownLocation;

impl LastKnownLocation {
    /// Returns `None` if either key is missing or holds something that is not a number.
    pub fn load(store: &dyn SettingsStore) -> Option<Coordinate> {
        let latitude = store.get(LAST_LATITUDE_KEY)?;
        let longitude = store.get(LAST_LONGITUDE_KEY)?;

        match (latitude.parse::<f64>(), longitude.parse::<f64>()) {
            (Ok(latitude), Ok(longitude)) => Some(Coordinate::new(latitude, longitude)),
            _ => {
                tracing::warn!(%latitude, %longitude, "ignoring unparsable last known location");
                None
            }
        }
    }

    pub fn save(store: &dyn SettingsStore, coordinate: Coordinate) -> Result<(), StoreError> {
        store.set(LAST_LATITUDE_KEY, coordinate.latitude.to_string())?;
        store.set(LAST_LONGITUDE_KEY, coordinate.longitude.to_string())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn last_known_location_is_none_until_saved() {
        let store = MemorySettings::new();
        assert_eq!(LastKnownLocation::load(&store), None);

        LastKnownLocation::save(&store, Coordinate::new(51.5, -0.12)).expect("save");
        assert_eq!(
            LastKnownLocation::load(&store),
            Some(Coordinate::new(51.5, -0.12))
        );
    }

    #[test]
    fn later_saves_overwrite_earlier_ones() {
        let store = MemorySettings::new();
        LastKnownLocation::save(&store, Coordinate::new(1.0, 2.0)).expect("save");
        LastKnownLocation::save(&store, Coordinate::new(3.0, 4.0)).expect("save");

        assert_eq!(LastKnownLocation::load(&store), Some(Coordinate::new(3.0, 4.0)));
    }

    #[test]
    fn values_are_stored_as_strings() {
        let store = MemorySettings::new();
        LastKnownLocation::save(&store, Coordinate::new(51.5, -0.12)).expect("save");

        assert_eq!(store.get(LAST_LATITUDE_KEY).as_deref(), Some("51.5"));
        assert_eq!(store.get(LAST_LONGITUDE_KEY).as_deref(), Some("-0.12"));
    }

    #[test]
    fn garbage_reads_as_none() {
        let store = MemorySettings::new();
        store.set(LAST_LATITUDE_KEY, "north".into()).expect("set");
        store.set(LAST_LONGITUDE_KEY, "10".into()).expect("set");

        assert_eq!(LastKnownLocation::load(&store), None);
    }

    #[test]
    fn half_written_location_reads_as_none() {
        let store = MemorySettings::new();
        store.set(LAST_LATITUDE_KEY, "10".into()).expect("set");

        assert_eq!(LastKnownLocation::load(&store), None);
    }

    #[test]
    fn file_settings_survive_reopen() {
        let dir = tempfile::tempdir().expect("tempdir");
        let path = dir.path().join("nested").join("settings.toml");

        let store = FileSettings::open(&path).expect("open missing file");
        LastKnownLocation::save(&store, Coordinate::new(48.85, 2.35)).expect("save");
        drop(store);

        let reopened = FileSettings::open(&path).expect("reopen");
        assert_eq!(
            LastKnownLocation::load(&reopened),
            Some(Coordinate::new(48.85, 2.35))
        );

        let contents = fs::read_to_string(&path).expect("read back");
        assert!(contents.contains("LastLatitude = \"48.85\""));
    }

    #[test]
    fn file_settings_reject_malformed_file() {
        let dir = tempfile::tempdir().expect("tempdir");
        let path = dir.path().join("settings.toml");
        fs::write(&path, "this is = = not toml").expect("write");

        let err = FileSettings::open(&path).unwrap_err();
        assert!(matches!(err, StoreError::Parse(_)));
    }
}
