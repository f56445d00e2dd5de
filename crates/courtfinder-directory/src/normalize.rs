//! Normalization from tagged-scalar records to [`courtfinder_core::CourtLocation`].
//!
//! Each record is decoded on its own. Required fields (`locationId`, `name`,
//! `latitude`, `longitude`, and `courtId` on every court) must be present
//! with the right tag; nothing is silently defaulted except `address`
//! (placeholder) and the `courts` list (empty). A court's `startTime` and
//! `queue` never reject a record: malformed values are logged and dropped.

use std::collections::{BTreeMap, HashSet};

use courtfinder_core::{Coordinate, Court, CourtLocation, QueueEntry, DEFAULT_ADDRESS};

use crate::attribute::{json_kind, AttributeValue};
use crate::error::NormalizeError;

const LOCATION_FIELDS: [&str; 6] = [
    "locationId",
    "name",
    "address",
    "latitude",
    "longitude",
    "courts",
];

/// Result of normalizing a whole directory response.
#[derive(Debug, Clone, Default, PartialEq)]
pub struct DirectoryLoad {
    /// Valid locations, in response order.
    pub locations: Vec<CourtLocation>,
    /// Records that were skipped, in response order.
    pub rejected: Vec<NormalizeError>,
}

/// Normalizes every record, skipping (and logging) the ones that fail.
///
/// A `locationId` seen earlier in the same response is rejected as a
/// duplicate; the first occurrence wins.
#[must_use]
pub fn normalize_directory(records: &[serde_json::Value]) -> DirectoryLoad {
    let mut load = DirectoryLoad::default();
    let mut seen = HashSet::new();

    for (index, record) in records.iter().enumerate() {
        let result = normalize_location(index, record).and_then(|location| {
            if seen.insert(location.location_id.clone()) {
                Ok(location)
            } else {
                Err(NormalizeError::DuplicateLocationId {
                    index,
                    location_id: location.location_id,
                })
            }
        });

        match result {
            Ok(location) => load.locations.push(location),
            Err(error) => {
                tracing::warn!(index, error = %error, "skipping malformed directory record");
                load.rejected.push(error);
            }
        }
    }

    load
}

/// Normalizes a single raw record found at `index` in the response.
///
/// # Errors
///
/// Returns a [`NormalizeError`] naming the first field that is missing,
/// carries the wrong tag, fails to parse, or is out of range.
pub fn normalize_location(
    index: usize,
    record: &serde_json::Value,
) -> Result<CourtLocation, NormalizeError> {
    let serde_json::Value::Object(object) = record else {
        return Err(NormalizeError::NotAnObject {
            index,
            found: json_kind(record),
        });
    };

    let mut decoded = BTreeMap::new();
    for name in LOCATION_FIELDS {
        let Some(raw) = object.get(name) else {
            continue;
        };
        let value = serde_json::from_value::<AttributeValue>(raw.clone()).map_err(|e| {
            NormalizeError::Malformed {
                index,
                field: name.to_string(),
                reason: e.to_string(),
            }
        })?;
        decoded.insert(name.to_string(), value);
    }

    let fields = Fields {
        index,
        prefix: String::new(),
        map: &decoded,
    };

    let location_id = fields.string("locationId")?;
    let name = fields.string("name")?;
    let latitude = fields.number("latitude")?;
    let longitude = fields.number("longitude")?;
    let coordinate = Coordinate::new(latitude, longitude).map_err(|_| {
        NormalizeError::CoordinateOutOfRange {
            index,
            latitude,
            longitude,
        }
    })?;

    let address = fields
        .optional_string("address")?
        .filter(|a| !a.trim().is_empty())
        .unwrap_or_else(|| DEFAULT_ADDRESS.to_string());

    let courts = fields
        .list("courts")?
        .iter()
        .enumerate()
        .map(|(i, court)| {
            let path = format!("courts[{i}]");
            let map = fields.nested_map(&path, court)?;
            normalize_court(&fields.child(&path, map))
        })
        .collect::<Result<Vec<_>, _>>()?;

    Ok(CourtLocation {
        location_id,
        name,
        address,
        coordinate,
        courts,
    })
}

/// Only `courtId` can reject a court. `startTime` and `queue` are carried as
/// data, so malformed values are logged and dropped instead.
fn normalize_court(fields: &Fields<'_>) -> Result<Court, NormalizeError> {
    let court_id = fields.string("courtId")?;

    let start_time = fields.optional_string("startTime").unwrap_or_else(|error| {
        tracing::warn!(index = fields.index, error = %error, "ignoring malformed start time");
        None
    });

    let entries = fields.list("queue").unwrap_or_else(|error| {
        tracing::warn!(index = fields.index, error = %error, "ignoring malformed queue");
        Default::default()
    });
    let queue = entries
        .iter()
        .enumerate()
        .filter_map(|(i, entry)| match queue_entry(fields, i, entry) {
            Ok(entry) => Some(entry),
            Err(error) => {
                tracing::warn!(
                    index = fields.index,
                    error = %error,
                    "skipping malformed queue entry"
                );
                None
            }
        })
        .collect();

    Ok(Court {
        court_id,
        queue,
        start_time,
    })
}

fn queue_entry<'a>(
    fields: &Fields<'a>,
    position: usize,
    entry: &'a AttributeValue,
) -> Result<QueueEntry, NormalizeError> {
    let path = format!("{}queue[{position}]", fields.prefix);
    let map = fields.nested_map(&path, entry)?;
    let entry = fields.child(&path, map);
    Ok(QueueEntry {
        join_time: entry.string("joinTime")?,
        player_id: entry.string("playerId")?,
        phone_number: entry.string("phoneNumber")?,
    })
}

/// Typed access to one decoded map, remembering where it sits in the record
/// so errors can name the full field path.
struct Fields<'a> {
    index: usize,
    prefix: String,
    map: &'a BTreeMap<String, AttributeValue>,
}

impl<'a> Fields<'a> {
    fn child(&self, path: &str, map: &'a BTreeMap<String, AttributeValue>) -> Fields<'a> {
        Fields {
            index: self.index,
            prefix: format!("{path}."),
            map,
        }
    }

    fn path(&self, name: &str) -> String {
        format!("{}{name}", self.prefix)
    }

    fn wrong_type(
        &self,
        field: String,
        expected: &'static str,
        found: &AttributeValue,
    ) -> NormalizeError {
        NormalizeError::WrongType {
            index: self.index,
            field,
            expected,
            found: found.tag(),
        }
    }

    fn require(&self, name: &str) -> Result<&'a AttributeValue, NormalizeError> {
        self.map
            .get(name)
            .ok_or_else(|| NormalizeError::MissingField {
                index: self.index,
                field: self.path(name),
            })
    }

    fn string(&self, name: &str) -> Result<String, NormalizeError> {
        match self.require(name)? {
            AttributeValue::String(s) => Ok(s.clone()),
            other => Err(self.wrong_type(self.path(name), "S", other)),
        }
    }

    /// Absent and `NULL` both read as `None`; any other tag is an error.
    fn optional_string(&self, name: &str) -> Result<Option<String>, NormalizeError> {
        match self.map.get(name) {
            None | Some(AttributeValue::Null(_)) => Ok(None),
            Some(AttributeValue::String(s)) => Ok(Some(s.clone())),
            Some(other) => Err(self.wrong_type(self.path(name), "S", other)),
        }
    }

    fn number(&self, name: &str) -> Result<f64, NormalizeError> {
        match self.require(name)? {
            AttributeValue::Number(raw) => {
                raw.trim()
                    .parse::<f64>()
                    .map_err(|_| NormalizeError::InvalidNumber {
                        index: self.index,
                        field: self.path(name),
                        value: raw.clone(),
                    })
            }
            other => Err(self.wrong_type(self.path(name), "N", other)),
        }
    }

    /// Absent and `NULL` both read as an empty list.
    fn list(&self, name: &str) -> Result<&'a [AttributeValue], NormalizeError> {
        match self.map.get(name) {
            None | Some(AttributeValue::Null(_)) => Ok(&[]),
            Some(AttributeValue::List(items)) => Ok(items),
            Some(other) => Err(self.wrong_type(self.path(name), "L", other)),
        }
    }

    fn nested_map(
        &self,
        path: &str,
        value: &'a AttributeValue,
    ) -> Result<&'a BTreeMap<String, AttributeValue>, NormalizeError> {
        match value {
            AttributeValue::Map(map) => Ok(map),
            other => Err(self.wrong_type(path.to_string(), "M", other)),
        }
    }
}

#[cfg(test)]
#[path = "normalize_test.rs"]
mod tests;
