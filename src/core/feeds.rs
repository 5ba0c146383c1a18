//! Feed types and their adapters: where the records live in each document and which
//! columns the normalized table carries.

use serde::{Deserialize, Serialize};
use std::fmt;
use std::str::FromStr;

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum PathSegment {
    Key(&'static str),
    Index(usize),
}

impl fmt::Display for PathSegment {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            PathSegment::Key(key) => write!(f, "{}", key),
            PathSegment::Index(index) => write!(f, "[{}]", index),
        }
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ExtractPath {
    /// Descend through the segments to an array of objects.
    Nested(&'static [PathSegment]),
    /// The document itself is a single record (system_information).
    Root,
}

impl fmt::Display for ExtractPath {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            ExtractPath::Root => write!(f, "<root>"),
            ExtractPath::Nested(segments) => {
                let joined: Vec<String> = segments.iter().map(ToString::to_string).collect();
                write!(f, "{}", joined.join("."))
            }
        }
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct FeedAdapter {
    pub path: ExtractPath,
    pub columns: &'static [&'static str],
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum FeedType {
    FreeBikeStatus,
    StationInformation,
    StationStatus,
    SystemInformation,
    GeofencingZoneStatus,
    GeofencingZoneInformation,
    SystemHours,
    SystemCalendar,
    SystemRegions,
    SystemPricingPlans,
    SystemAlerts,
}

const fn key(name: &'static str) -> PathSegment {
    PathSegment::Key(name)
}

const DATA_BIKES: &[PathSegment] = &[key("data"), key("bikes")];
const DATA_STATIONS: &[PathSegment] = &[key("data"), key("stations")];
const GEOFENCING_ZONES: &[PathSegment] = &[key("geofencing_zones")];
const DATA_RENTAL_HOURS: &[PathSegment] = &[key("data"), key("rental_hours")];
const DATA_CALENDARS: &[PathSegment] = &[key("data"), key("calendars")];
const DATA_REGIONS: &[PathSegment] = &[key("data"), key("regions")];
const DATA_PLANS: &[PathSegment] = &[key("data"), key("plans")];
const DATA_ALERTS: &[PathSegment] = &[key("data"), key("alerts")];

impl FeedType {
    pub const ALL: [FeedType; 11] = [
        FeedType::FreeBikeStatus,
        FeedType::StationInformation,
        FeedType::StationStatus,
        FeedType::SystemInformation,
        FeedType::GeofencingZoneStatus,
        FeedType::GeofencingZoneInformation,
        FeedType::SystemHours,
        FeedType::SystemCalendar,
        FeedType::SystemRegions,
        FeedType::SystemPricingPlans,
        FeedType::SystemAlerts,
    ];

    pub fn as_str(&self) -> &'static str {
        match self {
            FeedType::FreeBikeStatus => "free_bike_status",
            FeedType::StationInformation => "station_information",
            FeedType::StationStatus => "station_status",
            FeedType::SystemInformation => "system_information",
            FeedType::GeofencingZoneStatus => "geofencing_zone_status",
            FeedType::GeofencingZoneInformation => "geofencing_zone_information",
            FeedType::SystemHours => "system_hours",
            FeedType::SystemCalendar => "system_calendar",
            FeedType::SystemRegions => "system_regions",
            FeedType::SystemPricingPlans => "system_pricing_plans",
            FeedType::SystemAlerts => "system_alerts",
        }
    }

    pub fn adapter(&self) -> FeedAdapter {
        match self {
            FeedType::FreeBikeStatus => FeedAdapter {
                path: ExtractPath::Nested(DATA_BIKES),
                columns: &[
                    "bike_id",
                    "lat",
                    "lon",
                    "is_reserved",
                    "is_disabled",
                    "is_ebike",
                    "station_id",
                    "geofence_zone_id",
                ],
            },
            FeedType::StationInformation => FeedAdapter {
                path: ExtractPath::Nested(DATA_STATIONS),
                columns: &[
                    "station_id",
                    "name",
                    "short_name",
                    "lat",
                    "lon",
                    "address",
                    "cross_street",
                    "region_id",
                    "post_code",
                    "rental_methods",
                    "capacity",
                ],
            },
            FeedType::StationStatus => FeedAdapter {
                path: ExtractPath::Nested(DATA_STATIONS),
                columns: &[
                    "station_id",
                    "num_bikes_available",
                    "num_bikes_available_types",
                    "mechanical",
                    "ebike",
                    "num_bikes_disabled",
                    "num_docks_available",
                    "num_docks_disabled",
                    "is_installed",
                    "is_renting",
                    "is_returning",
                    "last_reported",
                    "is_charging_station",
                ],
            },
            FeedType::SystemInformation => FeedAdapter {
                path: ExtractPath::Root,
                columns: &[
                    "system_id",
                    "language",
                    "name",
                    "short_name",
                    "operator",
                    "url",
                    "purchase_url",
                    "start_date",
                    "phone_number",
                    "email",
                    "timezone",
                    "license_url",
                ],
            },
            FeedType::GeofencingZoneStatus => FeedAdapter {
                path: ExtractPath::Nested(GEOFENCING_ZONES),
                columns: &[
                    "geofencing_zone_id",
                    "num_bikes_available",
                    "num_bikes_available_types",
                    "mechanical",
                    "ebike",
                    "num_bikes_disabled",
                    "is_returning",
                ],
            },
            FeedType::GeofencingZoneInformation => FeedAdapter {
                path: ExtractPath::Nested(GEOFENCING_ZONES),
                columns: &[
                    "geofencing_zone_id",
                    "name",
                    "lat",
                    "lon",
                    "region_id",
                    "post_code",
                    "capacity",
                    "zone_area",
                    "station_id",
                ],
            },
            FeedType::SystemHours => FeedAdapter {
                path: ExtractPath::Nested(DATA_RENTAL_HOURS),
                columns: &["user_types", "days", "start_time", "end_time"],
            },
            FeedType::SystemCalendar => FeedAdapter {
                path: ExtractPath::Nested(DATA_CALENDARS),
                columns: &[
                    "start_month",
                    "start_day",
                    "start_year",
                    "end_month",
                    "end_day",
                    "end_year",
                ],
            },
            FeedType::SystemRegions => FeedAdapter {
                path: ExtractPath::Nested(DATA_REGIONS),
                columns: &["region_id", "name"],
            },
            FeedType::SystemPricingPlans => FeedAdapter {
                path: ExtractPath::Nested(DATA_PLANS),
                columns: &[
                    "plan_id",
                    "url",
                    "name",
                    "currency",
                    "price",
                    "is_taxable",
                    "description",
                ],
            },
            FeedType::SystemAlerts => FeedAdapter {
                path: ExtractPath::Nested(DATA_ALERTS),
                columns: &[
                    "alert_id",
                    "type",
                    "times",
                    "start",
                    "end",
                    "station_ids",
                    "region_ids",
                    "url",
                    "summary",
                    "description",
                    "last_updated",
                ],
            },
        }
    }
}

impl fmt::Display for FeedType {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

impl FromStr for FeedType {
    type Err = String;

    fn from_str(s: &str) -> std::result::Result<Self, Self::Err> {
        FeedType::ALL
            .into_iter()
            .find(|feed_type| feed_type.as_str() == s)
            .ok_or_else(|| {
                let known: Vec<&str> = FeedType::ALL.iter().map(FeedType::as_str).collect();
                format!("unknown feed type '{}' (expected one of: {})", s, known.join(", "))
            })
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_feed_type_round_trips_through_str() {
        for feed_type in FeedType::ALL {
            assert_eq!(feed_type.as_str().parse::<FeedType>().unwrap(), feed_type);
        }
        assert!("free_bikes".parse::<FeedType>().is_err());
    }

    #[test]
    fn test_adapter_columns_are_unique() {
        for feed_type in FeedType::ALL {
            let columns = feed_type.adapter().columns;
            let mut seen = std::collections::HashSet::new();
            for column in columns {
                assert!(seen.insert(*column), "{} repeats {}", feed_type, column);
            }
        }
    }

    #[test]
    fn test_only_system_information_reads_the_root() {
        for feed_type in FeedType::ALL {
            let is_root = feed_type.adapter().path == ExtractPath::Root;
            assert_eq!(is_root, feed_type == FeedType::SystemInformation);
        }
    }

    #[test]
    fn test_path_display() {
        assert_eq!(
            FeedType::FreeBikeStatus.adapter().path.to_string(),
            "data.bikes"
        );
        assert_eq!(
            FeedType::GeofencingZoneStatus.adapter().path.to_string(),
            "geofencing_zones"
        );
    }

    #[test]
    fn test_serde_uses_snake_case() {
        let parsed: FeedType = serde_json::from_str("\"system_pricing_plans\"").unwrap();
        assert_eq!(parsed, FeedType::SystemPricingPlans);
    }
}
