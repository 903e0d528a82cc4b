//! Normalization of raw flight responses into stable output shapes.
//!
//! Upstream records are untrusted: nested objects (`aircraft`, `live`, ...)
//! are routinely missing or `null`. Every leaf is read through [`lookup`],
//! so a missing path becomes JSON `null` and formatting never fails.
//!
//! Each shape carries a `last_updated` timestamp. The `*_at` variants take
//! it explicitly; the plain variants stamp the current time.

use chrono::{DateTime, SecondsFormat, Utc};
use serde::Serialize;
use serde_json::Value;

/// Message used when the upstream call succeeded with no records.
pub const NO_DATA: &str = "no data available";

/// Follow `path` through nested objects.
///
/// Returns `None` if any step is missing or not an object.
pub fn lookup<'a>(value: &'a Value, path: &[&str]) -> Option<&'a Value> {
    path.iter().try_fold(value, |current, key| current.get(*key))
}

/// Like [`lookup`], but yields `null` for a missing path.
fn field(record: &Value, path: &[&str]) -> Value {
    lookup(record, path).cloned().unwrap_or(Value::Null)
}

/// The `data` array of a response, or an empty slice.
fn records(raw: &Value) -> &[Value] {
    raw.get("data")
        .and_then(Value::as_array)
        .map(Vec::as_slice)
        .unwrap_or_default()
}

/// ISO-8601 UTC timestamp with millisecond precision and a trailing `Z`.
pub fn timestamp(now: DateTime<Utc>) -> String {
    now.to_rfc3339_opts(SecondsFormat::Millis, true)
}

/// Marker returned when a single-item query found nothing.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct NoData {
    pub error: String,
    pub last_updated: String,
}

impl NoData {
    fn at(last_updated: String) -> Self {
        Self {
            error: NO_DATA.to_string(),
            last_updated,
        }
    }
}

/// Departure and arrival delay, in minutes as reported upstream.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct Delay {
    pub departure: Value,
    pub arrival: Value,
}

impl Delay {
    fn from_record(record: &Value) -> Self {
        Self {
            departure: field(record, &["departure", "delay"]),
            arrival: field(record, &["arrival", "delay"]),
        }
    }
}

#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct FlightIdentity {
    pub airline: Value,
    pub flight_number: Value,
    pub flight_date: Value,
    pub icao: Value,
    pub registration: Value,
    pub status: Value,
    pub delay: Delay,
}

#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct DepartureDetail {
    pub airport_iata: Value,
    pub airport_name: Value,
    pub scheduled: Value,
    pub actual: Value,
    pub terminal: Value,
    pub gate: Value,
    pub baggage: Value,
}

#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct ArrivalDetail {
    pub airport_iata: Value,
    pub airport_name: Value,
    pub scheduled: Value,
    pub estimated: Value,
    pub actual: Value,
    pub terminal: Value,
    pub gate: Value,
    pub baggage: Value,
}

/// Full detail for one flight.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct FlightDetail {
    pub last_updated: String,
    pub flight: FlightIdentity,
    pub departure: DepartureDetail,
    pub arrival: ArrivalDetail,
}

/// Output of [`format_single_flight`].
#[derive(Debug, Clone, PartialEq, Serialize)]
#[serde(untagged)]
pub enum SingleFlight {
    Found(FlightDetail),
    NoData(NoData),
}

/// An airport reference in a list entry.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct Airport {
    pub iata: Value,
    pub name: Value,
}

/// A value split by departure/arrival side.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct Sides {
    pub departure: Value,
    pub arrival: Value,
}

impl Sides {
    fn of(record: &Value, name: &str) -> Self {
        Self {
            departure: field(record, &["departure", name]),
            arrival: field(record, &["arrival", name]),
        }
    }
}

/// One flattened flight in a departures or arrivals list.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct FlightListEntry {
    pub last_updated: String,
    pub flight_number: Value,
    pub status: Value,
    pub delay: Delay,
    pub departure_time: Value,
    pub arrival_time: Value,
    pub origin: Airport,
    pub destination: Airport,
    pub terminal: Sides,
    pub gate: Sides,
    pub baggage: Sides,
}

/// Live position telemetry.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct Position {
    pub latitude: Value,
    pub longitude: Value,
    pub altitude: Value,
    pub speed: Value,
    pub heading: Value,
}

#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct RealtimeFix {
    pub last_updated: String,
    pub flight_number: Value,
    pub position: Position,
}

/// Output of [`format_realtime`].
#[derive(Debug, Clone, PartialEq, Serialize)]
#[serde(untagged)]
pub enum Realtime {
    Found(RealtimeFix),
    NoData(NoData),
}

/// Detail for the first flight in `raw`, stamped with the current time.
pub fn format_single_flight(raw: &Value) -> SingleFlight {
    format_single_flight_at(raw, Utc::now())
}

pub fn format_single_flight_at(raw: &Value, now: DateTime<Utc>) -> SingleFlight {
    let last_updated = timestamp(now);
    let Some(f) = records(raw).first() else {
        return SingleFlight::NoData(NoData::at(last_updated));
    };

    SingleFlight::Found(FlightDetail {
        last_updated,
        flight: FlightIdentity {
            airline: field(f, &["airline", "name"]),
            flight_number: field(f, &["flight", "iata"]),
            flight_date: field(f, &["flight_date"]),
            icao: field(f, &["flight", "icao"]),
            registration: field(f, &["aircraft", "registration"]),
            status: field(f, &["flight_status"]),
            delay: Delay::from_record(f),
        },
        departure: DepartureDetail {
            airport_iata: field(f, &["departure", "iata"]),
            airport_name: field(f, &["departure", "airport"]),
            scheduled: field(f, &["departure", "scheduled"]),
            actual: field(f, &["departure", "actual"]),
            terminal: field(f, &["departure", "terminal"]),
            gate: field(f, &["departure", "gate"]),
            baggage: field(f, &["departure", "baggage"]),
        },
        arrival: ArrivalDetail {
            airport_iata: field(f, &["arrival", "iata"]),
            airport_name: field(f, &["arrival", "airport"]),
            scheduled: field(f, &["arrival", "scheduled"]),
            estimated: field(f, &["arrival", "estimated"]),
            actual: field(f, &["arrival", "actual"]),
            terminal: field(f, &["arrival", "terminal"]),
            gate: field(f, &["arrival", "gate"]),
            baggage: field(f, &["arrival", "baggage"]),
        },
    })
}

/// Every flight in `raw`, flattened, stamped with the current time.
pub fn format_flights_list(raw: &Value) -> Vec<FlightListEntry> {
    format_flights_list_at(raw, Utc::now())
}

/// All entries share one timestamp.
pub fn format_flights_list_at(raw: &Value, now: DateTime<Utc>) -> Vec<FlightListEntry> {
    let last_updated = timestamp(now);

    records(raw)
        .iter()
        .map(|f| FlightListEntry {
            last_updated: last_updated.clone(),
            flight_number: field(f, &["flight", "iata"]),
            status: field(f, &["flight_status"]),
            delay: Delay::from_record(f),
            departure_time: field(f, &["departure", "scheduled"]),
            arrival_time: field(f, &["arrival", "scheduled"]),
            origin: Airport {
                iata: field(f, &["departure", "iata"]),
                name: field(f, &["departure", "airport"]),
            },
            destination: Airport {
                iata: field(f, &["arrival", "iata"]),
                name: field(f, &["arrival", "airport"]),
            },
            terminal: Sides::of(f, "terminal"),
            gate: Sides::of(f, "gate"),
            baggage: Sides::of(f, "baggage"),
        })
        .collect()
}

/// Live position of the first flight in `raw`, stamped with the current time.
pub fn format_realtime(raw: &Value) -> Realtime {
    format_realtime_at(raw, Utc::now())
}

pub fn format_realtime_at(raw: &Value, now: DateTime<Utc>) -> Realtime {
    let last_updated = timestamp(now);
    let Some(f) = records(raw).first() else {
        return Realtime::NoData(NoData::at(last_updated));
    };

    Realtime::Found(RealtimeFix {
        last_updated,
        flight_number: field(f, &["flight", "iata"]),
        position: Position {
            latitude: field(f, &["live", "latitude"]),
            longitude: field(f, &["live", "longitude"]),
            altitude: field(f, &["live", "altitude"]),
            speed: field(f, &["live", "speed"]),
            // upstream calls it "direction"
            heading: field(f, &["live", "direction"]),
        },
    })
}

#[cfg(test)]
mod tests {
    use super::*;
    use chrono::TimeZone;
    use serde_json::json;

    fn fixed_now() -> DateTime<Utc> {
        Utc.with_ymd_and_hms(2026, 10, 19, 9, 30, 15).unwrap()
    }

    fn full_record() -> Value {
        json!({
            "flight_date": "2026-10-19",
            "flight_status": "active",
            "departure": {
                "airport": "Barcelona International",
                "iata": "BCN",
                "terminal": "1",
                "gate": "B34",
                "baggage": null,
                "delay": 12,
                "scheduled": "2026-10-19T09:05:00+00:00",
                "actual": "2026-10-19T09:17:00+00:00"
            },
            "arrival": {
                "airport": "Amsterdam Schiphol",
                "iata": "AMS",
                "terminal": null,
                "gate": "D7",
                "baggage": "14",
                "delay": null,
                "scheduled": "2026-10-19T11:25:00+00:00",
                "estimated": "2026-10-19T11:31:00+00:00",
                "actual": null
            },
            "airline": {"name": "Vueling", "iata": "VY"},
            "flight": {"number": "8254", "iata": "VY8254", "icao": "VLG8254"},
            "aircraft": {"registration": "EC-NAJ"},
            "live": {
                "latitude": 41.3,
                "longitude": 2.1,
                "altitude": 10000,
                "speed": 450,
                "direction": 270
            }
        })
    }

    #[test]
    fn lookup_follows_nested_objects() {
        let record = full_record();
        assert_eq!(lookup(&record, &["airline", "name"]), Some(&json!("Vueling")));
        assert_eq!(lookup(&record, &[]), Some(&record));
        assert_eq!(lookup(&record, &["aircraft", "icao24"]), None);
        assert_eq!(lookup(&record, &["missing", "deeper"]), None);
        // A string is not an object, so the path stops there.
        assert_eq!(lookup(&record, &["flight_date", "year"]), None);
    }

    #[test]
    fn timestamp_is_utc_millis_with_z() {
        assert_eq!(timestamp(fixed_now()), "2026-10-19T09:30:15.000Z");
    }

    #[test]
    fn single_flight_without_data_reports_no_data() {
        let out = format_single_flight(&json!({"data": []}));
        let SingleFlight::NoData(no_data) = &out else {
            panic!("expected no-data marker, got {out:?}");
        };
        assert_eq!(no_data.error, "no data available");
        assert!(no_data.last_updated.ends_with('Z'));
        assert!(DateTime::parse_from_rfc3339(&no_data.last_updated).is_ok());

        let json = serde_json::to_value(&out).unwrap();
        assert_eq!(json["error"], "no data available");
        assert!(json["last_updated"].is_string());
        assert_eq!(json.as_object().unwrap().len(), 2);
    }

    #[test]
    fn single_flight_tolerates_missing_or_malformed_data() {
        for raw in [json!({}), json!({"data": null}), json!({"data": "oops"}), json!([])] {
            assert!(matches!(
                format_single_flight_at(&raw, fixed_now()),
                SingleFlight::NoData(_)
            ));
        }
    }

    #[test]
    fn single_flight_maps_every_field() {
        let out = format_single_flight_at(&json!({"data": [full_record()]}), fixed_now());
        let json = serde_json::to_value(&out).unwrap();

        assert_eq!(
            json,
            json!({
                "last_updated": "2026-10-19T09:30:15.000Z",
                "flight": {
                    "airline": "Vueling",
                    "flight_number": "VY8254",
                    "flight_date": "2026-10-19",
                    "icao": "VLG8254",
                    "registration": "EC-NAJ",
                    "status": "active",
                    "delay": {"departure": 12, "arrival": null}
                },
                "departure": {
                    "airport_iata": "BCN",
                    "airport_name": "Barcelona International",
                    "scheduled": "2026-10-19T09:05:00+00:00",
                    "actual": "2026-10-19T09:17:00+00:00",
                    "terminal": "1",
                    "gate": "B34",
                    "baggage": null
                },
                "arrival": {
                    "airport_iata": "AMS",
                    "airport_name": "Amsterdam Schiphol",
                    "scheduled": "2026-10-19T11:25:00+00:00",
                    "estimated": "2026-10-19T11:31:00+00:00",
                    "actual": null,
                    "terminal": null,
                    "gate": "D7",
                    "baggage": "14"
                }
            })
        );
    }

    #[test]
    fn single_flight_uses_first_record_only() {
        let mut second = full_record();
        second["flight"]["iata"] = json!("FR6357");
        let out = format_single_flight_at(&json!({"data": [full_record(), second]}), fixed_now());

        let SingleFlight::Found(detail) = out else {
            panic!("expected flight detail");
        };
        assert_eq!(detail.flight.flight_number, json!("VY8254"));
    }

    #[test]
    fn missing_aircraft_yields_null_registration() {
        let mut record = full_record();
        record.as_object_mut().unwrap().remove("aircraft");

        let SingleFlight::Found(detail) =
            format_single_flight_at(&json!({"data": [record]}), fixed_now())
        else {
            panic!("expected flight detail");
        };
        assert_eq!(detail.flight.registration, Value::Null);
        assert_eq!(detail.flight.airline, json!("Vueling"));
    }

    #[test]
    fn null_nested_objects_yield_nulls() {
        let record = json!({"flight": null, "departure": null, "aircraft": null});
        let SingleFlight::Found(detail) =
            format_single_flight_at(&json!({"data": [record]}), fixed_now())
        else {
            panic!("expected flight detail");
        };
        assert_eq!(detail.flight.flight_number, Value::Null);
        assert_eq!(detail.departure.airport_iata, Value::Null);
        assert_eq!(detail.arrival.estimated, Value::Null);
        assert_eq!(detail.flight.delay.departure, Value::Null);
    }

    #[test]
    fn flights_list_shares_one_timestamp() {
        let mut second = full_record();
        second["flight"]["iata"] = json!("FR6357");
        let list = format_flights_list(&json!({"data": [full_record(), second]}));

        assert_eq!(list.len(), 2);
        assert_eq!(list[0].last_updated, list[1].last_updated);
        assert_eq!(list[0].flight_number, json!("VY8254"));
        assert_eq!(list[1].flight_number, json!("FR6357"));
    }

    #[test]
    fn flights_list_maps_every_field() {
        let list = format_flights_list_at(&json!({"data": [full_record()]}), fixed_now());
        let json = serde_json::to_value(&list).unwrap();

        assert_eq!(
            json,
            json!([{
                "last_updated": "2026-10-19T09:30:15.000Z",
                "flight_number": "VY8254",
                "status": "active",
                "delay": {"departure": 12, "arrival": null},
                "departure_time": "2026-10-19T09:05:00+00:00",
                "arrival_time": "2026-10-19T11:25:00+00:00",
                "origin": {"iata": "BCN", "name": "Barcelona International"},
                "destination": {"iata": "AMS", "name": "Amsterdam Schiphol"},
                "terminal": {"departure": "1", "arrival": null},
                "gate": {"departure": "B34", "arrival": "D7"},
                "baggage": {"departure": null, "arrival": "14"}
            }])
        );
    }

    #[test]
    fn flights_list_empty_and_partial_records() {
        assert!(format_flights_list(&json!({"data": []})).is_empty());
        assert!(format_flights_list(&json!({"error": {"code": "usage_limit_reached"}})).is_empty());

        let list = format_flights_list_at(&json!({"data": [{}, 42]}), fixed_now());
        assert_eq!(list.len(), 2);
        assert_eq!(list[1].origin.iata, Value::Null);
        assert_eq!(list[1].gate.arrival, Value::Null);
    }

    #[test]
    fn realtime_maps_direction_to_heading() {
        let out = format_realtime_at(&json!({"data": [full_record()]}), fixed_now());
        let Realtime::Found(fix) = out else {
            panic!("expected position");
        };

        assert_eq!(fix.flight_number, json!("VY8254"));
        assert_eq!(fix.position.heading, json!(270));
        assert_eq!(fix.position.latitude, json!(41.3));
        assert_eq!(fix.position.longitude, json!(2.1));
        assert_eq!(fix.position.altitude, json!(10000));
        assert_eq!(fix.position.speed, json!(450));
    }

    #[test]
    fn realtime_without_live_block_yields_null_position() {
        let mut record = full_record();
        record["live"] = Value::Null;

        let Realtime::Found(fix) = format_realtime_at(&json!({"data": [record]}), fixed_now())
        else {
            panic!("expected position");
        };
        assert_eq!(
            serde_json::to_value(&fix.position).unwrap(),
            json!({
                "latitude": null,
                "longitude": null,
                "altitude": null,
                "speed": null,
                "heading": null
            })
        );
    }

    #[test]
    fn realtime_without_data_reports_no_data() {
        let out = format_realtime_at(&json!({"data": []}), fixed_now());
        assert_eq!(
            serde_json::to_value(&out).unwrap(),
            json!({"error": "no data available", "last_updated": "2026-10-19T09:30:15.000Z"})
        );
    }
}
