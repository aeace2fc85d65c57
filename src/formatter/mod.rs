/// Reshapes raw API JSON into labeled result payloads
use crate::domain::{
    ApodResult, CmeEvent, Diameter, EarthResult, FlareEvent, MarsPhoto, MarsResult, NeoEntry,
    NeoResult, WeatherResult, SOLAR_IMAGES,
};
use crate::errors::{QueryError, QueryResult};
use crate::utils::{rounded, s_at, s_pick};
use serde::Serialize;
use serde_json::Value;

/// Photos kept from a rover response
pub const MARS_PHOTO_LIMIT: usize = 5;

/// Pretty-printed JSON with two-space indentation
pub fn render<T: Serialize>(value: &T) -> serde_json::Result<String> {
    serde_json::to_string_pretty(value)
}

pub fn format_apod(raw: &Value) -> QueryResult<ApodResult> {
    if !raw.is_object() {
        return Err(QueryError::ShapeMismatch(
            "APOD response is not an object".to_string(),
        ));
    }

    Ok(ApodResult {
        title: s_pick(raw, &["title"]),
        date: s_pick(raw, &["date"]),
        explanation: s_pick(raw, &["explanation"]),
        url: s_pick(raw, &["url"]),
        hdurl: s_pick(raw, &["hdurl"]),
        media_type: s_pick(raw, &["media_type"]),
        copyright: s_pick(raw, &["copyright"]).map(|c| c.trim().to_string()),
    })
}

pub fn format_mars(raw: &Value, rover: &str, date: &str) -> QueryResult<MarsResult> {
    let photos = raw
        .get("photos")
        .and_then(Value::as_array)
        .ok_or_else(|| QueryError::ShapeMismatch("photos array missing".to_string()))?;

    Ok(MarsResult {
        rover: rover.to_string(),
        date: date.to_string(),
        photo_count: photos.len(),
        photos: photos
            .iter()
            .take(MARS_PHOTO_LIMIT)
            .map(|photo| MarsPhoto {
                id: photo.get("id").and_then(Value::as_i64),
                earth_date: s_pick(photo, &["earth_date"]),
                camera: s_at(photo, "/camera/full_name").or_else(|| s_at(photo, "/camera/name")),
                img_src: s_pick(photo, &["img_src"]),
            })
            .collect(),
    })
}

pub fn format_earth(raw: &Value, latitude: &str, longitude: &str, date: &str) -> EarthResult {
    EarthResult {
        longitude: longitude.to_string(),
        latitude: latitude.to_string(),
        date: date.to_string(),
        url: s_pick(raw, &["url"]),
    }
}

pub fn format_neo(raw: &Value, date: &str) -> QueryResult<NeoResult> {
    let objects = raw
        .get("near_earth_objects")
        .and_then(|by_day| by_day.get(date))
        .and_then(Value::as_array)
        .ok_or_else(|| {
            QueryError::ShapeMismatch(format!("near_earth_objects has no entry for {}", date))
        })?;

    Ok(NeoResult {
        date: date.to_string(),
        count: objects.len(),
        objects: objects.iter().map(neo_entry).collect(),
    })
}

fn neo_entry(neo: &Value) -> NeoEntry {
    let metres = |field: &str| {
        neo.pointer(&format!("/estimated_diameter/meters/{}", field))
            .and_then(rounded)
    };
    let hazardous = neo
        .get("is_potentially_hazardous_asteroid")
        .and_then(Value::as_bool)
        .unwrap_or(false);

    NeoEntry {
        name: s_pick(neo, &["name"]),
        diameter: Diameter {
            min: metres("estimated_diameter_min"),
            max: metres("estimated_diameter_max"),
        },
        hazardous: if hazardous { "是" } else { "否" },
        miss_distance: neo
            .pointer("/close_approach_data/0/miss_distance/kilometers")
            .and_then(rounded)
            .map(|km| format!("{} 公里", km)),
        velocity: neo
            .pointer("/close_approach_data/0/relative_velocity/kilometers_per_hour")
            .and_then(rounded)
            .map(|kmh| format!("{} 公里/小时", kmh)),
    }
}

pub fn format_weather(flares: &Value, cmes: &Value, date: &str) -> QueryResult<WeatherResult> {
    let flares = event_list(flares, "FLR")?
        .iter()
        .map(|flare| FlareEvent {
            begin_time: s_pick(flare, &["beginTime"]),
            end_time: s_pick(flare, &["endTime"]),
            class_type: s_pick(flare, &["classType"]),
            source_location: s_pick(flare, &["sourceLocation"]),
        })
        .collect();

    let cmes = event_list(cmes, "CME")?.iter().map(cme_event).collect();

    Ok(WeatherResult {
        date: date.to_string(),
        flares,
        cmes,
        solar_images: SOLAR_IMAGES,
    })
}

/// DONKI returns an array, or nothing for an empty window
fn event_list<'a>(raw: &'a Value, feed: &str) -> QueryResult<&'a [Value]> {
    match raw {
        Value::Null => Ok(Default::default()),
        Value::Array(items) => Ok(items.as_slice()),
        _ => Err(QueryError::ShapeMismatch(format!(
            "DONKI {} response is not an array",
            feed
        ))),
    }
}

fn cme_event(cme: &Value) -> CmeEvent {
    // Speed and type live in the analyses unless the event carries them itself
    let analysis = cme_analysis(cme);
    let speed = cme
        .get("speed")
        .and_then(rounded)
        .or_else(|| analysis.and_then(|a| a.get("speed")).and_then(rounded));
    let kind = s_pick(cme, &["type"]).or_else(|| analysis.and_then(|a| s_pick(a, &["type"])));

    CmeEvent {
        start_time: s_pick(cme, &["startTime"]),
        speed: speed
            .map(|s| format!("{} km/s", s))
            .unwrap_or_else(|| "未知".to_string()),
        kind,
    }
}

fn cme_analysis(cme: &Value) -> Option<&Value> {
    let analyses = cme.get("cmeAnalyses")?.as_array()?;
    analyses
        .iter()
        .find(|a| a.get("isMostAccurate").and_then(Value::as_bool) == Some(true))
        .or_else(|| analyses.first())
}
