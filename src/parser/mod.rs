/// Rule-based parser from free text to a structured query
use crate::domain::{Category, ParsedQuery, Rover};
use chrono::{Days, NaiveDate};
use once_cell::sync::Lazy;
use regex::Regex;
use tracing::{debug, warn};

/// Topic keywords, highest priority first
const CATEGORY_RULES: &[(&[&str], Category)] = &[
    (&["火星", "mars"], Category::Mars),
    (&["地球", "earth"], Category::Earth),
    (&["小行星", "近地", "neo", "asteroid"], Category::Neo),
    (&["太空天气", "空间天气", "space weather"], Category::Weather),
];

const ROVER_RULES: &[(&[&str], Rover)] = &[
    (&["好奇号", "curiosity"], Rover::Curiosity),
    (&["机遇号", "opportunity"], Rover::Opportunity),
    (&["勇气号", "spirit"], Rover::Spirit),
    (&["毅力号", "perseverance"], Rover::Perseverance),
];

static TODAY_RE: Lazy<Regex> =
    Lazy::new(|| Regex::new("今天|today|现在|当前").expect("valid today pattern"));

static YESTERDAY_RE: Lazy<Regex> =
    Lazy::new(|| Regex::new("昨天|yesterday").expect("valid yesterday pattern"));

static CN_DATE_RE: Lazy<Regex> = Lazy::new(|| {
    Regex::new(r"([0-9]{4})年([0-9]{1,2})月([0-9]{1,2})日").expect("valid chinese date pattern")
});

static ISO_DATE_RE: Lazy<Regex> = Lazy::new(|| {
    Regex::new(r"([0-9]{4})-([0-9]{2})-([0-9]{2})").expect("valid iso date pattern")
});

static COORDS_RE: Lazy<Regex> = Lazy::new(|| {
    Regex::new(r"(-?[0-9]+(?:\.[0-9]*)?)[,，\s]+(-?[0-9]+(?:\.[0-9]*)?)")
        .expect("valid coordinate pattern")
});

/// Parse free text against the given calendar day
pub fn parse(text: &str, today: NaiveDate) -> ParsedQuery {
    parse_with_override(text, today, None)
}

/// Parse free text; an explicit date replaces date extraction but is still clamped
pub fn parse_with_override(
    text: &str,
    today: NaiveDate,
    date_override: Option<NaiveDate>,
) -> ParsedQuery {
    let query = text.trim().to_lowercase();

    let category = classify(&query);
    let rover = match category {
        Category::Mars => Some(detect_rover(&query)),
        _ => None,
    };
    let (latitude, longitude) = match category {
        Category::Earth => match extract_coordinates(&query) {
            Some((lat, lon)) => (Some(lat), Some(lon)),
            None => (None, None),
        },
        _ => (None, None),
    };

    let requested = date_override.unwrap_or_else(|| extract_date(&query, today));
    let (date, clamped_from) = clamp_to_today(requested, today);

    let parsed = ParsedQuery {
        category,
        rover,
        latitude,
        longitude,
        date,
        clamped_from,
    };
    debug!(?parsed, "parsed query");
    parsed
}

/// First rule whose keyword appears wins; no keyword means APOD
pub fn classify(query: &str) -> Category {
    CATEGORY_RULES
        .iter()
        .find(|(keywords, _)| keywords.iter().any(|k| query.contains(k)))
        .map(|(_, category)| *category)
        .unwrap_or_default()
}

pub fn detect_rover(query: &str) -> Rover {
    ROVER_RULES
        .iter()
        .find(|(keywords, _)| keywords.iter().any(|k| query.contains(k)))
        .map(|(_, rover)| *rover)
        .unwrap_or_default()
}

/// Latitude and longitude as written, ignoring digits that belong to dates
pub fn extract_coordinates(query: &str) -> Option<(String, String)> {
    let without_cn = CN_DATE_RE.replace_all(query, " ");
    let without_dates = ISO_DATE_RE.replace_all(&without_cn, " ");
    COORDS_RE
        .captures(&without_dates)
        .map(|caps| (caps[1].to_string(), caps[2].to_string()))
}

/// Date keywords and literals in priority order, defaulting to today
pub fn extract_date(query: &str, today: NaiveDate) -> NaiveDate {
    if TODAY_RE.is_match(query) {
        return today;
    }
    if YESTERDAY_RE.is_match(query) {
        return today.checked_sub_days(Days::new(1)).unwrap_or(today);
    }
    date_literal(&CN_DATE_RE, query)
        .or_else(|| date_literal(&ISO_DATE_RE, query))
        .unwrap_or(today)
}

fn date_literal(re: &Regex, query: &str) -> Option<NaiveDate> {
    let caps = re.captures(query)?;
    let year = caps[1].parse().ok()?;
    let month = caps[2].parse().ok()?;
    let day = caps[3].parse().ok()?;
    let date = NaiveDate::from_ymd_opt(year, month, day);
    if date.is_none() {
        debug!("Ignoring impossible date literal {}", &caps[0]);
    }
    date
}

fn clamp_to_today(date: NaiveDate, today: NaiveDate) -> (NaiveDate, Option<NaiveDate>) {
    if date > today {
        warn!(
            "警告：未来日期 {} 已被自动调整为当前日期 {} (future date clamped to today)",
            date, today
        );
        (today, Some(date))
    } else {
        (date, None)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::testutils::CapturedLog;

    fn day(y: i32, m: u32, d: u32) -> NaiveDate {
        NaiveDate::from_ymd_opt(y, m, d).unwrap()
    }

    fn today() -> NaiveDate {
        day(2024, 6, 15)
    }

    #[test]
    fn test_today_keywords() {
        for text in ["今天", "TODAY please", "现在的图片", "当前"] {
            let parsed = parse(text, today());
            assert_eq!(parsed.category, Category::Apod, "{text}");
            assert_eq!(parsed.date, today(), "{text}");
            assert_eq!(parsed.clamped_from, None);
        }
    }

    #[test]
    fn test_yesterday_keywords() {
        assert_eq!(parse("昨天的天文图", today()).date, day(2024, 6, 14));
        assert_eq!(parse("apod yesterday", today()).date, day(2024, 6, 14));
        assert_eq!(parse("yesterday", day(2024, 3, 1)).date, day(2024, 2, 29));
    }

    #[test]
    fn test_today_keyword_beats_literal() {
        assert_eq!(parse("今天 2024-01-02", today()).date, today());
    }

    #[test]
    fn test_chinese_date_literal_is_zero_padded() {
        let parsed = parse("2024年3月8日", today());
        assert_eq!(parsed.date, day(2024, 3, 8));
        assert_eq!(parsed.date.to_string(), "2024-03-08");
    }

    #[test]
    fn test_chinese_literal_beats_iso_literal() {
        assert_eq!(parse("2024年1月2日 2024-05-05", today()).date, day(2024, 1, 2));
    }

    #[test]
    fn test_iso_date_literal() {
        assert_eq!(parse("apod 2023-12-25", today()).date, day(2023, 12, 25));
    }

    #[test]
    fn test_no_date_defaults_to_today() {
        assert_eq!(parse("astronomy picture", today()).date, today());
    }

    #[test]
    fn test_impossible_literal_falls_through() {
        assert_eq!(parse("2024-02-30", today()).date, today());
        assert_eq!(parse("2023年2月29日 2023-03-01", today()).date, day(2023, 3, 1));
    }

    #[test]
    fn test_future_date_is_clamped() {
        let parsed = parse("2030年1月1日", today());
        assert_eq!(parsed.date, today());
        assert_eq!(parsed.clamped_from, Some(day(2030, 1, 1)));

        let parsed = parse("2024-06-16", today());
        assert_eq!(parsed.date, today());
        assert_eq!(parsed.clamped_from, Some(day(2024, 6, 16)));
    }

    #[test]
    fn test_future_date_warning_is_logged() {
        let log = CapturedLog::default();
        let writer = log.clone();
        let subscriber = tracing_subscriber::fmt()
            .with_writer(move || writer.clone())
            .with_ansi(false)
            .finish();

        let parsed = tracing::subscriber::with_default(subscriber, || parse("2099-01-01", today()));
        assert_eq!(parsed.date, today());

        let text = log.contents();
        assert!(text.contains("WARN"), "{text}");
        assert!(text.contains("未来日期 2099-01-01"), "{text}");
        assert!(text.contains("当前日期 2024-06-15"), "{text}");
    }

    #[test]
    fn test_past_date_logs_no_warning() {
        let log = CapturedLog::default();
        let writer = log.clone();
        let subscriber = tracing_subscriber::fmt()
            .with_writer(move || writer.clone())
            .with_ansi(false)
            .finish();

        tracing::subscriber::with_default(subscriber, || parse("2024-06-01", today()));
        assert!(!log.contents().contains("WARN"));
    }

    #[test]
    fn test_override_replaces_text_date() {
        let parsed = parse_with_override("今天", today(), Some(day(2020, 5, 1)));
        assert_eq!(parsed.date, day(2020, 5, 1));

        let parsed = parse_with_override("今天", today(), Some(day(2099, 1, 1)));
        assert_eq!(parsed.date, today());
        assert_eq!(parsed.clamped_from, Some(day(2099, 1, 1)));
    }

    #[test]
    fn test_mars_beats_earth() {
        let parsed = parse("火星 和 地球 39.9,116.4", today());
        assert_eq!(parsed.category, Category::Mars);
        assert_eq!(parsed.latitude, None);
        assert_eq!(parsed.rover, Some(Rover::Curiosity));
    }

    #[test]
    fn test_category_priority_order() {
        assert_eq!(classify("near earth asteroid"), Category::Earth);
        assert_eq!(classify("近地小行星"), Category::Neo);
        assert_eq!(classify("neo feed"), Category::Neo);
        assert_eq!(classify("太空天气"), Category::Weather);
        assert_eq!(classify("space weather today"), Category::Weather);
        assert_eq!(classify("pretty nebula"), Category::Apod);
    }

    #[test]
    fn test_rover_aliases() {
        assert_eq!(parse("火星 毅力号", today()).rover, Some(Rover::Perseverance));
        assert_eq!(parse("Mars Spirit", today()).rover, Some(Rover::Spirit));
        assert_eq!(parse("火星 机遇号", today()).rover, Some(Rover::Opportunity));
        assert_eq!(parse("mars photos", today()).rover, Some(Rover::Curiosity));
    }

    #[test]
    fn test_rover_only_for_mars() {
        assert_eq!(parse("curiosity", today()).rover, None);
    }

    #[test]
    fn test_earth_coordinates() {
        let parsed = parse("地球 39.9042,116.4074", today());
        assert_eq!(parsed.category, Category::Earth);
        assert_eq!(parsed.latitude.as_deref(), Some("39.9042"));
        assert_eq!(parsed.longitude.as_deref(), Some("116.4074"));
    }

    #[test]
    fn test_earth_negative_and_space_separated() {
        let parsed = parse("earth -33.86 151.21", today());
        assert_eq!(parsed.latitude.as_deref(), Some("-33.86"));
        assert_eq!(parsed.longitude.as_deref(), Some("151.21"));
    }

    #[test]
    fn test_earth_coordinates_skip_dates() {
        let parsed = parse("earth 2024-03-18 39.9,116.4", today());
        assert_eq!(parsed.date, day(2024, 3, 18));
        assert_eq!(parsed.latitude.as_deref(), Some("39.9"));
        assert_eq!(parsed.longitude.as_deref(), Some("116.4"));
    }

    #[test]
    fn test_earth_without_coordinates() {
        let parsed = parse("地球 北京", today());
        assert_eq!(parsed.category, Category::Earth);
        assert_eq!(parsed.latitude, None);
        assert_eq!(parsed.longitude, None);
    }
}
