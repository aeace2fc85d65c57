/// Query dispatch: one upstream call sequence per category
use crate::clients::SpaceDataApi;
use crate::domain::{Category, ParsedQuery, RequestParams, ResultPayload};
use crate::errors::{QueryError, QueryResult};
use crate::formatter::{format_apod, format_earth, format_mars, format_neo, format_weather};
use crate::parser;
use chrono::NaiveDate;
use tracing::info;

/// Formatted result plus an optional preview line for the diagnostic stream
#[derive(Debug)]
pub struct QueryOutcome {
    pub payload: ResultPayload,
    pub preview: Option<String>,
}

impl QueryOutcome {
    fn plain(payload: ResultPayload) -> Self {
        Self {
            payload,
            preview: None,
        }
    }
}

/// Query service over an upstream API
pub struct QueryService<A> {
    api: A,
}

impl<A: SpaceDataApi> QueryService<A> {
    pub fn new(api: A) -> Self {
        Self { api }
    }

    /// Full pipeline for one free-text query
    pub async fn handle(
        &self,
        text: &str,
        api_key: Option<&str>,
        date_override: Option<&str>,
        today: NaiveDate,
    ) -> QueryResult<QueryOutcome> {
        let api_key = api_key.ok_or(QueryError::MissingCredential)?;
        let date_override = date_override.map(parse_date_flag).transpose()?;

        let query = match date_override {
            Some(date) => parser::parse_with_override(text, today, Some(date)),
            None => parser::parse(text, today),
        };
        info!(
            category = %query.category,
            date = %query.date,
            clamped_from = ?query.clamped_from,
            "Query parsed"
        );
        self.run(&query, api_key).await
    }

    /// Dispatch a parsed query and format the response
    pub async fn run(&self, query: &ParsedQuery, api_key: &str) -> QueryResult<QueryOutcome> {
        let params = RequestParams {
            api_key: api_key.to_string(),
            date: query.date,
        };
        let date = params.date_str();

        match query.category {
            Category::Apod => {
                let raw = self.api.apod(&params).await?;
                Ok(QueryOutcome::plain(ResultPayload::Apod(format_apod(&raw)?)))
            }
            Category::Mars => {
                let rover = query.rover.unwrap_or_default();
                let raw = self.api.mars_photos(&params, rover).await?;
                let result = format_mars(&raw, rover.api_name(), &date)?;
                let preview = result
                    .photos
                    .first()
                    .and_then(|photo| photo.img_src.as_deref())
                    .map(|url| format!("![Mars Photo]({})", url));
                Ok(QueryOutcome {
                    payload: ResultPayload::Mars(result),
                    preview,
                })
            }
            Category::Earth => {
                let (lat, lon) = match (query.latitude.as_deref(), query.longitude.as_deref()) {
                    (Some(lat), Some(lon)) => (lat, lon),
                    _ => {
                        return Err(QueryError::MissingParameter(
                            "需要提供经纬度坐标 (latitude and longitude)".to_string(),
                        ))
                    }
                };
                let raw = self.api.earth_assets(&params, lat, lon).await?;
                Ok(QueryOutcome::plain(ResultPayload::Earth(format_earth(
                    &raw, lat, lon, &date,
                ))))
            }
            Category::Neo => {
                let raw = self.api.neo_feed(&params).await?;
                Ok(QueryOutcome::plain(ResultPayload::Neo(format_neo(
                    &raw, &date,
                )?)))
            }
            Category::Weather => {
                // Independent feeds, fetched together
                let (flares, cmes) = tokio::try_join!(
                    self.api.donki_flares(&params),
                    self.api.donki_cmes(&params)
                )?;
                Ok(QueryOutcome::plain(ResultPayload::Weather(format_weather(
                    &flares, &cmes, &date,
                )?)))
            }
        }
    }
}

fn parse_date_flag(value: &str) -> QueryResult<NaiveDate> {
    NaiveDate::parse_from_str(value.trim(), "%Y-%m-%d").map_err(|_| {
        QueryError::InvalidInput(format!("--date={} (expected YYYY-MM-DD)", value))
    })
}
