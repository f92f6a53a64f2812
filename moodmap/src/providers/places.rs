//! Places search over the Google Places web service.

use async_trait::async_trait;
use serde::{Deserialize, Serialize};

use super::ProviderError;
use crate::config::PlacesConfig;
use crate::models::Review;

/// Parameters of a text search. Also used as the cache key.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
pub struct TextSearch {
    pub query: String,
    pub place_type: Option<String>,
}

impl TextSearch {
    pub fn new(query: impl Into<String>) -> Self {
        Self {
            query: query.into(),
            place_type: None,
        }
    }

    pub fn with_type(mut self, place_type: impl Into<String>) -> Self {
        self.place_type = Some(place_type.into());
        self
    }
}

/// A text search hit.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq, Default)]
pub struct PlaceCandidate {
    pub place_id: String,
    pub name: String,
    pub address: String,
    pub rating: Option<f64>,
    pub user_ratings_total: Option<u64>,
    #[serde(default)]
    pub types: Vec<String>,
    pub photo_reference: Option<String>,
}

/// Place details including reviews.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq, Default)]
pub struct PlaceDetails {
    pub place_id: String,
    pub name: String,
    pub address: String,
    pub rating: Option<f64>,
    pub user_ratings_total: Option<u64>,
    #[serde(default)]
    pub types: Vec<String>,
    /// `OPERATIONAL`, `CLOSED_TEMPORARILY` or `CLOSED_PERMANENTLY`
    pub business_status: Option<String>,
    pub photo_reference: Option<String>,
    #[serde(default)]
    pub reviews: Vec<Review>,
}

#[async_trait]
pub trait PlacesClient: Send + Sync {
    async fn text_search(&self, search: &TextSearch) -> Result<Vec<PlaceCandidate>, ProviderError>;

    /// `None` when the provider does not know the place.
    async fn place_details(&self, place_id: &str) -> Result<Option<PlaceDetails>, ProviderError>;

    /// Best match for free text, if any.
    async fn find_place_id(&self, query: &str) -> Result<Option<String>, ProviderError>;

    fn photo_url(&self, photo_reference: &str) -> String;
}

const DETAIL_FIELDS: &str = "place_id,name,formatted_address,geometry,types,rating,\
user_ratings_total,business_status,photos,reviews";

#[derive(Debug, Clone)]
pub struct GooglePlacesClient {
    http: reqwest::Client,
    api_key: String,
    base_url: String,
    language: String,
    region: String,
    photo_max_width: u32,
}

impl GooglePlacesClient {
    /// Build a client when an API key is configured.
    pub fn from_config(config: &PlacesConfig) -> Result<Option<Self>, ProviderError> {
        let Some(api_key) = config.api_key.as_ref().filter(|k| !k.trim().is_empty()) else {
            return Ok(None);
        };

        let http = reqwest::Client::builder()
            .timeout(config.timeout)
            .build()
            .map_err(|e| ProviderError::Http(format!("Failed to build HTTP client: {}", e)))?;

        Ok(Some(Self {
            http,
            api_key: api_key.clone(),
            base_url: config.base_url.trim_end_matches('/').to_string(),
            language: config.language.clone(),
            region: config.region.clone(),
            photo_max_width: config.photo_max_width,
        }))
    }

    async fn get(&self, endpoint: &str, params: &[(&str, &str)]) -> Result<String, ProviderError> {
        let url = format!("{}/{}/json", self.base_url, endpoint);
        let response = self
            .http
            .get(&url)
            .query(params)
            .query(&[("key", self.api_key.as_str())])
            .send()
            .await?;

        if !response.status().is_success() {
            let status = response.status();
            let message = response
                .text()
                .await
                .unwrap_or_else(|_| "Unknown".to_string());
            return Err(ProviderError::Status {
                api: format!("places {}", endpoint),
                status: status.to_string(),
                message,
            });
        }

        Ok(response.text().await?)
    }
}

#[async_trait]
impl PlacesClient for GooglePlacesClient {
    async fn text_search(&self, search: &TextSearch) -> Result<Vec<PlaceCandidate>, ProviderError> {
        let mut params = vec![
            ("query", search.query.as_str()),
            ("language", self.language.as_str()),
            ("region", self.region.as_str()),
        ];
        if let Some(place_type) = search.place_type.as_deref() {
            params.push(("type", place_type));
        }

        let body = self.get("textsearch", &params).await?;
        parse_text_search(&body)
    }

    async fn place_details(&self, place_id: &str) -> Result<Option<PlaceDetails>, ProviderError> {
        let params = [
            ("place_id", place_id),
            ("language", self.language.as_str()),
            ("fields", DETAIL_FIELDS),
        ];
        let body = self.get("details", &params).await?;
        parse_place_details(&body)
    }

    async fn find_place_id(&self, query: &str) -> Result<Option<String>, ProviderError> {
        let params = [
            ("input", query),
            ("inputtype", "textquery"),
            ("fields", "place_id"),
            ("language", self.language.as_str()),
        ];
        let body = self.get("findplacefromtext", &params).await?;
        parse_find_place(&body)
    }

    fn photo_url(&self, photo_reference: &str) -> String {
        format!(
            "{}/photo?maxwidth={}&photoreference={}&key={}",
            self.base_url, self.photo_max_width, photo_reference, self.api_key
        )
    }
}

#[derive(Debug, Deserialize)]
struct RawPhoto {
    photo_reference: String,
}

#[derive(Debug, Deserialize)]
struct RawReview {
    author_name: Option<String>,
    #[serde(default)]
    text: String,
    rating: Option<f64>,
    time: Option<i64>,
}

#[derive(Debug, Deserialize)]
struct RawPlace {
    #[serde(default)]
    place_id: String,
    #[serde(default)]
    name: String,
    #[serde(default)]
    formatted_address: String,
    rating: Option<f64>,
    user_ratings_total: Option<u64>,
    #[serde(default)]
    types: Vec<String>,
    business_status: Option<String>,
    #[serde(default)]
    photos: Vec<RawPhoto>,
    #[serde(default)]
    reviews: Vec<RawReview>,
}

impl RawPlace {
    fn first_photo(&self) -> Option<String> {
        self.photos.first().map(|p| p.photo_reference.clone())
    }
}

#[derive(Debug, Deserialize)]
struct SearchResponse {
    status: String,
    #[serde(default)]
    results: Vec<RawPlace>,
    error_message: Option<String>,
}

#[derive(Debug, Deserialize)]
struct DetailsResponse {
    status: String,
    result: Option<RawPlace>,
    error_message: Option<String>,
}

#[derive(Debug, Deserialize)]
struct RawCandidate {
    place_id: String,
}

#[derive(Debug, Deserialize)]
struct FindPlaceResponse {
    status: String,
    #[serde(default)]
    candidates: Vec<RawCandidate>,
    error_message: Option<String>,
}

/// `Ok(true)` for results, `Ok(false)` for an empty answer.
fn check_status(api: &str, status: &str, message: Option<String>) -> Result<bool, ProviderError> {
    match status {
        "OK" => Ok(true),
        "ZERO_RESULTS" | "NOT_FOUND" => Ok(false),
        other => Err(ProviderError::Status {
            api: api.to_string(),
            status: other.to_string(),
            message: message.unwrap_or_default(),
        }),
    }
}

fn decode<'a, T: Deserialize<'a>>(body: &'a str) -> Result<T, ProviderError> {
    serde_json::from_str(body).map_err(|e| ProviderError::Decode(e.to_string()))
}

pub(crate) fn parse_text_search(body: &str) -> Result<Vec<PlaceCandidate>, ProviderError> {
    let response: SearchResponse = decode(body)?;
    if !check_status("places textsearch", &response.status, response.error_message)? {
        return Ok(Vec::new());
    }

    Ok(response
        .results
        .into_iter()
        .filter(|raw| !raw.place_id.is_empty())
        .map(|raw| PlaceCandidate {
            photo_reference: raw.first_photo(),
            place_id: raw.place_id,
            name: raw.name,
            address: raw.formatted_address,
            rating: raw.rating,
            user_ratings_total: raw.user_ratings_total,
            types: raw.types,
        })
        .collect())
}

pub(crate) fn parse_place_details(body: &str) -> Result<Option<PlaceDetails>, ProviderError> {
    let response: DetailsResponse = decode(body)?;
    if !check_status("places details", &response.status, response.error_message)? {
        return Ok(None);
    }

    Ok(response.result.map(|raw| PlaceDetails {
        photo_reference: raw.first_photo(),
        place_id: raw.place_id,
        name: raw.name,
        address: raw.formatted_address,
        rating: raw.rating,
        user_ratings_total: raw.user_ratings_total,
        types: raw.types,
        business_status: raw.business_status,
        reviews: raw
            .reviews
            .into_iter()
            .map(|r| Review {
                text: r.text,
                rating: r.rating,
                time: r.time,
                author: r.author_name,
            })
            .collect(),
    }))
}

pub(crate) fn parse_find_place(body: &str) -> Result<Option<String>, ProviderError> {
    let response: FindPlaceResponse = decode(body)?;
    if !check_status("places findplacefromtext", &response.status, response.error_message)? {
        return Ok(None);
    }
    Ok(response.candidates.into_iter().next().map(|c| c.place_id))
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn parses_text_search_results() {
        let body = r#"{
            "status": "OK",
            "results": [
                {
                    "place_id": "p1",
                    "name": "용산 국수집",
                    "formatted_address": "서울특별시 용산구 청파동 12-3",
                    "rating": 4.5,
                    "user_ratings_total": 120,
                    "types": ["restaurant", "food"],
                    "photos": [{"photo_reference": "ref-1", "width": 800}]
                },
                {"name": "no id"}
            ]
        }"#;

        let results = parse_text_search(body).unwrap();
        assert_eq!(results.len(), 1);
        assert_eq!(results[0].place_id, "p1");
        assert_eq!(results[0].rating, Some(4.5));
        assert_eq!(results[0].photo_reference.as_deref(), Some("ref-1"));
    }

    #[test]
    fn zero_results_is_empty() {
        let body = r#"{"status": "ZERO_RESULTS", "results": []}"#;
        assert!(parse_text_search(body).unwrap().is_empty());

        let body = r#"{"status": "ZERO_RESULTS", "candidates": []}"#;
        assert_eq!(parse_find_place(body).unwrap(), None);
    }

    #[test]
    fn error_status_is_an_error() {
        let body = r#"{"status": "REQUEST_DENIED", "error_message": "bad key"}"#;
        match parse_text_search(body) {
            Err(ProviderError::Status { status, message, .. }) => {
                assert_eq!(status, "REQUEST_DENIED");
                assert_eq!(message, "bad key");
            }
            other => panic!("unexpected: {:?}", other),
        }
    }

    #[test]
    fn parses_details_with_reviews() {
        let body = r#"{
            "status": "OK",
            "result": {
                "place_id": "p1",
                "name": "용산 국수집",
                "formatted_address": "12-3 Cheongpa-dong, Yongsan-gu, Seoul",
                "business_status": "CLOSED_PERMANENTLY",
                "types": ["restaurant"],
                "reviews": [
                    {"author_name": "kim", "text": "맛있어요", "rating": 5, "time": 1700000000}
                ]
            }
        }"#;

        let details = parse_place_details(body).unwrap().unwrap();
        assert_eq!(details.business_status.as_deref(), Some("CLOSED_PERMANENTLY"));
        assert_eq!(details.reviews.len(), 1);
        assert_eq!(details.reviews[0].author.as_deref(), Some("kim"));
        assert_eq!(details.reviews[0].rating, Some(5.0));
    }

    #[test]
    fn garbage_is_a_decode_error() {
        assert!(matches!(
            parse_place_details("<html>"),
            Err(ProviderError::Decode(_))
        ));
    }

    #[test]
    fn client_requires_api_key() {
        let config = PlacesConfig::default();
        assert!(GooglePlacesClient::from_config(&config).unwrap().is_none());

        let config = PlacesConfig {
            api_key: Some("k".to_string()),
            ..PlacesConfig::default()
        };
        let client = GooglePlacesClient::from_config(&config).unwrap().unwrap();
        assert_eq!(
            client.photo_url("abc"),
            "https://maps.googleapis.com/maps/api/place/photo?maxwidth=400&photoreference=abc&key=k"
        );
    }
}
