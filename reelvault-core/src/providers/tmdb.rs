use std::fmt;

use async_trait::async_trait;
use chrono::NaiveDate;
use reelvault_config::TmdbConfig;
use reelvault_model::TmdbMetadata;
use serde::{Deserialize, Serialize, de::DeserializeOwned};

use super::{MetadataProvider, ProviderError};

#[derive(Debug, Clone, Deserialize)]
pub struct MovieSearchHit {
    pub id: i64,
    pub title: String,
}

#[derive(Debug, Deserialize)]
struct SearchResponse {
    #[serde(default)]
    results: Vec<MovieSearchHit>,
}

#[derive(Debug, Clone, Default, Deserialize)]
pub struct MovieDetails {
    pub id: i64,
    #[serde(default)]
    pub title: String,
    #[serde(default)]
    pub original_title: String,
    #[serde(default)]
    pub overview: Option<String>,
    #[serde(default)]
    pub release_date: Option<String>,
    #[serde(default)]
    pub runtime: Option<i32>,
    #[serde(default)]
    pub genres: Vec<Genre>,
    #[serde(default)]
    pub poster_path: Option<String>,
    #[serde(default)]
    pub original_language: Option<String>,
    #[serde(default)]
    pub vote_average: Option<f64>,
    #[serde(default)]
    pub vote_count: Option<i64>,
    #[serde(default)]
    pub credits: Credits,
    #[serde(default)]
    pub videos: Videos,
}

#[derive(Debug, Clone, Deserialize)]
pub struct Genre {
    pub name: String,
}

#[derive(Debug, Clone, Default, Deserialize)]
pub struct Credits {
    #[serde(default)]
    pub crew: Vec<CrewMember>,
}

#[derive(Debug, Clone, Deserialize)]
pub struct CrewMember {
    pub name: String,
    pub job: String,
}

#[derive(Debug, Clone, Default, Deserialize)]
pub struct Videos {
    #[serde(default)]
    pub results: Vec<Video>,
}

#[derive(Debug, Clone, Deserialize)]
pub struct Video {
    #[serde(default)]
    pub key: String,
    #[serde(default)]
    pub site: String,
    #[serde(rename = "type", default)]
    pub kind: String,
}

impl MovieDetails {
    fn director(&self) -> Option<String> {
        self.credits
            .crew
            .iter()
            .find(|member| member.job == "Director")
            .map(|member| member.name.clone())
    }

    fn trailer_url(&self) -> Option<String> {
        self.videos
            .results
            .iter()
            .find(|video| video.site == "YouTube" && video.kind == "Trailer" && !video.key.is_empty())
            .map(|video| format!("https://www.youtube.com/watch?v={}", video.key))
    }

    /// Canonical display title plus the stored metadata group.
    ///
    /// `image_base_url` is prefixed onto the relative poster path so the
    /// stored record is directly renderable.
    pub fn into_parts(self, image_base_url: &str) -> (String, TmdbMetadata) {
        let director = self.director();
        let trailer_url = self.trailer_url();
        let release_date = self
            .release_date
            .as_deref()
            .filter(|date| !date.is_empty())
            .and_then(|date| NaiveDate::parse_from_str(date, "%Y-%m-%d").ok());
        let poster_path = self
            .poster_path
            .as_deref()
            .map(|path| format!("{}{}", image_base_url.trim_end_matches('/'), path));

        let title = if self.title.is_empty() {
            self.original_title.clone()
        } else {
            self.title.clone()
        };

        let metadata = TmdbMetadata {
            tmdb_id: self.id,
            original_title: self.original_title,
            overview: self.overview.filter(|overview| !overview.is_empty()),
            release_date,
            runtime: self.runtime,
            director,
            genres: self.genres.into_iter().map(|genre| genre.name).collect(),
            poster_path,
            original_language: self.original_language,
            vote_average: self.vote_average,
            vote_count: self.vote_count,
            trailer_url,
        };

        (title, metadata)
    }
}

pub struct TmdbProvider {
    http: reqwest::Client,
    config: TmdbConfig,
}

impl fmt::Debug for TmdbProvider {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("TmdbProvider")
            .field("base_url", &self.config.base_url)
            .finish()
    }
}

impl TmdbProvider {
    pub fn new(config: TmdbConfig) -> Self {
        Self {
            http: reqwest::Client::new(),
            config,
        }
    }

    async fn get_tmdb_json<Q, T>(&self, url: &str, query: &Q) -> Result<T, ProviderError>
    where
        Q: Serialize + ?Sized,
        T: DeserializeOwned,
    {
        let response = self
            .http
            .get(url)
            .query(&[
                ("api_key", self.config.api_key.as_str()),
                ("language", self.config.language.as_str()),
            ])
            .query(query)
            .send()
            .await?;

        let status = response.status();
        if status.is_success() {
            return response.json::<T>().await.map_err(ProviderError::from);
        }

        #[derive(Debug, Deserialize)]
        struct TmdbErrorBody {
            #[serde(default)]
            status_message: Option<String>,
        }

        let message = response
            .json::<TmdbErrorBody>()
            .await
            .ok()
            .and_then(|body| body.status_message)
            .unwrap_or_else(|| format!("TMDB request failed with status {status}"));

        match status.as_u16() {
            401 => Err(ProviderError::InvalidApiKey),
            404 => Err(ProviderError::NotFound),
            429 => Err(ProviderError::RateLimited),
            _ => Err(ProviderError::Api(message)),
        }
    }
}

#[async_trait]
impl MetadataProvider for TmdbProvider {
    async fn search_movies(&self, query: &str) -> Result<Vec<MovieSearchHit>, ProviderError> {
        let url = format!("{}/search/movie", self.config.base_url.trim_end_matches('/'));
        let response: SearchResponse = self
            .get_tmdb_json(&url, &[("query", query), ("include_adult", "false")])
            .await?;
        Ok(response.results)
    }

    async fn movie_details(&self, tmdb_id: i64) -> Result<MovieDetails, ProviderError> {
        let url = format!(
            "{}/movie/{tmdb_id}",
            self.config.base_url.trim_end_matches('/')
        );
        self.get_tmdb_json(&url, &[("append_to_response", "credits,videos")])
            .await
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn fixture() -> MovieDetails {
        serde_json::from_value(serde_json::json!({
            "id": 27205,
            "title": "Inception",
            "original_title": "Inception",
            "overview": "A thief who steals corporate secrets.",
            "release_date": "2010-07-15",
            "runtime": 148,
            "genres": [{"id": 28, "name": "Action"}, {"id": 878, "name": "Science Fiction"}],
            "poster_path": "/inception.jpg",
            "original_language": "en",
            "vote_average": 8.4,
            "vote_count": 34000,
            "credits": {
                "crew": [
                    {"name": "Emma Thomas", "job": "Producer"},
                    {"name": "Christopher Nolan", "job": "Director"}
                ]
            },
            "videos": {
                "results": [
                    {"key": "abc", "site": "YouTube", "type": "Featurette"},
                    {"key": "YoHD9XEInc0", "site": "YouTube", "type": "Trailer"}
                ]
            }
        }))
        .expect("valid fixture")
    }

    #[test]
    fn extracts_director_and_trailer() {
        let (title, metadata) = fixture().into_parts("https://image.tmdb.org/t/p/original");

        assert_eq!(title, "Inception");
        assert_eq!(metadata.tmdb_id, 27205);
        assert_eq!(metadata.director.as_deref(), Some("Christopher Nolan"));
        assert_eq!(
            metadata.trailer_url.as_deref(),
            Some("https://www.youtube.com/watch?v=YoHD9XEInc0")
        );
        assert_eq!(
            metadata.poster_path.as_deref(),
            Some("https://image.tmdb.org/t/p/original/inception.jpg")
        );
        assert_eq!(metadata.genres, vec!["Action", "Science Fiction"]);
        assert_eq!(
            metadata.release_date,
            NaiveDate::from_ymd_opt(2010, 7, 15)
        );
    }

    #[test]
    fn tolerates_sparse_details() {
        let details: MovieDetails = serde_json::from_value(serde_json::json!({
            "id": 99,
            "title": "Obscure Film",
            "original_title": "Obscure Film",
            "release_date": ""
        }))
        .expect("valid fixture");

        let (title, metadata) = details.into_parts("https://image.tmdb.org/t/p/original");

        assert_eq!(title, "Obscure Film");
        assert_eq!(metadata.release_date, None);
        assert_eq!(metadata.director, None);
        assert_eq!(metadata.trailer_url, None);
        assert_eq!(metadata.poster_path, None);
        assert!(metadata.genres.is_empty());
    }

    #[test]
    fn search_response_defaults_to_empty() {
        let response: SearchResponse = serde_json::from_str("{}").expect("valid body");
        assert!(response.results.is_empty());
    }
}
