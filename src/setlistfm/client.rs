use std::fmt;

use reqwest::{Client, StatusCode};

use crate::{config::SetlistFmConfig, debug, types::Setlist};

#[derive(Debug)]
pub enum SetlistError {
    EmptyUrl,
    NotASetlistUrl(String),
    MissingId(String),
    MissingApiKey,
    Http(reqwest::Error),
    Status(StatusCode),
}

impl fmt::Display for SetlistError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            SetlistError::EmptyUrl => write!(f, "URL is empty"),
            SetlistError::NotASetlistUrl(url) => {
                write!(f, "URL is not a valid setlist.fm set: {}", url)
            }
            SetlistError::MissingId(url) => write!(f, "no setlist id found in URL: {}", url),
            SetlistError::MissingApiKey => write!(f, "SETLISTFM_API_KEY must be set"),
            SetlistError::Http(e) => write!(f, "setlist.fm request failed: {}", e),
            SetlistError::Status(status) => {
                write!(f, "unexpected status code from setlist.fm [{}]", status)
            }
        }
    }
}

impl std::error::Error for SetlistError {}

impl From<reqwest::Error> for SetlistError {
    fn from(err: reqwest::Error) -> Self {
        SetlistError::Http(err)
    }
}

pub struct SetlistFmClient {
    http: Client,
    base_url: String,
    api_key: String,
}

impl SetlistFmClient {
    pub fn new(config: &SetlistFmConfig) -> Result<Self, SetlistError> {
        let api_key = config.api_key.clone().ok_or(SetlistError::MissingApiKey)?;
        let http = Client::builder().timeout(config.timeout).build()?;

        Ok(Self {
            http,
            base_url: config.api_url.trim_end_matches('/').to_string(),
            api_key,
        })
    }

    pub async fn get_setlist(&self, id: &str) -> Result<Setlist, SetlistError> {
        let url = format!("{}/1.0/setlist/{}", self.base_url, id);
        debug!("Loading setlist from {}", url);

        let response = self
            .http
            .get(&url)
            .header("x-api-key", &self.api_key)
            .header("Accept", "application/json")
            .send()
            .await?;

        if response.status() != StatusCode::OK {
            return Err(SetlistError::Status(response.status()));
        }

        Ok(response.json::<Setlist>().await?)
    }
}
