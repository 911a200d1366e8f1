use std::fs::OpenOptions;
use std::io;
use std::path::Path;

use chrono::DateTime;
use chrono::Utc;
use flate2::read::GzDecoder;
use reqwest::StatusCode;
use reqwest::blocking::Client;
use reqwest::header::AUTHORIZATION;
use serde::Deserialize;
use serde_json::Value;

use crate::fetch::error::FetchError;
use crate::fetch::error::Result;

pub(crate) struct MessageClient {
    client: Client,
    base_url: String,
    token: String,
}

impl MessageClient {
    const MESSAGES_ENDPOINT: &str = "/api/v2/messages.json";
    const ARCHIVES_ENDPOINT: &str = "/api/v2/archives.json";

    pub fn new(domain: &str, token: String) -> Self {
        let base_url = format!("https://{domain}");
        let client = Client::new();

        Self {
            client,
            base_url,
            token,
        }
    }

    /// Fetches every page of the messages endpoint, following the cursor
    /// link the platform puts in each response.
    ///
    /// The messages are returned as the raw JSON objects the platform
    /// serialized, so the export on disk stays byte-compatible with the
    /// other tooling reading it.
    pub fn messages(
        &self,
        after: Option<DateTime<Utc>>,
        before: Option<DateTime<Utc>>,
    ) -> Result<Vec<Value>> {
        let url = format!(
            "{base_url}{endpoint}",
            base_url = self.base_url,
            endpoint = Self::MESSAGES_ENDPOINT
        );

        let mut request = self.client.get(url);
        if let Some(after) = after {
            request = request.query(&[("after", after.to_rfc3339())]);
        }
        if let Some(before) = before {
            request = request.query(&[("before", before.to_rfc3339())]);
        }

        let mut messages: Vec<Value> = Vec::new();

        loop {
            let response = request
                .header(AUTHORIZATION, self.token_header())
                .send()?;

            match response.status() {
                StatusCode::OK => {
                    let page: Page<Value> = response.json()?;
                    messages.extend(page.results);

                    match page.next {
                        Some(next) => request = self.client.get(next),
                        None => return Ok(messages),
                    }
                }
                status_code => {
                    let message = response.text()?;
                    let error = FetchError::Response {
                        status_code,
                        message,
                    };
                    return Err(error);
                }
            }
        }
    }

    /// Downloads every message archive and decompresses the gzip payloads
    /// into JSON lines appended to `path`. Returns the decompressed size.
    pub fn download_archives(&self, path: &Path) -> Result<u64> {
        let mut writer = OpenOptions::new()
            .create(true)
            .write(true)
            .truncate(true)
            .open(path)?;

        let url = format!(
            "{base_url}{endpoint}",
            base_url = self.base_url,
            endpoint = Self::ARCHIVES_ENDPOINT
        );
        let mut request = self
            .client
            .get(url)
            .query(&[("archive_type", "message")]);

        let mut bytes = 0;

        loop {
            let response = request
                .header(AUTHORIZATION, self.token_header())
                .send()?;

            let page: Page<Archive> = match response.status() {
                StatusCode::OK => response.json()?,
                status_code => {
                    let message = response.text()?;
                    let error = FetchError::Response {
                        status_code,
                        message,
                    };
                    return Err(error);
                }
            };

            for archive in page.results {
                bytes += self.download_archive(&archive, &mut writer)?;
            }

            match page.next {
                Some(next) => request = self.client.get(next),
                None => return Ok(bytes),
            }
        }
    }

    // The download URL is a pre-signed link to the archive store, so it is
    // fetched without the platform token.
    fn download_archive<W: io::Write>(&self, archive: &Archive, writer: &mut W) -> Result<u64> {
        let response = self.client.get(&archive.download_url).send()?;

        match response.status() {
            StatusCode::OK => {
                let mut decoder = GzDecoder::new(response);
                let bytes = io::copy(&mut decoder, writer)?;
                Ok(bytes)
            }
            status_code => {
                let message = response.text()?;
                let error = FetchError::Response {
                    status_code,
                    message,
                };
                Err(error)
            }
        }
    }

    fn token_header(&self) -> String {
        format!("Token {token}", token = self.token)
    }
}

#[derive(Debug, Deserialize)]
struct Page<T> {
    next: Option<String>,
    results: Vec<T>,
}

#[derive(Debug, Deserialize)]
struct Archive {
    download_url: String,
}
