//! HTTP client for the annotation server.
//!
//! Three endpoints: the row listing, the full-row update, and static media
//! retrieval. Errors map into the viewer taxonomy at this boundary; nothing
//! above it sees a `reqwest` type.

use std::time::Duration;

use reqwest::Client;

use relabel_core::{CommitError, FetchError, PlaybackError, Row};

use crate::config::ViewerConfig;

pub struct ApiClient {
    client: Client,
    config: ViewerConfig,
}

impl ApiClient {
    pub fn new(config: ViewerConfig) -> Self {
        let client = Client::builder()
            .timeout(Duration::from_secs(30))
            .build()
            .expect("Failed to create HTTP client");

        Self { client, config }
    }

    pub fn config(&self) -> &ViewerConfig {
        &self.config
    }

    /// `GET /rows`: the full ordered row listing.
    pub async fn list_rows(&self) -> Result<Vec<Row>, FetchError> {
        let url = self.config.rows_url().map_err(|e| FetchError::RequestFailed {
            message: e.to_string(),
        })?;

        let response = self
            .client
            .get(url)
            .send()
            .await
            .map_err(|e| FetchError::RequestFailed {
                message: e.to_string(),
            })?;

        let status = response.status();
        if !status.is_success() {
            return Err(FetchError::Status {
                status: status.as_u16(),
            });
        }

        response
            .json::<Vec<Row>>()
            .await
            .map_err(|e| FetchError::InvalidResponse {
                message: e.to_string(),
            })
    }

    /// `PUT /rows/{id}` with the full row body; the server has no
    /// partial-field update semantics.
    pub async fn update_row(&self, row: &Row) -> Result<(), CommitError> {
        let url = self
            .config
            .row_url(row.id)
            .map_err(|e| CommitError::RequestFailed {
                message: e.to_string(),
            })?;

        let response = self
            .client
            .put(url)
            .json(row)
            .send()
            .await
            .map_err(|e| CommitError::RequestFailed {
                message: e.to_string(),
            })?;

        let status = response.status();
        if !status.is_success() {
            let message = response.text().await.unwrap_or_default();
            return Err(CommitError::Rejected {
                status: status.as_u16(),
                message,
            });
        }
        Ok(())
    }

    /// Retrieve the audio asset bytes for a row's `audio_file_path`.
    pub async fn fetch_media(&self, audio_file_path: &str) -> Result<Vec<u8>, PlaybackError> {
        let url =
            self.config
                .media_url(audio_file_path)
                .map_err(|e| PlaybackError::MediaUnavailable {
                    message: e.to_string(),
                })?;

        let response =
            self.client
                .get(url)
                .send()
                .await
                .map_err(|e| PlaybackError::MediaUnavailable {
                    message: e.to_string(),
                })?;

        let status = response.status();
        if !status.is_success() {
            return Err(PlaybackError::MediaUnavailable {
                message: format!("status {status} for {audio_file_path}"),
            });
        }

        let bytes = response
            .bytes()
            .await
            .map_err(|e| PlaybackError::MediaUnavailable {
                message: e.to_string(),
            })?;
        Ok(bytes.to_vec())
    }
}
