//! Hosted-service backend.
//!
//! Speaks the service's PostgREST-style row protocol: a ranged `GET` on the
//! message table ordered by `time` descending, and a `POST` to append.  The
//! API key, when configured, travels both as the `apikey` header and as a
//! bearer token.

use reqwest::RequestBuilder;

use causerie_shared::types::StoredMessage;

use crate::config::ServiceConfig;

use super::{BackendError, MessageBackend};

/// Backend over the hosted message service.
#[derive(Debug, Clone)]
pub struct RestBackend {
    http: reqwest::Client,
    config: ServiceConfig,
}

impl RestBackend {
    pub fn new(config: ServiceConfig) -> Self {
        Self {
            http: reqwest::Client::new(),
            config,
        }
    }

    /// URL of the message table endpoint.
    fn table_url(&self) -> String {
        format!(
            "{}/{}",
            self.config.base_url.trim_end_matches('/'),
            self.config.table
        )
    }

    fn authorize(&self, request: RequestBuilder) -> RequestBuilder {
        match &self.config.api_key {
            Some(key) => request.header("apikey", key).bearer_auth(key),
            None => request,
        }
    }
}

impl MessageBackend for RestBackend {
    async fn select_page(
        &self,
        offset: u64,
        limit: u32,
    ) -> Result<Vec<StoredMessage>, BackendError> {
        let offset = offset.to_string();
        let limit = limit.to_string();
        let request = self.http.get(self.table_url()).query(&[
            ("select", "text,time"),
            ("order", "time.desc"),
            ("offset", offset.as_str()),
            ("limit", limit.as_str()),
        ]);

        let response = self
            .authorize(request)
            .send()
            .await
            .map_err(|e| BackendError::Fetch(format!("Service unreachable: {e}")))?;

        if !response.status().is_success() {
            return Err(BackendError::Fetch(format!(
                "Service replied {}",
                response.status()
            )));
        }

        response
            .json::<Vec<StoredMessage>>()
            .await
            .map_err(|e| BackendError::Fetch(format!("Invalid service response: {e}")))
    }

    async fn insert(&self, message: &StoredMessage) -> Result<(), BackendError> {
        let request = self.http.post(self.table_url()).json(&[message]);

        let response = self
            .authorize(request)
            .send()
            .await
            .map_err(|e| BackendError::Insert(format!("Service unreachable: {e}")))?;

        if !response.status().is_success() {
            return Err(BackendError::Insert(format!(
                "Service replied {}",
                response.status()
            )));
        }

        Ok(())
    }
}
