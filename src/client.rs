use std::{io, thread, time::Duration};

use reqwest::{blocking::Client, header::CONTENT_TYPE, StatusCode};

use crate::{
    error::{NanopubError, Result},
    io::RdfFormat,
    nanopub::Nanopub,
};

/// Production nanopublication server
pub const PRODUCTION_SERVER: &str = "https://np.knowledgepixels.com/";

/// Test nanopublication server
pub const TEST_SERVER: &str = "https://np.test.knowledgepixels.com/";

const DEFAULT_TIMEOUT: Duration = Duration::from_secs(30);
const DEFAULT_MAX_RETRIES: u32 = 3;
const DEFAULT_BACKOFF: Duration = Duration::from_millis(500);

/// Blocking client for publishing and fetching nanopublications.
#[derive(Debug, Clone)]
pub struct NanopubClient {
    server: String,
    http: Client,
    max_retries: u32,
    backoff: Duration,
}

impl NanopubClient {
    /// Client for the production or the test server.
    pub fn new(use_test_server: bool) -> Result<Self> {
        Self::with_server(if use_test_server {
            TEST_SERVER
        } else {
            PRODUCTION_SERVER
        })
    }

    pub fn with_server(server: &str) -> Result<Self> {
        let http = Client::builder().timeout(DEFAULT_TIMEOUT).build()?;
        Ok(NanopubClient {
            server: server.to_owned(),
            http,
            max_retries: DEFAULT_MAX_RETRIES,
            backoff: DEFAULT_BACKOFF,
        })
    }

    /// Retries server errors up to `max_retries` times, doubling `backoff`
    /// after each attempt.
    pub fn with_retries(mut self, max_retries: u32, backoff: Duration) -> Self {
        self.max_retries = max_retries;
        self.backoff = backoff;
        self
    }

    pub fn server(&self) -> &str {
        &self.server
    }

    /// Publishes a signed nanopublication as TriG.
    ///
    /// # Returns
    ///
    /// The URI of the published nanopublication.
    ///
    /// # Errors
    ///
    /// [`NanopubError::Malformed`] for unsigned input; [`NanopubError::Io`]
    /// for transport failures, client errors, and server errors that
    /// persist after the retries.
    pub fn publish(&self, nanopub: &Nanopub) -> Result<String> {
        if !nanopub.is_signed() {
            return Err(NanopubError::malformed(format!(
                "refusing to publish unsigned nanopublication {}",
                nanopub.uri()
            )));
        }

        let body = nanopub.to_trig();
        let mut backoff = self.backoff;
        let mut attempt = 0;
        loop {
            log::debug!("publishing {} to {} (attempt {})", nanopub.uri(), self.server, attempt + 1);
            let response = self
                .http
                .post(&self.server)
                .header(CONTENT_TYPE, RdfFormat::TriG.media_type())
                .body(body.clone())
                .send()?;

            let status = response.status();
            if status.is_success() {
                log::info!("published {}", nanopub.uri());
                return Ok(nanopub.uri().to_owned());
            }
            if status.is_server_error() && attempt < self.max_retries {
                log::warn!("server returned {status}, retrying in {backoff:?}");
                thread::sleep(backoff);
                backoff *= 2;
                attempt += 1;
                continue;
            }
            return Err(http_error(status, response.text().unwrap_or_default()));
        }
    }

    /// Fetches and parses `<uri>.trig`.
    pub fn fetch(&self, uri: &str) -> Result<Nanopub> {
        let url = format!("{uri}.{}", RdfFormat::TriG.extension());
        log::debug!("fetching {url}");
        let response = self.http.get(&url).send()?;
        let status = response.status();
        if !status.is_success() {
            return Err(http_error(status, response.text().unwrap_or_default()));
        }
        Nanopub::parse(&response.text()?, RdfFormat::TriG)
    }
}

fn http_error(status: StatusCode, body: String) -> NanopubError {
    NanopubError::Io(io::Error::other(format!("server returned {status}: {body}")))
}
