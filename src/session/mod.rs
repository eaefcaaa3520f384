//! Authenticated transport session bound to a base server address.
//!
//! A [`Session`] owns the HTTP connection pool and the NTLM credentials.
//! It is created once at client construction and shared read-only by the
//! transfer operations. Requests are first sent bare; when the server
//! answers 401 and advertises NTLM, the request is replayed through the
//! three-leg negotiate/challenge/authenticate handshake.

mod ntlm;

use reqwest::header::{AUTHORIZATION, HeaderMap};
use reqwest::{Client, Response, StatusCode};
use tracing::{debug, info, warn};
use url::Url;

use crate::transfer::TransferError;

/// NTLM credentials supplied at client construction.
///
/// The username may carry a domain in the usual `DOMAIN\user` form; it is
/// split off at parse time and sent in the authenticate message.
#[derive(Clone)]
pub struct Credentials {
    /// Account name without the domain prefix.
    pub username: String,
    /// NT domain, empty when the username carried none.
    pub domain: String,
    /// Account password.
    pub password: String,
}

impl Credentials {
    /// Splits an optional `DOMAIN\user` prefix off the username.
    #[must_use]
    pub fn parse(username: &str, password: &str) -> Self {
        let (domain, username) = match username.split_once('\\') {
            Some((domain, user)) => (domain, user),
            None => ("", username),
        };
        Self {
            username: username.to_string(),
            domain: domain.to_string(),
            password: password.to_string(),
        }
    }
}

// Keep passwords out of debug logs.
impl std::fmt::Debug for Credentials {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("Credentials")
            .field("username", &self.username)
            .field("domain", &self.domain)
            .field("password", &"<redacted>")
            .finish()
    }
}

/// An authenticated HTTP session, reused across transfer calls.
///
/// Immutable after construction: the base address and credentials never
/// change. The underlying connection pool is owned exclusively by the
/// session; concurrent calls from multiple tasks on the same client are
/// not a supported configuration.
#[derive(Debug, Clone)]
pub struct Session {
    client: Client,
    base_url: Url,
    credentials: Credentials,
}

impl Session {
    /// Connects to `server`, configuring NTLM credentials and issuing a
    /// best-effort warm-up GET against the base address.
    ///
    /// The warm-up probe validates connectivity/credentials and warms the
    /// connection pool; its outcome is logged but never enforced.
    /// Construction succeeds even when the probe fails or returns non-2xx.
    ///
    /// # Errors
    ///
    /// Returns [`TransferError::InvalidUrl`] when `server` is not a valid
    /// URL, or [`TransferError::Network`] when the HTTP client itself
    /// cannot be built. Probe failures are logged, not returned.
    pub async fn connect(
        server: &str,
        username: &str,
        password: &str,
    ) -> Result<Self, TransferError> {
        let base_url =
            Url::parse(server).map_err(|source| TransferError::invalid_url(server, source))?;
        let client = Client::builder()
            .gzip(true)
            .build()
            .map_err(|source| TransferError::network(server, source))?;
        let session = Self {
            client,
            base_url,
            credentials: Credentials::parse(username, password),
        };

        // Warm-up probe: intentionally lenient. This is the only place a
        // transport failure is swallowed; every other request propagates it.
        match session.get(session.base_url.clone()).await {
            Ok(response) => info!(
                server = %session.base_url,
                user = %session.credentials.username,
                status = response.status().as_u16(),
                reason = status_reason(response.status()),
                "created connection"
            ),
            Err(error) => warn!(
                server = %session.base_url,
                error = %error,
                "warm-up probe failed, continuing"
            ),
        }

        Ok(session)
    }

    /// The base server address this session is bound to.
    #[must_use]
    pub fn base_url(&self) -> &Url {
        &self.base_url
    }

    /// Issues a GET, authenticating on demand.
    ///
    /// # Errors
    ///
    /// Returns [`TransferError::Network`] on transport failure and
    /// [`TransferError::Auth`] when the NTLM handshake cannot complete.
    pub(crate) async fn get(&self, url: Url) -> Result<Response, TransferError> {
        self.execute(url.clone(), || self.client.get(url.clone()))
            .await
    }

    /// Issues a POST with a fixed body and headers, authenticating on
    /// demand. The body is rebuilt for each handshake leg.
    ///
    /// # Errors
    ///
    /// Same as [`Session::get`].
    pub(crate) async fn post(
        &self,
        url: Url,
        body: Vec<u8>,
        headers: HeaderMap,
    ) -> Result<Response, TransferError> {
        self.execute(url.clone(), || {
            self.client
                .post(url.clone())
                .headers(headers.clone())
                .body(body.clone())
        })
        .await
    }

    /// Sends the request; on 401 + NTLM offer, replays it through the
    /// negotiate/challenge/authenticate legs.
    async fn execute(
        &self,
        url: Url,
        request: impl Fn() -> reqwest::RequestBuilder,
    ) -> Result<Response, TransferError> {
        let first = request()
            .send()
            .await
            .map_err(|source| TransferError::network(url.as_str(), source))?;
        if first.status() != StatusCode::UNAUTHORIZED || !ntlm::offers_ntlm(first.headers()) {
            return Ok(first);
        }

        debug!(url = %url, "server requested NTLM authentication");
        let negotiate = ntlm::negotiate_header()?;
        let challenged = request()
            .header(AUTHORIZATION, negotiate)
            .send()
            .await
            .map_err(|source| TransferError::network(url.as_str(), source))?;
        let Some(challenge) = ntlm::challenge_from_headers(challenged.headers()) else {
            // Offered NTLM but never sent a challenge; hand the response
            // back so the caller sees the raw status.
            return Ok(challenged);
        };
        let authenticate = ntlm::authenticate_header(&self.credentials, &challenge)?;
        request()
            .header(AUTHORIZATION, authenticate)
            .send()
            .await
            .map_err(|source| TransferError::network(url.as_str(), source))
    }
}

/// Canonical reason phrase for a status code, empty for unknown codes.
pub(crate) fn status_reason(status: StatusCode) -> &'static str {
    status.canonical_reason().unwrap_or("")
}
