//! The three remote FileTransfer operations and response interpretation.
//!
//! Download responses are normalized into [`TransferResult`] regardless of
//! status code - interpreting the status (success / nothing pending /
//! error) is the caller's job, not this layer's. Upload responses pass
//! through as [`UploadOutcome`] uninterpreted. Transport failures propagate
//! as [`TransferError`]; nothing here retries.

pub mod disposition;
mod error;

pub use error::TransferError;

use reqwest::header::{CONTENT_TYPE, HeaderMap, HeaderValue};
use tracing::{debug, info};
use url::Url;

use crate::session::{Session, status_reason};
use disposition::filename_from_headers;

/// Uniform outcome of a download operation.
///
/// Always produced, whatever the HTTP status. `file_name` is present only
/// when the response carried a Content-Disposition header with a filename
/// parameter - never an empty string.
#[derive(Debug, Clone)]
pub struct TransferResult {
    /// Raw response body. For `download_all` this is the server-built
    /// archive, treated as opaque bytes.
    pub content: Vec<u8>,
    /// HTTP status code.
    pub status: u16,
    /// Canonical reason phrase for the status.
    pub reason: String,
    /// Server-suggested save name, when one was sent.
    pub file_name: Option<String>,
}

/// Raw result of an upload call, passed through uninterpreted.
#[derive(Debug, Clone)]
pub struct UploadOutcome {
    /// HTTP status code, server-defined.
    pub status: u16,
    /// Canonical reason phrase for the status.
    pub reason: String,
    /// Response headers as received.
    pub headers: HeaderMap,
}

/// Client for a remote FileTransfer endpoint.
///
/// Created once and reused; the underlying [`Session`] holds the
/// authenticated connection pool.
///
/// # Example
///
/// ```no_run
/// use fileferry::TransferClient;
///
/// # async fn example() -> Result<(), Box<dyn std::error::Error>> {
/// let client =
///     TransferClient::connect("https://files.example.net", r"CORP\bot", "secret").await?;
/// let result = client.download().await?;
/// if result.status == 200 {
///     println!("got {} bytes ({:?})", result.content.len(), result.file_name);
/// }
/// # Ok(())
/// # }
/// ```
#[derive(Debug, Clone)]
pub struct TransferClient {
    session: Session,
}

impl TransferClient {
    /// Connects to the server and warms the session.
    ///
    /// See [`Session::connect`] for the warm-up probe semantics.
    ///
    /// # Errors
    ///
    /// Returns [`TransferError::InvalidUrl`] for a malformed server address
    /// or [`TransferError::Network`] when the HTTP client cannot be built.
    pub async fn connect(
        server: &str,
        username: &str,
        password: &str,
    ) -> Result<Self, TransferError> {
        Ok(Self {
            session: Session::connect(server, username, password).await?,
        })
    }

    /// Wraps an already-established session.
    #[must_use]
    pub fn from_session(session: Session) -> Self {
        Self { session }
    }

    /// The session this client issues requests through.
    #[must_use]
    pub fn session(&self) -> &Session {
        &self.session
    }

    /// Downloads the single next pending file.
    ///
    /// Always yields a [`TransferResult`], whatever the status code.
    ///
    /// # Errors
    ///
    /// Only transport-level failures ([`TransferError::Network`]) and
    /// handshake failures ([`TransferError::Auth`]) are errors; non-2xx
    /// statuses are data on the result.
    pub async fn download(&self) -> Result<TransferResult, TransferError> {
        info!("downloading single file");
        self.fetch("FileTransfer/download").await
    }

    /// Downloads every pending file in one request.
    ///
    /// The server bundles its pending exportable files into a single
    /// archive before responding; the archive is returned as opaque bytes
    /// and never unpacked here.
    ///
    /// # Errors
    ///
    /// Same as [`TransferClient::download`].
    pub async fn download_all(&self) -> Result<TransferResult, TransferError> {
        info!("downloading all pending files");
        self.fetch("FileTransfer/downloadall").await
    }

    async fn fetch(&self, endpoint: &str) -> Result<TransferResult, TransferError> {
        let url = self.endpoint_url(endpoint)?;
        let response = self.session.get(url.clone()).await?;
        let status = response.status();

        debug!(headers = ?response.headers(), "response headers");
        info!(
            status = status.as_u16(),
            reason = status_reason(status),
            "response status"
        );

        let file_name = filename_from_headers(response.headers());
        let content = response
            .bytes()
            .await
            .map_err(|source| TransferError::network(url.as_str(), source))?;

        Ok(TransferResult {
            content: content.to_vec(),
            status: status.as_u16(),
            reason: status_reason(status).to_string(),
            file_name,
        })
    }

    /// Uploads raw bytes as `file_name` into a remote `folder` ("" means
    /// the root folder).
    ///
    /// The request declares `Content-Type: multipart/form-data` while the
    /// body is the raw bytes, NOT a multipart envelope. That mismatch is
    /// the endpoint's observed wire contract and is preserved as-is.
    ///
    /// # Errors
    ///
    /// Transport and handshake failures only; the response status is
    /// passed through on the outcome, uninterpreted.
    pub async fn upload(
        &self,
        content: Vec<u8>,
        file_name: &str,
        folder: &str,
    ) -> Result<UploadOutcome, TransferError> {
        info!(file_name, folder, "uploading file");

        let mut url = self.endpoint_url("FileTransfer/upload")?;
        url.query_pairs_mut()
            .append_pair("filename", file_name)
            .append_pair("dir", folder);

        let mut headers = HeaderMap::new();
        headers.insert(CONTENT_TYPE, HeaderValue::from_static("multipart/form-data"));

        let response = self.session.post(url, content, headers).await?;
        let status = response.status();

        debug!(headers = ?response.headers(), "response headers");
        info!(
            status = status.as_u16(),
            reason = status_reason(status),
            "response status"
        );

        Ok(UploadOutcome {
            status: status.as_u16(),
            reason: status_reason(status).to_string(),
            headers: response.headers().clone(),
        })
    }

    /// Joins an endpoint path onto the base address the way the server
    /// expects: `<base>/<endpoint>`, regardless of any trailing slash on
    /// the base.
    fn endpoint_url(&self, endpoint: &str) -> Result<Url, TransferError> {
        let base = self.session.base_url().as_str().trim_end_matches('/');
        let joined = format!("{base}/{endpoint}");
        Url::parse(&joined).map_err(|source| TransferError::invalid_url(joined.clone(), source))
    }
}
