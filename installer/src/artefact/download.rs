//! Artefact download logic for release archive retrieval.
//!
//! Provides a trait-based abstraction for fetching artefact bytes over
//! HTTPS, enabling dependency injection for testing.

use log::debug;
use std::io::Read;
use std::time::Duration;

/// Default network timeout for artefact downloads.
pub const DEFAULT_DOWNLOAD_TIMEOUT: Duration = Duration::from_secs(60);

/// Trait for fetching artefact bytes from a URL.
///
/// Abstractions allow tests to mock HTTP behaviour without network access.
///
/// # Examples
///
/// ```
/// use volley_installer::artefact::download::{DEFAULT_DOWNLOAD_TIMEOUT, HttpDownloader};
///
/// let downloader = HttpDownloader::new(DEFAULT_DOWNLOAD_TIMEOUT);
/// // Use downloader.fetch(url) in production
/// ```
#[cfg_attr(test, mockall::automock)]
pub trait ArtefactDownloader {
    /// Download the full body at `url`.
    ///
    /// # Errors
    ///
    /// Returns an error on network failure, a non-success status, a body
    /// shorter than its declared length, or a timeout.
    fn fetch(&self, url: &str) -> Result<Vec<u8>, DownloadError>;
}

/// Errors arising from artefact download operations.
#[derive(Debug, thiserror::Error)]
pub enum DownloadError {
    /// HTTP request failed.
    #[error("download failed for {url}: {reason}")]
    HttpError {
        /// The URL that was requested.
        url: String,
        /// A human-readable description of the failure.
        reason: String,
    },

    /// The requested artefact was not found (HTTP 404).
    #[error("artefact not found: {url}")]
    NotFound {
        /// The URL that returned 404.
        url: String,
    },

    /// The transfer did not finish within the configured timeout.
    #[error("download of {url} timed out after {seconds} seconds")]
    TimedOut {
        /// The URL that was requested.
        url: String,
        /// The timeout that expired.
        seconds: u64,
    },

    /// The body ended before the length declared by the server.
    #[error("truncated download from {url}: expected {expected} bytes, received {received}")]
    Truncated {
        /// The URL that was requested.
        url: String,
        /// The declared `Content-Length`.
        expected: u64,
        /// The number of bytes actually read.
        received: u64,
    },

    /// I/O error reading the response body.
    #[error("I/O error reading download: {0}")]
    Io(#[from] std::io::Error),
}

/// HTTP-based downloader using `ureq`.
pub struct HttpDownloader {
    agent: ureq::Agent,
    timeout: Duration,
}

impl HttpDownloader {
    /// Create a downloader whose requests are bounded by `timeout`.
    #[must_use]
    pub fn new(timeout: Duration) -> Self {
        let config = ureq::Agent::config_builder()
            .timeout_global(Some(timeout))
            .build();
        Self {
            agent: ureq::Agent::new_with_config(config),
            timeout,
        }
    }
}

impl ArtefactDownloader for HttpDownloader {
    fn fetch(&self, url: &str) -> Result<Vec<u8>, DownloadError> {
        debug!("GET {url}");
        let response = self
            .agent
            .get(url)
            .call()
            .map_err(|e| map_ureq_error(url, &e, self.timeout))?;
        let declared = declared_length(response.headers());

        let mut bytes = Vec::new();
        if let Err(err) = response.into_body().as_reader().read_to_end(&mut bytes) {
            // `read_to_end` keeps whatever arrived before the failure.
            let err = ureq::Error::from(err);
            return Err(map_body_error(url, &err, declared, bytes.len(), self.timeout));
        }
        debug!("received {} bytes from {url}", bytes.len());

        check_complete(url, declared, bytes.len())?;
        Ok(bytes)
    }
}

/// Return the declared body length, unless the body is content-encoded.
fn declared_length(headers: &ureq::http::HeaderMap) -> Option<u64> {
    if headers.contains_key(ureq::http::header::CONTENT_ENCODING) {
        return None;
    }
    headers
        .get(ureq::http::header::CONTENT_LENGTH)
        .and_then(|value| value.to_str().ok())
        .and_then(|value| value.trim().parse().ok())
}

/// Reject bodies shorter than the declared length.
fn check_complete(url: &str, declared: Option<u64>, received: usize) -> Result<(), DownloadError> {
    let received = u64::try_from(received).unwrap_or(u64::MAX);
    match declared {
        Some(expected) if received < expected => Err(DownloadError::Truncated {
            url: url.to_owned(),
            expected,
            received,
        }),
        _ => Ok(()),
    }
}

/// Map a failure while reading the body.
///
/// ureq reports a connection closed before `Content-Length` bytes as an
/// unexpected EOF; that becomes [`DownloadError::Truncated`].
fn map_body_error(
    url: &str,
    err: &ureq::Error,
    declared: Option<u64>,
    received: usize,
    timeout: Duration,
) -> DownloadError {
    match err {
        ureq::Error::Io(io_err) if io_err.kind() == std::io::ErrorKind::UnexpectedEof => {
            match check_complete(url, declared, received) {
                Err(truncated) => truncated,
                Ok(()) => map_ureq_error(url, err, timeout),
            }
        }
        other => map_ureq_error(url, other, timeout),
    }
}

/// Map a ureq error to a [`DownloadError`].
fn map_ureq_error(url: &str, err: &ureq::Error, timeout: Duration) -> DownloadError {
    match err {
        ureq::Error::StatusCode(404) => DownloadError::NotFound {
            url: url.to_owned(),
        },
        ureq::Error::Timeout(_) => DownloadError::TimedOut {
            url: url.to_owned(),
            seconds: timeout.as_secs(),
        },
        other => DownloadError::HttpError {
            url: url.to_owned(),
            reason: other.to_string(),
        },
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    const URL: &str = "https://example.test/volley-linux-amd64.tar.gz";

    #[test]
    fn map_ureq_error_maps_404_to_not_found() {
        let err = ureq::Error::StatusCode(404);
        let mapped = map_ureq_error(URL, &err, DEFAULT_DOWNLOAD_TIMEOUT);
        assert!(matches!(mapped, DownloadError::NotFound { .. }));
    }

    #[test]
    fn map_ureq_error_maps_other_status_to_http_error() {
        let err = ureq::Error::StatusCode(500);
        let mapped = map_ureq_error(URL, &err, DEFAULT_DOWNLOAD_TIMEOUT);
        assert!(matches!(mapped, DownloadError::HttpError { .. }));
    }

    #[test]
    fn truncated_body_is_rejected() {
        let err = check_complete(URL, Some(100), 40).expect_err("short body");
        assert!(matches!(
            err,
            DownloadError::Truncated {
                expected: 100,
                received: 40,
                ..
            }
        ));
    }

    #[test]
    fn complete_or_undeclared_body_is_accepted() {
        assert!(check_complete(URL, Some(40), 40).is_ok());
        assert!(check_complete(URL, None, 40).is_ok());
    }

    #[test]
    fn declared_length_ignores_encoded_bodies() {
        let mut headers = ureq::http::HeaderMap::new();
        headers.insert(
            ureq::http::header::CONTENT_LENGTH,
            ureq::http::HeaderValue::from_static("12"),
        );
        assert_eq!(declared_length(&headers), Some(12));

        headers.insert(
            ureq::http::header::CONTENT_ENCODING,
            ureq::http::HeaderValue::from_static("gzip"),
        );
        assert_eq!(declared_length(&headers), None);
    }

    #[test]
    fn body_timeout_maps_to_timed_out() {
        let err = ureq::Error::Timeout(ureq::Timeout::Global);
        let mapped = map_body_error(URL, &err, Some(100), 10, Duration::from_secs(1));
        assert!(matches!(mapped, DownloadError::TimedOut { seconds: 1, .. }));
    }

    #[test]
    fn early_eof_with_declared_length_maps_to_truncated() {
        let err = ureq::Error::Io(std::io::Error::new(
            std::io::ErrorKind::UnexpectedEof,
            "Peer disconnected",
        ));
        let mapped = map_body_error(URL, &err, Some(100), 10, DEFAULT_DOWNLOAD_TIMEOUT);
        assert!(matches!(
            mapped,
            DownloadError::Truncated {
                expected: 100,
                received: 10,
                ..
            }
        ));
    }

    #[test]
    fn early_eof_without_declared_length_is_an_http_error() {
        let err = ureq::Error::Io(std::io::Error::new(
            std::io::ErrorKind::UnexpectedEof,
            "Peer disconnected",
        ));
        let mapped = map_body_error(URL, &err, None, 10, DEFAULT_DOWNLOAD_TIMEOUT);
        assert!(matches!(mapped, DownloadError::HttpError { .. }));
    }

    #[test]
    fn timed_out_message_names_timeout() {
        let err = DownloadError::TimedOut {
            url: URL.to_owned(),
            seconds: 60,
        };
        assert!(err.to_string().contains("60 seconds"));
    }

    /// Serves one canned HTTP response on a loopback socket.
    ///
    /// The connection stays open for `hold` after the response is written.
    mod local_server {
        use std::io::{BufRead, BufReader, Write};
        use std::net::TcpListener;
        use std::thread;
        use std::time::Duration;

        pub(super) fn serve_once(response: Vec<u8>, hold: Duration) -> String {
            let listener = TcpListener::bind("127.0.0.1:0").expect("bind loopback");
            let addr = listener.local_addr().expect("local addr");
            thread::spawn(move || {
                let (stream, _) = listener.accept().expect("accept");
                let mut reader = BufReader::new(stream.try_clone().expect("clone stream"));
                let mut line = String::new();
                while reader.read_line(&mut line).expect("read request") > 0 {
                    if line == "\r\n" {
                        break;
                    }
                    line.clear();
                }
                let mut stream = stream;
                stream.write_all(&response).expect("write response");
                stream.flush().expect("flush response");
                thread::sleep(hold);
            });
            format!("http://{addr}/volley-linux-amd64.tar.gz")
        }

        pub(super) fn head(status: &str, content_length: usize) -> Vec<u8> {
            format!(
                "HTTP/1.1 {status}\r\nContent-Length: {content_length}\r\nConnection: close\r\n\r\n"
            )
            .into_bytes()
        }
    }

    #[test]
    fn http_downloader_reads_complete_body() {
        let mut response = local_server::head("200 OK", 6);
        response.extend_from_slice(b"volley");
        let url = local_server::serve_once(response, Duration::ZERO);

        let bytes = HttpDownloader::new(Duration::from_secs(5))
            .fetch(&url)
            .expect("download");
        assert_eq!(bytes, b"volley");
    }

    #[test]
    fn http_downloader_times_out_on_stalled_body() {
        let mut response = local_server::head("200 OK", 100);
        response.extend_from_slice(&[0_u8; 10]);
        let url = local_server::serve_once(response, Duration::from_secs(3));

        let err = HttpDownloader::new(Duration::from_secs(1))
            .fetch(&url)
            .expect_err("stalled body");
        assert!(
            matches!(err, DownloadError::TimedOut { seconds: 1, .. }),
            "expected TimedOut, got {err:?}"
        );
    }

    #[test]
    fn http_downloader_reports_short_body_as_truncated() {
        let mut response = local_server::head("200 OK", 100);
        response.extend_from_slice(&[0_u8; 10]);
        let url = local_server::serve_once(response, Duration::ZERO);

        let err = HttpDownloader::new(Duration::from_secs(5))
            .fetch(&url)
            .expect_err("short body");
        assert!(
            matches!(err, DownloadError::Truncated { expected: 100, .. }),
            "expected Truncated, got {err:?}"
        );
    }

    #[test]
    fn http_downloader_reports_server_error_status() {
        let url = local_server::serve_once(
            local_server::head("500 Internal Server Error", 0),
            Duration::ZERO,
        );

        let err = HttpDownloader::new(Duration::from_secs(5))
            .fetch(&url)
            .expect_err("server error");
        assert!(
            matches!(&err, DownloadError::HttpError { reason, .. } if reason.contains("500")),
            "expected HttpError naming 500, got {err:?}"
        );
    }

    #[test]
    fn http_downloader_maps_404_to_not_found() {
        let url = local_server::serve_once(local_server::head("404 Not Found", 0), Duration::ZERO);

        let err = HttpDownloader::new(Duration::from_secs(5))
            .fetch(&url)
            .expect_err("missing artefact");
        assert!(matches!(err, DownloadError::NotFound { .. }), "got {err:?}");
    }
}
