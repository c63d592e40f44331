//! Parsed result of one fetch attempt.

use crate::base::neterror::NetError;
use crate::http::decode::decompress;
use crate::http::encoding::Encoding;
use crate::http::headers::HeaderBlock;
use bytes::Bytes;
use http::Method;
use std::borrow::Cow;
use thiserror::Error;
use tracing::{debug, warn};
use url::Url;

const HEADER_SEPARATOR: &[u8] = b"\r\n\r\n";

/// A fetch that failed, with everything known about the attempt.
#[derive(Debug, Clone, Error)]
#[error("{error} (fetching {url})")]
pub struct FetchError {
    #[source]
    pub error: NetError,
    pub url: Url,
    pub encoding: Encoding,
    /// Bytes written before the failure.
    pub sent: Bytes,
    /// Headers parsed from whatever came back, if anything did.
    pub headers: Option<HeaderBlock>,
}

impl FetchError {
    pub fn new(error: NetError, url: Url, encoding: Encoding, sent: Bytes) -> Self {
        Self { error, url, encoding, sent, headers: None }
    }

    pub fn code(&self) -> i32 {
        self.error.as_i32()
    }
}

/// A successfully parsed HTTP response.
#[derive(Debug, Clone)]
pub struct HttpResponse {
    url: Url,
    encoding: Encoding,
    sent: Bytes,
    headers: HeaderBlock,
    content: Bytes,
    decoding_error: Option<NetError>,
}

impl HttpResponse {
    /// Split `raw` into headers and content.
    ///
    /// `file:` responses have no header block; the whole stream is content.
    pub fn parse(raw: &[u8], url: Url, encoding: Encoding, sent: Bytes) -> Result<Self, FetchError> {
        if raw.is_empty() {
            return Err(FetchError::new(NetError::EmptyResponse, url, encoding, sent));
        }

        if url.scheme() == "file" {
            return Ok(Self {
                url,
                encoding,
                sent,
                headers: HeaderBlock::default(),
                content: Bytes::copy_from_slice(raw),
                decoding_error: None,
            });
        }

        let Some(split) = find(raw, HEADER_SEPARATOR) else {
            let mut err = FetchError::new(NetError::MalformedResponse, url, encoding, sent);
            err.headers = Some(HeaderBlock::parse(&String::from_utf8_lossy(raw)));
            return Err(err);
        };

        let headers = HeaderBlock::parse(&String::from_utf8_lossy(&raw[..split]));
        let body = &raw[split + HEADER_SEPARATOR.len()..];
        let (content, decoding_error) = match headers.content_encoding() {
            Some(coding) => match decompress(coding, body) {
                Ok(decoded) => (decoded, None),
                Err(e) => {
                    warn!(url = %url, error = %e, "Keeping undecodable content");
                    (Bytes::copy_from_slice(body), Some(e))
                }
            },
            None => (Bytes::copy_from_slice(body), None),
        };

        debug!(
            url = %url,
            status = headers.response_code(),
            bytes = content.len(),
            "Parsed response"
        );
        Ok(Self { url, encoding, sent, headers, content, decoding_error })
    }

    pub fn url(&self) -> &Url {
        &self.url
    }

    pub fn encoding(&self) -> &Encoding {
        &self.encoding
    }

    pub fn method(&self) -> &Method {
        self.encoding.method()
    }

    /// Raw request bytes written for this attempt.
    pub fn sent(&self) -> &Bytes {
        &self.sent
    }

    pub fn headers(&self) -> &HeaderBlock {
        &self.headers
    }

    pub fn response_code(&self) -> u16 {
        self.headers.response_code()
    }

    pub fn http_version(&self) -> Option<&str> {
        self.headers.http_version()
    }

    pub fn mime_type(&self) -> Option<&str> {
        self.headers.mime_type()
    }

    pub fn location(&self) -> Option<&str> {
        self.headers.location()
    }

    pub fn is_redirect(&self) -> bool {
        self.headers.is_redirect()
    }

    pub fn is_challenge(&self) -> bool {
        self.headers.is_challenge()
    }

    pub fn authentication_scheme(&self) -> Option<&str> {
        self.headers.authentication()
    }

    pub fn realm(&self) -> Option<&str> {
        self.headers.realm()
    }

    pub fn header(&self, name: &str) -> Option<&str> {
        self.headers.get(name)
    }

    /// Decoded body.
    pub fn content(&self) -> &Bytes {
        &self.content
    }

    pub fn text(&self) -> Cow<'_, str> {
        String::from_utf8_lossy(&self.content)
    }

    /// Set when `Content-Encoding` could not be undone; content is then raw.
    pub fn decoding_error(&self) -> Option<&NetError> {
        self.decoding_error.as_ref()
    }
}

fn find(haystack: &[u8], needle: &[u8]) -> Option<usize> {
    haystack.windows(needle.len()).position(|w| w == needle)
}
