//! Content-Encoding decompression.

use crate::base::neterror::NetError;
use bytes::Bytes;
use std::io::Read;

/// Decode `data` according to a `Content-Encoding` value.
///
/// `gzip`/`x-gzip` go through the gzip decoder. Any other non-identity
/// coding is tried as zlib and then raw deflate, since servers disagree
/// on what `deflate` means.
pub fn decompress(encoding: &str, data: &[u8]) -> Result<Bytes, NetError> {
    let encoding = encoding.trim().to_ascii_lowercase();
    match encoding.as_str() {
        "" | "identity" => Ok(Bytes::copy_from_slice(data)),
        "gzip" | "x-gzip" => decompress_gzip(data),
        _ => decompress_deflate(&encoding, data),
    }
}

fn decompress_gzip(data: &[u8]) -> Result<Bytes, NetError> {
    let mut decoder = flate2::read::GzDecoder::new(data);
    let mut decoded = Vec::new();
    decoder.read_to_end(&mut decoded).map_err(|e| NetError::ContentDecodingFailed {
        encoding: "gzip".to_string(),
        reason: e.to_string(),
    })?;
    Ok(Bytes::from(decoded))
}

fn decompress_deflate(encoding: &str, data: &[u8]) -> Result<Bytes, NetError> {
    let mut decoded = Vec::new();
    if flate2::read::ZlibDecoder::new(data).read_to_end(&mut decoded).is_ok() {
        return Ok(Bytes::from(decoded));
    }
    decoded.clear();
    flate2::read::DeflateDecoder::new(data).read_to_end(&mut decoded).map_err(|e| {
        NetError::ContentDecodingFailed { encoding: encoding.to_string(), reason: e.to_string() }
    })?;
    Ok(Bytes::from(decoded))
}

#[cfg(test)]
mod tests {
    use super::*;
    use flate2::write::{DeflateEncoder, GzEncoder, ZlibEncoder};
    use flate2::Compression;
    use std::io::Write;

    const TEXT: &[u8] = b"<html><body>compressed body</body></html>";

    #[test]
    fn test_identity() {
        assert_eq!(&decompress("identity", TEXT).unwrap()[..], TEXT);
        assert_eq!(&decompress("", TEXT).unwrap()[..], TEXT);
    }

    #[test]
    fn test_gzip() {
        let mut enc = GzEncoder::new(Vec::new(), Compression::default());
        enc.write_all(TEXT).unwrap();
        let data = enc.finish().unwrap();
        assert_eq!(&decompress("gzip", &data).unwrap()[..], TEXT);
        assert_eq!(&decompress(" X-GZIP ", &data).unwrap()[..], TEXT);
    }

    #[test]
    fn test_zlib_and_raw_deflate() {
        let mut enc = ZlibEncoder::new(Vec::new(), Compression::default());
        enc.write_all(TEXT).unwrap();
        assert_eq!(&decompress("deflate", &enc.finish().unwrap()).unwrap()[..], TEXT);

        let mut enc = DeflateEncoder::new(Vec::new(), Compression::default());
        enc.write_all(TEXT).unwrap();
        assert_eq!(&decompress("deflate", &enc.finish().unwrap()).unwrap()[..], TEXT);
    }

    #[test]
    fn test_corrupt_gzip() {
        let err = decompress("gzip", b"definitely not gzip").unwrap_err();
        assert!(matches!(err, NetError::ContentDecodingFailed { ref encoding, .. } if encoding == "gzip"));
    }
}
