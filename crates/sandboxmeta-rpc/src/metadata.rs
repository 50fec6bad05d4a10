//! Conversion between context metadata and tonic's wire representation
//!
//! Context metadata holds plain strings. Encodability is only checked here,
//! when a request is about to be sent. Received values are decoded from
//! their raw bytes, so anything a peer could send reads back as a string.

use sandboxmeta_common::{Error, Result};
use sandboxmeta_context::GrpcMetadata;
use tonic::metadata::{
    AsciiMetadataKey, AsciiMetadataValue, BinaryMetadataKey, BinaryMetadataValue, KeyAndValueRef,
    MetadataMap,
};

/// Encode context metadata as a tonic metadata map
///
/// Keys ending in `-bin` are sent as binary metadata carrying the value's
/// UTF-8 bytes. Fails on the first key or value gRPC cannot carry.
pub fn to_metadata_map(md: &GrpcMetadata) -> Result<MetadataMap> {
    let mut map = MetadataMap::new();
    for (key, values) in md.iter() {
        if key.ends_with("-bin") {
            let name = BinaryMetadataKey::from_bytes(key.as_bytes())
                .map_err(|e| Error::invalid_key(key, e.to_string()))?;
            for value in values {
                map.append_bin(name.clone(), BinaryMetadataValue::from_bytes(value.as_bytes()));
            }
        } else {
            let name = AsciiMetadataKey::from_bytes(key.as_bytes())
                .map_err(|e| Error::invalid_key(key, e.to_string()))?;
            for value in values {
                let value = AsciiMetadataValue::try_from(value.as_bytes())
                    .map_err(|e| Error::invalid_value(key, e.to_string()))?;
                map.append(name.clone(), value);
            }
        }
    }
    Ok(map)
}

/// Decode a received tonic metadata map
///
/// Value order per key is preserved. Bytes that are not UTF-8 are replaced
/// rather than dropped, so a present key always yields a value.
#[must_use]
pub fn from_metadata_map(map: &MetadataMap) -> GrpcMetadata {
    map.iter()
        .map(|entry| match entry {
            KeyAndValueRef::Ascii(key, value) => (
                key.as_str().to_string(),
                String::from_utf8_lossy(value.as_encoded_bytes()).into_owned(),
            ),
            KeyAndValueRef::Binary(key, value) => {
                let decoded = match value.to_bytes() {
                    Ok(bytes) => String::from_utf8_lossy(&bytes).into_owned(),
                    Err(_) => String::from_utf8_lossy(value.as_encoded_bytes()).into_owned(),
                };
                (key.as_str().to_string(), decoded)
            }
        })
        .collect()
}
