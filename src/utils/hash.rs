//! Content digests for cache-busting filenames.
//!
//! Uses SHA-1 so digests match the `name-<11 hex>.ext` scheme that servers
//! and templates already key on.
//!
//! # Usage
//!
//! ```ignore
//! use crate::utils::hash;
//!
//! let fp = hash::fingerprint("body{color:red}"); // -> "1b2c3d4e5f6"
//! ```

use sha1::{Digest, Sha1};

/// Length of the hex fingerprint appended to filenames.
pub const FINGERPRINT_LEN: usize = 11;

/// Full lowercase hex SHA-1 of the UTF-8 bytes.
#[inline]
pub fn sha1_hex<T: AsRef<[u8]> + ?Sized>(data: &T) -> String {
    hex::encode(Sha1::digest(data.as_ref()))
}

/// First 11 hex chars of the SHA-1 digest.
#[inline]
pub fn fingerprint<T: AsRef<[u8]> + ?Sized>(value: &T) -> String {
    let mut digest = sha1_hex(value);
    digest.truncate(FINGERPRINT_LEN);
    digest
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_known_digest() {
        assert_eq!(sha1_hex("abc"), "a9993e364706816aba3e25717850c26c9cd0d89d");
        assert_eq!(fingerprint("abc"), "a9993e36470");
    }

    #[test]
    fn test_fingerprint_shape() {
        let fp = fingerprint("body { color: red }");
        assert_eq!(fp.len(), FINGERPRINT_LEN);
        assert!(
            fp.chars()
                .all(|c| c.is_ascii_digit() || ('a'..='f').contains(&c))
        );
    }
}
