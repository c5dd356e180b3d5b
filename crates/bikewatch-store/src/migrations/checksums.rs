//! Migration checksums

use sha2::{Digest, Sha256};

/// Hex SHA-256 of migration SQL, insensitive to CRLF vs LF checkouts
pub fn compute_checksum(sql: &str) -> String {
    let normalized = sql.replace("\r\n", "\n");
    hex::encode(Sha256::digest(normalized.as_bytes()))
}
