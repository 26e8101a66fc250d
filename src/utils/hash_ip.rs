use sha2::{Digest, Sha256};

/// Salted SHA-256 of an IP address, for log lines that must not carry the raw IP.
pub fn hash_ip(ip: &str, salt: &str) -> String {
    let salted_ip = format!("{}{}", ip, salt);

    let mut hasher = Sha256::new();
    hasher.update(salted_ip.as_bytes());
    let result = hasher.finalize();

    format!("{:x}", result)
}
