pub mod application_id;
pub mod decode;
pub mod hash_ip;
