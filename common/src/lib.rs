pub mod config;
pub mod db;
pub mod hashing;
pub mod purl;
pub mod uuid;
