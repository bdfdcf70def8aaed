pub mod explore;
pub mod features;
pub mod file_ingest;
pub mod login;
pub mod not_found;
pub mod tier_zero;
