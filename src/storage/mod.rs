pub mod config;
pub mod json_file;
pub mod lockfile;
pub mod record;
pub mod store;
