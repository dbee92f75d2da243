pub mod database;
pub mod period;
pub mod sessions;
