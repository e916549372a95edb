pub mod api;
pub mod config;
pub mod control;
pub mod db;
pub mod error;
pub mod sensors;
pub mod sunset;
