#[macro_use]
extern crate log;

pub mod config;
pub mod db;
pub mod model;
pub mod operations;
pub mod policy;
pub mod service;
pub mod templates;
