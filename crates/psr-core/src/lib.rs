pub mod config;
pub mod domain;
pub mod histogram;
pub mod numerics;
pub mod response;
pub mod serialization;
pub mod spectrum;
pub mod units;
