pub mod audit;
pub mod auth;
pub mod dashboard;
pub mod seed;
