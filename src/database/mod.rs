pub mod connector;
pub mod models;
pub mod schema;
pub mod types;

pub use connector::{connect, connect_from_url};
