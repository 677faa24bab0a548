pub mod client;
pub mod error;
pub mod models;

pub use client::{OsPlacesClient, PlacesApi, QueryParamOverrides};
pub use error::PlacesApiError;
