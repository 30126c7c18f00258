mod client;
pub mod ical;
pub mod multistatus;

pub use client::{calendar_query, CalDavClient};
