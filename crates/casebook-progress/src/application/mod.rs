//! Progress application services.

pub mod commit;
pub mod tracker;
