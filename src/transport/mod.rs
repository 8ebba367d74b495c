//! The `transport` module is the HTTP face of the relay.
//!
//! It maps the browser client's form posts, the broker's push callbacks and
//! the polling reads onto the relay components, and renders the status page.

pub mod http;
pub mod page;
mod params;


pub use http::build_router;
pub use page::StatusPage;
