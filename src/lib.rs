//! # pushrelay
//!
//! `pushrelay` is a small message relay in front of a push-capable message
//! broker (Google Cloud Pub/Sub). Browsers post messages over HTTP, the relay
//! publishes them to a topic, the broker pushes them back to the relay's
//! receive endpoint, and the relay keeps them in a local store behind a
//! recent-messages cache that clients poll.
//!
//! ## Core Modules
//!
//! - `broker`: broker capability trait, the Pub/Sub REST client and the
//!   topic/subscription provisioner.
//! - `persistence`: sled-backed message store and user directory.
//! - `cache`: recent-messages cache over the store.
//! - `relay`: the publish path and the push-delivery path.
//! - `transport`: HTTP routes, CORS handling and the status page.
//! - `config`: layered configuration (file, then environment).
//! - `utils`: error type and logging setup.

pub mod app;
pub mod broker;
pub mod cache;
pub mod config;
pub mod persistence;
pub mod relay;
pub mod transport;
pub mod utils;

#[cfg(test)]
mod test_support;
