//! The `relay` module holds the two halves of the message pipeline.
//!
//! - `publish`: client message → envelope → broker topic.
//! - `delivery`: broker push callback → message store → cache invalidation.

pub mod delivery;
pub mod publish;


pub use delivery::{Delivery, PushReceiver};
pub use publish::Publisher;
