//! Event delegation.
//!
//! Provides the generic [`Delegate`] publish/subscribe primitive used to
//! decouple producers of pointer events from their consumers, along with the
//! [`OwnerId`]/[`SubscriptionId`] handles used for targeted and bulk
//! unsubscription.

mod delegate;

pub use delegate::{Delegate, OwnerId, SubscriptionId};
