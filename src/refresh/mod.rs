//! Periodic Refresh
//!
//! Each widget owns one refresh loop; there is no shared scheduler.
//!
//! - [`RefreshController`]: starts a loop at a fixed interval
//! - [`RefreshHandle`]: cancels it (also on drop)
//! - [`Subscription`]: cancel-and-replace when a widget's inputs change

mod controller;
mod subscription;

pub use controller::{RefreshController, RefreshHandle, RefreshToken};
pub use subscription::{ActionFactory, Subscription};
