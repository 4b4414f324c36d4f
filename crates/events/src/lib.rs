//! Catalog change events and their real-time fan-out.
//!
//! - `change`: the `ChangeEvent` emitted after a committed catalog write
//! - `registry`: the set of currently-connected real-time subscribers
//! - `notifier`: publishing a change to every registered subscriber

pub mod change;
pub mod notifier;
pub mod registry;

pub use change::{ChangeEvent, ChangeKind};
pub use notifier::{ChangeNotifier, FanoutNotifier};
pub use registry::{SubscriberHandle, SubscriberRegistry, Subscription, DEFAULT_QUEUE_CAPACITY};
