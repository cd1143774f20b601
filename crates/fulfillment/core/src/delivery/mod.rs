//! Order intake and the fulfillment state machine.
//!
//! [`DeliveryResolver::fulfill`] takes a paid [`Order`], mutates the world,
//! and returns a [`DeliveryResult`] describing exactly what was placed.
mod order;
mod resolver;
mod result;
mod stack;

pub use order::{DeliveryMode, Order};
pub use resolver::DeliveryResolver;
pub use result::{ContainerDelivery, DeliveryMethod, DeliveryResult, DirectPlacement};
pub use stack::split_stacks;
