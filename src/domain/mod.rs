//! Domain types of the location list.

pub mod filter;
pub mod location;
pub mod navigation;
pub mod picklist;
pub mod sort;
pub mod toast;
pub mod types;
