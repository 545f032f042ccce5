pub mod cache;
pub mod clock;
pub mod locks;
pub mod mail;
pub mod memory;
pub mod store;
