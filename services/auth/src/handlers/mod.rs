pub mod code;
pub mod health;
pub mod session;
