pub mod code;
pub mod session;
pub mod verify;
