pub mod control;
pub mod error;
pub mod network;
pub mod port;
pub mod worker;
