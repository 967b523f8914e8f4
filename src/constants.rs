// src/constants.rs

pub const DEFAULT_HOST: &str = "localhost";
pub const BACKLOG: u32 = 5;

pub const MAX_CONTROL_MSG: usize = 512;
pub const MAX_FILE_CHUNK: usize = 4092;
pub const MAX_PACKET_SIZE: usize = 4096;
pub const LENGTH_FIELD_WIDTH: usize = MAX_PACKET_SIZE - MAX_FILE_CHUNK;

// Both replies carry their C-string terminator on the wire.
pub const READY_MSG: &[u8] = b"ready\0";
pub const FILE_NOT_FOUND_MSG: &[u8] = b"FILE NOT FOUND\0";
pub const READY_TOKEN: &[u8] = b"ready";

pub const SIGINT: i32 = 2;
