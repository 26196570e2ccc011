pub mod atomic;

pub use atomic::{write_bytes_atomic, write_json_atomic};
