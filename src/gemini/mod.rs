pub mod check;
pub mod response;
pub mod stream;
pub mod types;
pub mod views;

pub use response::*;
pub use stream::{decode_stream, merge_chunks};
pub use types::*;
