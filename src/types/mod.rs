mod block;
mod request;

pub use block::*;
pub use request::*;
