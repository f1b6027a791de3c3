pub mod buffer;

pub use buffer::InputBuffer;
