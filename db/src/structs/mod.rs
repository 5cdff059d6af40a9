mod stream_link;

pub use stream_link::{NewStreamLink, StreamLink};
