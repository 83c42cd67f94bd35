pub mod test_protocol;

pub use helpers::*;
pub use test_protocol::{LightAnnotation, TestContainer, TestLight};
pub use test_world::TestWorld;
