mod media;
mod view;

pub use media::*;
pub use view::*;
