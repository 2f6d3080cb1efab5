pub mod clock;
pub mod lifecycle;
pub mod surface;

pub use clock::*;
pub use lifecycle::*;
pub use surface::*;
