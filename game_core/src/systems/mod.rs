pub mod contact;
pub mod input;
pub mod movement;
pub mod recycle;

pub use contact::*;
pub use input::*;
pub use movement::*;
pub use recycle::*;
