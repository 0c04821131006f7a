mod dashboard;
mod health;
mod stack;

pub use dashboard::*;
pub use health::*;
pub use stack::*;
