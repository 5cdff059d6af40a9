pub mod cooldown;
pub mod reply;

pub use cooldown::Cooldown;
