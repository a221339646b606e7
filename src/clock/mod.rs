pub mod controller;

pub use controller::SessionClock;
