pub mod controller;

pub use controller::SessionEngine;
