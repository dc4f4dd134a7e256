//! Market structure signal computation

mod series;
mod spectral;
mod store;
mod window;

pub use series::{SignalRow, SignalSeries, Signals};
pub use spectral::*;
pub use store::SignalStore;
pub use window::WindowSample;
