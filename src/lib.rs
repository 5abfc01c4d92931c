pub mod advisory;
pub mod config;
pub mod events;
pub mod slider;

pub use advisory::Advisory;
pub use config::{ConfigError, ResolvedConfig, SliderOptions};
pub use events::InputEvent;
pub use slider::{Layout, Reading, TickQuantizer, ValueEngine, ValueError};
