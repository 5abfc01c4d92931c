pub mod engine;
pub mod labels;
pub mod layout;
pub mod quantize;

pub use engine::{InputAction, InteractionState, Reading, SubscriberId, ValueEngine, ValueError};
pub use labels::LabelFormat;
pub use layout::{Axis, Extent, Layout, Point};
pub use quantize::TickQuantizer;

pub const CLASSIC_THUMB_MIN_LENGTH: u32 = 40;
pub const CLASSIC_THUMB_DIVISOR: u32 = 10; // thumb takes a tenth of the track
pub const CLASSIC_TRACK_PADDING: u32 = 4;
pub const GRAPHIC_THUMB_LENGTH: u32 = 30;
pub const TICK_BAR_DEPTH: u32 = 10;
