use super::{
    CLASSIC_THUMB_DIVISOR, CLASSIC_THUMB_MIN_LENGTH, CLASSIC_TRACK_PADDING, GRAPHIC_THUMB_LENGTH,
    TICK_BAR_DEPTH,
};
use crate::config::{Orientation, ResolvedConfig, ThumbStyle};

#[derive(Debug, Clone, Copy, PartialEq, Default)]
pub struct Point {
    pub x: f64,
    pub y: f64,
}

impl Point {
    pub fn new(x: f64, y: f64) -> Self {
        Self { x, y }
    }
}

/// Screen-space size in pixels.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub struct Extent {
    pub width: u32,
    pub height: u32,
}

/// Folds orientation into an along-axis/cross-axis pair, so geometry and
/// event handling are written once for both orientations.
///
/// Along-axis pixels grow rightwards for horizontal sliders and downwards for
/// vertical ones; offset 0 corresponds to the start value.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct Axis(Orientation);

impl Axis {
    pub fn new(orientation: Orientation) -> Self {
        Self(orientation)
    }

    pub fn orientation(self) -> Orientation {
        self.0
    }

    pub fn along(self, p: Point) -> f64 {
        match self.0 {
            Orientation::Horizontal => p.x,
            Orientation::Vertical => p.y,
        }
    }

    pub fn cross(self, p: Point) -> f64 {
        match self.0 {
            Orientation::Horizontal => p.y,
            Orientation::Vertical => p.x,
        }
    }

    pub fn point(self, along: f64, cross: f64) -> Point {
        match self.0 {
            Orientation::Horizontal => Point::new(along, cross),
            Orientation::Vertical => Point::new(cross, along),
        }
    }

    pub fn extent(self, along: u32, cross: u32) -> Extent {
        match self.0 {
            Orientation::Horizontal => Extent {
                width: along,
                height: cross,
            },
            Orientation::Vertical => Extent {
                width: cross,
                height: along,
            },
        }
    }

    /// Along-axis pixels travelled from `from` to `to`, rounded to whole pixels.
    pub fn displacement(self, from: Point, to: Point) -> i32 {
        (self.along(to) - self.along(from)).round() as i32
    }
}

/// Pixel geometry and value conversion derived from a [`ResolvedConfig`].
///
/// Tick spacing is floored to whole pixels and the track is shrunk to
/// `thumb_length + num_ticks * tick_spacing`, so every tick lands on a pixel
/// boundary. The final track length can therefore be a little shorter than
/// requested.
///
/// Ticks packed tighter than one per pixel get a spacing of 0. The track then
/// keeps its requested length, values map across the whole slide and no tick
/// marks are laid out.
#[derive(Debug, Clone, PartialEq)]
pub struct Layout {
    axis: Axis,
    start_value: f64,
    min_value: f64,
    max_value: f64,
    value_range: f64,
    tick_width_value: f64,
    num_ticks: u32,
    thumb_length: u32,
    track_cross: u32,
    track_padding: u32,
    tick_spacing: u32,
    track_length: u32,
    slide_length: u32,
    displacement_to_value: f64,
}

impl Layout {
    pub fn derive(config: &ResolvedConfig) -> Self {
        let requested = config.track_length();
        let num_ticks = config.num_ticks();

        let (thumb_length, track_padding) = match config.thumb_style() {
            ThumbStyle::Classic => (
                (requested / CLASSIC_THUMB_DIVISOR).max(CLASSIC_THUMB_MIN_LENGTH),
                CLASSIC_TRACK_PADDING,
            ),
            _ => (GRAPHIC_THUMB_LENGTH, 0),
        };

        let available = requested.saturating_sub(thumb_length);
        let tick_spacing = available / num_ticks;
        let slide_length = match tick_spacing {
            0 => available.max(1),
            spacing => spacing * num_ticks,
        };
        if tick_spacing == 0 {
            log::debug!(
                "{} ticks do not fit in {} px, laying out an unmarked {} px slide",
                num_ticks,
                available,
                slide_length
            );
        }

        let value_range = config.end_value() - config.start_value();

        Self {
            axis: Axis::new(config.orientation()),
            start_value: config.start_value(),
            min_value: config.min_value(),
            max_value: config.max_value(),
            value_range,
            tick_width_value: value_range / f64::from(num_ticks),
            num_ticks,
            thumb_length,
            track_cross: config.track_width(),
            track_padding,
            tick_spacing,
            track_length: thumb_length + slide_length,
            slide_length,
            displacement_to_value: value_range / f64::from(slide_length),
        }
    }

    pub fn axis(&self) -> Axis {
        self.axis
    }

    pub fn min_value(&self) -> f64 {
        self.min_value
    }

    pub fn max_value(&self) -> f64 {
        self.max_value
    }

    /// `end - start`; negative for descending ranges.
    pub fn value_range(&self) -> f64 {
        self.value_range
    }

    /// Value distance between neighbouring ticks, signed like the range.
    pub fn tick_width_value(&self) -> f64 {
        self.tick_width_value
    }

    pub fn displacement_to_value(&self) -> f64 {
        self.displacement_to_value
    }

    pub fn num_ticks(&self) -> u32 {
        self.num_ticks
    }

    pub fn thumb_length(&self) -> u32 {
        self.thumb_length
    }

    /// Final along-axis track length, thumb included.
    pub fn track_length(&self) -> u32 {
        self.track_length
    }

    /// Distance the thumb's leading edge can travel.
    pub fn slide_length(&self) -> u32 {
        self.slide_length
    }

    pub fn tick_spacing(&self) -> u32 {
        self.tick_spacing
    }

    /// Cross-axis padding around the track, in pixels.
    pub fn track_padding(&self) -> u32 {
        self.track_padding
    }

    pub fn track_extent(&self) -> Extent {
        self.axis.extent(self.track_length, self.track_cross)
    }

    pub fn thumb_extent(&self) -> Extent {
        self.axis.extent(self.thumb_length, self.track_cross)
    }

    pub fn tick_bar_extent(&self) -> Extent {
        self.axis.extent(self.track_length, TICK_BAR_DEPTH)
    }

    pub fn clamp(&self, value: f64) -> f64 {
        value.max(self.min_value).min(self.max_value)
    }

    /// Offset of the thumb's leading edge for `value`.
    pub fn pixel_for_value(&self, value: f64) -> f64 {
        (value - self.start_value) / self.displacement_to_value
    }

    pub fn value_for_pixel(&self, pixel: f64) -> f64 {
        self.start_value + pixel * self.displacement_to_value
    }

    /// Converts a click at along-axis offset `click` into the displacement for
    /// a snapped move. Clicks up to the thumb's leading edge measure from that
    /// edge, clicks past it measure from the trailing edge.
    pub fn click_displacement(&self, click: f64, thumb_offset: f64) -> i32 {
        let delta = if click <= thumb_offset {
            click - thumb_offset
        } else {
            click - f64::from(self.thumb_length) - thumb_offset
        };
        delta.round() as i32
    }

    fn drawn_ticks(&self) -> u32 {
        if self.tick_spacing == 0 { 0 } else { self.num_ticks }
    }

    /// Along-axis offsets of the major tick marks, centred under the thumb.
    /// Empty when ticks are too dense to draw.
    pub fn tick_offsets(&self) -> impl Iterator<Item = u32> + '_ {
        let first = self.thumb_length / 2;
        let count = match self.drawn_ticks() {
            0 => 0,
            n => n + 1,
        };
        (0..count).map(move |k| first + k * self.tick_spacing)
    }

    /// Offsets of the minor tick marks halfway between major ticks.
    pub fn minor_tick_offsets(&self) -> impl Iterator<Item = u32> + '_ {
        let first = self.thumb_length / 2 + self.tick_spacing / 2;
        (0..self.drawn_ticks()).map(move |k| first + k * self.tick_spacing)
    }
}
