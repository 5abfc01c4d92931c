use crate::advisory::Advisory;
use crate::slider::quantize::to_decimal;
use derive_more::{AsRef, Deref, Display, From, Into};
use directories::ProjectDirs;
use rust_decimal::{Decimal, RoundingStrategy};
use rust_decimal::prelude::ToPrimitive;
use serde::{Deserialize, Serialize};
use serde_with::DeserializeFromStr;
use std::path::{Path, PathBuf};
use strum::{Display as StrumDisplay, EnumIter, EnumString};
use thiserror::Error;

/// Largest supported count of decimal places.
pub const MAX_PRECISION: u32 = 12;

pub const DEFAULT_TRACK_LENGTH: u32 = 400;
pub const DEFAULT_TRACK_WIDTH: u32 = 27;

#[derive(
    Debug,
    Clone,
    Copy,
    PartialEq,
    Eq,
    Hash,
    Default,
    Serialize,
    DeserializeFromStr,
    EnumString,
    EnumIter,
    StrumDisplay,
)]
#[strum(ascii_case_insensitive)]
#[serde(rename_all = "lowercase")]
pub enum Orientation {
    #[default]
    #[strum(to_string = "horizontal", serialize = "h", serialize = "x")]
    Horizontal,
    #[strum(to_string = "vertical", serialize = "v", serialize = "y")]
    Vertical,
}

/// Thumb shape. Only the pixel footprint matters to the engine.
#[derive(
    Debug,
    Clone,
    Copy,
    PartialEq,
    Eq,
    Hash,
    Default,
    Serialize,
    DeserializeFromStr,
    EnumString,
    EnumIter,
    StrumDisplay,
)]
#[strum(ascii_case_insensitive, serialize_all = "lowercase")]
#[serde(rename_all = "lowercase")]
pub enum ThumbStyle {
    #[default]
    Classic,
    Dot,
    Diamond,
    Triangle,
    Pointer,
    Crosshair,
    Cube,
}

/// Display-only text placed before or after a value, e.g. `$` or `%`.
#[derive(
    Debug, Clone, PartialEq, Eq, Hash, Serialize, Deserialize, Display, Deref, From, Into, AsRef,
)]
#[serde(transparent)]
pub struct Affix(String);

impl Affix {
    pub fn new(s: impl Into<String>) -> Self {
        Self(s.into())
    }
}

/// User-facing slider options, as written in a config file or built in code.
///
/// Nothing here is validated; call [`SliderOptions::resolve`] to obtain a
/// [`ResolvedConfig`].
#[derive(Debug, Clone, PartialEq, Deserialize, Serialize)]
#[serde(default)]
pub struct SliderOptions {
    pub orientation: Orientation,
    pub start_value: f64,
    pub end_value: f64,
    pub initial_value: Option<f64>,
    pub num_ticks: u32,
    /// Decimal places of the published value; 0 publishes integers.
    pub precision: u32,
    pub snap_to_ticks: bool,
    /// Requested along-axis length in pixels, thumb included.
    pub track_length: u32,
    /// Cross-axis size of the track in pixels.
    pub track_width: u32,
    pub thumb_style: ThumbStyle,
    pub prefix: Option<Affix>,
    pub suffix: Option<Affix>,
}

impl Default for SliderOptions {
    fn default() -> Self {
        Self {
            orientation: Orientation::Horizontal,
            start_value: 0.0,
            end_value: 100.0,
            initial_value: None,
            num_ticks: 10,
            precision: 0,
            snap_to_ticks: false,
            track_length: DEFAULT_TRACK_LENGTH,
            track_width: DEFAULT_TRACK_WIDTH,
            thumb_style: ThumbStyle::Classic,
            prefix: None,
            suffix: None,
        }
    }
}

#[derive(Error, Debug)]
pub enum ConfigError {
    #[error("start value and end value are both {0}, the range is empty")]
    EmptyRange(f64),
    #[error("num_ticks must be at least 1")]
    ZeroTicks,
    #[error("{field} must be a finite number")]
    NonFinite { field: &'static str },
    #[error("{field} = {value} cannot be represented as a decimal")]
    Unrepresentable { field: &'static str, value: f64 },
    #[error("precision {0} exceeds the maximum of {max}", max = MAX_PRECISION)]
    PrecisionTooLarge(u32),
    #[error("no value between {min} and {max} can be shown with {precision} decimal places")]
    RangeBelowPrecision { min: f64, max: f64, precision: u32 },
    #[error("Unknown preset '{0}'")]
    UnknownPreset(String),
    #[error("Failed to determine config directory")]
    ConfigDirNotFound,
    #[error("Config error: {0}")]
    Load(#[from] config::ConfigError),
}

/// Fully validated, immutable slider configuration.
///
/// Produced only by [`SliderOptions::resolve`]; every later stage may rely on
/// `start_value != end_value`, a positive tick count, finite values and a
/// decimal-representable range.
#[derive(Debug, Clone, PartialEq)]
pub struct ResolvedConfig {
    orientation: Orientation,
    start_value: f64,
    end_value: f64,
    start_decimal: Decimal,
    end_decimal: Decimal,
    published_min: Decimal,
    published_max: Decimal,
    initial_value: f64,
    num_ticks: u32,
    precision: u32,
    snap_to_ticks: bool,
    track_length: u32,
    track_width: u32,
    thumb_style: ThumbStyle,
    prefix: Option<Affix>,
    suffix: Option<Affix>,
    advisories: Vec<Advisory>,
}

impl SliderOptions {
    pub fn resolve(&self) -> Result<ResolvedConfig, ConfigError> {
        let start = finite("start_value", self.start_value)?;
        let end = finite("end_value", self.end_value)?;
        let initial = match self.initial_value {
            Some(v) => finite("initial_value", v)?,
            None => start,
        };

        if start == end {
            return Err(ConfigError::EmptyRange(start));
        }
        if self.num_ticks == 0 {
            return Err(ConfigError::ZeroTicks);
        }
        if self.precision > MAX_PRECISION {
            return Err(ConfigError::PrecisionTooLarge(self.precision));
        }

        let start_dec = representable("start_value", start)?;
        let end_dec = representable("end_value", end)?;
        // Ranges finer than the decimal resolution collapse to a single point.
        if start_dec == end_dec {
            return Err(ConfigError::EmptyRange(start));
        }

        let mut advisories = Vec::new();

        let (published_min, published_max) =
            published_bounds(start_dec.min(end_dec), start_dec.max(end_dec), self.precision)
                .ok_or(ConfigError::RangeBelowPrecision {
                    min: start.min(end),
                    max: start.max(end),
                    precision: self.precision,
                })?;
        if published_min != start_dec.min(end_dec) || published_max != start_dec.max(end_dec) {
            advisories.push(
                Advisory::PublishedRangeNarrowed {
                    min: published_min,
                    max: published_max,
                }
                .emit(),
            );
        }

        let range = end_dec - start_dec;
        let num_ticks = match corrected_tick_count(range, self.num_ticks, self.precision) {
            Some(adjusted) => {
                advisories.push(
                    Advisory::TickCountAdjusted {
                        requested: self.num_ticks,
                        adjusted,
                    }
                    .emit(),
                );
                adjusted
            }
            None => self.num_ticks,
        };

        let clamped = initial.clamp(start.min(end), start.max(end));
        if clamped != initial {
            advisories.push(
                Advisory::InitialValueClamped {
                    requested: initial,
                    clamped,
                }
                .emit(),
            );
        }

        log::debug!(
            "Resolved slider {}..{} with {} ticks at precision {}",
            start,
            end,
            num_ticks,
            self.precision
        );

        Ok(ResolvedConfig {
            orientation: self.orientation,
            start_value: start,
            end_value: end,
            start_decimal: start_dec,
            end_decimal: end_dec,
            published_min,
            published_max,
            initial_value: clamped,
            num_ticks,
            precision: self.precision,
            snap_to_ticks: self.snap_to_ticks,
            track_length: self.track_length,
            track_width: self.track_width,
            thumb_style: self.thumb_style,
            prefix: self.prefix.clone(),
            suffix: self.suffix.clone(),
            advisories,
        })
    }
}

fn finite(field: &'static str, value: f64) -> Result<f64, ConfigError> {
    value
        .is_finite()
        .then_some(value)
        .ok_or(ConfigError::NonFinite { field })
}

fn representable(field: &'static str, value: f64) -> Result<Decimal, ConfigError> {
    to_decimal(value).ok_or(ConfigError::Unrepresentable { field, value })
}

/// The smallest and largest values at `precision` places that lie inside
/// `min..=max`, or `None` when the range holds no such value.
fn published_bounds(min: Decimal, max: Decimal, precision: u32) -> Option<(Decimal, Decimal)> {
    let mut low = min.round_dp_with_strategy(precision, RoundingStrategy::ToPositiveInfinity);
    let mut high = max.round_dp_with_strategy(precision, RoundingStrategy::ToNegativeInfinity);
    low.rescale(precision);
    high.rescale(precision);
    (low <= high).then_some((low, high))
}

/// Returns a replacement tick count when `num_ticks` would make one tick
/// narrower than `10^-precision`.
fn corrected_tick_count(range: Decimal, num_ticks: u32, precision: u32) -> Option<u32> {
    let range = range.abs();
    let unit = Decimal::new(1, precision);
    if range / Decimal::from(num_ticks) >= unit {
        return None;
    }
    let adjusted = (range / unit).floor().to_u32().unwrap_or(u32::MAX).max(1);
    (adjusted != num_ticks).then_some(adjusted)
}

impl ResolvedConfig {
    pub fn orientation(&self) -> Orientation {
        self.orientation
    }

    pub fn start_value(&self) -> f64 {
        self.start_value
    }

    pub fn end_value(&self) -> f64 {
        self.end_value
    }

    pub(crate) fn start_decimal(&self) -> Decimal {
        self.start_decimal
    }

    pub(crate) fn end_decimal(&self) -> Decimal {
        self.end_decimal
    }

    pub fn min_value(&self) -> f64 {
        self.start_value.min(self.end_value)
    }

    pub fn max_value(&self) -> f64 {
        self.start_value.max(self.end_value)
    }

    /// Bounds of the published value: `min_value..=max_value` shrunk inward
    /// to the nearest values with `precision` decimal places.
    pub fn published_bounds(&self) -> (Decimal, Decimal) {
        (self.published_min, self.published_max)
    }

    /// Initial value, already clamped into the range.
    pub fn initial_value(&self) -> f64 {
        self.initial_value
    }

    pub fn num_ticks(&self) -> u32 {
        self.num_ticks
    }

    pub fn precision(&self) -> u32 {
        self.precision
    }

    pub fn snap_to_ticks(&self) -> bool {
        self.snap_to_ticks
    }

    pub fn track_length(&self) -> u32 {
        self.track_length
    }

    pub fn track_width(&self) -> u32 {
        self.track_width
    }

    pub fn thumb_style(&self) -> ThumbStyle {
        self.thumb_style
    }

    pub fn prefix(&self) -> Option<&Affix> {
        self.prefix.as_ref()
    }

    pub fn suffix(&self) -> Option<&Affix> {
        self.suffix.as_ref()
    }

    pub fn advisories(&self) -> &[Advisory] {
        &self.advisories
    }
}

/// Ready-made option sets, mirroring the sliders shown in the demo.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, EnumString, EnumIter, StrumDisplay)]
#[strum(ascii_case_insensitive, serialize_all = "lowercase")]
pub enum Preset {
    Default,
    Precise,
    Balance,
    Gradient,
    Switch,
}

impl Preset {
    pub fn options(self) -> SliderOptions {
        let base = SliderOptions::default();
        match self {
            Preset::Default => base,
            Preset::Precise => SliderOptions {
                track_width: 15,
                start_value: 0.0,
                end_value: 1.0,
                num_ticks: 5,
                precision: 2,
                ..base
            },
            Preset::Balance => SliderOptions {
                orientation: Orientation::Vertical,
                snap_to_ticks: true,
                track_length: 300,
                thumb_style: ThumbStyle::Dot,
                start_value: -5.0,
                end_value: 5.0,
                initial_value: Some(0.0),
                ..base
            },
            Preset::Gradient => SliderOptions {
                track_length: 250,
                end_value: 100.0,
                initial_value: Some(87.0),
                num_ticks: 4,
                suffix: Some(Affix::new("%")),
                ..base
            },
            Preset::Switch => SliderOptions {
                snap_to_ticks: true,
                track_length: 75,
                track_width: 30,
                end_value: 1.0,
                initial_value: Some(1.0),
                num_ticks: 1,
                ..base
            },
        }
    }
}

impl std::str::FromStr for SliderOptions {
    type Err = ConfigError;

    /// Looks up a preset by name.
    fn from_str(s: &str) -> Result<Self, Self::Err> {
        s.parse::<Preset>()
            .map(Preset::options)
            .map_err(|_| ConfigError::UnknownPreset(s.to_string()))
    }
}

pub fn default_config_path() -> Result<PathBuf, ConfigError> {
    let proj_dirs = ProjectDirs::from("org", "tickslide", "tickslide")
        .ok_or(ConfigError::ConfigDirNotFound)?;
    Ok(proj_dirs.config_dir().join("slider.toml"))
}

/// Loads options from a TOML file (missing file means defaults), then applies
/// `TICKSLIDE_*` environment overrides.
pub fn load_options(path: &Path) -> Result<SliderOptions, ConfigError> {
    let s = config::Config::builder()
        .add_source(config::File::from(path.to_path_buf()).required(false))
        .add_source(config::Environment::with_prefix("TICKSLIDE"))
        .build()?;

    Ok(s.try_deserialize()?)
}

pub fn write_default_config(path: &Path) -> std::io::Result<()> {
    if let Some(parent) = path.parent() {
        fs_err::create_dir_all(parent)?;
    }
    if !path.exists() {
        fs_err::write(path, DEFAULT_CONFIG)?;
    }
    Ok(())
}

const DEFAULT_CONFIG: &str = include_str!("default_config.toml");
