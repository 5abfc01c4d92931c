use super::labels::LabelFormat;
use super::layout::Layout;
use super::quantize::{TickQuantizer, round_half_up, to_decimal};
use crate::advisory::Advisory;
use crate::config::{ConfigError, ResolvedConfig, SliderOptions};
use crate::events::InputEvent;
use derive_more::Display;
use rust_decimal::Decimal;
use rust_decimal::prelude::ToPrimitive;
use std::fmt;
use thiserror::Error;

/// The externally visible value: the live value rounded to the configured
/// precision, an integer when the precision is 0.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Display)]
pub enum Reading {
    Integer(i64),
    Decimal(Decimal),
}

impl Reading {
    /// Rounds `value` to the configured precision, keeping the result inside
    /// the published bounds when an endpoint falls between representable values.
    fn publish(value: f64, config: &ResolvedConfig) -> Self {
        let precision = config.precision();
        let (low, high) = config.published_bounds();
        // In-range values always convert; the bounds were checked at resolve time.
        let rounded = round_half_up(to_decimal(value).unwrap_or_default(), precision).clamp(low, high);
        match rounded.to_i64() {
            Some(i) if precision == 0 => Reading::Integer(i),
            _ => Reading::Decimal(rounded),
        }
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Display)]
pub enum InteractionState {
    #[default]
    Enabled,
    Disabled,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Display)]
pub struct SubscriberId(u64);

#[derive(Error, Debug, PartialEq)]
pub enum ValueError {
    #[error("'{raw}' is not a valid value to set the slider")]
    Unparseable { raw: String },
    #[error("{0} is not a finite number")]
    NotFinite(f64),
    #[error("{value} is not in range ({min}, {max})")]
    OutOfRange { value: f64, min: f64, max: f64 },
}

/// What an input event did, so the host knows whether to repaint.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct InputAction {
    pub consumed: bool,
    pub value_changed: bool,
}

impl InputAction {
    pub fn new(consumed: bool, value_changed: bool) -> Self {
        Self {
            consumed,
            value_changed,
        }
    }

    fn ignored() -> Self {
        Self::new(false, false)
    }
}

type Subscriber = Box<dyn FnMut(Reading)>;

/// Owns the live value of one slider and turns pointer displacements into
/// clamped, optionally tick-aligned values.
///
/// All work happens synchronously on the caller's thread. Each committed
/// change notifies every subscriber before the call returns, so subscribers
/// see exactly one update per applied event, in order.
pub struct ValueEngine {
    config: ResolvedConfig,
    layout: Layout,
    quantizer: TickQuantizer,
    labels: LabelFormat,
    current: f64,
    state: InteractionState,
    subscribers: Vec<(SubscriberId, Subscriber)>,
    next_subscriber: u64,
}

impl fmt::Debug for ValueEngine {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("ValueEngine")
            .field("current", &self.current)
            .field("state", &self.state)
            .field("layout", &self.layout)
            .field("subscribers", &self.subscribers.len())
            .finish_non_exhaustive()
    }
}

impl ValueEngine {
    pub fn new(config: ResolvedConfig) -> Self {
        let layout = Layout::derive(&config);
        let quantizer = TickQuantizer::new(&config);
        let labels = LabelFormat::new(&config);

        let mut current = config.initial_value();
        if config.snap_to_ticks() {
            current = layout.clamp(quantizer.quantize(current));
        }

        log::debug!(
            "Created slider engine at {} (track {} px, {} px per tick)",
            current,
            layout.track_length(),
            layout.tick_spacing()
        );

        Self {
            config,
            layout,
            quantizer,
            labels,
            current,
            state: InteractionState::Enabled,
            subscribers: Vec::new(),
            next_subscriber: 0,
        }
    }

    pub fn from_options(options: &SliderOptions) -> Result<Self, ConfigError> {
        Ok(Self::new(options.resolve()?))
    }

    pub fn config(&self) -> &ResolvedConfig {
        &self.config
    }

    pub fn layout(&self) -> &Layout {
        &self.layout
    }

    pub fn quantizer(&self) -> &TickQuantizer {
        &self.quantizer
    }

    pub fn labels(&self) -> &LabelFormat {
        &self.labels
    }

    pub fn state(&self) -> InteractionState {
        self.state
    }

    pub fn is_enabled(&self) -> bool {
        self.state == InteractionState::Enabled
    }

    /// The unrounded live value.
    pub fn current_value(&self) -> f64 {
        self.current
    }

    pub fn get(&self) -> Reading {
        Reading::publish(self.current, &self.config)
    }

    /// Leading-edge thumb offset for the current value.
    pub fn thumb_offset(&self) -> f64 {
        self.layout.pixel_for_value(self.current)
    }

    /// Text for the label that travels with the thumb.
    pub fn top_label(&self) -> String {
        self.labels.truncated(self.current)
    }

    pub fn enable(&mut self) -> Option<Advisory> {
        match self.state {
            InteractionState::Enabled => Some(Advisory::AlreadyEnabled.emit()),
            InteractionState::Disabled => {
                self.state = InteractionState::Enabled;
                log::debug!("Slider enabled at {}", self.current);
                None
            }
        }
    }

    /// Stops input events from changing the value. `set` keeps working.
    pub fn disable(&mut self) -> Option<Advisory> {
        match self.state {
            InteractionState::Disabled => Some(Advisory::AlreadyDisabled.emit()),
            InteractionState::Enabled => {
                self.state = InteractionState::Disabled;
                log::debug!("Slider disabled at {}", self.current);
                None
            }
        }
    }

    /// Sets the value programmatically. Out-of-range values are rejected,
    /// not clamped.
    pub fn set(&mut self, value: f64) -> Result<Reading, ValueError> {
        if !value.is_finite() {
            return Err(ValueError::NotFinite(value));
        }
        if self.layout.clamp(value) != value {
            return Err(ValueError::OutOfRange {
                value,
                min: self.layout.min_value(),
                max: self.layout.max_value(),
            });
        }

        let accepted = if self.config.snap_to_ticks() {
            self.layout.clamp(self.quantizer.quantize(value))
        } else {
            value
        };
        self.commit(accepted);
        Ok(self.get())
    }

    /// Parses `raw` as the configured numeric type (an integer at precision 0)
    /// and sets it.
    pub fn set_str(&mut self, raw: &str) -> Result<Reading, ValueError> {
        let trimmed = raw.trim();
        let parsed = if self.config.precision() == 0 {
            trimmed.parse::<i64>().map(|i| i as f64).ok()
        } else {
            trimmed.parse::<f64>().ok()
        };
        let value = parsed.ok_or_else(|| ValueError::Unparseable {
            raw: raw.to_string(),
        })?;
        self.set(value)
    }

    /// Registers `sink` and calls it once right away with the current reading.
    pub fn add_subscriber<F>(&mut self, mut sink: F) -> SubscriberId
    where
        F: FnMut(Reading) + 'static,
    {
        let id = SubscriberId(self.next_subscriber);
        self.next_subscriber += 1;
        sink(self.get());
        self.subscribers.push((id, Box::new(sink)));
        id
    }

    pub fn remove_subscriber(&mut self, id: SubscriberId) -> bool {
        let before = self.subscribers.len();
        self.subscribers.retain(|(sid, _)| *sid != id);
        self.subscribers.len() != before
    }

    /// Free drag: moves proportionally to the displacement without snapping.
    pub fn apply_continuous_delta(&mut self, pixels: i32) -> InputAction {
        if !self.is_enabled() {
            return InputAction::ignored();
        }
        let moved = self.current + f64::from(pixels) * self.layout.displacement_to_value();
        self.commit(self.layout.clamp(moved))
    }

    /// Wheel step: one tick in the direction of `direction`'s sign. An off-tick
    /// value first moves to the next tick ahead rather than the nearest one.
    pub fn apply_step_delta(&mut self, direction: i32) -> InputAction {
        if !self.is_enabled() {
            return InputAction::ignored();
        }
        if direction == 0 {
            return InputAction::new(true, false);
        }
        let sign = f64::from(direction.signum());
        let tick = self.layout.tick_width_value();
        let target = if self.quantizer.is_on_tick(self.current) {
            self.current + sign * tick
        } else {
            self.current + sign * 0.5 * tick
        };
        let snapped = self.quantizer.quantize(target);
        self.commit(self.layout.clamp(snapped))
    }

    /// Track click: moves by the displacement, then snaps to the tick nearest
    /// the click point.
    pub fn apply_snapped_delta(&mut self, pixels: i32) -> InputAction {
        if !self.is_enabled() {
            return InputAction::ignored();
        }
        let sign = if pixels < 0 { -1.0 } else { 1.0 };
        let moved = self.current
            + f64::from(pixels) * self.layout.displacement_to_value()
            + sign * 0.5 * self.layout.tick_width_value();
        let snapped = self.quantizer.quantize(moved);
        self.commit(self.layout.clamp(snapped))
    }

    /// Pointer release: commits the value to its nearest tick.
    pub fn snap_to_nearest_tick(&mut self) -> InputAction {
        if !self.is_enabled() {
            return InputAction::ignored();
        }
        let snapped = self.quantizer.quantize(self.current);
        self.commit(self.layout.clamp(snapped))
    }

    pub fn dispatch(&mut self, event: InputEvent) -> InputAction {
        match event {
            InputEvent::Drag(px) => self.apply_continuous_delta(px),
            InputEvent::Step(dir) => self.apply_step_delta(dir),
            InputEvent::Click(px) => self.apply_snapped_delta(px),
            InputEvent::Release if self.config.snap_to_ticks() => self.snap_to_nearest_tick(),
            InputEvent::Release => InputAction::new(self.is_enabled(), false),
        }
    }

    fn commit(&mut self, value: f64) -> InputAction {
        if value == self.current {
            return InputAction::new(true, false);
        }
        log::trace!("Slider value {} -> {}", self.current, value);
        self.current = value;
        self.publish();
        InputAction::new(true, true)
    }

    fn publish(&mut self) {
        let reading = self.get();
        for (_, sink) in &mut self.subscribers {
            sink(reading);
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::cell::RefCell;
    use std::rc::Rc;

    fn engine(opts: SliderOptions) -> ValueEngine {
        ValueEngine::from_options(&opts).unwrap()
    }

    fn unit_engine() -> ValueEngine {
        engine(SliderOptions {
            start_value: 0.0,
            end_value: 1.0,
            num_ticks: 10,
            precision: 1,
            ..Default::default()
        })
    }

    fn recorder(engine: &mut ValueEngine) -> Rc<RefCell<Vec<Reading>>> {
        let seen = Rc::new(RefCell::new(Vec::new()));
        let sink = seen.clone();
        engine.add_subscriber(move |r| sink.borrow_mut().push(r));
        seen
    }

    fn dec(s: &str) -> Reading {
        Reading::Decimal(s.parse().unwrap())
    }

    #[test]
    fn test_initial_value_defaults_to_start() {
        let e = engine(SliderOptions::default());
        assert_eq!(e.get(), Reading::Integer(0));
        assert!(e.is_enabled());
    }

    #[test]
    fn test_initial_value_snapped_when_snapping() {
        let e = engine(SliderOptions {
            initial_value: Some(33.0),
            snap_to_ticks: true,
            ..Default::default()
        });
        assert_eq!(e.current_value(), 30.0);
    }

    #[test]
    fn test_set_then_get_rounds() {
        let mut e = unit_engine();
        assert_eq!(e.set(0.26).unwrap(), dec("0.3"));
        assert_eq!(e.current_value(), 0.26);
        assert_eq!(e.get().to_string(), "0.3");
    }

    #[test]
    fn test_set_rejects_out_of_range() {
        let mut e = unit_engine();
        e.set(0.5).unwrap();
        let err = e.set(1.5).unwrap_err();
        assert_eq!(
            err,
            ValueError::OutOfRange {
                value: 1.5,
                min: 0.0,
                max: 1.0
            }
        );
        assert_eq!(e.current_value(), 0.5);
        assert!(matches!(e.set(f64::NAN), Err(ValueError::NotFinite(_))));
    }

    #[test]
    fn test_published_value_stays_inside_off_grid_range() {
        let mut e = engine(SliderOptions {
            end_value: 1.05,
            precision: 1,
            ..Default::default()
        });
        assert_eq!(e.set(1.05).unwrap(), dec("1.0"));
        assert_eq!(e.current_value(), 1.05);

        let seen = recorder(&mut e);
        e.dispatch(InputEvent::Drag(-400));
        e.dispatch(InputEvent::Drag(400));
        assert_eq!(*seen.borrow(), [dec("1.0"), dec("0.0"), dec("1.0")]);
    }

    #[test]
    fn test_dense_ticks_still_snap() {
        let mut e = engine(SliderOptions {
            end_value: 5.0,
            num_ticks: 500,
            precision: 2,
            snap_to_ticks: true,
            ..Default::default()
        });
        assert_eq!(e.layout().tick_spacing(), 0);
        assert_eq!(e.set(2.347).unwrap(), dec("2.35"));
        e.dispatch(InputEvent::Step(1));
        assert_eq!(e.get(), dec("2.36"));
        e.dispatch(InputEvent::Drag(360));
        assert_eq!(e.current_value(), 5.0);
    }

    #[test]
    fn test_set_str_respects_numeric_type() {
        let mut int_engine = engine(SliderOptions::default());
        assert_eq!(int_engine.set_str(" 42 ").unwrap(), Reading::Integer(42));
        assert!(matches!(
            int_engine.set_str("4.5"),
            Err(ValueError::Unparseable { .. })
        ));

        let mut e = unit_engine();
        assert_eq!(e.set_str("0.7").unwrap(), dec("0.7"));
        assert!(matches!(e.set_str("abc"), Err(ValueError::Unparseable { .. })));
    }

    #[test]
    fn test_set_snaps_when_configured() {
        let mut e = engine(SliderOptions {
            snap_to_ticks: true,
            ..Default::default()
        });
        assert_eq!(e.set(44.0).unwrap(), Reading::Integer(40));
        assert_eq!(e.set(45.0).unwrap(), Reading::Integer(50));
    }

    #[test]
    fn test_set_works_while_disabled() {
        let mut e = unit_engine();
        e.disable();
        assert_eq!(e.set(0.4).unwrap(), dec("0.4"));
    }

    #[test]
    fn test_subscriber_initialized_and_notified() {
        let mut e = unit_engine();
        let seen = recorder(&mut e);
        e.set(0.5).unwrap();
        e.set(0.5).unwrap();
        e.apply_continuous_delta(36);
        assert_eq!(*seen.borrow(), vec![dec("0.0"), dec("0.5"), dec("0.6")]);
    }

    #[test]
    fn test_remove_subscriber() {
        let mut e = unit_engine();
        let seen = Rc::new(RefCell::new(0));
        let counter = seen.clone();
        let id = e.add_subscriber(move |_| *counter.borrow_mut() += 1);
        assert!(e.remove_subscriber(id));
        assert!(!e.remove_subscriber(id));
        e.set(0.9).unwrap();
        assert_eq!(*seen.borrow(), 1);
    }

    #[test]
    fn test_enable_disable_are_guarded() {
        let mut e = unit_engine();
        assert_eq!(e.enable(), Some(Advisory::AlreadyEnabled));
        assert_eq!(e.state(), InteractionState::Enabled);
        assert_eq!(e.disable(), None);
        assert_eq!(e.disable(), Some(Advisory::AlreadyDisabled));
        assert_eq!(e.state(), InteractionState::Disabled);
        assert_eq!(e.enable(), None);
    }

    #[test]
    fn test_disabled_ignores_input() {
        let mut e = unit_engine();
        e.set(0.5).unwrap();
        e.disable();
        for event in [
            InputEvent::Drag(40),
            InputEvent::Step(1),
            InputEvent::Click(-100),
            InputEvent::Release,
        ] {
            assert_eq!(e.dispatch(event), InputAction::ignored());
        }
        assert_eq!(e.current_value(), 0.5);
    }

    #[test]
    fn test_continuous_delta_clamps() {
        let mut e = engine(SliderOptions::default());
        // 360 px of slide for 100 units
        e.apply_continuous_delta(90);
        assert_eq!(e.get(), Reading::Integer(25));
        e.apply_continuous_delta(10_000);
        assert_eq!(e.current_value(), 100.0);
        let action = e.apply_continuous_delta(5);
        assert_eq!(action, InputAction::new(true, false));
        e.apply_continuous_delta(-10_000);
        assert_eq!(e.current_value(), 0.0);
    }

    #[test]
    fn test_continuous_delta_descending() {
        let mut e = engine(SliderOptions {
            start_value: 100.0,
            end_value: 0.0,
            ..Default::default()
        });
        assert_eq!(e.current_value(), 100.0);
        e.apply_continuous_delta(90);
        assert_eq!(e.get(), Reading::Integer(75));
    }

    #[test]
    fn test_step_from_tick_moves_full_tick() {
        let mut e = unit_engine();
        e.set(0.3).unwrap();
        e.apply_step_delta(120);
        assert_eq!(e.current_value(), 0.4);
        e.apply_step_delta(-1);
        e.apply_step_delta(-1);
        assert_eq!(e.current_value(), 0.2);
    }

    #[test]
    fn test_step_off_tick_snaps_ahead() {
        let mut e = unit_engine();
        e.set(0.34).unwrap();
        e.apply_step_delta(1);
        assert_eq!(e.current_value(), 0.4);

        e.set(0.34).unwrap();
        e.apply_step_delta(-1);
        assert_eq!(e.current_value(), 0.3);
    }

    #[test]
    fn test_step_repeated_does_not_drift() {
        let mut e = unit_engine();
        for _ in 0..10 {
            e.apply_step_delta(1);
        }
        assert_eq!(e.current_value(), 1.0);
        assert_eq!(e.apply_step_delta(1), InputAction::new(true, false));
        assert_eq!(e.apply_step_delta(0), InputAction::new(true, false));
    }

    #[test]
    fn test_snapped_delta_biases_toward_click() {
        let mut e = engine(SliderOptions {
            snap_to_ticks: true,
            ..Default::default()
        });
        // 18 px is half a tick; 18 * 100/360 = 5, plus the 5 bias -> 10.
        e.apply_snapped_delta(18);
        assert_eq!(e.get(), Reading::Integer(10));
        // 20 px back lands at 4.4 before the bias, so the lower tick wins.
        e.apply_snapped_delta(-20);
        assert_eq!(e.get(), Reading::Integer(0));
    }

    #[test]
    fn test_release_snaps_only_when_configured() {
        let mut free = unit_engine();
        free.set(0.34).unwrap();
        free.dispatch(InputEvent::Release);
        assert_eq!(free.current_value(), 0.34);

        let mut snapping = engine(SliderOptions {
            end_value: 1.0,
            precision: 1,
            snap_to_ticks: true,
            ..Default::default()
        });
        snapping.apply_continuous_delta(20);
        assert!(!snapping.quantizer().is_on_tick(snapping.current_value()));
        snapping.dispatch(InputEvent::Release);
        assert_eq!(snapping.current_value(), 0.1);
    }

    #[test]
    fn test_float_artifact_snaps_to_lower_tick() {
        let mut e = unit_engine();
        e.set(0.349999999999999).unwrap();
        e.snap_to_nearest_tick();
        assert_eq!(e.current_value(), 0.3);
        assert_eq!(e.get(), dec("0.3"));
    }

    #[test]
    fn test_thumb_offset_and_label() {
        let mut e = engine(SliderOptions {
            suffix: Some(crate::config::Affix::new("%")),
            precision: 1,
            ..Default::default()
        });
        e.set(50.0).unwrap();
        assert!((e.thumb_offset() - 180.0).abs() < 1e-9);
        e.set(34.99).unwrap();
        assert_eq!(e.top_label(), "34.9%");
    }
}
