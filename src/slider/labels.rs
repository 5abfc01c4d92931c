use super::engine::Reading;
use super::quantize::{TickQuantizer, round_half_up, to_decimal};
use crate::config::ResolvedConfig;
use rust_decimal::RoundingStrategy;

/// Formats values for display with the configured precision and affixes.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct LabelFormat {
    precision: u32,
    prefix: String,
    suffix: String,
}

impl LabelFormat {
    pub fn new(config: &ResolvedConfig) -> Self {
        Self {
            precision: config.precision(),
            prefix: config.prefix().map(ToString::to_string).unwrap_or_default(),
            suffix: config.suffix().map(ToString::to_string).unwrap_or_default(),
        }
    }

    fn wrap(&self, body: impl std::fmt::Display) -> String {
        format!("{}{}{}", self.prefix, body, self.suffix)
    }

    pub fn reading(&self, reading: Reading) -> String {
        self.wrap(reading)
    }

    /// Cuts `value` to the configured precision instead of rounding it, so a
    /// value about to snap down never reads as the tick above.
    pub fn truncated(&self, value: f64) -> String {
        match to_decimal(value) {
            Some(d) => {
                let mut cut = d.round_dp_with_strategy(self.precision, RoundingStrategy::ToZero);
                cut.rescale(self.precision);
                self.wrap(cut)
            }
            None => self.wrap(value),
        }
    }

    /// One label per major tick, start to end.
    pub fn tick_labels(&self, quantizer: &TickQuantizer) -> Vec<String> {
        quantizer
            .tick_values()
            .map(|v| self.wrap(round_half_up(v, self.precision)))
            .collect()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::config::{Affix, SliderOptions};

    fn format(opts: SliderOptions) -> (LabelFormat, TickQuantizer) {
        let cfg = opts.resolve().unwrap();
        (LabelFormat::new(&cfg), TickQuantizer::new(&cfg))
    }

    #[test]
    fn test_truncation_does_not_round_up() {
        let (f, _) = format(SliderOptions {
            precision: 1,
            ..Default::default()
        });
        assert_eq!(f.truncated(34.99), "34.9");
        assert_eq!(f.truncated(35.0), "35.0");
    }

    #[test]
    fn test_affixes() {
        let (f, _) = format(SliderOptions {
            prefix: Some(Affix::new("$")),
            suffix: Some(Affix::new(" USD")),
            ..Default::default()
        });
        assert_eq!(f.reading(Reading::Integer(12)), "$12 USD");
        assert_eq!(f.truncated(12.9), "$12 USD");
    }

    #[test]
    fn test_tick_labels() {
        let (f, q) = format(SliderOptions {
            end_value: 1.0,
            num_ticks: 4,
            precision: 2,
            ..Default::default()
        });
        assert_eq!(
            f.tick_labels(&q),
            ["0.00", "0.25", "0.50", "0.75", "1.00"]
        );

        let (f, q) = format(SliderOptions {
            end_value: 100.0,
            num_ticks: 3,
            suffix: Some(Affix::new("%")),
            ..Default::default()
        });
        assert_eq!(f.tick_labels(&q), ["0%", "33%", "67%", "100%"]);
    }
}
