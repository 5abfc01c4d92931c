use derive_more::Display;
use rust_decimal::Decimal;

/// Non-fatal notices raised while resolving options or driving an engine.
///
/// Each one is logged with `log::warn!` where it arises and handed back to the
/// caller, so hosts without a logger can still show it.
#[derive(Debug, Clone, PartialEq, Display)]
pub enum Advisory {
    #[display(
        "num_ticks {requested} gives a tick narrower than the configured precision, using {adjusted}"
    )]
    TickCountAdjusted { requested: u32, adjusted: u32 },
    #[display("initial value {requested} lies outside the range, using {clamped}")]
    InitialValueClamped { requested: f64, clamped: f64 },
    #[display(
        "range endpoints fall between values of the configured precision, publishing within {min}..={max}"
    )]
    PublishedRangeNarrowed { min: Decimal, max: Decimal },
    #[display("attempt to enable an already enabled slider")]
    AlreadyEnabled,
    #[display("attempt to disable an already disabled slider")]
    AlreadyDisabled,
}

impl Advisory {
    pub(crate) fn emit(self) -> Self {
        log::warn!("{}", self);
        self
    }
}
