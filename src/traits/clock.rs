use std::time::Duration;

/// Monotonic time source with sub-millisecond resolution.
///
/// Implementations report time elapsed since an arbitrary fixed origin;
/// only differences between samples are meaningful.
pub trait ClockSource {
    /// Current time since the clock's origin.
    fn now(&self) -> Duration;
}
