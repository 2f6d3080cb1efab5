/// Cooperative stop request shared between the host and the loop.
///
/// Stop is requested, not confirmed: the loop observes the flag once per
/// iteration, so the iteration in progress when the request lands still
/// completes.
pub trait LifecycleSignal {
    /// Ask the loop to stop after its current iteration.
    fn request_stop(&self);

    /// Check whether a stop has been requested.
    fn stop_requested(&self) -> bool;
}
