/// Progress sink for install operations.
///
/// Implementations forward updates to the UI/notification layer.
/// Percent values are advisory; the extractor does not compute exact
/// totals itself.
pub trait InstallReporter: Send + Sync {
    /// Overall percentage (0-100, or -1 for indeterminate).
    fn set_percent(&self, percent: i32);

    /// Called once per archive entry as it is processed.
    fn entry(&self, name: &str);

    /// Polled between archive entries and between unpack helper runs.
    fn is_cancelled(&self) -> bool {
        false
    }
}

/// A reporter that swallows all updates. Useful for background work and
/// tests.
pub struct SilentReporter;

impl InstallReporter for SilentReporter {
    fn set_percent(&self, _percent: i32) {}
    fn entry(&self, _name: &str) {}
}
