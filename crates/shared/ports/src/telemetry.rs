use log::Level;

/// Port for operational events (connection drops, slow ticks, errors)
///
/// Components receive a telemetry handle instead of logging directly, so tests
/// can observe what was reported and libraries never install a logger.
pub trait Telemetry: Send + Sync {
    /// Report one event raised by `component`
    fn record(&self, level: Level, component: &str, message: &str);

    fn info(&self, component: &str, message: &str) {
        self.record(Level::Info, component, message);
    }

    fn warn(&self, component: &str, message: &str) {
        self.record(Level::Warn, component, message);
    }

    fn error(&self, component: &str, message: &str) {
        self.record(Level::Error, component, message);
    }
}

/// Forwards events to the `log` facade, using the component as target
#[derive(Debug, Clone, Copy, Default)]
pub struct LogTelemetry;

impl Telemetry for LogTelemetry {
    fn record(&self, level: Level, component: &str, message: &str) {
        log::log!(target: component, level, "{message}");
    }
}

/// Discards every event
#[derive(Debug, Clone, Copy, Default)]
pub struct NoopTelemetry;

impl Telemetry for NoopTelemetry {
    fn record(&self, _level: Level, _component: &str, _message: &str) {}
}
