//! @ai:module:intent Destinations for live command output
//! @ai:module:layer infrastructure
//! @ai:module:public_api LogSink, TracingSink

/// @ai:intent Receives each output line of a running command, tagged with its source
pub trait LogSink: Send + Sync {
    /// @ai:intent Forward one line; best effort, never fails
    fn line(&self, source: &str, line: &str);
}

/// @ai:intent Forwards command output to the tracing subscriber
#[derive(Debug, Clone, Copy, Default)]
pub struct TracingSink;

impl LogSink for TracingSink {
    /// @ai:effects io
    fn line(&self, source: &str, line: &str) {
        tracing::info!(command = source, "{}", line);
    }
}
