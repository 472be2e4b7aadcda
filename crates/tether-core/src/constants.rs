/// Version of a resource the authority has never accepted. A push replaces
/// it with a real server version.
pub const NO_VERSION: &str = "__NO_VERSION__";

pub mod timing {
    use std::time::Duration;

    /// Grace period before the scheduler considers its first pass.
    pub const START_DELAY: Duration = Duration::from_secs(1);

    /// Steady-state delay between reconciliation passes.
    pub const PULL_PERIOD: Duration = Duration::from_secs(15);

    /// Debounce window between a document change and the resource write.
    pub const WRITE_PERIOD: Duration = Duration::from_secs(1);

    /// Window over which store mutations collapse into one notification.
    pub const NOTIFY_WINDOW: Duration = Duration::from_millis(200);
}
