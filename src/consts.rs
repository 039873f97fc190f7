pub mod cli_consts {
    //! Console Configuration Constants
    //!
    //! Constants for the polling controller, the event channel and the
    //! dashboard, grouped by functional area.

    // =============================================================================
    // QUEUE CONFIGURATION
    // =============================================================================

    /// The maximum number of events to keep in the activity logs.
    pub const MAX_ACTIVITY_LOGS: usize = 100;

    /// Maximum number of buffered activity events.
    pub const EVENT_QUEUE_SIZE: usize = 100;

    /// Maximum number of poll outcomes waiting to be applied by the controller.
    pub const OUTCOME_QUEUE_SIZE: usize = 16;

    // =============================================================================
    // POLLING CONFIGURATION
    // =============================================================================

    /// Device status polling
    pub mod polling {
        use std::time::Duration;

        /// Interval between device list fetches while connected (milliseconds)
        pub const POLLING_INTERVAL_MS: u64 = 3000;

        /// Consecutive fetch failures that end a polling session.
        /// A value of 1 tears the session down on the first failure.
        pub const DEFAULT_FAILURE_TOLERANCE: u32 = 1;

        pub const fn polling_interval() -> Duration {
            Duration::from_millis(POLLING_INTERVAL_MS)
        }
    }

    // =============================================================================
    // NETWORK CONFIGURATION
    // =============================================================================

    pub mod http {
        use std::time::Duration;

        pub const CONNECT_TIMEOUT_SECS: u64 = 10;
        pub const REQUEST_TIMEOUT_SECS: u64 = 10;

        pub const fn connect_timeout() -> Duration {
            Duration::from_secs(CONNECT_TIMEOUT_SECS)
        }

        pub const fn request_timeout() -> Duration {
            Duration::from_secs(REQUEST_TIMEOUT_SECS)
        }
    }

    // =============================================================================
    // USER-FACING MESSAGES
    // =============================================================================

    pub mod messages {
        pub const CONNECTING: &str = "Connecting...";
        pub const CONNECTED: &str = "Connected";
        pub const DISCONNECTED: &str = "Disconnected";

        pub const IDLE_PLACEHOLDER: &str = "Press \"Connect\" to fetch agent status.";
        pub const WAITING_FOR_AGENTS: &str = "Connected. Waiting for agents to register...";
        pub const CONNECTION_FAILED: &str = "Connection to backend failed. Is the server running?";

        pub const NOT_CONNECTED: &str =
            "You must be connected to the server to issue a wipe command.";
        pub const WIPE_ISSUED: &str = "Wipe command issued successfully!";
        pub const WIPE_FAILED: &str = "Error: Could not issue wipe command.";

        pub const UNKNOWN_STATUS: &str = "Unknown";
        pub const INVALID_DATE: &str = "Invalid Date";
    }
}
