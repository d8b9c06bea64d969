//! Fixed limits shared by the server, handlers, and shutdown driver.

use std::time::Duration;

/// How long the process waits for in-flight transfers after shutdown is requested.
pub const SHUTDOWN_GRACE_PERIOD: Duration = Duration::from_secs(3);

/// Per-request read and write timeout.
pub const IO_TIMEOUT: Duration = Duration::from_secs(10);

/// Upload bytes buffered in memory per submission before parts spill to disk.
pub const MAX_MEMORY_BYTES: usize = 20 << 20; // 20 MiB

/// Transfer limit value meaning "never stop".
pub const UNLIMITED: i64 = -1;

pub const DEFAULT_PORT: u16 = 8008;
pub const DEFAULT_COUNT: i64 = 1;
