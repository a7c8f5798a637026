//! `Duration` accessors for millisecond configuration fields.
//!
//! Every accessor is a plain conversion: zero means a zero duration. The one
//! exception is the socket timeout, where zero means "no timeout" and is
//! kept as a literal zero rather than being replaced by a computed value.

use std::time::Duration;

use crate::config::schema::MongoConfig;

impl MongoConfig {
    pub fn get_max_conn_idle_time(&self) -> Duration {
        Duration::from_millis(self.max_conn_idle_time)
    }

    pub fn get_connect_timeout(&self) -> Duration {
        Duration::from_millis(self.connect_timeout)
    }

    pub fn get_server_selection_timeout(&self) -> Duration {
        Duration::from_millis(self.server_selection_timeout)
    }

    /// Socket timeout. `Duration::ZERO` means no timeout.
    pub fn get_socket_timeout(&self) -> Duration {
        if self.socket_timeout == 0 {
            return Duration::ZERO;
        }
        Duration::from_millis(self.socket_timeout)
    }

    /// `false` when socket operations are unbounded.
    pub fn has_socket_timeout(&self) -> bool {
        self.socket_timeout != 0
    }

    pub fn get_heartbeat_interval(&self) -> Duration {
        Duration::from_millis(self.heartbeat_interval)
    }

    pub fn get_local_threshold(&self) -> Duration {
        Duration::from_millis(self.local_threshold)
    }

    pub fn get_timeout(&self) -> Duration {
        Duration::from_millis(self.timeout)
    }

    /// Write concern acknowledgment time limit.
    pub fn get_w_timeout(&self) -> Duration {
        Duration::from_millis(self.write_concern.w_timeout)
    }
}
