// SPDX-License-Identifier: PMPL-1.0-or-later
// Copyright (c) 2026 Jonathan D.A. Jewell (hyperpolymath) <jonathan.jewell@open.ac.uk>
//
// Application configuration.

use serde::{Deserialize, Serialize};

/// Persistent server settings.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ServerConfig {
    /// Address the HTTP server binds to.
    pub host: String,
    /// Port for the HTTP server (default 5000).
    pub port: u16,
    /// Maximum accepted upload size in bytes (default 50 MiB).
    pub max_upload_bytes: usize,
    /// Deadline for a single conversion, in seconds. Conversions that run
    /// longer are abandoned and the request fails.
    pub conversion_timeout_secs: u64,
}

impl Default for ServerConfig {
    fn default() -> Self {
        Self {
            host: "0.0.0.0".to_string(),
            port: 5000,
            max_upload_bytes: 50 * 1024 * 1024,
            conversion_timeout_secs: 60,
        }
    }
}
