// ABOUTME: Application constants and configuration defaults
// ABOUTME: Lifetime policies, storage key prefixes, and credential generation parameters
//
// SPDX-License-Identifier: MIT OR Apache-2.0
// Copyright (c) 2025 Vela Contributors

/// Issuance lifetime policy defaults
pub mod lifetimes {
    /// Authorization code lifetime in seconds. Deliberately short: a code is
    /// meant to be exchanged immediately after the redirect.
    pub const AUTH_CODE_LIFETIME_SECS: u64 = 15;

    /// Access token lifetime in seconds
    pub const ACCESS_TOKEN_LIFETIME_SECS: u64 = 3600;
}

/// Storage key namespace
pub mod storage {
    /// Prefix for registered client records in the key-value backend
    pub const CLIENT_KEY_PREFIX: &str = "vela:auth:client:";

    /// Prefix for pending authorization code records in the key-value backend
    pub const CODE_KEY_PREFIX: &str = "vela:auth:code:";

    /// Default bound applied around every storage operation, in seconds
    pub const DEFAULT_OPERATION_TIMEOUT_SECS: u64 = 5;
}

/// Credential generation parameters
pub mod credentials {
    /// Default bcrypt work factor for client secret derivation
    pub const DEFAULT_BCRYPT_COST: u32 = 9;

    /// Default secret-salt length in bytes (160 bits of entropy)
    pub const DEFAULT_SALT_LENGTH: usize = 20;

    /// Random bytes per authorization code (22 base64url characters)
    pub const AUTH_CODE_BYTES: usize = 16;
}

/// Redis connection defaults, applied when the key-value backend is selected
pub mod redis_connection {
    /// TCP connect timeout in seconds
    pub const DEFAULT_CONNECTION_TIMEOUT_SECS: u64 = 5;

    /// Per-command response timeout in seconds
    pub const DEFAULT_RESPONSE_TIMEOUT_SECS: u64 = 5;

    /// Initial connection attempts before giving up
    pub const DEFAULT_INITIAL_CONNECTION_RETRIES: u32 = 3;

    /// Reconnection attempts handled by the connection manager
    pub const DEFAULT_RECONNECTION_RETRIES: usize = 3;

    /// First retry delay in milliseconds (doubles per attempt)
    pub const DEFAULT_INITIAL_RETRY_DELAY_MS: u64 = 100;

    /// Retry delay cap in milliseconds
    pub const DEFAULT_MAX_RETRY_DELAY_MS: u64 = 2000;
}
