//! Shared constants for end-to-end tests
//!
//! This module contains all constants used across the test suite.
//! When the seeded library changes (users, songs, likes), update only
//! this file and `fixtures.rs`.

// ============================================================================
// Test Users
// ============================================================================

/// Likes "Blue Night" only
pub const USER_MINA: &str = "mina";

/// Likes "Blue Night" and "Stone Garden"
pub const USER_JUN: &str = "jun";

/// Likes "Paper Boats" and "Blue Night"
pub const USER_SOL: &str = "sol";

/// Registered but has not liked anything yet
pub const USER_NO_LIKES: &str = "dara";

// ============================================================================
// Test Songs
// ============================================================================

pub const SONG_BLUE_NIGHT: &str = "Blue Night";
pub const SONG_SILVER_MOON: &str = "Silver Moon";
pub const SONG_STONE_GARDEN: &str = "Stone Garden";
pub const SONG_PAPER_BOATS: &str = "Paper Boats";
pub const SONG_EMBER_SKY: &str = "Ember Sky";

pub const ARTIST_MIST_VALLEY: &str = "Mist Valley";
pub const ARTIST_GRANITE_ARC: &str = "Granite Arc";
pub const ARTIST_QUIET_TIDE: &str = "The Quiet Tide";

/// Total seeded songs
pub const LIBRARY_SONG_COUNT: usize = 5;

/// Total seeded users (including the likeless one)
pub const LIBRARY_USER_COUNT: usize = 4;

// ============================================================================
// Test Timeouts and Configuration
// ============================================================================

/// Maximum time to wait for server to become ready (milliseconds)
pub const SERVER_READY_TIMEOUT_MS: u64 = 5000;

/// Timeout for individual HTTP requests (seconds)
pub const REQUEST_TIMEOUT_SECS: u64 = 10;

/// Polling interval when waiting for server ready (milliseconds)
pub const SERVER_READY_POLL_INTERVAL_MS: u64 = 50;
