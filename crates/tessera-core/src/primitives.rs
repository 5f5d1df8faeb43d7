//! # Engine Primitives
//!
//! Hardcoded limits and constants for the Tessera engine.
//!
//! These values are compiled into the binary and are immutable at runtime.

/// Maximum length of a dependency chain during a single pass.
///
/// Real asset graphs are a handful of levels deep. A chain longer than this
/// indicates runaway wiring and is reported as a configuration error before
/// it can exhaust the stack.
pub const MAX_RESOLUTION_DEPTH: usize = 256;

/// Maximum size of a single persisted file read through a fetcher (64 MB).
pub const MAX_FETCH_FILE_SIZE: u64 = 64 * 1024 * 1024;

/// Name of the diagnostic state report written next to the output files.
pub const STATE_FILE_NAME: &str = ".tessera_state.json";

/// Current state report format version.
///
/// Increment this when making breaking changes to the report layout.
pub const STATE_FORMAT_VERSION: u32 = 1;

/// FNV-1a 64-bit offset basis used by file set checksums.
pub const CHECKSUM_OFFSET_BASIS: u64 = 0xcbf2_9ce4_8422_2325;

/// FNV-1a 64-bit prime used by file set checksums.
pub const CHECKSUM_PRIME: u64 = 0x0000_0100_0000_01b3;
