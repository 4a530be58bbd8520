//! Application-wide constants for tuning and configuration
//!
//! Centralizes magic numbers to make them discoverable and configurable.

/// Number of items requested per page from the mailbox.
pub const DEFAULT_PAGE_SIZE: usize = 50;

/// Items are handed to the owner loop in chunks of this size so long pages
/// show up incrementally instead of all at once.
pub const STREAM_CHUNK_SIZE: usize = 10;

/// Load the next page when the selection is this close to the end of the list.
pub const LOAD_MORE_THRESHOLD: usize = 10;

/// Error message display duration in seconds before auto-dismiss.
pub const ERROR_TTL_SECS: u64 = 5;

/// Width used for rendering previews before the first terminal size is known.
pub const DEFAULT_PREVIEW_WIDTH: u16 = 80;

/// Narrowest width html2text is asked to wrap to.
pub const MIN_RENDER_WIDTH: u16 = 20;

/// Minimum terminal width to show split view (list + preview).
/// Below this width, only the item list is shown.
pub const MIN_SPLIT_VIEW_WIDTH: u16 = 80;

/// Minimum split ratio percentage for the list/preview split.
pub const SPLIT_RATIO_MIN: u16 = 30;

/// Maximum split ratio percentage for the list/preview split.
pub const SPLIT_RATIO_MAX: u16 = 70;

/// Maximum number of labels kept from a generated suggestion.
pub const MAX_SUGGESTED_LABELS: usize = 3;

/// Input poll timeout while background work is pending.
pub const POLL_BUSY_MS: u64 = 50;

/// Input poll timeout when idle.
pub const POLL_IDLE_MS: u64 = 150;

/// Spinner animation frame duration in milliseconds.
pub const SPINNER_FRAME_MS: u128 = 80;
