//! Order quotation & time-window engine.
//!
//! Pure computation and validation invoked by the request handlers: resolving
//! a delivery/pickup time selection into a concrete deadline, turning listing
//! and rate-sheet data into a cost breakdown, and the insert-or-fetch
//! idempotency protocol used by the create endpoints. Nothing in here touches
//! the database or holds state between calls.

pub mod idempotency;
pub mod quote;
pub mod tier_format;
pub mod time_window;

pub use idempotency::{insert_or_fetch, CreateOutcome};
pub use quote::{compute_quote, display_unit_price, lenient_decimal, QuoteBreakdown, QuoteInput};
pub use tier_format::{delivery_fee_bounds, tier_summary, DefaultTierFormatter, TierEntry, TierFormatter};
pub use time_window::{resolve_window, ResolvedWindow, TimeBand, WindowError, WindowRequest, REFERENCE_TZ};
