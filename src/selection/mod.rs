//! Prompt and variant selection (TDM-52).
//!
//! `periodic` is a pure hash with no stored state. The other two selectors
//! touch the store: `resurface` atomically bumps candidate usage on every
//! pick, and `bandit` learns from impression and success counters.
//! Randomness is always passed in by the caller so tests can seed it.

pub mod bandit;
pub mod periodic;
pub mod resurface;
