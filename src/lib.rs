//! Deterministic top-K aggregation of per-channel play counts.
//!
//! `plays-topk` merges per-channel rankings into one global top-K ranking
//! with Fagin's Algorithm, and annotates that ranking with the same
//! computation over an earlier reference window. Identical inputs always
//! produce identical output, byte-for-byte: ties in score are broken by
//! item key, never by hash or arrival order.
//!
//! Data flows from a [`source::ScoreSource`] (one call per channel, in
//! parallel) through [`topk::SortedListBuilder`] and
//! [`topk::FaginAggregator`] into [`comparison::PeriodComparator`].

pub mod comparison;
pub mod config;
pub mod request;
pub mod service;
pub mod source;
pub mod topk;
pub mod types;
