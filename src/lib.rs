//! Heliocoin - block, header, and locator primitives for a hybrid
//! proof-of-work / proof-of-stake blockchain
//!
//! # Architecture
//!
//! The crate is organized into logical modules:
//!
//! ## Core Primitives
//! - [`block`] - Block, header, and locator types with their wire contract
//!   and proof-of-work / proof-of-stake classification
//! - [`transaction`] - Transaction types the block core consumes
//!
//! ## Consensus Plumbing
//! - [`hashing`] - Identity hash (double SHA-256) and memory-hard
//!   proof-of-work hash (scrypt)
//! - [`serialize`] - Channel-aware, byte-exact wire codec
//!
//! ## Configuration & Utilities
//! - [`config`] - Diagnostics configuration
//! - [`error`] - Error types

#![forbid(unsafe_code)]

// ============================================================================
// Core Primitives
// ============================================================================
pub mod block;
pub mod transaction;

// ============================================================================
// Consensus Plumbing
// ============================================================================
pub mod hashing;
pub mod serialize;

// ============================================================================
// Configuration & Utilities
// ============================================================================
pub mod config;
pub mod error;
