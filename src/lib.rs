//! Chess rules engine.
//!
//! Tracks board state, enumerates legal moves, enforces castling, en passant
//! and promotion, and classifies positions as ongoing, check, checkmate,
//! stalemate or drawn. Rendering, input handling, persistence and engines are
//! left to the caller.

pub mod config;
pub mod engine;
