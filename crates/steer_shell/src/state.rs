//! The Test Shell's state machine (spec §4.4):
//!
//! ```text
//! Init → Configured → Streaming ⇄ Draining → Finalized → Reported
//!          │                                     │
//!          └──── (validation error) ──→ Error ←──┘
//! ```

#[derive(Clone, Copy, Debug, Eq, PartialEq)]
pub enum ShellState {
    Init,
    Configured,
    Streaming,
    Draining,
    Finalized,
    Reported,
    Error,
}
