//! Single-slot model session cache.

mod cache;

pub use cache::ModelSlot;

/// Which engine a session belongs to.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum SessionKind {
    Recognition,
    Synthesis,
}

impl SessionKind {
    pub fn as_str(&self) -> &'static str {
        match self {
            SessionKind::Recognition => "recognition",
            SessionKind::Synthesis => "synthesis",
        }
    }
}
