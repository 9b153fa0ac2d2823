mod glider;

// Re-export test fixtures
pub use glider::*;
