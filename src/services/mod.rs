pub mod metrics;
pub mod timers;
