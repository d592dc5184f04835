pub mod advisor;
pub mod config;
pub mod engine;
pub mod error;
pub mod onboarding;
pub mod telemetry;
