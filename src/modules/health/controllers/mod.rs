mod health_controller;

pub use health_controller::{
    configure, health_check, readiness_check, HealthChecks, HealthResponse, ReadinessChecks,
    ReadinessResponse,
};
