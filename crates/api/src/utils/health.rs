//! Component health reporting.

use serde::Serialize;

/// Health of a single component.
#[derive(Debug, Clone, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct ComponentHealth {
    pub name: String,
    pub is_healthy: bool,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub message: Option<String>,
}

impl ComponentHealth {
    pub fn healthy(name: impl Into<String>) -> Self {
        Self { name: name.into(), is_healthy: true, message: None }
    }

    pub fn unhealthy(name: impl Into<String>, message: impl Into<String>) -> Self {
        Self { name: name.into(), is_healthy: false, message: Some(message.into()) }
    }
}

/// Aggregated health across components.
///
/// The score is healthy components over total; the application counts as
/// healthy at a score of 0.8 or better.
#[derive(Debug, Clone, Default, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct HealthStatus {
    pub components: Vec<ComponentHealth>,
    pub score: f64,
    pub is_healthy: bool,
}

impl HealthStatus {
    pub fn new() -> Self {
        Self::default()
    }

    #[must_use]
    pub fn add_component(mut self, component: ComponentHealth) -> Self {
        self.components.push(component);
        self
    }

    pub fn calculate_score(&mut self) {
        if self.components.is_empty() {
            self.score = 0.0;
            self.is_healthy = false;
            return;
        }
        let healthy = self.components.iter().filter(|c| c.is_healthy).count();
        self.score = healthy as f64 / self.components.len() as f64;
        self.is_healthy = self.score >= 0.8;
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn score_reflects_component_mix() {
        let mut status = HealthStatus::new()
            .add_component(ComponentHealth::healthy("database"))
            .add_component(ComponentHealth::healthy("scheduler"))
            .add_component(ComponentHealth::unhealthy("catalog", "timeout"));
        status.calculate_score();

        assert!((status.score - 2.0 / 3.0).abs() < 1e-9);
        assert!(!status.is_healthy);
    }

    #[test]
    fn all_healthy_is_healthy() {
        let mut status = HealthStatus::new().add_component(ComponentHealth::healthy("database"));
        status.calculate_score();
        assert!(status.is_healthy);
    }

    #[test]
    fn empty_status_is_unhealthy() {
        let mut status = HealthStatus::new();
        status.calculate_score();
        assert!(!status.is_healthy);
    }
}
