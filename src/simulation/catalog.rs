//! Fixed catalogs the simulation draws names and messages from.

use crate::models::AlertSeverity;

pub const SERVERS: [&str; 5] = [
    "server-01",
    "server-02",
    "server-03",
    "server-04",
    "server-05",
];

pub const REGIONS: [&str; 5] = ["beijing", "shanghai", "shenzhen", "chengdu", "hangzhou"];

pub const SERVICE_TYPES: [&str; 5] = ["web", "database", "cache", "message-queue", "api-gateway"];

pub const TASK_NAMES: [&str; 10] = [
    "system-backup",
    "log-cleanup",
    "performance-monitoring",
    "security-scan",
    "data-sync",
    "cache-refresh",
    "database-optimization",
    "service-restart",
    "config-update",
    "health-check",
];

pub const CLUSTERS: [&str; 5] = [
    "production",
    "testing",
    "development",
    "pre-release",
    "disaster-recovery",
];

pub const ALERT_SOURCES: [&str; 10] = [
    "server-01",
    "server-02",
    "server-03",
    "server-04",
    "server-05",
    "database-cluster",
    "cache-service",
    "api-gateway",
    "load-balancer",
    "monitoring-system",
];

const LOW_MESSAGES: [&str; 7] = [
    "CPU usage slightly elevated",
    "Memory usage rising",
    "Disk space running low",
    "Network latency increasing",
    "Response time degrading",
    "Connection count nearing limit",
    "Cache hit ratio dropping",
];

const MEDIUM_MESSAGES: [&str; 7] = [
    "CPU usage too high",
    "Memory usage too high",
    "Disk space critically low",
    "Network connection unstable",
    "Service response timeout",
    "Database connection pool exhausted",
    "Error rate increasing",
];

const HIGH_MESSAGES: [&str; 7] = [
    "CPU usage severely high",
    "Out-of-memory risk",
    "Disk space nearly exhausted",
    "Network connection lost",
    "Service unavailable",
    "Database connection failed",
    "System crash risk",
];

const CRITICAL_MESSAGES: [&str; 7] = [
    "System crashed",
    "Service completely unavailable",
    "Data loss risk",
    "Security vulnerability exploited",
    "Large-scale outage",
    "Data center failure",
    "Network completely down",
];

/// Message catalog bound to a severity tier
pub fn messages_for(severity: AlertSeverity) -> &'static [&'static str] {
    match severity {
        AlertSeverity::Low => &LOW_MESSAGES,
        AlertSeverity::Medium => &MEDIUM_MESSAGES,
        AlertSeverity::High => &HIGH_MESSAGES,
        AlertSeverity::Critical => &CRITICAL_MESSAGES,
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_each_tier_has_seven_messages() {
        for severity in AlertSeverity::ALL {
            assert_eq!(messages_for(severity).len(), 7);
        }
    }
}
