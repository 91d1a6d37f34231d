use std::collections::HashMap;

use serde::{Deserialize, Serialize};

/// Path of the operating-system statistics category.
pub const OS_STATS_PATH: &str = "/api/v1/stats/category/os";

/// History window the console shows for the busy-CPU series.
pub const CPU_HISTORY_WINDOW: &str = "5min";

#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Histogram {
    #[serde(default)]
    pub buckets: f64,
    #[serde(default)]
    pub bucket_milliseconds: f64,
    #[serde(default)]
    pub total_milliseconds: f64,
    #[serde(default)]
    pub time_base: f64,
    #[serde(default)]
    pub base_number: f64,
    #[serde(default, rename = "type")]
    pub kind: String,
    #[serde(default)]
    pub values: Vec<f64>,
}

#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct OneStatInfo {
    #[serde(default)]
    pub name: String,
    #[serde(default)]
    pub category: String,
    #[serde(default)]
    pub unit: String,
    #[serde(default)]
    pub value: f64,
    #[serde(default)]
    pub history: HashMap<String, Histogram>,
}

#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct CpuTimes {
    pub user: f64,
    pub nice: f64,
    pub sys: f64,
    pub idle: f64,
    pub irq: f64,
}

#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct CpuInfo {
    #[serde(default)]
    pub model: String,
    #[serde(default)]
    pub speed: f64,
    #[serde(default)]
    pub times: CpuTimes,
}

#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct StatsOs {
    #[serde(default)]
    pub cpus: Vec<CpuInfo>,
    #[serde(default)]
    pub freemem: f64,
    #[serde(default)]
    pub totalmem: f64,
    #[serde(default)]
    pub loadavg: Vec<f64>,
    #[serde(default)]
    pub uptime: f64,
    #[serde(default)]
    pub cpu_busy: OneStatInfo,
    #[serde(default)]
    pub mem_usage: OneStatInfo,
}

impl StatsOs {
    /// Busy-CPU samples for the standard history window, oldest first.
    pub fn cpu_busy_history(&self) -> &[f64] {
        self.cpu_busy
            .history
            .get(CPU_HISTORY_WINDOW)
            .map(|h| h.values.as_slice())
            .unwrap_or(&[])
    }
}

/// Join numbers with `", "`, printing integral values without a fraction.
pub fn num_list_to_string(values: &[f64]) -> String {
    values
        .iter()
        .map(|v| format_number(*v))
        .collect::<Vec<_>>()
        .join(", ")
}

pub fn format_number(v: f64) -> String {
    if v.fract() == 0.0 && v.abs() < 1e15 {
        format!("{}", v as i64)
    } else {
        v.to_string()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;

    #[test]
    fn test_decode_os_stats() {
        let raw = json!({
            "cpus": [{"model": "x", "speed": 2400, "times": {"user": 1, "nice": 0, "sys": 2, "idle": 3, "irq": 0}}],
            "freemem": 1024,
            "totalmem": 4096,
            "loadavg": [0.5, 0.25, 0.0],
            "uptime": 3600,
            "cpuBusy": {"name": "cpuBusy", "history": {"5min": {"buckets": 3, "type": "avg", "values": [1, 2, 3]}}},
            "memUsage": {"name": "memUsage"}
        });
        let stats: StatsOs = serde_json::from_value(raw).unwrap();
        assert_eq!(stats.cpus.len(), 1);
        assert_eq!(stats.cpu_busy_history(), &[1.0, 2.0, 3.0]);
        assert_eq!(stats.cpu_busy.history["5min"].kind, "avg");
    }

    #[test]
    fn test_decode_partial_os_stats() {
        let raw = json!({
            "cpus": [{"times": {"user": 1, "sys": 2, "idle": 3}}],
            "freemem": 1,
            "cpuBusy": {"history": {"5min": {"buckets": 60.0, "bucketMilliseconds": 5000.0, "values": [0.5]}}}
        });
        let stats: StatsOs = serde_json::from_value(raw).unwrap();
        let times = &stats.cpus[0].times;
        assert_eq!((times.user, times.nice, times.sys, times.irq), (1.0, 0.0, 2.0, 0.0));
        assert_eq!(stats.freemem, 1.0);
        assert_eq!(stats.cpu_busy.history["5min"].buckets, 60.0);
        assert_eq!(stats.cpu_busy_history(), &[0.5]);
        assert!(stats.mem_usage.history.is_empty());
    }

    #[test]
    fn test_num_list_to_string() {
        assert_eq!(num_list_to_string(&[0.5, 0.25, 0.0]), "0.5, 0.25, 0");
        assert_eq!(num_list_to_string(&[]), "");
        assert_eq!(format_number(3600.0), "3600");
    }
}
