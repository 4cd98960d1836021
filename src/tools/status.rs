//! Status Tool
//!
//! Runtime status of the HavWtr server.

use serde::Serialize;
use std::path::PathBuf;
use std::time::Instant;
use sysinfo::{Pid, ProcessesToUpdate, System};

use crate::build_info::BuildInfo;
use crate::measurement::MeasurementSystem;

/// Usage guide returned by the `person_info_instructions` tool
pub const PERSON_INFO_INSTRUCTIONS: &str = r#"
# HavWtr Person Info Instructions

## Units

| System | Weight | Height (form) | Height (API) |
|--------|--------|--------------|--------------|
| imperial | lbs | feet + inches, shown as `5' 6''` | decimal feet |
| metric | kg | centimeters, shown as `167.64` | meters |

Weights convert with a fixed factor of 2.2 lb per kg. Heights convert with
30.48 cm per foot; inches are rounded to the nearest whole inch.

## Workflow

1. `toggle_measurement` previews what the form shows after switching systems.
2. `save_person_info` stores the form values locally. Heights are given as form
   text (`5' 6''`, `5.6`, `170`), weights as numbers in the chosen system.
3. `submit_person_info` sends the stored values to the server.
4. `fetch_user_profile` pulls the server profile into the local cache.

Invalid numbers are treated as zero rather than rejected.
"#;

/// Status information
#[derive(Debug, Clone, Serialize)]
pub struct HavWtrStatus {
    pub build_number: u64,
    pub build_timestamp: &'static str,
    pub version: &'static str,

    pub database_path: String,
    pub database_size_bytes: Option<u64>,

    pub api_configured: bool,
    pub session_measurement: MeasurementSystem,

    pub uptime_seconds: u64,
    pub process_id: u32,
    pub memory_usage_bytes: u64,
}

/// Status tracker for the server
pub struct StatusTracker {
    start_time: Instant,
    database_path: PathBuf,
    api_configured: bool,
    session_measurement: MeasurementSystem,
}

impl StatusTracker {
    pub fn new(
        database_path: PathBuf,
        api_configured: bool,
        session_measurement: MeasurementSystem,
    ) -> Self {
        Self {
            start_time: Instant::now(),
            database_path,
            api_configured,
            session_measurement,
        }
    }

    pub fn get_status(&self) -> HavWtrStatus {
        let build_info = BuildInfo::current();

        let database_size_bytes = std::fs::metadata(&self.database_path)
            .ok()
            .map(|m| m.len());

        let pid = std::process::id();
        let mut sys = System::new();
        sys.refresh_processes(ProcessesToUpdate::Some(&[Pid::from_u32(pid)]));

        let memory_usage_bytes = sys
            .process(Pid::from_u32(pid))
            .map(|p| p.memory())
            .unwrap_or(0);

        HavWtrStatus {
            build_number: build_info.build_number,
            build_timestamp: build_info.build_timestamp,
            version: build_info.version,
            database_path: self.database_path.display().to_string(),
            database_size_bytes,
            api_configured: self.api_configured,
            session_measurement: self.session_measurement,
            uptime_seconds: self.start_time.elapsed().as_secs(),
            process_id: pid,
            memory_usage_bytes,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_status_reports_configuration() {
        let tracker = StatusTracker::new(
            PathBuf::from("/nonexistent/havwtr.db"),
            false,
            MeasurementSystem::Metric,
        );
        let status = tracker.get_status();
        assert_eq!(status.database_size_bytes, None);
        assert!(!status.api_configured);
        assert_eq!(status.session_measurement, MeasurementSystem::Metric);
        assert_eq!(status.process_id, std::process::id());
    }
}
