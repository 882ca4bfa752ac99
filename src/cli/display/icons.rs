//! Status icons for CLI output

/// Status icons for different states
pub struct StatusIcon;

impl StatusIcon {
    /// Endpoint published
    pub const SUCCESS: &'static str = "✓";

    /// Waiting on the controller
    pub const PENDING: &'static str = "⏳";

    /// Scheduled backup
    pub const SCHEDULED: &'static str = "⏰";

    /// Manually triggered backup
    pub const MANUAL: &'static str = "▶";

    pub fn get_endpoint_icon(connected: bool) -> &'static str {
        if connected {
            Self::SUCCESS
        } else {
            Self::PENDING
        }
    }

    pub fn get_endpoint_text(connected: bool) -> &'static str {
        if connected {
            "Connected"
        } else {
            "Pending"
        }
    }

    pub fn get_schedule_icon(schedule: &str) -> &'static str {
        if schedule.is_empty() {
            Self::MANUAL
        } else {
            Self::SCHEDULED
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_endpoint_icon_and_text() {
        assert_eq!(StatusIcon::get_endpoint_icon(true), StatusIcon::SUCCESS);
        assert_eq!(StatusIcon::get_endpoint_icon(false), StatusIcon::PENDING);
        assert_eq!(StatusIcon::get_endpoint_text(true), "Connected");
        assert_eq!(StatusIcon::get_endpoint_text(false), "Pending");
    }

    #[test]
    fn test_schedule_icon() {
        assert_eq!(StatusIcon::get_schedule_icon(""), StatusIcon::MANUAL);
        assert_eq!(StatusIcon::get_schedule_icon("@daily"), StatusIcon::SCHEDULED);
    }
}
