/// Colour/label classification of a reading. Bands are a pure function of
/// the value; boundaries are exclusive, so exactly 50.0 load is `Notice`.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Severity {
    Normal,
    Notice,
    Warning,
    Critical,
}

impl Severity {
    /// Load and usage percentages: >75 critical, >50 warning, >25 notice.
    pub fn for_load(percent: f32) -> Self {
        Self::banded(percent, 75.0, 50.0, 25.0)
    }

    /// Temperatures in °C: >85 critical, >75 warning, >50 notice.
    pub fn for_temperature(celsius: f32) -> Self {
        Self::banded(celsius, 85.0, 75.0, 50.0)
    }

    fn banded(value: f32, critical: f32, warning: f32, notice: f32) -> Self {
        if value > critical {
            Severity::Critical
        } else if value > warning {
            Severity::Warning
        } else if value > notice {
            Severity::Notice
        } else {
            Severity::Normal
        }
    }
}

const RESET: &str = "\x1b[0m";

/// ANSI escape sequences for each element of the dashboard. `plain()` turns
/// every colour off.
#[derive(Debug, Clone)]
pub struct Colours {
    pub header: &'static str,
    pub section: &'static str,
    pub text: &'static str,
    pub muted: &'static str,
    pub normal: &'static str,
    pub notice: &'static str,
    pub warning: &'static str,
    pub critical: &'static str,
}

impl Default for Colours {
    fn default() -> Self {
        Self {
            header: "\x1b[1;34m",   // Bold blue - for the title line
            section: "\x1b[1;37m",  // Bold white - for section titles
            text: "",               // Terminal default - for general text
            muted: "\x1b[90m",      // Dark gray - for N/A and separators
            normal: "\x1b[36m",     // Cyan
            notice: "\x1b[32m",     // Green
            warning: "\x1b[33m",    // Yellow
            critical: "\x1b[31m",   // Red
        }
    }
}

impl Colours {
    pub fn plain() -> Self {
        Self {
            header: "",
            section: "",
            text: "",
            muted: "",
            normal: "",
            notice: "",
            warning: "",
            critical: "",
        }
    }

    pub fn severity(&self, severity: Severity) -> &'static str {
        match severity {
            Severity::Normal => self.normal,
            Severity::Notice => self.notice,
            Severity::Warning => self.warning,
            Severity::Critical => self.critical,
        }
    }

    pub fn paint(&self, colour: &str, text: &str) -> String {
        if colour.is_empty() {
            text.to_string()
        } else {
            format!("{}{}{}", colour, text, RESET)
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_load_bands() {
        assert_eq!(Severity::for_load(80.0), Severity::Critical);
        assert_eq!(Severity::for_load(75.0), Severity::Warning);
        assert_eq!(Severity::for_load(50.1), Severity::Warning);
        assert_eq!(Severity::for_load(50.0), Severity::Notice);
        assert_eq!(Severity::for_load(25.0), Severity::Normal);
        assert_eq!(Severity::for_load(0.0), Severity::Normal);
    }

    #[test]
    fn test_temperature_bands() {
        assert_eq!(Severity::for_temperature(90.0), Severity::Critical);
        assert_eq!(Severity::for_temperature(85.0), Severity::Warning);
        assert_eq!(Severity::for_temperature(75.0), Severity::Notice);
        assert_eq!(Severity::for_temperature(50.5), Severity::Notice);
        assert_eq!(Severity::for_temperature(50.0), Severity::Normal);
    }

    #[test]
    fn test_paint() {
        let colours = Colours::default();
        assert_eq!(colours.paint(colours.critical, "hot"), "\x1b[31mhot\x1b[0m");
        assert_eq!(colours.paint(colours.text, "plain"), "plain");
        let plain = Colours::plain();
        assert_eq!(plain.paint(plain.severity(Severity::Critical), "hot"), "hot");
    }
}
