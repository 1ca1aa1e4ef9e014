//! Desktop environment detection
//!
//! Classifies the running desktop session from `XDG_CURRENT_DESKTOP`.
//! The variable is read once per process; a desktop switch mid-session is
//! not observed, which is a documented limitation rather than a defect.

use std::sync::OnceLock;

static DETECTED: OnceLock<DesktopEnvironment> = OnceLock::new();

/// Desktop environments this core can bridge to natively.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum DesktopEnvironment {
    Gnome,
    Kde,
    /// Unset or unrecognized session; native bridging is never attempted.
    Unknown,
}

impl DesktopEnvironment {
    /// Detect the current desktop environment, caching the result for the
    /// process lifetime. Absence of information is itself a valid result.
    pub fn detect() -> DesktopEnvironment {
        *DETECTED.get_or_init(|| {
            let env = classify(std::env::var("XDG_CURRENT_DESKTOP").ok().as_deref());
            log::debug!("Desktop environment classified as {:?}", env);
            env
        })
    }
}

/// Classify a raw `XDG_CURRENT_DESKTOP` value. Matching is case-insensitive
/// and substring-based because the variable is a colon-separated list on
/// some sessions (e.g. "ubuntu:GNOME").
pub fn classify(value: Option<&str>) -> DesktopEnvironment {
    let Some(value) = value else {
        return DesktopEnvironment::Unknown;
    };

    let lower = value.to_lowercase();
    if lower.contains("gnome") {
        DesktopEnvironment::Gnome
    } else if lower.contains("kde") {
        DesktopEnvironment::Kde
    } else {
        DesktopEnvironment::Unknown
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_classify_gnome_variants() {
        assert_eq!(classify(Some("GNOME")), DesktopEnvironment::Gnome);
        assert_eq!(classify(Some("ubuntu:GNOME")), DesktopEnvironment::Gnome);
        assert_eq!(classify(Some("gnome-classic")), DesktopEnvironment::Gnome);
    }

    #[test]
    fn test_classify_kde() {
        assert_eq!(classify(Some("KDE")), DesktopEnvironment::Kde);
        assert_eq!(classify(Some("kde-plasma")), DesktopEnvironment::Kde);
    }

    #[test]
    fn test_classify_unknown() {
        assert_eq!(classify(Some("XFCE")), DesktopEnvironment::Unknown);
        assert_eq!(classify(Some("")), DesktopEnvironment::Unknown);
        assert_eq!(classify(None), DesktopEnvironment::Unknown);
    }

    #[test]
    fn test_detect_does_not_panic() {
        // Result depends on the host session; just exercise the cached path
        let first = DesktopEnvironment::detect();
        let second = DesktopEnvironment::detect();
        assert_eq!(first, second);
    }
}
