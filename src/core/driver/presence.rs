//! Driver presence detection.

/// Registry view to query. The same key can live in either one depending on
/// the bitness of the installer that wrote it.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum RegistryView {
    Registry64,
    Registry32,
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub enum ProbeOutcome {
    Present,
    Absent,
    /// The view could not be read (permissions, no registry on this host)
    Inaccessible(String),
}

/// Looks up one key in one registry view
pub trait RegistryProbe: Send + Sync {
    fn probe(&self, view: RegistryView, key_path: &str) -> ProbeOutcome;
}

/// Checks both registry views for the driver's uninstall record
pub struct PresenceChecker {
    probe: Box<dyn RegistryProbe>,
    key_path: String,
}

impl PresenceChecker {
    pub fn new(probe: Box<dyn RegistryProbe>, key_path: impl Into<String>) -> Self {
        Self {
            probe,
            key_path: key_path.into(),
        }
    }

    /// True if either view has the record. Unreadable views count as absent.
    pub fn check_installed(&self) -> bool {
        [RegistryView::Registry64, RegistryView::Registry32]
            .into_iter()
            .any(|view| match self.probe.probe(view, &self.key_path) {
                ProbeOutcome::Present => true,
                ProbeOutcome::Absent => false,
                ProbeOutcome::Inaccessible(reason) => {
                    log::debug!("[driver] {:?} not readable: {}", view, reason);
                    false
                }
            })
    }
}
