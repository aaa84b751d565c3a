use crate::core::driver::{ProbeOutcome, RegistryProbe, RegistryView};

/// Reads `HKEY_LOCAL_MACHINE` through the requested WOW64 view
#[derive(Debug, Default, Clone, Copy)]
pub struct SystemRegistry;

impl RegistryProbe for SystemRegistry {
    #[cfg(windows)]
    fn probe(&self, view: RegistryView, key_path: &str) -> ProbeOutcome {
        use std::io::ErrorKind;
        use winreg::enums::*;
        use winreg::RegKey;

        let view_flag = match view {
            RegistryView::Registry64 => KEY_WOW64_64KEY,
            RegistryView::Registry32 => KEY_WOW64_32KEY,
        };

        let hklm = RegKey::predef(HKEY_LOCAL_MACHINE);
        match hklm.open_subkey_with_flags(key_path, KEY_READ | view_flag) {
            Ok(_) => ProbeOutcome::Present,
            Err(e) if e.kind() == ErrorKind::NotFound => ProbeOutcome::Absent,
            Err(e) => ProbeOutcome::Inaccessible(e.to_string()),
        }
    }

    #[cfg(not(windows))]
    fn probe(&self, _view: RegistryView, _key_path: &str) -> ProbeOutcome {
        ProbeOutcome::Inaccessible("no system registry on this platform".to_string())
    }
}
