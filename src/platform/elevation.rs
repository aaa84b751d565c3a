use std::path::Path;

use crate::core::driver::ElevatedLauncher;
use crate::error::{LiteMonError, Result};

#[cfg(windows)]
pub fn is_elevated() -> bool {
    use std::mem;
    use std::ptr;
    use windows_sys::Win32::Foundation::{CloseHandle, HANDLE};
    use windows_sys::Win32::Security::{
        GetTokenInformation, TokenElevation, TOKEN_ELEVATION, TOKEN_QUERY,
    };
    use windows_sys::Win32::System::Threading::{GetCurrentProcess, OpenProcessToken};

    unsafe {
        let mut handle: HANDLE = ptr::null_mut();

        if OpenProcessToken(GetCurrentProcess(), TOKEN_QUERY, &mut handle) == 0 {
            return false;
        }

        let mut elevation: TOKEN_ELEVATION = mem::zeroed();
        let mut size: u32 = 0;

        let result = GetTokenInformation(
            handle,
            TokenElevation,
            &mut elevation as *mut _ as *mut core::ffi::c_void,
            mem::size_of::<TOKEN_ELEVATION>() as u32,
            &mut size,
        );

        CloseHandle(handle);

        result != 0 && elevation.TokenIsElevated != 0
    }
}

#[cfg(not(windows))]
pub fn is_elevated() -> bool {
    // On Unix, check if running as root
    unsafe { libc::geteuid() == 0 }
}

/// Quote one argument so the Windows argv parser gives it back unchanged.
///
/// Backslashes are literal unless they precede a quote, so runs of them are
/// doubled before an embedded quote and before the closing quote.
#[cfg_attr(not(windows), allow(dead_code))]
fn quote_arg(arg: &str) -> String {
    if !arg.is_empty() && !arg.contains(|c: char| c.is_whitespace() || c == '"') {
        return arg.to_string();
    }

    let mut quoted = String::with_capacity(arg.len() + 2);
    quoted.push('"');
    let mut backslashes = 0;
    for c in arg.chars() {
        match c {
            '\\' => backslashes += 1,
            '"' => {
                quoted.extend(std::iter::repeat('\\').take(backslashes * 2 + 1));
                quoted.push('"');
                backslashes = 0;
            }
            _ => {
                quoted.extend(std::iter::repeat('\\').take(backslashes));
                quoted.push(c);
                backslashes = 0;
            }
        }
    }
    quoted.extend(std::iter::repeat('\\').take(backslashes * 2));
    quoted.push('"');
    quoted
}

/// Joins installer arguments into a single command line
#[cfg_attr(not(windows), allow(dead_code))]
fn join_args(args: &[String]) -> String {
    args.iter()
        .map(|arg| quote_arg(arg))
        .collect::<Vec<_>>()
        .join(" ")
}

/// Map a `pkexec` exit status to the installer's exit code.
///
/// pkexec reports a dismissed authentication dialog as 126 and a refused
/// authorization as 127. It passes the program's own status through
/// otherwise, so an installer that itself exits with 126 or 127 cannot be
/// told apart and is reported as denied elevation.
#[cfg_attr(windows, allow(dead_code))]
fn pkexec_exit(code: Option<i32>) -> Result<Option<i32>> {
    match code {
        Some(code @ (126 | 127)) => Err(LiteMonError::elevation_denied(format!(
            "pkexec refused elevation (exit {})",
            code
        ))),
        other => Ok(other),
    }
}

/// Launches programs through the operating system's elevation mechanism.
///
/// Windows uses the `runas` shell verb (UAC prompt) with a hidden window.
/// Unix runs directly as root, otherwise through `pkexec`.
#[derive(Debug, Default, Clone, Copy)]
pub struct SystemElevatedLauncher;

impl ElevatedLauncher for SystemElevatedLauncher {
    #[cfg(windows)]
    fn run_elevated(&self, program: &Path, args: &[String]) -> Result<Option<i32>> {
        use std::ffi::OsStr;
        use std::os::windows::ffi::OsStrExt;
        use windows_sys::Win32::Foundation::{CloseHandle, GetLastError, ERROR_CANCELLED};
        use windows_sys::Win32::System::Threading::{
            GetExitCodeProcess, WaitForSingleObject, INFINITE,
        };
        use windows_sys::Win32::UI::Shell::{
            ShellExecuteExW, SEE_MASK_NOCLOSEPROCESS, SHELLEXECUTEINFOW,
        };
        use windows_sys::Win32::UI::WindowsAndMessaging::SW_HIDE;

        fn wide(s: &OsStr) -> Vec<u16> {
            s.encode_wide().chain(Some(0)).collect()
        }

        let verb = wide(OsStr::new("runas"));
        let file = wide(program.as_os_str());
        let parameters = wide(OsStr::new(&join_args(args)));

        unsafe {
            let mut info: SHELLEXECUTEINFOW = std::mem::zeroed();
            info.cbSize = std::mem::size_of::<SHELLEXECUTEINFOW>() as u32;
            info.fMask = SEE_MASK_NOCLOSEPROCESS;
            info.lpVerb = verb.as_ptr();
            info.lpFile = file.as_ptr();
            info.lpParameters = parameters.as_ptr();
            info.nShow = SW_HIDE;

            if ShellExecuteExW(&mut info) == 0 {
                let code = GetLastError();
                if code == ERROR_CANCELLED {
                    return Err(LiteMonError::elevation_denied(
                        "the UAC prompt was dismissed",
                    ));
                }
                return Err(LiteMonError::install_cancelled(format!(
                    "ShellExecuteExW failed with error {}",
                    code
                )));
            }

            if info.hProcess.is_null() {
                return Err(LiteMonError::install_cancelled(
                    "no process handle returned for the installer",
                ));
            }

            WaitForSingleObject(info.hProcess, INFINITE);

            let mut exit_code: u32 = 0;
            let ok = GetExitCodeProcess(info.hProcess, &mut exit_code);
            CloseHandle(info.hProcess);

            if ok == 0 {
                return Ok(None);
            }
            Ok(Some(exit_code as i32))
        }
    }

    #[cfg(not(windows))]
    fn run_elevated(&self, program: &Path, args: &[String]) -> Result<Option<i32>> {
        use std::fs;
        use std::os::unix::fs::PermissionsExt;
        use std::process::{Command, Stdio};

        // Downloaded files lose the executable bit
        let mut perms = fs::metadata(program)?.permissions();
        perms.set_mode(0o755);
        fs::set_permissions(program, perms)?;

        let as_root = is_elevated();
        let mut command = if as_root {
            Command::new(program)
        } else {
            let mut command = Command::new("pkexec");
            command.arg(program);
            command
        };

        let status = command
            .args(args)
            .stdin(Stdio::null())
            .stdout(Stdio::null())
            .stderr(Stdio::null())
            .status()
            .map_err(|e| {
                LiteMonError::install_cancelled(format!("failed to start installer: {}", e))
            })?;

        if as_root {
            Ok(status.code())
        } else {
            pkexec_exit(status.code())
        }
    }
}
