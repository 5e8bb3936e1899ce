//! Signal delivery to tracked processes

use crate::{
    error::{Error, Result},
    interfaces::ProcessSignaler,
};

#[derive(Debug, Default, Clone, Copy)]
pub struct SystemSignaler;

#[cfg(unix)]
fn signal_number(signal: &str) -> Option<libc::c_int> {
    match signal {
        "SIGTERM" => Some(libc::SIGTERM),
        "SIGINT" => Some(libc::SIGINT),
        "SIGKILL" => Some(libc::SIGKILL),
        "SIGHUP" => Some(libc::SIGHUP),
        _ => None,
    }
}

impl ProcessSignaler for SystemSignaler {
    #[cfg(unix)]
    fn send_signal(&self, pid: u32, signal: &str) -> Result<()> {
        let number = signal_number(signal).ok_or_else(|| Error::Signal {
            pid,
            signal: signal.to_string(),
            message: "unsupported signal".to_string(),
        })?;

        let rc = unsafe { libc::kill(pid as libc::pid_t, number) };
        if rc != 0 {
            return Err(Error::Signal {
                pid,
                signal: signal.to_string(),
                message: std::io::Error::last_os_error().to_string(),
            });
        }
        Ok(())
    }

    #[cfg(not(unix))]
    fn send_signal(&self, pid: u32, signal: &str) -> Result<()> {
        let status = std::process::Command::new("taskkill")
            .args(["/PID", &pid.to_string(), "/T", "/F"])
            .status()?;
        if !status.success() {
            return Err(Error::Signal {
                pid,
                signal: signal.to_string(),
                message: format!("taskkill exited with {status}"),
            });
        }
        Ok(())
    }
}
