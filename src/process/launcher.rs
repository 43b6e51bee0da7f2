//! Detached process launching.

use std::fs::OpenOptions;
use std::process::{Child, Command, Stdio};

use tracing::{debug, info};

use super::ProcessError;
use crate::config::SupervisorSettings;

/// Launches the bot detached from the supervisor's terminal.
///
/// The child gets its own process group (so it survives the supervisor
/// exiting and never receives our terminal's signals), a null stdin, and
/// stdout/stderr appended to the configured output log.
///
/// Returns the child handle. Callers check liveness with `try_wait`,
/// which also reaps the process if it already exited; a bare
/// `kill(pid, 0)` would report an unreaped zombie as alive.
pub fn spawn_detached(settings: &SupervisorSettings) -> Result<Child, ProcessError> {
    let mut parts = settings.launch_cmd.split_whitespace();
    let program = parts.next().ok_or(ProcessError::EmptyLaunchCommand)?;
    let args: Vec<&str> = parts.collect();

    let log = OpenOptions::new()
        .create(true)
        .append(true)
        .open(&settings.output_log)?;
    let log_err = log.try_clone()?;

    let mut cmd = Command::new(program);
    cmd.args(&args)
        .current_dir(&settings.working_dir)
        .stdin(Stdio::null())
        .stdout(Stdio::from(log))
        .stderr(Stdio::from(log_err));

    #[cfg(unix)]
    {
        use std::os::unix::process::CommandExt;
        cmd.process_group(0);
    }

    debug!(
        "Spawning '{}' in {} (log: {})",
        settings.launch_cmd,
        settings.working_dir.display(),
        settings.output_log.display()
    );

    let child = cmd.spawn()?;
    info!("Launched bot process, pid {}", child.id());

    Ok(child)
}

#[cfg(test)]
mod tests {
    use super::*;
    use tempfile::TempDir;

    fn settings_in(dir: &TempDir, launch_cmd: &str) -> SupervisorSettings {
        SupervisorSettings {
            launch_cmd: launch_cmd.to_owned(),
            working_dir: dir.path().to_path_buf(),
            output_log: dir.path().join("out.log"),
            ..SupervisorSettings::default()
        }
    }

    #[test]
    fn test_spawn_writes_output_to_log() {
        let dir = TempDir::new().unwrap();
        let settings = settings_in(&dir, "sh -c pwd");

        let mut child = spawn_detached(&settings).unwrap();
        assert!(child.id() > 0);

        child.wait().unwrap();
        let logged = std::fs::read_to_string(&settings.output_log).unwrap();
        assert!(logged.contains(dir.path().to_str().unwrap()));
    }

    #[test]
    fn test_spawn_empty_command() {
        let dir = TempDir::new().unwrap();
        let settings = settings_in(&dir, "   ");

        assert!(matches!(
            spawn_detached(&settings),
            Err(ProcessError::EmptyLaunchCommand)
        ));
    }

    #[test]
    fn test_spawn_missing_program() {
        let dir = TempDir::new().unwrap();
        let settings = settings_in(&dir, "no-such-program-zzqy");

        assert!(matches!(
            spawn_detached(&settings),
            Err(ProcessError::Io(_))
        ));
    }
}
