//! Process-tree enumeration and teardown.
//!
//! Installers routinely spawn their own helper processes; cancelling a batch
//! has to take the whole tree down, not just the process we launched. The
//! functions here work against the system process table so the caller never
//! needs ownership of a child handle, only a PID.

use std::time::{Duration, Instant};
use sysinfo::{Pid, ProcessStatus, Signal, System};

/// Poll cadence while waiting for signaled processes to exit.
const EXIT_POLL_INTERVAL: Duration = Duration::from_millis(100);

/// Take a fresh snapshot of the system process table.
pub(crate) fn snapshot() -> System {
    System::new_all()
}

/// Collect the transitive descendants of `root`, children first.
///
/// The returned list does not include `root` itself. Ordering between
/// siblings follows the process table and is not meaningful.
pub(crate) fn descendants(sys: &System, root: Pid) -> Vec<Pid> {
    let mut found = Vec::new();
    let mut frontier = vec![root];

    while let Some(parent) = frontier.pop() {
        for (pid, process) in sys.processes() {
            if process.parent() == Some(parent) {
                found.push(*pid);
                frontier.push(*pid);
            }
        }
    }

    found
}

/// Request graceful termination of each process.
///
/// Platforms without a graceful termination signal get a hard kill right
/// away. Returns the PIDs that were no longer in the table (already exited),
/// which the caller may want to log but must not treat as a failure.
pub(crate) fn terminate(sys: &System, pids: &[Pid]) -> Vec<Pid> {
    let mut already_gone = Vec::new();

    for &pid in pids {
        match sys.process(pid) {
            Some(process) => {
                if process.kill_with(Signal::Term).is_none() {
                    process.kill();
                }
            }
            None => already_gone.push(pid),
        }
    }

    already_gone
}

/// Forcibly kill each process that is still around.
pub(crate) fn kill(sys: &System, pids: &[Pid]) {
    for &pid in pids {
        if let Some(process) = sys.process(pid) {
            process.kill();
        }
    }
}

/// Wait up to `grace` for the given processes to exit.
///
/// Polls the process table every 100 ms and returns the PIDs still alive
/// when the grace period runs out (empty if everything exited in time).
pub(crate) async fn wait_for_exit(sys: &mut System, pids: &[Pid], grace: Duration) -> Vec<Pid> {
    let deadline = Instant::now() + grace;

    loop {
        sys.refresh_processes();
        let alive: Vec<Pid> = pids.iter().copied().filter(|&p| is_alive(sys, p)).collect();

        if alive.is_empty() || Instant::now() >= deadline {
            return alive;
        }

        tokio::time::sleep(EXIT_POLL_INTERVAL).await;
    }
}

/// Whether the process still exists and is actually running.
///
/// A killed direct child of this process lingers in the table as a zombie
/// until the worker reaps it; that counts as exited here.
fn is_alive(sys: &System, pid: Pid) -> bool {
    match sys.process(pid) {
        Some(process) => !matches!(process.status(), ProcessStatus::Zombie | ProcessStatus::Dead),
        None => false,
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::process::{Command, Stdio};

    #[test]
    fn test_descendants_of_nonexistent_pid_is_empty() {
        let sys = snapshot();
        // Far above pid_max on any supported system.
        let found = descendants(&sys, Pid::from_u32(999_999_999));
        assert!(found.is_empty());
    }

    #[test]
    fn test_terminate_reports_missing_processes() {
        let sys = snapshot();
        let missing = Pid::from_u32(999_999_999);
        let gone = terminate(&sys, &[missing]);
        assert_eq!(gone, vec![missing]);
    }

    #[test]
    fn test_descendants_sees_spawned_child() {
        // Spawn a sleeper from a shell so it shows up as our descendant.
        let mut child = Command::new("/bin/sh")
            .args(["-c", "sleep 5"])
            .stdout(Stdio::null())
            .stderr(Stdio::null())
            .spawn()
            .unwrap();

        let own_pid = Pid::from_u32(std::process::id());
        let sys = snapshot();
        let found = descendants(&sys, own_pid);
        assert!(
            found.contains(&Pid::from_u32(child.id())),
            "spawned shell should be listed among our descendants"
        );

        child.kill().unwrap();
        child.wait().unwrap();
    }

    #[tokio::test]
    async fn test_wait_for_exit_returns_survivors() {
        let mut child = Command::new("/bin/sh")
            .args(["-c", "sleep 30"])
            .stdout(Stdio::null())
            .stderr(Stdio::null())
            .spawn()
            .unwrap();
        let pid = Pid::from_u32(child.id());

        let mut sys = snapshot();
        // A process ignoring the deadline is reported back, not waited on
        // forever.
        let survivors = wait_for_exit(&mut sys, &[pid], Duration::from_millis(300)).await;
        assert_eq!(survivors, vec![pid]);

        kill(&sys, &[pid]);
        child.wait().unwrap();

        let survivors = wait_for_exit(&mut sys, &[pid], Duration::from_secs(2)).await;
        assert!(survivors.is_empty());
    }
}
