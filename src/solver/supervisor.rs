/*!
 * External process supervisor.
 *
 * One child process and three threads, each owning one stream:
 * - the command listener reads the supervisor's input and turns a
 *   `terminate` line into an interrupt of the child (other lines are
 *   passed on to the child's stdin),
 * - the stdout relay and the stderr relay forward the child's output
 *   line by line, decoding lossily.
 *
 * The supervisor returns the child's exit code.
 */

use std::collections::VecDeque;
use std::io::{BufRead, BufReader, Read, Write};
use std::process::{Child, ChildStdin, Command, ExitStatus, Stdio};
use std::sync::mpsc;
use std::thread;
use std::time::{Duration, Instant};

use crate::solver::{SolverError, ProcResult};

/// Input line that requests termination.
pub const TERMINATE: &str = "terminate";

/// Keystrokes that close an interactive shell left behind by launcher scripts.
const EXIT_KEYS: &[u8] = b"exit\n";

/// Stderr lines kept for error reports.
const STDERR_TAIL: usize = 20;

/// How long an interrupted child may take before it is killed (timeouts only).
const KILL_GRACE: Duration = Duration::from_secs(10);

/// How long output is still relayed after the child exited. Background
/// processes it started may hold its streams open indefinitely.
const DRAIN: Duration = Duration::from_millis(500);

const POLL: Duration = Duration::from_millis(100);

/// A line relayed from the child.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum StreamLine {
    Stdout(String),
    Stderr(String),
}

/// Supervisor settings.
#[derive(Debug, Clone, Default, PartialEq)]
pub struct SupervisorOptions {
    /// Also type `exit` into the child's stdin on termination.
    pub exit_keys: bool,
    /// Interrupt the child once this much time has passed. Unset: wait indefinitely.
    pub timeout: Option<Duration>,
}

/// How the child ended.
#[derive(Debug, Clone, PartialEq)]
pub struct Outcome {
    /// Exit code; 128 + signal number if killed by a signal.
    pub code: i32,
    /// Last lines of the child's stderr.
    pub stderr_tail: Vec<String>,
    /// Whether the timeout fired.
    pub timed_out: bool,
}

/// A running child under supervision.
#[derive(Debug)]
pub struct Supervisor {
    child: Child,
    options: SupervisorOptions,
}

impl Supervisor {
    /// Start the command with piped stdio.
    /// On windows the child leads a new process group so it can be sent a console break.
    pub fn spawn(command: &mut Command, options: SupervisorOptions) -> ProcResult<Self> {
        let program = command.get_program().to_string_lossy().to_string();
        #[cfg(windows)]
        {
            use std::os::windows::process::CommandExt;
            command.creation_flags(windows_sys::Win32::System::Threading::CREATE_NEW_PROCESS_GROUP);
        }
        let child = command
            .stdin(Stdio::piped())
            .stdout(Stdio::piped())
            .stderr(Stdio::piped())
            .spawn()
            .map_err(|error| match error.kind() {
                std::io::ErrorKind::NotFound => SolverError::NotFound(program),
                _ => SolverError::Io(error),
            })?;
        Ok(Supervisor{child, options})
    }

    pub fn id(&self) -> u32 {
        self.child.id()
    }

    /// Relay the child's output until it exits, watching `commands` for `terminate`.
    /// The command listener is not joined: it may be blocked reading a terminal.
    /// Neither are the relays once the child has exited and the drain time is over.
    pub fn run<R, F>(mut self, commands: R, mut on_line: F) -> ProcResult<Outcome>
    where
        R: BufRead + Send + 'static,
        F: FnMut(&StreamLine),
    {
        let pid = self.child.id();
        let child_stdin = self.child.stdin.take();
        let stdout = match self.child.stdout.take() {
            Some(stdout) => stdout,
            None => panic!("BUG: Child stdout was not piped"),
        };
        let stderr = match self.child.stderr.take() {
            Some(stderr) => stderr,
            None => panic!("BUG: Child stderr was not piped"),
        };

        let exit_keys = self.options.exit_keys;
        thread::spawn(move || listen(commands, child_stdin, pid, exit_keys));

        let (sender, receiver) = mpsc::channel();
        let stdout_sender = sender.clone();
        let stdout_relay = thread::spawn(move || relay(stdout, stdout_sender, StreamLine::Stdout));
        let stderr_relay = thread::spawn(move || relay(stderr, sender, StreamLine::Stderr));

        let started = Instant::now();
        let mut interrupted_at: Option<Instant> = None;
        let mut exited: Option<(ExitStatus, Instant)> = None;
        let mut disconnected = false;
        let mut stderr_tail = VecDeque::with_capacity(STDERR_TAIL);
        loop {
            match receiver.recv_timeout(POLL) {
                Ok(line) => {
                    if let StreamLine::Stderr(text) = &line {
                        if stderr_tail.len() == STDERR_TAIL {
                            stderr_tail.pop_front();
                        }
                        stderr_tail.push_back(text.clone());
                    }
                    on_line(&line);
                },
                Err(mpsc::RecvTimeoutError::Timeout) => (),
                Err(mpsc::RecvTimeoutError::Disconnected) => {
                    disconnected = true;
                    break;
                },
            }
            match exited {
                Some((_, at)) if at.elapsed() >= DRAIN => break,
                Some(_) => continue,
                None => {
                    if let Some(status) = self.child.try_wait()? {
                        exited = Some((status, Instant::now()));
                        continue;
                    }
                },
            }
            if let Some(timeout) = self.options.timeout {
                match interrupted_at {
                    None if started.elapsed() >= timeout => {
                        println!("Timeout of {:?} reached, interrupting process {}", timeout, pid);
                        interrupt(pid)?;
                        interrupted_at = Some(Instant::now());
                    },
                    Some(at) if at.elapsed() >= KILL_GRACE => {
                        // Ignore errors: the child may have exited meanwhile
                        let _ = self.child.kill();
                    },
                    _ => (),
                }
            }
        }
        if disconnected {
            let _ = stdout_relay.join();
            let _ = stderr_relay.join();
        }

        let status = match exited {
            Some((status, _)) => status,
            None => self.child.wait()?,
        };
        Ok(Outcome{
            code: exit_code(status),
            stderr_tail: stderr_tail.into_iter().collect(),
            timed_out: interrupted_at.is_some(),
        })
    }
}

/// Forward one stream line by line. Bytes that are not UTF-8 are replaced.
fn relay<S, F>(stream: S, sender: mpsc::Sender<StreamLine>, wrap: F)
where
    S: Read,
    F: Fn(String) -> StreamLine,
{
    let mut reader = BufReader::new(stream);
    let mut buffer = Vec::new();
    loop {
        buffer.clear();
        match reader.read_until(b'\n', &mut buffer) {
            Ok(0) | Err(_) => return,
            Ok(_) => {
                let line = String::from_utf8_lossy(&buffer).trim_end_matches(&['\r', '\n'][..]).to_string();
                if sender.send(wrap(line)).is_err() {
                    return;
                }
            },
        }
    }
}

/// Watch the command stream for `terminate`; pass other lines to the child.
fn listen<R: BufRead>(commands: R, mut child_stdin: Option<ChildStdin>, pid: u32, exit_keys: bool) {
    for line in commands.lines() {
        let line = match line {
            Ok(line) => line,
            Err(error) if error.kind() == std::io::ErrorKind::InvalidData => continue,
            Err(_) => return,
        };
        if line.trim() == TERMINATE {
            if let Err(error) = interrupt(pid) {
                eprintln!("Could not interrupt process {}:\n{}", pid, error);
            }
            if exit_keys {
                if let Some(stdin) = child_stdin.as_mut() {
                    let _ = stdin.write_all(EXIT_KEYS).and_then(|_| stdin.flush());
                }
            }
        } else if let Some(stdin) = child_stdin.as_mut() {
            if writeln!(stdin, "{}", line).is_err() {
                child_stdin = None;
            }
        }
    }
}

/// Send the platform interrupt to a process.
#[cfg(unix)]
pub fn interrupt(pid: u32) -> ProcResult<()> {
    let status = Command::new("kill").arg("-INT").arg(pid.to_string()).status()?;
    if !status.success() {
        return Err(SolverError::StringOnly(format!("kill -INT {} failed with {}", pid, status)));
    }
    Ok(())
}

/// Send the platform interrupt to a process: a console break to the process
/// group it leads (see `Supervisor::spawn`).
#[cfg(windows)]
pub fn interrupt(pid: u32) -> ProcResult<()> {
    use windows_sys::Win32::System::Console::{GenerateConsoleCtrlEvent, CTRL_BREAK_EVENT};
    // SAFETY: no pointers are passed; an unknown group id is reported as an error.
    if unsafe { GenerateConsoleCtrlEvent(CTRL_BREAK_EVENT, pid) } == 0 {
        return Err(SolverError::Io(std::io::Error::last_os_error()));
    }
    Ok(())
}

#[cfg(not(any(unix, windows)))]
pub fn interrupt(pid: u32) -> ProcResult<()> {
    Err(SolverError::StringOnly(format!("Interrupting process {} is not supported on this platform", pid)))
}

/// Exit code of a finished process, 128 + signal for signalled ones.
fn exit_code(status: ExitStatus) -> i32 {
    if let Some(code) = status.code() {
        return code;
    }
    #[cfg(unix)]
    {
        use std::os::unix::process::ExitStatusExt;
        if let Some(signal) = status.signal() {
            return 128 + signal;
        }
    }
    1
}

#[cfg(all(test, unix))]
mod tests {
    use super::*;

    /// Command input that arrives only after a delay.
    struct Delayed {
        delay: Option<Duration>,
        data: std::io::Cursor<Vec<u8>>,
    }
    impl Read for Delayed {
        fn read(&mut self, buf: &mut [u8]) -> std::io::Result<usize> {
            if let Some(delay) = self.delay.take() {
                thread::sleep(delay);
            }
            self.data.read(buf)
        }
    }

    fn delayed(text: &str, millis: u64) -> BufReader<Delayed> {
        BufReader::new(Delayed{delay: Some(Duration::from_millis(millis)), data: std::io::Cursor::new(text.as_bytes().to_vec())})
    }

    fn sh(script: &str) -> Command {
        let mut command = Command::new("sh");
        command.arg("-c").arg(script);
        command
    }

    #[test]
    fn terminate_returns_the_child_exit_code() {
        let mut command = sh("trap 'sleep 1; exit 3' INT; echo ready; while true; do sleep 0.1; done");
        let options = SupervisorOptions{exit_keys: false, timeout: Some(Duration::from_secs(30))};
        let supervisor = Supervisor::spawn(&mut command, options).unwrap();
        let mut lines = Vec::new();
        let outcome = supervisor.run(delayed("terminate\n", 500), |line| lines.push(line.clone())).unwrap();
        assert_eq!(outcome.code, 3);
        assert!(!outcome.timed_out);
        assert_eq!(lines, vec![StreamLine::Stdout("ready".to_string())]);
    }

    #[test]
    fn relays_both_streams_lossily() {
        let mut command = sh("printf 'out\\n'; printf 'bad \\377 byte\\n' >&2; exit 4");
        let supervisor = Supervisor::spawn(&mut command, SupervisorOptions::default()).unwrap();
        let mut lines = Vec::new();
        let outcome = supervisor.run(std::io::Cursor::new(Vec::new()), |line| lines.push(line.clone())).unwrap();
        assert_eq!(outcome.code, 4);
        assert!(lines.contains(&StreamLine::Stdout("out".to_string())));
        assert_eq!(outcome.stderr_tail, vec!["bad \u{FFFD} byte".to_string()]);
    }

    #[test]
    fn other_input_reaches_the_child() {
        let mut command = sh("read answer; echo \"got $answer\"");
        let supervisor = Supervisor::spawn(&mut command, SupervisorOptions::default()).unwrap();
        let mut lines = Vec::new();
        let outcome = supervisor.run(std::io::Cursor::new(b"42\n".to_vec()), |line| lines.push(line.clone())).unwrap();
        assert_eq!(outcome.code, 0);
        assert_eq!(lines, vec![StreamLine::Stdout("got 42".to_string())]);
    }

    #[test]
    fn background_helpers_do_not_hold_the_supervisor() {
        let mut command = sh("sleep 5 & echo launched; exit 7");
        let supervisor = Supervisor::spawn(&mut command, SupervisorOptions::default()).unwrap();
        let started = Instant::now();
        let mut lines = Vec::new();
        let outcome = supervisor.run(delayed("", 0), |line| lines.push(line.clone())).unwrap();
        assert_eq!(outcome.code, 7);
        assert_eq!(lines, vec![StreamLine::Stdout("launched".to_string())]);
        assert!(started.elapsed() < Duration::from_secs(3), "{:?}", started.elapsed());
    }

    #[test]
    fn timeout_interrupts() {
        let mut command = sh("trap 'exit 5' INT; while true; do sleep 0.1; done");
        let options = SupervisorOptions{exit_keys: false, timeout: Some(Duration::from_millis(300))};
        let supervisor = Supervisor::spawn(&mut command, options).unwrap();
        let outcome = supervisor.run(delayed("", 0), |_| ()).unwrap();
        assert!(outcome.timed_out);
        assert_eq!(outcome.code, 5);
    }

    #[test]
    fn missing_binary_is_reported() {
        let error = Supervisor::spawn(&mut Command::new("cfdcase-no-such-solver"), SupervisorOptions::default()).unwrap_err();
        assert!(matches!(error, SolverError::NotFound(program) if program == "cfdcase-no-such-solver"));
    }
}
