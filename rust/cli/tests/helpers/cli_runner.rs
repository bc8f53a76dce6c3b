use std::path::PathBuf;
use std::process::{Command, Stdio};
use std::time::{Duration, Instant};

/// Environment variables the CLI reads; cleared for every child so the
/// developer's shell cannot leak into a test.
const CLI_ENV: &[&str] = &[
    "MONKEYBET_CONFIG",
    "MONKEYBET_SEED",
    "MONKEYBET_MODE",
    "MONKEYBET_BOT",
    "MONKEYBET_SIM_BREAK_AFTER",
];

#[derive(Debug)]
pub struct CliRunner {
    binary_path: PathBuf,
    temp_dir: tempfile::TempDir,
}

#[allow(dead_code)]
#[derive(Debug, Clone)]
pub struct CliResult {
    pub exit_code: i32,
    pub stdout: String,
    pub stderr: String,
    pub duration: Duration,
}

#[allow(dead_code)]
impl CliRunner {
    pub fn new() -> std::io::Result<Self> {
        Ok(Self {
            binary_path: PathBuf::from(env!("CARGO_BIN_EXE_monkeybet")),
            temp_dir: tempfile::tempdir()?,
        })
    }

    /// Scratch directory the child runs in; removed on drop.
    pub fn temp_path(&self) -> &std::path::Path {
        self.temp_dir.path()
    }

    pub fn run(&self, args: &[&str]) -> CliResult {
        self.run_inner(args, &[], None)
    }

    pub fn run_with_env(&self, args: &[&str], env: &[(&str, &str)]) -> CliResult {
        self.run_inner(args, env, None)
    }

    pub fn run_with_input(&self, args: &[&str], input: &str) -> CliResult {
        self.run_inner(args, &[], Some(input))
    }

    fn run_inner(&self, args: &[&str], env: &[(&str, &str)], input: Option<&str>) -> CliResult {
        let mut cmd = Command::new(&self.binary_path);
        cmd.args(args)
            .current_dir(self.temp_dir.path())
            .stdin(if input.is_some() {
                Stdio::piped()
            } else {
                Stdio::null()
            })
            .stdout(Stdio::piped())
            .stderr(Stdio::piped());

        for key in CLI_ENV {
            cmd.env_remove(key);
        }
        for (key, value) in env.iter() {
            cmd.env(key, value);
        }

        let start = Instant::now();
        let mut child = cmd.spawn().expect("failed to spawn CLI binary");

        // fed from a thread so a long script cannot stall against a full stdout pipe
        let writer = match (input, child.stdin.take()) {
            (Some(payload), Some(mut stdin)) => {
                let payload = payload.to_string();
                Some(std::thread::spawn(move || {
                    use std::io::Write as _;
                    // the child may exit before reading everything
                    let _ = stdin.write_all(payload.as_bytes());
                }))
            }
            _ => None,
        };

        let output = child.wait_with_output().expect("failed to read output");
        if let Some(handle) = writer {
            let _ = handle.join();
        }
        CliResult {
            exit_code: output.status.code().unwrap_or(1),
            stdout: String::from_utf8_lossy(&output.stdout).to_string(),
            stderr: String::from_utf8_lossy(&output.stderr).to_string(),
            duration: start.elapsed(),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::CliRunner;

    #[test]
    fn run_executes_help_command() {
        let cli = CliRunner::new().expect("CliRunner init");
        let result = cli.run(&["--help"]);

        assert_eq!(result.exit_code, 0);
        assert!(result.stdout.contains("Usage"));
    }

    #[test]
    fn run_with_input_accepts_empty_payload() {
        let cli = CliRunner::new().expect("CliRunner init");
        let result = cli.run_with_input(&["--version"], "");

        assert_eq!(result.exit_code, 0);
        assert!(result.stdout.contains("monkeybet"));
    }
}
