use std::io::{BufRead, BufReader, Read, Write};
use std::process::{Command, Stdio};
use std::thread;

use anyhow::{anyhow, Context, Result};
use tracing::debug;

/// Runs `command` through `sh -c` inside the subsystem and streams both output pipes back,
/// one line at a time, through `transform`. Returns the child's exit code.
///
/// stdout and stderr are pumped on separate threads: lines keep their order within a
/// stream, with no ordering between the two.
pub fn run_streamed<F>(launcher: &str, command: &str, transform: F) -> Result<i32>
where
    F: Fn(&str) -> String + Sync,
{
    debug!(launcher, command, "spawning");
    let mut child = Command::new(launcher)
        .arg("-e")
        .arg("sh")
        .arg("-c")
        .arg(command)
        .stdin(Stdio::inherit())
        .stdout(Stdio::piped())
        .stderr(Stdio::piped())
        .spawn()
        .with_context(|| format!("failed to spawn {launcher}"))?;
    let child_out = child.stdout.take().ok_or_else(|| anyhow!("child stdout not captured"))?;
    let child_err = child.stderr.take().ok_or_else(|| anyhow!("child stderr not captured"))?;

    let transform = &transform;
    thread::scope(|s| -> Result<()> {
        let t_out = s.spawn(move || pump(child_out, std::io::stdout(), transform));
        let t_err = s.spawn(move || pump(child_err, std::io::stderr(), transform));
        t_out.join().map_err(|_| anyhow!("stdout pump panicked"))??;
        t_err.join().map_err(|_| anyhow!("stderr pump panicked"))??;
        Ok(())
    })?;

    let status = child.wait().context("failed to wait for child")?;
    debug!(?status, "child exited");
    Ok(exit_code(status))
}

/// Copies `input` to `output` line by line. Invalid UTF-8 is replaced, line terminators
/// are normalized to `\n`.
pub fn pump<R, W, F>(input: R, mut output: W, transform: &F) -> Result<()>
where
    R: Read,
    W: Write,
    F: Fn(&str) -> String + ?Sized,
{
    let mut reader = BufReader::new(input);
    let mut buf = Vec::new();
    loop {
        buf.clear();
        if reader.read_until(b'\n', &mut buf)? == 0 {
            break;
        }
        while matches!(buf.last(), Some(b'\n' | b'\r')) {
            buf.pop();
        }
        let line = String::from_utf8_lossy(&buf);
        writeln!(output, "{}", transform(&*line))?;
        output.flush()?;
    }
    Ok(())
}

#[cfg(unix)]
fn exit_code(status: std::process::ExitStatus) -> i32 {
    use std::os::unix::process::ExitStatusExt;
    status.code().or_else(|| status.signal().map(|sig| 128 + sig)).unwrap_or(1)
}

#[cfg(not(unix))]
fn exit_code(status: std::process::ExitStatus) -> i32 {
    status.code().unwrap_or(1)
}
