use std::process::ExitStatus;

use exlabel_core::LabelError;
use tokio::{
    io::{AsyncRead, AsyncReadExt},
    process::{Child, ChildStderr, ChildStdout},
};
use tokio_util::sync::CancellationToken;
use tracing::{debug, trace};

use crate::labeller::spec::ProcessSpec;

/// Captured result of a process that exited with code 0.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ProcessOutcome {
    pub exit_code: i32,
    /// Standard output with trailing CR/LF removed.
    pub stdout: String,
    pub stderr: String,
}

impl ProcessOutcome {
    /// Consume the outcome and return the label candidate.
    pub fn into_label(self) -> String {
        self.stdout
    }
}

/// Launch the process described by `spec` and wait for it.
///
/// Both output streams are drained concurrently with the exit wait, so a
/// child that fills one pipe while the other is idle cannot stall.
/// Classification happens only after the process exited and both streams hit EOF.
pub async fn run_process(
    spec: &ProcessSpec,
    cancel: &CancellationToken,
) -> Result<ProcessOutcome, LabelError> {
    let mut cmd = spec.command();
    let mut child = cmd.spawn().map_err(|source| LabelError::Launch {
        executable: spec.executable().to_string(),
        source,
    })?;
    trace!(pid = ?child.id(), "labelling process spawned");

    let stdout = child.stdout.take();
    let stderr = child.stderr.take();

    let (status, stdout, stderr) = tokio::select! {
        res = collect(&mut child, stdout, stderr) => res?,
        _ = cancel.cancelled() => {
            debug!("cancellation requested; killing labelling process");
            if let Err(e) = child.kill().await {
                debug!("failed to kill labelling process: {e}");
            }
            return Err(LabelError::Cancelled);
        }
    };
    classify(status, stdout, stderr)
}

async fn collect(
    child: &mut Child,
    stdout: Option<ChildStdout>,
    stderr: Option<ChildStderr>,
) -> Result<(ExitStatus, String, String), LabelError> {
    let (status, out, err) = tokio::join!(
        child.wait(),
        drain(stdout, "stdout"),
        drain(stderr, "stderr"),
    );
    let status = status.map_err(|source| LabelError::Capture {
        what: "exit status",
        source,
    })?;
    Ok((status, out?, err?))
}

async fn drain<R>(reader: Option<R>, what: &'static str) -> Result<String, LabelError>
where
    R: AsyncRead + Unpin,
{
    let mut buf = Vec::new();
    if let Some(mut reader) = reader {
        reader
            .read_to_end(&mut buf)
            .await
            .map_err(|source| LabelError::Capture { what, source })?;
    }
    Ok(String::from_utf8_lossy(&buf).into_owned())
}

fn classify(status: ExitStatus, stdout: String, stderr: String) -> Result<ProcessOutcome, LabelError> {
    match status.code() {
        Some(0) => Ok(ProcessOutcome {
            exit_code: 0,
            stdout: trim_line_endings(&stdout).to_string(),
            stderr,
        }),
        code => Err(LabelError::Execution {
            code,
            stderr: trim_line_endings(&stderr).to_string(),
        }),
    }
}

/// Strip trailing `\r` and `\n` characters.
fn trim_line_endings(s: &str) -> &str {
    s.trim_end_matches(['\r', '\n'])
}

#[cfg(all(test, unix))]
mod tests {
    use std::time::Duration;

    use exlabel_model::IntegrationContext;

    use super::*;
    use crate::labeller::{args::sh_args, config::ExecLabellerConfig};

    fn sh(script: &str) -> ProcessSpec {
        let cfg = ExecLabellerConfig::new("/bin/sh").with_build_args(sh_args(script));
        ProcessSpec::build(&cfg, &IntegrationContext::new("/")).unwrap()
    }

    #[test]
    fn trims_only_trailing_line_endings() {
        assert_eq!(trim_line_endings("v1.2.3\r\n"), "v1.2.3");
        assert_eq!(trim_line_endings("v1\n\n\r"), "v1");
        assert_eq!(trim_line_endings("\nv1 "), "\nv1 ");
        assert_eq!(trim_line_endings(""), "");
    }

    #[tokio::test]
    async fn success_yields_trimmed_stdout() {
        let out = run_process(&sh(r#"printf "v1.2.3\r\n""#), &CancellationToken::new())
            .await
            .unwrap();
        assert_eq!(out.exit_code, 0);
        assert_eq!(out.stdout, "v1.2.3");
    }

    #[tokio::test]
    async fn stderr_is_captured_on_success() {
        let out = run_process(&sh("echo warn >&2; echo ok"), &CancellationToken::new())
            .await
            .unwrap();
        assert_eq!(out.stdout, "ok");
        assert_eq!(out.stderr, "warn\n");
    }

    #[tokio::test]
    async fn non_zero_exit_is_execution_failure() {
        let err = run_process(&sh("echo partial; echo bad input >&2; exit 2"), &CancellationToken::new())
            .await
            .unwrap_err();

        match err {
            LabelError::Execution { code, ref stderr } => {
                assert_eq!(code, Some(2));
                assert_eq!(stderr, "bad input");
            }
            other => panic!("unexpected error: {other:?}"),
        }
    }

    #[tokio::test]
    async fn signal_termination_has_no_exit_code() {
        let err = run_process(&sh("kill -9 $$"), &CancellationToken::new())
            .await
            .unwrap_err();
        assert!(matches!(err, LabelError::Execution { code: None, .. }));
    }

    #[tokio::test]
    async fn large_output_on_both_streams_does_not_stall() {
        let spec = sh("yes o | head -c 262144; yes e | head -c 262144 >&2");
        let out = tokio::time::timeout(
            Duration::from_secs(20),
            run_process(&spec, &CancellationToken::new()),
        )
        .await
        .expect("labelling process stalled")
        .unwrap();

        assert_eq!(out.stdout.matches('o').count(), 131072);
        assert_eq!(out.stderr.len(), 262144);
    }

    #[tokio::test]
    async fn stderr_flood_before_stdout_does_not_stall() {
        let spec = sh("yes e | head -c 524288 >&2; echo done");
        let out = tokio::time::timeout(
            Duration::from_secs(20),
            run_process(&spec, &CancellationToken::new()),
        )
        .await
        .expect("labelling process stalled")
        .unwrap();
        assert_eq!(out.stdout, "done");
    }

    #[tokio::test]
    async fn missing_executable_is_launch_failure() {
        let cfg = ExecLabellerConfig::new("/definitely/not/here/labeller");
        let spec = ProcessSpec::build(&cfg, &IntegrationContext::new("/")).unwrap();

        let err = run_process(&spec, &CancellationToken::new()).await.unwrap_err();
        match err {
            LabelError::Launch { executable, source } => {
                assert_eq!(executable, "/definitely/not/here/labeller");
                assert_eq!(source.kind(), std::io::ErrorKind::NotFound);
            }
            other => panic!("unexpected error: {other:?}"),
        }
    }

    #[tokio::test]
    async fn missing_working_directory_is_launch_failure() {
        let cfg = ExecLabellerConfig::new("/bin/sh")
            .with_build_args("-c true")
            .with_base_directory("/definitely/not/here");
        let spec = ProcessSpec::build(&cfg, &IntegrationContext::new("/")).unwrap();

        let err = run_process(&spec, &CancellationToken::new()).await.unwrap_err();
        assert!(matches!(err, LabelError::Launch { .. }));
    }

    #[tokio::test]
    async fn cancellation_kills_the_process() {
        let cancel = CancellationToken::new();
        let trigger = cancel.clone();
        tokio::spawn(async move {
            tokio::time::sleep(Duration::from_millis(100)).await;
            trigger.cancel();
        });

        let err = tokio::time::timeout(
            Duration::from_secs(10),
            run_process(&sh("exec sleep 30"), &cancel),
        )
        .await
        .expect("cancellation did not stop the process")
        .unwrap_err();
        assert!(matches!(err, LabelError::Cancelled));
    }
}
