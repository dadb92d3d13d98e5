//! Label generator facade and its building blocks.
//!
//! Flow per call: [`ProcessSpec::build`] (working directory + environment) →
//! [`runner::run_process`] (spawn, drain, wait, classify) → label.
mod args;
mod config;
mod env;
mod runner;
mod spec;

pub use config::ExecLabellerConfig;
pub use env::materialize;
pub use runner::{ProcessOutcome, run_process};
pub use spec::ProcessSpec;

use std::time::Instant;

use async_trait::async_trait;
use exlabel_core::{LabelError, Labeller, MetricsHandle, noop_metrics};
use exlabel_model::IntegrationContext;
use tokio_util::sync::CancellationToken;
use tracing::{Instrument, debug, debug_span, error};

use crate::metrics::{EXEC_LABELLER, outcome_of};

/// Labeller that takes the standard output of an external program as the build label.
///
/// Stateless between calls: every [`Labeller::generate`] builds a new
/// [`ProcessSpec`] and runs a new process. Wrap in [`exlabel_core::LabelTask`]
/// to get the pipeline task that stores the label into the context.
pub struct ExecLabeller {
    config: ExecLabellerConfig,
    metrics: MetricsHandle,
    cancel: CancellationToken,
}

impl ExecLabeller {
    /// Create a labeller from a validated config, with no-op metrics and no cancellation.
    pub fn new(config: ExecLabellerConfig) -> Result<Self, LabelError> {
        config.validate()?;
        Ok(Self {
            config,
            metrics: noop_metrics(),
            cancel: CancellationToken::new(),
        })
    }

    /// Replace the metrics backend and return updated labeller.
    pub fn with_metrics(mut self, metrics: MetricsHandle) -> Self {
        self.metrics = metrics;
        self
    }

    /// Attach a cancellation token.
    ///
    /// Once the token is cancelled, running and future calls kill their process and fail with [`LabelError::Cancelled`].
    pub fn with_cancellation(mut self, cancel: CancellationToken) -> Self {
        self.cancel = cancel;
        self
    }

    pub fn config(&self) -> &ExecLabellerConfig {
        &self.config
    }

    async fn exec_label(&self, ctx: &IntegrationContext) -> Result<String, LabelError> {
        let spec = ProcessSpec::build(&self.config, ctx)?;
        spec.trace_state();
        debug!(
            executable = %spec.executable(),
            cwd = %spec.working_directory().display(),
            arguments = %spec.arguments(),
            "starting process"
        );

        let outcome = run_process(&spec, &self.cancel).await?;
        debug!(output = %outcome.stdout, "process output");
        Ok(outcome.into_label())
    }
}

#[async_trait]
impl Labeller for ExecLabeller {
    fn name(&self) -> &'static str {
        EXEC_LABELLER
    }

    async fn generate(&self, ctx: &IntegrationContext) -> Result<String, LabelError> {
        let span = debug_span!("exec_labeller", executable = %self.config.executable);
        async {
            debug!("generate label");
            self.metrics.record_label_started(EXEC_LABELLER);
            let started = Instant::now();

            let result = self.exec_label(ctx).await;

            let elapsed_ms = u64::try_from(started.elapsed().as_millis()).unwrap_or(u64::MAX);
            self.metrics
                .record_label_completed(EXEC_LABELLER, outcome_of(&result), elapsed_ms);
            match &result {
                Ok(label) => debug!(label = %label, "label generated"),
                Err(e) => {
                    self.metrics.record_labeller_error(EXEC_LABELLER, e.kind());
                    error!(error = %e, "label generation failed");
                }
            }
            result
        }
        .instrument(span)
        .await
    }
}

impl std::fmt::Debug for ExecLabeller {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("ExecLabeller")
            .field("config", &self.config)
            .field("metrics", &"<handle>")
            .field("cancelled", &self.cancel.is_cancelled())
            .finish()
    }
}

#[cfg(all(test, unix))]
mod tests {
    use std::sync::{Arc, Mutex};

    use exlabel_core::{IntegrationTask, LabelOutcome, LabelTask, MetricsBackend};

    use super::*;
    use crate::labeller::args::sh_args;

    fn sh_labeller(script: &str) -> ExecLabeller {
        ExecLabeller::new(ExecLabellerConfig::new("/bin/sh").with_build_args(sh_args(script)))
            .unwrap()
    }

    #[derive(Default)]
    struct Recording(Mutex<Vec<String>>);

    impl MetricsBackend for Recording {
        fn record_label_started(&self, labeller: &str) {
            self.0.lock().unwrap().push(format!("started:{labeller}"));
        }

        fn record_label_completed(&self, labeller: &str, outcome: LabelOutcome, _: u64) {
            self.0
                .lock()
                .unwrap()
                .push(format!("completed:{labeller}:{}", outcome.as_label()));
        }

        fn record_labeller_error(&self, labeller: &str, error_kind: &str) {
            self.0.lock().unwrap().push(format!("error:{labeller}:{error_kind}"));
        }
    }

    #[test]
    fn new_rejects_empty_executable() {
        let err = ExecLabeller::new(ExecLabellerConfig::new("")).unwrap_err();
        assert!(matches!(err, LabelError::Configuration(_)));
    }

    #[tokio::test]
    async fn generate_returns_trimmed_stdout() {
        let labeller = sh_labeller(r#"printf "v1.2.3\r\n""#);
        let label = labeller.generate(&IntegrationContext::new("/")).await.unwrap();
        assert_eq!(label, "v1.2.3");
    }

    #[tokio::test]
    async fn generate_reports_exit_code_and_stderr() {
        let labeller = sh_labeller("echo bad input >&2; exit 2");
        let err = labeller.generate(&IntegrationContext::new("/")).await.unwrap_err();

        assert!(matches!(err, LabelError::Execution { .. }));
        let msg = err.to_string();
        assert!(msg.contains('2'), "{msg}");
        assert!(msg.contains("bad input"), "{msg}");
    }

    #[tokio::test]
    async fn generate_fails_to_launch_missing_executable() {
        let labeller = ExecLabeller::new(ExecLabellerConfig::new("/no/such/labeller")).unwrap();
        let err = labeller.generate(&IntegrationContext::new("/")).await.unwrap_err();
        assert!(matches!(err, LabelError::Launch { .. }));
    }

    #[tokio::test]
    async fn parameters_reach_the_process_without_marker() {
        let labeller = sh_labeller(r#"printf "%s-%s" "$Project" "$BuildDate""#);
        let ctx = IntegrationContext::new("/")
            .with_parameter("$Project", "core")
            .with_parameter("$BuildDate", "20240101");

        let label = labeller.generate(&ctx).await.unwrap();
        assert_eq!(label, "core-20240101");
        assert_eq!(ctx.label(), "");
    }

    #[tokio::test]
    async fn arguments_are_not_shell_interpreted() {
        let labeller = ExecLabeller::new(
            ExecLabellerConfig::new("/bin/echo").with_build_args(r#"$Project "a;b" `x`"#),
        )
        .unwrap();
        let ctx = IntegrationContext::new("/").with_parameter("$Project", "core");

        let label = labeller.generate(&ctx).await.unwrap();
        assert_eq!(label, "$Project a;b `x`");
    }

    #[tokio::test]
    async fn base_directory_overrides_context_directory() {
        let base = tempfile::tempdir().unwrap();
        let ctx_dir = tempfile::tempdir().unwrap();
        let labeller = ExecLabeller::new(
            ExecLabellerConfig::new("/bin/sh")
                .with_build_args(r#"-c "pwd -P""#)
                .with_base_directory(base.path()),
        )
        .unwrap();

        let label = labeller
            .generate(&IntegrationContext::new(ctx_dir.path()))
            .await
            .unwrap();
        let expected = base.path().canonicalize().unwrap();
        assert_eq!(label, expected.to_string_lossy());
    }

    #[tokio::test]
    async fn context_directory_is_used_by_default() {
        let ctx_dir = tempfile::tempdir().unwrap();
        let labeller = sh_labeller("pwd -P");

        let label = labeller
            .generate(&IntegrationContext::new(ctx_dir.path()))
            .await
            .unwrap();
        let expected = ctx_dir.path().canonicalize().unwrap();
        assert_eq!(label, expected.to_string_lossy());
    }

    #[tokio::test]
    async fn generate_is_idempotent() {
        let labeller = sh_labeller(r#"printf "%s" "$Version""#);
        let ctx = IntegrationContext::new("/").with_parameter("$Version", "4.2");

        let first = labeller.generate(&ctx).await.unwrap();
        let second = labeller.generate(&ctx).await.unwrap();
        assert_eq!(first, "4.2");
        assert_eq!(first, second);
    }

    #[tokio::test(flavor = "multi_thread", worker_threads = 2)]
    async fn concurrent_invocations_do_not_mix() {
        let labeller = Arc::new(sh_labeller(
            r#"sleep 0.2; printf "%s" "$Who"; printf "%s" "$Who" >&2"#,
        ));
        let ctx_a = IntegrationContext::new("/").with_parameter("$Who", "alpha");
        let ctx_b = IntegrationContext::new("/").with_parameter("$Who", "beta");

        let (a, b) = tokio::join!(labeller.generate(&ctx_a), labeller.generate(&ctx_b));
        assert_eq!(a.unwrap(), "alpha");
        assert_eq!(b.unwrap(), "beta");
    }

    #[tokio::test]
    async fn task_applies_label_to_context() {
        let task = LabelTask::new(sh_labeller("echo 7.0.1"));
        let mut ctx = IntegrationContext::new("/");

        task.run(&mut ctx).await.unwrap();
        assert_eq!(ctx.label(), "7.0.1");
    }

    #[tokio::test]
    async fn task_propagates_failure_unchanged() {
        let task = LabelTask::new(sh_labeller("echo nope >&2; exit 5"));
        let mut ctx = IntegrationContext::new("/");
        ctx.set_label("unchanged");

        let err = task.run(&mut ctx).await.unwrap_err();
        assert_eq!(err.exit_code(), Some(5));
        assert_eq!(ctx.label(), "unchanged");
    }

    #[tokio::test]
    async fn cancelled_token_fails_with_cancelled() {
        let cancel = CancellationToken::new();
        cancel.cancel();
        let labeller = sh_labeller("exec sleep 30").with_cancellation(cancel);

        let err = labeller.generate(&IntegrationContext::new("/")).await.unwrap_err();
        assert!(matches!(err, LabelError::Cancelled));
    }

    #[tokio::test]
    async fn metrics_record_success_and_failure() {
        let metrics = Arc::new(Recording::default());

        let ok = sh_labeller("echo 1").with_metrics(metrics.clone());
        ok.generate(&IntegrationContext::new("/")).await.unwrap();

        let failing = sh_labeller("exit 1").with_metrics(metrics.clone());
        failing.generate(&IntegrationContext::new("/")).await.unwrap_err();

        let events = metrics.0.lock().unwrap().clone();
        assert_eq!(
            events,
            vec![
                "started:exec",
                "completed:exec:success",
                "started:exec",
                "completed:exec:failure",
                "error:exec:non_zero_exit",
            ]
        );
    }
}
