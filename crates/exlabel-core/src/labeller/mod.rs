//! Capabilities a labeller exposes to the pipeline.
//!
//! A [`Labeller`] only knows how to compute a label. The pipeline drives builds
//! through [`IntegrationTask`]s; [`LabelTask`] adapts any labeller into a task
//! that writes the computed label into the context.
use std::sync::Arc;

use async_trait::async_trait;
use exlabel_model::IntegrationContext;
use tracing::debug;

use crate::LabelError;

/// Computes a build label from an integration context.
#[async_trait]
pub trait Labeller: Send + Sync {
    /// Labeller name used in logs and metrics.
    fn name(&self) -> &'static str;

    /// Compute the label without touching `ctx`.
    async fn generate(&self, ctx: &IntegrationContext) -> Result<String, LabelError>;
}

#[async_trait]
impl<L: Labeller + ?Sized> Labeller for Arc<L> {
    fn name(&self) -> &'static str {
        (**self).name()
    }

    async fn generate(&self, ctx: &IntegrationContext) -> Result<String, LabelError> {
        (**self).generate(ctx).await
    }
}

/// Step executed by the pipeline during a build.
#[async_trait]
pub trait IntegrationTask: Send + Sync {
    fn name(&self) -> &'static str;

    /// Run the step against the build context.
    ///
    /// Errors are returned unchanged so the pipeline can abort the build.
    async fn run(&self, ctx: &mut IntegrationContext) -> Result<(), LabelError>;
}

/// Task adapter that stores the output of a [`Labeller`] as the build label.
#[derive(Debug, Clone)]
pub struct LabelTask<L> {
    labeller: L,
}

impl<L: Labeller> LabelTask<L> {
    pub fn new(labeller: L) -> Self {
        Self { labeller }
    }

    /// Access the wrapped labeller.
    pub fn labeller(&self) -> &L {
        &self.labeller
    }
}

#[async_trait]
impl<L: Labeller> IntegrationTask for LabelTask<L> {
    fn name(&self) -> &'static str {
        self.labeller.name()
    }

    async fn run(&self, ctx: &mut IntegrationContext) -> Result<(), LabelError> {
        let label = self.labeller.generate(ctx).await?;
        debug!(labeller = self.labeller.name(), label = %label, "applying label");
        ctx.set_label(label);
        Ok(())
    }
}
