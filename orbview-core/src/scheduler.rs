//! Deferred mesh builds and active model replacement.
//!
//! A build is split in two so the host can let the busy indicator paint in
//! between: [`ModelSwapScheduler::request`] shows the indicator and returns a
//! ticket, and [`ModelSwapScheduler::complete`] (run by the host after
//! `ViewerConfig::build_delay`) builds, uploads and swaps. Completions are
//! applied in the order they run, so the last one to finish wins. The
//! indicator is idle exactly when no ticket is outstanding, whatever the
//! outcome of each build.

use std::mem;

use nalgebra::Matrix4;

use crate::config::Material;
use crate::error::{GpuError, Result};
use crate::geometry::MeshBuilder;
use crate::gpu::{GpuBackend, GpuModel, Uniforms};
use crate::status::StatusDisplay;

/// Handle for one requested build
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub struct BuildTicket(u64);

struct PendingBuild {
    ticket: BuildTicket,
    label: String,
    builder: MeshBuilder,
}

#[derive(Default)]
pub struct ModelSwapScheduler {
    next_ticket: u64,
    pending: Vec<PendingBuild>,
}

/// Run `builder`, center its mesh and upload it with the fixed material
pub fn build_model<G: GpuBackend>(
    builder: &MeshBuilder,
    gpu: &mut G,
    material: Material,
    projection: Matrix4<f32>,
) -> Result<GpuModel<G::Buffers>> {
    let mesh = builder()?.centered();
    if mesh.is_empty() {
        return Err(GpuError::EmptyMesh.into());
    }
    mesh.validate()?;
    let buffers = gpu.upload(&mesh)?;
    Ok(GpuModel {
        buffers,
        uniforms: Uniforms::new(material, projection),
        mesh,
    })
}

impl ModelSwapScheduler {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn is_busy(&self) -> bool {
        !self.pending.is_empty()
    }

    /// Queue a build and show the busy indicator
    pub fn request(
        &mut self,
        label: &str,
        builder: MeshBuilder,
        status: &mut impl StatusDisplay,
    ) -> BuildTicket {
        let ticket = BuildTicket(self.next_ticket);
        self.next_ticket += 1;
        self.pending.push(PendingBuild {
            ticket,
            label: label.to_owned(),
            builder,
        });
        status.set_busy(true);
        log::debug!("build {ticket:?} requested for {label:?}");
        ticket
    }

    /// Drop a build that has not run yet. Returns `false` if it already ran.
    pub fn cancel(&mut self, ticket: BuildTicket, status: &mut impl StatusDisplay) -> bool {
        let cancelled = self.take(ticket).is_some();
        if cancelled {
            log::debug!("build {ticket:?} cancelled");
            self.settle(status);
        }
        cancelled
    }

    /// Run the build for `ticket` and install the result as `active`.
    ///
    /// On failure the error is logged and `active` is left as it was.
    /// Returns `Ok(false)` for a ticket that was cancelled or already ran.
    pub fn complete<G: GpuBackend>(
        &mut self,
        ticket: BuildTicket,
        gpu: &mut G,
        active: &mut GpuModel<G::Buffers>,
        material: Material,
        projection: Matrix4<f32>,
        status: &mut impl StatusDisplay,
    ) -> Result<bool> {
        let Some(build) = self.take(ticket) else {
            return Ok(false);
        };

        let outcome = match build_model(&build.builder, gpu, material, projection) {
            Ok(model) => {
                log::info!(
                    "installed {:?}: {} triangles",
                    build.label,
                    model.mesh.triangle_count()
                );
                let previous = mem::replace(active, model);
                gpu.release(previous.buffers);
                Ok(true)
            }
            Err(err) => {
                log::error!("building {:?} failed: {err}", build.label);
                Err(err)
            }
        };
        self.settle(status);
        outcome
    }

    fn take(&mut self, ticket: BuildTicket) -> Option<PendingBuild> {
        let index = self.pending.iter().position(|b| b.ticket == ticket)?;
        Some(self.pending.remove(index))
    }

    fn settle(&self, status: &mut impl StatusDisplay) {
        if self.pending.is_empty() {
            status.set_busy(false);
        }
    }
}
