/// orbview Core Library - platform-free viewer orchestration
///
/// This library owns everything about the viewer that does not touch a
/// browser or a terminal: viewport layout and projections, input state,
/// camera composition, per-frame drawing through a GPU backend trait, and
/// deferred replacement of the displayed mesh.

pub mod animation;
pub mod config;
pub mod error;
pub mod geometry;
pub mod gpu;
pub mod input;
pub mod layout;
pub mod menu;
pub mod projection;
pub mod renderer;
pub mod scheduler;
pub mod status;
pub mod transform;
pub mod viewer;

// Re-export commonly used types
pub use animation::LoopControl;
pub use config::{Material, ViewerConfig};
pub use error::{GpuError, Result, ViewerError};
pub use geometry::{mesh_builder, Mesh, MeshBuilder, Vertex};
pub use gpu::{GpuBackend, GpuModel, Uniforms};
pub use input::{KeyAction, KeyMap, KeyOutcome, RenderMode};
pub use layout::{ViewId, ViewLayout, ViewRect};
pub use menu::{Menu, MenuAction};
pub use scheduler::BuildTicket;
pub use status::{StatusDisplay, StatusSnapshot};
pub use transform::{MouseOffset, Transform, Viewpoint};
pub use viewer::{Selection, Viewer};
