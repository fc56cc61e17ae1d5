//! Ninja build graph emission
//!
//! Every compile invocation becomes one `build` edge that runs the indexing
//! tool through a shared `COMPILE` rule. Paths and command lines are escaped
//! for the ninja file format before they are written.

pub mod edge;
pub mod escape;
pub mod writer;

pub use edge::{artifact_path, command_line, BuildEdge, ARTIFACT_SUFFIX, RULE_NAME};
pub use escape::ninja_escape;
pub use writer::{emit, render, write_build_graph, EmitSummary, NinjaWriter};
