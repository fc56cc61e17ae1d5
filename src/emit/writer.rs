use super::edge::{BuildEdge, RULE_NAME};
use crate::error::EmitError;
use crate::parse::CompileInvocation;
use std::fs::File;
use std::io::{self, BufWriter, Write};
use std::path::{Path, PathBuf};
use tracing::{debug, info};

pub const NINJA_REQUIRED_VERSION: &str = "1.3";
const DEPENDENCY_FLAG: &str = "--dependency";

/// Streams a ninja build file: one shared `COMPILE` rule followed by one
/// `build` statement per invocation.
pub struct NinjaWriter<W: Write> {
    out: W,
    edges: usize,
}

impl<W: Write> NinjaWriter<W> {
    pub fn new(out: W) -> Self {
        Self { out, edges: 0 }
    }

    pub fn write_header(&mut self) -> io::Result<()> {
        writeln!(self.out, "ninja_required_version = {}", NINJA_REQUIRED_VERSION)?;
        writeln!(self.out)?;
        writeln!(self.out, "rule {}", RULE_NAME)?;
        writeln!(self.out, "  depfile = $out.d")?;
        writeln!(self.out, "  deps = gcc")?;
        writeln!(self.out, "  command = $CMDLINE {} $out.d", DEPENDENCY_FLAG)?;
        writeln!(self.out)?;
        Ok(())
    }

    pub fn write_edge(&mut self, edge: &BuildEdge) -> io::Result<()> {
        writeln!(self.out, "build {}: {} {}", edge.output, edge.rule, edge.input)?;
        writeln!(self.out, "  CMDLINE = {}", edge.command)?;
        writeln!(self.out)?;
        self.edges += 1;
        Ok(())
    }

    pub fn edges(&self) -> usize {
        self.edges
    }

    pub fn finish(mut self) -> io::Result<W> {
        self.out.flush()?;
        Ok(self.out)
    }
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct EmitSummary {
    pub path: PathBuf,
    pub edges: usize,
}

/// Writes the whole build graph for `invocations` to `out`, in input order.
pub fn write_build_graph<W: Write>(
    out: W,
    invocations: &[CompileInvocation],
    tool: &str,
) -> io::Result<NinjaWriter<W>> {
    let mut writer = NinjaWriter::new(out);
    writer.write_header()?;
    for invocation in invocations {
        let edge = BuildEdge::from_invocation(invocation, tool);
        debug!(output = %edge.output, input = %edge.input, "Writing build edge");
        writer.write_edge(&edge)?;
    }
    Ok(writer)
}

/// Renders the build graph in memory.
pub fn render(invocations: &[CompileInvocation], tool: &str) -> String {
    let mut buffer = Vec::new();
    // Writing into a Vec cannot fail.
    if let Ok(writer) = write_build_graph(&mut buffer, invocations, tool) {
        let _ = writer.finish();
    }
    String::from_utf8_lossy(&buffer).into_owned()
}

/// Creates (or overwrites) `destination` with the build graph.
pub fn emit(
    invocations: &[CompileInvocation],
    tool: &str,
    destination: &Path,
) -> Result<EmitSummary, EmitError> {
    let file = File::create(destination).map_err(|source| EmitError::Create {
        path: destination.to_path_buf(),
        source,
    })?;

    let writer = write_build_graph(BufWriter::new(file), invocations, tool)?;
    let edges = writer.edges();
    writer.finish()?;

    info!(
        path = %destination.display(),
        edges,
        "Build file written"
    );

    Ok(EmitSummary {
        path: destination.to_path_buf(),
        edges,
    })
}
