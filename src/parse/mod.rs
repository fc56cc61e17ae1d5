//! Compiler invocation parsing
//!
//! Extracts the source file, macro definitions, include directories and
//! output directory from raw `cl.exe` command lines and normalizes every
//! path-valued parameter.

pub mod batch;
pub mod extract;
pub mod invocation;
pub mod normalize;
pub mod tokenizer;

pub use batch::{parse_batch, DuplicatePolicy, ParseReport, RecordFailure};
pub use extract::{extract_from_pattern, extract_output_dir, extract_source_file};
pub use invocation::{CompileArgs, CompileInvocation, InvocationParser};
pub use normalize::PathNormalizer;
