//! Compile pipeline and file-mode entry point.

use crate::codegen;
use crate::error::CompileError;
use crate::lexer;
use crate::lower;
use crate::parser;
use crate::span::SourceMap;
use std::fs;
use std::path::{Path, PathBuf};

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Mode {
    /// Compile and write the script next to the input.
    Default,
    Check,
    EmitAst,
    EmitIr,
}

#[derive(Debug)]
pub struct CompileOptions {
    pub out_path: Option<PathBuf>,
    pub mode: Mode,
}

impl Default for CompileOptions {
    fn default() -> Self {
        Self {
            out_path: None,
            mode: Mode::Default,
        }
    }
}

/// Exit-code-carrying error for the CLI: 1 for I/O problems, 2 for
/// compile errors.
pub struct DriverError {
    pub code: i32,
    pub msg: String,
}

impl DriverError {
    fn compile(err: CompileError) -> Self {
        Self {
            code: 2,
            msg: err.to_string(),
        }
    }

    fn io(msg: String) -> Self {
        Self { code: 1, msg }
    }
}

/// Run the full pipeline over in-memory source text.
pub fn compile_source(src: &str, file: &str) -> Result<String, CompileError> {
    let sm = SourceMap::new(src.to_string());
    let tokens = lexer::lex(&sm, file)?;
    let program = parser::parse(&tokens, &sm, file)?;
    let ir = lower::lower(&program, &sm, file)?;
    Ok(codegen::emit(&ir))
}

/// The sibling path the compiled script is written to by default.
pub fn output_path(input: &Path) -> PathBuf {
    input.with_extension("sh")
}

pub fn compile_file(path: &Path, options: CompileOptions) -> Result<String, DriverError> {
    let src = fs::read_to_string(path)
        .map_err(|e| DriverError::io(format!("Unable to read {}: {}", path.display(), e)))?;
    let file = path.display().to_string();

    let sm = SourceMap::new(src);
    let tokens = lexer::lex(&sm, &file).map_err(DriverError::compile)?;
    let program = parser::parse(&tokens, &sm, &file).map_err(DriverError::compile)?;

    if options.mode == Mode::EmitAst {
        return Ok(format!("{:#?}", program));
    }

    let ir = lower::lower(&program, &sm, &file).map_err(DriverError::compile)?;

    if options.mode == Mode::EmitIr {
        return Ok(format!("{:#?}", ir));
    }
    if options.mode == Mode::Check {
        return Ok("OK".to_string());
    }

    let out = codegen::emit(&ir);
    let out_path = options
        .out_path
        .clone()
        .unwrap_or_else(|| output_path(path));
    fs::write(&out_path, &out)
        .map_err(|e| DriverError::io(format!("Failed to write to {}: {}", out_path.display(), e)))?;
    Ok(out)
}
