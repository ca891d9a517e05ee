#![allow(dead_code)]
use std::io::Write;
use std::process::Output;

pub fn compile(src: &str) -> String {
    tyshc::driver::compile_source(src, "test.tysh").unwrap_or_else(|e| panic!("{}", e))
}

pub fn compile_err(src: &str) -> String {
    match tyshc::driver::compile_source(src, "test.tysh") {
        Ok(out) => panic!("expected a compile error, got:\n{}", out),
        Err(e) => e.to_string(),
    }
}

/// Compile the source and run the emitted script under bash.
pub fn run(src: &str) -> Output {
    let script = compile(src);
    let mut file = tempfile::NamedTempFile::new().expect("create temp script");
    file.write_all(script.as_bytes()).expect("write temp script");
    std::process::Command::new("bash")
        .arg(file.path())
        .output()
        .expect("run bash")
}

pub fn run_stdout(src: &str) -> String {
    let output = run(src);
    assert!(
        output.status.success(),
        "script failed: {}",
        String::from_utf8_lossy(&output.stderr)
    );
    String::from_utf8_lossy(&output.stdout).into_owned()
}
