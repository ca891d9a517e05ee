use std::path::PathBuf;
use std::process;
use tyshc::driver::{self, CompileOptions, DriverError, Mode};

struct Config {
    filename: String,
    options: CompileOptions,
}

struct CliError {
    code: i32,
    msg: String,
    show_usage: bool,
}

impl CliError {
    fn usage(msg: impl Into<String>) -> Self {
        Self {
            code: 1,
            msg: msg.into(),
            show_usage: true,
        }
    }

    fn from_driver(err: DriverError) -> Self {
        Self {
            code: err.code,
            msg: err.msg,
            show_usage: false,
        }
    }
}

fn usage_text() -> &'static str {
    "Usage: tyshc [flags] <script.tysh>\n\
     Flags:\n\
     \x20 -o, --out <file>  Write the compiled script to <file> (default: sibling .sh)\n\
     \x20 --check           Check syntax and semantics without writing output\n\
     \x20 --emit-ast        Print the source AST (debug)\n\
     \x20 --emit-ir         Print the target IR (debug)\n\
     \x20 -h, --help        Print help information\n\
     \x20 -V, --version     Print version information and exit"
}

fn main() {
    let args: Vec<String> = std::env::args().collect();

    let config = match parse_args(args) {
        Ok(c) => c,
        Err(e) => {
            eprintln!("{}", e.msg);
            if e.show_usage {
                eprintln!("{}", usage_text());
            }
            process::exit(e.code);
        }
    };

    if let Err(e) = compile(config) {
        eprintln!("{}", e.msg);
        if e.show_usage {
            eprintln!("{}", usage_text());
        }
        process::exit(e.code);
    }
}

fn parse_args(args: Vec<String>) -> Result<Config, CliError> {
    if args.len() < 2 {
        return Err(CliError::usage("error: missing input file"));
    }

    let mut filename: Option<String> = None;
    let mut options = CompileOptions::default();
    let mut check = false;
    let mut emit_ast = false;
    let mut emit_ir = false;

    let mut i = 1;
    while i < args.len() {
        let arg = &args[i];
        if arg == "-h" || arg == "--help" {
            println!("{}", usage_text());
            process::exit(0);
        } else if arg == "-V" || arg == "--version" {
            println!("tyshc {}", env!("CARGO_PKG_VERSION"));
            process::exit(0);
        } else if arg == "-o" || arg == "--out" {
            if i + 1 < args.len() {
                options.out_path = Some(PathBuf::from(&args[i + 1]));
                i += 2;
            } else {
                return Err(CliError::usage(format!("error: {} requires an argument", arg)));
            }
        } else if arg == "--check" {
            check = true;
            i += 1;
        } else if arg == "--emit-ast" {
            emit_ast = true;
            i += 1;
        } else if arg == "--emit-ir" {
            emit_ir = true;
            i += 1;
        } else if arg.starts_with('-') {
            return Err(CliError::usage(format!("error: Unexpected argument: {}", arg)));
        } else {
            if filename.is_some() {
                return Err(CliError::usage(format!(
                    "error: Unexpected argument: {} (script already specified)",
                    arg
                )));
            }
            filename = Some(arg.clone());
            i += 1;
        }
    }

    if (check as u8 + emit_ast as u8 + emit_ir as u8) > 1 {
        return Err(CliError::usage(
            "error: multiple action flags specified (choose only one of: --check, --emit-ast, --emit-ir)",
        ));
    }
    if check && options.out_path.is_some() {
        return Err(CliError::usage("error: --check cannot be used with --out"));
    }

    if check {
        options.mode = Mode::Check;
    } else if emit_ast {
        options.mode = Mode::EmitAst;
    } else if emit_ir {
        options.mode = Mode::EmitIr;
    }

    let filename = match filename {
        Some(f) => f,
        None => return Err(CliError::usage("error: missing input file")),
    };

    Ok(Config { filename, options })
}

fn compile(config: Config) -> Result<(), CliError> {
    let path = std::path::Path::new(&config.filename);
    let mode = config.options.mode;

    let result = driver::compile_file(path, config.options).map_err(CliError::from_driver)?;

    match mode {
        // Default mode writes the sibling file; nothing to print.
        Mode::Default => {}
        Mode::Check | Mode::EmitAst | Mode::EmitIr => println!("{}", result),
    }

    Ok(())
}
