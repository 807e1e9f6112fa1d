use clap::{CommandFactory, Parser, Subcommand};
use clap_complete::{generate, Shell};
use owo_colors::OwoColorize;
use rill::diagnostic::render_diagnostics;
use rill::interpreter::{self, Interpreter, StdoutSink};
use std::io::{self, Read, Write};
use std::path::{Path, PathBuf};

/// Exit code for source that failed to lex or parse.
const EXIT_PARSE_ERROR: i32 = 65;
/// Exit code for a script that faulted at runtime.
const EXIT_RUNTIME_ERROR: i32 = 70;

#[derive(Parser, Debug)]
#[command(name = "rill")]
#[command(version = env!("CARGO_PKG_VERSION"))]
#[command(about = "Tree-walking interpreter for the rill scripting language", long_about = None)]
struct Args {
    #[arg(value_name = "SCRIPT")]
    script: Option<PathBuf>,

    #[arg(short = 'e', long = "eval", value_name = "SOURCE", conflicts_with = "script")]
    eval: Option<String>,

    #[arg(long = "color", value_name = "WHEN", default_value = "auto")]
    color: ColorChoice,

    #[arg(short = 'v', long = "verbose")]
    verbose: bool,

    #[command(subcommand)]
    command: Option<Commands>,
}

#[derive(Subcommand, Debug)]
enum Commands {
    Complete {
        #[arg(value_name = "SHELL")]
        shell: Shell,
    },
}

#[derive(Debug, Clone, Copy)]
enum ColorChoice {
    Auto,
    Always,
    Never,
}

impl std::str::FromStr for ColorChoice {
    type Err = String;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.to_lowercase().as_str() {
            "auto" => Ok(ColorChoice::Auto),
            "always" => Ok(ColorChoice::Always),
            "never" => Ok(ColorChoice::Never),
            _ => Err(format!("Invalid color choice: {}. Must be 'auto', 'always', or 'never'", s)),
        }
    }
}

struct AppConfig {
    color_enabled: bool,
    verbose: bool,
}

impl AppConfig {
    fn from_args(args: &Args) -> Self {
        let color_enabled = match args.color {
            ColorChoice::Always => true,
            ColorChoice::Never => false,
            ColorChoice::Auto => atty::is(atty::Stream::Stderr) && atty::is(atty::Stream::Stdout),
        };

        AppConfig {
            color_enabled,
            verbose: args.verbose,
        }
    }
}

fn main() {
    let args = Args::parse();

    if let Some(Commands::Complete { shell }) = args.command {
        generate_completions(shell);
        return;
    }

    let config = AppConfig::from_args(&args);

    verbose_log(&config, "Starting rill");

    if let Some(source) = &args.eval {
        verbose_log(&config, "Running source from command-line argument");
        let code = run_source(source, "eval", &config);
        std::process::exit(code);
    }

    if let Some(script) = &args.script {
        verbose_log(&config, &format!("Reading script from file: {}", script.display()));
        let source = match read_file(script) {
            Ok(s) => s,
            Err(e) => {
                error_message(&config, &e);
                std::process::exit(1);
            }
        };
        let file_name = script.display().to_string();
        let code = run_source(&source, &file_name, &config);
        std::process::exit(code);
    }

    if atty::is(atty::Stream::Stdin) {
        run_repl(&config);
    } else {
        verbose_log(&config, "Reading script from stdin");
        let mut buffer = String::new();
        if let Err(e) = io::stdin().read_to_string(&mut buffer) {
            error_message(&config, &format!("Failed to read from stdin: {}", e));
            std::process::exit(1);
        }
        let code = run_source(&buffer, "stdin", &config);
        std::process::exit(code);
    }
}

/// Run a whole script against a fresh interpreter. Parse diagnostics and
/// runtime faults both render with spans against `source`.
fn run_source(source: &str, file_name: &str, config: &AppConfig) -> i32 {
    let statements = match interpreter::parse(source) {
        Ok(statements) => statements,
        Err(diagnostics) => {
            let rendered = render_diagnostics(source, file_name, &diagnostics, config.color_enabled);
            eprint!("{}", rendered);
            return EXIT_PARSE_ERROR;
        }
    };

    verbose_log(config, &format!("Parsed {} top-level statements", statements.len()));

    let mut interpreter = Interpreter::new(StdoutSink);
    if let Err(fault) = interpreter.interpret(&statements) {
        let diagnostics = vec![fault.to_diagnostic()];
        let rendered = render_diagnostics(source, file_name, &diagnostics, config.color_enabled);
        eprint!("{}", rendered);
        return EXIT_RUNTIME_ERROR;
    }

    verbose_log(config, "Script finished");
    0
}

/// Line-at-a-time session sharing one interpreter, so bindings persist
/// between entries. Errors are reported and the session continues.
fn run_repl(config: &AppConfig) {
    if !config.verbose {
        println!("rill {}", env!("CARGO_PKG_VERSION"));
        println!("Type statements, 'exit' to leave.");
        println!();
    } else {
        verbose_log(config, "Entering interactive mode");
    }

    let mut interpreter = Interpreter::new(StdoutSink);

    loop {
        print!("rill> ");
        if io::stdout().flush().is_err() {
            break;
        }

        let mut line = String::new();
        match io::stdin().read_line(&mut line) {
            Ok(0) => break,
            Ok(_) => {
                let trimmed = line.trim();
                if trimmed.is_empty() {
                    continue;
                }
                if trimmed == "exit" || trimmed == "quit" {
                    break;
                }

                match interpreter::parse(trimmed) {
                    Ok(statements) => {
                        if let Err(fault) = interpreter.interpret(&statements) {
                            let diagnostics = vec![fault.to_diagnostic()];
                            let rendered = render_diagnostics(
                                trimmed,
                                "repl",
                                &diagnostics,
                                config.color_enabled,
                            );
                            eprint!("{}", rendered);
                        }
                    }
                    Err(diagnostics) => {
                        let rendered =
                            render_diagnostics(trimmed, "repl", &diagnostics, config.color_enabled);
                        eprint!("{}", rendered);
                    }
                }
            }
            Err(e) => {
                error_message(config, &format!("Error reading input: {}", e));
                break;
            }
        }
    }
}

fn generate_completions(shell: Shell) {
    let mut cmd = Args::command();
    let bin_name = cmd.get_name().to_string();
    generate(shell, &mut cmd, &bin_name, &mut io::stdout());
}

fn read_file(path: &Path) -> Result<String, String> {
    std::fs::read_to_string(path)
        .map_err(|e| format!("Failed to read {}: {}", path.display(), e))
}

fn verbose_log(config: &AppConfig, message: &str) {
    if config.verbose {
        eprintln!("[rill:debug] {}", message);
    }
}

fn error_message(config: &AppConfig, message: &str) {
    if config.color_enabled {
        eprintln!("{}", message.red().bold());
    } else {
        eprintln!("{}", message);
    }
}
