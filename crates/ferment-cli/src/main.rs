mod common;

use std::fs::File;
use std::io::{self, BufReader, Read};
use std::path::{Path, PathBuf};
use std::process::ExitCode;

use clap::{Parser, ValueEnum};
use ferment_lexer::Lexer;
use ferment_parser::Parser as FermentParser;
use ferment_syntax::token::TokenKind;
use owo_colors::OwoColorize;

use common::render_error;

#[derive(Parser, Debug)]
#[command(name = "ferment", about = "Parse a Ferment program and print its syntax tree")]
struct Cli {
    /// Source file to parse. Reads standard input when omitted or `-`.
    file: Option<PathBuf>,

    /// What to print for a successfully parsed program
    #[arg(short = 'e', long = "emit", value_enum, default_value_t = Emit::Source)]
    emit: Emit,
}

#[derive(Clone, Copy, Debug, PartialEq, Eq, ValueEnum)]
enum Emit {
    /// Canonical source rendering of the tree
    Source,
    /// One token per line: `line:col<TAB>kind<TAB>lexeme`
    Tokens,
    /// The tree as pretty-printed JSON
    Json,
}

fn init_logging() {
    let _ = tracing_subscriber::fmt()
        .with_env_filter(
            tracing_subscriber::EnvFilter::try_from_default_env()
                .unwrap_or_else(|_| tracing_subscriber::EnvFilter::new("warn")),
        )
        .with_writer(io::stderr)
        .try_init();
}

fn fail(msg: String) -> ExitCode {
    eprintln!("{}: {}", "error".red().bold(), msg.red());
    ExitCode::FAILURE
}

fn open_source(file: Option<&Path>) -> Result<Box<dyn Read>, String> {
    match file {
        None => Ok(Box::new(io::stdin())),
        Some(p) if p == Path::new("-") => Ok(Box::new(io::stdin())),
        Some(p) => {
            if !p.exists() {
                return Err(format!("File not found: {}", p.display()));
            }
            let file = File::open(p).map_err(|e| format!("Failed to read {}: {}", p.display(), e))?;
            Ok(Box::new(file))
        }
    }
}

/// Keeps a copy of every byte the lexer pulls, so diagnostics can quote
/// source lines once the streaming parse is done.
struct Echo<'a, R> {
    inner: R,
    seen: &'a mut Vec<u8>,
}

impl<R: Read> Read for Echo<'_, R> {
    fn read(&mut self, buf: &mut [u8]) -> io::Result<usize> {
        let n = self.inner.read(buf)?;
        self.seen.extend_from_slice(&buf[..n]);
        Ok(n)
    }
}

fn emit_tokens(input: impl Read) -> ExitCode {
    let mut lexer = Lexer::new(BufReader::new(input));
    loop {
        let tk = match lexer.next_token() {
            Ok(t) => t,
            Err(e) => return fail(e.to_string()),
        };
        if tk.is(TokenKind::Eof) {
            return ExitCode::SUCCESS;
        }
        println!("{}:{}\t{}\t{}", tk.pos.line, tk.pos.col, tk.kind, tk.lexeme);
    }
}

fn emit_tree(input: impl Read, emit: Emit) -> ExitCode {
    let mut seen = Vec::new();
    let echo = Echo {
        inner: input,
        seen: &mut seen,
    };
    let mut parser = match FermentParser::new(Lexer::new(BufReader::new(echo))) {
        Ok(p) => p,
        Err(e) => return fail(e.to_string()),
    };
    let program = match parser.parse_program() {
        Ok(p) => p,
        Err(e) => return fail(e.to_string()),
    };
    let errors = parser.into_errors();

    if !errors.is_empty() {
        let src = String::from_utf8_lossy(&seen);
        for err in &errors {
            render_error("Parse error", &src, err);
        }
        return ExitCode::FAILURE;
    }

    match emit {
        Emit::Json => match serde_json::to_string_pretty(&program) {
            Ok(json) => println!("{}", json),
            Err(e) => return fail(format!("Failed to serialize tree: {}", e)),
        },
        _ => print!("{}", program),
    }
    ExitCode::SUCCESS
}

fn main() -> ExitCode {
    init_logging();
    let cli = Cli::parse();

    let input = match open_source(cli.file.as_deref()) {
        Ok(r) => r,
        Err(msg) => return fail(msg),
    };

    match cli.emit {
        Emit::Tokens => emit_tokens(input),
        Emit::Source | Emit::Json => emit_tree(input, cli.emit),
    }
}
