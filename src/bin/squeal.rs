use std::io::Read;
use std::process::ExitCode;

use clap::Parser as ClapParser;
use colored::Colorize;

use squeal::prelude::*;

#[derive(ClapParser)]
#[command(
    name = "squeal",
    version,
    about = "Parse a query and print its canonical form"
)]
struct Cli {
    /// Query text; read from stdin when omitted
    query: Option<String>,

    /// Print the token stream instead of the canonical text
    #[arg(long)]
    tokens: bool,

    /// Keep whitespace tokens in the stream (implies --tokens)
    #[arg(long)]
    whitespace: bool,

    /// Print the syntax tree as JSON instead of the canonical text
    #[arg(long, conflicts_with = "tokens")]
    ast: bool,
}

fn main() -> ExitCode {
    let cli = Cli::parse();
    let query = match read_query(&cli) {
        Ok(q) => q,
        Err(e) => {
            eprintln!("{} {e}", "error:".red().bold());
            return ExitCode::FAILURE;
        }
    };
    match run(&cli, &query) {
        Ok(out) => {
            println!("{out}");
            ExitCode::SUCCESS
        }
        Err(e) => {
            eprintln!("{} {e}", "error:".red().bold());
            ExitCode::FAILURE
        }
    }
}

fn read_query(cli: &Cli) -> Result<String, std::io::Error> {
    match &cli.query {
        Some(q) => Ok(q.clone()),
        None => {
            let mut buf = String::new();
            std::io::stdin().read_to_string(&mut buf)?;
            Ok(buf)
        }
    }
}

fn run(cli: &Cli, query: &str) -> Result<String, String> {
    if cli.tokens || cli.whitespace {
        let opts = TokenizeOptions {
            preserve_whitespace: cli.whitespace,
        };
        let tokens = tokenize(query, &opts).map_err(|e| e.to_string())?;
        let lines: Vec<String> = tokens
            .iter()
            .map(|t| format!("{:>4}  {:<20} {:?}", t.line, t.kind.name(), t.text))
            .collect();
        return Ok(lines.join("\n"));
    }
    let stmt = parse(query).map_err(|e| e.to_string())?;
    if cli.ast {
        serde_json::to_string_pretty(&stmt).map_err(|e| e.to_string())
    } else {
        Ok(stmt.to_string())
    }
}
