use std::env;
use std::path::PathBuf;

use anyhow::{bail, Result};
use sqlish::db::Database;
use sqlish::repl::Repl;

fn main() {
    env_logger::init();

    if let Err(e) = run() {
        eprintln!("Error: {:#}", e);
        std::process::exit(1);
    }
}

fn run() -> Result<()> {
    let args: Vec<String> = env::args().collect();

    let mut db_path: Option<PathBuf> = None;

    for arg in &args[1..] {
        match arg.as_str() {
            "--help" | "-h" => {
                print_usage();
                return Ok(());
            }
            "--version" | "-v" => {
                println!("sqlish {}", env!("CARGO_PKG_VERSION"));
                return Ok(());
            }
            arg if arg.starts_with('-') => {
                bail!("Unknown option: {}", arg);
            }
            path => {
                if db_path.is_some() {
                    bail!("Multiple database paths specified");
                }
                db_path = Some(PathBuf::from(path));
            }
        }
    }

    let db = Database::open(db_path.as_deref())?;

    let mut repl = Repl::new(db)?;
    repl.run()?;

    Ok(())
}

fn print_usage() {
    println!("sqlish - interactive SQLite shell");
    println!();
    println!("USAGE:");
    println!("    sqlish [OPTIONS] [DATABASE_PATH]");
    println!();
    println!("ARGS:");
    println!("    <DATABASE_PATH>    SQLite database file (created if missing);");
    println!("                       omit for a transient in-memory database");
    println!();
    println!("OPTIONS:");
    println!("    -h, --help         Print help information");
    println!("    -v, --version      Print version information");
    println!();
    println!("EXAMPLES:");
    println!("    sqlish                 Start with an in-memory database");
    println!("    sqlish ./app.sqlite    Open or create ./app.sqlite");
}
