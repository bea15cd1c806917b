use std::{env, path::PathBuf, process};

use archigraph::{
    GraphError,
    backend::SqliteGraphBackend,
    cli::{handle_command, run_status},
    client::{BackendClient, CommandLineConfig},
    graph::SqliteGraph,
    logging::init_logging,
    strength::StrengthTable,
};
use tracing::warn;

fn main() {
    let args: Vec<String> = env::args().collect();
    if args.iter().any(|arg| arg == "--help" || arg == "-h") {
        println!("{}", CommandLineConfig::help());
        return;
    }
    let arg_refs: Vec<&str> = args.iter().map(|s| s.as_str()).collect();
    let config = match CommandLineConfig::from_args(&arg_refs) {
        Ok(cfg) => cfg,
        Err(err) => {
            eprintln!("error: {err}");
            process::exit(2);
        }
    };
    init_logging(config.verbose);

    let backend = match open_backend(&config) {
        Ok(b) => b,
        Err(err) => {
            eprintln!("{err}");
            process::exit(2);
        }
    };

    let client = BackendClient::with_table(backend, StrengthTable::archimate());
    match run_command(&client, &config) {
        Ok(output) => println!("{output}"),
        Err(err) => {
            eprintln!("command failed: {err}");
            process::exit(1);
        }
    }
}

fn open_backend(config: &CommandLineConfig) -> Result<SqliteGraphBackend, String> {
    match config.backend.as_str() {
        "sqlite" => {
            if config.database == "memory" {
                SqliteGraphBackend::in_memory().map_err(|e| e.to_string())
            } else {
                let path = PathBuf::from(&config.database);
                let graph = SqliteGraph::open(path).map_err(|e| e.to_string())?;
                Ok(SqliteGraphBackend::from_graph(graph))
            }
        }
        other => Err(format!("unsupported backend {other}")),
    }
}

fn run_command(
    client: &BackendClient<SqliteGraphBackend>,
    config: &CommandLineConfig,
) -> Result<String, GraphError> {
    match handle_command(client, &config.command, &config.command_args)? {
        Some(output) => Ok(output),
        None => {
            warn!(command = %config.command, "unknown command, defaulting to status");
            run_status(client)
        }
    }
}
