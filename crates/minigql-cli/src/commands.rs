use std::io::Read;

use anyhow::Context;
use colored::Colorize;
use minigql_catalog::{open_service, seed_collection, ServiceOptions};
use minigql_server::{MiniGqlServer, ServerConfig};
use minigql_types::{Request, Value};

use crate::cli::*;

pub fn run_command(cli: Cli) -> anyhow::Result<()> {
    match cli.command {
        Command::Serve(args) => cmd_serve(args),
        Command::Query(args) => cmd_query(args),
        Command::Seed(args) => cmd_seed(args),
        Command::Schema(args) => cmd_schema(args),
    }
}

fn cmd_serve(args: ServeArgs) -> anyhow::Result<()> {
    let mut config = match &args.config {
        Some(path) => ServerConfig::load(path)?,
        None => ServerConfig::default(),
    };
    if let Some(bind) = args.bind {
        config.bind_addr = bind;
    }
    if let Some(service) = args.service {
        config.service = service;
    }
    if args.data_dir.is_some() {
        config.data_dir = args.data_dir;
    }
    if args.no_seed {
        config.seed_on_start = false;
    }
    if args.no_graphiql {
        config.graphiql = false;
    }

    let server = MiniGqlServer::new(config)?;
    let addr = server.config().bind_addr;
    println!(
        "{} Serving {} ({} records) on {}",
        "✓".green().bold(),
        server.service().kind().to_string().cyan(),
        server.service().record_count(),
        format!("http://{addr}/graphql").bold()
    );
    if server.config().graphiql {
        println!("  GraphiQL: {}", format!("http://{addr}/").blue());
    }

    let runtime = tokio::runtime::Runtime::new()?;
    runtime.block_on(server.serve())?;
    Ok(())
}

fn cmd_query(args: QueryArgs) -> anyhow::Result<()> {
    let document = if args.document == "-" {
        let mut text = String::new();
        std::io::stdin()
            .read_to_string(&mut text)
            .context("reading document from stdin")?;
        text
    } else {
        args.document
    };

    let mut request = Request::new(document);
    if let Some(raw) = &args.variables {
        match serde_json::from_str::<Value>(raw).context("parsing --variables")? {
            Value::Object(vars) => request = request.with_variables(vars),
            _ => anyhow::bail!("--variables must be a JSON object"),
        }
    }
    if let Some(name) = args.operation {
        request = request.with_operation_name(name);
    }

    let service = open_service(&ServiceOptions::in_memory(args.service))?;
    let response = service.execute(&request);
    println!("{}", serde_json::to_string_pretty(&response)?);
    for error in &response.errors {
        let at = error.path_string();
        if at.is_empty() {
            eprintln!("{} {}", "error:".red().bold(), error.message);
        } else {
            eprintln!("{} {} (at {})", "error:".red().bold(), error.message, at.yellow());
        }
    }
    Ok(())
}

fn cmd_seed(args: SeedArgs) -> anyhow::Result<()> {
    let count = seed_collection(args.service, &args.data_dir)?;
    println!(
        "{} Seeded {} {} records into {}",
        "✓".green().bold(),
        count,
        args.service.to_string().cyan(),
        args.data_dir.join(args.service.database()).display()
    );
    Ok(())
}

fn cmd_schema(args: SchemaArgs) -> anyhow::Result<()> {
    let service = open_service(&ServiceOptions {
        seed: false,
        ..ServiceOptions::in_memory(args.service)
    })?;
    print!("{}", service.sdl());
    Ok(())
}
