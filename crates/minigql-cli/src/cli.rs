use std::net::SocketAddr;
use std::path::PathBuf;

use clap::{Args, Parser, Subcommand};
use minigql_catalog::ServiceKind;

#[derive(Parser)]
#[command(
    name = "minigql",
    about = "Minimal GraphQL server over demo tutorial and post data",
    version
)]
pub struct Cli {
    #[command(subcommand)]
    pub command: Command,

    /// Log at debug level unless RUST_LOG says otherwise
    #[arg(short, long, global = true)]
    pub verbose: bool,
}

#[derive(Subcommand)]
pub enum Command {
    /// Start the HTTP server
    Serve(ServeArgs),
    /// Run one GraphQL document against freshly seeded data
    Query(QueryArgs),
    /// Write the mock records to the JSON collection
    Seed(SeedArgs),
    /// Print the schema as SDL
    Schema(SchemaArgs),
}

#[derive(Args)]
pub struct ServeArgs {
    /// TOML configuration file
    #[arg(short, long)]
    pub config: Option<PathBuf>,
    #[arg(short, long)]
    pub bind: Option<SocketAddr>,
    #[arg(short, long)]
    pub service: Option<ServiceKind>,
    /// Keep collections as JSON files under this directory
    #[arg(long)]
    pub data_dir: Option<PathBuf>,
    /// Hydrate from the existing collection instead of reseeding it
    #[arg(long)]
    pub no_seed: bool,
    /// Do not serve the GraphiQL page
    #[arg(long)]
    pub no_graphiql: bool,
}

#[derive(Args)]
pub struct QueryArgs {
    /// Document text, or `-` to read it from stdin
    pub document: String,
    #[arg(short, long, default_value = "tutorials")]
    pub service: ServiceKind,
    /// Variables as a JSON object
    #[arg(long)]
    pub variables: Option<String>,
    #[arg(short, long)]
    pub operation: Option<String>,
}

#[derive(Args)]
pub struct SeedArgs {
    #[arg(short, long, default_value = "data")]
    pub data_dir: PathBuf,
    #[arg(short, long, default_value = "tutorials")]
    pub service: ServiceKind,
}

#[derive(Args)]
pub struct SchemaArgs {
    #[arg(short, long, default_value = "tutorials")]
    pub service: ServiceKind,
}
