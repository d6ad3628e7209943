//! Assembly of a runnable service: store, collection, schema.

use std::fmt;
use std::path::{Path, PathBuf};
use std::str::FromStr;
use std::sync::Arc;

use minigql_exec::Executor;
use minigql_schema::{Schema, SchemaResult};
use minigql_store::{
    hydrate, seed, Collection, InMemoryRecordStore, JsonFileCollection, MemoryCollection, Record,
    RecordStore,
};
use minigql_types::{Request, Response};
use serde::{Deserialize, Serialize};
use tracing::{debug, info};

use crate::error::{CatalogError, CatalogResult};
use crate::{post, tutorial};

/// Which demo dataset a service exposes.
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum ServiceKind {
    #[default]
    Tutorials,
    Posts,
}

impl ServiceKind {
    pub fn name(self) -> &'static str {
        match self {
            Self::Tutorials => "tutorials",
            Self::Posts => "posts",
        }
    }

    /// Database the service's collection is stored under.
    pub fn database(self) -> &'static str {
        match self {
            Self::Tutorials => tutorial::DATABASE,
            Self::Posts => post::DATABASE,
        }
    }
}

impl fmt::Display for ServiceKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.name())
    }
}

impl FromStr for ServiceKind {
    type Err = CatalogError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.to_ascii_lowercase().as_str() {
            "tutorials" | "tutorial" => Ok(Self::Tutorials),
            "posts" | "post" => Ok(Self::Posts),
            _ => Err(CatalogError::UnknownService(s.to_string())),
        }
    }
}

/// How to open a service.
#[derive(Clone, Debug, Default)]
pub struct ServiceOptions {
    pub kind: ServiceKind,
    /// Root of the JSON file collections. `None` keeps everything in memory.
    pub data_dir: Option<PathBuf>,
    /// Wipe the collection and insert the mock records before hydrating.
    pub seed: bool,
}

impl ServiceOptions {
    pub fn in_memory(kind: ServiceKind) -> Self {
        Self {
            kind,
            data_dir: None,
            seed: true,
        }
    }
}

/// What the HTTP layer and the CLI talk to.
pub trait GraphQlService: Send + Sync {
    fn kind(&self) -> ServiceKind;

    fn execute(&self, request: &Request) -> Response;

    /// The schema rendered as SDL.
    fn sdl(&self) -> String;

    fn record_count(&self) -> usize;
}

/// A schema bound to the record store its resolvers read.
pub struct Service<R: Record> {
    kind: ServiceKind,
    schema: Schema<Arc<dyn RecordStore<R>>>,
    store: Arc<dyn RecordStore<R>>,
}

impl<R: Record> Service<R> {
    pub fn new(
        kind: ServiceKind,
        schema: Schema<Arc<dyn RecordStore<R>>>,
        store: Arc<dyn RecordStore<R>>,
    ) -> Self {
        Self {
            kind,
            schema,
            store,
        }
    }
}

impl<R: Record> GraphQlService for Service<R> {
    fn kind(&self) -> ServiceKind {
        self.kind
    }

    fn execute(&self, request: &Request) -> Response {
        debug!(
            service = %self.kind,
            operation = request.operation_name.as_deref().unwrap_or(""),
            "executing request"
        );
        Executor::new(&self.schema).execute(&self.store, request)
    }

    fn sdl(&self) -> String {
        self.schema.sdl()
    }

    fn record_count(&self) -> usize {
        self.store.len().unwrap_or(0)
    }
}

impl<R: Record> fmt::Debug for Service<R> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("Service")
            .field("kind", &self.kind)
            .field("collection", &R::COLLECTION)
            .finish()
    }
}

/// Open the service described by `options`.
pub fn open_service(options: &ServiceOptions) -> CatalogResult<Arc<dyn GraphQlService>> {
    let service: Arc<dyn GraphQlService> = match options.kind {
        ServiceKind::Tutorials => Arc::new(open::<tutorial::Tutorial>(
            options,
            tutorial::mock_tutorials(),
            tutorial::schema,
        )?),
        ServiceKind::Posts => {
            Arc::new(open::<post::Post>(options, post::mock_posts(), post::schema)?)
        }
    };
    Ok(service)
}

fn open<R: Record>(
    options: &ServiceOptions,
    mocks: Vec<R>,
    build_schema: fn() -> SchemaResult<Schema<Arc<dyn RecordStore<R>>>>,
) -> CatalogResult<Service<R>> {
    let collection = open_collection::<R>(options)?;
    if options.seed {
        seed(collection.as_ref(), &mocks)?;
    }

    let store: Arc<dyn RecordStore<R>> = Arc::new(InMemoryRecordStore::new());
    let loaded = hydrate(store.as_ref(), collection.as_ref())?;
    info!(service = %options.kind, collection = R::COLLECTION, records = loaded, "service ready");

    Ok(Service::new(options.kind, build_schema()?, store))
}

fn open_collection<R: Record>(options: &ServiceOptions) -> CatalogResult<Box<dyn Collection<R>>> {
    let collection: Box<dyn Collection<R>> = match &options.data_dir {
        Some(dir) => Box::new(JsonFileCollection::<R>::open(dir, options.kind.database())?),
        None => Box::new(MemoryCollection::<R>::new()),
    };
    Ok(collection)
}

/// Seed the service's collection under `data_dir` without opening a store.
///
/// Returns the number of records written.
pub fn seed_collection(kind: ServiceKind, data_dir: &Path) -> CatalogResult<usize> {
    match kind {
        ServiceKind::Tutorials => {
            seed_file::<tutorial::Tutorial>(data_dir, kind, &tutorial::mock_tutorials())
        }
        ServiceKind::Posts => seed_file::<post::Post>(data_dir, kind, &post::mock_posts()),
    }
}

fn seed_file<R: Record>(data_dir: &Path, kind: ServiceKind, mocks: &[R]) -> CatalogResult<usize> {
    let collection = JsonFileCollection::<R>::open(data_dir, kind.database())?;
    Ok(seed(&collection, mocks)?)
}
