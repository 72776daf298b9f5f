use std::{net::TcpListener, path::Path};

use actix_files::NamedFile;
use actix_web::{
    HttpRequest, HttpResponse, Result as ActixResult,
    dev::Server,
    error::{ErrorInternalServerError, ErrorNotFound},
    web,
};
use anyhow::Context;
use tokio::fs;

use crate::{
    bundle::{Resolution, StaticBundle},
    config::LaunchConfig,
    status::build_app_scope,
};

#[derive(Clone)]
pub struct AppState {
    pub bundle: StaticBundle,
    pub debug: bool,
}

/// A bound, not-yet-running server instance. Built once per process
/// from a `LaunchConfig`; everything that can fail before serving
/// fails inside `build`, so callers can report initialization errors
/// before any banner or browser task.
pub struct Application {
    server: Server,
    host: String,
    port: u16,
    state: AppState,
}

impl std::fmt::Debug for Application {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("Application")
            .field("host", &self.host)
            .field("port", &self.port)
            .finish_non_exhaustive()
    }
}

impl Application {
    pub async fn build(config: &LaunchConfig) -> anyhow::Result<Self> {
        let bundle = StaticBundle::locate(config.static_dir.as_deref())?;

        if config.debug {
            println!(
                "[jardesigner] frontend bundle resolved to {}",
                bundle.root().display()
            );
        }

        let listener = TcpListener::bind((config.host.as_str(), config.port))
            .with_context(|| format!("failed to bind to {}:{}", config.host, config.port))?;
        let port = listener
            .local_addr()
            .context("failed to read the bound address")?
            .port();

        let state = AppState {
            bundle,
            debug: config.debug,
        };

        let server = run(listener, state.clone())?;

        Ok(Self {
            server,
            host: config.host.clone(),
            port,
            state,
        })
    }

    pub fn port(&self) -> u16 {
        self.port
    }

    pub fn bundle_dir(&self) -> &Path {
        self.state.bundle.root()
    }

    pub fn debug(&self) -> bool {
        self.state.debug
    }

    pub fn primary_url(&self) -> String {
        format!("http://{}:{}", self.host, self.port)
    }

    /// Blocks until the server stops. actix's default signal handling
    /// turns Ctrl+C into a graceful stop and an `Ok(())` return; any
    /// `Err` is a serving failure.
    pub async fn run_until_stopped(self) -> std::io::Result<()> {
        self.server.await
    }
}

fn run(listener: TcpListener, state: AppState) -> anyhow::Result<Server> {
    let shared_state = web::Data::new(state);

    let server = actix_web::HttpServer::new(move || {
        actix_web::App::new()
            .app_data(shared_state.clone())
            .service(build_app_scope())
            .service(web::resource("/{tail:.*}").route(web::to(serve_bundle)))
    })
    .listen(listener)?
    .run();

    Ok(server)
}

/// Catch-all handler over the frontend bundle: real files are served
/// as-is, unknown extensionless paths get the entry document so the
/// client-side router can take over.
async fn serve_bundle(
    req: HttpRequest,
    tail: web::Path<String>,
    state: web::Data<AppState>,
) -> ActixResult<HttpResponse> {
    match state.bundle.resolve(tail.as_str()).await {
        Resolution::Asset(path) => {
            let file = NamedFile::open_async(&path)
                .await
                .map_err(|_| ErrorNotFound("Not Found"))?;
            Ok(file.into_response(&req))
        }
        Resolution::EntryDocument => serve_entry_document(&state).await,
        Resolution::NotFound => Err(ErrorNotFound("Not Found")),
    }
}

async fn serve_entry_document(state: &AppState) -> ActixResult<HttpResponse> {
    let entry = state.bundle.entry_file();
    let body = fs::read_to_string(&entry).await.map_err(|error| {
        ErrorInternalServerError(format!(
            "frontend entry file {} is unreadable ({error}); rebuild the frontend",
            entry.display()
        ))
    })?;

    Ok(HttpResponse::Ok()
        .append_header(("Cache-Control", "no-cache, no-store, must-revalidate"))
        .content_type("text/html; charset=utf-8")
        .body(body))
}
