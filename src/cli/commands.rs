//! Command dispatch

use std::io;
use std::path::Path;

use clap::CommandFactory;
use tokio::io::{AsyncBufReadExt, BufReader};
use tracing::{debug, instrument};

use crate::application::services::CatalogService;
use crate::application::{ApplicationError, Event, Intent, Session};
use crate::cli::args::{Cli, Commands, ConfigCommands};
use crate::cli::render::render_forest;
use crate::cli::{output, CliError, CliResult};
use crate::config::{global_config_path, local_config_path, Settings};
use crate::domain::{checked_variable_ids, find_node, CollectionSummary};
use crate::exitcode;
use crate::infrastructure::di::ServiceContainer;
use crate::infrastructure::InfraError;

/// Run the parsed command line; returns the process exit code.
pub async fn execute_command(cli: &Cli) -> CliResult<i32> {
    let project_dir = match &cli.project_dir {
        Some(dir) => dir.clone(),
        None => std::env::current_dir()
            .map_err(|e| InfraError::io("determine current directory", e))?,
    };
    let mut settings = Settings::load(Some(&project_dir))?;
    if let Some(store) = &cli.store {
        settings.store_path = store.clone();
    }
    debug!("settings: {:?}", settings);

    match &cli.command {
        Some(Commands::Collections) => collections(settings).await,
        Some(Commands::Tree { collection, query }) => {
            tree(settings, collection.as_deref(), query.as_deref()).await
        }
        Some(Commands::Swap {
            collection,
            to,
            paths,
            ids,
            dry_run,
        }) => swap(settings, collection, to, paths, ids, *dry_run).await,
        Some(Commands::Serve { write }) => serve(settings, *write).await,
        Some(Commands::Config { command }) => config(&settings, command, &project_dir),
        Some(Commands::Completion { shell }) => {
            let mut cmd = Cli::command();
            clap_complete::generate(*shell, &mut cmd, "vartree", &mut io::stdout());
            Ok(exitcode::OK)
        }
        None => Err(CliError::Usage(
            "no command given, see --help".to_string(),
        )),
    }
}

/// Find a collection by id, falling back to name.
async fn resolve_collection(
    catalog: &CatalogService,
    wanted: &str,
) -> CliResult<CollectionSummary> {
    let collections = catalog.list_collections().await?;
    collections
        .iter()
        .find(|c| c.id == wanted)
        .or_else(|| collections.iter().find(|c| c.name == wanted))
        .cloned()
        .ok_or_else(|| {
            ApplicationError::NotFound {
                kind: "collection",
                id: wanted.to_string(),
            }
            .into()
        })
}

#[instrument(skip(settings))]
async fn collections(settings: Settings) -> CliResult<i32> {
    let (container, _) = ServiceContainer::load(settings)?;
    let collections = container.catalog.list_collections().await?;
    if collections.is_empty() {
        output::warning("no collections in store");
        return Ok(exitcode::OK);
    }
    for c in collections {
        let modes: Vec<&str> = c.modes.iter().map(|m| m.name.as_str()).collect();
        output::header(&format!("{} ({})", c.name, c.id));
        output::detail(&format!("{} variable(s)", c.variable_count));
        output::detail(&format!("modes: {}", modes.join(", ")));
    }
    Ok(exitcode::OK)
}

#[instrument(skip(settings))]
async fn tree(settings: Settings, collection: Option<&str>, query: Option<&str>) -> CliResult<i32> {
    let (container, _) = ServiceContainer::load(settings)?;
    let coordinator = container.coordinator();
    let mut session = Session::new();

    let mut events = match collection {
        Some(wanted) => {
            let target = resolve_collection(&container.catalog, wanted).await?;
            coordinator
                .handle(
                    &mut session,
                    Intent::SelectCollection {
                        collection_id: target.id,
                    },
                )
                .await
        }
        None => coordinator.handle(&mut session, Intent::Init).await,
    };
    if let Some(query) = query {
        events.extend(
            coordinator
                .handle(
                    &mut session,
                    Intent::Search {
                        query: query.to_string(),
                    },
                )
                .await,
        );
    }
    if let Some(Event::Error { message }) = events.iter().find(|e| matches!(e, Event::Error { .. }))
    {
        output::error(message);
        return Ok(exitcode::SOFTWARE);
    }

    let Some(current) = session.current_collection_id.clone() else {
        output::warning("no collections in store");
        return Ok(exitcode::OK);
    };
    let title = session.collection_name(&current).unwrap_or(&current).to_string();
    output::info(&render_forest(&title, &session.view));
    Ok(exitcode::OK)
}

#[instrument(skip(settings))]
async fn swap(
    settings: Settings,
    source: &str,
    target: &str,
    paths: &[String],
    ids: &[String],
    dry_run: bool,
) -> CliResult<i32> {
    let store_path = settings.store_path.clone();
    let (container, store) = ServiceContainer::load(settings)?;
    let coordinator = container.coordinator();
    let mut session = Session::new();

    let source = resolve_collection(&container.catalog, source).await?;
    let target = resolve_collection(&container.catalog, target).await?;
    session.collections = container.catalog.list_collections().await?;
    coordinator
        .handle(
            &mut session,
            Intent::SelectCollection {
                collection_id: source.id.clone(),
            },
        )
        .await;

    for path in paths {
        if find_node(&session.tree, path).is_none() {
            return Err(CliError::InvalidArgs(format!(
                "no group or variable '{}' in '{}'",
                path, source.name
            )));
        }
        coordinator
            .handle(
                &mut session,
                Intent::CheckNode {
                    node_id: path.clone(),
                    checked: true,
                },
            )
            .await;
    }
    let mut variable_ids = checked_variable_ids(&session.tree);
    variable_ids.extend(ids.iter().cloned());

    let events = coordinator
        .handle(
            &mut session,
            Intent::SwapCollection {
                variable_ids,
                target_collection_id: target.id.clone(),
            },
        )
        .await;

    let mut code = exitcode::OK;
    let mut moved = false;
    for event in &events {
        match event {
            Event::Error { message } => {
                code = exitcode::PARTIAL;
                for line in message.split("; ") {
                    output::failure(line);
                }
            }
            Event::Success { message } => {
                moved = true;
                output::success(message);
            }
            Event::InitData { .. } | Event::TreeData { .. } => {}
        }
    }

    if moved && !dry_run {
        store.save(&store_path)?;
        output::success_detail(&format!("saved {}", store_path.display()));
    }
    Ok(code)
}

#[instrument(skip(settings))]
async fn serve(settings: Settings, write: bool) -> CliResult<i32> {
    let store_path = settings.store_path.clone();
    let (container, store) = ServiceContainer::load(settings)?;
    let coordinator = container.coordinator();
    let mut session = Session::new();

    let mut lines = BufReader::new(tokio::io::stdin()).lines();
    while let Some(line) = lines
        .next_line()
        .await
        .map_err(|e| InfraError::io("read intent", e))?
    {
        if line.trim().is_empty() {
            continue;
        }
        for event in coordinator.handle_raw(&mut session, &line).await {
            output::info(&event.to_json()?);
        }
    }

    if write {
        store.save(&store_path)?;
    }
    Ok(exitcode::OK)
}

fn config(settings: &Settings, command: &ConfigCommands, project_dir: &Path) -> CliResult<i32> {
    match command {
        ConfigCommands::Show => output::info(&settings.to_toml()?),
        ConfigCommands::Path => {
            match global_config_path() {
                Some(path) => output::action("global", &path.display()),
                None => output::warning("no global config directory on this platform"),
            }
            output::action("local", &local_config_path(project_dir).display());
        }
    }
    Ok(exitcode::OK)
}
