//! Intent dispatch
//!
//! Turns inbound intents into tree recomputation or store migration and
//! answers with the events the presentation layer should receive.

use std::sync::Arc;

use itertools::Itertools;
use tracing::{debug, error, instrument, warn};

use crate::application::protocol::{Event, Intent};
use crate::application::services::{BatchReport, CatalogService, MigrationService};
use crate::application::session::Session;
use crate::application::{ApplicationError, ApplicationResult};
use crate::domain::{CollectionSummary, TreeBuilder};

pub struct Coordinator {
    catalog: Arc<CatalogService>,
    migration: Arc<MigrationService>,
    builder: TreeBuilder,
    /// Collection id or name preferred by `init`
    default_collection: Option<String>,
}

impl Coordinator {
    pub fn new(
        catalog: Arc<CatalogService>,
        migration: Arc<MigrationService>,
        builder: TreeBuilder,
        default_collection: Option<String>,
    ) -> Self {
        Self {
            catalog,
            migration,
            builder,
            default_collection,
        }
    }

    /// Decode and handle one raw message. Undecodable messages are logged
    /// and produce no events.
    pub async fn handle_raw(&self, session: &mut Session, raw: &str) -> Vec<Event> {
        match Intent::from_json(raw) {
            Ok(intent) => self.handle(session, intent).await,
            Err(e) => {
                warn!("ignoring message: {}", e);
                Vec::new()
            }
        }
    }

    /// Handle one intent. Failures are reported as an `error` event.
    #[instrument(level = "debug", skip(self, session))]
    pub async fn handle(&self, session: &mut Session, intent: Intent) -> Vec<Event> {
        let result = match intent {
            Intent::Init => self.init(session).await,
            Intent::SelectCollection { collection_id } => self
                .select_collection(session, &collection_id)
                .await
                .map(|e| vec![e]),
            Intent::Search { query } => {
                session.search(&query);
                Ok(vec![tree_data(session)])
            }
            Intent::ToggleGroup { path } => {
                session.toggle(&path);
                Ok(vec![tree_data(session)])
            }
            Intent::CheckNode { node_id, checked } => {
                session.set_checked(&node_id, checked);
                Ok(vec![tree_data(session)])
            }
            Intent::SwapCollection {
                variable_ids,
                target_collection_id,
            } => {
                self.swap(session, &variable_ids, &target_collection_id)
                    .await
            }
            Intent::Unknown => {
                warn!("ignoring unknown intent");
                Ok(Vec::new())
            }
        };

        result.unwrap_or_else(|e| {
            error!("intent failed: {}", e);
            vec![Event::error(e.to_string())]
        })
    }

    async fn init(&self, session: &mut Session) -> ApplicationResult<Vec<Event>> {
        session.collections = self.catalog.list_collections().await?;
        let default_collection_id = self.default_collection_id(&session.collections);
        debug!("init: default collection {:?}", default_collection_id);

        let mut events = vec![Event::InitData {
            collections: session.collections.clone(),
            default_collection_id: default_collection_id.clone(),
        }];
        if let Some(id) = default_collection_id {
            events.push(self.select_collection(session, &id).await?);
        }
        Ok(events)
    }

    fn default_collection_id(&self, collections: &[CollectionSummary]) -> Option<String> {
        let preferred = self.default_collection.as_deref().and_then(|wanted| {
            collections
                .iter()
                .find(|c| c.id == wanted || c.name == wanted)
        });
        preferred.or_else(|| collections.first()).map(|c| c.id.clone())
    }

    /// Re-read a collection and rebuild its tree from scratch.
    async fn select_collection(
        &self,
        session: &mut Session,
        collection_id: &str,
    ) -> ApplicationResult<Event> {
        let variables = self.catalog.list_variables(collection_id).await?;
        let built = self.builder.build(&variables);
        if !built.skipped.is_empty() {
            warn!(
                "collection {}: {} variable(s) left out of the tree",
                collection_id,
                built.skipped.len()
            );
        }
        session.load(collection_id, variables, built.forest);
        Ok(tree_data(session))
    }

    async fn swap(
        &self,
        session: &mut Session,
        variable_ids: &[String],
        target_collection_id: &str,
    ) -> ApplicationResult<Vec<Event>> {
        if variable_ids.is_empty() {
            return Err(ApplicationError::EmptySelection);
        }
        let source = session
            .current_collection_id
            .clone()
            .ok_or(ApplicationError::NoCollectionSelected)?;

        let report = self
            .migration
            .batch_move(variable_ids, &source, target_collection_id)
            .await;

        let mut events = Vec::new();
        if !report.failed.is_empty() {
            events.push(Event::error(failure_notice(&report)));
        }
        if !report.succeeded.is_empty() {
            let target = session
                .collection_name(target_collection_id)
                .unwrap_or(target_collection_id);
            events.push(Event::success(format!(
                "Moved {} variable(s) to '{}'",
                report.succeeded.len(),
                target
            )));
            // The store has changed already; a failed reload must not
            // swallow the notices above.
            match self.reload(session, &source).await {
                Ok(event) => events.push(event),
                Err(e) => {
                    error!("reload after swap failed: {}", e);
                    events.push(Event::error(format!(
                        "Variables were moved but the view could not be reloaded: {}",
                        e
                    )));
                }
            }
        }
        Ok(events)
    }

    async fn reload(&self, session: &mut Session, collection_id: &str) -> ApplicationResult<Event> {
        session.collections = self.catalog.list_collections().await?;
        self.select_collection(session, collection_id).await
    }
}

fn tree_data(session: &Session) -> Event {
    Event::TreeData {
        tree: session.view.clone(),
        variables: session.variables.clone(),
    }
}

/// One message naming every failed item and why.
fn failure_notice(report: &BatchReport) -> String {
    format!(
        "Failed to move {} variable(s): {}",
        report.failed.len(),
        report
            .failed
            .iter()
            .map(|f| format!("{}: {}", f.id, f.reason))
            .join("; ")
    )
}
