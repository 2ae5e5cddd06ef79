//! Reader - fetch, transform, mount and keep the docs page alive
//!
//! One `Reader` shows one page at a time. `load` fetches through the
//! storage API and renders; a load that resolves after a newer one started
//! is dropped on the floor. Rendering runs the pre-render steps on the raw
//! markup, mounts the result into the shadow root, then runs the
//! post-render steps against the mounted document.

use parking_lot::{Mutex, RwLock};
use std::sync::atomic::{AtomicU64, Ordering};
use std::sync::Arc;
use techdocs_dom::utils::{remove_style_property, set_style_property};
use techdocs_dom::{Document, DomArena, DomEvent, EventKind, NodeId};
use tokio::sync::broadcast;
use url::Url;

use crate::api::{EntityName, TechDocsStorageApi};
use crate::config::ReaderConfig;
use crate::error::{Result, StorageError};
use crate::events::{EventBus, ReaderEvent};
use crate::host::Host;
use crate::pipeline::{transform, Steps, Transformer};
use crate::shadow::ShadowRoot;
use crate::sidebar::{position_sidebars, sidebar_top, SidebarTracker, WeakSidebarTracker};
use crate::theme::reader_css;
use crate::transformers::mkdocs::{NAV_TITLE_CLASS, SIDEBAR_CLASS};
use crate::transformers::{
    AddBaseUrl, AddLinkClickListener, DomCallback, InjectCss, LinkClickHandler, OnCssReady,
    RemoveMkdocsHeader, RewriteDocLinks, SanitizeDom, ScrollToHash, SimplifyMkdocsFooter,
};

/// Status shown when the storage error carries none
pub const NOT_FOUND_STATUS: u16 = 404;

/// Page identity: a fetch for any other key is stale
#[derive(Debug, Clone, PartialEq, Eq, Hash)]
pub struct DocsKey {
    pub entity: EntityName,
    pub path: String,
}

impl DocsKey {
    pub fn new(entity: EntityName, path: impl Into<String>) -> Self {
        Self {
            entity,
            path: path.into(),
        }
    }
}

#[derive(Debug, Clone, PartialEq)]
pub enum ReaderState {
    Idle,
    Loading,
    Loaded,
    Failed(StorageError),
}

#[derive(Debug, Clone, PartialEq)]
pub enum LoadOutcome {
    /// Fetched, transformed and mounted
    Rendered,
    /// Fetched, but the pre-render pipeline produced nothing
    NotReady,
    Failed(StorageError),
    /// A newer load started before this one resolved
    Superseded,
}

/// What the embedding app should show
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum ReaderView {
    Progress,
    NotFound { status_code: u16, error_message: String },
    Content,
}

pub type ReadyCallback = Arc<dyn Fn() + Send + Sync>;

#[derive(Debug, Clone, PartialEq)]
struct LoadTicket {
    generation: u64,
    key: DocsKey,
}

pub struct Reader {
    api: Arc<dyn TechDocsStorageApi>,
    host: Arc<dyn Host>,
    config: ReaderConfig,
    shadow_root: ShadowRoot,
    sidebars: SidebarTracker,
    state: RwLock<ReaderState>,
    desired: Mutex<Option<LoadTicket>>,
    generation: AtomicU64,
    events: EventBus,
    on_ready: Option<ReadyCallback>,
    extra_post_render: Vec<Arc<dyn Transformer>>,
}

/// Caller-supplied post-render step, shared across renders
struct SharedStep(Arc<dyn Transformer>);

impl Transformer for SharedStep {
    fn name(&self) -> &str {
        self.0.name()
    }

    fn transform(&self, dom: Document) -> Option<Document> {
        self.0.transform(dom)
    }
}

impl Reader {
    pub fn new(api: Arc<dyn TechDocsStorageApi>, host: Arc<dyn Host>, config: ReaderConfig) -> Self {
        let shadow_root = ShadowRoot::new();
        let sidebars = SidebarTracker::new(Arc::clone(&host), shadow_root.clone());
        Self {
            api,
            host,
            config,
            shadow_root,
            sidebars,
            state: RwLock::new(ReaderState::Idle),
            desired: Mutex::new(None),
            generation: AtomicU64::new(0),
            events: EventBus::new(),
            on_ready: None,
            extra_post_render: Vec::new(),
        }
    }

    /// Called every time a fetched page is about to render
    pub fn with_on_ready(mut self, on_ready: ReadyCallback) -> Self {
        self.on_ready = Some(on_ready);
        self
    }

    /// Run `step` against the mounted document after the built-in
    /// post-render steps
    pub fn with_post_render_step(mut self, step: Arc<dyn Transformer>) -> Self {
        self.extra_post_render.push(step);
        self
    }

    /// Fetch and render one page
    pub async fn load(&self, entity: EntityName, path: impl Into<String>) -> LoadOutcome {
        let key = DocsKey::new(entity, path);
        let ticket = LoadTicket {
            generation: self.generation.fetch_add(1, Ordering::SeqCst) + 1,
            key: key.clone(),
        };
        *self.desired.lock() = Some(ticket.clone());
        *self.state.write() = ReaderState::Loading;

        tracing::info!("[Reader] loading {} /{}", key.entity, key.path);
        self.events.publish(ReaderEvent::LoadStarted {
            entity: key.entity.clone(),
            path: key.path.clone(),
        });

        let fetched = self.api.get_entity_docs(&key.entity, &key.path).await;

        if !self.is_desired(&ticket) {
            tracing::debug!("[Reader] discarding stale result for {} /{}", key.entity, key.path);
            self.events.publish(ReaderEvent::LoadSuperseded {
                entity: key.entity,
                path: key.path,
            });
            return LoadOutcome::Superseded;
        }

        match fetched {
            Ok(markup) => {
                *self.state.write() = ReaderState::Loaded;
                self.events.publish(ReaderEvent::LoadSucceeded {
                    entity: key.entity.clone(),
                    path: key.path.clone(),
                });
                if self.render(&key, &markup) {
                    LoadOutcome::Rendered
                } else {
                    LoadOutcome::NotReady
                }
            }
            Err(err) => {
                tracing::warn!("[Reader] failed to load {} /{}: {}", key.entity, key.path, err);
                *self.state.write() = ReaderState::Failed(err.clone());
                self.events.publish(ReaderEvent::LoadFailed {
                    entity: key.entity,
                    path: key.path,
                    message: err.to_string(),
                });
                LoadOutcome::Failed(err)
            }
        }
    }

    fn is_desired(&self, ticket: &LoadTicket) -> bool {
        self.desired.lock().as_ref() == Some(ticket)
    }

    /// Transform `markup` and mount it. Returns false when the pre-render
    /// pipeline halted; the shadow root is left as it was.
    pub fn render(&self, key: &DocsKey, markup: &str) -> bool {
        if let Some(on_ready) = &self.on_ready {
            on_ready();
        }

        let Some(document) = transform(markup, &self.pre_render_steps(key)) else {
            tracing::debug!("[Reader] pre-render produced nothing for {}", key.entity);
            return false;
        };

        self.shadow_root.clear();
        self.shadow_root.mount(document);
        // fresh mount, fresh listeners
        self.sidebars.set_sidebars(Vec::new());

        let steps = self.post_render_steps();
        self.shadow_root.update(|mounted| {
            let fallback = mounted.clone();
            Some(transform(mounted, &steps).unwrap_or_else(|| {
                tracing::warn!("[Reader] post-render halted, keeping pre-render document");
                fallback
            }))
        });

        tracing::info!("[Reader] rendered {} /{}", key.entity, key.path);
        self.events.publish(ReaderEvent::Rendered {
            entity: key.entity.clone(),
            path: key.path.clone(),
        });
        true
    }

    /// Steps applied to fetched markup before mount
    pub fn pre_render_steps(&self, key: &DocsKey) -> Steps {
        vec![
            Box::new(SanitizeDom::new()),
            Box::new(AddBaseUrl::new(
                Arc::clone(&self.api),
                key.entity.clone(),
                key.path.clone(),
            )),
            Box::new(RewriteDocLinks::new(self.host.location())),
            Box::new(RemoveMkdocsHeader),
            Box::new(SimplifyMkdocsFooter),
            Box::new(InjectCss::new(reader_css(&self.config.theme))),
        ]
    }

    /// Steps applied to the mounted document
    pub fn post_render_steps(&self) -> Steps {
        let mut steps: Steps = vec![
            Box::new(ScrollToHash::new(
                Arc::clone(&self.host),
                self.shadow_root.clone(),
                self.config.scroll_to_hash_delay(),
            )),
            Box::new(
                AddLinkClickListener::new(self.app_base_url(), self.link_click_handler())
                    .resolve_against(self.host.location()),
            ),
            Box::new(OnCssReady::new(
                self.storage_origin(),
                hide_until_loaded(),
                on_css_loaded(Arc::clone(&self.host), self.sidebars.downgrade()),
            )),
        ];
        for step in &self.extra_post_render {
            steps.push(Box::new(SharedStep(Arc::clone(step))));
        }
        steps
    }

    fn app_base_url(&self) -> Url {
        self.config
            .app_base_url
            .clone()
            .unwrap_or_else(|| self.host.location())
    }

    fn storage_origin(&self) -> String {
        self.config
            .storage_origin
            .clone()
            .unwrap_or_else(|| self.api.api_origin())
    }

    fn link_click_handler(&self) -> LinkClickHandler {
        let host = Arc::clone(&self.host);
        let events = self.events.clone();

        Arc::new(move |arena: &DomArena, _event: &DomEvent, url: &Url| {
            host.scroll_to_top();

            let fragment = url.fragment().filter(|f| !f.is_empty());
            match fragment {
                Some(fragment) => host.push_state(&format!("{}#{}", url.path(), fragment)),
                None => host.navigate(url.path()),
            }
            events.publish(ReaderEvent::Navigated {
                url: url.to_string(),
            });

            if let Some(target) = fragment.and_then(|f| arena.find_by_id(f)) {
                host.scroll_into_view(target);
            }
        })
    }

    /// Route a click into the mounted document
    pub fn dispatch_click(&self, target: NodeId) -> Result<DomEvent> {
        self.shadow_root.dispatch(target, EventKind::Click)
    }

    /// Report that a stylesheet of the mounted document finished loading
    pub fn stylesheet_loaded(&self, target: NodeId) -> Result<DomEvent> {
        let event = self.shadow_root.dispatch(target, EventKind::Load)?;
        self.sidebars.update_position();
        Ok(event)
    }

    pub fn update_sidebar_position(&self) {
        self.sidebars.update_position();
    }

    /// Tear down: forget the desired page, remove window listeners and
    /// empty the shadow root
    pub fn unmount(&self) {
        *self.desired.lock() = None;
        self.sidebars.detach();
        self.shadow_root.clear();
        *self.state.write() = ReaderState::Idle;
        tracing::debug!("[Reader] unmounted");
        self.events.publish(ReaderEvent::Unmounted);
    }

    pub fn view(&self) -> ReaderView {
        match &*self.state.read() {
            ReaderState::Idle | ReaderState::Loading => ReaderView::Progress,
            ReaderState::Loaded => ReaderView::Content,
            ReaderState::Failed(err) => ReaderView::NotFound {
                status_code: err.status_code().unwrap_or(NOT_FOUND_STATUS),
                error_message: err.to_string(),
            },
        }
    }

    pub fn state(&self) -> ReaderState {
        self.state.read().clone()
    }

    pub fn shadow_root(&self) -> &ShadowRoot {
        &self.shadow_root
    }

    pub fn sidebars(&self) -> Vec<NodeId> {
        self.sidebars.sidebars()
    }

    pub fn events(&self) -> &EventBus {
        &self.events
    }

    pub fn subscribe(&self) -> broadcast::Receiver<ReaderEvent> {
        self.events.subscribe()
    }
}

impl Drop for Reader {
    fn drop(&mut self) {
        self.sidebars.detach();
        self.shadow_root.clear();
    }
}

fn hide_until_loaded() -> DomCallback {
    Arc::new(|arena: &mut DomArena, root: NodeId| {
        if let Ok(node) = arena.get_mut(root) {
            set_style_property(node, "opacity", "0");
        }
    })
}

fn on_css_loaded(host: Arc<dyn Host>, tracker: WeakSidebarTracker) -> DomCallback {
    Arc::new(move |arena: &mut DomArena, root: NodeId| {
        if let Ok(node) = arena.get_mut(root) {
            remove_style_property(node, "opacity");
        }

        // stop MkDocs drawer toggling through the label's checkbox
        let nav_title = arena.find_one_in(root, |node| node.is_element() && node.has_class(NAV_TITLE_CLASS));
        if let Some(node) = nav_title.and_then(|id| arena.get_mut(id).ok()) {
            node.remove_attr("for");
        }

        let sidebars = arena.find_by_class(SIDEBAR_CLASS);
        position_sidebars(arena, &sidebars, &sidebar_top(host.shadow_host_top()));
        if let Some(tracker) = tracker.upgrade() {
            tracker.set_sidebars(sidebars);
        }
    })
}
