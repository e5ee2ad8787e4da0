//! Router lifecycle
//!
//! # Lifecycle
//!
//! ```text
//! Router            (built, not listening)
//!   → mount()       initial redirect, attach listener, first navigation
//! MountedRouter     (listening)
//!   → unmount()/drop  listener detached; later changes are ignored
//! ```
//!
//! Navigation itself is [`Router::navigate`]: a synchronous step from a
//! [`HashLocation`] to the next [`NavigationState`]. Change events arrive one
//! at a time, so the step never runs reentrantly.

use std::cell::{Ref, RefCell};
use std::rc::Rc;

use crate::location::{LocationSource, Subscription};
use crate::matcher::{PathMatcher, RouteMatch};
use crate::navigation::{ActiveView, NavigationState, Transition};
use crate::projector::project;
use crate::route::{ConfigError, ViewsConfig};
use crate::types::ViewKey;
use crate::url::{parse_query, HashLocation};
use crate::view::{render_views, RenderedView, View};

type NotFoundHandler<V> = Box<dyn Fn() -> Option<V>>;
type Observer<V> = Box<dyn FnMut(&NavigationState<V>)>;

// =============================================================================
// Initial Redirect Policy
// =============================================================================

/// How a deep link is restored after the initial jump to the home path.
///
/// Only `Replace` leaves a single history entry after the two location
/// replacements; `Assign` keeps home one entry below the deep link.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum DeepLinkRestore {
    /// Push the deep link on top of home (home stays one step back)
    #[default]
    Assign,
    /// Overwrite home with the deep link (single history entry)
    Replace,
}

/// What [`normalize_initial_location`] did.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum InitialRedirect {
    /// No home path configured
    Disabled,
    /// Already at the home path
    AtHome,
    /// Replaced with the home path; the original path matched no route
    Home,
    /// Replaced with the home path, then the original path restored
    DeepLink(String),
}

/// Normalize the location once, before the router starts listening.
///
/// When a home path is set and the current path (pathname plus query) differs
/// from it, the current entry is replaced with home. If the original pathname
/// matches a route, the original path is then restored with `restore`. An
/// empty or unknown location lands on home while bookmarked deep links keep
/// working.
pub fn normalize_initial_location<V, L>(
    home_path: Option<&str>,
    config: &ViewsConfig<V>,
    restore: DeepLinkRestore,
    location: &L,
) -> InitialRedirect
where
    L: LocationSource + ?Sized,
{
    let Some(home_path) = home_path else {
        return InitialRedirect::Disabled;
    };

    let current = location.read();
    let path = current.path();
    if path == home_path {
        return InitialRedirect::AtHome;
    }

    location.replace(home_path);

    if PathMatcher::new(config).is_routable(&current.pathname) {
        match restore {
            DeepLinkRestore::Assign => location.assign(&path),
            DeepLinkRestore::Replace => location.replace(&path),
        }
        log::debug!("restored deep link '{path}' over home '{home_path}'");
        InitialRedirect::DeepLink(path)
    } else {
        log::debug!("redirected '{path}' to home '{home_path}'");
        InitialRedirect::Home
    }
}

// =============================================================================
// Router
// =============================================================================

/// Builder for [`Router`].
pub struct RouterBuilder<V> {
    config: ViewsConfig<V>,
    home_path: Option<String>,
    deep_link_restore: DeepLinkRestore,
    on_path_not_match: Option<NotFoundHandler<V>>,
}

impl<V> RouterBuilder<V> {
    pub fn home_path(mut self, home_path: impl Into<String>) -> Self {
        self.home_path = Some(home_path.into());
        self
    }

    pub fn deep_link_restore(mut self, restore: DeepLinkRestore) -> Self {
        self.deep_link_restore = restore;
        self
    }

    /// View to show when no route matches. Returning `None` leaves the
    /// current views in place.
    pub fn on_path_not_match(mut self, handler: impl Fn() -> Option<V> + 'static) -> Self {
        self.on_path_not_match = Some(Box::new(handler));
        self
    }

    pub fn build(self) -> Router<V> {
        let state = NavigationState::empty(self.config.slot_count());
        Router {
            config: self.config,
            home_path: self.home_path,
            deep_link_restore: self.deep_link_restore,
            on_path_not_match: self.on_path_not_match,
            state,
        }
    }
}

/// Hash-fragment router over a slot table.
pub struct Router<V> {
    config: ViewsConfig<V>,
    home_path: Option<String>,
    deep_link_restore: DeepLinkRestore,
    on_path_not_match: Option<NotFoundHandler<V>>,
    state: NavigationState<V>,
}

impl<V> Router<V> {
    pub fn builder(config: ViewsConfig<V>) -> RouterBuilder<V> {
        RouterBuilder {
            config,
            home_path: None,
            deep_link_restore: DeepLinkRestore::default(),
            on_path_not_match: None,
        }
    }

    pub fn new(config: ViewsConfig<V>) -> Self {
        Self::builder(config).build()
    }

    pub fn views_config(&self) -> &ViewsConfig<V> {
        &self.config
    }

    pub fn home_path(&self) -> Option<&str> {
        self.home_path.as_deref()
    }

    pub fn deep_link_restore(&self) -> DeepLinkRestore {
        self.deep_link_restore
    }

    pub fn state(&self) -> &NavigationState<V> {
        &self.state
    }

    pub fn render(&self) -> Vec<RenderedView<V::Output>>
    where
        V: View,
    {
        render_views(&self.state)
    }
}

impl<V: Clone> Router<V> {
    /// Navigate to `location`.
    ///
    /// Errors only on an inconsistent route table; an unknown path is not an
    /// error.
    pub fn navigate(&mut self, location: &HashLocation) -> Result<Transition, ConfigError> {
        let matched = PathMatcher::new(&self.config).match_path(&location.pathname);
        let Some(RouteMatch { route, url_params }) = matched else {
            return Ok(self.path_not_matched(location));
        };

        let position = project(&self.config, route)?;
        let definition = self
            .config
            .route(route)
            .ok_or(ConfigError::UnknownRoute(route))?;

        let active = ActiveView {
            key: ViewKey::Route(position),
            view: definition.view().clone(),
            url_params,
            query_params: parse_query(location.query_str()),
        };
        self.state = self.state.with_match(position, active);

        log::debug!(
            "'{}' matched route {} at slot {} index {}",
            location,
            route,
            position.slot,
            position.index
        );
        Ok(Transition::Matched(position))
    }

    fn path_not_matched(&mut self, location: &HashLocation) -> Transition {
        let Some(handler) = &self.on_path_not_match else {
            log::debug!("'{location}' matched no route; no not-found handler");
            return Transition::Unchanged;
        };

        match handler() {
            Some(view) => {
                log::debug!("'{location}' matched no route; showing not-found view");
                self.state = NavigationState::not_found(self.config.slot_count(), view);
                Transition::NotFound
            }
            None => {
                log::warn!("not-found handler produced no view for '{location}'");
                Transition::Unchanged
            }
        }
    }

    /// Start listening.
    ///
    /// Runs the initial redirect, attaches the change listener and navigates
    /// to the current location. `observer` is called after every navigation
    /// that changed the state.
    pub fn mount<L, F>(self, location: L, observer: F) -> Result<MountedRouter<V, L>, ConfigError>
    where
        V: 'static,
        L: LocationSource + Clone + 'static,
        F: FnMut(&NavigationState<V>) + 'static,
    {
        let initial_redirect = normalize_initial_location(
            self.home_path.as_deref(),
            &self.config,
            self.deep_link_restore,
            &location,
        );

        let router = Rc::new(RefCell::new(self));
        let observer: Observer<V> = Box::new(observer);
        let observer = Rc::new(RefCell::new(observer));

        let listener = {
            let router = Rc::clone(&router);
            let location = location.clone();
            let observer = Rc::clone(&observer);
            move || {
                if let Err(err) = on_location_changed(&router, &location, &observer) {
                    log::error!("route table is inconsistent: {err}");
                    panic!("route table is inconsistent: {err}");
                }
            }
        };
        let subscription = location.subscribe(Box::new(listener));

        // An error here drops the subscription and detaches the listener
        on_location_changed(&router, &location, &observer)?;

        Ok(MountedRouter {
            router,
            location,
            subscription,
            initial_redirect,
        })
    }
}

fn on_location_changed<V, L>(
    router: &RefCell<Router<V>>,
    location: &L,
    observer: &RefCell<Observer<V>>,
) -> Result<Transition, ConfigError>
where
    V: Clone,
    L: LocationSource,
{
    let current = location.read();
    let transition = router.borrow_mut().navigate(&current)?;
    if transition.changed() {
        let router = router.borrow();
        let mut observer = observer.borrow_mut();
        (*observer)(router.state());
    }
    Ok(transition)
}

// =============================================================================
// Mounted Router
// =============================================================================

/// A router attached to a location source.
///
/// Dropping it detaches the listener.
pub struct MountedRouter<V, L> {
    router: Rc<RefCell<Router<V>>>,
    location: L,
    subscription: Subscription,
    initial_redirect: InitialRedirect,
}

impl<V, L: LocationSource> MountedRouter<V, L> {
    pub fn state(&self) -> Ref<'_, NavigationState<V>> {
        Ref::map(self.router.borrow(), Router::state)
    }

    pub fn render(&self) -> Vec<RenderedView<V::Output>>
    where
        V: View,
    {
        self.router.borrow().render()
    }

    pub fn location(&self) -> &L {
        &self.location
    }

    pub fn initial_redirect(&self) -> &InitialRedirect {
        &self.initial_redirect
    }

    /// Push `path` as a new history entry; the listener picks it up.
    pub fn navigate(&self, path: &str) {
        self.location.assign(path);
    }

    /// Detach the listener.
    pub fn unmount(self) {
        self.subscription.unsubscribe();
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::location::{LocationCommand, MemoryLocation};
    use crate::route::RouteDefinition;
    use crate::types::{Params, SlotPosition};

    fn none() -> Vec<String> {
        Vec::new()
    }

    fn config() -> ViewsConfig<&'static str> {
        ViewsConfig::new(vec![
            vec![
                RouteDefinition::new("/home", none(), "home").unwrap(),
                RouteDefinition::new("/library(?:/([^/]*))?", ["type"], "library").unwrap(),
                RouteDefinition::new("/search", none(), "search").unwrap(),
            ],
            vec![RouteDefinition::new("/detail/([^/]*)/([^/]*)", ["type", "id"], "detail").unwrap()],
            vec![RouteDefinition::new("/player/([^/]*)", ["stream"], "player").unwrap()],
        ])
        .unwrap()
    }

    fn views(state: &NavigationState<&'static str>) -> Vec<&'static str> {
        state.active_views().map(|v| v.view).collect()
    }

    #[test]
    fn test_navigate_projects_slots() {
        let mut router = Router::new(config());

        let t = router.navigate(&HashLocation::parse("/library/movie?sort=year")).unwrap();
        assert_eq!(t, Transition::Matched(SlotPosition::new(0, 1)));
        let library = router.state().slot(0).unwrap().clone();
        assert_eq!(library.url_params, Params::from([("type", "movie")]));
        assert_eq!(library.query_params, Params::from([("sort", "year")]));

        router.navigate(&HashLocation::parse("/detail/movie/tt1")).unwrap();
        router.navigate(&HashLocation::parse("/player/abc")).unwrap();
        assert_eq!(views(router.state()), vec!["library", "detail", "player"]);
        // Untouched slots keep their exact entry
        assert_eq!(router.state().slot(0), Some(&library));

        router.navigate(&HashLocation::parse("/detail/series/tt2")).unwrap();
        assert_eq!(views(router.state()), vec!["library", "detail"]);
        assert_eq!(router.state().slot(1).unwrap().url_params.get("id"), Some("tt2"));

        router.navigate(&HashLocation::parse("/search")).unwrap();
        assert_eq!(views(router.state()), vec!["search"]);
    }

    #[test]
    fn test_navigate_keys_are_stable() {
        let mut router = Router::new(config());
        router.navigate(&HashLocation::parse("/library")).unwrap();
        router.navigate(&HashLocation::parse("/detail/movie/tt1")).unwrap();
        let before = router.state().slot(0).unwrap().key;

        router.navigate(&HashLocation::parse("/detail/movie/tt2")).unwrap();
        assert_eq!(router.state().slot(0).unwrap().key, before);
        assert_eq!(
            router.state().slot(1).unwrap().key,
            ViewKey::Route(SlotPosition::new(1, 0))
        );
    }

    #[test]
    fn test_not_found_without_handler_is_noop() {
        let mut router = Router::new(config());
        router.navigate(&HashLocation::parse("/library")).unwrap();
        let before = router.state().clone();

        let t = router.navigate(&HashLocation::parse("/nowhere")).unwrap();
        assert_eq!(t, Transition::Unchanged);
        assert_eq!(*router.state(), before);
    }

    #[test]
    fn test_not_found_handler() {
        let mut router = Router::builder(config())
            .on_path_not_match(|| Some("not-found"))
            .build();
        router.navigate(&HashLocation::parse("/library")).unwrap();
        router.navigate(&HashLocation::parse("/detail/movie/tt1")).unwrap();

        let t = router.navigate(&HashLocation::parse("/nowhere?x=1")).unwrap();
        assert_eq!(t, Transition::NotFound);
        assert_eq!(views(router.state()), vec!["not-found"]);
        let entry = router.state().slot(0).unwrap();
        assert_eq!(entry.key, ViewKey::NotFound);
        assert!(entry.query_params.is_empty());
        assert_eq!(router.state().slot_count(), 3);
    }

    #[test]
    fn test_not_found_handler_without_view_is_noop() {
        let mut router = Router::builder(config()).on_path_not_match(|| None).build();
        router.navigate(&HashLocation::parse("/search")).unwrap();

        let t = router.navigate(&HashLocation::parse("/nowhere")).unwrap();
        assert_eq!(t, Transition::Unchanged);
        assert_eq!(views(router.state()), vec!["search"]);
    }

    #[test]
    fn test_initial_redirect_restores_deep_link() {
        let location = MemoryLocation::new("#/library");
        let redirect =
            normalize_initial_location(Some("/home"), &config(), DeepLinkRestore::Assign, &location);

        assert_eq!(redirect, InitialRedirect::DeepLink("/library".to_string()));
        assert_eq!(
            location.commands(),
            vec![
                LocationCommand::Replace("/home".to_string()),
                LocationCommand::Assign("/library".to_string()),
            ]
        );
        assert_eq!(location.current(), "/library");
        assert_eq!(location.history_len(), 2);
    }

    #[test]
    fn test_initial_redirect_replace_policy_keeps_one_entry() {
        let location = MemoryLocation::new("#/library?type=movie");
        let redirect =
            normalize_initial_location(Some("/home"), &config(), DeepLinkRestore::Replace, &location);

        assert_eq!(redirect, InitialRedirect::DeepLink("/library?type=movie".to_string()));
        assert_eq!(
            location.commands(),
            vec![
                LocationCommand::Replace("/home".to_string()),
                LocationCommand::Replace("/library?type=movie".to_string()),
            ]
        );
        assert_eq!(location.current(), "/library?type=movie");
        assert_eq!(location.history_len(), 1);
    }

    #[test]
    fn test_initial_redirect_to_home() {
        for start in ["", "#", "#/nowhere"] {
            let location = MemoryLocation::new(start);
            let redirect =
                normalize_initial_location(Some("/home"), &config(), DeepLinkRestore::Assign, &location);
            assert_eq!(redirect, InitialRedirect::Home);
            assert_eq!(location.commands(), vec![LocationCommand::Replace("/home".to_string())]);
            assert_eq!(location.current(), "/home");
        }
    }

    #[test]
    fn test_initial_redirect_at_home_or_disabled() {
        let location = MemoryLocation::new("#/home");
        let redirect =
            normalize_initial_location(Some("/home"), &config(), DeepLinkRestore::Assign, &location);
        assert_eq!(redirect, InitialRedirect::AtHome);
        assert!(location.commands().is_empty());

        let location = MemoryLocation::new("#/nowhere");
        let redirect = normalize_initial_location(None, &config(), DeepLinkRestore::Assign, &location);
        assert_eq!(redirect, InitialRedirect::Disabled);
        assert!(location.commands().is_empty());
    }

    #[test]
    fn test_initial_redirect_compares_full_path() {
        // Home with a different query is still not home
        let location = MemoryLocation::new("#/home?tab=2");
        let redirect =
            normalize_initial_location(Some("/home"), &config(), DeepLinkRestore::Assign, &location);
        assert_eq!(redirect, InitialRedirect::DeepLink("/home?tab=2".to_string()));
        assert_eq!(location.current(), "/home?tab=2");
    }

    #[test]
    fn test_mount_listens_and_renders() {
        let location = MemoryLocation::new("#/library");
        let renders = Rc::new(RefCell::new(Vec::new()));
        let sink = Rc::clone(&renders);

        let mounted = Router::builder(config())
            .home_path("/home")
            .build()
            .mount(location.clone(), move |state| sink.borrow_mut().push(views(state)))
            .unwrap();

        assert_eq!(
            mounted.initial_redirect(),
            &InitialRedirect::DeepLink("/library".to_string())
        );
        // The first navigation runs synchronously on the final location
        assert_eq!(views(&mounted.state()), vec!["library"]);

        // Queued redirect events re-deliver the same location
        location.dispatch_pending();
        assert_eq!(views(&mounted.state()), vec!["library"]);

        mounted.navigate("/detail/movie/tt1");
        location.dispatch_pending();
        assert_eq!(views(&mounted.state()), vec!["library", "detail"]);

        assert!(location.back());
        location.dispatch_pending();
        assert_eq!(views(&mounted.state()), vec!["library"]);

        assert_eq!(renders.borrow().first(), Some(&vec!["library"]));
        assert_eq!(renders.borrow().last(), Some(&vec!["library"]));
    }

    #[test]
    fn test_observer_skips_unchanged_navigations() {
        let location = MemoryLocation::new("#/search");
        let calls = Rc::new(RefCell::new(0));
        let counter = Rc::clone(&calls);

        let _mounted = Router::new(config())
            .mount(location.clone(), move |_| *counter.borrow_mut() += 1)
            .unwrap();
        assert_eq!(*calls.borrow(), 1);

        location.assign("/nowhere");
        location.dispatch_pending();
        assert_eq!(*calls.borrow(), 1);
    }

    #[test]
    fn test_unmount_detaches_listener() {
        let location = MemoryLocation::new("#/search");
        let calls = Rc::new(RefCell::new(0));
        let counter = Rc::clone(&calls);
        let mounted = Router::new(config())
            .mount(location.clone(), move |_| *counter.borrow_mut() += 1)
            .unwrap();
        assert_eq!(location.listener_count(), 1);
        assert_eq!(*calls.borrow(), 1);

        mounted.unmount();
        assert_eq!(location.listener_count(), 0);

        location.assign("/library");
        assert_eq!(location.dispatch_pending(), 1);
        assert_eq!(*calls.borrow(), 1);
    }

    #[test]
    fn test_default_restore_keeps_home_below_deep_link() {
        assert_eq!(DeepLinkRestore::default(), DeepLinkRestore::Assign);

        let location = MemoryLocation::new("#/library");
        let mounted = Router::builder(config())
            .home_path("/home")
            .build()
            .mount(location.clone(), |_| {})
            .unwrap();
        assert_eq!(
            mounted.initial_redirect(),
            &InitialRedirect::DeepLink("/library".to_string())
        );
        assert_eq!(location.history_len(), 2);
        assert!(location.back());
        assert_eq!(location.current(), "/home");
    }

    #[test]
    fn test_drop_detaches_listener() {
        let location = MemoryLocation::new("#/search");
        {
            let _mounted = Router::new(config()).mount(location.clone(), |_| {}).unwrap();
            assert_eq!(location.listener_count(), 1);
        }
        assert_eq!(location.listener_count(), 0);
    }
}
