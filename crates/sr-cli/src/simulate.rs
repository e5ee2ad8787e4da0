use serde::Serialize;

use sr_compiler::CompiledRoutes;
use sr_core::{
    project, HashLocation, InitialRedirect, MemoryLocation, PathMatcher, Params, RenderedView, ViewKey,
};

use crate::table::{NamedView, ViewRender};

// =============================================================================
// Match
// =============================================================================

#[derive(Debug, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct MatchReport {
    pub fragment: String,
    pub pathname: String,
    pub view: Option<String>,
    pub key: ViewKey,
    pub url_params: Params,
    pub query_params: Params,
}

pub fn match_fragment(compiled: &CompiledRoutes<NamedView>, fragment: &str) -> Result<MatchReport, String> {
    let location = HashLocation::parse(fragment);
    let query_params = sr_core::parse_query(location.query_str());

    let Some(matched) = PathMatcher::new(&compiled.views).match_path(&location.pathname) else {
        return Ok(MatchReport {
            fragment: fragment.to_string(),
            pathname: location.pathname,
            view: compiled.not_found.as_ref().map(|view| view.0.clone()),
            key: ViewKey::NotFound,
            url_params: Params::new(),
            query_params,
        });
    };

    let position = project(&compiled.views, matched.route).map_err(|e| e.to_string())?;
    let view = compiled
        .views
        .route(matched.route)
        .map(|route| route.view().0.clone());

    Ok(MatchReport {
        fragment: fragment.to_string(),
        pathname: location.pathname,
        view,
        key: ViewKey::Route(position),
        url_params: matched.url_params,
        query_params,
    })
}

// =============================================================================
// Simulate
// =============================================================================

#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Step {
    Navigate(String),
    Back,
    Forward,
}

impl Step {
    pub fn parse(arg: &str) -> Self {
        match arg {
            ":back" => Self::Back,
            ":forward" => Self::Forward,
            path => Self::Navigate(path.to_string()),
        }
    }

    fn label(&self) -> String {
        match self {
            Self::Navigate(path) => path.clone(),
            Self::Back => ":back".to_string(),
            Self::Forward => ":forward".to_string(),
        }
    }
}

#[derive(Debug, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct StepReport {
    pub step: String,
    pub location: String,
    pub history_len: usize,
    pub views: Vec<RenderedView<ViewRender>>,
}

/// Mount a router on an in-memory location and replay `steps`.
///
/// The first report describes the state right after mounting.
pub fn simulate(
    compiled: CompiledRoutes<NamedView>,
    initial: &str,
    steps: &[Step],
) -> Result<(InitialRedirect, Vec<StepReport>), String> {
    let location = MemoryLocation::new(initial);
    let mounted = compiled
        .into_router()
        .mount(location.clone(), |_| {})
        .map_err(|e| format!("Failed to mount router: {}", e))?;
    location.dispatch_pending();

    let snapshot = |step: String| StepReport {
        step,
        location: location.current(),
        history_len: location.history_len(),
        views: mounted.render(),
    };

    let mut reports = vec![snapshot(":mount".to_string())];
    for step in steps {
        match step {
            Step::Navigate(path) => mounted.navigate(path),
            Step::Back => {
                if !location.back() {
                    log::warn!("already at the first history entry");
                }
            }
            Step::Forward => {
                if !location.forward() {
                    log::warn!("already at the last history entry");
                }
            }
        }
        location.dispatch_pending();
        reports.push(snapshot(step.label()));
    }

    let redirect = mounted.initial_redirect().clone();
    mounted.unmount();
    Ok((redirect, reports))
}

pub fn describe_redirect(redirect: &InitialRedirect) -> String {
    match redirect {
        InitialRedirect::Disabled => "no home path".to_string(),
        InitialRedirect::AtHome => "started at home".to_string(),
        InitialRedirect::Home => "redirected to home".to_string(),
        InitialRedirect::DeepLink(path) => format!("restored deep link '{path}'"),
    }
}
