//! View capability and rendering

use std::rc::Rc;

use crate::navigation::NavigationState;
use crate::types::{QueryParams, UrlParams, ViewKey};

/// Something a route can render.
///
/// A view receives only its URL params and query params.
pub trait View {
    type Output;

    fn render(&self, url_params: &UrlParams, query_params: &QueryParams) -> Self::Output;
}

impl<T: View + ?Sized> View for Rc<T> {
    type Output = T::Output;

    fn render(&self, url_params: &UrlParams, query_params: &QueryParams) -> Self::Output {
        (**self).render(url_params, query_params)
    }
}

/// One entry of the rendered view list.
#[derive(Debug, Clone, PartialEq)]
#[cfg_attr(feature = "serde", derive(serde::Serialize))]
pub struct RenderedView<O> {
    pub key: ViewKey,
    /// Only the top-most (last) active view is focused
    pub focused: bool,
    pub output: O,
}

/// Render the occupied slots in slot order.
pub fn render_views<V: View>(state: &NavigationState<V>) -> Vec<RenderedView<V::Output>> {
    let count = state.active_views().count();
    state
        .active_views()
        .enumerate()
        .map(|(i, active)| RenderedView {
            key: active.key,
            focused: i + 1 == count,
            output: active.view.render(&active.url_params, &active.query_params),
        })
        .collect()
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::navigation::ActiveView;
    use crate::types::{Params, SlotPosition};

    #[derive(Debug, Clone, PartialEq)]
    struct Label(&'static str);

    impl View for Label {
        type Output = String;

        fn render(&self, url_params: &UrlParams, query_params: &QueryParams) -> String {
            format!("{} {} {}", self.0, url_params, query_params)
        }
    }

    #[test]
    fn test_render_views_in_slot_order() {
        let state = NavigationState::empty(3)
            .with_match(
                SlotPosition::new(0, 2),
                ActiveView {
                    key: ViewKey::Route(SlotPosition::new(0, 2)),
                    view: Label("library"),
                    url_params: Params::from([("type", "movie")]),
                    query_params: Params::new(),
                },
            )
            .with_match(
                SlotPosition::new(2, 0),
                ActiveView {
                    key: ViewKey::Route(SlotPosition::new(2, 0)),
                    view: Label("addons"),
                    url_params: Params::new(),
                    query_params: Params::from([("search", "x")]),
                },
            );

        let rendered = render_views(&state);
        assert_eq!(rendered.len(), 2);
        assert_eq!(rendered[0].key.to_string(), "0.2");
        assert_eq!(rendered[0].output, "library {type: movie} {}");
        assert!(!rendered[0].focused);
        assert_eq!(rendered[1].key.to_string(), "2.0");
        assert_eq!(rendered[1].output, "addons {} {search: x}");
        assert!(rendered[1].focused);
    }

    #[test]
    fn test_render_shared_views() {
        let shared: Rc<dyn View<Output = String>> = Rc::new(Label("shared"));
        let state = NavigationState::not_found(2, shared);
        let rendered = render_views(&state);
        assert_eq!(rendered.len(), 1);
        assert_eq!(rendered[0].key, ViewKey::NotFound);
        assert_eq!(rendered[0].output, "shared {} {}");
        assert!(rendered[0].focused);
    }

    #[test]
    fn test_render_empty_state() {
        let state = NavigationState::<Label>::empty(2);
        assert!(render_views(&state).is_empty());
    }
}
