use super::view_state::ViewState;

/// View type tag of views the preview pass operates on.
pub const MARKDOWN_VIEW: &str = "markdown";

/// An open, host-managed document surface.
///
/// The controller reads and writes view state but never creates or
/// destroys views.
pub trait DocumentView {
    /// Type tag of this view (e.g. [`MARKDOWN_VIEW`]).
    fn view_type(&self) -> &str;

    /// Current serialized state.
    fn view_state(&self) -> ViewState;

    /// Replace the view's state.
    fn set_view_state(&mut self, state: ViewState);
}

/// The host's collection of open views.
pub trait Workspace {
    /// All open views whose type tag equals `view_type`.
    fn views_of_type<'a>(&'a mut self, view_type: &str) -> Vec<&'a mut dyn DocumentView>;

    /// Number of open views of `view_type`.
    fn count_of_type(&mut self, view_type: &str) -> usize {
        self.views_of_type(view_type).len()
    }
}

impl<V: DocumentView> Workspace for Vec<V> {
    fn views_of_type<'a>(&'a mut self, view_type: &str) -> Vec<&'a mut dyn DocumentView> {
        self.iter_mut()
            .filter(|view| view.view_type() == view_type)
            .map(|view| view as &mut dyn DocumentView)
            .collect()
    }
}
