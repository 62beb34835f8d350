//! Menus, dropdowns and the image lightbox: things that close on an
//! outside click.

/// Open/closed state for one overlay identified by a scope id.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Dismissible {
    scope: String,
    open: bool,
}

impl Dismissible {
    pub fn new(scope: impl Into<String>) -> Self {
        Self {
            scope: scope.into(),
            open: false,
        }
    }

    pub fn scope(&self) -> &str {
        &self.scope
    }

    pub fn is_open(&self) -> bool {
        self.open
    }

    pub fn open(&mut self) {
        self.open = true;
    }

    pub fn close(&mut self) {
        self.open = false;
    }

    pub fn toggle(&mut self) {
        self.open = !self.open;
    }

    /// `path` lists the scope ids from the click target up to the root.
    /// Returns whether this click closed the overlay.
    pub fn handle_click<S: AsRef<str>>(&mut self, path: &[S]) -> bool {
        if !self.open || path.iter().any(|s| s.as_ref() == self.scope) {
            return false;
        }
        self.open = false;
        true
    }
}

/// Full-size view of one gallery image.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ImageViewer {
    overlay: Dismissible,
    active: Option<String>,
}

impl ImageViewer {
    pub fn new(scope: impl Into<String>) -> Self {
        Self {
            overlay: Dismissible::new(scope),
            active: None,
        }
    }

    /// Empty sources are ignored.
    pub fn open(&mut self, src: impl Into<String>) {
        let src = src.into();
        if src.is_empty() {
            return;
        }
        self.active = Some(src);
        self.overlay.open();
    }

    pub fn close(&mut self) {
        self.active = None;
        self.overlay.close();
    }

    pub fn active(&self) -> Option<&str> {
        self.active.as_deref()
    }

    pub fn handle_click<S: AsRef<str>>(&mut self, path: &[S]) -> bool {
        let closed = self.overlay.handle_click(path);
        if closed {
            self.active = None;
        }
        closed
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_outside_click_closes() {
        let mut menu = Dismissible::new("genre-menu");
        menu.open();
        assert!(menu.handle_click(&["card-grid", "page", "root"]));
        assert!(!menu.is_open());
    }

    #[test]
    fn test_inside_click_keeps_open() {
        let mut menu = Dismissible::new("genre-menu");
        menu.toggle();
        assert!(!menu.handle_click(&["genre-option", "genre-menu", "root"]));
        assert!(menu.is_open());
    }

    #[test]
    fn test_click_on_closed_overlay_is_noop() {
        let mut menu = Dismissible::new("search");
        assert!(!menu.handle_click(&["root"]));
        menu.toggle();
        menu.toggle();
        assert!(!menu.is_open());
    }

    #[test]
    fn test_image_viewer() {
        let mut viewer = ImageViewer::new("lightbox");
        viewer.open("");
        assert_eq!(viewer.active(), None);

        viewer.open("https://image.tmdb.org/t/p/w1280/a.jpg");
        assert_eq!(viewer.active(), Some("https://image.tmdb.org/t/p/w1280/a.jpg"));
        assert!(!viewer.handle_click(&["lightbox"]));

        assert!(viewer.handle_click(&["backdrop"]));
        assert_eq!(viewer.active(), None);

        viewer.open("https://image.tmdb.org/t/p/w1280/b.jpg");
        viewer.close();
        assert_eq!(viewer.active(), None);
    }
}
