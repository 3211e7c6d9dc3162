// File: src/navigation.rs
// Dashboard routes, navigation history and the block search box

use serde::{Deserialize, Serialize};
use tracing::debug;

/// A page the dashboard can show
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub enum Route {
    Dashboard,
    /// Block detail page, keyed by header hash or a raw search string
    Block(String),
}

impl Route {
    /// Location of this route under `base_path`
    pub fn path(&self, base_path: &str) -> String {
        let base = base_path.trim_end_matches('/');
        match self {
            Route::Dashboard => {
                if base.is_empty() {
                    "/".to_string()
                } else {
                    base.to_string()
                }
            }
            Route::Block(hash) => format!("{}/block/{}", base, hash),
        }
    }
}

/// Route history with a fixed base path
#[derive(Debug, Clone)]
pub struct Navigator {
    base_path: String,
    history: Vec<Route>,
}

impl Navigator {
    pub fn new(base_path: impl Into<String>) -> Self {
        Self {
            base_path: base_path.into(),
            history: vec![Route::Dashboard],
        }
    }

    /// Push a route and return its location
    pub fn push(&mut self, route: Route) -> String {
        let location = route.path(&self.base_path);
        debug!(%location, "navigate");
        self.history.push(route);
        location
    }

    /// Pop back to the previous route. The dashboard root is never popped.
    pub fn back(&mut self) {
        if self.history.len() > 1 {
            self.history.pop();
        }
    }

    pub fn current(&self) -> &Route {
        // history always holds the root route
        self.history.last().unwrap_or(&Route::Dashboard)
    }

    pub fn location(&self) -> String {
        self.current().path(&self.base_path)
    }
}

/// Single text field holding a candidate block hash
#[derive(Debug, Clone, Default)]
pub struct SearchBox {
    value: String,
}

impl SearchBox {
    pub fn value(&self) -> &str {
        &self.value
    }

    pub fn set(&mut self, value: impl Into<String>) {
        self.value = value.into();
    }

    pub fn push_char(&mut self, c: char) {
        self.value.push(c);
    }

    pub fn backspace(&mut self) {
        self.value.pop();
    }

    pub fn clear(&mut self) {
        self.value.clear();
    }

    /// Navigate to the block page for the literal field value and reset the
    /// field. The value is not validated; unknown hashes are the block page's
    /// problem.
    pub fn submit(&mut self, navigator: &mut Navigator) -> String {
        let query = std::mem::take(&mut self.value);
        navigator.push(Route::Block(query))
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn block_route_path() {
        assert_eq!(Route::Block("0xabc".into()).path("/dashboard"), "/dashboard/block/0xabc");
        assert_eq!(Route::Block("0xabc".into()).path("/dashboard/"), "/dashboard/block/0xabc");
        assert_eq!(Route::Block("0xabc".into()).path(""), "/block/0xabc");
        assert_eq!(Route::Dashboard.path(""), "/");
    }

    #[test]
    fn search_navigates_and_clears() {
        let mut navigator = Navigator::new("/dashboard");
        let mut search = SearchBox::default();
        search.set("0xdead");

        let location = search.submit(&mut navigator);

        assert_eq!(location, "/dashboard/block/0xdead");
        assert_eq!(navigator.location(), "/dashboard/block/0xdead");
        assert_eq!(search.value(), "");
    }

    #[test]
    fn search_does_not_validate() {
        let mut navigator = Navigator::new("/dashboard");
        let mut search = SearchBox::default();
        for c in "not a hash".chars() {
            search.push_char(c);
        }
        search.backspace();

        search.submit(&mut navigator);
        assert_eq!(navigator.current(), &Route::Block("not a has".into()));
    }

    #[test]
    fn back_stops_at_root() {
        let mut navigator = Navigator::new("/dashboard");
        navigator.push(Route::Block("0x01".into()));
        navigator.back();
        navigator.back();
        assert_eq!(navigator.current(), &Route::Dashboard);
        assert_eq!(navigator.location(), "/dashboard");
    }
}
