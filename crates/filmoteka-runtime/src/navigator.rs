/// A location change requested by a controller.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Navigation {
    Goto(String),
    Reload,
}

/// Whatever owns the page location: a browser window, a terminal session.
pub trait Navigator: Send + Sync {
    fn navigate(&self, to: Navigation);
}
