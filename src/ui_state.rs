//! Session-scoped presentation state for the embedding UI shell: a loading
//! flag with a message, and a light/dark theme flag. Both are typed state
//! containers over a watch channel; consumers subscribe instead of reaching
//! for ambient globals. Nothing here is persisted.

use tokio::sync::watch;

pub const DEFAULT_LOADING_MESSAGE: &str = "Loading...";

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct LoadingSnapshot {
    pub visible: bool,
    pub message: String,
}

impl Default for LoadingSnapshot {
    fn default() -> Self {
        LoadingSnapshot {
            visible: false,
            message: DEFAULT_LOADING_MESSAGE.to_string(),
        }
    }
}

pub struct LoadingState {
    tx: watch::Sender<LoadingSnapshot>,
}

impl Default for LoadingState {
    fn default() -> Self {
        Self::new()
    }
}

impl LoadingState {
    pub fn new() -> Self {
        let (tx, _) = watch::channel(LoadingSnapshot::default());
        Self { tx }
    }

    pub fn show(&self, message: impl Into<String>) {
        let _ = self.tx.send(LoadingSnapshot {
            visible: true,
            message: message.into(),
        });
    }

    /// Resets the flag and restores the default message.
    pub fn hide(&self) {
        let _ = self.tx.send(LoadingSnapshot::default());
    }

    pub fn current(&self) -> LoadingSnapshot {
        self.tx.borrow().clone()
    }

    pub fn subscribe(&self) -> watch::Receiver<LoadingSnapshot> {
        self.tx.subscribe()
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Theme {
    Light,
    Dark,
}

impl Theme {
    fn flipped(self) -> Self {
        match self {
            Theme::Light => Theme::Dark,
            Theme::Dark => Theme::Light,
        }
    }
}

pub struct ThemeState {
    tx: watch::Sender<Theme>,
}

impl Default for ThemeState {
    fn default() -> Self {
        Self::new(Theme::Light)
    }
}

impl ThemeState {
    pub fn new(initial: Theme) -> Self {
        let (tx, _) = watch::channel(initial);
        Self { tx }
    }

    pub fn toggle(&self) -> Theme {
        let next = self.tx.borrow().flipped();
        let _ = self.tx.send(next);
        next
    }

    pub fn current(&self) -> Theme {
        *self.tx.borrow()
    }

    pub fn subscribe(&self) -> watch::Receiver<Theme> {
        self.tx.subscribe()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn loading_show_then_hide_restores_default() {
        let loading = LoadingState::new();
        assert!(!loading.current().visible);

        loading.show("Fetching bookings");
        let shown = loading.current();
        assert!(shown.visible);
        assert_eq!(shown.message, "Fetching bookings");

        loading.hide();
        assert_eq!(loading.current(), LoadingSnapshot::default());
    }

    #[tokio::test]
    async fn subscribers_observe_loading_changes() {
        let loading = LoadingState::new();
        let mut rx = loading.subscribe();

        loading.show("Saving");
        rx.changed().await.unwrap();
        assert!(rx.borrow().visible);
    }

    #[test]
    fn theme_toggle_flips_both_ways() {
        let theme = ThemeState::default();
        assert_eq!(theme.current(), Theme::Light);
        assert_eq!(theme.toggle(), Theme::Dark);
        assert_eq!(theme.toggle(), Theme::Light);
    }
}
