//! Presentation state for the header and the mobile menu.
//!
//! A reducer over [`OrderedMenu`] plus the two page-level resources the
//! components share: scroll position updates and the page scroll lock.

use crate::domain::model::{MenuItem, OrderedMenu};
use crate::domain::ports::ConfigProvider;
use crate::utils::error::{Result, SiteError};
use std::collections::HashSet;
use std::sync::atomic::{AtomicBool, Ordering};
use std::sync::Arc;
use tokio::sync::watch;

/// Offset in px past which the header switches to its compact style.
pub const DEFAULT_SCROLL_THRESHOLD: f64 = 20.0;

#[derive(Debug)]
struct ViewportInner {
    scroll_tx: watch::Sender<f64>,
    scroll_locked: AtomicBool,
}

/// The page: latest scroll offset and whether background scroll is locked.
#[derive(Debug, Clone)]
pub struct Viewport {
    inner: Arc<ViewportInner>,
}

impl Default for Viewport {
    fn default() -> Self {
        Self::new()
    }
}

impl Viewport {
    pub fn new() -> Self {
        let (scroll_tx, _) = watch::channel(0.0);
        Self {
            inner: Arc::new(ViewportInner {
                scroll_tx,
                scroll_locked: AtomicBool::new(false),
            }),
        }
    }

    /// Records a scroll event. Only the latest offset is kept.
    pub fn dispatch_scroll(&self, offset: f64) {
        self.inner.scroll_tx.send_replace(offset);
    }

    pub fn scroll_offset(&self) -> f64 {
        *self.inner.scroll_tx.borrow()
    }

    /// Number of attached scroll listeners.
    pub fn listener_count(&self) -> usize {
        self.inner.scroll_tx.receiver_count()
    }

    pub fn is_scroll_locked(&self) -> bool {
        self.inner.scroll_locked.load(Ordering::Acquire)
    }

    /// At most one holder at a time.
    pub fn lock_scroll(&self) -> Result<ScrollLock> {
        self.inner
            .scroll_locked
            .compare_exchange(false, true, Ordering::AcqRel, Ordering::Acquire)
            .map_err(|_| SiteError::ScrollLockHeld)?;

        tracing::debug!("Page scroll locked");
        Ok(ScrollLock {
            viewport: Arc::clone(&self.inner),
        })
    }

    fn subscribe(&self) -> watch::Receiver<f64> {
        self.inner.scroll_tx.subscribe()
    }
}

/// Page scroll lock. Released on drop.
#[derive(Debug)]
pub struct ScrollLock {
    viewport: Arc<ViewportInner>,
}

impl Drop for ScrollLock {
    fn drop(&mut self) {
        self.viewport.scroll_locked.store(false, Ordering::Release);
        tracing::debug!("Page scroll released");
    }
}

#[derive(Debug, Clone, Copy, PartialEq)]
pub struct HeaderState {
    scrolled: bool,
    threshold: f64,
}

impl Default for HeaderState {
    fn default() -> Self {
        Self::new(DEFAULT_SCROLL_THRESHOLD)
    }
}

impl HeaderState {
    pub fn new(threshold: f64) -> Self {
        Self {
            scrolled: false,
            threshold,
        }
    }

    pub fn is_scrolled(&self) -> bool {
        self.scrolled
    }

    pub fn threshold(&self) -> f64 {
        self.threshold
    }

    /// Returns true when the sticky state flipped.
    pub fn on_scroll(&mut self, offset: f64) -> bool {
        let scrolled = offset > self.threshold;
        let changed = scrolled != self.scrolled;
        self.scrolled = scrolled;
        changed
    }

    /// Attaches a scroll listener to the viewport. Dropping the returned
    /// handle detaches it.
    pub fn mount(self, viewport: &Viewport) -> MountedHeader {
        MountedHeader {
            state: self,
            scroll_rx: viewport.subscribe(),
        }
    }
}

#[derive(Debug)]
pub struct MountedHeader {
    state: HeaderState,
    scroll_rx: watch::Receiver<f64>,
}

impl MountedHeader {
    pub fn state(&self) -> &HeaderState {
        &self.state
    }

    pub fn is_scrolled(&self) -> bool {
        self.state.is_scrolled()
    }

    /// Applies the latest dispatched offset. Returns true when the sticky
    /// state flipped.
    pub fn sync(&mut self) -> bool {
        let offset = *self.scroll_rx.borrow_and_update();
        self.state.on_scroll(offset)
    }

    /// Waits for the next scroll event and applies it. `None` once the
    /// viewport is gone.
    pub async fn next_scroll(&mut self) -> Option<bool> {
        self.scroll_rx.changed().await.ok()?;
        Some(self.sync())
    }

    pub fn unmount(self) -> HeaderState {
        self.state
    }
}

/// Mobile menu: open flag, the scroll lock it holds while open, and the
/// set of expanded submenu panels.
#[derive(Debug, Default)]
pub struct MobileMenuState {
    scroll_lock: Option<ScrollLock>,
    expanded: HashSet<String>,
}

impl MobileMenuState {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn is_open(&self) -> bool {
        self.scroll_lock.is_some()
    }

    pub fn open(&mut self, viewport: &Viewport) -> Result<()> {
        if self.is_open() {
            return Ok(());
        }
        self.scroll_lock = Some(viewport.lock_scroll()?);
        Ok(())
    }

    pub fn close(&mut self) {
        self.scroll_lock = None;
    }

    /// Returns whether the menu is open afterwards.
    pub fn toggle(&mut self, viewport: &Viewport) -> Result<bool> {
        if self.is_open() {
            self.close();
        } else {
            self.open(viewport)?;
        }
        Ok(self.is_open())
    }

    /// Returns whether the panel is expanded afterwards.
    pub fn toggle_expanded(&mut self, id: &str) -> bool {
        if self.expanded.remove(id) {
            false
        } else {
            self.expanded.insert(id.to_string());
            true
        }
    }

    pub fn is_expanded(&self, id: &str) -> bool {
        self.expanded.contains(id)
    }

    pub fn expanded(&self) -> &HashSet<String> {
        &self.expanded
    }

    /// Following a link closes the menu.
    pub fn navigate<'a>(&mut self, item: &'a MenuItem) -> &'a str {
        self.close();
        &item.url
    }
}

/// Header and mobile menu mounted over one ordered menu.
#[derive(Debug)]
pub struct NavigationState {
    menu: OrderedMenu,
    viewport: Viewport,
    header: MountedHeader,
    mobile: MobileMenuState,
}

impl NavigationState {
    pub fn mount(menu: OrderedMenu, viewport: &Viewport, scroll_threshold: f64) -> Self {
        Self {
            menu,
            viewport: viewport.clone(),
            header: HeaderState::new(scroll_threshold).mount(viewport),
            mobile: MobileMenuState::new(),
        }
    }

    /// Mounts with the configured scroll threshold.
    pub fn from_config<C: ConfigProvider>(menu: OrderedMenu, viewport: &Viewport, config: &C) -> Self {
        Self::mount(menu, viewport, config.scroll_threshold())
    }

    pub fn menu(&self) -> &OrderedMenu {
        &self.menu
    }

    pub fn header(&self) -> &MountedHeader {
        &self.header
    }

    pub fn mobile(&self) -> &MobileMenuState {
        &self.mobile
    }

    pub fn sync_scroll(&mut self) -> bool {
        self.header.sync()
    }

    pub fn toggle_mobile_menu(&mut self) -> Result<bool> {
        self.mobile.toggle(&self.viewport)
    }

    pub fn close_mobile_menu(&mut self) {
        self.mobile.close();
    }

    /// Items without children have no panel; toggling them is a no-op.
    pub fn toggle_submenu(&mut self, id: &str) -> bool {
        if !self.menu.has_submenu(id) {
            return false;
        }
        self.mobile.toggle_expanded(id)
    }

    /// Resolves the link target for an item or child id and closes the
    /// mobile menu. Unknown ids resolve to the placeholder `#`.
    pub fn follow_link(&mut self, id: &str) -> String {
        let target = self
            .menu
            .iter()
            .flat_map(|item| std::iter::once(item).chain(item.children.iter()))
            .find(|item| item.id == id);

        match target {
            Some(item) => self.mobile.navigate(item).to_string(),
            None => {
                self.mobile.close();
                crate::core::url_mapper::FALLBACK_URL.to_string()
            }
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::core::menu::build_ordered_menu;

    fn sample_menu() -> OrderedMenu {
        build_ordered_menu(vec![
            MenuItem::new("s", "Servicios", "/servicios/")
                .with_children(vec![MenuItem::new("seo", "SEO", "/servicios/seo/")]),
            MenuItem::new("b", "Blog", "/blog/"),
        ])
    }

    #[test]
    fn test_header_threshold() {
        let mut header = HeaderState::new(20.0);
        assert!(!header.on_scroll(20.0));
        assert!(!header.is_scrolled());
        assert!(header.on_scroll(21.0));
        assert!(header.is_scrolled());
        assert!(!header.on_scroll(400.0));
        assert!(header.on_scroll(0.0));
        assert!(!header.is_scrolled());
    }

    #[test]
    fn test_listener_attached_and_detached() {
        let viewport = Viewport::new();
        assert_eq!(viewport.listener_count(), 0);

        let mut header = HeaderState::new(50.0).mount(&viewport);
        assert_eq!(viewport.listener_count(), 1);

        viewport.dispatch_scroll(10.0);
        viewport.dispatch_scroll(80.0);
        assert!(header.sync());
        assert!(header.is_scrolled());

        let state = header.unmount();
        assert!(state.is_scrolled());
        assert_eq!(viewport.listener_count(), 0);
    }

    #[test]
    fn test_last_scroll_event_wins() {
        let viewport = Viewport::new();
        let mut header = HeaderState::default().mount(&viewport);
        viewport.dispatch_scroll(300.0);
        viewport.dispatch_scroll(5.0);
        assert!(!header.sync());
        assert!(!header.is_scrolled());
        assert_eq!(viewport.scroll_offset(), 5.0);
    }

    #[tokio::test]
    async fn test_next_scroll_waits_for_event() {
        let viewport = Viewport::new();
        let mut header = HeaderState::default().mount(&viewport);

        let dispatcher = viewport.clone();
        tokio::spawn(async move { dispatcher.dispatch_scroll(120.0) });

        assert_eq!(header.next_scroll().await, Some(true));
        assert!(header.is_scrolled());
    }

    #[tokio::test]
    async fn test_next_scroll_ends_when_viewport_dropped() {
        let viewport = Viewport::new();
        let mut header = HeaderState::default().mount(&viewport);
        drop(viewport);
        assert_eq!(header.next_scroll().await, None);
    }

    #[test]
    fn test_open_locks_and_close_releases() {
        let viewport = Viewport::new();
        let mut menu = MobileMenuState::new();

        assert!(menu.toggle(&viewport).unwrap());
        assert!(viewport.is_scroll_locked());

        assert!(!menu.toggle(&viewport).unwrap());
        assert!(!viewport.is_scroll_locked());
    }

    #[test]
    fn test_drop_while_open_releases_lock() {
        let viewport = Viewport::new();
        {
            let mut menu = MobileMenuState::new();
            menu.open(&viewport).unwrap();
            assert!(viewport.is_scroll_locked());
        }
        assert!(!viewport.is_scroll_locked());
    }

    #[test]
    fn test_second_menu_cannot_lock() {
        let viewport = Viewport::new();
        let mut first = MobileMenuState::new();
        let mut second = MobileMenuState::new();

        first.open(&viewport).unwrap();
        assert!(matches!(second.open(&viewport), Err(SiteError::ScrollLockHeld)));
        assert!(!second.is_open());

        first.close();
        assert!(second.open(&viewport).is_ok());
    }

    #[test]
    fn test_reopen_is_noop() {
        let viewport = Viewport::new();
        let mut menu = MobileMenuState::new();
        menu.open(&viewport).unwrap();
        assert!(menu.open(&viewport).is_ok());
        assert!(menu.is_open());
    }

    #[test]
    fn test_toggle_expanded_twice_restores() {
        let mut menu = MobileMenuState::new();
        assert!(menu.toggle_expanded("s"));
        assert!(menu.toggle_expanded("b"));
        assert!(menu.is_expanded("s"));
        assert!(!menu.toggle_expanded("s"));
        assert!(!menu.is_expanded("s"));
        assert!(menu.is_expanded("b"));
    }

    #[test]
    fn test_navigation_state_flow() {
        let viewport = Viewport::new();
        let mut nav = NavigationState::mount(sample_menu(), &viewport, 20.0);
        assert_eq!(viewport.listener_count(), 1);

        viewport.dispatch_scroll(25.0);
        assert!(nav.sync_scroll());
        assert!(nav.header().is_scrolled());

        assert!(nav.toggle_mobile_menu().unwrap());
        assert!(nav.toggle_submenu("s"));
        assert!(!nav.toggle_submenu("b"));
        assert!(nav.mobile().is_expanded("s"));

        assert_eq!(nav.follow_link("seo"), "/servicios/seo/");
        assert!(!nav.mobile().is_open());
        assert!(!viewport.is_scroll_locked());
        assert_eq!(nav.follow_link("nope"), "#");
    }

    #[test]
    fn test_threshold_from_config() {
        let config = crate::config::SiteConfig::from_toml_str("[navigation]\nscroll_threshold = 80").unwrap();
        let viewport = Viewport::new();
        let mut nav = NavigationState::from_config(sample_menu(), &viewport, &config);
        assert_eq!(nav.header().state().threshold(), 80.0);

        viewport.dispatch_scroll(60.0);
        assert!(!nav.sync_scroll());
        viewport.dispatch_scroll(81.0);
        assert!(nav.sync_scroll());
        assert!(nav.header().is_scrolled());
    }

    #[test]
    fn test_unmount_releases_everything() {
        let viewport = Viewport::new();
        let mut nav = NavigationState::mount(sample_menu(), &viewport, 20.0);
        nav.toggle_mobile_menu().unwrap();
        assert!(viewport.is_scroll_locked());

        drop(nav);
        assert!(!viewport.is_scroll_locked());
        assert_eq!(viewport.listener_count(), 0);
    }
}
