// Navigation bar controller - no IO, the document is reached through `NavSurface`.
// Three aggregated states drive the bar: floating, logo visibility and expanded width.

use std::sync::{Arc, Mutex, MutexGuard, PoisonError};
use std::time::Instant;

use crate::modules::state_container::MultipleStateContainer;
use crate::modules::throttle::{Throttle, ThrottleDecision};
use crate::settings::{NavSettings, ToggleMode};
use crate::state::{NavSnapshot, SignalGroup};

/// The document side of the navigation bar.
///
/// Implementations own the real elements (or a script queue for them). Class
/// writes should be idempotent: applying a state that is already present is a no-op.
pub trait NavSurface {
    /// `floating` on `.nav` and `.nav--shadow`, `nav--floating` on body.
    fn set_floating(&mut self, floating: bool);
    /// `showlogo` on `.nav`.
    fn set_logo_visible(&mut self, visible: bool);
    /// Row max-width in px; `None` clears the constraint.
    fn set_row_max_width(&mut self, px: Option<u32>);
    /// Viewport width in px, or `None` until the host has reported one.
    fn viewport_width(&self) -> Option<u32>;
    /// Rendered bar height, or `None` if the bar is not in the document.
    fn measure_height(&self) -> Option<u32>;
}

// Everything the change callbacks touch. Shared between the containers' callbacks
// and the controller, always locked for the duration of a single effect.
struct NavView<S> {
    surface: S,
    toggle_mode: ToggleMode,
    resize: Throttle,
    resize_listening: bool,
}

impl<S: NavSurface> NavView<S> {
    fn update_floating(&mut self, state: bool) {
        let floating = match self.toggle_mode {
            ToggleMode::Bidirectional => state,
            ToggleMode::Latching => true,
        };
        log::debug!("[Nav] floating -> {} (applied {})", state, floating);
        self.surface.set_floating(floating);
    }

    fn update_logo_visibility(&mut self, state: bool) {
        let visible = match self.toggle_mode {
            ToggleMode::Bidirectional => state,
            ToggleMode::Latching => true,
        };
        log::debug!("[Nav] logo visible -> {} (applied {})", state, visible);
        self.surface.set_logo_visible(visible);
    }

    fn update_expand_state(&mut self, state: bool) {
        if state {
            if !self.resize_listening {
                log::debug!("[Nav] Attaching resize listener");
                self.resize_listening = true;
            }
            self.update_expand_width_immediate();
        } else {
            if self.resize_listening {
                log::debug!("[Nav] Detaching resize listener");
                self.resize_listening = false;
            }
            self.resize.cancel();
            self.surface.set_row_max_width(None);
        }
    }

    fn update_expand_width_immediate(&mut self) {
        match self.surface.viewport_width() {
            Some(width) => self.surface.set_row_max_width(Some(width)),
            None => log::debug!("[Nav] Viewport width unknown, row width left unconstrained"),
        }
    }
}

fn lock_view<S>(view: &Mutex<NavView<S>>) -> MutexGuard<'_, NavView<S>> {
    view.lock().unwrap_or_else(PoisonError::into_inner)
}

/// Owns the three aggregated nav states and applies their effects to a surface.
///
/// Built once by the host during startup; there is no global instance.
pub struct Navigation<S> {
    view: Arc<Mutex<NavView<S>>>,
    floating: MultipleStateContainer,
    logo_visible: MultipleStateContainer,
    expanded: MultipleStateContainer,
    mobile_breakpoint: u32,
    nav_height: Option<u32>,
}

impl<S: NavSurface + Send + 'static> Navigation<S> {
    pub fn new(surface: S, settings: &NavSettings) -> Self {
        let view = Arc::new(Mutex::new(NavView {
            surface,
            toggle_mode: settings.toggle_mode,
            resize: Throttle::new(settings.resize_interval()),
            resize_listening: false,
        }));

        let floating = {
            let view = view.clone();
            MultipleStateContainer::new(
                move |state| lock_view(&view).update_floating(state),
                settings.initially_floating,
            )
        };
        let logo_visible = {
            let view = view.clone();
            MultipleStateContainer::new(
                move |state| lock_view(&view).update_logo_visibility(state),
                settings.initial_logo_visible,
            )
        };
        let expanded = {
            let view = view.clone();
            MultipleStateContainer::new(move |state| lock_view(&view).update_expand_state(state), false)
        };

        // Latching only ever reacts to transitions.
        if settings.toggle_mode == ToggleMode::Bidirectional {
            let mut v = lock_view(&view);
            v.update_floating(settings.initially_floating);
            v.update_logo_visibility(settings.initial_logo_visible);
        }

        Self {
            view,
            floating,
            logo_visible,
            expanded,
            mobile_breakpoint: settings.mobile_breakpoint,
            nav_height: None,
        }
    }
}

impl<S: NavSurface> Navigation<S> {
    pub fn container(&self, group: SignalGroup) -> &MultipleStateContainer {
        match group {
            SignalGroup::Floating => &self.floating,
            SignalGroup::LogoVisible => &self.logo_visible,
            SignalGroup::Expanded => &self.expanded,
        }
    }

    pub fn container_mut(&mut self, group: SignalGroup) -> &mut MultipleStateContainer {
        match group {
            SignalGroup::Floating => &mut self.floating,
            SignalGroup::LogoVisible => &mut self.logo_visible,
            SignalGroup::Expanded => &mut self.expanded,
        }
    }

    /// Set one source flag and apply the effect if the group's state flips.
    pub fn signal(&mut self, group: SignalGroup, key: impl Into<String>, value: bool) {
        self.container_mut(group).set(key, value);
    }

    /// Withdraw a source from a group. Returns the value it held, if any.
    pub fn retract(&mut self, group: SignalGroup, key: &str) -> Option<bool> {
        self.container_mut(group).remove(key, true)
    }

    /// Apply several flags for a group with a single update.
    pub fn batch<I, K>(&mut self, group: SignalGroup, flags: I) -> bool
    where
        I: IntoIterator<Item = (K, bool)>,
        K: Into<String>,
    {
        let container = self.container_mut(group);
        for (key, value) in flags {
            container.stage(key, value);
        }
        container.update()
    }

    pub fn is_floating(&self) -> bool {
        self.floating.current_state()
    }

    pub fn is_logo_visible(&self) -> bool {
        self.logo_visible.current_state()
    }

    pub fn is_expanded(&self) -> bool {
        self.expanded.current_state()
    }

    pub fn is_resize_listening(&self) -> bool {
        lock_view(&self.view).resize_listening
    }

    /// Window resized. Returns the deadline of a deferred width update, if any.
    pub fn on_resize(&mut self, now: Instant) -> Option<Instant> {
        self.invalidate_height();

        let mut view = lock_view(&self.view);
        if !view.resize_listening {
            return None;
        }
        match view.resize.call(now) {
            ThrottleDecision::Fire => {
                view.update_expand_width_immediate();
                None
            }
            ThrottleDecision::Deferred(deadline) => Some(deadline),
        }
    }

    /// Run the trailing width update if it is due. Returns true if it ran.
    pub fn poll_resize(&mut self, now: Instant) -> bool {
        let mut view = lock_view(&self.view);
        if !view.resize_listening || !view.resize.poll(now) {
            return false;
        }
        view.update_expand_width_immediate();
        true
    }

    pub fn resize_deadline(&self) -> Option<Instant> {
        let view = lock_view(&self.view);
        if view.resize_listening {
            view.resize.deadline()
        } else {
            None
        }
    }

    /// Bar height for layout. Zero on mobile-width viewports or when the bar is absent.
    pub fn height(&mut self) -> u32 {
        let view = lock_view(&self.view);
        if matches!(view.surface.viewport_width(), Some(w) if w < self.mobile_breakpoint) {
            return 0;
        }
        if let Some(h) = self.nav_height {
            return h;
        }
        match view.surface.measure_height() {
            Some(h) if h > 0 => {
                self.nav_height = Some(h);
                h
            }
            _ => 0,
        }
    }

    pub fn invalidate_height(&mut self) {
        self.nav_height = None;
    }

    pub fn snapshot(&mut self) -> NavSnapshot {
        NavSnapshot {
            floating: self.is_floating(),
            logo_visible: self.is_logo_visible(),
            expanded: self.is_expanded(),
            resize_listening: self.is_resize_listening(),
            height: self.height(),
        }
    }

    pub fn with_surface<R>(&self, f: impl FnOnce(&mut S) -> R) -> R {
        f(&mut lock_view(&self.view).surface)
    }
}
