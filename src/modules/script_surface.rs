// NavSurface that speaks to a webview through evaluated scripts.
// The host evals queued snippets and reports dimensions back.

use crate::modules::navigation::NavSurface;

pub const NAV_SELECTOR: &str = ".nav";
pub const NAV_SHADOW_SELECTOR: &str = ".nav--shadow";
pub const NAV_ROW_SELECTOR: &str = ".nav > .row";
pub const BODY_SELECTOR: &str = "body";

pub const FLOATING_CLASS: &str = "floating";
pub const BODY_FLOATING_CLASS: &str = "nav--floating";
pub const SHOW_LOGO_CLASS: &str = "showlogo";

#[derive(Debug, Default, Clone, Copy, PartialEq, Eq)]
struct ClassState {
    nav_floating: bool,
    shadow_floating: bool,
    body_floating: bool,
    nav_showlogo: bool,
}

#[derive(Debug, Default)]
pub struct ScriptSurface {
    classes: ClassState,
    row_max_width: Option<u32>,
    viewport_width: Option<u32>,
    nav_height: Option<u32>,
    queue: Vec<String>,
}

impl ScriptSurface {
    /// Nothing is known about the document until the host reports it.
    pub fn new() -> Self {
        Self::default()
    }

    pub fn report_viewport(&mut self, width: u32) {
        self.viewport_width = Some(width);
    }

    pub fn report_nav_height(&mut self, height: Option<u32>) {
        self.nav_height = height;
    }

    /// Scripts queued since the last call, in order.
    pub fn take_scripts(&mut self) -> Vec<String> {
        std::mem::take(&mut self.queue)
    }

    // Mirrors a hasClass check: only emit when the tracked state differs.
    fn toggle(&mut self, selector: &str, class: &str, current: bool, on: bool) -> bool {
        if current == on {
            return current;
        }
        self.queue.push(class_script(selector, class, on));
        on
    }
}

fn class_script(selector: &str, class: &str, on: bool) -> String {
    let method = if on { "add" } else { "remove" };
    format!(
        "document.querySelector('{}')?.classList.{}('{}');",
        selector, method, class
    )
}

fn max_width_script(px: Option<u32>) -> String {
    let value = match px {
        Some(px) => format!("{}px", px),
        None => String::new(),
    };
    format!(
        "(function() {{ var row = document.querySelector('{}'); if (row) row.style.maxWidth = '{}'; }})();",
        NAV_ROW_SELECTOR, value
    )
}

impl NavSurface for ScriptSurface {
    fn set_floating(&mut self, floating: bool) {
        let c = self.classes;
        self.classes.nav_floating = self.toggle(NAV_SELECTOR, FLOATING_CLASS, c.nav_floating, floating);
        self.classes.shadow_floating =
            self.toggle(NAV_SHADOW_SELECTOR, FLOATING_CLASS, c.shadow_floating, floating);
        self.classes.body_floating =
            self.toggle(BODY_SELECTOR, BODY_FLOATING_CLASS, c.body_floating, floating);
    }

    fn set_logo_visible(&mut self, visible: bool) {
        let c = self.classes;
        self.classes.nav_showlogo = self.toggle(NAV_SELECTOR, SHOW_LOGO_CLASS, c.nav_showlogo, visible);
    }

    fn set_row_max_width(&mut self, px: Option<u32>) {
        if self.row_max_width == px {
            return;
        }
        self.row_max_width = px;
        self.queue.push(max_width_script(px));
    }

    fn viewport_width(&self) -> Option<u32> {
        self.viewport_width
    }

    fn measure_height(&self) -> Option<u32> {
        self.nav_height
    }
}
