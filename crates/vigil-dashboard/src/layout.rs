//! Responsive sidebar state
//!
//! Crossing from wide to narrow forces the sidebar collapsed. Widening never
//! expands it again. A manual toggle holds until the next narrowing crossing.

use tracing::debug;

/// Sidebar collapse state driven by viewport width
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct SidebarLayout {
    breakpoint: u32,
    mobile: Option<bool>,
    collapsed: bool,
}

impl SidebarLayout {
    /// Expanded sidebar with no width measured yet
    pub fn new(breakpoint: u32) -> Self {
        Self {
            breakpoint,
            mobile: None,
            collapsed: false,
        }
    }

    /// Width below which the layout is mobile
    pub fn breakpoint(&self) -> u32 {
        self.breakpoint
    }

    /// Whether the last measured width was below the breakpoint
    pub fn is_mobile(&self) -> bool {
        self.mobile.unwrap_or(false)
    }

    /// Whether the sidebar is collapsed
    pub fn is_collapsed(&self) -> bool {
        self.collapsed
    }

    /// Apply a viewport width. Returns the resulting collapsed state.
    pub fn on_resize(&mut self, width: u32) -> bool {
        let mobile = width < self.breakpoint;
        let was_mobile = self.mobile.replace(mobile);

        if mobile && was_mobile != Some(true) {
            self.collapsed = true;
            debug!(width, breakpoint = self.breakpoint, "Sidebar collapsed by breakpoint");
        }
        self.collapsed
    }

    /// Flip the collapsed state by hand
    pub fn toggle(&mut self) -> bool {
        self.collapsed = !self.collapsed;
        self.collapsed
    }

    /// Called after the user picks a view; closes the sidebar on mobile
    pub fn on_view_selected(&mut self) {
        if self.is_mobile() {
            self.collapsed = true;
        }
    }
}

impl Default for SidebarLayout {
    fn default() -> Self {
        Self::new(1024)
    }
}
