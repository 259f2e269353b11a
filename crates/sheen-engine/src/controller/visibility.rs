/// Host lifecycle signals gating the render loop.
///
/// The loop may run only while the page is visible and the surface
/// intersects the viewport. Both start out true.
#[derive(Debug, Copy, Clone, Eq, PartialEq)]
pub struct Visibility {
    pub page_visible: bool,
    pub intersecting: bool,
}

impl Default for Visibility {
    fn default() -> Self {
        Self {
            page_visible: true,
            intersecting: true,
        }
    }
}

impl Visibility {
    #[inline]
    pub fn allows_running(self) -> bool {
        self.page_visible && self.intersecting
    }
}
