use gpui::InteractiveElement;

/// Names an element for `debug_bounds` lookups in tests. A no-op unless the
/// `test-support` feature is on.
pub trait TestSelectorExt: InteractiveElement + Sized {
    fn test_selector(self, selector: impl FnOnce() -> String) -> Self {
        #[cfg(feature = "test-support")]
        let this = self.debug_selector(selector);
        #[cfg(not(feature = "test-support"))]
        let this = {
            let _ = selector;
            self
        };

        this
    }
}

impl<E: InteractiveElement> TestSelectorExt for E {}
