use constants::overlay::{ENTRY_LABEL_SUPPORTED, ENTRY_LABEL_UNSUPPORTED};

/// Label and enabled state of the "Enter AR" button.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct EntryButtonState {
    pub label: &'static str,
    pub disabled: bool,
}

impl EntryButtonState {
    pub fn from_support(supported: bool) -> Self {
        if supported {
            Self {
                label: ENTRY_LABEL_SUPPORTED,
                disabled: false,
            }
        } else {
            Self {
                label: ENTRY_LABEL_UNSUPPORTED,
                disabled: true,
            }
        }
    }

    #[cfg(target_arch = "wasm32")]
    pub fn apply(&self, button: &web_sys::HtmlButtonElement) {
        button.set_inner_html(self.label);
        button.set_disabled(self.disabled);
    }
}
