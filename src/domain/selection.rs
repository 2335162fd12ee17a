use super::package::{AiLevel, StorageLabel};
use std::collections::BTreeSet;

/// Options a customer picked for a package. Built and type-checked at the
/// request boundary; the engine only checks them against the package.
#[derive(Debug, Clone, PartialEq, Eq, Default)]
pub struct SelectedOptions {
    pub cameras: Option<u32>,
    pub ai_detection: Option<AiLevel>,
    pub storage: Option<StorageLabel>,
    pub selected_addon_ids: BTreeSet<String>,
    pub include_installation: bool,
    pub include_maintenance: bool,
}

impl SelectedOptions {
    pub fn with_cameras(mut self, cameras: u32) -> Self {
        self.cameras = Some(cameras);
        self
    }

    pub fn with_ai(mut self, level: AiLevel) -> Self {
        self.ai_detection = Some(level);
        self
    }

    pub fn with_storage(mut self, label: impl Into<String>) -> Self {
        self.storage = Some(StorageLabel::new(label));
        self
    }

    pub fn with_addon(mut self, id: impl Into<String>) -> Self {
        self.selected_addon_ids.insert(id.into());
        self
    }

    pub fn with_installation(mut self, include: bool) -> Self {
        self.include_installation = include;
        self
    }

    pub fn with_maintenance(mut self, include: bool) -> Self {
        self.include_maintenance = include;
        self
    }
}

/// The selection after package defaults are filled in. This is what discount
/// predicates are evaluated against.
#[derive(Debug, Clone, Copy)]
pub struct ResolvedSelection<'a> {
    pub cameras: u32,
    pub ai: Option<AiLevel>,
    pub storage: Option<&'a StorageLabel>,
    pub addons: &'a BTreeSet<String>,
    pub installation: bool,
    pub maintenance: bool,
}
