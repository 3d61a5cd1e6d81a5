//! Role selection.

use crate::orchestration::category::{Classification, TaskCategory};
use crate::orchestration::mode::Mode;
use crate::orchestration::role::Role;
use serde::{Deserialize, Serialize};
use std::collections::BTreeSet;

/// Per-category role enable/disable table. Everything is enabled by default.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct RoleOverrides {
    disabled: BTreeSet<(TaskCategory, Role)>,
}

impl RoleOverrides {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn disable(mut self, category: TaskCategory, role: Role) -> Self {
        self.disabled.insert((category, role));
        self
    }

    pub fn set_enabled(&mut self, category: TaskCategory, role: Role, enabled: bool) {
        let key = (category, role);
        if enabled {
            self.disabled.remove(&key);
        } else {
            self.disabled.insert(key);
        }
    }

    pub fn is_enabled(&self, category: TaskCategory, role: Role) -> bool {
        !self.disabled.contains(&(category, role))
    }

    pub fn is_empty(&self) -> bool {
        self.disabled.is_empty()
    }
}

/// Inputs to [`select_roles`].
#[derive(Debug, Clone, Copy)]
pub struct SelectionContext<'a> {
    pub mode: Mode,
    pub classification: &'a Classification,
    pub has_attachments: bool,
}

/// Produce the ordered, duplicate-free candidate role set.
///
/// Audit and deep modes take every role. Ask mode starts from the
/// solver/critic/verifier triad and adds specialists by category. Roles
/// disabled for the resolved category are dropped last.
pub fn select_roles(ctx: SelectionContext<'_>, overrides: &RoleOverrides) -> Vec<Role> {
    let category = ctx.classification.category();
    let candidates: Vec<Role> = if ctx.mode.is_thorough() {
        Role::ALL.to_vec()
    } else {
        let mut roles = Role::TRIAD.to_vec();
        if category == TaskCategory::TechnicalExecution {
            roles.push(Role::Impl);
        }
        if category == TaskCategory::PromptEngineering {
            roles.push(Role::Promptsmith);
            roles.push(Role::Grok);
        }
        if category == TaskCategory::VisualAnalysis || ctx.has_attachments {
            roles.push(Role::Visual);
        }
        roles
    };

    let mut seen = BTreeSet::new();
    candidates
        .into_iter()
        .filter(|role| seen.insert(*role))
        .filter(|role| overrides.is_enabled(category, *role))
        .collect()
}
