//! Model assignment per role, plus the master model for planning,
//! synthesis and polish.

use roundtable_domain::{ModelSpec, Role, RoleTable};

#[derive(Debug, Clone, PartialEq)]
pub struct RoleModels {
    /// Planner and synthesizer model
    pub master: ModelSpec,
    roles: RoleTable<ModelSpec>,
}

impl Default for RoleModels {
    /// Everything on the offline dummy provider
    fn default() -> Self {
        Self {
            master: ModelSpec::dummy(),
            roles: RoleTable::filled(ModelSpec::dummy()),
        }
    }
}

impl RoleModels {
    pub fn new(master: ModelSpec, roles: RoleTable<ModelSpec>) -> Self {
        Self { master, roles }
    }

    pub fn for_role(&self, role: Role) -> &ModelSpec {
        &self.roles[role]
    }

    pub fn with_role(mut self, role: Role, model: ModelSpec) -> Self {
        self.roles[role] = model;
        self
    }

    /// Model used to polish deep-mode answers
    pub fn polish(&self) -> &ModelSpec {
        self.for_role(Role::Impl)
    }

    pub fn iter(&self) -> impl Iterator<Item = (Role, &ModelSpec)> {
        self.roles.iter()
    }
}
