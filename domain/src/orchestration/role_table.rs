//! Dense per-role storage.

use super::role::Role;
use serde::{Deserialize, Serialize};
use std::ops::{Index, IndexMut};

/// One value per [`Role`], indexed without hashing.
///
/// Unlike a map, a `RoleTable` can never be missing an entry.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct RoleTable<T> {
    values: [T; 7],
}

impl<T> RoleTable<T> {
    /// Build a table by evaluating `f` for every role.
    pub fn from_fn(mut f: impl FnMut(Role) -> T) -> Self {
        Self {
            values: Role::ALL.map(&mut f),
        }
    }

    pub fn get(&self, role: Role) -> &T {
        &self.values[role.index()]
    }

    pub fn set(&mut self, role: Role, value: T) {
        self.values[role.index()] = value;
    }

    /// Iterate in [`Role::ALL`] order.
    pub fn iter(&self) -> impl Iterator<Item = (Role, &T)> {
        Role::ALL.into_iter().map(move |role| (role, self.get(role)))
    }

    pub fn map<U>(&self, mut f: impl FnMut(Role, &T) -> U) -> RoleTable<U> {
        RoleTable::from_fn(|role| f(role, self.get(role)))
    }
}

impl<T: Clone> RoleTable<T> {
    pub fn filled(value: T) -> Self {
        Self::from_fn(|_| value.clone())
    }
}

impl<T: Default> Default for RoleTable<T> {
    fn default() -> Self {
        Self::from_fn(|_| T::default())
    }
}

impl<T> Index<Role> for RoleTable<T> {
    type Output = T;

    fn index(&self, role: Role) -> &T {
        self.get(role)
    }
}

impl<T> IndexMut<Role> for RoleTable<T> {
    fn index_mut(&mut self, role: Role) -> &mut T {
        &mut self.values[role.index()]
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_from_fn_and_index() {
        let table = RoleTable::from_fn(|role| role.as_str().len());
        assert_eq!(table[Role::Solver], 6);
        assert_eq!(table[Role::Impl], 4);
    }

    #[test]
    fn test_set_and_iter_order() {
        let mut table: RoleTable<u32> = RoleTable::default();
        table.set(Role::Grok, 9);
        table[Role::Critic] = 3;
        let collected: Vec<_> = table.iter().map(|(r, v)| (r, *v)).collect();
        assert_eq!(collected[1], (Role::Critic, 3));
        assert_eq!(collected[6], (Role::Grok, 9));
        assert_eq!(collected.len(), 7);
    }
}
