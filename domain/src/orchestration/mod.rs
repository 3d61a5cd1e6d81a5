//! Orchestration vocabulary
//!
//! The closed enumerations every pipeline stage is keyed by: request
//! [`Mode`](mode::Mode), responder [`Role`](role::Role), classified
//! [`TaskCategory`](category::TaskCategory), and the dense
//! [`RoleTable`](role_table::RoleTable) used for per-role data.

pub mod category;
pub mod mode;
pub mod role;
pub mod role_table;
