//! Permission model
//!
//! Plain data records consumed and produced by the rest of the crate. Join
//! records compare by their composite natural key only; an unset key is the
//! empty string and compares like any other value.

pub mod grant;
pub mod privilege;
pub mod role;
pub mod user;

pub use grant::{Grant, GrantSource};
pub use privilege::{Privilege, PrivilegeOperation, PrivilegeOperationContext, PrivilegeType};
pub use role::{Role, RolePrivilege};
pub use user::{User, UserPrivilege};
