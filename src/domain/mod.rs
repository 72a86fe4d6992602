mod analytics;
mod auth;
mod balance;
mod customer;
mod entry;
mod money;
mod reconcile;
mod reminder;

pub use analytics::*;
pub use auth::*;
pub use balance::*;
pub use customer::*;
pub use entry::*;
pub use money::*;
pub use reconcile::*;
pub use reminder::*;
