/// Router Module Index
///
/// Splits the page surface by path category so each router can carry the right layers.
/// All three sit behind the root interceptor.

/// Pages that never require an identity.
pub mod public;

/// Login and signup entry points. Signed-in visitors are redirected away by the gate.
pub mod auth;

/// Pages that require a live account.
pub mod protected;
