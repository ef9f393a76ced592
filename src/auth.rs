//! Auth-domain identifiers, service-principal credentials, and token material.

pub mod credential;
pub mod id;
pub mod token;

pub use credential::*;
pub use id::*;
pub use token::*;
