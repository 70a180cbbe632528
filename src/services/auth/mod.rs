pub mod access_jwt;
pub mod error;
pub mod factory;
pub mod header;
pub mod principal;
pub mod token_resolver;

#[cfg(test)]
pub(crate) mod test_support;

pub use error::AuthError;
pub use factory::build_token_resolver;
pub use token_resolver::TokenResolver;
