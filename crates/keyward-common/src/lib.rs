//! Shared building blocks for keyward crates
//!
//! Nothing in here knows about roles or permissions. Feature crates depend
//! on it for:
//!
//! - [`di`]: factory-return service registration collected through `inventory`
//! - [`validation`]: the [`Validatable`] trait and reusable field validators
//! - [`logging`]: `tracing` subscriber setup shared by binaries and tests

pub mod di;
pub mod logging;
pub mod validation;

pub use di::{collect_all_services, list_discovered_factories, resolve, ServiceEntry, ServiceFactory};
pub use logging::{init_tracing, LogLevel};
pub use validation::{
    EmailValidator, NonEmptyListValidator, NonEmptyStringValidator, Validatable, ValidationError,
    Validator,
};
