//! Per-account origin allow-list

mod entity;
mod matching;
mod repository;

pub use entity::{AllowedDomain, AllowedDomainId};
pub use matching::{host_matches, normalize_domain, origin_host, DomainFormatError};
pub use repository::AllowedDomainRepository;
