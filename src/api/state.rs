//! Application state for shared services

use std::sync::Arc;

use crate::domain::usage::UsageRepository;
use crate::infrastructure::address::AddressLookupService;
use crate::infrastructure::admission::AdmissionService;
use crate::infrastructure::allowed_domain::AllowedDomainService;
use crate::infrastructure::auth::JwtGenerator;
use crate::infrastructure::user::UserService;

/// Application state shared by every handler
#[derive(Clone)]
pub struct AppState {
    pub user_service: UserService,
    pub domain_service: AllowedDomainService,
    pub address_service: AddressLookupService,
    pub admission_service: AdmissionService,
    pub usage_repository: Arc<dyn UsageRepository>,
    pub jwt_service: Arc<dyn JwtGenerator>,
}

impl std::fmt::Debug for AppState {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("AppState")
            .field("user_service", &self.user_service)
            .field("domain_service", &self.domain_service)
            .field("address_service", &self.address_service)
            .field("jwt_service", &self.jwt_service)
            .finish_non_exhaustive()
    }
}
