//! Business logic services

pub mod catalog;
pub mod circulation;
pub mod email;
pub mod gutenberg;
pub mod users;

use crate::{
    config::{AuthConfig, EmailConfig, ScrapeConfig},
    repository::Repository,
};

/// Container for all services
#[derive(Clone)]
pub struct Services {
    pub catalog: catalog::CatalogService,
    pub circulation: circulation::CirculationService,
    pub users: users::UsersService,
    pub gutenberg: gutenberg::GutenbergService,
    pub email: email::EmailService,
}

impl Services {
    /// Create all services with the given repository
    pub fn new(
        repository: Repository,
        auth_config: AuthConfig,
        email_config: EmailConfig,
        scrape_config: ScrapeConfig,
    ) -> Self {
        let email = email::EmailService::new(email_config);
        Self {
            catalog: catalog::CatalogService::new(repository.clone()),
            circulation: circulation::CirculationService::new(repository.clone(), email.clone()),
            users: users::UsersService::new(repository, auth_config),
            gutenberg: gutenberg::GutenbergService::new(&scrape_config),
            email,
        }
    }
}
