use std::sync::Arc;

use adapter::database::ConnectionPool;
use adapter::repository::{
    booking::BookingRepositoryImpl, catalog::CatalogRepositoryImpl,
    health::HealthCheckRepositoryImpl,
};
use kernel::repository::{
    booking::BookingRepository, catalog::CatalogRepository, health::HealthCheckRepository,
};

#[derive(Clone)]
pub struct AppRegistry {
    health_check_repository: Arc<dyn HealthCheckRepository>,
    catalog_repository: Arc<dyn CatalogRepository>,
    booking_repository: Arc<dyn BookingRepository>,
}

impl AppRegistry {
    pub fn new(pool: ConnectionPool) -> Self {
        Self::with_repositories(
            Arc::new(HealthCheckRepositoryImpl::new(pool.clone())),
            Arc::new(CatalogRepositoryImpl::new(pool.clone())),
            Arc::new(BookingRepositoryImpl::new(pool)),
        )
    }

    // Lets callers swap in other implementations, e.g. in-memory ones in tests.
    pub fn with_repositories(
        health_check_repository: Arc<dyn HealthCheckRepository>,
        catalog_repository: Arc<dyn CatalogRepository>,
        booking_repository: Arc<dyn BookingRepository>,
    ) -> Self {
        Self {
            health_check_repository,
            catalog_repository,
            booking_repository,
        }
    }

    pub fn health_check_repository(&self) -> Arc<dyn HealthCheckRepository> {
        self.health_check_repository.clone()
    }

    pub fn catalog_repository(&self) -> Arc<dyn CatalogRepository> {
        self.catalog_repository.clone()
    }

    pub fn booking_repository(&self) -> Arc<dyn BookingRepository> {
        self.booking_repository.clone()
    }
}
