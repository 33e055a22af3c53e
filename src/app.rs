//! Service graph shared by the HTTP workers.
//!
//! Stores are injected as trait objects so the same wiring runs against MySQL
//! in production and against the in-memory stores in tests.

use actix_web::{web, HttpResponse};
use sqlx::MySqlPool;
use std::sync::Arc;

use crate::config::{CacheConfig, SecurityConfig};
use crate::core::Result;
use crate::middleware::error_handler;
use crate::modules::deductions::{
    AggregationEngine, DeductionStore, InMemoryDeductionStore, MySqlDeductionRepository,
};
use crate::modules::dre::{DreCache, DreService};
use crate::modules::ledger::{InMemoryLedgerStore, LedgerService, LedgerStore, MySqlLedgerRepository};
use crate::modules::users::repositories::{
    InMemorySessionStore, InMemoryUserStore, MySqlSessionRepository, MySqlUserRepository,
    SessionStore, UserStore,
};
use crate::modules::users::{AuthService, LoginAttemptLimiter, RoleCache};
use crate::modules::{deductions, dre, health, ledger, users};

/// Persistence backends the services run on
#[derive(Clone)]
pub struct Stores {
    pub deductions: Arc<dyn DeductionStore>,
    pub ledger: Arc<dyn LedgerStore>,
    pub users: Arc<dyn UserStore>,
    pub sessions: Arc<dyn SessionStore>,
}

impl Stores {
    pub fn mysql(pool: &MySqlPool) -> Self {
        Self {
            deductions: Arc::new(MySqlDeductionRepository::new(pool.clone())),
            ledger: Arc::new(MySqlLedgerRepository::new(pool.clone())),
            users: Arc::new(MySqlUserRepository::new(pool.clone())),
            sessions: Arc::new(MySqlSessionRepository::new(pool.clone())),
        }
    }

    pub fn in_memory() -> Self {
        Self {
            deductions: Arc::new(InMemoryDeductionStore::new()),
            ledger: Arc::new(InMemoryLedgerStore::new()),
            users: Arc::new(InMemoryUserStore::new()),
            sessions: Arc::new(InMemorySessionStore::new()),
        }
    }
}

#[derive(Clone)]
pub struct AppServices {
    pub pool: Option<MySqlPool>,
    pub dre_cache: Arc<DreCache>,
    pub deductions: AggregationEngine,
    pub ledger: LedgerService,
    pub dre: DreService,
    pub auth: AuthService,
}

impl AppServices {
    pub fn build(stores: Stores, security: &SecurityConfig, cache: &CacheConfig) -> Result<Self> {
        let dre_cache = Arc::new(DreCache::new(cache.dre_ttl));
        let deductions = AggregationEngine::new(stores.deductions, dre_cache.clone());
        let ledger = LedgerService::new(stores.ledger, dre_cache.clone());
        let dre = DreService::new(ledger.clone(), deductions.clone(), dre_cache.clone());

        let auth = AuthService::new(
            stores.users,
            stores.sessions,
            Arc::new(RoleCache::new(cache.role_ttl)),
            Arc::new(LoginAttemptLimiter::new(
                security.login_max_attempts,
                security.login_window,
            )),
            security.session_ttl,
        )?;

        Ok(Self {
            pool: None,
            dre_cache,
            deductions,
            ledger,
            dre,
            auth,
        })
    }

    pub fn from_pool(pool: MySqlPool, security: &SecurityConfig, cache: &CacheConfig) -> Result<Self> {
        let mut services = Self::build(Stores::mysql(&pool), security, cache)?;
        services.pool = Some(pool);
        Ok(services)
    }

    pub fn in_memory(security: &SecurityConfig, cache: &CacheConfig) -> Result<Self> {
        Self::build(Stores::in_memory(), security, cache)
    }

    /// Register shared state, extractor configuration and every route
    pub fn configure(&self, cfg: &mut web::ServiceConfig) {
        if let Some(pool) = &self.pool {
            cfg.app_data(web::Data::new(pool.clone()));
        }

        cfg.app_data(web::Data::from(self.dre_cache.clone()))
            .app_data(web::Data::new(self.deductions.clone()))
            .app_data(web::Data::new(self.ledger.clone()))
            .app_data(web::Data::new(self.dre.clone()))
            .app_data(web::Data::new(self.auth.clone()))
            .route("/", web::get().to(index));

        error_handler::configure(cfg);
        health::controllers::configure(cfg);
        users::controllers::configure(cfg);
        deductions::controllers::configure(cfg);
        dre::controllers::configure(cfg);
        ledger::controllers::configure(cfg);
    }
}

async fn index() -> HttpResponse {
    HttpResponse::Ok().json(serde_json::json!({
        "service": "Federal Invest Finance Service",
        "version": env!("CARGO_PKG_VERSION"),
        "status": "running"
    }))
}
