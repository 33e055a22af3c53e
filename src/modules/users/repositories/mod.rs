pub mod user_repository;

pub use user_repository::{
    InMemorySessionStore, InMemoryUserStore, MySqlSessionRepository, MySqlUserRepository,
    SessionStore, UserStore,
};
