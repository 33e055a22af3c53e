pub mod user;

pub use user::{
    AuthenticatedUser, NewUser, Permission, Role, Session, User, UserRow, UserSummary,
};
