use serde::Serialize;

use crate::modules::users::models::Role;

/// Where a client lands after the role claim is resolved
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
#[serde(rename_all = "snake_case")]
pub enum LandingView {
    AdminDashboard,
    InvestorDashboard,
    ViewerDashboard,
    EditorDashboard,
    Login,
}

impl LandingView {
    pub fn path(&self) -> &'static str {
        match self {
            LandingView::AdminDashboard => "/admin/dashboard",
            LandingView::InvestorDashboard => "/investor/dashboard",
            LandingView::ViewerDashboard => "/viewer/dashboard",
            LandingView::EditorDashboard => "/editor/dashboard",
            LandingView::Login => "/login",
        }
    }
}

pub fn dispatch(role: Role) -> LandingView {
    match role {
        Role::Admin => LandingView::AdminDashboard,
        Role::Investor => LandingView::InvestorDashboard,
        Role::Viewer => LandingView::ViewerDashboard,
        Role::Editor => LandingView::EditorDashboard,
    }
}

/// Anonymous requests go to the login view
pub fn dispatch_optional(role: Option<Role>) -> LandingView {
    role.map(dispatch).unwrap_or(LandingView::Login)
}
