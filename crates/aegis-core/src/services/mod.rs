//! The content-service layer: stateless mediators between the HTTP
//! surface and the document store. Every call is independent; the only
//! long-lived operation is the contact feed subscription.

mod blogs;
mod contacts;
mod dashboard;

pub use blogs::BlogService;
pub use contacts::ContactService;
pub use dashboard::DashboardService;
