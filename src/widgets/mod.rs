//! View models for the admin pages. Nothing here touches the network; the
//! hosting shell draws the models and wires user events back in.

pub mod date_input;
pub mod form_errors;
pub mod pagination;
pub mod password;
pub mod status;

pub use pagination::{IconSet, PageRenderer, PageResult, Pagination};
pub use status::{Audience, TicketStatus};
