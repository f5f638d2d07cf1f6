//! Command handlers for the serprank CLI

pub mod convert;
pub mod prepare;
pub mod query;
pub mod score;
pub mod verify;
pub mod view;

pub use convert::handle_convert_command;
pub use prepare::handle_prepare_command;
pub use query::handle_query_command;
pub use score::handle_score_command;
pub use verify::handle_verify_command;
pub use view::handle_view_command;
