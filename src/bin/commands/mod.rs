pub mod inspect_cmd;
pub mod search_cmd;
pub mod validate_cmd;

pub use inspect_cmd::cmd_inspect;
pub use search_cmd::{cmd_search, SearchArgs};
pub use validate_cmd::cmd_validate;
