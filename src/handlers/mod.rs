mod url_entry;

pub use url_entry::{create_handler, get_all_handler, get_by_token_handler, redirect_handler};
