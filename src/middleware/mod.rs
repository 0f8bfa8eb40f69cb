mod basic_auth;
mod request_id;
mod request_logger;

pub use basic_auth::ApiUser;
pub use request_id::RequestId;
pub use request_logger::RequestLogger;
