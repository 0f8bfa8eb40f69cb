mod memory;
mod url_entry;

#[cfg(test)]
pub use url_entry::MockUrlEntryRepositoryTrait;

pub use memory::InMemoryUrlEntryRepository;
pub use url_entry::{PgUrlEntryRepository, UrlEntryRepositoryTrait};
