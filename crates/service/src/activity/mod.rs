//! Activity CRUD: query parsing, wire mapping, repository seam and the
//! application service the HTTP layer talks to.

pub mod dto;
pub mod memory;
pub mod query;
pub mod repository;
pub mod service;

pub use dto::ActivityDto;
pub use memory::InMemoryActivityRepository;
pub use query::{ActivityQuery, ListOptions, Sort, SortDirection, SortField};
pub use repository::{ActivityRepository, SeaOrmActivityRepository};
pub use service::{parse_id, ActivityService};
