mod config;
mod error;
mod grid;
pub mod hooks;
mod html;
mod pagination;
mod query;
mod store;
mod structs;
pub mod table;
mod window;

#[cfg(feature = "ics")]
mod ics;

pub use config::{parse_timezone, parse_weekday, Config, DEFAULT_MAX_PER_CELL};
pub use error::{Error, Result};
pub use grid::{Grid, NoPointers, PointerHook};
pub use html::escape;
pub use pagination::{Labels, PageLink, Pagination, Step, Unit};
pub use query::{Compare, MetaClause, MetaKey, Order, OrderBy, QueryArgs, ViewRequest};
pub use store::MemoryStore;
pub use structs::{Event, EventStatus, EVENT_POST_TYPE};
pub use table::{display, prepare_items, Mode, TableRenderer};
pub use window::{end_of_day, is_displayable, start_of_day, ViewWindow};

#[cfg(feature = "ics")]
pub use crate::ics::to_ics;
