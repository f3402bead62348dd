pub mod app_state;
pub mod calendar;
pub mod config;
pub mod directory;
pub mod error;
pub mod logging;
pub mod presenter;
pub mod time_engine;
pub mod time_mapper;
pub mod zone_list;

pub use app_state::*;
pub use calendar::*;
pub use config::*;
pub use directory::*;
pub use error::*;
pub use presenter::*;
pub use time_engine::*;
pub use time_mapper::*;
pub use zone_list::*;
