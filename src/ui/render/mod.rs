mod all;
mod dashboard;
mod detail;
mod footer;
mod form;
mod log;
mod main;
mod modal;
mod sidebar;
mod table;
mod topbar;

use self::log::log;
use super::*;
use footer::footer;
use main::main;
use sidebar::sidebar;
use topbar::topbar;

pub use all::all as render;
