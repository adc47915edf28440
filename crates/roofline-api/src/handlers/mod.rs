mod drawing;
mod health;
mod outline;
mod sites;
mod structures;

pub use drawing::{get_drawing, save_drawing};
pub use health::health_check;
pub use outline::acquire_outline;
pub use sites::{get_site, register_site};
pub use structures::{get_summary, list_structures};
