pub mod daily;
pub mod energy;
pub mod open_meteo;
pub mod summary;

pub use daily::*;
pub use energy::*;
pub use open_meteo::*;
pub use summary::*;
