pub mod granularity;
pub mod location;
pub mod rain_frames;
pub mod season;
