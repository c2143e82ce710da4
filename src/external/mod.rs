pub mod contest_api;

pub use contest_api::ContestApi;
