pub mod football_data_api;
pub mod odds_api;
