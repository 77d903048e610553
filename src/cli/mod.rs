pub mod applications;
pub mod banks;
pub mod details;
pub mod estimate;
pub mod manage;
pub mod products;
pub mod setup;
pub mod ui;
