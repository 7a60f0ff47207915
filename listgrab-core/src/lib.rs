pub mod export;
pub mod presets;
pub mod run;
